// api_test.rs - Integration tests for the public query, buffer and hash API.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher as _};

use bytesift::hash::{hash, hash_with_seed, DEFAULT_SEED};
use bytesift::levenshtein::{edit_distance, edit_distance_bounded};
use bytesift::prelude::*;

// === ByteView ===

#[test]
fn view_equality_and_order() {
    assert_eq!(ByteView::from("a"), ByteView::from(b"a"));
    assert_ne!(ByteView::from("a"), ByteView::from("a\0"));
    assert!(ByteView::from("a") < ByteView::from("a\0"));
    assert!(ByteView::from("ab") > ByteView::from("a\0"));

    let mut views = vec![ByteView::from("b"), ByteView::from("a\0"), ByteView::from("a")];
    views.sort();
    assert_eq!(views, vec![ByteView::from("a"), ByteView::from("a\0"), ByteView::from("b")]);
}

#[test]
fn view_slice_errors() {
    let view = ByteView::from("abc");
    let err = view.slice(2, 2).unwrap_err();
    assert_eq!(err, Error::OutOfRange { offset: 2, count: 2, len: 3 });
    assert_eq!(err.to_string(), "range 2..4 out of bounds for length 3");
}

// === Search ===

#[test]
fn find_returns_none_not_error() {
    let view = ByteView::from("haystack");
    assert_eq!(view.find("needle"), None);
    assert_eq!(view.rfind("needle"), None);
    assert_eq!(view.find_first_of("xz"), None);
    assert_eq!(view.find_first_of("xyz"), Some(2));
}

#[test]
fn empty_needle_boundaries() {
    let view = ByteView::from("abc");
    assert_eq!(view.find(""), Some(0));
    assert_eq!(view.rfind(""), Some(3));
    assert_eq!(view.find_all("", false).count(), 0);
    assert_eq!(view.split("").collect::<Vec<_>>(), vec![&b"abc"[..]]);
}

#[test]
fn embedded_zero_bytes() {
    let view = ByteView::from(&b"ab\0ab\0\0"[..]);
    assert_eq!(view.find(b"\0a"), Some(2));
    assert_eq!(view.rfind(b"\0"), Some(6));
    assert_eq!(view.find_all(b"\0", false).count(), 3);
    assert_eq!(view.find_first_not_of(b"ab"), Some(2));
}

#[test]
fn match_spans_report_ranges() {
    let view = ByteView::from("foobarbazbar");
    let spans: Vec<MatchSpan<'_>> = view.find_all("bar", false).collect();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].range(), 3..6);
    assert_eq!(spans[1].offset(), 9);
    assert_eq!(spans[1].end(), 12);
    assert_eq!(spans[1].as_bytes(), b"bar");
    assert!(!spans[0].is_empty());
}

#[test]
fn forward_and_reverse_visit_same_offsets() {
    let view = ByteView::from("xaaxaaaxa");
    for needle in ["a", "aa", "xa", "aaa"] {
        let forward: Vec<usize> = view.find_all(needle, true).map(|m| m.offset()).collect();
        let mut reverse: Vec<usize> = view.rfind_all(needle, true).map(|m| m.offset()).collect();
        reverse.reverse();
        assert_eq!(forward, reverse, "needle {:?}", needle);
    }
    for needle in ["a", "xa"] {
        let forward: Vec<usize> = view.find_all(needle, false).map(|m| m.offset()).collect();
        let mut reverse: Vec<usize> = view.rfind_all(needle, false).map(|m| m.offset()).collect();
        reverse.reverse();
        assert_eq!(forward, reverse, "needle {:?}", needle);
    }
}

#[test]
fn non_overlapping_ranges_resume_per_direction() {
    let view = ByteView::from("aaa");
    let forward: Vec<usize> = view.find_all("aa", false).map(|m| m.offset()).collect();
    let reverse: Vec<usize> = view.rfind_all("aa", false).map(|m| m.offset()).collect();
    assert_eq!(forward, vec![0]);
    assert_eq!(reverse, vec![1]);

    let view = ByteView::from("xaaxaaaxa");
    let forward: Vec<usize> = view.find_all("aa", false).map(|m| m.offset()).collect();
    let reverse: Vec<usize> = view.rfind_all("aa", false).map(|m| m.offset()).collect();
    assert_eq!(forward, vec![1, 4]);
    assert_eq!(reverse, vec![5, 1]);
}

#[test]
fn fields_borrow_the_haystack() {
    fn first_field(line: ByteView<'_>) -> &[u8] {
        line.split(",").next().unwrap_or(b"")
    }

    let line = String::from("id,name,email");
    assert_eq!(first_field(ByteView::from(line.as_str())), b"id");

    let buffer = OwnedBuffer::from("left|right");
    let p = (&buffer).partition("|");
    assert_eq!((p.before, p.after), (&b"left"[..], &b"right"[..]));
}

#[test]
fn split_segments_are_matches_plus_one() {
    for (text, needle) in [("a,b,,c,", ","), ("", ","), (",,,", ","), ("abc", "x"), ("a--b--", "--")] {
        let view = ByteView::from(text);
        let hits = view.count(needle, false);
        assert_eq!(view.split(needle).count(), hits + 1, "{:?}", text);
        assert_eq!(view.rsplit(needle).count(), hits + 1, "{:?}", text);
    }
}

#[test]
fn partition_with_character_set() {
    let view = ByteView::from("name: value");
    let p = view.partition(CharacterSet::from(":="));
    assert_eq!(p.before, b"name");
    assert_eq!(p.matched, b":");
    assert_eq!(p.after, b" value");

    let p = view.rpartition(CharacterSet::from("#"));
    assert_eq!((p.before, p.matched, p.after), (&b""[..], &b""[..], &b"name: value"[..]));
    assert!(!p.is_found());
}

// === OwnedBuffer ===

#[test]
fn buffer_mutation_surface() {
    let mut buffer = OwnedBuffer::new();
    buffer.push_back(b'h');
    buffer.append("ello world");
    assert_eq!(buffer, "hello world");
    buffer.erase(5, 6).unwrap();
    assert_eq!(buffer, "hello");
    assert!(matches!(buffer.erase(4, 2), Err(Error::OutOfRange { .. })));
    assert_eq!(buffer.as_view().compare("hello"), std::cmp::Ordering::Equal);
    assert_eq!(buffer[0], b'h');
}

#[test]
fn buffer_queries() {
    let buffer: OwnedBuffer = "one two three".bytes().collect();
    assert_eq!(buffer.split(" ").count(), 3);
    assert_eq!(buffer.find_first_of(CharacterSet::ascii_whitespace()), Some(3));
    assert!(buffer.contains("two"));
    assert_eq!(buffer.hash64(), hash(b"one two three"));
}

// === Edit distance ===

#[test]
fn edit_distance_surface() {
    assert_eq!(edit_distance(b"kitten", b"sitting"), 3);
    assert_eq!(edit_distance(b"sitting", b"kitten"), 3);
    assert_eq!(edit_distance_bounded(b"kitten", b"sitting", 2), 2);
    assert_eq!(ByteView::from("flaw").edit_distance("lawn"), 2);
}

// === Hash ===

#[test]
fn hash_seed_dependence() {
    for data in [&b""[..], b"a", b"hello", b"\0\0\0\0"] {
        assert_eq!(hash(data), hash_with_seed(data, DEFAULT_SEED));
        assert_ne!(hash_with_seed(data, 0), hash_with_seed(data, 42), "{:?}", data);
    }
    assert_ne!(hash(b"hello"), hash(b"hellp"));
    assert_ne!(hash(b"a"), hash(b"a\0"));
}

#[test]
fn streaming_matches_one_shot() {
    let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 % 251) as u8).collect();
    let mut hasher = Hasher::new(9);
    for chunk in data.chunks(37) {
        hasher.update(chunk).update(b"");
    }
    assert_eq!(hasher.finalize(), hash_with_seed(&data, 9));
    assert_eq!(hasher.finalize(), hasher.finalize());

    hasher.reset(3);
    hasher.update(b"abc");
    assert_eq!(hasher.finalize(), hash_with_seed(b"abc", 3));
}

#[test]
fn std_hasher_integration() {
    let build = BuildSeededHasher::new(5);
    let mut a = build.build_hasher();
    let mut b = build.build_hasher();
    a.write(b"key");
    b.write(b"k");
    b.write(b"ey");
    assert_eq!(a.finish(), b.finish());

    let mut map: HashMap<&str, u32, BuildSeededHasher> = HashMap::with_hasher(build);
    map.insert("one", 1);
    map.insert("two", 2);
    assert_eq!(map.get("two"), Some(&2));
}
