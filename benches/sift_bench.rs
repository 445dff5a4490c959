// Criterion benchmark suite: every available backend side by side
//
// Run: cargo bench
// Specific group: cargo bench -- find
// Force the scalar path for the library-level groups: BYTESIFT_CAPABILITIES=serial cargo bench
// HTML report: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bytesift::backend::{self, Backend};
use bytesift::charset::CharacterSet;
use bytesift::hash::{hash_with_backend, Hasher};
use bytesift::matcher::{MatchRange, Matcher};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pseudo-random lowercase text with a word separator every few bytes.
fn corpus(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_4f6c_dd1du64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            match state % 9 {
                0 => b' ',
                r => b'a' + (r as u8 * 3 + (state >> 32) as u8 % 3) % 26,
            }
        })
        .collect()
}

fn backends() -> Vec<&'static dyn Backend> {
    backend::available().into_iter().collect()
}

// ---------------------------------------------------------------------------
// 1. find -- substring search that never matches
// ---------------------------------------------------------------------------

fn bench_find(c: &mut Criterion) {
    let text = corpus(1 << 20);
    let needles: &[(&str, &[u8])] = &[
        ("byte", b"#"),
        ("pair", b"#!"),
        ("word", b"needle#"),
        ("long", b"a needle that is not in the corpus#"),
    ];

    let mut group = c.benchmark_group("find");
    group.throughput(Throughput::Bytes(text.len() as u64));
    for backend in backends() {
        for (name, needle) in needles {
            group.bench_with_input(BenchmarkId::new(backend.name(), name), needle, |b, needle| {
                b.iter(|| black_box(backend.find(black_box(&text), needle)));
            });
            group.bench_with_input(
                BenchmarkId::new(format!("{}_reverse", backend.name()), name),
                needle,
                |b, needle| {
                    b.iter(|| black_box(backend.rfind(black_box(&text), needle)));
                },
            );
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. byteset -- class search that never matches
// ---------------------------------------------------------------------------

fn bench_byteset(c: &mut Criterion) {
    let text = corpus(1 << 20);
    let sets: &[(&str, CharacterSet)] = &[
        ("two", CharacterSet::from("#!")),
        ("digits", CharacterSet::ascii_digits()),
        ("uppercase", CharacterSet::ascii_uppercase()),
    ];

    let mut group = c.benchmark_group("byteset");
    group.throughput(Throughput::Bytes(text.len() as u64));
    for backend in backends() {
        for (name, set) in sets {
            group.bench_with_input(BenchmarkId::new(backend.name(), name), set, |b, set| {
                b.iter(|| black_box(backend.find_byteset(black_box(&text), set)));
            });
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. find_all -- dense matches through the range adapters
// ---------------------------------------------------------------------------

fn bench_find_all(c: &mut Criterion) {
    let text = corpus(1 << 16);
    let mut group = c.benchmark_group("find_all");
    group.throughput(Throughput::Bytes(text.len() as u64));
    for backend in backends() {
        group.bench_function(BenchmarkId::new(backend.name(), "spaces"), |b| {
            b.iter(|| {
                MatchRange::with_backend(&text, Matcher::Substring(b" "), false, backend).count()
            });
        });
        group.bench_function(BenchmarkId::new(backend.name(), "vowels"), |b| {
            let vowels = Matcher::AnyOf(CharacterSet::from("aeiou"));
            b.iter(|| MatchRange::with_backend(&text, vowels, false, backend).count());
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 4. edit_distance
// ---------------------------------------------------------------------------

fn bench_edit_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_distance");
    for len in [16usize, 128, 1024] {
        let a = corpus(len);
        let mut b = a.clone();
        b.rotate_left(len / 4);
        for backend in backends() {
            group.bench_with_input(BenchmarkId::new(backend.name(), len), &len, |bench, _| {
                bench.iter(|| black_box(backend.edit_distance(black_box(&a), black_box(&b), 0)));
            });
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 5. hash -- one-shot per backend, and streaming through the selected one
// ---------------------------------------------------------------------------

fn bench_hash(c: &mut Criterion) {
    let text = corpus(1 << 20);
    let mut group = c.benchmark_group("hash");
    group.throughput(Throughput::Bytes(text.len() as u64));
    for backend in backends() {
        group.bench_function(BenchmarkId::new(backend.name(), "one_shot"), |b| {
            b.iter(|| black_box(hash_with_backend(backend, black_box(&text), 0)));
        });
    }
    group.bench_function("streaming_4k_chunks", |b| {
        b.iter(|| {
            let mut hasher = Hasher::new(0);
            for chunk in text.chunks(4096) {
                hasher.update(chunk);
            }
            black_box(hasher.finalize())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_find,
    bench_byteset,
    bench_find_all,
    bench_edit_distance,
    bench_hash,
);
criterion_main!(benches);
