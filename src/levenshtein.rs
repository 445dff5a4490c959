// levenshtein.rs - Edit distance kernels.
//
// Two evaluation orders of the same recurrence:
//
//   dp[i][j] = min(dp[i-1][j] + 1, dp[i][j-1] + 1, dp[i-1][j-1] + (a[i-1] != b[j-1]))
//
// `wagner_fischer` walks rows and is the serial baseline. `anti_diagonal`
// walks diagonals `i + j = k`, where every cell depends only on the two
// previous diagonals, so the inner loop has no carried dependency and
// vectorizes. Vector backends call it from `#[target_feature]` wrappers.

use crate::backend;

/// Levenshtein distance between `a` and `b` with unit costs.
///
/// ```
/// use bytesift::levenshtein::edit_distance;
///
/// assert_eq!(edit_distance(b"abc", b"adc"), 1);
/// assert_eq!(edit_distance(b"", b"abc"), 3);
/// ```
pub fn edit_distance(a: &[u8], b: &[u8]) -> usize {
    edit_distance_bounded(a, b, 0)
}

/// Levenshtein distance capped at `bound`; a `bound` of 0 means unbounded.
///
/// Returns `min(edit_distance(a, b), bound)`. Evaluation stops as soon as
/// the result is known to reach `bound`.
pub fn edit_distance_bounded(a: &[u8], b: &[u8], bound: usize) -> usize {
    if bound != 0 && a.len().abs_diff(b.len()) >= bound {
        return bound;
    }
    backend::active().edit_distance(a, b, bound)
}

#[inline(always)]
fn cap(distance: usize, bound: usize) -> usize {
    if bound != 0 {
        distance.min(bound)
    } else {
        distance
    }
}

/// Row-by-row evaluation keeping two rows.
pub(crate) fn wagner_fischer(a: &[u8], b: &[u8], bound: usize) -> usize {
    if a.is_empty() {
        return cap(b.len(), bound);
    }
    if b.is_empty() {
        return cap(a.len(), bound);
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        let mut row_min = cur[0];
        for j in 1..=b.len() {
            let cost = (ca != b[j - 1]) as usize;
            let value = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
            cur[j] = value;
            row_min = row_min.min(value);
        }
        // Every path to the corner crosses this row.
        if bound != 0 && row_min >= bound {
            return bound;
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    cap(prev[b.len()], bound)
}

/// Diagonal-by-diagonal evaluation keeping three diagonals indexed by `i`.
#[inline(always)]
pub(crate) fn anti_diagonal(a: &[u8], b: &[u8], bound: usize) -> usize {
    let (a, b) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let (n, m) = (a.len(), b.len());
    if n == 0 {
        return cap(m, bound);
    }
    // With `b` reversed, the `b` byte for cell (i, k - i) sits at `m + i - k`,
    // which grows with `i` like every other operand of the inner loop.
    let b_rev: Vec<u8> = b.iter().rev().copied().collect();
    let mut prev2 = vec![0usize; n + 1];
    let mut prev = vec![0usize; n + 1];
    let mut cur = vec![0usize; n + 1];
    let mut prev_min = usize::MAX;

    for k in 0..=n + m {
        let lo = k.saturating_sub(m);
        let hi = k.min(n);
        let first = lo.max(1);
        let last = hi.min(k.saturating_sub(1));

        if first <= last {
            let subs = &prev2[first - 1..last];
            let dels = &prev[first - 1..last];
            let inss = &prev[first..=last];
            let a_bytes = &a[first - 1..last];
            let b_bytes = &b_rev[m + first - k..=m + last - k];
            let cells = &mut cur[first..=last];
            for (((((cell, &sub), &del), &ins), &ca), &cb) in cells
                .iter_mut()
                .zip(subs)
                .zip(dels)
                .zip(inss)
                .zip(a_bytes)
                .zip(b_bytes)
            {
                let substitute = sub + (ca != cb) as usize;
                *cell = substitute.min(del + 1).min(ins + 1);
            }
        }
        if k <= m {
            cur[0] = k;
        }
        if k <= n {
            cur[k] = k;
        }

        // A path may step over one diagonal but never two in a row.
        if bound != 0 {
            let cur_min = cur[lo..=hi].iter().copied().min().unwrap_or(usize::MAX);
            if cur_min >= bound && prev_min >= bound {
                return bound;
            }
            prev_min = cur_min;
        }

        std::mem::swap(&mut prev2, &mut prev);
        std::mem::swap(&mut prev, &mut cur);
    }
    cap(prev[n], bound)
}

/// Full-matrix evaluation, the textbook form of the recurrence.
#[cfg(test)]
pub(crate) fn baseline(s1: &[u8], s2: &[u8]) -> usize {
    let (len1, len2) = (s1.len(), s2.len());
    let mut dp = vec![vec![0usize; len2 + 1]; len1 + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=len2 {
        dp[0][j] = j;
    }
    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = (s1[i - 1] != s2[j - 1]) as usize;
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }
    dp[len1][len2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EXPLICIT_CASES: &[(&[u8], &[u8], usize)] = &[
        (b"", b"", 0),
        (b"", b"abc", 3),
        (b"abc", b"", 3),
        (b"abc", b"ac", 1),
        (b"abc", b"a_bc", 1),
        (b"abc", b"adc", 1),
        (b"ggbuzgjux{}l", b"gbuzgjux{}l", 1),
        (b"hello", b"hello", 0),
        (b"hello", b"hell", 1),
        (b"abcdefgABCDEFG", b"ABCDEFGabcdefg", 14),
        (b"kitten", b"sitting", 3),
        (b"a\0b", b"ab", 1),
    ];

    #[test]
    fn explicit_cases_every_kernel() {
        for &(a, b, expected) in EXPLICIT_CASES {
            assert_eq!(baseline(a, b), expected, "baseline {:?} {:?}", a, b);
            assert_eq!(wagner_fischer(a, b, 0), expected, "rows {:?} {:?}", a, b);
            assert_eq!(wagner_fischer(b, a, 0), expected, "rows {:?} {:?}", b, a);
            assert_eq!(anti_diagonal(a, b, 0), expected, "diagonals {:?} {:?}", a, b);
            assert_eq!(anti_diagonal(b, a, 0), expected, "diagonals {:?} {:?}", b, a);
            assert_eq!(edit_distance(a, b), expected);
        }
    }

    #[test]
    fn bounded_caps_result() {
        assert_eq!(edit_distance_bounded(b"abcdefgABCDEFG", b"ABCDEFGabcdefg", 5), 5);
        assert_eq!(edit_distance_bounded(b"kitten", b"sitting", 10), 3);
        assert_eq!(edit_distance_bounded(b"kitten", b"sitting", 3), 3);
        assert_eq!(edit_distance_bounded(b"", b"abcdef", 2), 2);
        assert_eq!(wagner_fischer(b"aaaa", b"bbbb", 2), 2);
        assert_eq!(anti_diagonal(b"aaaa", b"bbbb", 2), 2);
    }

    #[test]
    fn prepended_insertions_accumulate() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let a: Vec<u8> = (0..20).map(|_| rng.random_range(b'a'..=b'z')).collect();
        let mut b = a.clone();
        for inserted in 1..=150 {
            let at = rng.random_range(0..b.len());
            b.insert(at, rng.random_range(b'a'..=b'z'));
            assert_eq!(edit_distance(&a, &b), baseline(&a, &b));
            assert!(edit_distance(&a, &b) <= inserted);
        }
    }

    #[test]
    fn randomized_kernels_match_baseline() {
        let mut rng = StdRng::seed_from_u64(42);
        for &(upper, iterations) in &[(10usize, 1000usize), (100, 100), (1000, 4)] {
            for _ in 0..iterations {
                let la = rng.random_range(0..=upper);
                let lb = rng.random_range(0..=upper);
                let a: Vec<u8> = (0..la).map(|_| if rng.random::<bool>() { b'a' } else { b'b' }).collect();
                let b: Vec<u8> = (0..lb).map(|_| if rng.random::<bool>() { b'a' } else { b'b' }).collect();
                let expected = baseline(&a, &b);
                assert_eq!(wagner_fischer(&a, &b, 0), expected);
                assert_eq!(anti_diagonal(&a, &b, 0), expected);
                assert_eq!(edit_distance(&b, &a), expected);
            }
        }
    }

    #[quickcheck]
    fn symmetric(a: Vec<u8>, b: Vec<u8>) -> bool {
        edit_distance(&a, &b) == edit_distance(&b, &a)
    }

    #[quickcheck]
    fn identity_is_zero(a: Vec<u8>) -> bool {
        edit_distance(&a, &a) == 0
    }

    #[quickcheck]
    fn bounded_agrees_across_kernels(a: Vec<u8>, b: Vec<u8>, bound: u8) -> bool {
        let bound = bound as usize % 16;
        let a: Vec<u8> = a.into_iter().map(|x| x % 3).collect();
        let b: Vec<u8> = b.into_iter().map(|x| x % 3).collect();
        let full = baseline(&a, &b);
        let expected = if bound == 0 { full } else { full.min(bound) };
        wagner_fischer(&a, &b, bound) == expected && anti_diagonal(&a, &b, bound) == expected
    }
}
