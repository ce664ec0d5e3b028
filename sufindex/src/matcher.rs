// Binary search over the suffix array. Each probe compares the pattern with
// the suffix truncated to the pattern length, so a suffix that runs out of
// text before disagreeing sorts below the pattern.
use std::collections::BTreeSet;

use crate::text::Text;

fn probe<'a>(bytes: &'a [u8], pos: usize, len: usize) -> &'a [u8] {
    let end = (pos + len).min(bytes.len());
    &bytes[pos..end]
}

/// Half-open range of suffix-array indices whose suffixes start with `pattern`.
pub fn find_range(text: &Text, pattern: &[u8], suffix_array: &[usize]) -> (usize, usize) {
    debug_assert_eq!(text.len(), suffix_array.len());
    let bytes = text.as_bytes();
    let m = pattern.len();

    let start = suffix_array.partition_point(|&pos| probe(bytes, pos, m) < pattern);
    let end = start + suffix_array[start..].partition_point(|&pos| probe(bytes, pos, m) <= pattern);
    (start, end)
}

/// Text positions where `pattern` occurs.
pub fn find_positions(text: &Text, pattern: &[u8], suffix_array: &[usize]) -> BTreeSet<usize> {
    let (start, end) = find_range(text, pattern, suffix_array);
    suffix_array[start..end]
        .iter()
        .copied()
        .filter(|&pos| text.suffix(pos).starts_with(pattern))
        .collect()
}

pub fn count(text: &Text, pattern: &[u8], suffix_array: &[usize]) -> usize {
    let (start, end) = find_range(text, pattern, suffix_array);
    end - start
}

pub fn contains(text: &Text, pattern: &[u8], suffix_array: &[usize]) -> bool {
    count(text, pattern, suffix_array) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix_array::build_suffix_array;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn setup(s: &str) -> (Text, Vec<usize>) {
        let text = Text::new(s.as_bytes().to_vec(), b'$').unwrap();
        let sa = build_suffix_array(&text).unwrap().into_inner();
        (text, sa)
    }

    fn scan(text: &[u8], pattern: &[u8]) -> BTreeSet<usize> {
        if pattern.is_empty() {
            return (0..text.len()).collect();
        }
        text.windows(pattern.len())
            .enumerate()
            .filter(|(_, w)| *w == pattern)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn finds_overlapping_repeats() {
        let (text, sa) = setup("GAGAGA$");
        let positions = find_positions(&text, b"GA", &sa);
        assert_eq!(positions, BTreeSet::from([0, 2, 4]));
        assert_eq!(count(&text, b"AGA", &sa), 2);
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let (text, sa) = setup("GTAGT$");
        assert_eq!(find_range(&text, b"", &sa), (0, 6));
        assert_eq!(find_positions(&text, b"", &sa), (0..6).collect::<BTreeSet<_>>());
    }

    #[test]
    fn missing_pattern_yields_empty_range() {
        let (text, sa) = setup("GTAGT$");
        let (start, end) = find_range(&text, b"GG", &sa);
        assert_eq!(start, end);
        assert!(find_positions(&text, b"C", &sa).is_empty());
        assert!(!contains(&text, b"TT", &sa));
    }

    #[test]
    fn pattern_longer_than_any_suffix() {
        let (text, sa) = setup("GTAGT$");
        assert!(find_positions(&text, b"GTAGTGTAGT", &sa).is_empty());
        assert_eq!(find_positions(&text, b"GTAGT$", &sa), BTreeSet::from([0]));
        assert_eq!(find_positions(&text, b"T$", &sa), BTreeSet::from([4]));
    }

    #[test]
    fn range_brackets_matching_suffixes() {
        let (text, sa) = setup("ATAAATG$");
        let (start, end) = find_range(&text, b"A", &sa);
        assert_eq!((start, end), (1, 5));
        for i in 0..sa.len() {
            let inside = (start..end).contains(&i);
            assert_eq!(text.suffix(sa[i]).starts_with(b"A"), inside);
        }
    }

    #[test]
    fn agrees_with_scan_on_random_texts() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let len = rng.gen_range(1..70);
            let body: Vec<u8> = (0..len).map(|_| b'a' + rng.gen_range(0..3u8)).collect();
            let text = Text::with_sentinel(&body, b'$').unwrap();
            let sa = build_suffix_array(&text).unwrap();

            for _ in 0..10 {
                let m = rng.gen_range(0..5);
                let pattern: Vec<u8> = (0..m).map(|_| b'a' + rng.gen_range(0..3u8)).collect();
                assert_eq!(
                    find_positions(&text, &pattern, &sa),
                    scan(text.as_bytes(), &pattern),
                    "{body:?} / {pattern:?}"
                );
            }
        }
    }
}
