//! Suffix array construction by prefix doubling.
//!
//! Every round sorts positions by the pair of equivalence classes of the two
//! halves of their length-`2L` cyclic substring, using two stable counting
//! sorts. Because the text ends with a unique smallest sentinel, cyclic and
//! linear suffix order agree.
use std::ops::Deref;

use log::{debug, trace};

use crate::alphabet::Alphabet;
use crate::error::{IndexError, Result};
use crate::text::Text;

/// Start positions of all suffixes of a text, in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixArray {
    sa: Vec<usize>,
}

impl SuffixArray {
    pub fn build(text: &Text) -> Result<Self> {
        build_suffix_array(text)
    }

    /// Adopts a suffix array computed elsewhere.
    ///
    /// Checks that `positions` is a permutation of `0..n` that starts with the
    /// sentinel suffix. Sortedness of the remaining suffixes is trusted.
    pub fn from_positions(text: &Text, positions: Vec<usize>) -> Result<Self> {
        let n = text.len();
        check_permutation(&positions, n)?;

        if positions[0] != n - 1 {
            return Err(IndexError::invalid(
                "suffix array does not start with the sentinel suffix",
            ));
        }

        Ok(Self { sa: positions })
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sa
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.sa
    }

    /// The suffix at sorted index `i`.
    pub fn suffix<'t>(&self, text: &'t Text, i: usize) -> &'t [u8] {
        text.suffix(self.sa[i])
    }

    /// Rank of every text position, i.e. the inverse permutation.
    pub fn inverse(&self) -> Vec<usize> {
        inverse_permutation(&self.sa)
    }
}

impl Deref for SuffixArray {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.sa
    }
}

/// Fails unless `positions` is a permutation of `0..n`.
pub(crate) fn check_permutation(positions: &[usize], n: usize) -> Result<()> {
    if positions.len() != n {
        return Err(IndexError::invalid(format!(
            "suffix array has {} entries for a text of length {}",
            positions.len(),
            n
        )));
    }

    let mut seen = vec![false; n];
    for &pos in positions {
        if pos >= n || seen[pos] {
            return Err(IndexError::invalid(format!(
                "suffix array is not a permutation: position {pos} is out of range or repeated"
            )));
        }
        seen[pos] = true;
    }
    Ok(())
}

pub(crate) fn inverse_permutation(sa: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; sa.len()];
    for (rank, &pos) in sa.iter().enumerate() {
        inv[pos] = rank;
    }
    inv
}

/// Sorts all suffixes of `text` over the alphabet observed in the text.
pub fn build_suffix_array(text: &Text) -> Result<SuffixArray> {
    build_suffix_array_with(text, &Alphabet::from_text(text))
}

/// Sorts all suffixes of `text` using the dense ranks of `alphabet`.
pub fn build_suffix_array_with(text: &Text, alphabet: &Alphabet) -> Result<SuffixArray> {
    let ranks = alphabet.ranks(text)?;
    let n = ranks.len();

    let mut order = sort_characters(&ranks, alphabet.sigma());
    let (mut class, mut classes) = character_classes(&ranks, &order);

    let mut scratch = vec![0usize; n];
    let mut next_class = vec![0usize; n];
    let mut count = vec![0usize; n];

    let mut len = 1usize;
    let mut rounds = 0usize;
    while len < n && classes < n {
        sort_doubled(&order, &class, len, &mut count, &mut scratch);
        std::mem::swap(&mut order, &mut scratch);

        classes = update_classes(&order, &class, len, &mut next_class);
        std::mem::swap(&mut class, &mut next_class);

        rounds += 1;
        trace!("suffix array round {rounds}: prefix length {}, {classes} classes", len * 2);
        len *= 2;
    }

    debug!("suffix array built: n={n}, sigma={}, rounds={rounds}", alphabet.sigma());
    Ok(SuffixArray { sa: order })
}

/// Counting sort of positions by single symbol rank.
fn sort_characters(ranks: &[usize], sigma: usize) -> Vec<usize> {
    let mut count = vec![0usize; sigma];
    for &r in ranks {
        count[r] += 1;
    }
    for i in 1..sigma {
        count[i] += count[i - 1];
    }

    let mut order = vec![0usize; ranks.len()];
    for (pos, &r) in ranks.iter().enumerate().rev() {
        count[r] -= 1;
        order[count[r]] = pos;
    }
    order
}

fn character_classes(ranks: &[usize], order: &[usize]) -> (Vec<usize>, usize) {
    let mut class = vec![0usize; ranks.len()];
    let mut current = 0usize;
    for i in 1..order.len() {
        if ranks[order[i]] != ranks[order[i - 1]] {
            current += 1;
        }
        class[order[i]] = current;
    }
    (class, current + 1)
}

/// Sorts positions by (class[i], class[i + len]) into `out`.
///
/// `order` is already sorted by length-`len` class, so shifting each entry left
/// by `len` yields positions ordered by their second half. A stable counting
/// sort on the first half finishes the job.
fn sort_doubled(order: &[usize], class: &[usize], len: usize, count: &mut [usize], out: &mut [usize]) {
    let n = order.len();

    count.fill(0);
    for &c in class {
        count[c] += 1;
    }
    for i in 1..n {
        count[i] += count[i - 1];
    }

    for &pos in order.iter().rev() {
        let start = (pos + n - len) % n;
        let c = class[start];
        count[c] -= 1;
        out[count[c]] = start;
    }
}

/// Assigns class ids for length `2 * len`; returns the number of classes.
fn update_classes(order: &[usize], class: &[usize], len: usize, next: &mut [usize]) -> usize {
    let n = order.len();
    next[order[0]] = 0;

    let mut current = 0usize;
    for i in 1..n {
        let cur = order[i];
        let prev = order[i - 1];
        let cur_mid = (cur + len) % n;
        let prev_mid = (prev + len) % n;
        if class[cur] != class[prev] || class[cur_mid] != class[prev_mid] {
            current += 1;
        }
        next[cur] = current;
    }
    current + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use test_case::test_case;

    fn text(s: &str) -> Text {
        Text::new(s.as_bytes().to_vec(), b'$').unwrap()
    }

    fn naive_suffix_array(text: &Text) -> Vec<usize> {
        let bytes = text.as_bytes();
        let mut sa: Vec<usize> = (0..bytes.len()).collect();
        sa.sort_by(|&a, &b| bytes[a..].cmp(&bytes[b..]));
        sa
    }

    #[test_case("$", vec![0] ; "sentinel only")]
    #[test_case("A$", vec![1, 0])]
    #[test_case("AAA$", vec![3, 2, 1, 0])]
    #[test_case("GTAGT$", vec![5, 2, 3, 0, 4, 1])]
    #[test_case("ATAAATG$", vec![7, 2, 3, 0, 4, 6, 1, 5])]
    #[test_case("banana$", vec![6, 5, 3, 1, 0, 4, 2])]
    fn builds_known_arrays(input: &str, expected: Vec<usize>) {
        let sa = build_suffix_array(&text(input)).unwrap();
        assert_eq!(sa.as_slice(), expected.as_slice());
    }

    #[test]
    fn matches_naive_sort_on_random_texts() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let len = rng.gen_range(0..60);
            let sigma = rng.gen_range(1..5u8);
            let body: Vec<u8> = (0..len).map(|_| b'a' + rng.gen_range(0..sigma)).collect();
            let text = Text::with_sentinel(&body, b'$').unwrap();

            let sa = build_suffix_array(&text).unwrap();
            assert_eq!(sa.as_slice(), naive_suffix_array(&text).as_slice(), "{body:?}");
        }
    }

    #[test]
    fn result_is_permutation_with_sentinel_first() {
        let text = text("mississippi$");
        let sa = build_suffix_array(&text).unwrap();

        let mut sorted = sa.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..text.len()).collect::<Vec<_>>());
        assert_eq!(sa[0], text.len() - 1);

        for i in 1..sa.len() {
            assert!(sa.suffix(&text, i - 1) < sa.suffix(&text, i));
        }
    }

    #[test]
    fn inverse_undoes_permutation() {
        let sa = build_suffix_array(&text("GTAGT$")).unwrap();
        let inv = sa.inverse();
        for (rank, &pos) in sa.iter().enumerate() {
            assert_eq!(inv[pos], rank);
        }
    }

    #[test]
    fn declared_alphabet_drives_ranks() {
        let alphabet = Alphabet::new(b"ACGT", b'$').unwrap();
        let text = Text::with_alphabet(b"GTAGT", &alphabet).unwrap();
        let sa = build_suffix_array_with(&text, &alphabet).unwrap();
        assert_eq!(sa.as_slice(), &[5, 2, 3, 0, 4, 1]);

        let narrow = Alphabet::new(b"AG", b'$').unwrap();
        assert!(build_suffix_array_with(&text, &narrow).is_err());
    }

    #[test]
    fn from_positions_validates() {
        let text = text("GTAGT$");
        assert!(SuffixArray::from_positions(&text, vec![5, 2, 3, 0, 4, 1]).is_ok());
        assert!(SuffixArray::from_positions(&text, vec![5, 2, 3, 0, 4]).is_err());
        assert!(SuffixArray::from_positions(&text, vec![5, 2, 2, 0, 4, 1]).is_err());
        assert!(SuffixArray::from_positions(&text, vec![5, 2, 3, 0, 4, 9]).is_err());
        assert!(SuffixArray::from_positions(&text, vec![2, 5, 3, 0, 4, 1]).is_err());
    }
}
