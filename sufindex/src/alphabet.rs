// Dense symbol ranking so the suffix sorter can bucket by counting sort.
use crate::error::{IndexError, Result};
use crate::text::Text;

#[derive(Debug, Clone)]
pub struct Alphabet {
    byte_to_rank: [i16; 256],
    rank_to_byte: Vec<u8>,
    counts: Vec<usize>,
    sentinel: u8,
}

impl Alphabet {
    /// A caller-declared alphabet. The sentinel takes rank 0 and must sort
    /// strictly below every symbol.
    pub fn new(symbols: &[u8], sentinel: u8) -> Result<Self> {
        // Presence only; declared alphabets carry no frequencies.
        let mut counts_by_byte = [0usize; 256];
        for &b in symbols {
            if b <= sentinel {
                return Err(IndexError::invalid(format!(
                    "alphabet symbol '{}' does not sort above the sentinel '{}'",
                    b.escape_ascii(),
                    sentinel.escape_ascii()
                )));
            }
            counts_by_byte[b as usize] = 1;
        }
        counts_by_byte[sentinel as usize] = 1;

        let mut alphabet = Self::from_counts(&counts_by_byte, sentinel);
        alphabet.counts.iter_mut().for_each(|c| *c = 0);
        Ok(alphabet)
    }

    /// The alphabet actually observed in `text`, with per-symbol counts.
    pub fn from_text(text: &Text) -> Self {
        let mut counts_by_byte = [0usize; 256];
        for &b in text.as_bytes() {
            counts_by_byte[b as usize] += 1;
        }
        Self::from_counts(&counts_by_byte, text.sentinel())
    }

    fn from_counts(counts_by_byte: &[usize; 256], sentinel: u8) -> Self {
        let mut byte_to_rank = [-1i16; 256];
        let mut rank_to_byte = Vec::new();
        let mut counts = Vec::new();

        for byte in 0..256usize {
            let count = counts_by_byte[byte];
            if count == 0 {
                continue;
            }
            byte_to_rank[byte] = rank_to_byte.len() as i16;
            rank_to_byte.push(byte as u8);
            counts.push(count);
        }

        Self {
            byte_to_rank,
            rank_to_byte,
            counts,
            sentinel,
        }
    }

    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }

    /// Number of distinct symbols, sentinel included.
    pub fn sigma(&self) -> usize {
        self.rank_to_byte.len()
    }

    pub fn rank(&self, byte: u8) -> Option<usize> {
        let rank = self.byte_to_rank[byte as usize];
        if rank < 0 { None } else { Some(rank as usize) }
    }

    pub fn symbol(&self, rank: usize) -> Option<u8> {
        self.rank_to_byte.get(rank).copied()
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.rank(byte).is_some()
    }

    /// Occurrences per rank. All zero for a declared alphabet.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Maps every position of `text` to its symbol rank.
    pub fn ranks(&self, text: &Text) -> Result<Vec<usize>> {
        text.as_bytes()
            .iter()
            .enumerate()
            .map(|(pos, &b)| {
                self.rank(b).ok_or_else(|| {
                    IndexError::invalid(format!(
                        "symbol '{}' at position {} has no rank in this alphabet",
                        b.escape_ascii(),
                        pos
                    ))
                })
            })
            .collect()
    }
}
