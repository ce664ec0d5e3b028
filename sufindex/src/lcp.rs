use std::ops::Deref;

use log::debug;

use crate::error::Result;
use crate::suffix_array::{check_permutation, inverse_permutation};
use crate::text::Text;

/// `lcp[i]` is the longest common prefix length of the suffixes at sorted
/// indices `i` and `i + 1`. Holds `n - 1` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcpArray {
    lcp: Vec<usize>,
}

impl LcpArray {
    pub fn build(text: &Text, suffix_array: &[usize]) -> Result<Self> {
        build_lcp_array(text, suffix_array)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.lcp
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.lcp
    }
}

impl Deref for LcpArray {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.lcp
    }
}

/// Kasai's linear-time LCP construction.
///
/// Positions are visited in text order. If suffix `p` shares `h` symbols with
/// its sorted successor, suffix `p + 1` shares at least `h - 1` with its own,
/// so the comparison resumes from the carried value instead of zero.
pub fn build_lcp_array(text: &Text, suffix_array: &[usize]) -> Result<LcpArray> {
    let bytes = text.as_bytes();
    let n = bytes.len();
    check_permutation(suffix_array, n)?;

    let rank_of_position = inverse_permutation(suffix_array);
    let mut lcp = vec![0usize; n - 1];

    let mut h = 0usize;
    for p in 0..n {
        let order_index = rank_of_position[p];
        if order_index == n - 1 {
            h = 0;
            continue;
        }

        let next_p = suffix_array[order_index + 1];
        while p + h < n && next_p + h < n && bytes[p + h] == bytes[next_p + h] {
            h += 1;
        }
        lcp[order_index] = h;
        h = h.saturating_sub(1);
    }

    debug!("lcp array built: n={n}, max lcp={}", lcp.iter().max().copied().unwrap_or(0));
    Ok(LcpArray { lcp })
}
