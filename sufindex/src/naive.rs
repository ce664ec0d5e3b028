use crate::StringSearch;
use crate::error::Result;
use crate::index::IndexConfig;
use crate::text::Text;

/// Brute-force scanner over a validated text. Serves as the reference the
/// suffix array search is checked against.
pub struct Naive;

impl StringSearch for Naive {
    type Config = IndexConfig;
    type State = Text;

    fn build(config: Self::Config) -> Result<Self::State> {
        config.into_text()
    }

    fn find_all_bytes(state: &Self::State, pattern: &[u8]) -> Vec<usize> {
        naive_find_all(state.as_bytes(), pattern)
    }
}

/// Every position `p` with `text[p..p + m] == pattern`, ascending.
/// An empty pattern matches at each of the `n` positions.
pub fn naive_find_all(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    let n = text.len();
    let m = pattern.len();

    if m == 0 {
        return (0..n).collect();
    }
    if m > n {
        return Vec::new();
    }

    let mut result = Vec::new();
    for i in 0..=n - m {
        let mut matched = true;
        for j in 0..m {
            if text[i + j] != pattern[j] {
                matched = false;
                break;
            }
        }
        if matched {
            result.push(i);
        }
    }

    result
}
