pub mod alphabet;
pub mod error;
pub mod index;
pub mod lcp;
pub mod matcher;
pub mod naive;
pub mod suffix_array;
pub mod suffix_tree;
pub mod text;

use crate::error::Result;

/// Common interface of the substring searchers in this crate.
///
/// `build` turns a configuration into whatever state the searcher queries,
/// e.g. the validated text for a scan or a full suffix index.
pub trait StringSearch {
    type Config;
    type State;

    fn build(config: Self::Config) -> Result<Self::State>;

    /// All start positions of `pattern`, ascending.
    fn find_all_bytes(state: &Self::State, pattern: &[u8]) -> Vec<usize>;

    fn find_bytes(state: &Self::State, pattern: &[u8]) -> Option<usize> {
        Self::find_all_bytes(state, pattern).first().copied()
    }

    fn find(state: &Self::State, pattern: &str) -> Option<usize> {
        Self::find_bytes(state, pattern.as_bytes())
    }

    fn find_all(state: &Self::State, pattern: &str) -> Vec<usize> {
        Self::find_all_bytes(state, pattern.as_bytes())
    }
}

pub use alphabet::Alphabet;
pub use error::IndexError;
pub use index::{IndexConfig, SuffixArraySearch, SuffixIndex};
pub use lcp::{LcpArray, build_lcp_array};
pub use matcher::{find_positions, find_range};
pub use naive::Naive;
pub use suffix_array::{SuffixArray, build_suffix_array, build_suffix_array_with};
pub use suffix_tree::{NodeId, SuffixTree, build_suffix_tree};
pub use text::{Span, Text};
