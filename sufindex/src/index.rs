use std::collections::BTreeSet;

use log::debug;

use crate::StringSearch;
use crate::error::Result;
use crate::lcp::{LcpArray, build_lcp_array};
use crate::matcher;
use crate::suffix_array::{SuffixArray, build_suffix_array};
use crate::suffix_tree::{SuffixTree, build_suffix_tree};
use crate::text::Text;

pub const DEFAULT_SENTINEL: u8 = b'$';

/// Input to [`StringSearch::build`]: a text body and the sentinel to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub text: Vec<u8>,
    pub sentinel: u8,
}

impl IndexConfig {
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        Self {
            text: text.into(),
            sentinel: DEFAULT_SENTINEL,
        }
    }

    pub fn with_sentinel(mut self, sentinel: u8) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn into_text(self) -> Result<Text> {
        Text::with_sentinel(&self.text, self.sentinel)
    }
}

/// A text together with its suffix array and LCP array.
///
/// The suffix tree borrows the text, so it is built on request through
/// [`SuffixIndex::suffix_tree`] rather than stored here.
#[derive(Debug, Clone)]
pub struct SuffixIndex {
    text: Text,
    suffix_array: SuffixArray,
    lcp: LcpArray,
}

impl SuffixIndex {
    pub fn new(text: Text) -> Result<Self> {
        let suffix_array = build_suffix_array(&text)?;
        let lcp = build_lcp_array(&text, &suffix_array)?;
        debug!("suffix index ready: n={}", text.len());

        Ok(Self {
            text,
            suffix_array,
            lcp,
        })
    }

    pub fn from_bytes(body: &[u8], sentinel: u8) -> Result<Self> {
        Self::new(Text::with_sentinel(body, sentinel)?)
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn suffix_array(&self) -> &SuffixArray {
        &self.suffix_array
    }

    pub fn lcp_array(&self) -> &LcpArray {
        &self.lcp
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn find_range(&self, pattern: &[u8]) -> (usize, usize) {
        matcher::find_range(&self.text, pattern, &self.suffix_array)
    }

    pub fn find_positions(&self, pattern: &[u8]) -> BTreeSet<usize> {
        matcher::find_positions(&self.text, pattern, &self.suffix_array)
    }

    pub fn count(&self, pattern: &[u8]) -> usize {
        matcher::count(&self.text, pattern, &self.suffix_array)
    }

    pub fn contains(&self, pattern: &[u8]) -> bool {
        matcher::contains(&self.text, pattern, &self.suffix_array)
    }

    pub fn suffix_tree(&self) -> Result<SuffixTree<'_>> {
        build_suffix_tree(&self.text, &self.suffix_array, &self.lcp)
    }
}

/// Substring search backed by a [`SuffixIndex`].
pub struct SuffixArraySearch;

impl StringSearch for SuffixArraySearch {
    type Config = IndexConfig;
    type State = SuffixIndex;

    fn build(config: Self::Config) -> Result<Self::State> {
        SuffixIndex::new(config.into_text()?)
    }

    fn find_all_bytes(state: &Self::State, pattern: &[u8]) -> Vec<usize> {
        state.find_positions(pattern).into_iter().collect()
    }

    fn find_bytes(state: &Self::State, pattern: &[u8]) -> Option<usize> {
        state.find_positions(pattern).first().copied()
    }
}
