use std::collections::BTreeSet;

use log::debug;
use sufindex::StringSearch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchMatch {
    pub pattern_index: usize,
    pub position: usize,
}

pub fn execute<S, P>(state: &S::State, pattern: P) -> Vec<Match>
where
    S: StringSearch,
    P: AsRef<[u8]>,
{
    S::find_all_bytes(state, pattern.as_ref())
        .into_iter()
        .map(|position| Match { position })
        .collect()
}

/// Runs every pattern against the same searcher state. Matches are grouped by
/// pattern, in the order the patterns were given, then by position.
pub fn execute_all<S, P>(state: &S::State, patterns: &[P]) -> Vec<BatchMatch>
where
    S: StringSearch,
    P: AsRef<[u8]>,
{
    let mut matches = Vec::new();

    for (pattern_index, pattern) in patterns.iter().enumerate() {
        let positions = S::find_all_bytes(state, pattern.as_ref());
        debug!("pattern {pattern_index}: {} matches", positions.len());

        matches.extend(positions.into_iter().map(|position| BatchMatch {
            pattern_index,
            position,
        }));
    }

    matches
}

/// Distinct positions hit by any pattern of a batch.
pub fn coalesce(matches: &[BatchMatch]) -> BTreeSet<usize> {
    matches.iter().map(|m| m.position).collect()
}
