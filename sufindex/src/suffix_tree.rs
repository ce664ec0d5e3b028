//! Suffix tree built in one pass from a suffix array and its LCP array.
//!
//! Nodes live in a flat arena and refer to each other by index. Every node
//! except the root owns exactly one incoming edge, so the edge span is stored
//! on the child. Edge labels are spans into the borrowed [`Text`]; no substring
//! is ever copied during construction.
use log::debug;

use crate::error::{IndexError, Result};
use crate::suffix_array::check_permutation;
use crate::text::{Span, Text};

pub type NodeId = usize;

pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
    edge: Span,
    suffix: Option<usize>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in ascending order of their edge's first symbol.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Length of the path label from the root to this node.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Span of the incoming edge. Empty for the root.
    pub fn edge(&self) -> Span {
        self.edge
    }

    /// Start of the suffix spelled by this leaf, `None` for inner nodes.
    pub fn suffix_start(&self) -> Option<usize> {
        self.suffix
    }

    pub fn is_leaf(&self) -> bool {
        self.suffix.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SuffixTree<'t> {
    text: &'t Text,
    nodes: Vec<Node>,
}

/// Builds the suffix tree of `text` from its suffix array and LCP array.
///
/// Suffixes must arrive in suffix-array order: each one then shares a prefix
/// only with its predecessor, and the branch point is always on the rightmost
/// path of the tree built so far. The arrays are checked for consistent
/// lengths, for being a permutation that starts with the sentinel suffix and
/// for LCP values that fit the suffixes they describe. Suffixes found out of
/// order during the pass are reported as invalid input as well.
pub fn build_suffix_tree<'t>(
    text: &'t Text,
    suffix_array: &[usize],
    lcp_array: &[usize],
) -> Result<SuffixTree<'t>> {
    let n = text.len();
    check_permutation(suffix_array, n)?;
    if lcp_array.len() != n - 1 {
        return Err(IndexError::invalid(format!(
            "lcp array has {} entries, expected {} for a suffix array of length {}",
            lcp_array.len(),
            n - 1,
            n
        )));
    }
    if suffix_array[0] != n - 1 {
        return Err(IndexError::invalid(
            "suffix array does not start with the sentinel suffix",
        ));
    }
    for (i, &h) in lcp_array.iter().enumerate() {
        let limit = n - suffix_array[i].max(suffix_array[i + 1]);
        if h >= limit {
            return Err(IndexError::invalid(format!(
                "lcp[{i}] = {h} does not fit suffixes {} and {}",
                suffix_array[i],
                suffix_array[i + 1]
            )));
        }
    }

    let mut tree = SuffixTree {
        text,
        nodes: Vec::with_capacity(2 * n),
    };
    tree.nodes.push(Node {
        parent: None,
        children: Vec::new(),
        depth: 0,
        edge: Span::default(),
        suffix: None,
    });

    let mut current = ROOT;
    let mut lcp_prev = 0usize;

    for (i, &start) in suffix_array.iter().enumerate() {
        while tree.nodes[current].depth > lcp_prev {
            current = tree.parent_of(current);
        }

        let depth = tree.nodes[current].depth;
        let branch = if depth == lcp_prev {
            current
        } else {
            let Some(&child) = tree.nodes[current].children.last() else {
                unreachable!("node {current} above the previous leaf has no children");
            };
            tree.split_edge(current, child, lcp_prev - depth)
        };

        current = tree.add_leaf(branch, start, lcp_prev).ok_or_else(|| {
            IndexError::invalid(format!(
                "suffix {start} at index {i} is out of order with its predecessor"
            ))
        })?;

        lcp_prev = lcp_array.get(i).copied().unwrap_or(0);
    }

    debug!(
        "suffix tree built: n={n}, nodes={}, internal={}",
        tree.node_count(),
        tree.internal_count()
    );
    Ok(tree)
}

impl<'t> SuffixTree<'t> {
    pub fn text(&self) -> &'t Text {
        self.text
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Branching nodes, root included.
    pub fn internal_count(&self) -> usize {
        self.node_count() - self.leaf_count()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id].is_leaf()
    }

    pub fn suffix_start(&self, id: NodeId) -> Option<usize> {
        self.nodes[id].suffix
    }

    /// String depth, maintained during construction.
    pub fn node_depth(&self, id: NodeId) -> usize {
        self.nodes[id].depth
    }

    /// Path label of `id`, reassembled from the edge spans up to the root.
    pub fn node_substring(&self, id: NodeId) -> Vec<u8> {
        let mut spans = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.nodes[cur].parent {
            spans.push(self.nodes[cur].edge);
            cur = parent;
        }

        let mut out = Vec::with_capacity(self.nodes[id].depth);
        for span in spans.iter().rev() {
            out.extend_from_slice(self.text.span(*span));
        }
        out
    }

    /// Span of the edge `(parent, child)`, if that edge exists.
    pub fn edge(&self, parent: NodeId, child: NodeId) -> Option<Span> {
        let node = self.nodes.get(child)?;
        (node.parent == Some(parent)).then_some(node.edge)
    }

    /// Label of the edge entering `id`.
    pub fn edge_label(&self, id: NodeId) -> &'t [u8] {
        self.text.span(self.nodes[id].edge)
    }

    /// Nodes in depth-first order, children visited lexicographically.
    pub fn preorder(&self) -> Preorder<'_, 't> {
        self.preorder_from(ROOT)
    }

    pub fn preorder_from(&self, id: NodeId) -> Preorder<'_, 't> {
        Preorder {
            tree: self,
            stack: vec![id],
        }
    }

    /// Leaves in lexicographic order of their suffixes.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.preorder().filter(|&id| self.is_leaf(id))
    }

    /// Every edge as `(parent, child, span)`, in depth-first order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, Span)> + '_ {
        self.preorder().filter_map(|id| {
            let node = &self.nodes[id];
            node.parent.map(|parent| (parent, id, node.edge))
        })
    }

    /// Highest node whose path label starts with `pattern`.
    pub fn locate(&self, pattern: &[u8]) -> Option<NodeId> {
        let bytes = self.text.as_bytes();
        let mut node = ROOT;
        let mut matched = 0usize;

        while matched < pattern.len() {
            let children = &self.nodes[node].children;
            let slot = children
                .binary_search_by_key(&pattern[matched], |&c| bytes[self.nodes[c].edge.start])
                .ok()?;
            let child = children[slot];

            let label = self.edge_label(child);
            let take = label.len().min(pattern.len() - matched);
            if label[..take] != pattern[matched..matched + take] {
                return None;
            }

            matched += take;
            node = child;
        }

        Some(node)
    }

    pub fn contains(&self, pattern: &[u8]) -> bool {
        self.locate(pattern).is_some()
    }

    /// Sorted start positions of every occurrence of `pattern`.
    pub fn occurrences(&self, pattern: &[u8]) -> Vec<usize> {
        let Some(locus) = self.locate(pattern) else {
            return Vec::new();
        };

        let mut out: Vec<usize> = self
            .preorder_from(locus)
            .filter_map(|id| self.nodes[id].suffix)
            .collect();
        out.sort_unstable();
        out
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        match self.nodes[id].parent {
            Some(parent) => parent,
            None => unreachable!("climbed above the root"),
        }
    }

    /// Splits edge `(parent, child)` after `offset` symbols; returns the new node.
    fn split_edge(&mut self, parent: NodeId, child: NodeId, offset: usize) -> NodeId {
        let span = self.nodes[child].edge;
        assert!(
            offset > 0 && offset < span.len(),
            "split offset {offset} outside edge of length {}",
            span.len()
        );

        let mid = self.nodes.len();
        let depth = self.nodes[parent].depth + offset;
        self.nodes.push(Node {
            parent: Some(parent),
            children: vec![child],
            depth,
            edge: Span::new(span.start, span.start + offset),
            suffix: None,
        });

        let node = &mut self.nodes[child];
        node.edge = Span::new(span.start + offset, span.end);
        node.parent = Some(mid);

        let Some(slot) = self.nodes[parent].children.iter().position(|&c| c == child) else {
            unreachable!("node {child} missing from the children of {parent}");
        };
        self.nodes[parent].children[slot] = mid;

        mid
    }

    /// Hangs the leaf for suffix `start` below `parent`.
    ///
    /// Returns `None` when the new edge would not sort after its last sibling,
    /// which only happens if the suffixes were not fed in sorted order.
    fn add_leaf(&mut self, parent: NodeId, start: usize, lcp: usize) -> Option<NodeId> {
        let n = self.text.len();
        let bytes = self.text.as_bytes();
        assert_eq!(self.nodes[parent].depth, lcp);

        let edge = Span::new(start + lcp, n);
        if let Some(&last) = self.nodes[parent].children.last() {
            if bytes[self.nodes[last].edge.start] >= bytes[edge.start] {
                return None;
            }
        }

        let leaf = self.nodes.len();
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            depth: n - start,
            edge,
            suffix: Some(start),
        });
        self.nodes[parent].children.push(leaf);
        Some(leaf)
    }
}

pub struct Preorder<'a, 't> {
    tree: &'a SuffixTree<'t>,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[id].children.iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcp::build_lcp_array;
    use crate::suffix_array::build_suffix_array;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn text(s: &str) -> Text {
        Text::new(s.as_bytes().to_vec(), b'$').unwrap()
    }

    fn arrays(text: &Text) -> (Vec<usize>, Vec<usize>) {
        let sa = build_suffix_array(text).unwrap();
        let lcp = build_lcp_array(text, &sa).unwrap();
        (sa.into_inner(), lcp.into_inner())
    }

    fn check_structure(tree: &SuffixTree<'_>) {
        let text = tree.text();
        let n = text.len();

        assert_eq!(tree.leaf_count(), n);
        assert!(tree.internal_count() <= n.max(2) - 1);

        for id in tree.preorder() {
            assert_eq!(tree.node_depth(id), tree.node_substring(id).len());

            if let Some(start) = tree.suffix_start(id) {
                assert!(tree.children(id).is_empty());
                assert_eq!(tree.node_substring(id), text.suffix(start));
            } else if id != ROOT || n > 1 {
                let firsts: Vec<u8> = tree
                    .children(id)
                    .iter()
                    .map(|&c| tree.edge_label(c)[0])
                    .collect();
                assert!(firsts.len() >= 2, "inner node {id} has {} children", firsts.len());
                assert!(firsts.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn builds_gtagt() {
        let text = text("GTAGT$");
        let (sa, lcp) = arrays(&text);
        let tree = build_suffix_tree(&text, &sa, &lcp).unwrap();

        assert_eq!(tree.node_count(), 9);
        let labels: Vec<&[u8]> = tree
            .children(ROOT)
            .iter()
            .map(|&c| tree.edge_label(c))
            .collect();
        assert_eq!(labels, vec![&b"$"[..], &b"AGT$"[..], &b"GT"[..], &b"T"[..]]);

        let gt = tree.children(ROOT)[2];
        assert_eq!(tree.node_depth(gt), 2);
        assert_eq!(tree.node_substring(gt), b"GT");
        let below: Vec<&[u8]> = tree.children(gt).iter().map(|&c| tree.edge_label(c)).collect();
        assert_eq!(below, vec![&b"$"[..], &b"AGT$"[..]]);

        check_structure(&tree);
    }

    #[test]
    fn sentinel_only_text_has_single_leaf() {
        let text = text("$");
        let tree = build_suffix_tree(&text, &[0], &[]).unwrap();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.leaf_count(), 1);
        let leaf = tree.children(ROOT)[0];
        assert_eq!(tree.suffix_start(leaf), Some(0));
        assert_eq!(tree.edge(ROOT, leaf), Some(Span::new(0, 1)));
    }

    #[test]
    fn leaves_follow_suffix_array_order() {
        let text = text("mississippi$");
        let (sa, lcp) = arrays(&text);
        let tree = build_suffix_tree(&text, &sa, &lcp).unwrap();

        let starts: Vec<usize> = tree.leaves().filter_map(|id| tree.suffix_start(id)).collect();
        assert_eq!(starts, sa);
        check_structure(&tree);
    }

    #[test]
    fn edge_lookup_requires_real_parent() {
        let text = text("AAA$");
        let (sa, lcp) = arrays(&text);
        let tree = build_suffix_tree(&text, &sa, &lcp).unwrap();

        for (parent, child, span) in tree.edges() {
            assert_eq!(tree.edge(parent, child), Some(span));
            assert_eq!(tree.edge(child, parent), None);
        }
        assert_eq!(tree.edge(ROOT, tree.node_count()), None);
    }

    #[test]
    fn random_texts_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..150 {
            let len = rng.gen_range(0..50);
            let body: Vec<u8> = (0..len).map(|_| b'a' + rng.gen_range(0..3u8)).collect();
            let text = Text::with_sentinel(&body, b'$').unwrap();
            let (sa, lcp) = arrays(&text);
            let tree = build_suffix_tree(&text, &sa, &lcp).unwrap();
            check_structure(&tree);
        }
    }

    #[test]
    fn occurrences_match_scan() {
        let text = text("GAGAGA$");
        let (sa, lcp) = arrays(&text);
        let tree = build_suffix_tree(&text, &sa, &lcp).unwrap();

        assert_eq!(tree.occurrences(b"GA"), vec![0, 2, 4]);
        assert_eq!(tree.occurrences(b"AG"), vec![1, 3]);
        assert_eq!(tree.occurrences(b"GAGAGA"), vec![0]);
        assert_eq!(tree.occurrences(b""), (0..7).collect::<Vec<_>>());
        assert!(tree.occurrences(b"GG").is_empty());
        assert!(tree.occurrences(b"GAGAGAG").is_empty());
        assert!(tree.contains(b"AGA"));
        assert!(!tree.contains(b"C"));
    }

    #[test]
    fn rejects_inconsistent_lengths() {
        let text = text("GTAGT$");
        let (sa, _) = arrays(&text);
        assert!(build_suffix_tree(&text, &sa, &[0, 0, 2]).is_err());
        assert!(build_suffix_tree(&text, &sa[..5], &[0, 0, 2, 0]).is_err());
    }

    #[test]
    fn rejects_unsorted_suffixes() {
        let text = text("GTAGT$");
        let err = build_suffix_tree(&text, &[5, 3, 2, 0, 4, 1], &[0, 0, 2, 0, 1]).unwrap_err();
        assert!(matches!(err, IndexError::InvalidInput { .. }));

        assert!(build_suffix_tree(&text, &[2, 5, 3, 0, 4, 1], &[0, 0, 2, 0, 1]).is_err());
    }

    #[test]
    fn rejects_oversized_lcp() {
        let text = text("GTAGT$");
        let (sa, _) = arrays(&text);
        assert!(build_suffix_tree(&text, &sa, &[0, 0, 3, 0, 1]).is_err());
    }
}
