//! Multi-level match statistic tree.
//!
//! One tree holds a whole tournament's history: year nodes under the
//! root, then match, map, and team (or round) nodes, with score or
//! round-outcome tuples at the leaves. Trees are write-once: built by
//! sequence insertion and year merging, then only queried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod query;

pub use query::{best_buy_for_map, best_side_for_map, nodes_under, BuyType, SideVerdict};

/// Tree operation errors.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("cannot insert into an empty tree")]
    EmptyTree,

    #[error("tree holds no data at the expected depth")]
    Unpopulated,
}

/// Label stored at one tree node.
///
/// Interior nodes carry text (year, match, map, team); leaves carry one
/// of the two metric tuples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeLabel {
    Text(String),
    /// Rounds won attacking / defending by one team on one map.
    SideScore { attack: u32, defend: u32 },
    /// Winning team and buy-type label of one round.
    RoundOutcome { winner: String, buy: String },
}

impl TreeLabel {
    pub fn text(value: impl Into<String>) -> Self {
        TreeLabel::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TreeLabel::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One tree input row: a 4-field record describing a single
/// team-on-map observation within a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRow {
    pub match_name: String,
    pub map_name: String,
    /// Team name for score rows, round number for economy rows.
    pub group: String,
    pub leaf: TreeLabel,
}

/// A labeled N-ary tree.
///
/// `label` is `None` only for the one empty-tree sentinel, which has no
/// children and accepts no insertions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatTree {
    label: Option<TreeLabel>,
    children: Vec<StatTree>,
}

impl StatTree {
    /// The empty-tree sentinel.
    pub fn empty() -> Self {
        Self {
            label: None,
            children: Vec::new(),
        }
    }

    /// A single-node tree.
    pub fn new(label: TreeLabel) -> Self {
        Self {
            label: Some(label),
            children: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
    }

    pub fn label(&self) -> Option<&TreeLabel> {
        self.label.as_ref()
    }

    pub fn children(&self) -> &[StatTree] {
        &self.children
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            1 + self.children.iter().map(StatTree::len).sum::<usize>()
        }
    }

    /// Ensure a path `root -> items[0] -> ... -> items[k-1]` exists.
    ///
    /// At each level only the next label is matched against existing
    /// children (left-most match wins); once no child matches, the rest
    /// of the sequence is appended as a fresh chain without further
    /// de-duplication. Empty input is a no-op.
    pub fn insert_sequence(&mut self, items: &[TreeLabel]) -> Result<(), TreeError> {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        let Some((first, rest)) = items.split_first() else {
            return Ok(());
        };

        match self
            .children
            .iter_mut()
            .find(|child| child.label.as_ref() == Some(first))
        {
            Some(child) => child.insert_sequence(rest),
            None => {
                let mut node = StatTree::new(first.clone());
                node.append_chain(rest);
                self.children.push(node);
                Ok(())
            }
        }
    }

    /// Append the remaining labels as a singleton chain.
    fn append_chain(&mut self, items: &[TreeLabel]) {
        if let Some((first, rest)) = items.split_first() {
            let mut node = StatTree::new(first.clone());
            node.append_chain(rest);
            self.children.push(node);
        }
    }

    /// Append whole subtrees as children, in order, without
    /// de-duplication. Distinct sources stay separate branches even
    /// when their root labels coincide. Empty sentinels carry no label
    /// and are skipped.
    pub fn merge_subtrees(&mut self, subtrees: Vec<StatTree>) -> Result<(), TreeError> {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        for subtree in subtrees {
            if subtree.is_empty() {
                tracing::warn!("skipping empty subtree in merge");
                continue;
            }
            self.children.push(subtree);
        }
        Ok(())
    }

    /// All nodes exactly `depth` levels below this one (`0` = self).
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<&StatTree> {
        let mut out = Vec::new();
        self.collect_at_depth(depth, &mut out);
        out
    }

    fn collect_at_depth<'a>(&'a self, depth: usize, out: &mut Vec<&'a StatTree>) {
        if self.is_empty() {
            return;
        }
        if depth == 0 {
            out.push(self);
            return;
        }
        for child in &self.children {
            child.collect_at_depth(depth - 1, out);
        }
    }
}

/// Build one year's tree from its round rows.
///
/// Each row becomes the sequence `match -> map -> group -> leaf` under
/// a root labeled with the year.
pub fn build_year_tree(year_label: &str, rows: &[RoundRow]) -> Result<StatTree, TreeError> {
    let mut tree = StatTree::new(TreeLabel::text(year_label));
    for row in rows {
        tree.insert_sequence(&[
            TreeLabel::text(&row.match_name),
            TreeLabel::text(&row.map_name),
            TreeLabel::text(&row.group),
            row.leaf.clone(),
        ])?;
    }
    Ok(tree)
}

/// Merge per-year trees under a new tournament root.
pub fn build_tournament_tree(
    root_label: &str,
    years: Vec<StatTree>,
) -> Result<StatTree, TreeError> {
    let mut tree = StatTree::new(TreeLabel::text(root_label));
    tree.merge_subtrees(years)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_seq(items: &[&str]) -> Vec<TreeLabel> {
        items.iter().map(|s| TreeLabel::text(*s)).collect()
    }

    #[test]
    fn test_insert_sequence_builds_path() {
        let mut tree = StatTree::new(TreeLabel::text("root"));
        tree.insert_sequence(&text_seq(&["1", "2", "3"])).unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.nodes_at_depth(3).len(), 1);
        assert_eq!(
            tree.nodes_at_depth(3)[0].label().unwrap().as_text(),
            Some("3")
        );
    }

    #[test]
    fn test_insert_sequence_reuses_leftmost_prefix() {
        let mut tree = StatTree::new(TreeLabel::text("root"));
        tree.insert_sequence(&text_seq(&["1", "2", "3"])).unwrap();
        tree.insert_sequence(&text_seq(&["1", "3", "5"])).unwrap();

        // Still one child under the root.
        assert_eq!(tree.children().len(), 1);
        let one = &tree.children()[0];
        assert_eq!(one.label().unwrap().as_text(), Some("1"));

        // "1" now has two children: "2" and "3".
        let labels: Vec<_> = one
            .children()
            .iter()
            .map(|c| c.label().unwrap().as_text().unwrap())
            .collect();
        assert_eq!(labels, vec!["2", "3"]);
    }

    #[test]
    fn test_insert_sequence_duplicate_suffix_not_shared() {
        let mut tree = StatTree::new(TreeLabel::text("root"));
        tree.insert_sequence(&text_seq(&["a", "x"])).unwrap();
        tree.insert_sequence(&text_seq(&["b", "x"])).unwrap();

        // Each branch owns its own "x" node.
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.nodes_at_depth(2).len(), 2);
    }

    #[test]
    fn test_insert_sequence_empty_is_noop() {
        let mut tree = StatTree::new(TreeLabel::text("root"));
        tree.insert_sequence(&[]).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_into_empty_sentinel_fails() {
        let mut tree = StatTree::empty();
        let err = tree.insert_sequence(&text_seq(&["1"])).unwrap_err();
        assert!(matches!(err, TreeError::EmptyTree));
    }

    #[test]
    fn test_merge_subtrees_keeps_duplicate_roots() {
        let mut tree = StatTree::new(TreeLabel::text("vct"));
        tree.merge_subtrees(vec![
            StatTree::new(TreeLabel::text("2021")),
            StatTree::new(TreeLabel::text("2021")),
            StatTree::empty(),
        ])
        .unwrap();

        // Both year trees kept as separate branches; sentinel skipped.
        assert_eq!(tree.children().len(), 2);
    }

    #[test]
    fn test_build_year_tree_shapes_rows() {
        let rows = vec![
            RoundRow {
                match_name: "team a vs team b".into(),
                map_name: "Ascent".into(),
                group: "team a".into(),
                leaf: TreeLabel::SideScore {
                    attack: 7,
                    defend: 6,
                },
            },
            RoundRow {
                match_name: "team a vs team b".into(),
                map_name: "Ascent".into(),
                group: "team b".into(),
                leaf: TreeLabel::SideScore {
                    attack: 4,
                    defend: 8,
                },
            },
        ];
        let tree = build_year_tree("2023", &rows).unwrap();

        // year -> match -> map -> 2 teams -> 2 leaves
        assert_eq!(tree.children().len(), 1);
        assert_eq!(tree.nodes_at_depth(2).len(), 1);
        assert_eq!(tree.nodes_at_depth(3).len(), 2);
        assert_eq!(tree.nodes_at_depth(4).len(), 2);
    }

    #[test]
    fn test_len_empty() {
        assert_eq!(StatTree::empty().len(), 0);
        assert!(StatTree::empty().is_empty());
    }
}
