//! Depth-scoped aggregate queries.
//!
//! The tree follows a fixed depth convention below the tournament
//! root: 1 = year, 2 = match, 3 = map, 4 = team or round, 5 = leaf
//! tuple. Queries anchor on the map level and aggregate every leaf
//! beneath the matching nodes.

use serde::{Deserialize, Serialize};

use super::{StatTree, TreeError, TreeLabel};

/// Depth of map labels below the tournament root.
const MAP_DEPTH: usize = 3;
/// Depth of leaf tuples below the tournament root.
const LEAF_DEPTH: usize = 5;

/// Collect all nodes `target_depth` levels below the root whose
/// ancestor at `anchor_depth` satisfies the predicate.
///
/// The two map queries share this traversal instead of each hard-coding
/// a five-level nested loop.
pub fn nodes_under<'a, P>(
    tree: &'a StatTree,
    anchor_depth: usize,
    target_depth: usize,
    predicate: P,
) -> Vec<&'a StatTree>
where
    P: Fn(&TreeLabel) -> bool,
{
    debug_assert!(anchor_depth <= target_depth);

    let mut out = Vec::new();
    for anchor in tree.nodes_at_depth(anchor_depth) {
        if anchor.label().is_some_and(&predicate) {
            out.extend(anchor.nodes_at_depth(target_depth - anchor_depth));
        }
    }
    out
}

fn leaves_for_map<'a>(tree: &'a StatTree, map: &str) -> Vec<&'a TreeLabel> {
    nodes_under(tree, MAP_DEPTH, LEAF_DEPTH, |label| {
        label
            .as_text()
            .is_some_and(|name| name.eq_ignore_ascii_case(map))
    })
    .into_iter()
    .filter_map(StatTree::label)
    .collect()
}

/// Which side a map favours, judged by total rounds won per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideVerdict {
    AttackerSided,
    DefenderSided,
    Neutral,
}

impl std::fmt::Display for SideVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SideVerdict::AttackerSided => "Attacker sided",
            SideVerdict::DefenderSided => "Defender sided",
            SideVerdict::Neutral => "Map favours both sides",
        };
        write!(f, "{}", text)
    }
}

/// Sum attack and defend round wins across every leaf under the map
/// and compare the totals.
///
/// A map never seen in the data yields equal (zero) totals, which is a
/// legitimate neutral answer, not an error. Only a wholly unpopulated
/// tree fails.
pub fn best_side_for_map(tree: &StatTree, map: &str) -> Result<SideVerdict, TreeError> {
    if tree.is_empty() {
        return Err(TreeError::Unpopulated);
    }

    let mut attack: u64 = 0;
    let mut defend: u64 = 0;
    for leaf in leaves_for_map(tree, map) {
        if let TreeLabel::SideScore { attack: a, defend: d } = leaf {
            attack += u64::from(*a);
            defend += u64::from(*d);
        }
    }

    Ok(match attack.cmp(&defend) {
        std::cmp::Ordering::Greater => SideVerdict::AttackerSided,
        std::cmp::Ordering::Less => SideVerdict::DefenderSided,
        std::cmp::Ordering::Equal => SideVerdict::Neutral,
    })
}

/// Round-economy buy categories.
///
/// Listed in tie-break precedence order: when counts tie, the cheaper
/// buy wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuyType {
    Eco,
    SemiEco,
    SemiBuy,
    FullBuy,
}

impl BuyType {
    const ALL: [BuyType; 4] = [
        BuyType::Eco,
        BuyType::SemiEco,
        BuyType::SemiBuy,
        BuyType::FullBuy,
    ];

    /// Bucket a raw buy label. The three cheap tiers match the exact
    /// labels used by the stat exports; everything else is a full buy.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Eco: 0-5k" => BuyType::Eco,
            "Semi-eco: 5-10k" => BuyType::SemiEco,
            "Semi-buy: 10-20k" => BuyType::SemiBuy,
            _ => BuyType::FullBuy,
        }
    }

    /// Human-readable verdict sentence for the dashboard.
    pub fn verdict(&self) -> &'static str {
        match self {
            BuyType::Eco => "Eco buy is most effective",
            BuyType::SemiEco => "Semi-eco buy is most effective",
            BuyType::SemiBuy => "Semi-buy is most effective",
            BuyType::FullBuy => "Full buy is most effective",
        }
    }
}

impl std::fmt::Display for BuyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BuyType::Eco => "eco",
            BuyType::SemiEco => "semi-eco",
            BuyType::SemiBuy => "semi-buy",
            BuyType::FullBuy => "full",
        };
        write!(f, "{}", text)
    }
}

/// Count winning-round buy types under the map and return the most
/// frequent category, ties resolved by the cheap-first precedence.
pub fn best_buy_for_map(tree: &StatTree, map: &str) -> Result<BuyType, TreeError> {
    if tree.is_empty() {
        return Err(TreeError::Unpopulated);
    }

    let mut counts = [0u32; 4];
    for leaf in leaves_for_map(tree, map) {
        if let TreeLabel::RoundOutcome { buy, .. } = leaf {
            let bucket = match BuyType::from_label(buy) {
                BuyType::Eco => 0,
                BuyType::SemiEco => 1,
                BuyType::SemiBuy => 2,
                BuyType::FullBuy => 3,
            };
            counts[bucket] += 1;
        }
    }

    let mut best = BuyType::Eco;
    let mut best_count = counts[0];
    for (buy, count) in BuyType::ALL.into_iter().zip(counts) {
        if count > best_count {
            best = buy;
            best_count = count;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{build_tournament_tree, build_year_tree, RoundRow};

    fn side_row(match_name: &str, map: &str, team: &str, attack: u32, defend: u32) -> RoundRow {
        RoundRow {
            match_name: match_name.into(),
            map_name: map.into(),
            group: team.into(),
            leaf: TreeLabel::SideScore { attack, defend },
        }
    }

    fn buy_row(match_name: &str, map: &str, round: u32, buy: &str) -> RoundRow {
        RoundRow {
            match_name: match_name.into(),
            map_name: map.into(),
            group: round.to_string(),
            leaf: TreeLabel::RoundOutcome {
                winner: "team a".into(),
                buy: buy.into(),
            },
        }
    }

    fn side_tree() -> StatTree {
        let year_2021 = build_year_tree(
            "2021",
            &[
                side_row("m1", "Ascent", "team a", 25, 10),
                side_row("m1", "Ascent", "team b", 10, 5),
                side_row("m1", "Bind", "team a", 5, 5),
            ],
        )
        .unwrap();
        let year_2022 = build_year_tree(
            "2022",
            &[
                side_row("m2", "ascent", "team c", 5, 10),
                side_row("m2", "bind", "team c", 5, 5),
            ],
        )
        .unwrap();
        build_tournament_tree("vct", vec![year_2021, year_2022]).unwrap()
    }

    #[test]
    fn test_best_side_attacker() {
        // ascent totals: attack 40, defend 25.
        let verdict = best_side_for_map(&side_tree(), "ascent").unwrap();
        assert_eq!(verdict, SideVerdict::AttackerSided);
        assert_eq!(verdict.to_string(), "Attacker sided");
    }

    #[test]
    fn test_best_side_neutral_on_tie() {
        // bind totals: attack 10, defend 10.
        let verdict = best_side_for_map(&side_tree(), "Bind").unwrap();
        assert_eq!(verdict, SideVerdict::Neutral);
        assert_eq!(verdict.to_string(), "Map favours both sides");
    }

    #[test]
    fn test_best_side_defender() {
        let tree = build_tournament_tree(
            "vct",
            vec![build_year_tree("2023", &[side_row("m", "icebox", "t", 3, 9)]).unwrap()],
        )
        .unwrap();
        assert_eq!(
            best_side_for_map(&tree, "icebox").unwrap(),
            SideVerdict::DefenderSided
        );
    }

    #[test]
    fn test_best_side_unknown_map_is_neutral() {
        let verdict = best_side_for_map(&side_tree(), "pearl").unwrap();
        assert_eq!(verdict, SideVerdict::Neutral);
    }

    #[test]
    fn test_best_side_unpopulated_tree() {
        let err = best_side_for_map(&StatTree::empty(), "ascent").unwrap_err();
        assert!(matches!(err, TreeError::Unpopulated));
    }

    #[test]
    fn test_best_buy_counts() {
        let year = build_year_tree(
            "2023",
            &[
                buy_row("m1", "ascent", 1, "Eco: 0-5k"),
                buy_row("m1", "ascent", 2, "Eco: 0-5k"),
                buy_row("m1", "ascent", 3, "Full buy: 20k+"),
                buy_row("m1", "ascent", 4, "Semi-buy: 10-20k"),
            ],
        )
        .unwrap();
        let tree = build_tournament_tree("vct buy types", vec![year]).unwrap();

        let buy = best_buy_for_map(&tree, "ascent").unwrap();
        assert_eq!(buy, BuyType::Eco);
        assert_eq!(buy.verdict(), "Eco buy is most effective");
    }

    #[test]
    fn test_best_buy_tie_precedence() {
        let year = build_year_tree(
            "2023",
            &[
                buy_row("m1", "ascent", 1, "Semi-buy: 10-20k"),
                buy_row("m1", "ascent", 2, "Full buy: 20k+"),
            ],
        )
        .unwrap();
        let tree = build_tournament_tree("vct buy types", vec![year]).unwrap();

        // Tie between semi-buy and full: cheaper category wins.
        assert_eq!(best_buy_for_map(&tree, "ascent").unwrap(), BuyType::SemiBuy);
    }

    #[test]
    fn test_best_buy_unrecognized_label_is_full() {
        let year = build_year_tree("2023", &[buy_row("m1", "ascent", 1, "Bonus round")]).unwrap();
        let tree = build_tournament_tree("vct buy types", vec![year]).unwrap();
        assert_eq!(best_buy_for_map(&tree, "ascent").unwrap(), BuyType::FullBuy);
    }

    #[test]
    fn test_best_buy_no_matches_defaults_to_eco() {
        let tree = build_tournament_tree("vct buy types", vec![]).unwrap();
        assert_eq!(best_buy_for_map(&tree, "ascent").unwrap(), BuyType::Eco);
    }

    #[test]
    fn test_map_match_is_case_insensitive() {
        let verdict = best_side_for_map(&side_tree(), "ASCENT").unwrap();
        assert_eq!(verdict, SideVerdict::AttackerSided);
    }

    #[test]
    fn test_nodes_under_generic_traversal() {
        let tree = side_tree();
        let maps = nodes_under(&tree, 3, 3, |label| {
            label.as_text().is_some_and(|n| n.eq_ignore_ascii_case("ascent"))
        });
        assert_eq!(maps.len(), 2); // one per year

        let leaves = nodes_under(&tree, 3, 5, |label| {
            label.as_text().is_some_and(|n| n.eq_ignore_ascii_case("ascent"))
        });
        assert_eq!(leaves.len(), 3);
    }
}
