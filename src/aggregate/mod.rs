//! Aggregation loader.
//!
//! Folds raw per-row statistics into per-(map, agent) accumulators.
//! The accumulator mapping is the single input of the graph builder:
//! pick-rate rows feed the sum/count pair (averaged later across
//! tournament entries), outcome rows feed wins/plays additively.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{join_key, OutcomeRecord, PickRateRecord, Role, RoleTable};

/// Errors raised while folding the record streams.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("no role recorded for agent: {0}")]
    MissingRole(String),

    #[error("outcome row references unseen pair: {map}/{agent}")]
    UnseenPair { map: String, agent: String },
}

/// Running totals for one (map, agent) pair.
///
/// Created on first pick-rate observation of the pair, mutated by every
/// later row referencing it, and read exactly once at graph-construction
/// time to produce the final edge weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    pub pick_rate_sum: f64,
    pub pick_rate_count: u32,
    pub wins: u32,
    pub plays: u32,
    pub role: Role,
}

impl Accumulator {
    fn new(role: Role) -> Self {
        Self {
            pick_rate_sum: 0.0,
            pick_rate_count: 0,
            wins: 0,
            plays: 0,
            role,
        }
    }
}

/// Accumulators keyed by map, then agent (lowercase join keys).
///
/// `BTreeMap` keeps iteration deterministic so repeated builds visit
/// cells in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapAgentStats {
    cells: BTreeMap<String, BTreeMap<String, Accumulator>>,
}

impl MapAgentStats {
    pub fn get(&self, map: &str, agent: &str) -> Option<&Accumulator> {
        self.cells.get(&join_key(map))?.get(&join_key(agent))
    }

    /// Map names in sorted order.
    pub fn maps(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Iterate (map, agent, accumulator) cells in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Accumulator)> {
        self.cells.iter().flat_map(|(map, agents)| {
            agents
                .iter()
                .map(move |(agent, acc)| (map.as_str(), agent.as_str(), acc))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Fold the pick-rate and outcome streams into the accumulator mapping.
///
/// Pick-rate rows create the cell on first sight and accumulate
/// sum/count afterwards. Outcome rows accumulate wins/plays and require
/// the cell to already exist; an outcome row for an unseen pair means
/// the two derived files disagree and is reported as an error.
pub fn fold_records(
    pick_rates: &[PickRateRecord],
    outcomes: &[OutcomeRecord],
    roles: &RoleTable,
) -> Result<MapAgentStats, AggregateError> {
    let mut stats = MapAgentStats::default();

    for row in pick_rates {
        let map = join_key(&row.map);
        let agent = join_key(&row.agent);
        let role = roles
            .get(&agent)
            .copied()
            .ok_or_else(|| AggregateError::MissingRole(agent.clone()))?;

        let acc = stats
            .cells
            .entry(map)
            .or_default()
            .entry(agent)
            .or_insert_with(|| Accumulator::new(role));
        acc.pick_rate_sum += row.pick_rate;
        acc.pick_rate_count += 1;
    }

    for row in outcomes {
        let map = join_key(&row.map);
        let agent = join_key(&row.agent);
        let acc = stats
            .cells
            .get_mut(&map)
            .and_then(|agents| agents.get_mut(&agent))
            .ok_or(AggregateError::UnseenPair {
                map: map.clone(),
                agent: agent.clone(),
            })?;
        acc.wins += row.wins;
        acc.plays += row.plays;
    }

    tracing::debug!(
        maps = stats.cells.len(),
        cells = stats.iter().count(),
        "folded record streams"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> RoleTable {
        let mut table = RoleTable::new();
        table.insert("jett".into(), Role::Duelist);
        table.insert("omen".into(), Role::Controller);
        table
    }

    fn pick(map: &str, agent: &str, rate: f64) -> PickRateRecord {
        PickRateRecord {
            map: map.into(),
            agent: agent.into(),
            pick_rate: rate,
        }
    }

    fn outcome(map: &str, agent: &str, wins: u32, plays: u32) -> OutcomeRecord {
        OutcomeRecord {
            map: map.into(),
            agent: agent.into(),
            wins,
            plays,
        }
    }

    #[test]
    fn test_fold_accumulates_repeated_pairs() {
        let stats = fold_records(
            &[
                pick("ascent", "jett", 0.1),
                pick("ascent", "jett", 0.2),
                pick("bind", "omen", 0.5),
            ],
            &[
                outcome("ascent", "jett", 6, 10),
                outcome("ascent", "jett", 2, 5),
            ],
            &roles(),
        )
        .unwrap();

        let acc = stats.get("ascent", "jett").unwrap();
        assert!((acc.pick_rate_sum - 0.3).abs() < 1e-9);
        assert_eq!(acc.pick_rate_count, 2);
        assert_eq!(acc.wins, 8);
        assert_eq!(acc.plays, 15);
        assert_eq!(acc.role, Role::Duelist);

        let omen = stats.get("bind", "omen").unwrap();
        assert_eq!(omen.plays, 0);
        assert_eq!(omen.pick_rate_count, 1);
    }

    #[test]
    fn test_fold_join_keys_case_insensitive() {
        let stats = fold_records(
            &[pick("Ascent", "JETT", 0.4)],
            &[outcome("ASCENT", "Jett", 1, 2)],
            &roles(),
        )
        .unwrap();

        let acc = stats.get("ascent", "jett").unwrap();
        assert_eq!(acc.wins, 1);
        assert_eq!(acc.pick_rate_count, 1);
    }

    #[test]
    fn test_fold_missing_role() {
        let err = fold_records(&[pick("ascent", "reyna", 0.4)], &[], &roles()).unwrap_err();
        assert!(matches!(err, AggregateError::MissingRole(agent) if agent == "reyna"));
    }

    #[test]
    fn test_fold_outcome_for_unseen_pair() {
        let err = fold_records(
            &[pick("ascent", "jett", 0.4)],
            &[outcome("bind", "jett", 1, 2)],
            &roles(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AggregateError::UnseenPair { map, agent } if map == "bind" && agent == "jett"
        ));
    }

    #[test]
    fn test_iter_is_sorted() {
        let stats = fold_records(
            &[
                pick("split", "jett", 0.1),
                pick("ascent", "omen", 0.2),
                pick("ascent", "jett", 0.3),
            ],
            &[],
            &roles(),
        )
        .unwrap();

        let cells: Vec<(&str, &str)> = stats.iter().map(|(m, a, _)| (m, a)).collect();
        assert_eq!(
            cells,
            vec![("ascent", "jett"), ("ascent", "omen"), ("split", "jett")]
        );
    }
}
