//! Graph construction from the accumulator mapping.
//!
//! Building is a pure function from input records to an owned graph;
//! interactive filters rebuild the graph wholesale rather than mutating
//! a shared one.

use std::collections::BTreeSet;

use crate::aggregate::{Accumulator, MapAgentStats};
use crate::models::{join_key, LineupRecord, Role};

use super::{GraphError, VertexKind, WeightedGraph};

/// Which maps to include when building.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapSelection {
    #[default]
    All,
    Named(String),
}

impl MapSelection {
    fn matches(&self, map: &str) -> bool {
        match self {
            MapSelection::All => true,
            MapSelection::Named(name) => join_key(name) == map,
        }
    }
}

/// Builder options: map selection, role filter, and whether to add
/// agent-agent co-play edges.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub selection: MapSelection,
    pub role_filter: Option<Role>,
    pub agent_pairings: bool,
}

/// Suitability weight for one accumulator cell.
///
/// `10 * win_rate + 5 * mean_pick_rate`, rounded to two decimals, which
/// bounds the score to `[0, 15]`. A cell with no recorded plays or no
/// pick-rate observations scores 0.
pub fn edge_weight(acc: &Accumulator) -> f64 {
    if acc.plays == 0 || acc.pick_rate_count == 0 {
        return 0.0;
    }
    let win_rate = f64::from(acc.wins) / f64::from(acc.plays);
    let mean_pick = acc.pick_rate_sum / f64::from(acc.pick_rate_count);
    let weight = 10.0 * win_rate + 5.0 * mean_pick;
    (weight * 100.0).round() / 100.0
}

/// Build the weighted relation graph from the accumulator mapping.
///
/// Every selected (map, agent) cell becomes a map-agent edge carrying
/// its suitability weight. With `agent_pairings` set, each lineup then
/// increments the co-play weight of every unordered agent pair within
/// it (starting from 1). Lineup members filtered out of the graph by
/// the map or role selection are skipped.
pub fn build_graph(
    stats: &MapAgentStats,
    lineups: &[LineupRecord],
    options: &BuildOptions,
) -> Result<WeightedGraph, GraphError> {
    let mut graph = WeightedGraph::new();

    for (map, agent, acc) in stats.iter() {
        if !options.selection.matches(map) {
            continue;
        }
        if options
            .role_filter
            .is_some_and(|wanted| acc.role != wanted)
        {
            continue;
        }

        if !graph.exists(map) {
            graph.add_vertex(map, VertexKind::Map, None)?;
        }
        if !graph.exists(agent) {
            graph.add_vertex(agent, VertexKind::Agent, Some(acc.role))?;
        }
        graph.add_edge(map, agent, edge_weight(acc))?;
    }

    if options.agent_pairings {
        add_pairing_edges(&mut graph, lineups)?;
    }

    tracing::debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "built relation graph"
    );
    Ok(graph)
}

/// Increment the co-play edge of every unordered agent pair in each
/// lineup. Pair weights count lineups, so repeated co-occurrence across
/// teams accumulates.
fn add_pairing_edges(
    graph: &mut WeightedGraph,
    lineups: &[LineupRecord],
) -> Result<(), GraphError> {
    for lineup in lineups {
        // Set semantics within one lineup, deterministic pair order.
        let members: BTreeSet<String> = lineup.agents.iter().map(|a| join_key(a)).collect();
        let members: Vec<String> = members
            .into_iter()
            .filter(|a| {
                graph
                    .vertex_of(a)
                    .is_some_and(|v| v.kind() == VertexKind::Agent)
            })
            .collect();

        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                let next = if graph.adjacent(a, b) {
                    graph.get_weight(a, b) + 1.0
                } else {
                    1.0
                };
                graph.add_edge(a, b, next)?;
            }
        }
    }
    Ok(())
}
