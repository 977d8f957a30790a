//! Recommendation queries over the finished relation graph.
//!
//! Both queries read adjacency and weights only; they never mutate the
//! graph. Ordering is deterministic: descending score, then ascending
//! agent name for ties.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::graph::{GraphError, VertexKind, WeightedGraph};
use crate::models::{join_key, Role};

/// One agent with its score, either map suitability or co-play count
/// depending on the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAgent {
    pub agent: String,
    pub score: f64,
}

fn rank(mut agents: Vec<RankedAgent>) -> Vec<RankedAgent> {
    agents.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.agent.cmp(&b.agent))
    });
    agents
}

/// Rank the agents adjacent to `map` by suitability score.
///
/// Agents named in `excluded` (teammates' picks) are left out, as are
/// agents whose role differs from `role_filter` when one is given.
/// Fails if the map is not a vertex of the graph.
pub fn best_agents_for_map(
    graph: &WeightedGraph,
    map: &str,
    excluded: &HashSet<String>,
    role_filter: Option<Role>,
) -> Result<Vec<RankedAgent>, GraphError> {
    let map = join_key(map);
    let excluded: HashSet<String> = excluded.iter().map(|a| join_key(a)).collect();

    let mut ranked = Vec::new();
    for neighbour in graph.neighbours_of(&map)? {
        let Some(vertex) = graph.vertex_of(&neighbour) else {
            continue;
        };
        if vertex.kind() != VertexKind::Agent {
            continue;
        }
        if excluded.contains(&neighbour) {
            continue;
        }
        if role_filter.is_some_and(|wanted| vertex.role() != Some(wanted)) {
            continue;
        }
        ranked.push(RankedAgent {
            score: graph.get_weight(&map, &neighbour),
            agent: neighbour,
        });
    }
    Ok(rank(ranked))
}

/// Rank the agents most played alongside `agent` by co-play count.
///
/// Only agent-kind neighbours qualify; map neighbours carry suitability
/// weights of a different nature and are excluded. Fails if the agent
/// is not a vertex of the graph.
pub fn compatible_agents(
    graph: &WeightedGraph,
    agent: &str,
) -> Result<Vec<RankedAgent>, GraphError> {
    let agent = join_key(agent);

    let mut ranked = Vec::new();
    for neighbour in graph.neighbours_of(&agent)? {
        let Some(vertex) = graph.vertex_of(&neighbour) else {
            continue;
        };
        if vertex.kind() != VertexKind::Agent {
            continue;
        }
        ranked.push(RankedAgent {
            score: graph.get_weight(&agent, &neighbour),
            agent: neighbour,
        });
    }
    Ok(rank(ranked))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        g.add_vertex("ascent", VertexKind::Map, None).unwrap();
        g.add_vertex("jett", VertexKind::Agent, Some(Role::Duelist))
            .unwrap();
        g.add_vertex("raze", VertexKind::Agent, Some(Role::Duelist))
            .unwrap();
        g.add_vertex("omen", VertexKind::Agent, Some(Role::Controller))
            .unwrap();
        g.add_edge("ascent", "jett", 6.75).unwrap();
        g.add_edge("ascent", "raze", 6.75).unwrap();
        g.add_edge("ascent", "omen", 8.0).unwrap();
        g.add_edge("jett", "omen", 5.0).unwrap();
        g.add_edge("jett", "raze", 2.0).unwrap();
        g
    }

    #[test]
    fn test_best_agents_sorted_with_tiebreak() {
        let best = best_agents_for_map(&sample_graph(), "ascent", &HashSet::new(), None).unwrap();
        let names: Vec<&str> = best.iter().map(|r| r.agent.as_str()).collect();

        // omen first on score; jett before raze alphabetically on the tie.
        assert_eq!(names, vec!["omen", "jett", "raze"]);
        assert!(best.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_best_agents_respects_exclusions() {
        let excluded: HashSet<String> = ["Jett".to_string()].into_iter().collect();
        let best = best_agents_for_map(&sample_graph(), "ascent", &excluded, None).unwrap();

        assert!(best.iter().all(|r| r.agent != "jett"));
        assert_eq!(best.len(), 2);
    }

    #[test]
    fn test_best_agents_role_filter() {
        let best =
            best_agents_for_map(&sample_graph(), "ascent", &HashSet::new(), Some(Role::Duelist))
                .unwrap();
        let names: Vec<&str> = best.iter().map(|r| r.agent.as_str()).collect();
        assert_eq!(names, vec!["jett", "raze"]);
    }

    #[test]
    fn test_best_agents_unknown_map() {
        let err =
            best_agents_for_map(&sample_graph(), "pearl", &HashSet::new(), None).unwrap_err();
        assert!(matches!(err, GraphError::UnknownVertex(_)));
    }

    #[test]
    fn test_compatible_agents_excludes_maps_and_self() {
        let ranked = compatible_agents(&sample_graph(), "Jett").unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.agent.as_str()).collect();

        assert_eq!(names, vec!["omen", "raze"]);
        assert!(ranked.iter().all(|r| r.agent != "ascent"));
        assert!(ranked.iter().all(|r| r.agent != "jett"));
    }

    #[test]
    fn test_compatible_agents_unknown_agent() {
        let err = compatible_agents(&sample_graph(), "reyna").unwrap_err();
        assert!(matches!(err, GraphError::UnknownVertex(_)));
    }
}
