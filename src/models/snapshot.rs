//! Dataset snapshot summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one fully-built dataset, stamped at construction time.
///
/// The graph and trees are immutable once built, so the snapshot is
/// computed once alongside them and served as-is by the overview
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaSnapshot {
    /// When this dataset was assembled.
    pub computed_at: DateTime<Utc>,

    /// Maps present in the graph, sorted by name.
    pub maps: Vec<String>,

    /// Agents present in the graph, sorted by name.
    pub agents: Vec<String>,

    /// Number of map-agent and agent-agent edges.
    pub edge_count: usize,

    /// Years covered by the statistic trees.
    pub years: Vec<String>,
}

impl MetaSnapshot {
    pub fn new(
        mut maps: Vec<String>,
        mut agents: Vec<String>,
        edge_count: usize,
        mut years: Vec<String>,
    ) -> Self {
        maps.sort();
        agents.sort();
        years.sort();
        Self {
            computed_at: Utc::now(),
            maps,
            agents,
            edge_count,
            years,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_sorts_names() {
        let snap = MetaSnapshot::new(
            vec!["split".into(), "ascent".into()],
            vec!["raze".into(), "jett".into()],
            3,
            vec!["2023".into(), "2021".into()],
        );
        assert_eq!(snap.maps, vec!["ascent", "split"]);
        assert_eq!(snap.agents, vec!["jett", "raze"]);
        assert_eq!(snap.years, vec!["2021", "2023"]);
        assert_eq!(snap.edge_count, 3);
    }
}
