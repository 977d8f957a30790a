//! Dataset assembly.
//!
//! One `Dataset` holds everything the queries need: the accumulator
//! mapping, the default relation graph, both statistic trees, and a
//! snapshot summary. It is built once from a data directory and shared
//! read-only; filtered graph views are rebuilt from the retained stats
//! on demand.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::aggregate::{fold_records, AggregateError, MapAgentStats};
use crate::graph::{build_graph, BuildOptions, GraphError, VertexKind, WeightedGraph};
use crate::ingest::{
    self, load_eco_rounds, load_map_scores, IngestError, YearRows,
};
use crate::models::{LineupRecord, MetaSnapshot};
use crate::tree::{build_tournament_tree, build_year_tree, StatTree, TreeError};

/// File name of the agent role table within the data directory.
const ROLES_FILE: &str = "agent_roles.csv";
/// File name of the team lineup export within the data directory.
const LINEUPS_FILE: &str = "all_agents.csv";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// A fully-assembled dataset.
#[derive(Debug)]
pub struct Dataset {
    pub stats: MapAgentStats,
    pub lineups: Vec<LineupRecord>,
    /// Unfiltered graph with agent pairing edges, used by the
    /// recommendation queries.
    pub graph: WeightedGraph,
    /// Tournament tree of per-team attack/defend map scores.
    pub side_tree: StatTree,
    /// Tournament tree of winning-round buy types.
    pub buy_tree: StatTree,
    pub snapshot: MetaSnapshot,
}

/// Load every export under `data_dir` and assemble the dataset.
///
/// The lineup file is optional; without it the graph simply carries no
/// agent pairing edges. Everything else is required.
pub fn load_dataset(data_dir: &Path, pool: &HashSet<String>) -> Result<Dataset, DatasetError> {
    let pick_rate_files = ingest::discover_files(data_dir, "agents_pick_rates")?;
    let outcome_files = ingest::discover_files(data_dir, "teams_picked_agents")?;

    let pick_rates = ingest::load_pick_rates(&pick_rate_files, pool)?;
    let outcomes = ingest::load_outcomes(&outcome_files, pool)?;
    let roles = ingest::load_roles(&data_dir.join(ROLES_FILE))?;

    let lineups_path = data_dir.join(LINEUPS_FILE);
    let lineups = if lineups_path.is_file() {
        ingest::load_lineups(&lineups_path)?
    } else {
        warn!(path = %lineups_path.display(), "no lineup file, skipping agent pairings");
        Vec::new()
    };

    let stats = fold_records(&pick_rates, &outcomes, &roles)?;
    let options = BuildOptions {
        agent_pairings: true,
        ..Default::default()
    };
    let graph = build_graph(&stats, &lineups, &options)?;

    let side_years = ingest::rounds::load_year_files(data_dir, "maps_scores_", load_map_scores)?;
    let buy_years = ingest::rounds::load_year_files(data_dir, "eco_rounds_", load_eco_rounds)?;

    let years: BTreeSet<String> = side_years
        .iter()
        .chain(buy_years.iter())
        .map(|y| y.year.clone())
        .collect();

    let side_tree = build_tree("vct map sides", side_years)?;
    let buy_tree = build_tree("vct buy types", buy_years)?;

    let snapshot = MetaSnapshot::new(
        graph.identities_of_kind(VertexKind::Map),
        graph.identities_of_kind(VertexKind::Agent),
        graph.edge_count(),
        years.into_iter().collect(),
    );
    info!(
        maps = snapshot.maps.len(),
        agents = snapshot.agents.len(),
        edges = snapshot.edge_count,
        years = snapshot.years.len(),
        "dataset assembled"
    );

    Ok(Dataset {
        stats,
        lineups,
        graph,
        side_tree,
        buy_tree,
        snapshot,
    })
}

fn build_tree(root_label: &str, years: Vec<YearRows>) -> Result<StatTree, TreeError> {
    let mut subtrees = Vec::with_capacity(years.len());
    for year in &years {
        subtrees.push(build_year_tree(&year.year, &year.rows)?);
    }
    build_tournament_tree(root_label, subtrees)
}
