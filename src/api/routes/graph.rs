use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::graph::{build_graph, BuildOptions, GraphView, MapSelection};
use crate::models::Role;

#[derive(Debug, Deserialize)]
pub struct GraphParams {
    /// Restrict the graph to one map.
    pub map: Option<String>,

    /// Restrict agents to one role.
    pub role: Option<String>,

    /// Include agent-agent co-play edges.
    #[serde(default)]
    pub pairings: bool,
}

/// Build a filtered graph view.
///
/// Filters rebuild the graph from the retained accumulator mapping
/// rather than mutating the shared default graph.
pub async fn graph_view(
    State(state): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Result<Json<GraphView>, ApiError> {
    let role: Option<Role> = params
        .role
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e| ApiError::BadRequest(format!("{e}")))?;

    let options = BuildOptions {
        selection: params
            .map
            .map(MapSelection::Named)
            .unwrap_or(MapSelection::All),
        role_filter: role,
        agent_pairings: params.pairings,
    };

    let graph = build_graph(&state.dataset.stats, &state.dataset.lineups, &options)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(GraphView::from_graph(&graph)))
}
