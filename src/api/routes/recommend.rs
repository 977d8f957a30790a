use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Role;
use crate::recommend::{best_agents_for_map, compatible_agents, RankedAgent};

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub map: String,

    /// Restrict results to one role.
    pub role: Option<String>,

    /// Comma-separated agents already picked by teammates.
    pub exclude: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub map: String,
    pub agents: Vec<RankedAgent>,
}

pub async fn recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationParams>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let role: Option<Role> = params
        .role
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e| ApiError::BadRequest(format!("{e}")))?;

    let excluded: HashSet<String> = params
        .exclude
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let agents = best_agents_for_map(&state.dataset.graph, &params.map, &excluded, role)?;
    Ok(Json(RecommendationResponse {
        map: params.map,
        agents,
    }))
}

#[derive(Debug, Serialize)]
pub struct CompatibilityResponse {
    pub agent: String,
    pub teammates: Vec<RankedAgent>,
}

pub async fn compatibility(
    State(state): State<AppState>,
    Path(agent): Path<String>,
) -> Result<Json<CompatibilityResponse>, ApiError> {
    let teammates = compatible_agents(&state.dataset.graph, &agent)?;
    Ok(Json(CompatibilityResponse { agent, teammates }))
}
