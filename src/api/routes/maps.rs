use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::tree::{best_buy_for_map, best_side_for_map, BuyType, SideVerdict};

#[derive(Debug, Serialize)]
pub struct SideResponse {
    pub map: String,
    pub verdict: SideVerdict,
    pub summary: String,
}

pub async fn map_side(
    State(state): State<AppState>,
    Path(map): Path<String>,
) -> Result<Json<SideResponse>, ApiError> {
    let verdict = best_side_for_map(&state.dataset.side_tree, &map)?;
    Ok(Json(SideResponse {
        map,
        summary: verdict.to_string(),
        verdict,
    }))
}

#[derive(Debug, Serialize)]
pub struct BuyResponse {
    pub map: String,
    pub buy: BuyType,
    pub summary: String,
}

pub async fn map_buy(
    State(state): State<AppState>,
    Path(map): Path<String>,
) -> Result<Json<BuyResponse>, ApiError> {
    let buy = best_buy_for_map(&state.dataset.buy_tree, &map)?;
    Ok(Json(BuyResponse {
        map,
        summary: buy.verdict().to_string(),
        buy,
    }))
}
