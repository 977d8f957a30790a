use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::models::MetaSnapshot;

pub async fn overview(State(state): State<AppState>) -> Json<MetaSnapshot> {
    Json(state.dataset.snapshot.clone())
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::testutil::{get_json, sample_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_overview() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/api/overview").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["maps"], serde_json::json!(["ascent"]));
        assert_eq!(json["agents"], serde_json::json!(["jett", "omen"]));
        assert_eq!(json["years"], serde_json::json!(["2023"]));
        // 2 map-agent edges plus 1 pairing edge.
        assert_eq!(json["edge_count"], 3);
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }
}
