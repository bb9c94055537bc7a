//! Reporting API endpoint handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::AUTH_TOKEN_HEADER;

/// Record the hit and check the token. Returns a rejection if not allowed.
async fn admit(
    state: &Arc<RwLock<MockState>>,
    headers: &HeaderMap,
    path: &str,
) -> Option<axum::response::Response> {
    let mut state = state.write().await;
    state.hit(path);

    let token = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if state.token_allowed(token) {
        None
    } else {
        Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Invalid or missing token" })),
            )
                .into_response(),
        )
    }
}

/// GET /
pub async fn list_versions(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(rejection) = admit(&state, &headers, "/").await {
        return rejection;
    }
    let state = state.read().await;
    (StatusCode::OK, Json(state.versions.clone())).into_response()
}

/// GET /v1/reports
pub async fn list_reports(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(rejection) = admit(&state, &headers, "/v1/reports").await {
        return rejection;
    }
    let state = state.read().await;
    (StatusCode::OK, Json(state.reports.clone())).into_response()
}

/// GET /v1/reports/{name}
pub async fn get_report(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(name): Path<String>,
    Query(filters): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let path = format!("/v1/reports/{name}");
    if let Some(rejection) = admit(&state, &headers, &path).await {
        return rejection;
    }

    let state = state.read().await;
    match state.query_report(&name, &filters) {
        Some(rows) => (StatusCode::OK, Json(rows)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "Report not found",
                "report": name
            })),
        )
            .into_response(),
    }
}
