//! Keystone v3 token endpoint handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::REPORTING_SERVICE_TYPE;

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": {
                "code": 401,
                "title": "Unauthorized",
                "message": "The request you have made requires authentication."
            }
        })),
    )
        .into_response()
}

fn str_at<'a>(body: &'a Value, pointer: &str) -> &'a str {
    body.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

/// POST /identity/v3/auth/tokens
pub async fn issue_token(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    state.hit("/identity/v3/auth/tokens");

    let method = str_at(&body, "/auth/identity/methods/0");
    let scoped = match method {
        "password" => {
            let user = "/auth/identity/password/user";
            let accepted = state.check_password(
                str_at(&body, &format!("{user}/name")),
                str_at(&body, &format!("{user}/password")),
                str_at(&body, &format!("{user}/domain/name")),
                str_at(&body, "/auth/scope/project/name"),
                str_at(&body, "/auth/scope/project/domain/name"),
            );
            if !accepted {
                return unauthorized();
            }
            true
        }
        "token" => {
            if !state.tokens.contains(str_at(&body, "/auth/identity/token/id")) {
                return unauthorized();
            }
            false
        }
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "code": 400, "message": "Unsupported auth method" } })),
            )
                .into_response();
        }
    };

    // Unscoped tokens come without a catalog.
    let catalog = match (&state.reporting_url, scoped) {
        (Some(url), true) => json!([{
            "type": REPORTING_SERVICE_TYPE,
            "name": "reporting-api",
            "endpoints": [
                { "interface": "internal", "url": "http://10.0.0.1:9494" },
                { "interface": "public", "url": url }
            ]
        }]),
        _ => json!([]),
    };

    let token = state.issue_token();
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&token) {
        headers.insert("X-Subject-Token", value);
    }

    (
        StatusCode::CREATED,
        headers,
        Json(json!({
            "token": {
                "methods": [method],
                "expires_at": "2099-01-01T00:00:00.000000Z",
                "catalog": catalog
            }
        })),
    )
        .into_response()
}
