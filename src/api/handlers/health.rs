//! Liveness routes.

use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::GIT_COMMIT_HASH;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up, with name/version/build info")
    ),
    tag = "meta"
)]
pub async fn health() -> impl IntoResponse {
    let body = Json(json!({
        "success": true,
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "build": GIT_COMMIT_HASH,
        "message": "Backend is healthy",
    }));

    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )) {
        headers.insert("X-App", value);
    }

    (headers, body)
}

#[utoipa::path(
    get,
    path = "/test",
    responses((status = 200, description = "Liveness probe")),
    tag = "meta"
)]
pub async fn test() -> impl IntoResponse {
    Json(json!({ "message": "API is alive" }))
}

pub async fn root() -> &'static str {
    "Stud-Bud backend is running"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn health_carries_app_header() {
        let response = health().await.into_response();
        assert!(response.headers().contains_key("X-App"));
    }

    #[tokio::test]
    async fn root_is_plain_text() {
        let response = root().await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
