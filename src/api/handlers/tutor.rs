//! AI tutoring routes: one route per task kind, one shared pipeline.

use axum::{extract::Extension, http::HeaderMap, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::{
    auth::{principal::require_auth, token::TokenCodec},
    types::TutorRequest,
};
use crate::{
    api::error::ApiError,
    genai::{GenAiClient, TaskKind},
};

#[utoipa::path(
    post,
    path = "/elia5",
    request_body = TutorRequest,
    responses(
        (status = 200, description = "Simple explanation of the topic"),
        (status = 400, description = "Missing content"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 500, description = "Generation provider failed"),
    ),
    tag = "tutor"
)]
pub async fn elia5(
    headers: HeaderMap,
    Extension(codec): Extension<Arc<TokenCodec>>,
    Extension(client): Extension<Arc<GenAiClient>>,
    payload: Option<Json<TutorRequest>>,
) -> Result<Json<Value>, ApiError> {
    respond(TaskKind::ExplainSimply, &headers, &codec, &client, payload).await
}

#[utoipa::path(
    post,
    path = "/revision",
    request_body = TutorRequest,
    responses(
        (status = 200, description = "Quick revision of the topic"),
        (status = 400, description = "Missing content"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 500, description = "Generation provider failed"),
    ),
    tag = "tutor"
)]
pub async fn revision(
    headers: HeaderMap,
    Extension(codec): Extension<Arc<TokenCodec>>,
    Extension(client): Extension<Arc<GenAiClient>>,
    payload: Option<Json<TutorRequest>>,
) -> Result<Json<Value>, ApiError> {
    respond(TaskKind::QuickRevision, &headers, &codec, &client, payload).await
}

#[utoipa::path(
    post,
    path = "/quiz",
    request_body = TutorRequest,
    responses(
        (status = 200, description = "Three-question quiz with answers"),
        (status = 400, description = "Missing content"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 500, description = "Generation provider failed"),
    ),
    tag = "tutor"
)]
pub async fn quiz(
    headers: HeaderMap,
    Extension(codec): Extension<Arc<TokenCodec>>,
    Extension(client): Extension<Arc<GenAiClient>>,
    payload: Option<Json<TutorRequest>>,
) -> Result<Json<Value>, ApiError> {
    respond(TaskKind::Quiz, &headers, &codec, &client, payload).await
}

async fn respond(
    task: TaskKind,
    headers: &HeaderMap,
    codec: &TokenCodec,
    client: &GenAiClient,
    payload: Option<Json<TutorRequest>>,
) -> Result<Json<Value>, ApiError> {
    let principal = require_auth(headers, codec)?;

    let content = payload
        .and_then(|Json(body)| body.content)
        .unwrap_or_default();

    // Empty content is rejected inside the proxy, before any provider call
    let text = client.run(task, &content).await?;

    debug!(username = %principal.username, ?task, "Generated tutoring response");

    Ok(Json(json!({ "message": text })))
}
