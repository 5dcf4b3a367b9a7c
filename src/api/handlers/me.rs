//! Authenticated identity lookup.

use axum::{extract::Extension, http::HeaderMap, response::IntoResponse, Json};
use sqlx::PgPool;
use std::sync::Arc;

use super::{
    auth::{principal::require_auth, token::TokenCodec},
    types::MeData,
};
use crate::{
    api::{error::ApiError, response::Envelope},
    store::users,
};

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Public view of the authenticated user", body = MeData),
        (status = 401, description = "Missing, invalid or expired token"),
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(codec): Extension<Arc<TokenCodec>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &codec)?;

    // A valid signature over an id that no longer resolves gets the same
    // rejection as a bad token.
    let Some(user) = users::find_by_id(&pool, principal.id).await? else {
        return Err(ApiError::Auth(ApiError::INVALID_TOKEN.to_string()));
    };

    Ok(Json(Envelope::ok(
        MeData {
            user: user.into_public(),
        },
        "User info",
    )))
}
