//! Login route.

use axum::{extract::Extension, response::IntoResponse, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use super::{
    auth::{password, token::TokenCodec},
    types::{AuthData, Credentials},
    valid_password, valid_username,
};
use crate::{
    api::{error::ApiError, response::Envelope},
    store::users,
};

#[utoipa::path(
    post,
    path = "/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in, token issued", body = AuthData),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(pool): Extension<PgPool>,
    Extension(codec): Extension<Arc<TokenCodec>>,
    payload: Option<Json<Credentials>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(credentials)) = payload else {
        return Err(ApiError::Validation(ApiError::INVALID_INPUT.to_string()));
    };

    let username = credentials.username.trim().to_string();
    if !valid_username(&username) || !valid_password(&credentials.password) {
        return Err(ApiError::Validation(ApiError::INVALID_INPUT.to_string()));
    }

    // Unknown username and wrong password produce the same rejection, so
    // responses do not reveal which usernames exist.
    let Some(user) = users::find_by_username(&pool, &username).await? else {
        return Err(ApiError::Auth(ApiError::INVALID_CREDENTIALS.to_string()));
    };

    let ok = password::verify(credentials.password, user.password_hash.clone()).await?;
    if !ok {
        debug!(username = %user.username, "Password mismatch");
        return Err(ApiError::Auth(ApiError::INVALID_CREDENTIALS.to_string()));
    }

    let token = codec.issue(&user.username, user.id)?;

    Ok(Json(Envelope::ok(
        AuthData {
            token,
            user: user.into_public(),
        },
        "Logged in",
    )))
}
