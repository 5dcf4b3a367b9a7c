//! Registration route.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use super::{
    auth::{password, token::TokenCodec},
    types::{AuthData, Credentials},
    valid_password, valid_username,
};
use crate::{
    api::{error::ApiError, response::Envelope},
    cli::globals::GlobalArgs,
    store::users,
};

#[utoipa::path(
    post,
    path = "/register",
    request_body = Credentials,
    responses(
        (status = 201, description = "User registered, token issued", body = AuthData),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken"),
    ),
    tag = "auth"
)]
pub async fn register(
    Extension(pool): Extension<PgPool>,
    Extension(codec): Extension<Arc<TokenCodec>>,
    Extension(globals): Extension<GlobalArgs>,
    payload: Option<Json<Credentials>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(credentials)) = payload else {
        return Err(ApiError::Validation(ApiError::INVALID_INPUT.to_string()));
    };

    let username = credentials.username.trim().to_string();
    if !valid_username(&username) || !valid_password(&credentials.password) {
        return Err(ApiError::Validation(ApiError::INVALID_INPUT.to_string()));
    }

    // Hash before touching the store; the unique constraint decides races.
    let digest = password::hash(credentials.password, globals.bcrypt_cost).await?;
    let user = users::create(&pool, &username, &digest).await?;

    let token = codec.issue(&user.username, user.id)?;

    info!(username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(
            AuthData {
                token,
                user: user.into_public(),
            },
            "User registered",
        )),
    ))
}
