//! Domain error taxonomy and the central error translator.
//!
//! Handlers return `Result<_, ApiError>`; the `IntoResponse` impl is the only
//! place where errors turn into HTTP responses, so no route can leak a raw
//! database or provider payload to a client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::{api::response::Envelope, store::users::is_unique_violation};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),
    /// Duplicate username.
    #[error("Username already taken")]
    Conflict,
    /// Missing/invalid/expired token or bad credentials.
    #[error("{0}")]
    Auth(String),
    /// Fixed-window quota exhausted.
    #[error("Too many requests - try again later.")]
    RateLimited,
    /// Cross-origin request from an origin outside the allow-list.
    #[error("Origin not allowed")]
    OriginRejected,
    /// The generation provider failed; detail is logged server-side only.
    #[error("Error from AI service.")]
    Upstream,
    /// Backing store unreachable.
    #[error("Service temporarily unavailable")]
    StoreUnavailable,
    /// Catch-all for unexpected faults.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub const MISSING_TOKEN: &'static str = "Authorization token missing";
    pub const INVALID_TOKEN: &'static str = "Invalid or expired token";
    pub const INVALID_CREDENTIALS: &'static str = "Invalid credentials";
    pub const INVALID_INPUT: &'static str = "Invalid input";

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::OriginRejected => StatusCode::FORBIDDEN,
            Self::Upstream | Self::StoreUnavailable | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Envelope::fail(self.to_string());
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            return Self::Conflict;
        }
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                error!("Database unavailable: {err}");
                Self::StoreUnavailable
            }
            other => {
                error!("Database error: {other}");
                Self::Internal
            }
        }
    }
}
