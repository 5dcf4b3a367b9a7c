//! HTTP surface: router construction, middleware pipeline, serve loop.
//!
//! The pipeline is an explicit ordered stack: request-id plumbing, tracing,
//! CORS headers, origin admission, rate limiting, then the routes. Protected
//! routes additionally compose the bearer guard inside their handlers.

use crate::{
    api::handlers::auth::token::TokenCodec,
    cli::globals::GlobalArgs,
    genai::GenAiClient,
    store,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod error;
pub mod handlers;
pub mod origin;
pub mod rate_limit;
pub mod response;
pub mod shutdown;

/// Global request-body ceiling.
const BODY_LIMIT_BYTES: usize = 20 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::health::test,
        handlers::user_register::register,
        handlers::user_login::login,
        handlers::me::me,
        handlers::tutor::elia5,
        handlers::tutor::revision,
        handlers::tutor::quiz,
    ),
    components(schemas(
        handlers::types::Credentials,
        handlers::types::AuthData,
        handlers::types::MeData,
        handlers::types::TutorRequest,
        crate::store::users::PublicUser,
    )),
    tags(
        (name = "auth", description = "Registration, login and identity"),
        (name = "tutor", description = "AI tutoring routes"),
        (name = "meta", description = "Liveness and build info"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Start the server
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn new(port: u16, dsn: String, globals: &GlobalArgs) -> Result<()> {
    // Connect to database; transient failures retry forever with a fixed
    // delay rather than taking the process down.
    let pool = store::connect_with_retry(&dsn).await;
    store::ensure_schema(&pool).await?;

    let codec = Arc::new(TokenCodec::new(&globals.token_secret, globals.token_ttl_days));
    let genai = Arc::new(GenAiClient::new(globals.genai_api_key.clone())?);
    let limiter = Arc::new(rate_limit::FixedWindowLimiter::new(
        globals.rate_limit_max,
        Duration::from_secs(globals.rate_limit_window_seconds),
    ));
    let policy = Arc::new(origin::OriginPolicy::new(globals.allowed_origins.clone()));

    let app = Router::new()
        .route("/register", post(handlers::user_register::register))
        .route("/login", post(handlers::user_login::login))
        .route("/me", get(handlers::me::me))
        .route("/elia5", post(handlers::tutor::elia5))
        .route("/revision", post(handlers::tutor::revision))
        .route("/quiz", post(handlers::tutor::quiz))
        .route("/", get(handlers::health::root))
        .route("/test", get(handlers::health::test))
        .route(
            "/health",
            get(handlers::health::health).options(handlers::health::health),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(origin::cors_layer(&globals.allowed_origins)?)
                .layer(middleware::from_fn_with_state(policy, origin::admit))
                .layer(middleware::from_fn_with_state(limiter, rate_limit::govern))
                .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
                .layer(Extension(codec))
                .layer(Extension(genai))
                .layer(Extension(globals.clone()))
                .layer(Extension(pool.clone())),
        );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown::shutdown_signal())
    .await?;

    // Drain is complete; release the store connections before exiting.
    pool.close().await;

    info!("Gracefully shutdown");

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let spec = openapi();
        let paths = spec.paths.paths;
        for path in ["/register", "/login", "/me", "/elia5", "/revision", "/quiz", "/health"] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }
}
