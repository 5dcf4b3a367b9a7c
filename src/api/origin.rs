//! Cross-origin admission control.
//!
//! Admission is evaluated before any handler runs. The matching `CorsLayer`
//! only emits the response headers; the short-circuit lives here so a
//! disallowed origin never reaches the route pipeline.

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderValue, Method,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::api::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OriginDecision {
    Allowed,
    Rejected,
}

#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    #[must_use]
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    /// Requests without an `Origin` header (same-origin or non-browser
    /// clients) are always admitted. An empty allow-list admits everything;
    /// restricting it is a deployment responsibility.
    #[must_use]
    pub fn evaluate(&self, origin: Option<&str>) -> OriginDecision {
        match origin {
            None => OriginDecision::Allowed,
            Some(_) if self.allowed.is_empty() => OriginDecision::Allowed,
            Some(origin) if self.allowed.iter().any(|allowed| allowed == origin) => {
                OriginDecision::Allowed
            }
            Some(_) => OriginDecision::Rejected,
        }
    }
}

pub async fn admit(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);

    match policy.evaluate(origin.as_deref()) {
        OriginDecision::Allowed => next.run(request).await,
        OriginDecision::Rejected => {
            // Generic rejection; the body must not reveal which origins are valid.
            warn!(origin = origin.as_deref().unwrap_or("-"), "Origin rejected");
            ApiError::OriginRejected.into_response()
        }
    }
}

/// CORS response headers mirroring the admission allow-list.
///
/// # Errors
///
/// Returns an error if a configured origin is not a valid header value
pub fn cors_layer(allowed: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST]);

    if allowed.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = allowed
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_origin_is_admitted() {
        let policy = OriginPolicy::new(vec!["https://a.example".to_string()]);
        assert_eq!(policy.evaluate(None), OriginDecision::Allowed);
    }

    #[test]
    fn empty_allow_list_admits_all() {
        let policy = OriginPolicy::new(Vec::new());
        assert_eq!(
            policy.evaluate(Some("https://b.example")),
            OriginDecision::Allowed
        );
    }

    #[test]
    fn listed_origin_is_admitted() {
        let policy = OriginPolicy::new(vec!["https://a.example".to_string()]);
        assert_eq!(
            policy.evaluate(Some("https://a.example")),
            OriginDecision::Allowed
        );
    }

    #[test]
    fn unlisted_origin_is_rejected() {
        let policy = OriginPolicy::new(vec!["https://a.example".to_string()]);
        assert_eq!(
            policy.evaluate(Some("https://b.example")),
            OriginDecision::Rejected
        );
    }

    #[test]
    fn match_is_exact_not_prefix() {
        let policy = OriginPolicy::new(vec!["https://a.example".to_string()]);
        assert_eq!(
            policy.evaluate(Some("https://a.example.evil.com")),
            OriginDecision::Rejected
        );
    }

    #[test]
    fn cors_layer_rejects_invalid_header_value() {
        let result = cors_layer(&["bad\norigin".to_string()]);
        assert!(result.is_err());
    }
}
