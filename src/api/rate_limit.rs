//! Fixed-window request limiting keyed by client address.
//!
//! Counters are process-local and reset lazily when a request arrives after
//! the window has elapsed; there is no background sweeper. Once the map
//! passes a size threshold, expired windows are swept inline so clients
//! spoofing unique proxy headers cannot grow it without bound. A single
//! mutex over the map gives atomic check-and-increment under concurrency.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::api::error::ApiError;

/// Map size at which expired entries are swept during a check.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

#[derive(Debug)]
struct Window {
    count: u32,
    started_at: Instant,
}

#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub async fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut windows = self.windows.lock().await;

        if windows.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, entry| now.duration_since(entry.started_at) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        if now.duration_since(entry.started_at) >= self.window {
            entry.count = 0;
            entry.started_at = now;
        }

        if entry.count >= self.max_requests {
            return RateLimitDecision::Limited;
        }

        entry.count += 1;
        RateLimitDecision::Allowed
    }
}

pub async fn govern(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    match limiter.check(&key).await {
        RateLimitDecision::Allowed => next.run(request).await,
        RateLimitDecision::Limited => {
            warn!(client = %key, "Rate limit exceeded");
            ApiError::RateLimited.into_response()
        }
    }
}

fn client_key(request: &Request) -> String {
    extract_client_ip(request.headers())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Extract a client IP from common proxy headers.
pub(crate) fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn admits_up_to_max_then_limits() {
        let limiter = FixedWindowLimiter::new(100, Duration::from_secs(60));
        let now = Instant::now();

        for _ in 0..100 {
            assert_eq!(
                limiter.check_at("1.2.3.4", now).await,
                RateLimitDecision::Allowed
            );
        }
        assert_eq!(
            limiter.check_at("1.2.3.4", now).await,
            RateLimitDecision::Limited
        );
    }

    #[tokio::test]
    async fn window_resets_lazily_after_elapse() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert_eq!(limiter.check_at("k", start).await, RateLimitDecision::Allowed);
        assert_eq!(limiter.check_at("k", start).await, RateLimitDecision::Allowed);
        assert_eq!(limiter.check_at("k", start).await, RateLimitDecision::Limited);

        let later = start + Duration::from_secs(61);
        assert_eq!(limiter.check_at("k", later).await, RateLimitDecision::Allowed);
    }

    #[tokio::test]
    async fn keys_are_isolated() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert_eq!(limiter.check_at("a", now).await, RateLimitDecision::Allowed);
        assert_eq!(limiter.check_at("a", now).await, RateLimitDecision::Limited);
        assert_eq!(limiter.check_at("b", now).await, RateLimitDecision::Allowed);
    }

    #[tokio::test]
    async fn expired_windows_are_swept_once_map_is_large() {
        let limiter = FixedWindowLimiter::new(100, Duration::from_secs(60));
        let start = Instant::now();

        // Simulate a client cycling through spoofed forwarded addresses.
        for n in 0..10_000 {
            limiter.check_at(&format!("10.0.{}.{}", n / 256, n % 256), start).await;
        }
        assert_eq!(limiter.windows.lock().await.len(), 10_000);

        let later = start + Duration::from_secs(120);
        assert_eq!(
            limiter.check_at("1.2.3.4", later).await,
            RateLimitDecision::Allowed
        );
        assert_eq!(limiter.windows.lock().await.len(), 1);
    }

    #[test]
    fn extract_client_ip_prefers_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(extract_client_ip(&headers), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(extract_client_ip(&headers), Some("9.9.9.9".to_string()));
    }

    #[test]
    fn extract_client_ip_none_when_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers), None);
    }
}
