//! Bearer-token guard shared by every protected route.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use super::token::TokenCodec;
use crate::api::error::ApiError;

/// Identity resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub id: Uuid,
}

/// Resolve the `Authorization` header into a [`Principal`].
///
/// The header must be exactly `Bearer <token>`; any other shape is treated
/// as a missing token. Protected routes compose with this guard instead of
/// re-implementing extraction and verification.
///
/// # Errors
///
/// Returns `Auth` when the token is missing, malformed, or does not verify
pub fn require_auth(headers: &HeaderMap, codec: &TokenCodec) -> Result<Principal, ApiError> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| ApiError::Auth(ApiError::MISSING_TOKEN.to_string()))?;

    let claims = codec.verify(&token)?;

    Ok(Principal {
        username: claims.sub,
        id: claims.uid,
    })
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use secrecy::SecretString;

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from("sekret".to_string()), 7)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn valid_bearer_token_resolves_principal() {
        let codec = codec();
        let id = Uuid::new_v4();
        let token = codec.issue("alice", id).unwrap();

        let principal = require_auth(&headers_with(&format!("Bearer {token}")), &codec).unwrap();
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.id, id);
    }

    #[test]
    fn missing_header_is_missing_token() {
        let err = require_auth(&HeaderMap::new(), &codec()).unwrap_err();
        assert!(matches!(err, ApiError::Auth(msg) if msg == ApiError::MISSING_TOKEN));
    }

    #[test]
    fn wrong_scheme_is_missing_token() {
        let err = require_auth(&headers_with("Token abc"), &codec()).unwrap_err();
        assert!(matches!(err, ApiError::Auth(msg) if msg == ApiError::MISSING_TOKEN));
    }

    #[test]
    fn extra_parts_are_missing_token() {
        let err = require_auth(&headers_with("Bearer abc def"), &codec()).unwrap_err();
        assert!(matches!(err, ApiError::Auth(msg) if msg == ApiError::MISSING_TOKEN));
    }

    #[test]
    fn bare_scheme_is_missing_token() {
        let err = require_auth(&headers_with("Bearer"), &codec()).unwrap_err();
        assert!(matches!(err, ApiError::Auth(msg) if msg == ApiError::MISSING_TOKEN));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let codec = codec();
        let token = codec.issue("alice", Uuid::new_v4()).unwrap();
        assert!(require_auth(&headers_with(&format!("bearer {token}")), &codec).is_ok());
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = require_auth(&headers_with("Bearer garbage"), &codec()).unwrap_err();
        assert!(matches!(err, ApiError::Auth(msg) if msg == ApiError::INVALID_TOKEN));
    }
}
