//! Stateless bearer-token issue and verify.
//!
//! Tokens are HS256 JWTs signed with a server-held symmetric secret. There
//! is no revocation store: validity is signature plus expiry, nothing else.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::api::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// User id.
    pub uid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_days: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl: Duration::days(ttl_days),
        }
    }

    /// # Errors
    ///
    /// Returns `Internal` if signing fails
    pub fn issue(&self, username: &str, id: Uuid) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            uid: id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|err| {
            error!("Failed to sign token: {err}");
            ApiError::Internal
        })
    }

    /// Every failure mode on attacker-controlled input (bad signature,
    /// malformed structure, elapsed expiry) funnels into the same
    /// `Auth` rejection.
    ///
    /// # Errors
    ///
    /// Returns `Auth` when the token does not verify
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Auth(ApiError::INVALID_TOKEN.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from("sekret".to_string()), 7)
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let codec = codec();
        let id = Uuid::new_v4();

        let token = codec.issue("alice", id).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.uid, id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            uid: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"sekret"),
        )
        .unwrap();

        let err = codec.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::Auth(msg) if msg == ApiError::INVALID_TOKEN));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let codec = codec();
        let other = TokenCodec::new(&SecretString::from("other".to_string()), 7);

        let token = other.issue("alice", Uuid::new_v4()).unwrap();
        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected_not_panicking() {
        let codec = codec();
        for garbage in ["", "abc", "a.b.c", "====", "\u{0}\u{1}"] {
            assert!(codec.verify(garbage).is_err());
        }
    }
}
