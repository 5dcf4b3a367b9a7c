//! Salted, cost-tunable password hashing on the blocking pool.
//!
//! bcrypt is CPU-bound; running it on `spawn_blocking` keeps request workers
//! free. Plaintext is moved in and never logged.

use tracing::error;

use crate::api::error::ApiError;

/// # Errors
///
/// Returns `Internal` if hashing fails
pub async fn hash(plaintext: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
        .await
        .map_err(|err| {
            error!("Hashing task failed: {err}");
            ApiError::Internal
        })?
        .map_err(|err| {
            error!("Failed to hash password: {err}");
            ApiError::Internal
        })
}

/// # Errors
///
/// Returns `Internal` if the digest is malformed or the task fails
pub async fn verify(plaintext: String, digest: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest))
        .await
        .map_err(|err| {
            error!("Verification task failed: {err}");
            ApiError::Internal
        })?
        .map_err(|err| {
            error!("Failed to verify password: {err}");
            ApiError::Internal
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt minimum cost, keeps the tests fast
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_then_verify_accepts_correct_password() {
        let digest = hash("secret123".to_string(), TEST_COST).await.unwrap();
        assert!(digest.starts_with("$2"));
        assert!(verify("secret123".to_string(), digest).await.unwrap());
    }

    #[tokio::test]
    async fn verify_rejects_wrong_password() {
        let digest = hash("secret123".to_string(), TEST_COST).await.unwrap();
        assert!(!verify("wrong".to_string(), digest).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let first = hash("secret123".to_string(), TEST_COST).await.unwrap();
        let second = hash("secret123".to_string(), TEST_COST).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn verify_malformed_digest_is_an_error() {
        assert!(verify("secret123".to_string(), "not-a-digest".to_string())
            .await
            .is_err());
    }
}
