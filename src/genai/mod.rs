//! Templated prompt proxy for the Gemini `generateContent` API.
//!
//! One attempt per request, no retry; callers may re-submit. Provider
//! failures are logged with detail and surface to clients as a generic
//! upstream error.

use anyhow::Result;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::error;

use crate::{api::error::ApiError, APP_USER_AGENT};

pub const MODEL: &str = "gemini-2.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tutoring task selecting a fixed instructional prefix. The table is
/// compile-time constant and not user-modifiable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    ExplainSimply,
    QuickRevision,
    Quiz,
}

impl TaskKind {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::ExplainSimply => "Explain like I am 5: ",
            Self::QuickRevision => "Give a quick revision: ",
            Self::Quiz => "Make a short quiz of 3 questions with answers for: ",
        }
    }

    fn render(self, content: &str) -> String {
        format!("{}{}", self.prefix(), content)
    }
}

#[derive(Debug, Clone)]
pub struct GenAiClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl GenAiClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    pub fn new(api_key: SecretString) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Render `prefix + content` and forward it to the provider.
    ///
    /// # Errors
    ///
    /// `Validation` when content is empty, `Upstream` on any provider failure
    pub async fn run(&self, task: TaskKind, content: &str) -> Result<String, ApiError> {
        if content.trim().is_empty() {
            return Err(ApiError::Validation(
                "Content is required for AI.".to_string(),
            ));
        }

        let prompt = task.render(content);
        let url = format!("{}/models/{MODEL}:generateContent", self.base_url);
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                error!("Generation request failed: {err}");
                ApiError::Upstream
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Generation provider returned {status}: {body}");
            return Err(ApiError::Upstream);
        }

        let body: Value = response.json().await.map_err(|err| {
            error!("Malformed provider response: {err}");
            ApiError::Upstream
        })?;

        extract_text(&body).ok_or_else(|| {
            error!("Provider response missing candidate text");
            ApiError::Upstream
        })
    }
}

fn extract_text(body: &Value) -> Option<String> {
    body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(ToString::to_string)
}
