//! Google Translate web endpoint.

use std::time::Duration;

use tokio::runtime::Runtime;

use super::Translator;
use crate::error::{Error, Result};
use crate::language::Language;

/// Default service root.
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Translator backed by the public `translate_a/single` endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    runtime: Runtime,
    endpoint: String,
}

impl GoogleTranslator {
    /// Create a translator with a custom endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns `Error::Translator` if the HTTP client or the runtime
    /// cannot be built.
    pub fn with_config(endpoint: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Translator(format!("Failed to build HTTP client: {e}")))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Translator(format!("Failed to create runtime: {e}")))?;

        let endpoint = endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            runtime,
            endpoint,
        })
    }

    /// Create a translator for the default endpoint.
    ///
    /// # Errors
    ///
    /// See [`GoogleTranslator::with_config`].
    pub fn new() -> Result<Self> {
        Self::with_config(None, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| Error::Translator(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translator(format!("Service returned {status}: {body}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Translator(format!("Failed to parse response: {e}")))?;

        parse_response(&body)
    }
}

impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String> {
        tracing::debug!(from = source.code, to = target.code, len = text.len(), "Translating");
        self.runtime.block_on(self.request(text, source.code, target.code))
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body is a nested array whose first element lists sentence
/// segments; each segment's first element is the translated text.
fn parse_response(body: &serde_json::Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| Error::Translator("Response has no translation segments".into()))?;

    let mut out = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(serde_json::Value::as_str) {
            out.push_str(part);
        }
    }

    if out.is_empty() {
        return Err(Error::Translator("Response contained no translated text".into()));
    }
    Ok(out)
}
