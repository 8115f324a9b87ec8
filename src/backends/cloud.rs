/*!
 * Google Cloud Translation API backend.
 *
 * Uses the v2 REST surface with an API key. Requests carry explicit
 * source/target language codes; the Tamil-to-English pair is fixed for
 * this tool.
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::{CloudConfig, TranslationCommonConfig};
use crate::backends::{send_with_retry, BackendIdentity, TranslationBackend};
use crate::errors::{BackendError, ConfigurationError};

/// Google Cloud Translation client.
pub struct CloudTranslateBackend {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Maximum characters per request
    max_segment_chars: usize,
    /// Retry attempts for transient failures
    max_retries: u32,
    /// Base backoff time in milliseconds
    backoff_base_ms: u64,
}

/// Translation request body for the v2 API.
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Text to translate
    q: &'a str,
    /// Source language code
    source: &'a str,
    /// Target language code
    target: &'a str,
    /// Input format; "text" avoids HTML entity escaping
    format: &'a str,
}

/// Translation response envelope from the v2 API.
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl CloudTranslateBackend {
    /// Create a new client from configuration.
    ///
    /// Fails if no API key is configured; missing credentials are a
    /// construction-time error, reported before any work starts.
    pub fn new(
        config: &CloudConfig,
        common: &TranslationCommonConfig,
    ) -> Result<Self, ConfigurationError> {
        if config.api_key.is_empty() {
            return Err(ConfigurationError::MissingCredential {
                backend: "Google Cloud Translation",
                hint: "GOOGLE_TRANSLATE_API_KEY",
            });
        }

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            max_segment_chars: config.max_segment_chars,
            max_retries: common.retry_count,
            backoff_base_ms: common.retry_backoff_ms,
        })
    }

    async fn request_translation(&self, text: &str) -> Result<String, BackendError> {
        let url = format!(
            "{}/language/translate/v2?key={}",
            self.endpoint, self.api_key
        );

        let body = TranslateRequest {
            q: text,
            source: "ta",
            target: "en",
            format: "text",
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(BackendError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or(BackendError::EmptyResponse)
    }
}

#[async_trait]
impl TranslationBackend for CloudTranslateBackend {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity::Cloud
    }

    fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    async fn probe_ready(&self) -> Result<(), BackendError> {
        // A one-word translation exercises credentials and connectivity
        self.request_translation("வணக்கம்").await.map(|_| ())
    }

    async fn translate(&self, text: &str) -> Result<String, BackendError> {
        send_with_retry(
            "Cloud translation request",
            self.max_retries,
            self.backoff_base_ms,
            || self.request_translation(text),
        )
        .await
    }
}
