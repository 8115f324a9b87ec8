/*!
 * LibreTranslate backend.
 *
 * Works against any LibreTranslate instance: the public one or a
 * locally-run server. Readiness requires the instance to list both `ta`
 * and `en` among its languages.
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app_config::LocalConfig;
use crate::backends::{BackendIdentity, TranslationBackend};
use crate::errors::{BackendError, ConfigurationError};

/// LibreTranslate API client.
pub struct LibreTranslateBackend {
    /// HTTP client for API requests
    client: Client,
    /// Instance base URL
    endpoint: String,
    /// Maximum characters per request
    max_segment_chars: usize,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct Language {
    code: String,
}

impl LibreTranslateBackend {
    /// Create a new client from configuration.
    pub fn new(config: &LocalConfig) -> Result<Self, ConfigurationError> {
        let endpoint = config
            .libretranslate_endpoint
            .trim_end_matches('/')
            .to_string();
        Url::parse(&endpoint).map_err(|e| ConfigurationError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint,
            max_segment_chars: config.libretranslate_max_segment_chars,
        })
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslateBackend {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity::LocalLibreTranslate
    }

    fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    async fn probe_ready(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(format!("{}/languages", self.endpoint))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::Unavailable(format!(
                "LibreTranslate at {} responded with {}",
                self.endpoint,
                response.status()
            )));
        }

        let languages: Vec<Language> = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        let has = |code: &str| languages.iter().any(|l| l.code == code);
        if has("ta") && has("en") {
            Ok(())
        } else {
            Err(BackendError::Unavailable(format!(
                "LibreTranslate at {} does not offer the ta-en pair",
                self.endpoint
            )))
        }
    }

    async fn translate(&self, text: &str) -> Result<String, BackendError> {
        let body = TranslateRequest {
            q: text,
            source: "ta",
            target: "en",
            format: "text",
        };

        let response = self
            .client
            .post(format!("{}/translate", self.endpoint))
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

        if parsed.translated_text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(parsed.translated_text)
    }
}
