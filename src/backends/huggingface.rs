/*!
 * Locally served MarianMT translation backend.
 *
 * Talks to a local inference server hosting a Helsinki-NLP opus-mt model
 * through the HuggingFace `translation` pipeline wire format: POST a
 * JSON body with an `inputs` string, get back a list of objects carrying
 * `translation_text`. The multilingual model needs a `>>tam<<` source
 * hint prefixed to the input.
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app_config::LocalConfig;
use crate::backends::{BackendIdentity, TranslationBackend};
use crate::errors::{BackendError, ConfigurationError};

/// Client for a locally hosted MarianMT translation model.
pub struct HuggingFaceBackend {
    /// HTTP client for the local server
    client: Client,
    /// Server base URL
    endpoint: String,
    /// Model identifier the server hosts (diagnostics only)
    model: String,
    /// Maximum characters per request
    max_segment_chars: usize,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct InferenceResult {
    translation_text: String,
}

impl HuggingFaceBackend {
    /// Create a new client from configuration.
    pub fn new(config: &LocalConfig) -> Result<Self, ConfigurationError> {
        let endpoint = config.huggingface_endpoint.trim_end_matches('/').to_string();
        Url::parse(&endpoint).map_err(|e| ConfigurationError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            endpoint,
            model: config.huggingface_model.clone(),
            max_segment_chars: config.huggingface_max_segment_chars,
        })
    }

    /// Model identifier this client expects the server to host.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TranslationBackend for HuggingFaceBackend {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity::LocalHuggingFace
    }

    fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    async fn probe_ready(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(format!("{}/health", self.endpoint))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable(format!(
                "local model server at {} responded with {}",
                self.endpoint,
                response.status()
            )))
        }
    }

    async fn translate(&self, text: &str) -> Result<String, BackendError> {
        // Language hint for the multilingual opus-mt model
        let hinted = format!(">>tam<< {}", text);
        let body = InferenceRequest { inputs: &hinted };

        let response = self
            .client
            .post(&self.endpoint)
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

        let results: Vec<InferenceResult> = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        results
            .into_iter()
            .next()
            .map(|r| r.translation_text)
            .ok_or(BackendError::EmptyResponse)
    }
}
