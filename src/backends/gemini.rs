/*!
 * Gemini generative-LLM backend.
 *
 * Talks to the generateContent REST surface. Supports two strategies:
 * chunked (bounded paragraph segments, maximum compatibility) and
 * whole-document (one request carrying the full text, maximal
 * cross-sentence context). Which one the orchestrator uses is decided by
 * the configured translation mode.
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::{LlmConfig, TranslationCommonConfig, TranslationMode};
use crate::backends::{send_with_retry, BackendIdentity, TranslationBackend};
use crate::errors::{BackendError, ConfigurationError};
use crate::segmenter::SegmentBoundary;

/// System instruction guiding the model toward plain translation output.
const SYSTEM_INSTRUCTION: &str = "You are a professional translator specializing in Tamil to English translation. \
Translate the provided Tamil text accurately while maintaining the original meaning, context, and tone. \
Keep proper nouns and names unchanged unless they have standard English equivalents. \
Please provide only the English translation without any additional commentary or explanations.";

/// Gemini client for the generateContent API.
pub struct GeminiBackend {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Model name
    model: String,
    /// Configured translation strategy
    mode: TranslationMode,
    /// Sampling temperature
    temperature: f32,
    /// Output-token ceiling for chunked requests
    max_output_tokens: u32,
    /// Output-token ceiling for whole-document requests
    document_max_output_tokens: u32,
    /// Maximum characters per chunked request
    max_segment_chars: usize,
    /// Retry attempts for transient failures
    max_retries: u32,
    /// Base backoff time in milliseconds
    backoff_base_ms: u64,
}

/// generateContent request body.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// generateContent response envelope.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiBackend {
    /// Create a new client from configuration.
    ///
    /// Fails if no API key is configured.
    pub fn new(
        config: &LlmConfig,
        common: &TranslationCommonConfig,
    ) -> Result<Self, ConfigurationError> {
        if config.api_key.is_empty() {
            return Err(ConfigurationError::MissingCredential {
                backend: "Gemini",
                hint: "GEMINI_API_KEY",
            });
        }

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            mode: config.mode,
            temperature: common.temperature,
            max_output_tokens: common.max_output_tokens,
            document_max_output_tokens: common.document_max_output_tokens,
            max_segment_chars: common.max_chunk_size,
            max_retries: common.retry_count,
            backoff_base_ms: common.retry_backoff_ms,
        })
    }

    /// Output-token ceiling for a whole-document request.
    ///
    /// Tamil-to-English output usually lands near the input's character
    /// count; one token covers roughly 3-4 characters, so the estimate
    /// leaves generous headroom and is clamped to the configured ceiling.
    fn estimate_document_tokens(&self, input_chars: usize) -> u32 {
        let estimated = ((input_chars as f64 * 1.5) / 3.0) as u32;
        estimated.max(8000).min(self.document_max_output_tokens)
    }

    async fn generate(&self, prompt: String, max_tokens: u32) -> Result<String, BackendError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: max_tokens,
            },
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

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect();

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl TranslationBackend for GeminiBackend {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity::Llm
    }

    fn segment_boundary(&self) -> SegmentBoundary {
        SegmentBoundary::Paragraph
    }

    fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    fn supports_whole_document(&self) -> bool {
        self.mode == TranslationMode::Document
    }

    async fn probe_ready(&self) -> Result<(), BackendError> {
        // A trivial generation exercises the key, model name and endpoint
        self.generate("Hello".to_string(), 100).await.map(|_| ())
    }

    async fn translate(&self, text: &str) -> Result<String, BackendError> {
        let prompt = format!("Translate this Tamil text to English:\n\n{}", text);
        send_with_retry(
            "Gemini translation request",
            self.max_retries,
            self.backoff_base_ms,
            || self.generate(prompt.clone(), self.max_output_tokens),
        )
        .await
    }

    async fn translate_whole(&self, text: &str) -> Result<String, BackendError> {
        let prompt = format!(
            "Please translate this complete Tamil document to English.\n\n\
             Instructions:\n\
             - Maintain the narrative flow and coherence throughout\n\
             - Preserve the original structure and paragraphing\n\
             - Keep proper nouns and character names unchanged\n\
             - Ensure consistent terminology throughout the document\n\
             - Maintain the tone and style of the original text\n\n\
             Tamil Text to Translate:\n\n{}",
            text
        );

        let max_tokens = self.estimate_document_tokens(text.chars().count());
        send_with_retry(
            "Gemini document translation",
            self.max_retries,
            self.backoff_base_ms,
            || self.generate(prompt.clone(), max_tokens),
        )
        .await
    }
}
