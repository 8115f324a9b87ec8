/*!
 * Backend adapters for the supported translation services.
 *
 * This module contains client implementations for the translation
 * providers behind one uniform trait:
 * - Cloud: Google Cloud Translation API
 * - Gemini: generative LLM with an optional whole-document strategy
 * - Argos / HuggingFace / LibreTranslate: local engines, chosen through
 *   the `LocalTranslator` meta-adapter
 */

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::error;

use crate::errors::BackendError;
use crate::segmenter::SegmentBoundary;

pub mod argos;
pub mod cloud;
pub mod gemini;
pub mod huggingface;
pub mod libretranslate;
pub mod local;
pub mod mock;

/// Identity tag for a translation backend.
///
/// Used as the key for rate-limit bookkeeping; each identity has an
/// independent request-time window in the governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendIdentity {
    /// Google Cloud Translation API
    Cloud,
    /// Gemini generative LLM
    Llm,
    /// Locally served MarianMT model
    LocalHuggingFace,
    /// Argos Translate (fully offline)
    LocalArgos,
    /// LibreTranslate instance
    LocalLibreTranslate,
}

impl BackendIdentity {
    /// Every identity, in a fixed order.
    pub const ALL: [BackendIdentity; 5] = [
        Self::Cloud,
        Self::Llm,
        Self::LocalHuggingFace,
        Self::LocalArgos,
        Self::LocalLibreTranslate,
    ];

    /// Lowercase identity tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::Llm => "llm",
            Self::LocalHuggingFace => "local-huggingface",
            Self::LocalArgos => "local-argos",
            Self::LocalLibreTranslate => "local-libretranslate",
        }
    }
}

impl fmt::Display for BackendIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendIdentity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "cloud" => Ok(Self::Cloud),
            "llm" => Ok(Self::Llm),
            "local-huggingface" | "huggingface" => Ok(Self::LocalHuggingFace),
            "local-argos" | "argos" => Ok(Self::LocalArgos),
            "local-libretranslate" | "libretranslate" => Ok(Self::LocalLibreTranslate),
            _ => Err(anyhow::anyhow!("Invalid backend identity: {}", s)),
        }
    }
}

/// Common trait for all translation backends.
///
/// Every variant translates one bounded segment at a time; a backend that
/// can take the whole document in a single request additionally reports
/// `supports_whole_document() == true` and implements `translate_whole`.
/// Failures are segment-scoped: an `Err` from `translate` never aborts
/// sibling segments.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Identity tag for rate-limit bookkeeping.
    fn identity(&self) -> BackendIdentity;

    /// Boundary the segmenter should split along for this backend.
    fn segment_boundary(&self) -> SegmentBoundary {
        SegmentBoundary::Line
    }

    /// Maximum characters per `translate` request.
    fn max_segment_chars(&self) -> usize;

    /// True when this backend's configured mode selects the
    /// whole-document strategy.
    fn supports_whole_document(&self) -> bool {
        false
    }

    /// Check that the backend's prerequisites (credentials, installed
    /// model, reachable endpoint) are in place. Called once right after
    /// construction; a failure here is a configuration-time error, not a
    /// per-segment one.
    async fn probe_ready(&self) -> Result<(), BackendError>;

    /// Translate one segment of Tamil text to English.
    async fn translate(&self, text: &str) -> Result<String, BackendError>;

    /// Translate an entire document in one request.
    ///
    /// Only meaningful when `supports_whole_document()` is true.
    async fn translate_whole(&self, _text: &str) -> Result<String, BackendError> {
        Err(BackendError::WholeDocumentUnsupported)
    }
}

/// Retry an HTTP request with exponential backoff.
///
/// Server errors (5xx), rate-limit rejections (429) and transport errors
/// are retried up to `max_retries` times; any other failure is returned
/// immediately, since repeating a client error only burns quota.
pub(crate) async fn send_with_retry<F, Fut>(
    what: &str,
    max_retries: u32,
    backoff_base_ms: u64,
    mut attempt_fn: F,
) -> Result<String, BackendError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<String, BackendError>>,
{
    let mut attempt = 0;
    let mut last_error = None;

    while attempt <= max_retries {
        match attempt_fn().await {
            Ok(text) => return Ok(text),
            Err(e) => {
                let retryable = match &e {
                    BackendError::RequestFailed(_) => true,
                    BackendError::ApiError { status_code, .. } => {
                        *status_code >= 500 || *status_code == 429
                    }
                    _ => false,
                };

                if !retryable {
                    return Err(e);
                }

                error!(
                    "{} failed: {} - attempt {}/{}",
                    what,
                    e,
                    attempt + 1,
                    max_retries + 1
                );
                last_error = Some(e);
            }
        }

        attempt += 1;
        if attempt <= max_retries {
            let backoff_ms = backoff_base_ms * (1u64 << (attempt - 1));
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        BackendError::RequestFailed(format!("{} failed after {} attempts", what, max_retries + 1))
    }))
}
