/*!
 * Error types for the tamil-pdf-ocr application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 * The split mirrors the failure policy: configuration and validation
 * errors abort before any work, OCR errors abort a run, backend errors
 * are scoped to a single segment and recovered inline, and a batch error
 * is raised only when every segment in an invocation failed.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing a backend or loading configuration.
///
/// These are always fatal and are reported before any processing starts.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A required credential is missing from the environment/config
    #[error("missing credential for {backend}: set {hint}")]
    MissingCredential {
        /// Backend display name
        backend: &'static str,
        /// Environment variable or config key the user should set
        hint: &'static str,
    },

    /// A configured endpoint could not be parsed
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The offending endpoint string
        endpoint: String,
        /// Parse failure detail
        reason: String,
    },

    /// No local translation engine could be probed successfully
    #[error("no local translation services available")]
    NoLocalServiceAvailable,

    /// A backend was constructed but failed its readiness probe
    #[error("{backend} backend not ready: {reason}")]
    BackendNotReady {
        /// Backend display name
        backend: &'static str,
        /// Probe failure detail
        reason: String,
    },

    /// The config file exists but could not be read or parsed
    #[error("failed to load config file {path:?}: {reason}")]
    BadConfigFile {
        /// Path to the config file
        path: PathBuf,
        /// Read/parse failure detail
        reason: String,
    },

    /// A configuration value is out of range or inconsistent
    #[error("invalid configuration: {0}")]
    InvalidValue(String),
}

/// Errors that can occur during OCR extraction.
#[derive(Error, Debug)]
pub enum OcrError {
    /// A required external tool is not installed or not runnable
    #[error("OCR tool unavailable: {0}")]
    ToolUnavailable(String),

    /// PDF rasterization failed
    #[error("failed to rasterize PDF: {0}")]
    RasterizeFailed(String),

    /// The OCR engine failed on a page image
    #[error("text recognition failed on page {page}: {reason}")]
    RecognitionFailed {
        /// 1-indexed page number
        page: u32,
        /// Engine failure detail
        reason: String,
    },

    /// Every processed page came back empty
    #[error("no text extracted from any pages")]
    NoTextExtracted,

    /// Underlying I/O failure (temp files, image listing)
    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when a backend translates a single segment.
///
/// A `BackendError` never aborts sibling segments; the orchestrator
/// substitutes a placeholder and continues.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The API returned a well-formed but empty result
    #[error("empty response from backend")]
    EmptyResponse,

    /// An external translation process exited with a failure
    #[error("translation process failed: {0}")]
    ProcessFailed(String),

    /// The backend does not implement whole-document translation
    #[error("backend does not support whole-document translation")]
    WholeDocumentUnsupported,

    /// The backend (or the selected local service) is not ready for use
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Raised when every segment in a translation batch failed.
///
/// Distinguishes "some degraded output" (placeholders inline, run
/// continues) from "total failure" (nothing was translated at all).
#[derive(Error, Debug)]
#[error("all {attempted} translation segments failed")]
pub struct BatchTranslationError {
    /// Number of segments that were attempted (and failed)
    pub attempted: usize,
}

/// Input validation errors, reported before processing starts.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The input PDF does not exist
    #[error("PDF file not found: {0}")]
    InputNotFound(PathBuf),

    /// Page bounds are inconsistent
    #[error("start page {start} must be less than or equal to end page {end}")]
    BadPageRange {
        /// Requested first page (1-indexed)
        start: u32,
        /// Requested last page (1-indexed)
        end: u32,
    },

    /// A page bound is zero (pages are 1-indexed)
    #[error("page numbers are 1-indexed, got {0}")]
    ZeroPage(u32),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Configuration or backend-construction failure
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// OCR extraction failure
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Single-segment backend failure (only surfaces when unrecovered)
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Whole-batch translation failure
    #[error("Translation error: {0}")]
    Batch(#[from] BatchTranslationError),

    /// Input validation failure
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
