use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::backends::BackendIdentity;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and merging configuration settings. The config is built
/// exactly once at startup (file, then environment overrides, then CLI
/// overrides) and passed by reference into every component that needs
/// it; nothing reads the environment lazily afterwards.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// OCR extraction settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Settings shared by all translation backends
    #[serde(default)]
    pub translation: TranslationCommonConfig,

    /// Google Cloud Translation backend settings
    #[serde(default)]
    pub cloud: CloudConfig,

    /// Gemini (LLM) backend settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Local translation engine settings
    #[serde(default)]
    pub local: LocalConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation strategy for backends that can take a whole document in
/// one request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// One request for the entire document (maximal context)
    #[default]
    Document,
    /// Many bounded-segment requests, reassembled afterwards
    Chunked,
}

impl std::str::FromStr for TranslationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "document" => Ok(Self::Document),
            "chunked" => Ok(Self::Chunked),
            _ => Err(anyhow!("Invalid translation mode: {}", s)),
        }
    }
}

/// Request spacing policy for one backend identity.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct RatePolicy {
    /// Minimum delay before each API request, in milliseconds
    pub request_delay_ms: u64,

    /// Minimum delay between consecutive segments, in milliseconds
    pub segment_delay_ms: u64,

    /// Advisory requests-per-minute ceiling; never enforced, only logged
    pub max_requests_per_minute: Option<u32>,
}

/// OCR extraction settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OcrConfig {
    /// Rasterization resolution in DPI
    #[serde(default = "default_ocr_dpi")]
    pub dpi: u32,

    /// Extra arguments passed to the tesseract CLI
    #[serde(default = "default_tesseract_args")]
    pub tesseract_args: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: default_ocr_dpi(),
            tesseract_args: default_tesseract_args(),
        }
    }
}

/// Settings shared by all translation backends.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Maximum characters per chunked request (backends may use less)
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Temperature for generative backends (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output-token ceiling for chunked generative requests
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Output-token ceiling for whole-document generative requests
    #[serde(default = "default_document_max_output_tokens")]
    pub document_max_output_tokens: u32,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds, doubled on each retry)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            document_max_output_tokens: default_document_max_output_tokens(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Google Cloud Translation backend settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloudConfig {
    /// API key (env: GOOGLE_TRANSLATE_API_KEY)
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Google Cloud project id (env: GOOGLE_CLOUD_PROJECT)
    #[serde(default = "String::new")]
    pub project_id: String,

    /// Service endpoint URL
    #[serde(default = "default_cloud_endpoint")]
    pub endpoint: String,

    /// Maximum characters per translation request
    #[serde(default = "default_cloud_max_segment_chars")]
    pub max_segment_chars: usize,

    /// Request spacing policy
    #[serde(default = "default_cloud_rate")]
    pub rate: RatePolicy,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            endpoint: default_cloud_endpoint(),
            max_segment_chars: default_cloud_max_segment_chars(),
            rate: default_cloud_rate(),
        }
    }
}

/// Gemini backend settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    /// API key (env: GEMINI_API_KEY)
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name (env: GEMINI_MODEL)
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Whole-document vs chunked strategy (env: GEMINI_TRANSLATION_MODE)
    #[serde(default)]
    pub mode: TranslationMode,

    /// Request spacing policy
    #[serde(default = "default_llm_rate")]
    pub rate: RatePolicy,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            mode: TranslationMode::default(),
            rate: default_llm_rate(),
        }
    }
}

/// Local translation engine settings.
///
/// All three local engines share one spacing policy (they are keyed by
/// their own identities in the governor, so each still has an
/// independent request window).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LocalConfig {
    /// Preferred local service name, overriding the priority order
    #[serde(default)]
    pub preferred_service: Option<String>,

    /// Command used to invoke Argos Translate
    #[serde(default = "default_argos_command")]
    pub argos_command: String,

    /// Endpoint of a locally served MarianMT translation model
    #[serde(default = "default_huggingface_endpoint")]
    pub huggingface_endpoint: String,

    /// MarianMT model identifier the local server hosts
    #[serde(default = "default_huggingface_model")]
    pub huggingface_model: String,

    /// LibreTranslate endpoint (public instance or a locally run one)
    #[serde(default = "default_libretranslate_endpoint")]
    pub libretranslate_endpoint: String,

    /// Maximum characters per Argos invocation
    #[serde(default = "default_argos_max_segment_chars")]
    pub argos_max_segment_chars: usize,

    /// Maximum characters per MarianMT request
    #[serde(default = "default_huggingface_max_segment_chars")]
    pub huggingface_max_segment_chars: usize,

    /// Maximum characters per LibreTranslate request
    #[serde(default = "default_libretranslate_max_segment_chars")]
    pub libretranslate_max_segment_chars: usize,

    /// Request spacing policy shared by the local engines
    #[serde(default = "default_local_rate")]
    pub rate: RatePolicy,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            preferred_service: None,
            argos_command: default_argos_command(),
            huggingface_endpoint: default_huggingface_endpoint(),
            huggingface_model: default_huggingface_model(),
            libretranslate_endpoint: default_libretranslate_endpoint(),
            argos_max_segment_chars: default_argos_max_segment_chars(),
            huggingface_max_segment_chars: default_huggingface_max_segment_chars(),
            libretranslate_max_segment_chars: default_libretranslate_max_segment_chars(),
            rate: default_local_rate(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_ocr_dpi() -> u32 {
    300
}

fn default_tesseract_args() -> Vec<String> {
    // Matches the engine/page-segmentation mode tuned for Tamil body text
    vec![
        "--oem".to_string(),
        "1".to_string(),
        "--psm".to_string(),
        "6".to_string(),
    ]
}

fn default_max_chunk_size() -> usize {
    6000
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_document_max_output_tokens() -> u32 {
    30000
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_cloud_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_cloud_max_segment_chars() -> usize {
    5000
}

fn default_cloud_rate() -> RatePolicy {
    RatePolicy {
        request_delay_ms: 500,
        segment_delay_ms: 200,
        max_requests_per_minute: Some(100),
    }
}

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_llm_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_llm_rate() -> RatePolicy {
    // The free Gemini tier allows 15 requests per minute; 2s spacing keeps
    // a serialized stream well under it
    RatePolicy {
        request_delay_ms: 2000,
        segment_delay_ms: 1000,
        max_requests_per_minute: Some(15),
    }
}

fn default_argos_command() -> String {
    "argos-translate".to_string()
}

fn default_huggingface_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_huggingface_model() -> String {
    "Helsinki-NLP/opus-mt-mul-en".to_string()
}

fn default_libretranslate_endpoint() -> String {
    "https://translate.argosopentech.com".to_string()
}

fn default_argos_max_segment_chars() -> usize {
    2000
}

fn default_huggingface_max_segment_chars() -> usize {
    1000
}

fn default_libretranslate_max_segment_chars() -> usize {
    3000
}

fn default_local_rate() -> RatePolicy {
    RatePolicy {
        request_delay_ms: 500,
        segment_delay_ms: 200,
        max_requests_per_minute: Some(120),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            translation: TranslationCommonConfig::default(),
            cloud: CloudConfig::default(),
            llm: LlmConfig::default(),
            local: LocalConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the optional JSON config file,
    /// then environment-variable overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
                serde_json::from_str(&content)
                    .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?
            }
            _ => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Apply environment-variable overrides on top of the loaded values.
    ///
    /// Variable names follow the tool's documented configuration surface;
    /// delays are given in (possibly fractional) seconds.
    pub fn apply_env(&mut self) {
        if let Ok(v) = env::var("GEMINI_API_KEY") {
            self.llm.api_key = v;
        }
        if let Ok(v) = env::var("GEMINI_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = env::var("GEMINI_TRANSLATION_MODE") {
            if let Ok(mode) = v.parse() {
                self.llm.mode = mode;
            }
        }
        env_delay("GEMINI_DELAY_BETWEEN_REQUESTS", &mut self.llm.rate.request_delay_ms);
        env_delay("GEMINI_DELAY_BETWEEN_CHUNKS", &mut self.llm.rate.segment_delay_ms);
        env_rpm("GEMINI_MAX_REQUESTS_PER_MINUTE", &mut self.llm.rate.max_requests_per_minute);

        if let Ok(v) = env::var("GOOGLE_TRANSLATE_API_KEY") {
            self.cloud.api_key = v;
        }
        if let Ok(v) = env::var("GOOGLE_CLOUD_PROJECT") {
            self.cloud.project_id = v;
        }
        env_delay(
            "GOOGLE_TRANSLATE_DELAY_BETWEEN_REQUESTS",
            &mut self.cloud.rate.request_delay_ms,
        );
        env_delay(
            "GOOGLE_TRANSLATE_DELAY_BETWEEN_CHUNKS",
            &mut self.cloud.rate.segment_delay_ms,
        );
        env_rpm(
            "GOOGLE_TRANSLATE_MAX_REQUESTS_PER_MINUTE",
            &mut self.cloud.rate.max_requests_per_minute,
        );

        env_delay(
            "LOCAL_TRANSLATE_DELAY_BETWEEN_REQUESTS",
            &mut self.local.rate.request_delay_ms,
        );
        env_delay(
            "LOCAL_TRANSLATE_DELAY_BETWEEN_CHUNKS",
            &mut self.local.rate.segment_delay_ms,
        );
        env_rpm(
            "LOCAL_TRANSLATE_MAX_REQUESTS_PER_MINUTE",
            &mut self.local.rate.max_requests_per_minute,
        );
        if let Ok(v) = env::var("HUGGINGFACE_ENDPOINT") {
            self.local.huggingface_endpoint = v;
        }
        if let Ok(v) = env::var("LIBRETRANSLATE_ENDPOINT") {
            self.local.libretranslate_endpoint = v;
        }

        if let Ok(v) = env::var("MAX_CHUNK_SIZE") {
            if let Ok(n) = v.parse() {
                self.translation.max_chunk_size = n;
            }
        }
        if let Ok(v) = env::var("TRANSLATION_TEMPERATURE") {
            if let Ok(t) = v.parse() {
                self.translation.temperature = t;
            }
        }
        if let Ok(v) = env::var("TRANSLATION_MAX_OUTPUT_TOKENS") {
            if let Ok(n) = v.parse() {
                self.translation.max_output_tokens = n;
            }
        }
        if let Ok(v) = env::var("TRANSLATION_DOCUMENT_MAX_OUTPUT_TOKENS") {
            if let Ok(n) = v.parse() {
                self.translation.document_max_output_tokens = n;
            }
        }

        if let Ok(v) = env::var("OCR_DPI") {
            if let Ok(n) = v.parse() {
                self.ocr.dpi = n;
            }
        }
        if let Ok(v) = env::var("TESSERACT_CONFIG") {
            self.ocr.tesseract_args = v.split_whitespace().map(String::from).collect();
        }

        if let Ok(v) = env::var("VERBOSE_LOGGING") {
            if v.eq_ignore_ascii_case("true") {
                self.log_level = LogLevel::Debug;
            }
        }
    }

    /// Validate the configuration for consistency and required values.
    pub fn validate(&self) -> Result<()> {
        if self.translation.max_chunk_size == 0 {
            return Err(anyhow!("max_chunk_size must be positive"));
        }
        if !(0.0..=1.0).contains(&self.translation.temperature) {
            return Err(anyhow!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.translation.temperature
            ));
        }
        if self.ocr.dpi == 0 {
            return Err(anyhow!("OCR DPI must be positive"));
        }
        Ok(())
    }

    /// The request spacing policy for a backend identity.
    ///
    /// The three local identities share the local policy; the governor
    /// still tracks their request windows independently.
    pub fn rate_policy(&self, identity: BackendIdentity) -> RatePolicy {
        match identity {
            BackendIdentity::Cloud => self.cloud.rate,
            BackendIdentity::Llm => self.llm.rate,
            BackendIdentity::LocalHuggingFace
            | BackendIdentity::LocalArgos
            | BackendIdentity::LocalLibreTranslate => self.local.rate,
        }
    }

}

fn env_delay(name: &str, target: &mut u64) {
    if let Ok(v) = env::var(name) {
        if let Ok(secs) = v.parse::<f64>() {
            if secs >= 0.0 {
                *target = (secs * 1000.0) as u64;
            }
        }
    }
}

fn env_rpm(name: &str, target: &mut Option<u32>) {
    if let Ok(v) = env::var(name) {
        if let Ok(n) = v.parse::<u32>() {
            *target = if n == 0 { None } else { Some(n) };
        }
    }
}
