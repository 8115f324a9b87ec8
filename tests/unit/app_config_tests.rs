/*!
 * Tests for app configuration functionality
 */

use std::str::FromStr;

use tamil_pdf_ocr::app_config::{Config, TranslationMode};
use tamil_pdf_ocr::backends::BackendIdentity;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_default_config_withNoInput_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.translation.max_chunk_size, 6000);
    assert!((config.translation.temperature - 0.1).abs() < f32::EPSILON);
    assert_eq!(config.translation.max_output_tokens, 4096);
    assert_eq!(config.translation.document_max_output_tokens, 30000);
    assert_eq!(config.ocr.dpi, 300);

    assert_eq!(config.llm.model, "gemini-2.5-flash");
    assert_eq!(config.llm.mode, TranslationMode::Document);
    assert_eq!(config.llm.rate.request_delay_ms, 2000);
    assert_eq!(config.llm.rate.segment_delay_ms, 1000);
    assert_eq!(config.llm.rate.max_requests_per_minute, Some(15));

    assert_eq!(config.cloud.rate.request_delay_ms, 500);
    assert_eq!(config.cloud.rate.max_requests_per_minute, Some(100));
    assert_eq!(config.cloud.max_segment_chars, 5000);

    assert_eq!(config.local.rate.max_requests_per_minute, Some(120));
    assert_eq!(config.local.argos_max_segment_chars, 2000);
    assert_eq!(config.local.huggingface_max_segment_chars, 1000);
    assert_eq!(config.local.libretranslate_max_segment_chars, 3000);
}

#[test]
fn test_translation_mode_fromStr_shouldParseKnownModes() {
    assert_eq!(
        TranslationMode::from_str("document").unwrap(),
        TranslationMode::Document
    );
    assert_eq!(
        TranslationMode::from_str("CHUNKED").unwrap(),
        TranslationMode::Chunked
    );
    assert!(TranslationMode::from_str("streaming").is_err());
}

#[test]
fn test_validate_withDefaultConfig_shouldPass() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_withBadTemperature_shouldFail() {
    let mut config = Config::default();
    config.translation.temperature = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroChunkSize_shouldFail() {
    let mut config = Config::default();
    config.translation.max_chunk_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_rate_policy_withLocalIdentities_shouldShareLocalPolicy() {
    let mut config = Config::default();
    config.local.rate.request_delay_ms = 1234;

    for identity in [
        BackendIdentity::LocalArgos,
        BackendIdentity::LocalHuggingFace,
        BackendIdentity::LocalLibreTranslate,
    ] {
        assert_eq!(config.rate_policy(identity).request_delay_ms, 1234);
    }
    assert_eq!(
        config.rate_policy(BackendIdentity::Llm).request_delay_ms,
        2000
    );
}

#[test]
fn test_load_withPartialConfigFile_shouldFillDefaults() {
    let temp_dir = create_temp_dir().unwrap();
    let config_path = create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{"translation": {"max_chunk_size": 1234}, "llm": {"model": "gemini-1.5-pro"}}"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    assert_eq!(config.translation.max_chunk_size, 1234);
    assert_eq!(config.llm.model, "gemini-1.5-pro");
    // Untouched sections keep their defaults
    assert_eq!(config.ocr.dpi, 300);
    assert_eq!(config.cloud.max_segment_chars, 5000);
}

#[test]
fn test_load_withMissingFile_shouldUseDefaults() {
    let temp_dir = create_temp_dir().unwrap();
    let config = Config::load(Some(&temp_dir.path().join("absent.json"))).unwrap();
    assert_eq!(config.translation.max_chunk_size, 6000);
}

#[test]
fn test_load_withMalformedFile_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let config_path = create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        "not valid json {",
    )
    .unwrap();

    assert!(Config::load(Some(&config_path)).is_err());
}

#[test]
fn test_apply_env_withDelayOverride_shouldConvertSecondsToMillis() {
    // Env mutation is process-global; this test owns these names
    unsafe {
        std::env::set_var("GEMINI_DELAY_BETWEEN_REQUESTS", "0.25");
        std::env::set_var("GEMINI_TRANSLATION_MODE", "chunked");
    }

    let mut config = Config::default();
    config.apply_env();

    assert_eq!(config.llm.rate.request_delay_ms, 250);
    assert_eq!(config.llm.mode, TranslationMode::Chunked);

    unsafe {
        std::env::remove_var("GEMINI_DELAY_BETWEEN_REQUESTS");
        std::env::remove_var("GEMINI_TRANSLATION_MODE");
    }
}
