/*!
 * Tests for backend adapter functionality
 */

use std::str::FromStr;

use tamil_pdf_ocr::app_config::Config;
use tamil_pdf_ocr::backends::cloud::CloudTranslateBackend;
use tamil_pdf_ocr::backends::gemini::GeminiBackend;
use tamil_pdf_ocr::backends::mock::MockBackend;
use tamil_pdf_ocr::backends::{BackendIdentity, TranslationBackend};
use tamil_pdf_ocr::errors::{BackendError, ConfigurationError};
use tamil_pdf_ocr::segmenter::SegmentBoundary;

#[test]
fn test_backend_identity_asStr_shouldMatchFromStr() {
    for identity in BackendIdentity::ALL {
        let parsed = BackendIdentity::from_str(identity.as_str()).unwrap();
        assert_eq!(parsed, identity);
    }
    assert!(BackendIdentity::from_str("telepathy").is_err());
}

#[test]
fn test_backend_identity_shortAliases_shouldParse() {
    assert_eq!(
        BackendIdentity::from_str("argos").unwrap(),
        BackendIdentity::LocalArgos
    );
    assert_eq!(
        BackendIdentity::from_str("huggingface").unwrap(),
        BackendIdentity::LocalHuggingFace
    );
}

#[test]
fn test_cloud_backend_withoutApiKey_shouldFailConstruction() {
    let config = Config::default();
    let result = CloudTranslateBackend::new(&config.cloud, &config.translation);
    assert!(matches!(
        result,
        Err(ConfigurationError::MissingCredential { .. })
    ));
}

#[test]
fn test_cloud_backend_withApiKey_shouldConstruct() {
    let mut config = Config::default();
    config.cloud.api_key = "test-key".to_string();
    let backend = CloudTranslateBackend::new(&config.cloud, &config.translation).unwrap();

    assert_eq!(backend.identity(), BackendIdentity::Cloud);
    assert_eq!(backend.segment_boundary(), SegmentBoundary::Line);
    assert_eq!(backend.max_segment_chars(), 5000);
    assert!(!backend.supports_whole_document());
}

#[test]
fn test_gemini_backend_withoutApiKey_shouldFailConstruction() {
    let config = Config::default();
    let result = GeminiBackend::new(&config.llm, &config.translation);
    assert!(matches!(
        result,
        Err(ConfigurationError::MissingCredential { .. })
    ));
}

#[test]
fn test_gemini_backend_withDocumentMode_shouldReportWholeDocumentSupport() {
    let mut config = Config::default();
    config.llm.api_key = "test-key".to_string();

    let backend = GeminiBackend::new(&config.llm, &config.translation).unwrap();
    assert!(backend.supports_whole_document());
    assert_eq!(backend.segment_boundary(), SegmentBoundary::Paragraph);
    assert_eq!(backend.identity(), BackendIdentity::Llm);

    config.llm.mode = "chunked".parse().unwrap();
    let backend = GeminiBackend::new(&config.llm, &config.translation).unwrap();
    assert!(!backend.supports_whole_document());
}

#[tokio::test]
async fn test_mock_backend_working_shouldEchoWithPrefix() {
    let backend = MockBackend::working();
    let result = backend.translate("text").await.unwrap();
    assert_eq!(result, "[TRANSLATED] text");
    assert_eq!(backend.calls(), 1);
    assert_eq!(backend.received(), vec!["text".to_string()]);
}

#[tokio::test]
async fn test_mock_backend_failingOn_shouldFailOnlySelectedCalls() {
    let backend = MockBackend::failing_on(vec![1]);
    assert!(backend.translate("a").await.is_ok());
    assert!(backend.translate("b").await.is_err());
    assert!(backend.translate("c").await.is_ok());
}

#[tokio::test]
async fn test_translate_whole_withoutCapability_shouldBeUnsupported() {
    let backend = MockBackend::working();
    let result = backend.translate_whole("document").await;
    assert!(matches!(
        result,
        Err(BackendError::WholeDocumentUnsupported)
    ));
}

#[test]
fn test_segment_boundary_delimiters_shouldMatchModes() {
    assert_eq!(SegmentBoundary::Line.delimiter(), "\n");
    assert_eq!(SegmentBoundary::Paragraph.delimiter(), "\n\n");
}
