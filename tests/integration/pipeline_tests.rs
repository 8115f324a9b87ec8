/*!
 * Integration tests for the pipeline coordinator.
 *
 * OCR needs poppler and tesseract installed, so these tests exercise the
 * validation and state-machine behavior that runs before any external
 * tool is touched.
 */

use std::path::PathBuf;

use tamil_pdf_ocr::errors::{AppError, ValidationError};
use tamil_pdf_ocr::pipeline::{BackendSelection, Controller, ProcessingStage, RunOptions};

use crate::common::{create_temp_dir, create_test_file, zero_delay_config};

fn options(pdf_path: PathBuf) -> RunOptions {
    RunOptions {
        pdf_path,
        output_path: None,
        start_page: None,
        end_page: None,
        translate: false,
        backend: BackendSelection::default(),
    }
}

#[test]
fn test_controller_afterConstruction_shouldBeIdle() {
    let controller = Controller::with_config(zero_delay_config());
    assert_eq!(controller.stage(), ProcessingStage::Idle);
}

#[test]
fn test_backend_selection_default_shouldBeCloud() {
    assert_eq!(BackendSelection::default(), BackendSelection::Cloud);
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFailValidationAndAbsorb() {
    let controller = Controller::with_config(zero_delay_config());
    let opts = options(PathBuf::from("/nonexistent/book.pdf"));

    let result = controller.run(&opts).await;
    match result {
        Err(AppError::Validation(ValidationError::InputNotFound(path))) => {
            assert_eq!(path, PathBuf::from("/nonexistent/book.pdf"));
        }
        other => panic!("expected InputNotFound, got {:?}", other.map(|_| ())),
    }
    assert_eq!(controller.stage(), ProcessingStage::Failed);
}

#[tokio::test]
async fn test_run_withBadPageRange_shouldFailBeforeProcessing() {
    let temp_dir = create_temp_dir().unwrap();
    let pdf = create_test_file(&temp_dir.path().to_path_buf(), "book.pdf", "%PDF-1.4").unwrap();

    let controller = Controller::with_config(zero_delay_config());
    let mut opts = options(pdf);
    opts.start_page = Some(9);
    opts.end_page = Some(3);

    let result = controller.run(&opts).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::BadPageRange {
            start: 9,
            end: 3
        }))
    ));
    assert_eq!(controller.stage(), ProcessingStage::Failed);

    // Validation failed before anything was written
    let outputs: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
        .collect();
    assert!(outputs.is_empty());
}

#[tokio::test]
async fn test_run_withZeroPageBound_shouldFailValidation() {
    let temp_dir = create_temp_dir().unwrap();
    let pdf = create_test_file(&temp_dir.path().to_path_buf(), "book.pdf", "%PDF-1.4").unwrap();

    let controller = Controller::with_config(zero_delay_config());
    let mut opts = options(pdf);
    opts.start_page = Some(0);

    let result = controller.run(&opts).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::ZeroPage(0)))
    ));
}
