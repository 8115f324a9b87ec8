/*!
 * Tests for the translation orchestrator
 */

use parking_lot::Mutex;

use tamil_pdf_ocr::backends::mock::{MockBackend, MockBehavior};
use tamil_pdf_ocr::document::{Document, Page};
use tamil_pdf_ocr::errors::AppError;
use tamil_pdf_ocr::events::{NullObserver, TranslationEvent, TranslationObserver};
use tamil_pdf_ocr::orchestrator::{failure_placeholder, TranslationOrchestrator, FAILURE_MARKER};
use tamil_pdf_ocr::rate_governor::RateGovernor;

use crate::common::zero_delay_config;

/// Observer that records every event for inspection
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<TranslationEvent>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<TranslationEvent> {
        self.events.lock().clone()
    }
}

impl TranslationObserver for RecordingObserver {
    fn on_event(&self, event: TranslationEvent) {
        self.events.lock().push(event);
    }
}

fn orchestrator() -> TranslationOrchestrator {
    TranslationOrchestrator::new(RateGovernor::new(&zero_delay_config()))
}

fn document(pages: &[(u32, &str)]) -> Document {
    Document::from_pages(
        pages
            .iter()
            .map(|(n, text)| Page::new(*n, text.to_string()))
            .collect(),
    )
    .expect("valid page sequence")
}

#[tokio::test]
async fn test_translate_document_withChunkedBackend_shouldJoinPagesInOrder() {
    let backend = MockBackend::working();
    let doc = document(&[(1, "A"), (2, "B")]);

    let result = orchestrator()
        .translate_document(&doc, &backend, &NullObserver)
        .await
        .expect("translation succeeds");

    assert_eq!(result, "[TRANSLATED] A\n\n[TRANSLATED] B");
    let a_pos = result.find("[TRANSLATED] A").unwrap();
    let b_pos = result.find("[TRANSLATED] B").unwrap();
    assert!(a_pos < b_pos, "page 1 output must precede page 2 output");
}

#[tokio::test]
async fn test_translate_document_withOneFailedSegment_shouldPlacePlaceholderAtItsIndex() {
    // Five one-line segments; the third call (index 2) fails
    let backend = MockBackend::failing_on(vec![2]).with_max_segment_chars(2);
    let doc = document(&[(1, "L0\nL1\nL2\nL3\nL4")]);

    let result = orchestrator()
        .translate_document(&doc, &backend, &NullObserver)
        .await
        .expect("partial failure must not abort the batch");

    let lines: Vec<&str> = result.lines().collect();
    assert_eq!(lines[0], "[TRANSLATED] L0");
    assert_eq!(lines[1], "[TRANSLATED] L1");
    assert_eq!(lines[2], FAILURE_MARKER);
    assert_eq!(lines[3], "L2");
    assert_eq!(lines[4], "[TRANSLATED] L3");
    assert_eq!(lines[5], "[TRANSLATED] L4");
}

#[tokio::test]
async fn test_translate_document_withAllSegmentsFailing_shouldRaiseBatchError() {
    let backend = MockBackend::failing().with_max_segment_chars(2);
    let doc = document(&[(1, "L0\nL1"), (2, "L2")]);

    let result = orchestrator()
        .translate_document(&doc, &backend, &NullObserver)
        .await;

    match result {
        Err(AppError::Batch(e)) => assert_eq!(e.attempted, 3),
        other => panic!("expected a batch error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_translate_document_withWholeDocumentBackend_shouldBypassSegmenter() {
    // Tiny max segment size would force many segments if chunking ran
    let backend = MockBackend::whole_document().with_max_segment_chars(1);
    let doc = document(&[(1, "First page text"), (2, "Second page text")]);

    let result = orchestrator()
        .translate_document(&doc, &backend, &NullObserver)
        .await
        .expect("whole-document translation succeeds");

    assert_eq!(backend.whole_calls(), 1);
    assert_eq!(backend.calls(), 0, "per-segment translate must not be invoked");
    assert_eq!(
        result,
        "[TRANSLATED] First page text\n\nSecond page text"
    );
}

#[tokio::test]
async fn test_translate_document_withEmptyDocument_shouldSkipWholeDocumentRequest() {
    let backend = MockBackend::whole_document();
    let doc = document(&[]);

    let result = orchestrator()
        .translate_document(&doc, &backend, &NullObserver)
        .await
        .expect("empty document is not an error");

    assert_eq!(result, "");
    assert_eq!(backend.whole_calls(), 0);
}

#[tokio::test]
async fn test_translate_document_withShortOutput_shouldEmitTruncationAdvisory() {
    let backend = MockBackend::new(MockBehavior::Empty).with_whole_document(true);
    let doc = document(&[(1, "a reasonably long page of source text")]);
    let observer = RecordingObserver::default();

    // Advisory only: the empty result is still returned
    let result = orchestrator()
        .translate_document(&doc, &backend, &observer)
        .await
        .expect("short output is not an error");
    assert_eq!(result, "");

    assert!(observer
        .events()
        .iter()
        .any(|e| matches!(e, TranslationEvent::TruncationSuspected { .. })));
}

#[tokio::test]
async fn test_translate_document_withFailures_shouldEmitSegmentEvents() {
    let backend = MockBackend::failing_on(vec![1]).with_max_segment_chars(2);
    let doc = document(&[(1, "L0\nL1\nL2")]);
    let observer = RecordingObserver::default();

    orchestrator()
        .translate_document(&doc, &backend, &observer)
        .await
        .expect("partial failure is recovered");

    let events = observer.events();
    assert!(events.iter().any(|e| matches!(
        e,
        TranslationEvent::PageStarted {
            page_number: 1,
            segments: 3
        }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        TranslationEvent::SegmentFailed {
            page_number: 1,
            index: 1,
            ..
        }
    )));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, TranslationEvent::SegmentTranslated { .. }))
            .count(),
        2
    );
}

#[test]
fn test_failure_placeholder_shouldCarryMarkerAndOriginalText() {
    let placeholder = failure_placeholder("original tamil text");
    assert!(placeholder.starts_with(FAILURE_MARKER));
    assert!(placeholder.contains("original tamil text"));
}
