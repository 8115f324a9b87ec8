/*!
 * Mock backend implementations for testing.
 *
 * This module provides mock backends that simulate different behaviors:
 * - `MockBackend::working()` - Always succeeds with translated text
 * - `MockBackend::failing()` - Always fails with an error
 * - `MockBackend::failing_on(indices)` - Fails only on selected calls
 * - `MockBackend::whole_document()` - Reports whole-document capability
 */

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::backends::{BackendIdentity, TranslationBackend};
use crate::errors::BackendError;
use crate::segmenter::SegmentBoundary;

/// Behavior mode for the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a `[TRANSLATED]`-prefixed echo
    Working,
    /// Always fails with an error
    Failing,
    /// Fails on the given 0-based call indices, succeeds otherwise
    FailingOn(Vec<usize>),
    /// Always returns an empty string
    Empty,
}

/// Mock backend for exercising the orchestrator and pipeline.
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Reported identity
    identity: BackendIdentity,
    /// Reported boundary
    boundary: SegmentBoundary,
    /// Reported max segment size
    max_segment_chars: usize,
    /// Whether whole-document capability is reported
    whole_document: bool,
    /// Number of `translate` calls made
    call_count: AtomicUsize,
    /// Number of `translate_whole` calls made
    whole_call_count: AtomicUsize,
    /// Texts received, in call order
    received: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior.
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            identity: BackendIdentity::Cloud,
            boundary: SegmentBoundary::Line,
            max_segment_chars: 1000,
            whole_document: false,
            call_count: AtomicUsize::new(0),
            whole_call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Create a working mock backend that always succeeds.
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock backend that always errors.
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails on the given 0-based call indices.
    pub fn failing_on(indices: Vec<usize>) -> Self {
        Self::new(MockBehavior::FailingOn(indices))
    }

    /// Create a working mock that reports whole-document capability.
    pub fn whole_document() -> Self {
        let mut mock = Self::new(MockBehavior::Working);
        mock.whole_document = true;
        mock.identity = BackendIdentity::Llm;
        mock.boundary = SegmentBoundary::Paragraph;
        mock
    }

    /// Override the reported max segment size.
    pub fn with_max_segment_chars(mut self, max: usize) -> Self {
        self.max_segment_chars = max;
        self
    }

    /// Override the reported whole-document capability.
    pub fn with_whole_document(mut self, supported: bool) -> Self {
        self.whole_document = supported;
        self
    }

    /// Override the reported boundary.
    pub fn with_boundary(mut self, boundary: SegmentBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Number of `translate` calls made so far.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Number of `translate_whole` calls made so far.
    pub fn whole_calls(&self) -> usize {
        self.whole_call_count.load(Ordering::SeqCst)
    }

    /// Texts received by `translate`/`translate_whole`, in call order.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    fn respond(&self, call_index: usize, text: &str) -> Result<String, BackendError> {
        match &self.behavior {
            MockBehavior::Working => Ok(format!("[TRANSLATED] {}", text)),
            MockBehavior::Failing => Err(BackendError::RequestFailed(
                "mock backend configured to fail".to_string(),
            )),
            MockBehavior::FailingOn(indices) => {
                if indices.contains(&call_index) {
                    Err(BackendError::RequestFailed(format!(
                        "mock backend failing on call {}",
                        call_index
                    )))
                } else {
                    Ok(format!("[TRANSLATED] {}", text))
                }
            }
            MockBehavior::Empty => Ok(String::new()),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    fn identity(&self) -> BackendIdentity {
        self.identity
    }

    fn segment_boundary(&self) -> SegmentBoundary {
        self.boundary
    }

    fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    fn supports_whole_document(&self) -> bool {
        self.whole_document
    }

    async fn probe_ready(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn translate(&self, text: &str) -> Result<String, BackendError> {
        let call_index = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(text.to_string());
        self.respond(call_index, text)
    }

    async fn translate_whole(&self, text: &str) -> Result<String, BackendError> {
        if !self.whole_document {
            return Err(BackendError::WholeDocumentUnsupported);
        }
        self.whole_call_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(text.to_string());
        self.respond(0, text)
    }
}
