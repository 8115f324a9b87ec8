/*!
 * Structured progress and diagnostic events.
 *
 * The orchestrator emits typed events instead of printing; a collaborator
 * decides how to render them (log lines, progress bars, nothing in tests).
 */

use log::{debug, info, warn};

/// Events emitted while a document is being translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationEvent {
    /// Whole-document translation request is about to be issued
    WholeDocumentStarted {
        /// Source character count
        chars: usize,
    },

    /// Whole-document translation finished
    WholeDocumentFinished {
        /// Translated character count
        chars: usize,
    },

    /// Translated output looks suspiciously short relative to the source.
    /// Advisory only; the result is still returned.
    TruncationSuspected {
        /// Source character count
        input_chars: usize,
        /// Translated character count
        output_chars: usize,
    },

    /// Chunked translation of one page is starting
    PageStarted {
        /// 1-indexed page number
        page_number: u32,
        /// Number of segments the page was split into
        segments: usize,
    },

    /// Chunked translation of one page finished
    PageFinished {
        /// 1-indexed page number
        page_number: u32,
    },

    /// One segment translated successfully
    SegmentTranslated {
        /// Page the segment belongs to
        page_number: u32,
        /// Segment index within the page
        index: usize,
    },

    /// One segment failed; a placeholder was substituted
    SegmentFailed {
        /// Page the segment belongs to
        page_number: u32,
        /// Segment index within the page
        index: usize,
        /// Backend failure detail
        error: String,
    },
}

/// Receiver for translation events.
pub trait TranslationObserver: Send + Sync {
    /// Called for every event, in emission order.
    fn on_event(&self, event: TranslationEvent);
}

/// Observer that renders events through the `log` macros.
#[derive(Debug, Default)]
pub struct LogObserver;

impl TranslationObserver for LogObserver {
    fn on_event(&self, event: TranslationEvent) {
        match event {
            TranslationEvent::WholeDocumentStarted { chars } => {
                info!("Translating complete document ({} characters)...", chars);
            }
            TranslationEvent::WholeDocumentFinished { chars } => {
                info!("Document translation completed ({} characters)", chars);
            }
            TranslationEvent::TruncationSuspected {
                input_chars,
                output_chars,
            } => {
                warn!(
                    "Translation may be incomplete: {} chars in, {} chars out",
                    input_chars, output_chars
                );
            }
            TranslationEvent::PageStarted {
                page_number,
                segments,
            } => {
                info!("Translating page {} ({} segments)", page_number, segments);
            }
            TranslationEvent::PageFinished { page_number } => {
                debug!("Finished page {}", page_number);
            }
            TranslationEvent::SegmentTranslated { page_number, index } => {
                debug!("Translated segment {} of page {}", index + 1, page_number);
            }
            TranslationEvent::SegmentFailed {
                page_number,
                index,
                error,
            } => {
                warn!(
                    "Translation failed for segment {} of page {}: {}",
                    index + 1,
                    page_number,
                    error
                );
            }
        }
    }
}

/// Observer that discards every event. Used in tests.
#[derive(Debug, Default)]
pub struct NullObserver;

impl TranslationObserver for NullObserver {
    fn on_event(&self, _event: TranslationEvent) {}
}
