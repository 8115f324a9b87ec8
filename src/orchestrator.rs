/*!
 * Translation orchestration.
 *
 * Decides between the whole-document and chunked strategies, drives the
 * segmenter and rate governor, and reassembles translated segments
 * deterministically. Output for segment `i` always lands at position `i`
 * regardless of retries or failures: assembly is by index, never by
 * completion order, so a future concurrent implementation must keep the
 * same contract.
 */

use crate::backends::TranslationBackend;
use crate::document::{Document, PAGE_DELIMITER};
use crate::errors::{AppError, BatchTranslationError};
use crate::events::{TranslationEvent, TranslationObserver};
use crate::rate_governor::{CallKind, RateGovernor};
use crate::segmenter::segment;

/// Marker prefixed to a failed segment's untranslated text.
pub const FAILURE_MARKER: &str = "[Translation failed]";

/// Minimum translated/source character ratio below which whole-document
/// output is flagged as possibly truncated. A rough proxy with no hard
/// basis; advisory only.
const COMPLETENESS_RATIO: f64 = 0.7;

/// Outcome status of one segment translation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentStatus {
    /// The backend returned a translation
    Success,
    /// The backend failed; the placeholder carries the original text
    Failed {
        /// Backend failure detail
        error: String,
    },
}

/// One segment's translation outcome.
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// Index of the segment this result belongs to
    pub segment_index: usize,
    /// Translated text, or the failure placeholder
    pub text: String,
    /// Success or failure of the attempt
    pub status: SegmentStatus,
}

/// The placeholder substituted for a segment that failed to translate.
pub fn failure_placeholder(original: &str) -> String {
    format!("{}\n{}", FAILURE_MARKER, original)
}

/// Orchestrates document translation against one backend.
pub struct TranslationOrchestrator {
    governor: RateGovernor,
}

impl TranslationOrchestrator {
    /// Create an orchestrator with the given rate governor.
    pub fn new(governor: RateGovernor) -> Self {
        Self { governor }
    }

    /// Translate a document with the given backend.
    ///
    /// When the backend supports whole-document translation the full
    /// concatenated text goes out in a single governed request and the
    /// segmenter is never consulted. Otherwise every page is segmented
    /// and translated segment by segment; a failed segment becomes a
    /// marked placeholder and processing continues. Only when every
    /// attempted segment failed does the call return a
    /// [`BatchTranslationError`].
    pub async fn translate_document(
        &self,
        document: &Document,
        backend: &dyn TranslationBackend,
        observer: &dyn TranslationObserver,
    ) -> Result<String, AppError> {
        if backend.supports_whole_document() {
            self.translate_whole(document, backend, observer).await
        } else {
            self.translate_chunked(document, backend, observer).await
        }
    }

    async fn translate_whole(
        &self,
        document: &Document,
        backend: &dyn TranslationBackend,
        observer: &dyn TranslationObserver,
    ) -> Result<String, AppError> {
        let text = document.concatenated();
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let input_chars = text.chars().count();
        observer.on_event(TranslationEvent::WholeDocumentStarted { chars: input_chars });

        let identity = backend.identity();
        self.governor.wait_if_needed(identity, CallKind::Request).await;
        self.governor.log_request(identity);

        let translated = backend.translate_whole(&text).await?;

        let output_chars = translated.chars().count();
        if (output_chars as f64) < (input_chars as f64) * COMPLETENESS_RATIO {
            observer.on_event(TranslationEvent::TruncationSuspected {
                input_chars,
                output_chars,
            });
        }

        observer.on_event(TranslationEvent::WholeDocumentFinished { chars: output_chars });
        Ok(translated)
    }

    async fn translate_chunked(
        &self,
        document: &Document,
        backend: &dyn TranslationBackend,
        observer: &dyn TranslationObserver,
    ) -> Result<String, AppError> {
        let identity = backend.identity();
        let boundary = backend.segment_boundary();
        let max_chars = backend.max_segment_chars();

        let mut attempted = 0usize;
        let mut failed = 0usize;
        let mut page_translations: Vec<String> = Vec::with_capacity(document.page_count());

        for page in document.pages() {
            let segments = segment(&page.text, max_chars, boundary);
            observer.on_event(TranslationEvent::PageStarted {
                page_number: page.page_number,
                segments: segments.len(),
            });

            let segment_count = segments.len();
            let mut results: Vec<TranslationResult> = Vec::with_capacity(segment_count);

            for seg in &segments {
                // Whitespace-only segments pass through untouched; there
                // is nothing to translate but their position must survive
                if seg.text.trim().is_empty() {
                    results.push(TranslationResult {
                        segment_index: seg.index,
                        text: seg.text.clone(),
                        status: SegmentStatus::Success,
                    });
                    continue;
                }

                if attempted > 0 {
                    self.governor
                        .wait_if_needed(identity, CallKind::InterSegment)
                        .await;
                }
                self.governor.wait_if_needed(identity, CallKind::Request).await;
                self.governor.log_request(identity);
                attempted += 1;

                match backend.translate(&seg.text).await {
                    Ok(translated) => {
                        observer.on_event(TranslationEvent::SegmentTranslated {
                            page_number: page.page_number,
                            index: seg.index,
                        });
                        results.push(TranslationResult {
                            segment_index: seg.index,
                            text: translated,
                            status: SegmentStatus::Success,
                        });
                    }
                    Err(e) => {
                        failed += 1;
                        observer.on_event(TranslationEvent::SegmentFailed {
                            page_number: page.page_number,
                            index: seg.index,
                            error: e.to_string(),
                        });
                        results.push(TranslationResult {
                            segment_index: seg.index,
                            text: failure_placeholder(&seg.text),
                            status: SegmentStatus::Failed {
                                error: e.to_string(),
                            },
                        });
                    }
                }
            }

            page_translations.push(assemble_by_index(results, segment_count, boundary.delimiter()));
            observer.on_event(TranslationEvent::PageFinished {
                page_number: page.page_number,
            });
        }

        if attempted > 0 && failed == attempted {
            return Err(BatchTranslationError { attempted }.into());
        }

        Ok(page_translations.join(PAGE_DELIMITER))
    }
}

/// Place each result at its segment index and join in order.
///
/// Results arrive in call order today, but the contract is positional:
/// exactly one result per index 0..count.
fn assemble_by_index(results: Vec<TranslationResult>, count: usize, delimiter: &str) -> String {
    let mut slots: Vec<Option<String>> = vec![None; count];
    for result in results {
        debug_assert!(
            slots[result.segment_index].is_none(),
            "duplicate result for segment {}",
            result.segment_index
        );
        slots[result.segment_index] = Some(result.text);
    }

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_default())
        .collect::<Vec<_>>()
        .join(delimiter)
}
