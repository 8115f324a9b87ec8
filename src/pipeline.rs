/*!
 * End-to-end processing coordinator.
 *
 * Sequences OCR extraction, Tamil-text persistence, backend selection and
 * translation, and English-text persistence. The untranslated Tamil text
 * is always written before translation is attempted, so a translation
 * failure never destroys the OCR result.
 */

use std::fmt;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::app_config::Config;
use crate::backends::cloud::CloudTranslateBackend;
use crate::backends::gemini::GeminiBackend;
use crate::backends::local::LocalTranslator;
use crate::backends::TranslationBackend;
use crate::document::Document;
use crate::errors::{AppError, ConfigurationError, ValidationError};
use crate::events::{LogObserver, TranslationEvent, TranslationObserver};
use crate::file_utils::{sample_lines, FileManager};
use crate::ocr::OcrEngine;
use crate::orchestrator::TranslationOrchestrator;
use crate::rate_governor::RateGovernor;

/// Which backend family the user selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendSelection {
    /// Google Cloud Translation API (the default)
    #[default]
    Cloud,
    /// Gemini generative LLM
    Llm,
    /// Local engines via the LocalTranslator meta-adapter
    Local,
}

impl fmt::Display for BackendSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloud => write!(f, "Google Cloud"),
            Self::Llm => write!(f, "Gemini"),
            Self::Local => write!(f, "Local"),
        }
    }
}

/// Processing state, advanced as the run moves through its steps.
///
/// `Failed` is absorbing: once entered, no later transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    #[default]
    Idle,
    Validating,
    Extracting,
    TranslatingWhole,
    TranslatingChunked,
    /// Translation was not requested
    Skipped,
    Persisting,
    Done,
    Failed,
}

/// Per-run options, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Input PDF path
    pub pdf_path: PathBuf,
    /// Explicit output path; names the English file when translating,
    /// the Tamil file otherwise
    pub output_path: Option<PathBuf>,
    /// First page to process (1-indexed)
    pub start_page: Option<u32>,
    /// Last page to process (1-indexed)
    pub end_page: Option<u32>,
    /// Whether to translate to English
    pub translate: bool,
    /// Backend family to translate with
    pub backend: BackendSelection,
}

/// Paths written by a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The always-written Tamil Unicode text file
    pub tamil_path: PathBuf,
    /// The English translation, when one was produced
    pub english_path: Option<PathBuf>,
    /// Number of pages with extracted text
    pub pages: usize,
}

/// Main pipeline coordinator.
pub struct Controller {
    config: Config,
    stage: Mutex<ProcessingStage>,
}

impl Controller {
    /// Create a controller with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            stage: Mutex::new(ProcessingStage::Idle),
        }
    }

    /// The current processing stage.
    pub fn stage(&self) -> ProcessingStage {
        *self.stage.lock()
    }

    fn advance(&self, next: ProcessingStage) {
        let mut stage = self.stage.lock();
        if *stage == ProcessingStage::Failed {
            return;
        }
        debug!("pipeline stage: {:?} -> {:?}", *stage, next);
        *stage = next;
    }

    /// Run the full pipeline for one PDF.
    pub async fn run(&self, options: &RunOptions) -> Result<RunReport, AppError> {
        match self.run_inner(options).await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.advance(ProcessingStage::Failed);
                Err(e)
            }
        }
    }

    async fn run_inner(&self, options: &RunOptions) -> Result<RunReport, AppError> {
        self.advance(ProcessingStage::Validating);
        self.validate(options)?;

        let tamil_path = match (&options.output_path, options.translate) {
            (Some(path), false) => path.clone(),
            _ => FileManager::generate_output_path(&options.pdf_path, false),
        };

        info!("OCR Processing: {}", options.pdf_path.display());
        info!("Output: {}", tamil_path.display());
        if options.translate {
            info!("Translation: Enabled (Tamil -> English, {})", options.backend);
        } else {
            info!("Translation: Disabled");
        }

        // OCR extraction
        self.advance(ProcessingStage::Extracting);
        OcrEngine::probe_tools().await?;
        let engine = OcrEngine::new(&self.config.ocr);

        let ocr_bar = page_progress_bar();
        let pages = engine
            .process_pdf(
                &options.pdf_path,
                options.start_page,
                options.end_page,
                |done, total| {
                    ocr_bar.set_length(total as u64);
                    ocr_bar.set_position(done as u64);
                },
            )
            .await?;
        ocr_bar.finish_and_clear();

        let document = Document::from_pages(pages)?;

        // The Tamil text survives whatever happens to translation below
        FileManager::write_text_file(&tamil_path, &document.concatenated())
            .map_err(|e| AppError::File(e.to_string()))?;
        info!("Tamil Unicode text saved to: {}", tamil_path.display());

        if !options.translate {
            self.advance(ProcessingStage::Skipped);
            self.advance(ProcessingStage::Persisting);
            self.advance(ProcessingStage::Done);
            self.report(&tamil_path, None, &document)?;
            return Ok(RunReport {
                tamil_path,
                english_path: None,
                pages: document.page_count(),
            });
        }

        // Backend construction and readiness, after the Tamil text is safe
        let backend = self.construct_backend(options.backend).await?;

        self.advance(if backend.supports_whole_document() {
            ProcessingStage::TranslatingWhole
        } else {
            ProcessingStage::TranslatingChunked
        });

        let orchestrator = TranslationOrchestrator::new(RateGovernor::new(&self.config));
        let observer = ProgressObserver::new();
        let translated = orchestrator
            .translate_document(&document, backend.as_ref(), &observer)
            .await?;
        observer.finish();

        self.advance(ProcessingStage::Persisting);
        let english_path = options
            .output_path
            .clone()
            .unwrap_or_else(|| FileManager::generate_output_path(&options.pdf_path, true));
        FileManager::write_text_file(&english_path, &translated)
            .map_err(|e| AppError::File(e.to_string()))?;
        info!("English translation saved to: {}", english_path.display());

        self.advance(ProcessingStage::Done);
        self.report(&tamil_path, Some(&english_path), &document)?;

        Ok(RunReport {
            tamil_path,
            english_path: Some(english_path),
            pages: document.page_count(),
        })
    }

    fn validate(&self, options: &RunOptions) -> Result<(), ValidationError> {
        if !FileManager::file_exists(&options.pdf_path) {
            return Err(ValidationError::InputNotFound(options.pdf_path.clone()));
        }
        for bound in [options.start_page, options.end_page].into_iter().flatten() {
            if bound == 0 {
                return Err(ValidationError::ZeroPage(bound));
            }
        }
        if let (Some(start), Some(end)) = (options.start_page, options.end_page) {
            if start > end {
                return Err(ValidationError::BadPageRange { start, end });
            }
        }
        Ok(())
    }

    /// Select and construct exactly one backend, then check readiness.
    async fn construct_backend(
        &self,
        selection: BackendSelection,
    ) -> Result<Box<dyn TranslationBackend>, AppError> {
        match selection {
            BackendSelection::Cloud => {
                let backend = CloudTranslateBackend::new(&self.config.cloud, &self.config.translation)?;
                backend.probe_ready().await.map_err(|e| {
                    ConfigurationError::BackendNotReady {
                        backend: "Google Cloud Translation",
                        reason: e.to_string(),
                    }
                })?;
                info!("Google Translate API connected");
                Ok(Box::new(backend))
            }
            BackendSelection::Llm => {
                let backend = GeminiBackend::new(&self.config.llm, &self.config.translation)?;
                backend.probe_ready().await.map_err(|e| {
                    ConfigurationError::BackendNotReady {
                        backend: "Gemini",
                        reason: e.to_string(),
                    }
                })?;
                info!("Gemini API connected");
                Ok(Box::new(backend))
            }
            BackendSelection::Local => {
                let translator = LocalTranslator::detect(&self.config.local).await?;
                info!(
                    "Local translation ready (available: {})",
                    translator.available_services().join(", ")
                );
                Ok(Box::new(translator))
            }
        }
    }

    fn report(
        &self,
        tamil_path: &Path,
        english_path: Option<&Path>,
        document: &Document,
    ) -> Result<(), AppError> {
        let final_path = english_path.unwrap_or(tamil_path);
        let size_kb = FileManager::file_size_kb(final_path)
            .map_err(|e| AppError::File(e.to_string()))?;
        info!("Output saved to: {}", final_path.display());
        info!("File size: {:.2} KB", size_kb);

        let first_page = document.pages().first().map(|p| p.page_number).unwrap_or(1);
        let content = FileManager::read_to_string(final_path)
            .map_err(|e| AppError::File(e.to_string()))?;
        info!("--- Sample from page {} ---", first_page);
        for line in sample_lines(&content, 8) {
            info!("{}", line);
        }
        Ok(())
    }
}

/// Observer that renders orchestration events as a progress bar, falling
/// back to plain log lines for warnings.
struct ProgressObserver {
    bar: ProgressBar,
    log: LogObserver,
}

impl ProgressObserver {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self {
            bar,
            log: LogObserver,
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl TranslationObserver for ProgressObserver {
    fn on_event(&self, event: TranslationEvent) {
        match &event {
            TranslationEvent::WholeDocumentStarted { chars } => {
                self.bar
                    .set_message(format!("translating document ({} chars)", chars));
            }
            TranslationEvent::PageStarted {
                page_number,
                segments,
            } => {
                self.bar.set_message(format!(
                    "translating page {} ({} segments)",
                    page_number, segments
                ));
            }
            TranslationEvent::SegmentTranslated { .. } => {
                self.bar.tick();
            }
            TranslationEvent::SegmentFailed {
                page_number,
                index,
                error,
            } => {
                // Keep failures visible even while the bar is active
                self.bar.suspend(|| {
                    warn!(
                        "Translation failed for segment {} of page {}: {}",
                        index + 1,
                        page_number,
                        error
                    );
                });
            }
            TranslationEvent::TruncationSuspected { .. } => {
                let log = &self.log;
                let event = event.clone();
                self.bar.suspend(move || log.on_event(event));
            }
            _ => self.log.on_event(event.clone()),
        }
    }
}

fn page_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} pages")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
