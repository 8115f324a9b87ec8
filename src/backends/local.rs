/*!
 * Local translation meta-adapter.
 *
 * Probes every local engine once at construction, keeps the ones that
 * answered, and selects an active engine by fixed priority: Argos first
 * (fully offline), then the locally served MarianMT model, then
 * LibreTranslate (HTTP, possibly remote). The probed list is exposed for
 * diagnostics and the active engine can be switched explicitly.
 */

use async_trait::async_trait;
use log::{info, warn};

use crate::app_config::LocalConfig;
use crate::backends::argos::ArgosBackend;
use crate::backends::huggingface::HuggingFaceBackend;
use crate::backends::libretranslate::LibreTranslateBackend;
use crate::backends::{BackendIdentity, TranslationBackend};
use crate::errors::{BackendError, ConfigurationError};
use crate::segmenter::SegmentBoundary;

/// Candidate names, in selection priority order.
const PRIORITY: [&str; 3] = ["argos", "huggingface", "libretranslate"];

/// Meta-adapter over the local translation engines.
pub struct LocalTranslator {
    /// Probed-and-available engines, keyed by service name
    services: Vec<(&'static str, Box<dyn TranslationBackend>)>,
    /// Index of the active engine in `services`
    active: usize,
}

impl LocalTranslator {
    /// Probe every local engine and select the active one.
    ///
    /// Candidates that fail their readiness probe are recorded as
    /// unavailable and skipped. Construction fails only when no engine at
    /// all answered. A `preferred_service` in the config overrides the
    /// priority order when that engine is available.
    pub async fn detect(config: &LocalConfig) -> Result<Self, ConfigurationError> {
        let mut services: Vec<(&'static str, Box<dyn TranslationBackend>)> = Vec::new();

        let candidates: Vec<(&'static str, Box<dyn TranslationBackend>)> = vec![
            ("argos", Box::new(ArgosBackend::new(config))),
            ("huggingface", Box::new(HuggingFaceBackend::new(config)?)),
            ("libretranslate", Box::new(LibreTranslateBackend::new(config)?)),
        ];

        for (name, backend) in candidates {
            match backend.probe_ready().await {
                Ok(()) => {
                    info!("{} translator available", name);
                    services.push((name, backend));
                }
                Err(e) => {
                    warn!("{} translator unavailable: {}", name, e);
                }
            }
        }

        if services.is_empty() {
            return Err(ConfigurationError::NoLocalServiceAvailable);
        }

        let mut translator = Self {
            services,
            active: 0,
        };

        // Fixed priority: first available candidate wins
        for name in PRIORITY {
            if translator.switch_service(name) {
                break;
            }
        }

        if let Some(preferred) = &config.preferred_service {
            if !translator.switch_service(preferred) {
                warn!(
                    "preferred local service '{}' is not available, using {}",
                    preferred,
                    translator.active_service()
                );
            }
        }

        info!("Using {} translator", translator.active_service());
        Ok(translator)
    }

    /// Names of the engines that passed their readiness probe.
    pub fn available_services(&self) -> Vec<&'static str> {
        self.services.iter().map(|(name, _)| *name).collect()
    }

    /// Name of the currently active engine.
    pub fn active_service(&self) -> &'static str {
        self.services[self.active].0
    }

    /// Switch to a different probed engine. Returns false when the named
    /// engine was not available.
    pub fn switch_service(&mut self, name: &str) -> bool {
        match self.services.iter().position(|(n, _)| *n == name) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }

    fn active_backend(&self) -> &dyn TranslationBackend {
        self.services[self.active].1.as_ref()
    }
}

#[async_trait]
impl TranslationBackend for LocalTranslator {
    fn identity(&self) -> BackendIdentity {
        self.active_backend().identity()
    }

    fn segment_boundary(&self) -> SegmentBoundary {
        self.active_backend().segment_boundary()
    }

    fn max_segment_chars(&self) -> usize {
        self.active_backend().max_segment_chars()
    }

    async fn probe_ready(&self) -> Result<(), BackendError> {
        // Detection already probed every candidate; re-check the active one
        self.active_backend().probe_ready().await
    }

    async fn translate(&self, text: &str) -> Result<String, BackendError> {
        self.active_backend().translate(text).await
    }
}
