/*!
 * Argos Translate backend.
 *
 * Fully offline: shells out to the `argos-translate` CLI with the
 * installed Tamil-to-English package. Segment text goes in on stdin and
 * the translation comes back on stdout, so no temp files are needed.
 */

use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::app_config::LocalConfig;
use crate::backends::{BackendIdentity, TranslationBackend};
use crate::errors::BackendError;

/// Argos Translate CLI wrapper.
pub struct ArgosBackend {
    /// Command used to invoke Argos Translate
    command: String,
    /// Maximum characters per invocation
    max_segment_chars: usize,
}

impl ArgosBackend {
    /// Create a new wrapper from configuration.
    pub fn new(config: &LocalConfig) -> Self {
        Self {
            command: config.argos_command.clone(),
            max_segment_chars: config.argos_max_segment_chars,
        }
    }

    async fn run_translate(&self, text: &str) -> Result<String, BackendError> {
        let mut child = Command::new(&self.command)
            .arg("--from")
            .arg("ta")
            .arg("--to")
            .arg("en")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BackendError::ProcessFailed(format!("failed to spawn {}: {}", self.command, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| BackendError::ProcessFailed(e.to_string()))?;
            // Dropping stdin closes the pipe so the process can finish
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| BackendError::ProcessFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::ProcessFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let translated = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if translated.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(translated)
    }
}

#[async_trait]
impl TranslationBackend for ArgosBackend {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity::LocalArgos
    }

    fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    async fn probe_ready(&self) -> Result<(), BackendError> {
        let output = Command::new(&self.command)
            .arg("--version")
            .output()
            .await
            .map_err(|e| {
                BackendError::Unavailable(format!("{} not runnable: {}", self.command, e))
            })?;

        if !output.status.success() {
            return Err(BackendError::Unavailable(format!(
                "{} exited with {}",
                self.command, output.status
            )));
        }

        debug!(
            "argos-translate available: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }

    async fn translate(&self, text: &str) -> Result<String, BackendError> {
        self.run_translate(text).await
    }
}
