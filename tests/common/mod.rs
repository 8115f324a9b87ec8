/*!
 * Common test utilities for the tamil-pdf-ocr test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use tamil_pdf_ocr::app_config::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A config with every rate delay zeroed, so tests never sleep
pub fn zero_delay_config() -> Config {
    let mut config = Config::default();
    for rate in [
        &mut config.cloud.rate,
        &mut config.llm.rate,
        &mut config.local.rate,
    ] {
        rate.request_delay_ms = 0;
        rate.segment_delay_ms = 0;
    }
    config
}
