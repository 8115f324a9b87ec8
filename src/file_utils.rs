use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

// @module: File utilities for OCR and translation output

/// Suffix of the always-written Tamil Unicode output file.
pub const TAMIL_SUFFIX: &str = "_tamil_unicode";

/// Suffix of the English translation output file.
pub const ENGLISH_SUFFIX: &str = "_english";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @generates: Output path next to the input PDF
    // @params: pdf_path, translated
    pub fn generate_output_path<P: AsRef<Path>>(pdf_path: P, translated: bool) -> PathBuf {
        let pdf_path = pdf_path.as_ref();
        let stem = pdf_path.file_stem().unwrap_or_default();

        let mut name = stem.to_string_lossy().to_string();
        name.push_str(if translated { ENGLISH_SUFFIX } else { TAMIL_SUFFIX });
        name.push_str(".txt");

        match pdf_path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Write UTF-8 text to a file, creating parent directories as needed.
    pub fn write_text_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// File size in kilobytes.
    pub fn file_size_kb<P: AsRef<Path>>(path: P) -> Result<f64> {
        let metadata = fs::metadata(&path)
            .with_context(|| format!("Failed to stat file: {:?}", path.as_ref()))?;
        Ok(metadata.len() as f64 / 1024.0)
    }
}

/// First non-empty lines of the output, for the post-run preview.
pub fn sample_lines(content: &str, max_lines: usize) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(max_lines)
        .collect()
}
