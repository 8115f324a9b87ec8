/*!
 * OCR extraction for Tamil PDFs.
 *
 * Rasterizes PDF pages with `pdftoppm` into a scratch directory, then
 * recognizes each page image with the `tesseract` CLI and the Tamil
 * language pack. Both tools are probed up front so a missing install
 * fails before any work starts.
 */

use std::path::{Path, PathBuf};

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use crate::app_config::OcrConfig;
use crate::document::Page;
use crate::errors::OcrError;

/// Collapses runs of three or more newlines left behind by page layout.
static EXCESS_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// OCR processor for Tamil text extraction from PDFs.
pub struct OcrEngine {
    /// Rasterization resolution in DPI
    dpi: u32,
    /// Extra arguments for the tesseract CLI
    tesseract_args: Vec<String>,
}

impl OcrEngine {
    /// Create an engine from configuration.
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            dpi: config.dpi,
            tesseract_args: config.tesseract_args.clone(),
        }
    }

    /// Check that `pdftoppm` and `tesseract` are runnable.
    pub async fn probe_tools() -> Result<(), OcrError> {
        for (tool, arg) in [("pdftoppm", "-v"), ("tesseract", "--version")] {
            Command::new(tool)
                .arg(arg)
                .output()
                .await
                .map_err(|e| OcrError::ToolUnavailable(format!("{}: {}", tool, e)))?;
        }
        Ok(())
    }

    /// Extract Tamil text from PDF pages.
    ///
    /// `start_page`/`end_page` are 1-indexed inclusive bounds; page
    /// numbers in the result are offset accordingly. Pages whose
    /// recognized text is empty are skipped. Fails with
    /// [`OcrError::NoTextExtracted`] when no page yields text at all.
    /// `progress` is called with (processed, total) after each page.
    pub async fn process_pdf(
        &self,
        pdf_path: &Path,
        start_page: Option<u32>,
        end_page: Option<u32>,
        progress: impl Fn(usize, usize),
    ) -> Result<Vec<Page>, OcrError> {
        let workdir = tempfile::tempdir()?;
        let images = self
            .rasterize(pdf_path, start_page, end_page, workdir.path())
            .await?;

        info!("Total pages to process: {}", images.len());

        let page_offset = start_page.map(|s| s - 1).unwrap_or(0);
        let mut pages = Vec::new();

        for (i, image) in images.iter().enumerate() {
            let page_number = page_offset + i as u32 + 1;
            debug!("OCR processing page {}...", page_number);

            let text = self.recognize(image, page_number).await?;
            let text = clean_recognized_text(&text);

            if !text.is_empty() {
                pages.push(Page::new(page_number, text));
            }
            progress(i + 1, images.len());
        }

        info!(
            "OCR processing complete, extracted text from {} pages",
            pages.len()
        );

        if pages.is_empty() {
            return Err(OcrError::NoTextExtracted);
        }
        Ok(pages)
    }

    /// Render PDF pages to PNG images, returning them in page order.
    async fn rasterize(
        &self,
        pdf_path: &Path,
        start_page: Option<u32>,
        end_page: Option<u32>,
        workdir: &Path,
    ) -> Result<Vec<PathBuf>, OcrError> {
        let prefix = workdir.join("page");

        let mut cmd = Command::new("pdftoppm");
        cmd.arg("-png").arg("-r").arg(self.dpi.to_string());
        if let Some(first) = start_page {
            cmd.arg("-f").arg(first.to_string());
        }
        if let Some(last) = end_page {
            cmd.arg("-l").arg(last.to_string());
        }
        cmd.arg(pdf_path).arg(&prefix);

        let output = cmd
            .output()
            .await
            .map_err(|e| OcrError::RasterizeFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::RasterizeFailed(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // pdftoppm zero-pads page numbers, so lexicographic order is page order
        let mut images: Vec<PathBuf> = std::fs::read_dir(workdir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        images.sort();

        if images.is_empty() {
            return Err(OcrError::RasterizeFailed(
                "pdftoppm produced no page images".to_string(),
            ));
        }
        Ok(images)
    }

    /// Recognize Tamil text in one page image.
    async fn recognize(&self, image: &Path, page_number: u32) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg("tam")
            .args(&self.tesseract_args)
            .output()
            .await
            .map_err(|e| OcrError::RecognitionFailed {
                page: page_number,
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::RecognitionFailed {
                page: page_number,
                reason: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Normalize recognized text: trim the page and collapse excess blank
/// lines that page layout leaves behind.
pub fn clean_recognized_text(text: &str) -> String {
    let collapsed = EXCESS_BLANK_LINES.replace_all(text, "\n\n");
    collapsed.trim().to_string()
}
