/*!
 * Page and document model for OCR output.
 *
 * A `Page` is one PDF page's recognized text; a `Document` is the ordered
 * page sequence, viewable either as one concatenated blob (for
 * whole-document translation) or page by page (for chunked fallback).
 */

use anyhow::{anyhow, Result};

/// Delimiter inserted between pages when the document is viewed (or
/// reassembled) as a single text blob.
pub const PAGE_DELIMITER: &str = "\n\n";

/// One page of recognized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed position in the original PDF (offset by any start-page bound)
    pub page_number: u32,

    /// Recognized Unicode text for this page
    pub text: String,
}

impl Page {
    /// Create a new page.
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

/// Ordered sequence of pages produced by one OCR run.
///
/// Constructed once per run and not mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    /// Build a document from OCR pages.
    ///
    /// Page numbers must be strictly increasing; OCR produces them in
    /// ascending order and duplicates would corrupt reassembly.
    pub fn from_pages(pages: Vec<Page>) -> Result<Self> {
        for window in pages.windows(2) {
            if window[1].page_number <= window[0].page_number {
                return Err(anyhow!(
                    "page numbers must be strictly increasing: {} followed by {}",
                    window[0].page_number,
                    window[1].page_number
                ));
            }
        }
        Ok(Self { pages })
    }

    /// The pages in original order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True when the document holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The whole document as one text blob, pages joined with
    /// [`PAGE_DELIMITER`].
    pub fn concatenated(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PAGE_DELIMITER)
    }

    /// Total character count across all pages (delimiters excluded).
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}
