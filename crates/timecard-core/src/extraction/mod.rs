pub mod native;
pub mod pdftotext;

use crate::error::TimecardError;
use std::fmt;
use std::str::FromStr;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageContent {
    /// Split raw page text into lines. Empty text yields no lines.
    pub fn from_text(page_number: usize, text: &str) -> PageContent {
        PageContent {
            page_number,
            lines: text.lines().map(|l| l.to_string()).collect(),
        }
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page in page order.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, TimecardError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Concatenate every page's lines in page order.
///
/// Lines are passed through untouched: no trimming, filtering or dedup.
pub fn flatten_lines(pages: &[PageContent]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|p| p.lines.iter().cloned())
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractorKind {
    #[default]
    Pdftotext,
    Native,
}

impl ExtractorKind {
    pub fn build(self, layout: bool) -> Box<dyn PdfExtractor> {
        match self {
            ExtractorKind::Pdftotext => Box::new(pdftotext::PdftotextExtractor::new().layout(layout)),
            ExtractorKind::Native => Box::new(native::NativeExtractor::new()),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractorKind::Pdftotext => write!(f, "pdftotext"),
            ExtractorKind::Native => write!(f, "native"),
        }
    }
}

impl FromStr for ExtractorKind {
    type Err = TimecardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdftotext" | "poppler" => Ok(ExtractorKind::Pdftotext),
            "native" | "pdf-extract" => Ok(ExtractorKind::Native),
            other => Err(TimecardError::Extraction(format!(
                "unknown backend '{other}'. Available: pdftotext, native"
            ))),
        }
    }
}
