use crate::error::TimecardError;
use crate::extraction::{PageContent, PdfExtractor};

/// Pure-Rust extraction backend built on `pdf-extract`.
///
/// Needs no external binaries, at the cost of a less faithful reading order than
/// poppler on some generated reports.
#[derive(Debug, Default)]
pub struct NativeExtractor;

impl NativeExtractor {
    pub fn new() -> Self {
        NativeExtractor
    }
}

impl PdfExtractor for NativeExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, TimecardError> {
        let texts = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes).map_err(|e| {
            TimecardError::Extraction(format!("failed to extract text from PDF: {e}"))
        })?;

        log::debug!("pdf-extract produced {} page(s)", texts.len());

        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, text)| PageContent::from_text(i + 1, text))
            .collect())
    }

    fn backend_name(&self) -> &str {
        "pdf_extract"
    }
}
