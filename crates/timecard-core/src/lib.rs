pub mod audit;
pub mod emit;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod profile;
pub mod summary;

use error::TimecardError;
use extraction::{flatten_lines, PdfExtractor};
use model::Reconstruction;
use profile::schema::ReportProfile;

/// Lines recovered from a PDF together with what was rebuilt from them.
#[derive(Debug, Clone)]
pub struct ParsedReport {
    pub backend: String,
    pub lines: Vec<String>,
    pub reconstruction: Reconstruction,
}

/// Extract the flattened, untrimmed line sequence of a PDF.
pub fn extract_lines(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
) -> Result<Vec<String>, TimecardError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    let lines = flatten_lines(&pages);
    log::info!(
        "{}: extracted {} line(s) from {} page(s)",
        extractor.backend_name(),
        lines.len(),
        pages.len()
    );
    Ok(lines)
}

/// Main API entry point: parse a PDF time report into time entries.
///
/// Runs a single pass: extraction, then reconstruction. Candidates that could not
/// become entries are kept in the reconstruction for auditing.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    profile: &ReportProfile,
) -> Result<ParsedReport, TimecardError> {
    let lines = extract_lines(pdf_bytes, extractor)?;
    let reconstruction = parsing::reconstruct(&lines, profile)?;

    Ok(ParsedReport {
        backend: extractor.backend_name().to_string(),
        lines,
        reconstruction,
    })
}
