use std::path::PathBuf;
use timecard_core::error::TimecardError;
use timecard_core::model::Hms;

use super::Source;
use crate::output;

pub fn run(
    pdf_file: PathBuf,
    source: &Source,
    expected: Option<&str>,
    tolerance_secs: u64,
    output_format: &str,
    verbose: bool,
) -> Result<(), TimecardError> {
    let (profile, parsed) = source.parse(&pdf_file)?;
    let expected = expected.map(Hms::parse).transpose()?;

    let report = timecard_core::audit::audit(
        &parsed.lines,
        &parsed.reconstruction,
        &profile,
        expected,
        tolerance_secs,
    )?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_audit(&report, verbose),
    }

    Ok(())
}
