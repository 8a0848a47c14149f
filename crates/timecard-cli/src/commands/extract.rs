use std::path::PathBuf;
use timecard_core::emit;
use timecard_core::error::TimecardError;
use timecard_core::summary::summarize;

use super::Source;
use crate::output;

pub fn run(
    pdf_file: PathBuf,
    source: &Source,
    output_format: &str,
    output_file: Option<PathBuf>,
    top: usize,
) -> Result<(), TimecardError> {
    let (_, parsed) = source.parse(&pdf_file)?;
    let reconstruction = &parsed.reconstruction;
    let entries = &reconstruction.entries;

    eprintln!("Found {} entries", entries.len());
    if !reconstruction.discarded.is_empty() {
        eprintln!(
            "  {} candidate(s) discarded without a date",
            reconstruction.discarded.len()
        );
    }
    if !reconstruction.unmatched.is_empty() {
        eprintln!(
            "  {} duration line(s) without a member in range",
            reconstruction.unmatched.len()
        );
    }

    match output_file {
        Some(path) => {
            emit::write_csv_file(&path, entries)?;
            output::table::print_summary(&summarize(entries, top));
            eprintln!("Saved to {}", path.display());
        }
        None => {
            match output_format {
                "json" => output::json::print(entries)?,
                "table" => output::table::print_entries(entries),
                _ => emit::write_csv(std::io::stdout().lock(), entries)?,
            }
            output::table::print_summary(&summarize(entries, top));
        }
    }

    Ok(())
}
