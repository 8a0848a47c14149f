use std::path::PathBuf;
use timecard_core::error::TimecardError;
use timecard_core::parsing::patterns::DURATION;

use super::Source;

pub fn run(
    pdf_file: PathBuf,
    source: &Source,
    around: Option<usize>,
    context: usize,
    durations_only: bool,
) -> Result<(), TimecardError> {
    let lines = source.lines(&pdf_file)?;
    eprintln!("Total lines extracted: {}", lines.len());

    let (start, end) = match around {
        Some(line) => (
            line.saturating_sub(context),
            line.saturating_add(context).saturating_add(1).min(lines.len()),
        ),
        None => (0, lines.len()),
    };

    for (i, line) in lines.iter().enumerate().take(end).skip(start) {
        if durations_only && !DURATION.is_match(line) {
            continue;
        }
        let marker = if Some(i) == around { ">" } else { " " };
        println!("{marker}{i:>6}: {line}");
    }

    Ok(())
}
