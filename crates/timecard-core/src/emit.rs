use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::TimecardError;
use crate::model::TimeEntry;

pub const DURATION_COLUMN: &str = "Duration (HH:MM:SS)";

pub const CSV_HEADER: [&str; 8] = [
    "Description",
    DURATION_COLUMN,
    "Member",
    "Project",
    "Date",
    "Start Time",
    "End Time",
    "Tags",
];

/// Write entries as CSV: one header row, then one row per entry in order.
pub fn write_csv<W: Write>(writer: W, entries: &[TimeEntry]) -> Result<(), TimecardError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for entry in entries {
        let duration = entry.duration.canonical();
        let date = entry.date.format("%Y-%m-%d").to_string();
        let tags = entry.tags.join(", ");
        wtr.write_record([
            entry.description.as_str(),
            duration.as_str(),
            entry.member.as_str(),
            entry.project.as_str(),
            date.as_str(),
            entry.start_time.as_str(),
            entry.end_time.as_str(),
            tags.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, entries: &[TimeEntry]) -> Result<(), TimecardError> {
    let file = File::create(path)?;
    write_csv(file, entries)?;
    log::info!("wrote {} row(s) to {}", entries.len(), path.display());
    Ok(())
}
