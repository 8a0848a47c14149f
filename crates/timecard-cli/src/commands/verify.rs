use std::fs::File;
use std::path::{Path, PathBuf};
use timecard_core::error::TimecardError;

use super::{expected_total, load_profile};
use crate::output;

pub fn run(
    csv_file: PathBuf,
    expected: Option<&str>,
    tolerance_secs: u64,
    preset: Option<&str>,
    profile_file: Option<&Path>,
) -> Result<(), TimecardError> {
    let profile = load_profile(preset, profile_file)?;
    let expected = expected_total(expected, &profile)?;

    let file = File::open(&csv_file)?;
    let check = timecard_core::audit::verify_csv(file, expected, tolerance_secs)?;

    output::table::print_csv_check(&check);
    Ok(())
}
