pub mod audit;
pub mod extract;
pub mod lines;
pub mod profiles;
pub mod verify;

use std::path::{Path, PathBuf};
use timecard_core::error::TimecardError;
use timecard_core::extraction::ExtractorKind;
use timecard_core::model::Hms;
use timecard_core::profile::builtin::{self, DEFAULT_PRESET};
use timecard_core::profile::schema::ReportProfile;
use timecard_core::ParsedReport;

/// Where a PDF command reads from and how it interprets it.
pub struct Source {
    pub profile: Option<String>,
    pub profile_file: Option<PathBuf>,
    pub backend: String,
    pub layout: bool,
}

impl Source {
    pub fn profile(&self) -> Result<ReportProfile, TimecardError> {
        load_profile(self.profile.as_deref(), self.profile_file.as_deref())
    }

    pub fn parse(&self, pdf_file: &Path) -> Result<(ReportProfile, ParsedReport), TimecardError> {
        let profile = self.profile()?;
        let extractor = self.backend.parse::<ExtractorKind>()?.build(self.layout);
        let pdf_bytes = std::fs::read(pdf_file)?;
        eprintln!("Extracting from {}...", pdf_file.display());
        let parsed = timecard_core::parse_pdf(&pdf_bytes, extractor.as_ref(), &profile)?;
        log::debug!("parsed with profile '{}' via {}", profile.name, parsed.backend);
        eprintln!("Total lines extracted: {}", parsed.lines.len());
        Ok((profile, parsed))
    }

    pub fn lines(&self, pdf_file: &Path) -> Result<Vec<String>, TimecardError> {
        let extractor = self.backend.parse::<ExtractorKind>()?.build(self.layout);
        let pdf_bytes = std::fs::read(pdf_file)?;
        timecard_core::extract_lines(&pdf_bytes, extractor.as_ref())
    }
}

pub fn load_profile(
    preset: Option<&str>,
    file: Option<&Path>,
) -> Result<ReportProfile, TimecardError> {
    match file {
        Some(path) => timecard_core::profile::load_profile(path),
        None => builtin::load_preset(preset.unwrap_or(DEFAULT_PRESET)),
    }
}

/// An explicit `--expected-total`, else the profile's printed total.
pub fn expected_total(
    flag: Option<&str>,
    profile: &ReportProfile,
) -> Result<Option<Hms>, TimecardError> {
    flag.or(profile.expected_total.as_deref())
        .map(Hms::parse)
        .transpose()
}
