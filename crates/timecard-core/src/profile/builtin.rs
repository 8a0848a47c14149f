use crate::error::TimecardError;
use crate::profile::parse_profile_str;
use crate::profile::schema::ReportProfile;

const TOGGL_DETAILED_JSON: &str = include_str!("../../../../profiles/toggl-detailed.json");

/// Available predefined profiles.
pub const PRESETS: &[&str] = &["toggl-detailed"];

pub const DEFAULT_PRESET: &str = "toggl-detailed";

/// Load a predefined profile by name.
pub fn load_preset(name: &str) -> Result<ReportProfile, TimecardError> {
    match name {
        "toggl-detailed" => parse_profile_str(TOGGL_DETAILED_JSON),
        _ => Err(TimecardError::ProfileInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}
