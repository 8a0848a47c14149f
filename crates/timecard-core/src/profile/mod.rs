pub mod builtin;
pub mod schema;

use chrono::NaiveTime;

use crate::error::TimecardError;
use crate::model::Hms;
use schema::ReportProfile;
use std::path::Path;

/// Upper bound for every search window, in lines.
pub const MAX_WINDOW: usize = 100;

/// Load a profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<ReportProfile, TimecardError> {
    let content = std::fs::read_to_string(path).map_err(|e| TimecardError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_profile(&content, path)
}

/// Parse a profile from a JSON string.
pub fn parse_profile(json: &str, source: &Path) -> Result<ReportProfile, TimecardError> {
    let profile: ReportProfile =
        serde_json::from_str(json).map_err(|e| TimecardError::ProfileLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Parse a profile from a JSON string (no file path context).
pub fn parse_profile_str(json: &str) -> Result<ReportProfile, TimecardError> {
    let profile: ReportProfile = serde_json::from_str(json).map_err(TimecardError::Json)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Validate that a profile is well-formed.
pub fn validate_profile(profile: &ReportProfile) -> Result<(), TimecardError> {
    if profile.members.is_empty() {
        return Err(TimecardError::ProfileInvalid(
            "members must not be empty".into(),
        ));
    }

    if profile.members.iter().any(|m| m.trim().is_empty()) {
        return Err(TimecardError::ProfileInvalid(
            "member names must not be blank".into(),
        ));
    }

    for (token, canonical) in &profile.aliases {
        if !profile.members.contains(token) {
            return Err(TimecardError::ProfileInvalid(format!(
                "alias '{}' is not a listed member",
                token
            )));
        }
        if !profile.members.contains(canonical) {
            return Err(TimecardError::ProfileInvalid(format!(
                "alias '{}' points to unknown member '{}'",
                token, canonical
            )));
        }
    }

    if profile.default_project.trim().is_empty() {
        return Err(TimecardError::ProfileInvalid(
            "default_project must not be empty".into(),
        ));
    }

    if !is_clock(&profile.placeholder_time) {
        return Err(TimecardError::ProfileInvalid(format!(
            "placeholder_time '{}' is not HH:MM",
            profile.placeholder_time
        )));
    }

    if profile.project_marker.trim().is_empty() {
        return Err(TimecardError::ProfileInvalid(
            "project_marker must not be empty".into(),
        ));
    }

    if profile.pagination_marker.trim().is_empty() {
        return Err(TimecardError::ProfileInvalid(
            "pagination_marker must not be empty".into(),
        ));
    }

    let marker_lists = [
        ("header_markers", &profile.header_markers),
        ("total_markers", &profile.total_markers),
        ("billable_markers", &profile.billable_markers),
    ];
    for (name, markers) in marker_lists {
        if markers.iter().any(|m| m.trim().is_empty()) {
            return Err(TimecardError::ProfileInvalid(format!(
                "{} must not contain blank markers",
                name
            )));
        }
    }

    let windows = [
        ("member_window", profile.member_window),
        ("date_forward_window", profile.date_forward_window),
        ("date_backward_window", profile.date_backward_window),
        ("date_wide_window", profile.date_wide_window),
    ];
    for (name, size) in windows {
        if size == 0 || size > MAX_WINDOW {
            return Err(TimecardError::ProfileInvalid(format!(
                "{} must be between 1 and {}",
                name, MAX_WINDOW
            )));
        }
    }

    if let Some(ref total) = profile.expected_total {
        Hms::parse(total).map_err(|e| {
            TimecardError::ProfileInvalid(format!("expected_total '{}': {}", total, e))
        })?;
    }

    Ok(())
}

fn is_clock(s: &str) -> bool {
    s.len() == 5 && NaiveTime::parse_from_str(s, "%H:%M").is_ok()
}
