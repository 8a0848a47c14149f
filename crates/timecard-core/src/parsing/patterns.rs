use regex::Regex;
use std::sync::LazyLock;

use crate::error::TimecardError;
use crate::profile::schema::ReportProfile;

/// `H+:MM:SS`, hours unbounded.
pub static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d{2}):(\d{2})").expect("valid regex"));

/// `DD/MM/YYYY`.
pub static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})/(\d{2})/(\d{4})").expect("valid regex"));

static PURE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}\s*$").expect("valid regex"));

static TRAILING_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d{2}/\d{2}/\d{4}\s*$").expect("valid regex"));

/// A date and everything after it.
pub static DATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d{2}/\d{2}/\d{4}.*$").expect("valid regex"));

/// `HH:MM - HH:MM`.
pub static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}):(\d{2})\s*-\s*(\d{2}):(\d{2})").expect("valid regex")
});

static TIME_RANGE_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\d{2}:\d{2}\s*-\s*\d{2}:\d{2}").expect("valid regex"));

static TRAILING_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*$").expect("valid regex"));

/// Line classifiers and extractors for one report profile.
///
/// Member names and the project marker come from the profile, so these patterns are
/// compiled per run rather than held in statics.
#[derive(Debug)]
pub struct Patterns {
    marker: String,
    header_markers: Vec<String>,
    pagination_marker: String,
    total_markers: Vec<String>,
    billable_markers: Vec<String>,
    member: Regex,
    pure_time_range: Regex,
    project_on_line: Regex,
    project_before_date: Regex,
    marker_and_rest: Regex,
}

impl Patterns {
    pub fn compile(profile: &ReportProfile) -> Result<Patterns, TimecardError> {
        let names: Vec<String> = profile.members.iter().map(|m| regex::escape(m)).collect();
        let marker = regex::escape(&profile.project_marker);

        Ok(Patterns {
            marker: profile.project_marker.clone(),
            header_markers: profile.header_markers.clone(),
            pagination_marker: profile.pagination_marker.clone(),
            total_markers: profile.total_markers.clone(),
            billable_markers: profile.billable_markers.clone(),
            member: Regex::new(&format!(r"\b({})\b", names.join("|")))?,
            pure_time_range: Regex::new(&format!(
                r"^(?:{marker})?\s*\d{{2}}:\d{{2}}\s*-\s*\d{{2}}:\d{{2}}\s*$"
            ))?,
            project_on_line: Regex::new(&format!(r"{marker}\s*(\w+(?:\s+\w+)?)"))?,
            project_before_date: Regex::new(&format!(
                r"{marker}\s*([^-]+?)(?:\s+\d{{2}}/\d{{2}}/\d{{4}})"
            ))?,
            marker_and_rest: Regex::new(&format!(r"{marker}.*"))?,
        })
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Header, section title, page footer, or a Total/Billable line. Never anchors or
    /// feeds an entry.
    pub fn is_structural(&self, line: &str) -> bool {
        self.is_header(line) || self.is_summary(line)
    }

    fn is_header(&self, line: &str) -> bool {
        self.header_markers.iter().any(|m| line.contains(m.as_str()))
            || (line.contains(self.pagination_marker.as_str()) && line.contains('/'))
    }

    pub fn is_total(&self, line: &str) -> bool {
        self.total_markers.iter().any(|m| line.contains(m.as_str()))
    }

    /// Total or billable summary line.
    pub fn is_summary(&self, line: &str) -> bool {
        self.is_total(line) || self.billable_markers.iter().any(|m| line.contains(m.as_str()))
    }

    /// First member token on the line, as written.
    pub fn member_token<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.member
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    pub fn has_member(&self, line: &str) -> bool {
        self.member.is_match(line)
    }

    pub fn strip_members(&self, line: &str) -> String {
        self.member.replace_all(line, "").into_owned()
    }

    /// Another entry's main line: a duration and a member on the same line.
    pub fn is_entry_line(&self, line: &str) -> bool {
        DURATION.is_match(line) && self.has_member(line)
    }

    pub fn is_pure_date(&self, line: &str) -> bool {
        PURE_DATE.is_match(line)
    }

    pub fn is_pure_time_range(&self, line: &str) -> bool {
        self.pure_time_range.is_match(line)
    }

    pub fn starts_with_marker(&self, line: &str) -> bool {
        line.starts_with(self.marker.as_str())
    }

    /// Marker followed by one or two words, e.g. "• Intek Medical".
    pub fn project_on_line(&self, line: &str) -> Option<String> {
        self.project_on_line
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Marker followed by a name and a date, e.g. "• Intek Medical - Web  01/02/2024".
    pub fn project_before_date(&self, line: &str) -> Option<String> {
        self.project_before_date
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|p| !p.is_empty())
    }

    pub fn strip_marker_and_rest(&self, line: &str) -> String {
        self.marker_and_rest.replace(line, "").into_owned()
    }

    pub fn strip_marker(&self, line: &str) -> String {
        line.replace(self.marker.as_str(), "")
    }
}

pub fn strip_trailing_date(line: &str) -> String {
    TRAILING_DATE.replace(line, "").into_owned()
}

pub fn strip_time_ranges(line: &str) -> String {
    TIME_RANGE_STRIP.replace_all(line, "").into_owned()
}

pub fn strip_trailing_dash(line: &str) -> String {
    TRAILING_DASH.replace(line, "").into_owned()
}
