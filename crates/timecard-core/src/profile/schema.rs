use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layout constants for one family of vendor time reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Closed set of recognized member name tokens.
    pub members: Vec<String>,
    /// Token -> canonical member name. Both sides must appear in `members`.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    pub default_project: String,
    #[serde(default = "default_placeholder_time")]
    pub placeholder_time: String,
    /// Glyph that introduces a project name, e.g. "•".
    #[serde(default = "default_project_marker")]
    pub project_marker: String,
    #[serde(default = "default_header_markers")]
    pub header_markers: Vec<String>,
    /// A line containing this word and a '/' is a page footer.
    #[serde(default = "default_pagination_marker")]
    pub pagination_marker: String,
    #[serde(default = "default_total_markers")]
    pub total_markers: Vec<String>,
    #[serde(default = "default_billable_markers")]
    pub billable_markers: Vec<String>,
    #[serde(default = "default_member_window")]
    pub member_window: usize,
    #[serde(default = "default_date_forward_window")]
    pub date_forward_window: usize,
    #[serde(default = "default_date_backward_window")]
    pub date_backward_window: usize,
    #[serde(default = "default_date_wide_window")]
    pub date_wide_window: usize,
    #[serde(default = "default_min_description_len")]
    pub min_description_len: usize,
    /// Grand total printed on the report, as `H:MM:SS`.
    #[serde(default)]
    pub expected_total: Option<String>,
}

impl ReportProfile {
    /// Canonical name for a recognized member token.
    pub fn canonical_member<'a>(&'a self, token: &'a str) -> &'a str {
        self.aliases.get(token).map(String::as_str).unwrap_or(token)
    }
}

fn default_placeholder_time() -> String {
    "00:01".into()
}

fn default_project_marker() -> String {
    "•".into()
}

fn default_header_markers() -> Vec<String> {
    [
        "DESCRIPTION",
        "DURATION",
        "All time entries",
        "Detailed report",
        "Summary",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_pagination_marker() -> String {
    "Page".into()
}

fn default_total_markers() -> Vec<String> {
    vec!["Total".into()]
}

fn default_billable_markers() -> Vec<String> {
    vec!["Billable".into()]
}

fn default_member_window() -> usize {
    3
}

fn default_date_forward_window() -> usize {
    7
}

fn default_date_backward_window() -> usize {
    4
}

fn default_date_wide_window() -> usize {
    10
}

fn default_min_description_len() -> usize {
    3
}
