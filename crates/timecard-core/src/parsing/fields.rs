//! Per-field resolution around one anchor line.
//!
//! Every field is resolved by an ordered list of strategies. Each strategy looks at the
//! anchor's neighbourhood and either finds a value or passes to the next one.

use chrono::NaiveDate;

use super::normalize::collapse_whitespace;
use super::patterns::{self, Patterns, DATE, DATE_SUFFIX, DURATION, TIME_RANGE};
use crate::model::{Hms, TimeEntry};
use crate::profile::schema::ReportProfile;

/// The cleaned line sequence seen from one anchor line.
pub struct Neighborhood<'a> {
    pub lines: &'a [String],
    pub anchor: usize,
    pub patterns: &'a Patterns,
    pub profile: &'a ReportProfile,
}

type Strategy<T> = fn(&Neighborhood<'_>) -> Option<T>;

fn first_found<T>(hood: &Neighborhood<'_>, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(hood))
}

/// A date hit, plus the project named on the same line if there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateHit {
    pub date: NaiveDate,
    pub project: Option<String>,
}

/// Outcome of resolving every field for an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Entry(TimeEntry),
    Dateless { member: String },
}

impl<'a> Neighborhood<'a> {
    pub fn anchor_line(&self) -> &'a str {
        &self.lines[self.anchor]
    }

    /// Line `back` positions before the anchor, if it exists.
    pub fn before(&self, back: usize) -> Option<&'a str> {
        self.anchor
            .checked_sub(back)
            .map(|j| self.lines[j].as_str())
    }

    /// Indices within `radius` of the anchor in ascending order, the anchor excluded.
    pub fn window(&self, radius: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.anchor.saturating_sub(radius);
        let end = self
            .anchor
            .saturating_add(radius)
            .min(self.lines.len().saturating_sub(1));
        (start..=end).filter(move |&j| j != self.anchor)
    }

    fn is_candidate_description(&self, text: &str) -> bool {
        !text.is_empty()
            && text.chars().any(char::is_alphabetic)
            && text.chars().count() >= self.profile.min_description_len
    }
}

/// Resolve all fields for the anchor. `None` when no member can be attributed.
pub fn resolve(hood: &Neighborhood<'_>, duration: Hms) -> Option<Resolution> {
    let token = first_found(hood, &[member_on_anchor, member_in_window])?;
    let member = hood.profile.canonical_member(&token).to_string();

    let project = first_found(hood, &[project_on_anchor])
        .unwrap_or_else(|| hood.profile.default_project.clone());
    let description = resolve_description(hood, &project);

    let (start_time, end_time) = first_found(hood, &[time_range_before, time_range_on_anchor])
        .unwrap_or_else(|| {
            (
                hood.profile.placeholder_time.clone(),
                hood.profile.placeholder_time.clone(),
            )
        });

    let Some(hit) = first_found(hood, &[date_forward, date_backward, date_wide]) else {
        return Some(Resolution::Dateless { member });
    };

    Some(Resolution::Entry(TimeEntry {
        description,
        duration,
        member,
        project: hit.project.unwrap_or(project),
        date: hit.date,
        start_time,
        end_time,
        tags: Vec::new(),
        line_index: hood.anchor,
    }))
}

fn member_on_anchor(hood: &Neighborhood<'_>) -> Option<String> {
    hood.patterns
        .member_token(hood.anchor_line())
        .map(str::to_string)
}

fn member_in_window(hood: &Neighborhood<'_>) -> Option<String> {
    hood.window(hood.profile.member_window).find_map(|j| {
        let line = hood.lines[j].as_str();
        if hood.patterns.is_structural(line) {
            return None;
        }
        hood.patterns.member_token(line).map(str::to_string)
    })
}

fn project_on_anchor(hood: &Neighborhood<'_>) -> Option<String> {
    hood.patterns.project_on_line(hood.anchor_line())
}

/// Build the description from the anchor line and the lines just above it.
///
/// Same-line text comes first; a neighbour fragment that overlaps it is dropped.
/// Falls back to `project` when nothing usable remains.
fn resolve_description(hood: &Neighborhood<'_>, project: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(text) = neighbour_description(hood, 1).or_else(|| neighbour_description(hood, 2)) {
        parts.push(text);
    }

    if let Some(same_line) = anchor_description(hood) {
        let lower = same_line.to_lowercase();
        let overlaps = parts.iter().any(|p| {
            let p = p.to_lowercase();
            p.contains(&lower) || lower.contains(&p)
        });
        if !overlaps {
            parts.insert(0, same_line);
        }
    }

    let joined = collapse_whitespace(&parts.join(" "));
    let description = DATE_SUFFIX.replace(&joined, "").trim().to_string();

    if description.chars().count() < hood.profile.min_description_len {
        project.to_string()
    } else {
        description
    }
}

/// Text before the duration on the anchor line, minus member names, project marker
/// and a trailing dash.
fn anchor_description(hood: &Neighborhood<'_>) -> Option<String> {
    let line = hood.anchor_line();
    let m = DURATION.find(line)?;
    let before = line[..m.start()].trim();
    if before.is_empty() {
        return None;
    }

    let text = hood.patterns.strip_members(before);
    let text = hood.patterns.strip_marker_and_rest(&text);
    let text = patterns::strip_trailing_dash(&text);
    let text = text.trim();

    if !hood.is_candidate_description(text) || hood.patterns.is_structural(text) {
        return None;
    }
    Some(text.to_string())
}

fn neighbour_description(hood: &Neighborhood<'_>, back: usize) -> Option<String> {
    let line = hood.before(back)?;
    let p = hood.patterns;

    if line.is_empty()
        || p.is_pure_date(line)
        || p.starts_with_marker(line)
        || p.is_pure_time_range(line)
        || p.is_structural(line)
    {
        return None;
    }

    let text = p.strip_marker(line);
    let text = patterns::strip_trailing_date(text.trim());
    let text = patterns::strip_time_ranges(&text);
    let text = text.trim();

    if !hood.is_candidate_description(text) || p.is_entry_line(text) {
        return None;
    }
    Some(text.to_string())
}

fn time_range_on(line: &str) -> Option<(String, String)> {
    TIME_RANGE.captures(line).map(|c| {
        (
            format!("{}:{}", &c[1], &c[2]),
            format!("{}:{}", &c[3], &c[4]),
        )
    })
}

fn time_range_before(hood: &Neighborhood<'_>) -> Option<(String, String)> {
    hood.before(1).and_then(time_range_on)
}

fn time_range_on_anchor(hood: &Neighborhood<'_>) -> Option<(String, String)> {
    time_range_on(hood.anchor_line())
}

/// First real calendar date on the line, read as `DD/MM/YYYY`.
fn date_on(line: &str) -> Option<NaiveDate> {
    DATE.captures_iter(line).find_map(|c| {
        let day = c[1].parse().ok()?;
        let month = c[2].parse().ok()?;
        let year = c[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn date_forward(hood: &Neighborhood<'_>) -> Option<DateHit> {
    let last = hood
        .anchor
        .saturating_add(hood.profile.date_forward_window)
        .min(hood.lines.len().saturating_sub(1));
    ((hood.anchor + 1)..=last).find_map(|j| {
        let line = hood.lines[j].as_str();
        if line.is_empty()
            || line == hood.patterns.marker()
            || hood.patterns.is_structural(line)
        {
            return None;
        }
        date_on(line).map(|date| DateHit {
            date,
            project: hood.patterns.project_before_date(line),
        })
    })
}

fn date_backward(hood: &Neighborhood<'_>) -> Option<DateHit> {
    (1..=hood.profile.date_backward_window.min(hood.anchor)).find_map(|back| {
        let line = hood.before(back)?;
        if line.is_empty() || hood.patterns.is_structural(line) {
            return None;
        }
        date_on(line).map(|date| DateHit {
            date,
            project: if line.contains(hood.patterns.marker()) {
                hood.patterns.project_before_date(line)
            } else {
                None
            },
        })
    })
}

fn date_wide(hood: &Neighborhood<'_>) -> Option<DateHit> {
    let radius = hood.profile.date_wide_window;
    let start = hood.anchor.saturating_sub(radius);
    let end = hood
        .anchor
        .saturating_add(radius)
        .min(hood.lines.len().saturating_sub(1));
    (start..=end)
        .map(|j| hood.lines[j].as_str())
        .filter(|line| !hood.patterns.is_structural(line))
        .find_map(|line| date_on(line).map(|date| DateHit { date, project: None }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin::{load_preset, DEFAULT_PRESET};

    fn with_hood<R>(lines: &[&str], anchor: usize, f: impl FnOnce(&Neighborhood<'_>) -> R) -> R {
        let profile = load_preset(DEFAULT_PRESET).unwrap();
        let patterns = Patterns::compile(&profile).unwrap();
        let lines: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        let hood = Neighborhood {
            lines: &lines,
            anchor,
            patterns: &patterns,
            profile: &profile,
        };
        f(&hood)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_clamps_at_edges() {
        with_hood(&["a", "b", "c"], 0, |h| {
            assert_eq!(h.window(3).collect::<Vec<_>>(), vec![1, 2]);
        });
        with_hood(&["a", "b", "c", "d", "e", "f", "g", "h"], 4, |h| {
            assert_eq!(h.window(3).collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7]);
        });
    }

    #[test]
    fn test_member_prefers_anchor_line() {
        let got = with_hood(&["Joan", "Task 1:00:00 Dani"], 1, |h| {
            first_found(h, &[member_on_anchor, member_in_window])
        });
        assert_eq!(got.as_deref(), Some("Dani"));
    }

    #[test]
    fn test_member_window_skips_total_lines() {
        let got = with_hood(
            &["Total Dani 5:00:00", "Task 1:00:00", "", "Joan"],
            1,
            |h| first_found(h, &[member_on_anchor, member_in_window]),
        );
        assert_eq!(got.as_deref(), Some("Joan"));
    }

    #[test]
    fn test_description_from_anchor_line() {
        let got = with_hood(&["01/02/2024", "Fix login bug - 1:00:00 Dani"], 1, |h| {
            resolve_description(h, "Intek Medical")
        });
        assert_eq!(got, "Fix login bug");
    }

    #[test]
    fn test_description_joins_distinct_fragments() {
        let got = with_hood(&["Sprint planning", "Notes 1:00:00 Dani"], 1, |h| {
            resolve_description(h, "Intek Medical")
        });
        assert_eq!(got, "Notes Sprint planning");
    }

    #[test]
    fn test_description_skips_time_range_then_uses_two_back() {
        let got = with_hood(&["Some task", "09:00 - 10:30", "1:30:00 Dani"], 2, |h| {
            resolve_description(h, "Intek Medical")
        });
        assert_eq!(got, "Some task");
    }

    #[test]
    fn test_description_rejects_other_entry_line() {
        let got = with_hood(&["Other 2:00:00 Joan", "1:30:00 Dani"], 1, |h| {
            resolve_description(h, "Intek Medical")
        });
        assert_eq!(got, "Intek Medical");
    }

    #[test]
    fn test_description_falls_back_to_project() {
        let got = with_hood(&["• Web 01/02/2024", "ab 1:30:00 Dani"], 1, |h| {
            resolve_description(h, "Web")
        });
        assert_eq!(got, "Web");
    }

    #[test]
    fn test_time_range_prefers_previous_line() {
        let got = with_hood(&["08:00 - 09:00", "Task 10:00 - 11:00 1:00:00 Dani"], 1, |h| {
            first_found(h, &[time_range_before, time_range_on_anchor])
        });
        assert_eq!(got, Some(("08:00".into(), "09:00".into())));
    }

    #[test]
    fn test_date_forward_with_project_override() {
        let got = with_hood(&["Task 1:00:00 Dani", "", "• Web App  15/03/2024"], 0, |h| {
            first_found(h, &[date_forward, date_backward, date_wide])
        });
        assert_eq!(
            got,
            Some(DateHit {
                date: ymd(2024, 3, 15),
                project: Some("Web App".into()),
            })
        );
    }

    #[test]
    fn test_date_backward_when_nothing_ahead() {
        let got = with_hood(&["02/01/2024", "x", "Task 1:00:00 Dani"], 2, |h| {
            first_found(h, &[date_forward, date_backward, date_wide])
        });
        assert_eq!(got.map(|h| h.date), Some(ymd(2024, 1, 2)));
    }

    #[test]
    fn test_date_wide_window_reaches_ten_lines() {
        let mut lines = vec!["Task 1:00:00 Dani"];
        lines.extend(std::iter::repeat("filler").take(9));
        lines.push("05/06/2024");
        let got = with_hood(&lines, 0, |h| {
            first_found(h, &[date_forward, date_backward, date_wide])
        });
        assert_eq!(got.map(|h| h.date), Some(ymd(2024, 6, 5)));
    }

    #[test]
    fn test_invalid_calendar_date_is_skipped() {
        assert_eq!(date_on("31/02/2024"), None);
        assert_eq!(date_on("31/02/2024 01/03/2024"), Some(ymd(2024, 3, 1)));
    }
}
