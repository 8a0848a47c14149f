pub mod fields;
pub mod normalize;
pub mod patterns;

use std::collections::BTreeSet;

use crate::error::TimecardError;
use crate::model::{DiscardedCandidate, Hms, Reconstruction, UnmatchedAnchor};
use crate::profile::schema::ReportProfile;
use fields::{Neighborhood, Resolution};
use normalize::clean_text;
use patterns::{Patterns, DURATION};

/// Line indices already attributed to a candidate.
#[derive(Debug, Clone, Default)]
pub struct ClaimedLines(BTreeSet<usize>);

impl ClaimedLines {
    pub fn claim(&mut self, index: usize) {
        self.0.insert(index);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }
}

/// Rebuild time entries from a flattened line sequence.
///
/// Each line carrying a duration is a weak anchor. Its member, project, description,
/// time range and date are recovered from a bounded neighbourhood of lines. Entries
/// come out in anchor order.
pub fn reconstruct<S: AsRef<str>>(
    lines: &[S],
    profile: &ReportProfile,
) -> Result<Reconstruction, TimecardError> {
    let patterns = Patterns::compile(profile)?;
    let cleaned: Vec<String> = lines.iter().map(|l| clean_text(l.as_ref())).collect();
    let mut claimed = ClaimedLines::default();
    let mut out = Reconstruction::default();

    for index in 0..cleaned.len() {
        if claimed.contains(index) {
            continue;
        }

        let line = cleaned[index].as_str();
        if patterns.is_structural(line) {
            continue;
        }
        let Some(found) = DURATION.find(line) else {
            continue;
        };

        let duration = match Hms::parse(found.as_str()) {
            Ok(d) => d,
            Err(e) => {
                log::debug!("line {index}: not a valid duration ({e}): {line}");
                out.unmatched.push(UnmatchedAnchor {
                    line_index: index,
                    line: line.to_string(),
                    duration: None,
                });
                continue;
            }
        };

        if !member_in_range(&cleaned, index, &patterns, profile, &claimed) {
            log::debug!("line {index}: no member within range: {line}");
            out.unmatched.push(UnmatchedAnchor {
                line_index: index,
                line: line.to_string(),
                duration: Some(duration),
            });
            continue;
        }

        let hood = Neighborhood {
            lines: &cleaned,
            anchor: index,
            patterns: &patterns,
            profile,
        };

        match fields::resolve(&hood, duration) {
            Some(Resolution::Entry(entry)) => {
                log::debug!(
                    "line {index}: {} {} {} '{}'",
                    entry.date,
                    entry.member,
                    entry.duration,
                    entry.description
                );
                out.entries.push(entry);
            }
            Some(Resolution::Dateless { member }) => {
                log::debug!("line {index}: no date found, discarding: {line}");
                out.discarded.push(DiscardedCandidate {
                    line_index: index,
                    line: line.to_string(),
                    duration,
                    member,
                });
            }
            None => {
                log::debug!("line {index}: member only on header lines: {line}");
                out.unmatched.push(UnmatchedAnchor {
                    line_index: index,
                    line: line.to_string(),
                    duration: Some(duration),
                });
                continue;
            }
        }

        claimed.claim(index);
    }

    log::info!(
        "reconstructed {} entries from {} lines ({} discarded without date, {} without member)",
        out.entries.len(),
        cleaned.len(),
        out.discarded.len(),
        out.unmatched.len()
    );

    Ok(out)
}

/// Whether a member token sits on the anchor line or on a nearby line that is
/// neither claimed nor a total line.
fn member_in_range(
    lines: &[String],
    index: usize,
    patterns: &Patterns,
    profile: &ReportProfile,
    claimed: &ClaimedLines,
) -> bool {
    if patterns.has_member(&lines[index]) {
        return true;
    }

    let radius = profile.member_window;
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius).min(lines.len().saturating_sub(1));
    (start..=end)
        .filter(|&j| j != index && !claimed.contains(j))
        .any(|j| !patterns.is_total(&lines[j]) && patterns.has_member(&lines[j]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin::{load_preset, DEFAULT_PRESET};
    use chrono::NaiveDate;

    fn profile() -> ReportProfile {
        load_preset(DEFAULT_PRESET).unwrap()
    }

    #[test]
    fn test_project_marker_block() {
        let lines = [
            "• ProjectX  01/02/2024",
            "Some task",
            "09:00 - 10:30",
            "Some task  1:30:00  Dani",
        ];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.entries.len(), 1);
        let e = &r.entries[0];
        assert_eq!(e.description, "Some task");
        assert_eq!(e.duration.to_string(), "1:30:00");
        assert_eq!(e.member, "Dani");
        assert_eq!(e.project, "ProjectX");
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(e.start_time, "09:00");
        assert_eq!(e.end_time, "10:30");
        assert!(e.tags.is_empty());
        assert_eq!(e.line_index, 3);
    }

    #[test]
    fn test_total_line_never_anchors() {
        let lines = ["01/02/2024", "Total Dani 10:00:00", "Dani"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert!(r.entries.is_empty());
        assert!(r.unmatched.is_empty());
        assert!(r.discarded.is_empty());
    }

    #[test]
    fn test_billable_line_never_anchors() {
        let lines = ["01/02/2024", "Billable 3:00:00 Dani"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.anchor_count(), 0);
    }

    #[test]
    fn test_header_lines_skipped() {
        let lines = ["DESCRIPTION DURATION 1:00:00 Dani", "01/02/2024"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.anchor_count(), 0);
    }

    #[test]
    fn test_no_date_within_wide_window_discards() {
        let mut lines = vec!["Task 1:00:00 Dani".to_string()];
        lines.extend((0..10).map(|i| format!("filler {i}")));
        lines.push("01/02/2024".to_string());
        let r = reconstruct(&lines, &profile()).unwrap();
        assert!(r.entries.is_empty());
        assert_eq!(r.discarded.len(), 1);
        assert_eq!(r.discarded[0].member, "Dani");
        assert_eq!(r.discarded[0].duration.to_string(), "1:00:00");
    }

    #[test]
    fn test_member_from_nearby_line() {
        let lines = ["Review PR", "2:15:00", "Joan", "• Web  03/04/2024"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].member, "Joan");
        assert_eq!(r.entries[0].description, "Review PR");
        assert_eq!(r.entries[0].project, "Web");
        assert_eq!(r.entries[0].start_time, "00:01");
        assert_eq!(r.entries[0].end_time, "00:01");
    }

    #[test]
    fn test_no_member_in_range_is_unmatched() {
        let lines = ["Dani", "a", "b", "c", "Task 1:00:00", "01/02/2024"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert!(r.entries.is_empty());
        assert_eq!(r.unmatched.len(), 1);
        assert_eq!(r.unmatched[0].line_index, 4);
    }

    #[test]
    fn test_alias_is_canonicalized() {
        let lines = ["Deploy  0:45:00  Jordi", "• Web  01/02/2024"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.entries[0].member, "Alberto");
    }

    #[test]
    fn test_claimed_anchor_does_not_lend_member() {
        // The second duration only sees a member on the first anchor line,
        // which is already claimed.
        let lines = ["Task A 1:00:00 Dani", "Task B 2:00:00", "01/02/2024"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].description, "Task A");
        assert_eq!(r.unmatched.len(), 1);
        assert_eq!(r.unmatched[0].line_index, 1);
    }

    #[test]
    fn test_out_of_range_minutes_not_anchored() {
        let lines = ["Task 1:75:00 Dani", "01/02/2024"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert!(r.entries.is_empty());
        assert_eq!(r.unmatched.len(), 1);
        assert_eq!(r.unmatched[0].duration, None);
    }

    #[test]
    fn test_reconstruction_is_idempotent() {
        let lines = [
            "Detailed report",
            "Total 3:00:00",
            "• Web  01/02/2024",
            "Write docs",
            "09:00 - 10:00",
            "Write docs  1:00:00  Dani",
            "• Web  02/02/2024",
            "Fix bug  2:00:00  Joan",
        ];
        let p = profile();
        let first = reconstruct(&lines, &p).unwrap();
        let second = reconstruct(&lines, &p).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.entries.len(), 2);
    }

    #[test]
    fn test_summary_lines_never_feed_description() {
        let lines = ["Total 10:00:00", "1:00:00 Dani", "01/02/2024"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].description, "Intek Medical");

        let lines = ["• Web  01/02/2024", "Billable 0:00:00", "1:00:00 Dani"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].description, "Intek Medical");
        assert_eq!(r.entries[0].project, "Web");
    }

    #[test]
    fn test_header_date_range_does_not_date_entry() {
        let lines = ["Detailed report 01/02/2024 - 29/02/2024", "Task 1:00:00 Dani"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert!(r.entries.is_empty());
        assert_eq!(r.discarded.len(), 1);
    }

    #[test]
    fn test_unbounded_windows_do_not_overflow() {
        let mut p = profile();
        p.member_window = usize::MAX;
        p.date_forward_window = usize::MAX;
        p.date_backward_window = usize::MAX;
        p.date_wide_window = usize::MAX;
        let lines = ["Dani", "Task 1:00:00", "01/02/2024"];
        let r = reconstruct(&lines, &p).unwrap();
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].member, "Dani");
    }

    #[test]
    fn test_dateless_anchor_is_still_claimed() {
        let lines = ["Task 1:00:00 Dani", "Other 2:00:00"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert!(r.entries.is_empty());
        assert_eq!(r.discarded.len(), 1);
        assert_eq!(r.discarded[0].line_index, 0);
        assert_eq!(r.unmatched.len(), 1);
        assert_eq!(r.unmatched[0].line_index, 1);
    }

    #[test]
    fn test_wide_window_date_keeps_anchor_project() {
        let mut lines = vec!["Task 1:00:00 Dani".to_string()];
        lines.extend((0..8).map(|i| format!("filler {i}")));
        lines.push("• Web  01/02/2024".to_string());
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(r.entries[0].project, "Intek Medical");
    }

    #[test]
    fn test_nul_bytes_are_cleaned() {
        let lines = ["Call\0client  0:30:00  Dani", "• Web  01/02/2024"];
        let r = reconstruct(&lines, &profile()).unwrap();
        assert_eq!(r.entries[0].description, "Call client");
    }
}
