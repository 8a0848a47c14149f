//! Reconciliation of parsed entries against the report's printed grand total.

use serde::Serialize;
use std::io::Read;

use crate::emit::DURATION_COLUMN;
use crate::error::TimecardError;
use crate::model::{Hms, Reconstruction};
use crate::parsing::normalize::clean_text;
use crate::parsing::patterns::{Patterns, DURATION};
use crate::profile::schema::ReportProfile;

/// The grand total is printed in the report header, within the first lines.
pub const GRAND_TOTAL_SCAN_LINES: usize = 10;

pub const CONTEXT_RADIUS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TotalSource {
    Explicit,
    Profile,
    Detected { line_index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrintedTotal {
    pub total: Hms,
    pub source: TotalSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub count: usize,
    pub seconds: u64,
}

impl Tally {
    pub fn duration(&self) -> Hms {
        Hms::from_seconds(self.seconds)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextSnippet {
    pub line_index: usize,
    pub reason: String,
    pub lines: Vec<(usize, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub lines: usize,
    /// Every `H:MM:SS` occurrence, the grand total line excluded.
    pub duration_patterns: Tally,
    pub printed_total: Option<PrintedTotal>,
    pub anchors: usize,
    pub emitted: Tally,
    pub discarded: Tally,
    pub unmatched: Tally,
    pub tolerance_secs: u64,
    /// Printed total minus emitted seconds.
    pub discrepancy_secs: Option<i64>,
    /// Whether the discrepancy equals the dropped candidates' time, within tolerance.
    pub explained: Option<bool>,
    pub within_tolerance: Option<bool>,
    pub context: Vec<ContextSnippet>,
}

/// First total line near the top of the report that carries a duration.
pub fn detect_printed_total<S: AsRef<str>>(
    lines: &[S],
    patterns: &Patterns,
) -> Option<(usize, Hms)> {
    lines
        .iter()
        .take(GRAND_TOTAL_SCAN_LINES)
        .enumerate()
        .find_map(|(i, raw)| {
            let line = clean_text(raw.as_ref());
            if !patterns.is_total(&line) {
                return None;
            }
            let found = DURATION.find(&line)?;
            Hms::parse(found.as_str()).ok().map(|h| (i, h))
        })
}

/// Lines within `radius` of `index`, cleaned and numbered.
pub fn context<S: AsRef<str>>(lines: &[S], index: usize, radius: usize) -> Vec<(usize, String)> {
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius).saturating_add(1).min(lines.len());
    (start..end)
        .map(|j| (j, clean_text(lines[j].as_ref())))
        .collect()
}

pub fn audit<S: AsRef<str>>(
    lines: &[S],
    reconstruction: &Reconstruction,
    profile: &ReportProfile,
    expected: Option<Hms>,
    tolerance_secs: u64,
) -> Result<AuditReport, TimecardError> {
    let patterns = Patterns::compile(profile)?;
    let detected = detect_printed_total(lines, &patterns);

    let profile_total = profile
        .expected_total
        .as_deref()
        .map(Hms::parse)
        .transpose()?;

    let printed_total = match (expected, profile_total, detected) {
        (Some(total), _, _) => Some(PrintedTotal {
            total,
            source: TotalSource::Explicit,
        }),
        (None, Some(total), _) => Some(PrintedTotal {
            total,
            source: TotalSource::Profile,
        }),
        (None, None, Some((line_index, total))) => Some(PrintedTotal {
            total,
            source: TotalSource::Detected { line_index },
        }),
        (None, None, None) => None,
    };

    let grand_total_line = detected.map(|(i, _)| i);
    let mut duration_patterns = Tally::default();
    for (i, raw) in lines.iter().enumerate() {
        if Some(i) == grand_total_line {
            continue;
        }
        let line = clean_text(raw.as_ref());
        for m in DURATION.find_iter(&line) {
            duration_patterns.count += 1;
            if let Ok(h) = Hms::parse(m.as_str()) {
                duration_patterns.seconds += h.total_seconds();
            }
        }
    }

    let emitted = Tally {
        count: reconstruction.entries.len(),
        seconds: reconstruction.emitted_seconds(),
    };
    let discarded = Tally {
        count: reconstruction.discarded.len(),
        seconds: reconstruction.discarded_seconds(),
    };
    let unmatched = Tally {
        count: reconstruction.unmatched.len(),
        seconds: reconstruction.unmatched_seconds(),
    };

    let discrepancy_secs = printed_total.map(|p| signed(p.total.total_seconds()) - signed(emitted.seconds));
    let tolerance = signed(tolerance_secs);
    let explained = discrepancy_secs
        .map(|d| (d - signed(discarded.seconds) - signed(unmatched.seconds)).abs() <= tolerance);
    let within_tolerance = discrepancy_secs.map(|d| d.abs() <= tolerance);

    let mut snippets: Vec<ContextSnippet> = reconstruction
        .discarded
        .iter()
        .map(|d| ContextSnippet {
            line_index: d.line_index,
            reason: "no date in range".into(),
            lines: context(lines, d.line_index, CONTEXT_RADIUS),
        })
        .chain(reconstruction.unmatched.iter().map(|u| ContextSnippet {
            line_index: u.line_index,
            reason: match u.duration {
                Some(_) => "no member in range".into(),
                None => "invalid duration".into(),
            },
            lines: context(lines, u.line_index, CONTEXT_RADIUS),
        }))
        .collect();
    snippets.sort_by_key(|s| s.line_index);

    if let Some(d) = discrepancy_secs {
        log::info!(
            "audit: printed total minus emitted = {d}s, dropped candidates account for {}s",
            discarded.seconds + unmatched.seconds
        );
    }

    Ok(AuditReport {
        lines: lines.len(),
        duration_patterns,
        printed_total,
        anchors: reconstruction.anchor_count(),
        emitted,
        discarded,
        unmatched,
        tolerance_secs,
        discrepancy_secs,
        explained,
        within_tolerance,
        context: snippets,
    })
}

fn signed(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Result of re-reading an emitted CSV.
#[derive(Debug, Clone, Serialize)]
pub struct CsvCheck {
    pub rows: usize,
    pub total: Hms,
    pub total_seconds: u64,
    /// (1-based data row, cell value) for durations that did not parse.
    pub invalid_durations: Vec<(usize, String)>,
    pub expected: Option<Hms>,
    /// Expected minus CSV total.
    pub difference_secs: Option<i64>,
    pub within_tolerance: Option<bool>,
}

/// Sum the duration column of an emitted CSV and compare it with an expected total.
pub fn verify_csv<R: Read>(
    reader: R,
    expected: Option<Hms>,
    tolerance_secs: u64,
) -> Result<CsvCheck, TimecardError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.trim() == DURATION_COLUMN)
        .ok_or_else(|| TimecardError::MissingColumn(DURATION_COLUMN.into()))?;

    let mut rows = 0;
    let mut total_seconds = 0;
    let mut invalid_durations = Vec::new();

    for record in rdr.records() {
        let record = record?;
        rows += 1;
        let cell = record.get(column).unwrap_or_default();
        match Hms::parse(cell) {
            Ok(h) => total_seconds += h.total_seconds(),
            Err(_) => invalid_durations.push((rows, cell.to_string())),
        }
    }

    let difference_secs = expected.map(|e| signed(e.total_seconds()) - signed(total_seconds));
    let within_tolerance = difference_secs.map(|d| d.abs() <= signed(tolerance_secs));

    Ok(CsvCheck {
        rows,
        total: Hms::from_seconds(total_seconds),
        total_seconds,
        invalid_durations,
        expected,
        difference_secs,
        within_tolerance,
    })
}
