//! Integration tests for the parse_pdf() end-to-end pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without
//! invoking pdftotext, so these tests run without poppler-utils.

use chrono::NaiveDate;
use timecard_core::audit::audit;
use timecard_core::emit::write_csv;
use timecard_core::error::TimecardError;
use timecard_core::extraction::{PageContent, PdfExtractor};
use timecard_core::parse_pdf;
use timecard_core::parsing::patterns::{Patterns, DATE, DURATION};
use timecard_core::profile::builtin::{load_preset, DEFAULT_PRESET};
use timecard_core::summary::summarize;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, TimecardError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct FailingExtractor;

impl PdfExtractor for FailingExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, TimecardError> {
        Err(TimecardError::Extraction("corrupt xref table".into()))
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent {
        page_number: number,
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn two_page_report() -> MockExtractor {
    MockExtractor {
        pages: vec![
            page(
                1,
                &[
                    "Detailed report",
                    "01/02/2024 - 29/02/2024",
                    "Total 6:45:00  Billable 0:00:00",
                    "All time entries",
                    "DESCRIPTION DURATION USER",
                    "• Intek Medical  01/02/2024",
                    "API review",
                    "09:00 - 10:30",
                    "API review  1:30:00  Dani",
                    "• Intek Medical  01/02/2024",
                    "Sprint planning - 2:00:00 Jordi",
                    "Page 1/2",
                ],
            ),
            page(2, &[]),
            page(
                3,
                &[
                    "• Intek Medical  05/02/2024",
                    "Deploy staging",
                    "14:00 - 16:00",
                    "Deploy staging  2:00:00  Joan",
                    "Page 2/2",
                    "x",
                    "y",
                    "z",
                    "w",
                    "v",
                    "u",
                    "t",
                    "s",
                    "r",
                    "q",
                    "Hotfix  1:15:00  Dani",
                ],
            ),
        ],
    }
}

// ---------------------------------------------------------------------------
// Test 1: Entries across pages come out in anchor order with resolved fields
// ---------------------------------------------------------------------------
#[test]
fn entries_across_pages_in_anchor_order() {
    let profile = load_preset(DEFAULT_PRESET).unwrap();
    let parsed = parse_pdf(&[], &two_page_report(), &profile).unwrap();
    let entries = &parsed.reconstruction.entries;

    assert_eq!(parsed.backend, "mock");
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].description, "API review");
    assert_eq!(entries[0].member, "Dani");
    assert_eq!(entries[0].start_time, "09:00");
    assert_eq!(entries[0].end_time, "10:30");

    // Alias applied, description taken from the anchor line.
    assert_eq!(entries[1].description, "Sprint planning");
    assert_eq!(entries[1].member, "Alberto");
    assert_eq!(entries[1].duration.to_string(), "2:00:00");

    assert_eq!(entries[2].description, "Deploy staging");
    assert_eq!(entries[2].member, "Joan");
    assert_eq!(entries[2].date, date(2024, 2, 5));
    assert_eq!(entries[2].project, "Intek Medical");
}

// ---------------------------------------------------------------------------
// Test 2: A dateless candidate is discarded, never emitted
// ---------------------------------------------------------------------------
#[test]
fn dateless_candidate_is_discarded() {
    let profile = load_preset(DEFAULT_PRESET).unwrap();
    let parsed = parse_pdf(&[], &two_page_report(), &profile).unwrap();
    let r = &parsed.reconstruction;

    assert_eq!(r.discarded.len(), 1);
    assert_eq!(r.discarded[0].line.as_str(), "Hotfix  1:15:00  Dani");
    assert!(r.entries.iter().all(|e| e.description != "Hotfix"));
}

// ---------------------------------------------------------------------------
// Test 3: Completeness bound and sum check against the printed total
// ---------------------------------------------------------------------------
#[test]
fn audit_reconciles_with_printed_total() {
    let profile = load_preset(DEFAULT_PRESET).unwrap();
    let parsed = parse_pdf(&[], &two_page_report(), &profile).unwrap();
    let r = &parsed.reconstruction;

    // Count qualifying anchors straight from the lines: a duration on a non-structural
    // line, a member within the member window and a date within the wide window.
    let patterns = Patterns::compile(&profile).unwrap();
    let lines = &parsed.lines;
    let near = |i: usize, radius: usize| {
        let end = (i + radius).min(lines.len() - 1);
        (i.saturating_sub(radius)..=end)
            .map(|j| lines[j].trim())
            .filter(|l| !patterns.is_structural(l))
            .collect::<Vec<_>>()
    };
    let qualifying = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| DURATION.is_match(l) && !patterns.is_structural(l.trim()))
        .filter(|(i, _)| near(*i, profile.member_window).iter().any(|l| patterns.has_member(l)))
        .filter(|(i, _)| near(*i, profile.date_wide_window).iter().any(|l| DATE.is_match(l)))
        .count();
    assert_eq!(qualifying, 3);
    assert_eq!(r.entries.len(), qualifying);

    let report = audit(&parsed.lines, r, &profile, None, 0).unwrap();
    assert_eq!(report.printed_total.unwrap().total.to_string(), "6:45:00");
    assert_eq!(report.emitted.seconds, 5 * 3600 + 30 * 60);
    assert_eq!(report.discrepancy_secs, Some(75 * 60));
    assert_eq!(report.explained, Some(true));
}

// ---------------------------------------------------------------------------
// Test 4: CSV output has the fixed header and canonical durations
// ---------------------------------------------------------------------------
#[test]
fn csv_output_is_normalized() {
    let profile = load_preset(DEFAULT_PRESET).unwrap();
    let parsed = parse_pdf(&[], &two_page_report(), &profile).unwrap();

    let mut buf = Vec::new();
    write_csv(&mut buf, &parsed.reconstruction.entries).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    let rows: Vec<&str> = csv.lines().collect();

    assert_eq!(
        rows[0],
        "Description,Duration (HH:MM:SS),Member,Project,Date,Start Time,End Time,Tags"
    );
    assert_eq!(rows.len(), 4);
    assert!(rows[1].starts_with("API review,01:30:00,Dani,Intek Medical,2024-02-01,09:00,10:30,"));
    assert!(rows.iter().all(|r| !r.contains("Jordi")));
}

// ---------------------------------------------------------------------------
// Test 5: Summary over the parsed entries
// ---------------------------------------------------------------------------
#[test]
fn summary_counts_members() {
    let profile = load_preset(DEFAULT_PRESET).unwrap();
    let parsed = parse_pdf(&[], &two_page_report(), &profile).unwrap();
    let s = summarize(&parsed.reconstruction.entries, 10);

    assert_eq!(s.total.to_string(), "5:30:00");
    assert_eq!(s.members.len(), 3);
    assert_eq!(s.members.get("Alberto"), Some(&1));
    assert!(s.members.get("Jordi").is_none());
}

// ---------------------------------------------------------------------------
// Test 6: Re-running the pipeline yields identical entries
// ---------------------------------------------------------------------------
#[test]
fn pipeline_is_idempotent() {
    let profile = load_preset(DEFAULT_PRESET).unwrap();
    let a = parse_pdf(&[], &two_page_report(), &profile).unwrap();
    let b = parse_pdf(&[], &two_page_report(), &profile).unwrap();
    assert_eq!(a.reconstruction, b.reconstruction);
}

// ---------------------------------------------------------------------------
// Test 7: Extraction failure aborts the run
// ---------------------------------------------------------------------------
#[test]
fn extraction_failure_propagates() {
    let profile = load_preset(DEFAULT_PRESET).unwrap();
    let result = parse_pdf(&[], &FailingExtractor, &profile);
    assert!(matches!(result, Err(TimecardError::Extraction(_))));
}

// ---------------------------------------------------------------------------
// Test 8: Empty document parses to nothing
// ---------------------------------------------------------------------------
#[test]
fn empty_document_yields_no_entries() {
    let profile = load_preset(DEFAULT_PRESET).unwrap();
    let extractor = MockExtractor {
        pages: vec![page(1, &[]), page(2, &[])],
    };
    let parsed = parse_pdf(&[], &extractor, &profile).unwrap();
    assert!(parsed.lines.is_empty());
    assert!(parsed.reconstruction.entries.is_empty());
}
