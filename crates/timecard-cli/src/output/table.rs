use timecard_core::audit::{AuditReport, CsvCheck, TotalSource};
use timecard_core::model::{Hms, TimeEntry};
use timecard_core::summary::RunSummary;

const RULE: &str = "============================================================";

fn signed_duration(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    format!("{sign}{}", Hms::from_seconds(secs.unsigned_abs()))
}

fn verdict(ok: Option<bool>) -> &'static str {
    match ok {
        Some(true) => "OK",
        Some(false) => "MISMATCH",
        None => "n/a",
    }
}

pub fn print_entries(entries: &[TimeEntry]) {
    let desc_width = entries
        .iter()
        .map(|e| e.description.chars().count())
        .max()
        .unwrap_or(11)
        .clamp(11, 48);

    println!(
        "{:<10}  {:<desc_width$}  {:>10}  {:<10}  {:<11}  {}",
        "Date", "Description", "Duration", "Member", "Time", "Project"
    );
    for e in entries {
        let description: String = e.description.chars().take(desc_width).collect();
        println!(
            "{:<10}  {:<desc_width$}  {:>10}  {:<10}  {:<11}  {}",
            e.date.format("%Y-%m-%d").to_string(),
            description,
            e.duration.to_string(),
            e.member,
            format!("{}-{}", e.start_time, e.end_time),
            e.project
        );
    }
}

/// Printed to stderr so it never mixes with CSV on stdout.
pub fn print_summary(summary: &RunSummary) {
    eprintln!("\n{RULE}");
    eprintln!("EXTRACTION SUMMARY");
    eprintln!("{RULE}");
    eprintln!("Total entries:       {}", summary.entries);
    eprintln!(
        "Total time:          {} ({} hours)",
        summary.total, summary.total_hours
    );
    eprintln!("Unique descriptions: {}", summary.unique_descriptions);

    if !summary.members.is_empty() {
        eprintln!("\nEntries by member:");
        for (member, count) in &summary.members {
            eprintln!("  {member:<12} {count}");
        }
    }

    if !summary.top_descriptions.is_empty() {
        eprintln!("\nTop tasks by time:");
        for g in &summary.top_descriptions {
            let description: String = g.description.chars().take(50).collect();
            eprintln!(
                "  {:<50} {:>7}h  ({} entries)",
                description, g.hours, g.entries
            );
        }
    }
}

pub fn print_audit(report: &AuditReport, verbose: bool) {
    println!("{RULE}");
    println!("DURATION AUDIT");
    println!("{RULE}");
    println!("Lines extracted:     {}", report.lines);
    println!(
        "Duration patterns:   {} ({})",
        report.duration_patterns.count,
        report.duration_patterns.duration()
    );
    println!("Anchors:             {}", report.anchors);
    println!(
        "  emitted:           {} ({})",
        report.emitted.count,
        report.emitted.duration()
    );
    println!(
        "  discarded:         {} ({})",
        report.discarded.count,
        report.discarded.duration()
    );
    println!(
        "  unmatched:         {} ({})",
        report.unmatched.count,
        report.unmatched.duration()
    );

    match &report.printed_total {
        Some(printed) => {
            let source = match printed.source {
                TotalSource::Explicit => "given".to_string(),
                TotalSource::Profile => "profile".to_string(),
                TotalSource::Detected { line_index } => format!("line {line_index}"),
            };
            println!("\nPrinted total:       {} ({source})", printed.total);
        }
        None => println!("\nPrinted total:       not found"),
    }

    if let Some(discrepancy) = report.discrepancy_secs {
        println!(
            "Discrepancy:         {} [{}, tolerance {}s]",
            signed_duration(discrepancy),
            verdict(report.within_tolerance),
            report.tolerance_secs
        );
        let explained = match report.explained {
            Some(true) => "yes",
            Some(false) => "no",
            None => "n/a",
        };
        println!("Explained by drops:  {explained}");
    }

    if verbose && !report.context.is_empty() {
        println!("\n{RULE}");
        println!("DROPPED CANDIDATES");
        println!("{RULE}");
        for snippet in &report.context {
            println!("\nLine {} ({}):", snippet.line_index, snippet.reason);
            for (i, line) in &snippet.lines {
                let marker = if *i == snippet.line_index { ">>>" } else { "   " };
                println!("  {marker} {i:>6}: {line}");
            }
        }
    }
}

pub fn print_csv_check(check: &CsvCheck) {
    println!("Rows:      {}", check.rows);
    println!(
        "CSV total: {} ({} seconds)",
        check.total, check.total_seconds
    );
    if let Some(expected) = check.expected {
        println!("Expected:  {expected}");
    }
    if let Some(diff) = check.difference_secs {
        println!(
            "Difference: {} [{}]",
            signed_duration(diff),
            verdict(check.within_tolerance)
        );
    }
    if !check.invalid_durations.is_empty() {
        println!("\nUnparseable durations:");
        for (row, value) in &check.invalid_durations {
            println!("  row {row}: {value:?}");
        }
    }
}
