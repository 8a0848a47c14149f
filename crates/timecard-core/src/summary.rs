use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Hms, TimeEntry};

#[derive(Debug, Clone, Serialize)]
pub struct DescriptionGroup {
    pub description: String,
    pub entries: usize,
    pub seconds: u64,
    pub hours: Decimal,
}

/// Totals and breakdowns for one extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub entries: usize,
    pub total: Hms,
    pub total_seconds: u64,
    pub total_hours: Decimal,
    pub members: BTreeMap<String, usize>,
    pub unique_descriptions: usize,
    pub top_descriptions: Vec<DescriptionGroup>,
}

/// Hours with two decimals, e.g. 5400 s -> 1.50.
pub fn hours(seconds: u64) -> Decimal {
    (Decimal::from(seconds) / Decimal::from(3600))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn summarize(entries: &[TimeEntry], top_n: usize) -> RunSummary {
    let total_seconds: u64 = entries.iter().map(|e| e.duration.total_seconds()).sum();

    let mut members: BTreeMap<String, usize> = BTreeMap::new();
    for entry in entries {
        *members.entry(entry.member.clone()).or_default() += 1;
    }

    // Grouped case-insensitively; the first spelling seen is kept for display.
    let mut groups: BTreeMap<String, DescriptionGroup> = BTreeMap::new();
    for entry in entries {
        let description = entry.description.trim();
        let group = groups
            .entry(description.to_lowercase())
            .or_insert_with(|| DescriptionGroup {
                description: description.to_string(),
                entries: 0,
                seconds: 0,
                hours: Decimal::ZERO,
            });
        group.entries += 1;
        group.seconds += entry.duration.total_seconds();
    }

    let unique_descriptions = groups.len();
    let mut top: Vec<DescriptionGroup> = groups
        .into_values()
        .map(|mut g| {
            g.hours = hours(g.seconds);
            g
        })
        .collect();
    top.sort_by(|a, b| b.seconds.cmp(&a.seconds));
    top.truncate(top_n);

    RunSummary {
        entries: entries.len(),
        total: Hms::from_seconds(total_seconds),
        total_seconds,
        total_hours: hours(total_seconds),
        members,
        unique_descriptions,
        top_descriptions: top,
    }
}
