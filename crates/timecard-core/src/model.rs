use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TimecardError;

/// A tracked time span. Hours are unbounded; minutes and seconds are in `0..=59`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hms {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Hms {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Result<Hms, TimecardError> {
        if minutes > 59 || seconds > 59 {
            return Err(TimecardError::Duration(format!(
                "{hours}:{minutes:02}:{seconds:02} has minutes or seconds above 59"
            )));
        }
        Ok(Hms {
            hours,
            minutes,
            seconds,
        })
    }

    pub fn from_seconds(total: u64) -> Hms {
        Hms {
            hours: u32::try_from(total / 3600).unwrap_or(u32::MAX),
            minutes: ((total % 3600) / 60) as u32,
            seconds: (total % 60) as u32,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// `HH:MM:SS` with at least two hour digits.
    pub fn canonical(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    /// Parse `H:MM:SS`, or `H:M` read as hours and minutes. Embedded spaces are ignored.
    pub fn parse(s: &str) -> Result<Hms, TimecardError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let parts: Vec<&str> = compact.split(':').collect();
        let numbers = parts
            .iter()
            .map(|p| {
                if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                    return Err(TimecardError::Duration(format!("'{s}' is not a duration")));
                }
                p.parse::<u32>()
                    .map_err(|e| TimecardError::Duration(format!("'{s}': {e}")))
            })
            .collect::<Result<Vec<u32>, TimecardError>>()?;

        match numbers.as_slice() {
            [h, m, sec] => Hms::new(*h, *m, *sec),
            [h, m] => Hms::new(*h, *m, 0),
            _ => Err(TimecardError::Duration(format!(
                "'{s}' must have two or three ':'-separated parts"
            ))),
        }
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl FromStr for Hms {
    type Err = TimecardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hms::parse(s)
    }
}

impl TryFrom<String> for Hms {
    type Error = TimecardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Hms::parse(&s)
    }
}

impl From<Hms> for String {
    fn from(h: Hms) -> String {
        h.to_string()
    }
}

/// One reconstructed timesheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub description: String,
    pub duration: Hms,
    pub member: String,
    pub project: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Index of the anchor line in the flattened line sequence.
    pub line_index: usize,
}

/// An anchor with a member in range but no date in any search window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardedCandidate {
    pub line_index: usize,
    pub line: String,
    pub duration: Hms,
    pub member: String,
}

/// A duration-bearing line that could not anchor an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedAnchor {
    pub line_index: usize,
    pub line: String,
    /// `None` when the matched text was not a valid duration (minutes or seconds above 59).
    pub duration: Option<Hms>,
}

/// Outcome of one reconstruction pass over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub entries: Vec<TimeEntry>,
    pub discarded: Vec<DiscardedCandidate>,
    pub unmatched: Vec<UnmatchedAnchor>,
}

impl Reconstruction {
    pub fn emitted_seconds(&self) -> u64 {
        self.entries.iter().map(|e| e.duration.total_seconds()).sum()
    }

    pub fn discarded_seconds(&self) -> u64 {
        self.discarded.iter().map(|d| d.duration.total_seconds()).sum()
    }

    pub fn unmatched_seconds(&self) -> u64 {
        self.unmatched
            .iter()
            .filter_map(|u| u.duration)
            .map(|d| d.total_seconds())
            .sum()
    }

    /// Number of lines that were considered anchors, whatever their outcome.
    pub fn anchor_count(&self) -> usize {
        self.entries.len() + self.discarded.len() + self.unmatched.len()
    }
}
