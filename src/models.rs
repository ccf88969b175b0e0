//! Core Data Models
//!
//! This module defines the data structures that flow through the cleaning pipeline,
//! from a single parsed trajectory line up to the run-wide summary.
//!
//! ## Data Flow
//!
//! 1. **Parsing**: [`ParseOutcome`] - Result of feeding one raw line to the line parser
//! 2. **Records**: [`PointRecord`] - One validated position-and-time observation
//! 3. **Per file**: [`FileReport`] - Records, counters and a bounded [`SkipSamples`] buffer
//! 4. **Per run**: [`CollectSummary`] - Totals reported on the console or as JSON
//!
//! ## Skips Are Values
//!
//! A rejected line is a [`ParseOutcome::Skip`] carrying a [`SkipReason`], never an error.
//! Only traversal-level failures surface as `anyhow::Error`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Timestamp layout used when writing the cleaned dataset
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default number of skip diagnostics kept per file
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// One parsed trajectory sample. Fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    user_id: String,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    #[serde(with = "timestamp_format")]
    timestamp: NaiveDateTime,
}

impl PointRecord {
    pub fn new(
        user_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            latitude,
            longitude,
            altitude,
            timestamp,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

mod timestamp_format {
    use super::OUTPUT_TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(OUTPUT_TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, OUTPUT_TIMESTAMP_FORMAT)
            .map_err(serde::de::Error::custom)
    }
}

/// Why a line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Blank after trimming
    Empty,
    /// Fewer meaningful fields than a record needs
    InsufficientFields { found: usize },
    /// Latitude or longitude did not parse
    BadCoordinate { field: usize, value: String },
    /// Neither the altitude column nor its fallback parsed
    BadAltitude { value: String },
    /// None of the supported date/time layouts matched
    BadTimestamp { value: String },
}

impl SkipReason {
    /// Stable snake_case code used for counters and logs
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::Empty => "empty",
            SkipReason::InsufficientFields { .. } => "insufficient_fields",
            SkipReason::BadCoordinate { .. } => "bad_coordinate",
            SkipReason::BadAltitude { .. } => "bad_altitude",
            SkipReason::BadTimestamp { .. } => "bad_timestamp",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Empty => write!(f, "empty line"),
            SkipReason::InsufficientFields { found } => {
                write!(f, "insufficient fields: found {}", found)
            }
            SkipReason::BadCoordinate { field, value } => {
                write!(f, "could not convert field {} to float: '{}'", field, value)
            }
            SkipReason::BadAltitude { value } => {
                write!(f, "could not convert altitude to float: '{}'", value)
            }
            SkipReason::BadTimestamp { value } => {
                write!(f, "Unknown datetime format: '{}'", value)
            }
        }
    }
}

/// Outcome of parsing one raw line
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Point(PointRecord),
    Skip { reason: SkipReason, raw: String },
}

impl ParseOutcome {
    pub fn is_point(&self) -> bool {
        matches!(self, ParseOutcome::Point(_))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            ParseOutcome::Skip { reason, .. } => Some(reason),
            ParseOutcome::Point(_) => None,
        }
    }

    /// Diagnostic text kept in a file's sample.
    /// Blank lines are counted but never sampled.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            ParseOutcome::Point(_) => None,
            ParseOutcome::Skip { reason, raw } => match reason {
                SkipReason::Empty => None,
                SkipReason::InsufficientFields { .. } => Some(raw.clone()),
                _ => Some(format!("{}  <-- {}", raw, reason)),
            },
        }
    }
}

/// Fixed-capacity, append-only buffer of skip diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipSamples {
    capacity: usize,
    entries: Vec<String>,
}

impl SkipSamples {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns false once the buffer is full and the entry was dropped
    pub fn push(&mut self, entry: String) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Result of reading one trajectory file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub records: Vec<PointRecord>,
    /// Lines seen after the header, blank ones included
    pub lines_checked: usize,
    pub lines_skipped: usize,
    pub skips_by_reason: BTreeMap<&'static str, usize>,
    pub samples: SkipSamples,
    /// Set when the file could not be opened or read
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(path: PathBuf, sample_limit: usize) -> Self {
        Self {
            path,
            records: Vec::new(),
            lines_checked: 0,
            lines_skipped: 0,
            skips_by_reason: BTreeMap::new(),
            samples: SkipSamples::with_capacity(sample_limit),
            error: None,
        }
    }

    /// Fold one parse outcome into the report
    pub fn record(&mut self, outcome: ParseOutcome) {
        self.lines_checked += 1;
        match outcome {
            ParseOutcome::Point(record) => self.records.push(record),
            skip => {
                self.lines_skipped += 1;
                if let Some(reason) = skip.skip_reason() {
                    *self.skips_by_reason.entry(reason.code()).or_insert(0) += 1;
                }
                if let Some(text) = skip.diagnostic() {
                    self.samples.push(text);
                }
            }
        }
    }

    /// Turn the report into an unreadable-file report with no records
    pub fn fail(&mut self, error: impl fmt::Display) {
        self.records.clear();
        self.error = Some(error.to_string());
    }

    pub fn is_unreadable(&self) -> bool {
        self.error.is_some()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Run-wide totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectSummary {
    pub total_records: usize,
    pub owners_processed: usize,
    pub files_read: usize,
    pub files_unreadable: usize,
    pub lines_checked: usize,
    pub lines_skipped: usize,
    /// Only set when a dataset was written
    pub output_path: Option<PathBuf>,
}

impl CollectSummary {
    pub fn has_output(&self) -> bool {
        self.output_path.is_some()
    }

    pub fn absorb(&mut self, report: &FileReport) {
        self.files_read += 1;
        if report.is_unreadable() {
            self.files_unreadable += 1;
        }
        self.lines_checked += report.lines_checked;
        self.lines_skipped += report.lines_skipped;
    }
}
