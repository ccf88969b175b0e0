//! Tolerant trajectory line parsing
//!
//! GeoLife `.plt` lines look like
//! `39.984702,116.318417,0,492,39744.1201851852,2008-10-23,02:53:04`, but exporters
//! drop or duplicate columns. Leading coordinates are addressed from the start and the
//! trailing date/time pair from the end, so a missing middle column does not shift them.

use crate::models::{ParseOutcome, PointRecord, SkipReason};
use crate::timestamp_parser::TimestampParser;

/// Fewest non-empty fields a line needs to be considered a record
pub const DEFAULT_MIN_FIELDS: usize = 6;

/// Column that conventionally carries the altitude
const ALTITUDE_COLUMN: usize = 3;

#[derive(Debug, Clone)]
pub struct LineParser {
    min_fields: usize,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            min_fields: DEFAULT_MIN_FIELDS,
        }
    }

    pub fn with_min_fields(min_fields: usize) -> Self {
        Self { min_fields }
    }

    /// Parse one raw line for a known owner. Every input yields an outcome.
    pub fn parse_line(&self, raw_line: &str, owner_id: &str) -> ParseOutcome {
        let raw = raw_line.trim();
        if raw.is_empty() {
            return skip(SkipReason::Empty, raw);
        }

        let fields = split_fields(raw);
        if fields.len() < self.min_fields {
            return skip(
                SkipReason::InsufficientFields {
                    found: fields.len(),
                },
                raw,
            );
        }

        match extract_record(&fields, owner_id) {
            Ok(record) => ParseOutcome::Point(record),
            Err(reason) => skip(reason, raw),
        }
    }
}

/// Parse with the default field threshold
pub fn parse_line(raw_line: &str, owner_id: &str) -> ParseOutcome {
    LineParser::new().parse_line(raw_line, owner_id)
}

/// Split on commas, trim each piece and drop empty pieces
pub fn split_fields(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn skip(reason: SkipReason, raw: &str) -> ParseOutcome {
    ParseOutcome::Skip {
        reason,
        raw: raw.to_string(),
    }
}

fn extract_record(fields: &[&str], owner_id: &str) -> Result<PointRecord, SkipReason> {
    let latitude = parse_coordinate(fields, 0)?;
    let longitude = parse_coordinate(fields, 1)?;
    let altitude = parse_altitude(fields)?;

    let date_str = from_end(fields, 2).unwrap_or_default();
    let time_str = from_end(fields, 1).unwrap_or_default();
    let timestamp = TimestampParser::parse(date_str, time_str).map_err(|_| {
        SkipReason::BadTimestamp {
            value: format!("{} {}", date_str, time_str),
        }
    })?;

    Ok(PointRecord::new(
        owner_id, latitude, longitude, altitude, timestamp,
    ))
}

fn parse_coordinate(fields: &[&str], index: usize) -> Result<f64, SkipReason> {
    let value = fields.get(index).copied().unwrap_or_default();
    parse_float(value).ok_or_else(|| SkipReason::BadCoordinate {
        field: index,
        value: value.to_string(),
    })
}

/// Altitude lives in column 3; when that column is absent or unparseable the
/// third field from the end is used instead. The fallback may land on another
/// column for short lines and is left unguarded.
fn parse_altitude(fields: &[&str]) -> Result<f64, SkipReason> {
    if fields.len() > ALTITUDE_COLUMN {
        if let Some(altitude) = parse_float(fields[ALTITUDE_COLUMN]) {
            return Ok(altitude);
        }
    }

    let fallback = from_end(fields, 3).unwrap_or_default();
    parse_float(fallback).ok_or_else(|| SkipReason::BadAltitude {
        value: fallback.to_string(),
    })
}

fn from_end<'a>(fields: &[&'a str], offset: usize) -> Option<&'a str> {
    fields
        .len()
        .checked_sub(offset)
        .and_then(|index| fields.get(index))
        .copied()
}

/// Finite floats only; `nan` and `inf` spellings are rejected
fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
