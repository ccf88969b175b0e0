use anyhow::Result;
use chrono::{NaiveDateTime, Timelike};

/// Where the year sits in the date part of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearPosition {
    First,
    Last,
}

/// One supported `date time` layout
#[derive(Debug, Clone, Copy)]
pub struct DateTimeLayout {
    pub format: &'static str,
    separator: char,
    year: YearPosition,
}

impl DateTimeLayout {
    /// chrono's `%Y` takes 1 to 4 digits and a sign; these layouts require exactly
    /// four unsigned digits.
    fn has_full_year(&self, value: &str) -> bool {
        let date = value.split(' ').next().unwrap_or_default();
        let mut parts = date.split(self.separator);
        let year = match self.year {
            YearPosition::First => parts.next(),
            YearPosition::Last => parts.last(),
        };
        year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// Date/time layouts seen in trajectory exports, in priority order.
pub const DATETIME_LAYOUTS: [DateTimeLayout; 4] = [
    DateTimeLayout {
        format: "%Y-%m-%d %H:%M:%S",
        separator: '-',
        year: YearPosition::First,
    },
    DateTimeLayout {
        format: "%Y/%m/%d %H:%M:%S",
        separator: '/',
        year: YearPosition::First,
    },
    DateTimeLayout {
        format: "%d-%m-%Y %H:%M:%S",
        separator: '-',
        year: YearPosition::Last,
    },
    // seconds missing
    DateTimeLayout {
        format: "%Y-%m-%d %H:%M",
        separator: '-',
        year: YearPosition::First,
    },
];

/// Handles parsing the trailing date and time columns of a trajectory line
pub struct TimestampParser;

impl TimestampParser {
    /// Parse a date string and a time string into a NaiveDateTime
    /// The first layout that matches the whole joined value wins
    pub fn parse(date_str: &str, time_str: &str) -> Result<NaiveDateTime> {
        let joined = format!("{} {}", date_str, time_str);
        Self::parse_joined(&joined)
    }

    /// Parse an already joined `date time` value
    pub fn parse_joined(value: &str) -> Result<NaiveDateTime> {
        for layout in &DATETIME_LAYOUTS {
            let Ok(dt) = NaiveDateTime::parse_from_str(value, layout.format) else {
                continue;
            };
            // a leap second is stored as nanosecond >= 1e9
            if dt.nanosecond() >= 1_000_000_000 || !layout.has_full_year(value) {
                continue;
            }
            return Ok(dt);
        }

        anyhow::bail!("Unknown datetime format: '{}'", value)
    }
}
