//! GeoLife Clean Library
//!
//! Turns a GeoLife-style directory tree of per-user `.plt` trajectory logs into one
//! cleaned, time-sorted CSV dataset. Lines are parsed tolerantly: extra or missing
//! columns, malformed numbers and several date/time layouts are handled, and every
//! rejected line is classified and counted instead of aborting the run.
//!
//! ## Architecture Overview
//!
//! - [`timestamp_parser`] - Fixed-priority parsing of the trailing date/time pair
//! - [`parser`] - Tolerant line parsing into a [`ParseOutcome`]
//! - [`models`] - Point records, skip reasons, per-file reports and run summaries
//! - [`file_discovery`] - Owner and trajectory file discovery
//! - [`collector`] - The collection run: reading, aggregation, sorting, persistence
//! - [`output`] - CSV writing and reading of the cleaned dataset
//! - [`display`] - Colored console reporting and JSON summaries
//! - [`config`] - Configuration with file and environment variable support
//! - [`logging`] - Structured logging with JSON and pretty-print formats
//!
//! ## Main Entry Points
//!
//! ```rust
//! use geolife_clean::{parse_line, ParseOutcome};
//!
//! let outcome = parse_line(
//!     "39.984702,116.318417,0,492,39744.1201851852,2008-10-23,02:53:04",
//!     "000",
//! );
//! assert!(matches!(outcome, ParseOutcome::Point(_)));
//! ```
//!
//! Whole runs go through [`DatasetCollector::collect`].

pub mod collector;
pub mod config;
pub mod display;
pub mod file_discovery;
pub mod logging;
pub mod models;
pub mod output;
pub mod parser;
pub mod timestamp_parser;

pub use collector::{CollectOptions, DatasetCollector};
pub use models::*;
pub use parser::{parse_line, LineParser};
