//! Dataset Collection Engine
//!
//! This module drives a full cleaning run over a GeoLife-style directory tree.
//!
//! ## Pipeline
//!
//! 1. **Discovery**: owners are the sorted subdirectories of the root that contain a
//!    trajectory directory; their files are listed in sorted order
//! 2. **Reading**: each file is read line by line with lossy UTF-8 decoding after a
//!    fixed header is discarded
//! 3. **Parsing**: every remaining line goes through the [`LineParser`]; skips are
//!    counted and sampled per file
//! 4. **Aggregation**: records from all files join one run-wide collection
//! 5. **Finalization**: the collection is stably sorted by (user, timestamp) and
//!    written as CSV, or a "no data" notice is reported
//!
//! ## Failure Containment
//!
//! Line and file failures never stop the run. A file that cannot be read is reported
//! and contributes no records. Only a missing root directory or a failure to list the
//! directory tree is returned as an error.
//!
//! ## Usage Example
//!
//! ```no_run
//! use geolife_clean::collector::{CollectOptions, DatasetCollector};
//! use std::path::PathBuf;
//!
//! # fn example() -> anyhow::Result<()> {
//! let collector = DatasetCollector::default();
//! let options = CollectOptions {
//!     root_directory: PathBuf::from("Geolife Trajectories 1.3/Data"),
//!     output_destination: PathBuf::from("geolife_trajectories_cleaned.csv"),
//!     verbose: true,
//!     limit_files_per_owner: Some(5),
//! };
//!
//! let summary = collector.collect(&options)?;
//! println!("{} points", summary.total_records);
//! # Ok(())
//! # }
//! ```

use crate::config::{CollectionConfig, DatasetConfig};
use crate::display::ReportDisplay;
use crate::file_discovery::FileDiscovery;
use crate::logging::run_span;
use crate::models::{CollectSummary, FileReport, PointRecord};
use crate::output::write_dataset;
use crate::parser::LineParser;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options for one collection run
#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub root_directory: PathBuf,
    pub output_destination: PathBuf,
    pub verbose: bool,
    /// `None` or `Some(0)` reads every file
    pub limit_files_per_owner: Option<usize>,
}

impl CollectOptions {
    /// Build options from configuration; the root must be resolved by the caller
    pub fn from_config(collection: &CollectionConfig, root_directory: PathBuf) -> Self {
        Self {
            root_directory,
            output_destination: collection.output_path.clone(),
            verbose: collection.verbose,
            limit_files_per_owner: collection.limit_files_per_owner,
        }
    }

    fn file_cap(&self) -> usize {
        match self.limit_files_per_owner {
            Some(limit) if limit > 0 => limit,
            _ => usize::MAX,
        }
    }
}

pub struct DatasetCollector {
    discovery: FileDiscovery,
    parser: LineParser,
    header_lines: usize,
    sample_limit: usize,
    display: ReportDisplay,
}

impl Default for DatasetCollector {
    fn default() -> Self {
        Self::new(&DatasetConfig::default())
    }
}

impl DatasetCollector {
    pub fn new(dataset: &DatasetConfig) -> Self {
        Self {
            discovery: FileDiscovery::new(dataset),
            parser: LineParser::with_min_fields(dataset.min_fields),
            header_lines: dataset.header_lines,
            sample_limit: dataset.sample_limit,
            display: ReportDisplay::default(),
        }
    }

    pub fn with_display(mut self, display: ReportDisplay) -> Self {
        self.display = display;
        self
    }

    /// Run a full collection and report the final summary
    pub fn collect(&self, options: &CollectOptions) -> Result<CollectSummary> {
        let span = run_span();
        let _enter = span.enter();

        let root = &options.root_directory;
        if !root.exists() {
            anyhow::bail!("GeoLife data path not found: {}", root.display());
        }

        info!(root = %root.display(), "Starting collection");

        let mut summary = CollectSummary::default();
        let mut records = self.gather(options, &mut summary)?;

        if records.is_empty() {
            warn!(root = %root.display(), "No records were collected");
        } else {
            sort_records(&mut records);
            write_dataset(&options.output_destination, &records)?;
            summary.total_records = records.len();
            summary.output_path = Some(options.output_destination.clone());
        }

        self.display.summary(&summary);
        Ok(summary)
    }

    /// Walk owners and files, returning the unsorted run-wide collection
    fn gather(
        &self,
        options: &CollectOptions,
        summary: &mut CollectSummary,
    ) -> Result<Vec<PointRecord>> {
        let owners = self.discovery.discover_owners(&options.root_directory)?;
        let mut records = Vec::new();

        for owner in &owners {
            summary.owners_processed += 1;
            debug!(owner = %owner.id, "Processing owner");
            if options.verbose {
                self.display.owner_started(&owner.id);
            }

            let files = self.discovery.trajectory_files(owner)?;
            let mut files_read = 0;
            for path in files.iter().take(options.file_cap()) {
                let mut report = self.parse_file(path, &owner.id);
                summary.absorb(&report);

                if report.is_unreadable() {
                    self.display.file_unreadable(&report);
                } else if options.verbose {
                    self.display.file_report(&report);
                }

                records.append(&mut report.records);
                files_read += 1;
            }

            if options.verbose {
                self.display.owner_finished(&owner.id, files_read);
            }
        }

        Ok(records)
    }

    /// Parse one trajectory file. Read failures are recorded in the report.
    pub fn parse_file(&self, path: &Path, owner_id: &str) -> FileReport {
        let mut report = FileReport::new(path.to_path_buf(), self.sample_limit);

        if let Err(e) = self.read_lines(path, owner_id, &mut report) {
            warn!(file = %path.display(), error = %e, "Failed to read trajectory file");
            report.fail(format!("{:#}", e));
            return report;
        }

        debug!(
            file = %path.display(),
            lines_checked = report.lines_checked,
            lines_skipped = report.lines_skipped,
            records = report.records.len(),
            "Parsed trajectory file"
        );
        report
    }

    fn read_lines(&self, path: &Path, owner_id: &str, report: &mut FileReport) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let mut reader = BufReader::new(file);

        let mut buf = Vec::new();
        let mut line_number = 0usize;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if read == 0 {
                break;
            }

            for raw in split_line_endings(&buf) {
                line_number += 1;
                if line_number <= self.header_lines {
                    continue;
                }

                let line = String::from_utf8_lossy(raw);
                report.record(self.parser.parse_line(&line, owner_id));
            }
        }

        Ok(())
    }
}

/// Split one `\n`-terminated chunk into lines, treating `\r\n`, `\n` and a lone
/// `\r` as line ends.
fn split_line_endings(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let chunk = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let chunk = chunk.strip_suffix(b"\r").unwrap_or(chunk);
    chunk.split(|&b| b == b'\r')
}

/// Stable sort by (user id, timestamp); ties keep encounter order
pub fn sort_records(records: &mut [PointRecord]) {
    records.sort_by(|a, b| {
        a.user_id()
            .cmp(b.user_id())
            .then_with(|| a.timestamp().cmp(&b.timestamp()))
    });
}
