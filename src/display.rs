//! Console Reporting
//!
//! Human-friendly colored output for a collection run:
//!
//! - **Per owner**: a header when processing starts and the number of files read
//! - **Per file**: lines checked, lines skipped and the bounded sample of bad lines
//! - **Unreadable files**: a notice naming the file and the error
//! - **Final summary**: totals and the output path, a "no data" notice, or JSON
//!
//! Per-owner and per-file output is only produced in verbose mode; the final
//! summary is always printed.

use crate::models::{CollectSummary, FileReport};
use colored::Colorize;

pub struct ReportDisplay {
    json_output: bool,
}

impl Default for ReportDisplay {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ReportDisplay {
    pub fn new(json_output: bool) -> Self {
        Self { json_output }
    }

    pub fn owner_started(&self, owner_id: &str) {
        if self.json_output {
            return;
        }
        println!("\n{} {}", "Processing user:".bright_cyan(), owner_id.bold());
    }

    pub fn owner_finished(&self, owner_id: &str, files_read: usize) {
        if self.json_output {
            return;
        }
        println!("  files read for user {}: {}", owner_id, files_read);
    }

    /// Per-file statistics; silent for files without any lines after the header
    pub fn file_report(&self, report: &FileReport) {
        if self.json_output || report.lines_checked == 0 {
            return;
        }

        let skipped = if report.lines_skipped > 0 {
            report.lines_skipped.to_string().yellow()
        } else {
            report.lines_skipped.to_string().green()
        };
        println!(
            "File: {} - total lines checked: {}, skipped: {}",
            report.file_name(),
            report.lines_checked,
            skipped
        );

        if !report.samples.is_empty() {
            println!(
                "Sample bad lines (up to {}):",
                report.samples.capacity()
            );
            for line in report.samples.iter() {
                println!("   {}", line.dimmed());
            }
        }
    }

    /// Always shown, regardless of verbosity
    pub fn file_unreadable(&self, report: &FileReport) {
        let error = report.error.as_deref().unwrap_or("unknown error");
        eprintln!(
            "{} Error processing file {}: {}",
            "⚠️".yellow(),
            report.path.display(),
            error
        );
    }

    pub fn summary(&self, summary: &CollectSummary) {
        if self.json_output {
            match serde_json::to_string_pretty(summary) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Error serializing summary to JSON: {}", e),
            }
            return;
        }

        match &summary.output_path {
            Some(path) => {
                println!(
                    "\n{} Total data points collected: {} (from {} users)",
                    "✅".green(),
                    summary.total_records.to_string().bold(),
                    summary.owners_processed
                );
                println!(
                    "{} Saved cleaned GeoLife trajectories to: {}",
                    "✅".green(),
                    path.display()
                );
            }
            None => {
                println!(
                    "\n{} No data was processed. Please check the base path and files for content/format issues.",
                    "⚠️".yellow()
                );
            }
        }

        if summary.files_unreadable > 0 {
            println!(
                "   {} of {} files could not be read",
                summary.files_unreadable.to_string().red(),
                summary.files_read
            );
        }
    }
}
