//! Cleaned dataset persistence
//!
//! The dataset is one CSV file with the header
//! `user_id,latitude,longitude,altitude,timestamp` and timestamps written as
//! `YYYY-MM-DD HH:MM:SS`.

use crate::models::PointRecord;
use anyhow::{Context, Result};
use csv::{Reader, Writer};
use std::fs;
use std::path::Path;
use tracing::info;

/// Write records to `path`, replacing any existing file
pub fn write_dataset(path: &Path, records: &[PointRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    for record in records {
        wtr.serialize(record)
            .with_context(|| format!("Failed to write record to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush output file: {}", path.display()))?;

    info!(path = %path.display(), records = records.len(), "Dataset written");
    Ok(())
}

/// Read a dataset written by [`write_dataset`]
pub fn read_dataset(path: &Path) -> Result<Vec<PointRecord>> {
    let mut rdr = Reader::from_path(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: PointRecord =
            result.with_context(|| format!("Malformed row in {}", path.display()))?;
        records.push(record);
    }

    Ok(records)
}
