//! End-to-end collection runs over temporary GeoLife-style trees

use geolife_clean::output::read_dataset;
use geolife_clean::{CollectOptions, DatasetCollector};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

mod common;

fn options(root: &Path, output: &Path, limit: Option<usize>) -> CollectOptions {
    CollectOptions {
        root_directory: root.to_path_buf(),
        output_destination: output.to_path_buf(),
        verbose: true,
        limit_files_per_owner: limit,
    }
}

#[test]
fn test_collect_sorts_and_writes() -> anyhow::Result<()> {
    let temp_dir = common::setup_test_dataset()?;
    let root = temp_dir.path().join("Data");
    let output = temp_dir.path().join("cleaned.csv");

    let summary = DatasetCollector::default().collect(&options(&root, &output, None))?;

    assert_eq!(summary.owners_processed, 2);
    assert_eq!(summary.files_read, 3);
    assert_eq!(summary.files_unreadable, 0);
    assert_eq!(summary.total_records, 5);
    assert_eq!(summary.lines_checked, 7);
    assert_eq!(summary.lines_skipped, 2);
    assert_eq!(summary.output_path.as_deref(), Some(output.as_path()));

    let content = fs::read_to_string(&output)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "user_id,latitude,longitude,altitude,timestamp");
    assert_eq!(lines[1], "000,39.7,116.1,490.0,2008-10-23 01:00:00");
    assert_eq!(lines.len(), 6);

    Ok(())
}

#[test]
fn test_round_trip_preserves_order() -> anyhow::Result<()> {
    let temp_dir = common::setup_test_dataset()?;
    let root = temp_dir.path().join("Data");
    let output = temp_dir.path().join("cleaned.csv");

    DatasetCollector::default().collect(&options(&root, &output, None))?;
    let records = read_dataset(&output)?;

    assert_eq!(records.len(), 5);
    for pair in records.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.user_id() <= b.user_id());
        if a.user_id() == b.user_id() {
            assert!(a.timestamp() <= b.timestamp());
        }
    }
    let owners: Vec<&str> = records.iter().map(|r| r.user_id()).collect();
    assert_eq!(owners, vec!["000", "000", "000", "010", "010"]);

    Ok(())
}

#[test]
fn test_limit_files_per_owner() -> anyhow::Result<()> {
    let temp_dir = common::setup_test_dataset()?;
    let root = temp_dir.path().join("Data");
    let output = temp_dir.path().join("limited.csv");

    let summary = DatasetCollector::default().collect(&options(&root, &output, Some(1)))?;

    assert_eq!(summary.files_read, 2);
    assert_eq!(summary.total_records, 4);
    let records = read_dataset(&output)?;
    // the .PLT file sorts second for owner 000 and is never read
    assert!(records.iter().all(|r| r.latitude() != 39.7));

    Ok(())
}

#[test]
fn test_empty_root_produces_no_output() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("Data");
    fs::create_dir_all(&root)?;
    let output = temp_dir.path().join("never.csv");

    let summary = DatasetCollector::default().collect(&options(&root, &output, None))?;

    assert_eq!(summary.total_records, 0);
    assert_eq!(summary.owners_processed, 0);
    assert!(!summary.has_output());
    assert!(!output.exists());

    Ok(())
}

#[test]
fn test_missing_root_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("does-not-exist");
    let output = temp_dir.path().join("out.csv");

    let result = DatasetCollector::default().collect(&options(&root, &output, None));

    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_header_only_file_contributes_nothing() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("Data");
    let traj = common::owner_dir(&root, "042")?;
    fs::write(traj.join("tiny.plt"), "Geolife trajectory\nWGS 84\nAltitude is in Feet\n")?;
    let output = temp_dir.path().join("out.csv");

    let summary = DatasetCollector::default().collect(&options(&root, &output, None))?;

    assert_eq!(summary.files_read, 1);
    assert_eq!(summary.files_unreadable, 0);
    assert_eq!(summary.lines_checked, 0);
    assert_eq!(summary.total_records, 0);
    assert!(!output.exists());

    Ok(())
}

#[test]
fn test_unreadable_file_does_not_abort() -> anyhow::Result<()> {
    let temp_dir = common::setup_test_dataset()?;
    let root = temp_dir.path().join("Data");
    // a directory that matches the extension cannot be read as a file
    fs::create_dir_all(root.join("000").join("Trajectory").join("broken.plt"))?;
    let output = temp_dir.path().join("out.csv");

    let summary = DatasetCollector::default().collect(&options(&root, &output, None))?;

    assert_eq!(summary.files_read, 4);
    assert_eq!(summary.files_unreadable, 1);
    assert_eq!(summary.total_records, 5);

    Ok(())
}

#[test]
fn test_output_is_overwritten() -> anyhow::Result<()> {
    let temp_dir = common::setup_test_dataset()?;
    let root = temp_dir.path().join("Data");
    let output = temp_dir.path().join("cleaned.csv");
    fs::write(&output, "old,data\n".repeat(100))?;

    DatasetCollector::default().collect(&options(&root, &output, None))?;

    let content = fs::read_to_string(&output)?;
    assert!(!content.contains("old,data"));
    assert_eq!(read_dataset(&output)?.len(), 5);

    Ok(())
}
