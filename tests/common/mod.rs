#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The six header lines every GeoLife `.plt` file starts with
pub const PLT_HEADER: &str = "Geolife trajectory\n\
WGS 84\n\
Altitude is in Feet\n\
Reserved 3\n\
0,2,255,My Track,0,0,2,8421376\n\
0\n";

/// Standard seven-column trajectory line at the given time of 2008-10-23
pub fn plt_line(lat: f64, lon: f64, alt: f64, time: &str) -> String {
    format!("{},{},0,{},39744.1201851852,2008-10-23,{}", lat, lon, alt, time)
}

pub fn create_test_plt(dir: &Path, filename: &str, lines: &[String]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let file_path = dir.join(filename);
    let mut content = PLT_HEADER.to_string();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Create `root/<owner>/Trajectory` and return the trajectory path
pub fn owner_dir(root: &Path, owner: &str) -> Result<PathBuf> {
    let dir = root.join(owner).join("Trajectory");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Two owners, out of order on disk, with unsorted points and one bad line each
pub fn setup_test_dataset() -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("Data");

    let b = owner_dir(&root, "010")?;
    create_test_plt(
        &b,
        "20081024020959.plt",
        &[
            plt_line(40.0, 116.0, 100.0, "10:00:00"),
            plt_line(40.1, 116.1, 101.0, "09:00:00"),
            "garbage".to_string(),
        ],
    )?;

    let a = owner_dir(&root, "000")?;
    create_test_plt(
        &a,
        "20081023025304.plt",
        &[
            plt_line(39.9, 116.3, 492.0, "02:53:10"),
            plt_line(39.8, 116.2, 491.0, "02:53:04"),
            "39.9,116.3,0,492,39744.1,2008-10-23,2am".to_string(),
        ],
    )?;
    create_test_plt(
        &a,
        "20081023035304.PLT",
        &[plt_line(39.7, 116.1, 490.0, "01:00:00")],
    )?;

    // not an owner
    fs::create_dir_all(root.join("README"))?;

    Ok(temp_dir)
}
