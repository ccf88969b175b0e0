//! Performance benchmarks for trajectory line parsing and file collection
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geolife_clean::{DatasetCollector, LineParser};
use std::fs;
use tempfile::TempDir;

const HEADER: &str = "Geolife trajectory\nWGS 84\nAltitude is in Feet\nReserved 3\n0,2,255,My Track,0,0,2,8421376\n0\n";

/// Generate trajectory lines, with a malformed line every 10th entry if requested
fn generate_lines(num_lines: usize, include_errors: bool) -> Vec<String> {
    (0..num_lines)
        .map(|i| {
            if include_errors && i % 10 == 5 {
                "39.9,116.3,broken".to_string()
            } else {
                format!(
                    "{:.6},{:.6},0,{},39744.{},2008-10-23,{:02}:{:02}:{:02}",
                    39.9 + i as f64 * 1e-5,
                    116.3 + i as f64 * 1e-5,
                    400 + i % 100,
                    i,
                    (i / 3600) % 24,
                    (i / 60) % 60,
                    i % 60
                )
            }
        })
        .collect()
}

fn benchmark_parse_line(c: &mut Criterion) {
    let parser = LineParser::new();
    let mut group = c.benchmark_group("parse_line");

    let layouts = [
        ("dashed", "39.984702,116.318417,0,492,39744.1201851852,2008-10-23,02:53:04"),
        ("day_first", "39.984702,116.318417,0,492,39744.1201851852,23-10-2008,02:53:04"),
        ("no_seconds", "39.984702,116.318417,0,492,39744.1201851852,2008-10-23,02:53"),
        ("bad_timestamp", "39.984702,116.318417,0,492,39744.1201851852,10/23/2008,02:53:04"),
    ];

    for (name, line) in layouts {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| parser.parse_line(black_box(line), black_box("000")));
        });
    }

    group.finish();
}

fn benchmark_parse_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_file");
    let collector = DatasetCollector::default();
    let temp_dir = TempDir::new().unwrap();

    for size in [100, 1000, 10000].iter() {
        let path = temp_dir.path().join(format!("bench_{}.plt", size));
        let mut content = HEADER.to_string();
        content.push_str(&generate_lines(*size, true).join("\n"));
        fs::write(&path, content).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| collector.parse_file(black_box(&path), "000"));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parse_line, benchmark_parse_file);
criterion_main!(benches);
