//! Integration tests for the CSV quality report.

#![allow(clippy::unwrap_used)]

use pairset_adapters::CsvReportStore;
use pairset_core::ports::ReportStore;
use pairset_core::{NoProgress, Quality, QualityScorer};
use pairset_test_support::{MockImageSource, ScanBuilder};
use tempfile::TempDir;

fn scored_report() -> pairset_core::QualityReport {
    let source = MockImageSource::new(vec![
        ScanBuilder::document_page("front_001.png"),
        ScanBuilder::blurred_page("front_002.png"),
        ScanBuilder::faded_page("front_003.png"),
        ScanBuilder::document_page_sized("front_004.png", 96, 48),
    ]);
    QualityScorer::default()
        .score_source(&source, &NoProgress)
        .unwrap()
        .report
}

#[test]
fn test_save_then_load_preserves_records() {
    let dir = TempDir::new().unwrap();
    let store = CsvReportStore::new(dir.path().join("quality_report.csv"));
    let report = scored_report();

    store.save(&report).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded, report);
    assert_eq!(loaded.get("front_002.png").unwrap().quality(), Quality::Poor);
    assert_eq!(loaded.get("front_004.png").unwrap().width(), 96);
}

#[test]
fn test_reload_and_rewrite_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    CsvReportStore::new(&first).save(&scored_report()).unwrap();
    let loaded = CsvReportStore::new(&first).load().unwrap();
    CsvReportStore::new(&second).save(&loaded).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports").join("nested").join("q.csv");

    CsvReportStore::new(&path).save(&scored_report()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("filename,width,height,blur_score,brightness,contrast,quality\n"));
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn test_load_missing_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let err = CsvReportStore::new(dir.path().join("absent.csv"))
        .load()
        .unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn test_load_rejects_unknown_label() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "filename,blur_score,brightness,quality\na.png,1,2,maybe\n").unwrap();

    let err = CsvReportStore::new(&path).load().unwrap_err();
    assert!(format!("{err:#}").contains("maybe"));
}
