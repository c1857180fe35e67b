mod common;

use chrono::{Local, TimeZone};
use common::article;
use news_indexer::{is_new, mark_seen, CsvSink, ProcessedRecord, SeenSet};
use std::io::Write;

#[test]
fn test_second_occurrence_is_not_new() {
    let mut seen = SeenSet::new();
    let urls = [
        "https://example.com/a",
        "https://example.com/b",
        "https://example.com/a",
        "https://example.com/c",
        "https://example.com/b",
    ];

    let firsts: Vec<bool> = urls.iter().map(|u| seen.check_and_mark(u)).collect();

    assert_eq!(firsts, vec![true, true, false, true, false]);
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_is_new_does_not_mark() {
    let mut seen = SeenSet::new();
    let url = "https://example.com/story";

    assert!(is_new(url, &seen));
    assert!(is_new(url, &seen));

    mark_seen(url, &mut seen);
    assert!(!is_new(url, &seen));
}

#[test]
fn test_missing_output_dir_gives_empty_set() {
    let dir = tempfile::tempdir().unwrap();
    let seen = SeenSet::load_from_sink_dir(&dir.path().join("does-not-exist")).unwrap();
    assert!(seen.is_empty());
}

#[test]
fn test_load_from_earlier_sink_files() {
    let dir = tempfile::tempdir().unwrap();

    let first_run = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let second_run = Local.with_ymd_and_hms(2025, 1, 9, 3, 4, 5).unwrap();

    let mut sink = CsvSink::create(dir.path(), &first_run).unwrap();
    let mut record = ProcessedRecord::new(article("https://example.com/1", "One", "reactor"), true);
    record.mark_indexed();
    sink.append(&record).unwrap();

    let mut sink = CsvSink::create(dir.path(), &second_run).unwrap();
    let mut record = ProcessedRecord::new(article("https://example.com/2", "Two", "uranium"), true);
    record.mark_indexed();
    sink.append(&record).unwrap();

    // Unrelated files in the directory are ignored.
    std::fs::write(dir.path().join("upload.log"), "{}\n\n").unwrap();
    std::fs::write(dir.path().join("notes.csv"), "url\nhttps://example.com/ignored\n").unwrap();

    let seen = SeenSet::load_from_sink_dir(dir.path()).unwrap();

    assert_eq!(seen.len(), 2);
    assert!(!seen.is_new("https://example.com/1"));
    assert!(!seen.is_new("https://example.com/2"));
    assert!(seen.is_new("https://example.com/ignored"));
}

#[test]
fn test_truncated_rows_from_interrupted_run_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let started = Local.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();

    let mut sink = CsvSink::create(dir.path(), &started).unwrap();
    let mut record = ProcessedRecord::new(article("https://example.com/1", "One", "reactor"), true);
    record.mark_indexed();
    sink.append(&record).unwrap();
    let path = sink.path().to_path_buf();
    drop(sink);

    // A run killed mid-row leaves a partial record, possibly with a cut-off URL.
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"Two,partial summary,https://example.com/tw").unwrap();
    drop(file);

    let seen = SeenSet::load_from_sink_dir(dir.path()).unwrap();

    assert_eq!(seen.len(), 1);
    assert!(!seen.is_new("https://example.com/1"));
    assert!(seen.is_new("https://example.com/tw"));
}

#[test]
fn test_sink_file_without_url_column_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("news_results_20250101_000000.csv"),
        "title,summary\nOne,reactor\n",
    )
    .unwrap();

    let seen = SeenSet::load_from_sink_dir(dir.path()).unwrap();

    assert!(seen.is_empty());
}
