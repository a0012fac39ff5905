//! Ingestion tests

use super::*;
use flate2::write::GzEncoder;
use flate2::Compression;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn write_gzip(path: &Path, content: &str) {
    let file = fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn test_reads_plain_jsonl() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.jsonl");
    fs::write(&path, "{\"a\": 1}\n\n{\"a\": 2}\n").unwrap();

    let records: Vec<_> = JsonlReader::open(&path)
        .unwrap()
        .collect::<crate::error::Result<_>>()
        .unwrap();

    assert_eq!(records.len(), 2, "blank lines are skipped");
    assert_eq!(records[0]["a"], json!(1));
    assert_eq!(records[1]["a"], json!(2));
}

#[test]
fn test_gzip_detected_by_magic_bytes() {
    let dir = TempDir::new().unwrap();

    // Properly gzipped file.
    let gz = dir.path().join("data.jsonl.gz");
    write_gzip(&gz, "{\"a\": 1}\n{\"a\": 2}\n");

    // Mis-labeled plain file with a .gz extension.
    let fake_gz = dir.path().join("plain.jsonl.gz");
    fs::write(&fake_gz, "{\"a\": 1}\n{\"a\": 2}\n").unwrap();

    for path in [gz, fake_gz] {
        let records: Vec<_> = JsonlReader::open(&path)
            .unwrap()
            .collect::<crate::error::Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2, "failed for {}", path.display());
    }
}

#[test]
fn test_invalid_json_line_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.jsonl");
    fs::write(&path, "{\"a\": 1}\nnot json\n").unwrap();

    let results: Vec<_> = JsonlReader::open(&path).unwrap().collect();
    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_non_object_line_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scalar.jsonl");
    fs::write(&path, "[1, 2]\n").unwrap();

    let results: Vec<_> = JsonlReader::open(&path).unwrap().collect();
    let err = results[0].as_ref().unwrap_err();
    assert!(err.to_string().contains("expected a JSON object"));
}

#[test]
fn test_list_import_files_recursive_suffix_match() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("a/b")).unwrap();
    fs::write(dir.path().join("one.jsonl.gz"), "").unwrap();
    fs::write(dir.path().join("a/two.jsonl.gz"), "").unwrap();
    fs::write(dir.path().join("a/b/three.jsonl.gz"), "").unwrap();
    fs::write(dir.path().join("a/skip.jsonl"), "").unwrap();
    fs::write(dir.path().join("a/skip.txt"), "").unwrap();

    let files = list_import_files(dir.path(), ".jsonl.gz").unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(files.len(), 3);
    assert!(names.contains(&"one.jsonl.gz".to_string()));
    assert!(names.contains(&"three.jsonl.gz".to_string()));
}

#[test]
fn test_list_import_files_sorted() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.jsonl.gz"), "").unwrap();
    fs::write(dir.path().join("a.jsonl.gz"), "").unwrap();

    let files = list_import_files(dir.path(), ".jsonl.gz").unwrap();
    assert!(files[0] < files[1]);
}

#[test]
fn test_output_path_mapping() {
    let input_root = Path::new("/data/in");
    let output_root = Path::new("/data/out");
    let input = Path::new("/data/in/sub/part-001.jsonl.gz");

    let output = output_path_for(input, input_root, output_root, ".jsonl.gz").unwrap();
    assert_eq!(output, Path::new("/data/out/sub/part-001.jsonl"));
}

#[test]
fn test_output_path_outside_root_is_an_error() {
    let result = output_path_for(
        Path::new("/elsewhere/x.jsonl.gz"),
        Path::new("/data/in"),
        Path::new("/data/out"),
        ".jsonl.gz",
    );
    assert!(result.is_err());
}
