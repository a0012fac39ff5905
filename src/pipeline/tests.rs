//! Pipeline worker and orchestrator tests

use super::*;
use crate::config::{load_config_from_str, CompiledConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_input(dir: &Path, name: &str, lines: &[Value]) {
    let content: String = lines.iter().map(|v| format!("{v}\n")).collect();
    if let Some(parent) = dir.join(name).parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(dir.join(name), content).unwrap();
}

fn read_output_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn schema_field<'a>(schema: &'a Value, name: &str) -> &'a Value {
    schema
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == name)
        .unwrap_or_else(|| panic!("schema is missing field '{name}'"))
}

// ============================================================================
// Worker
// ============================================================================

#[test]
fn test_transform_file_filters_cleans_and_accumulates() {
    let dir = TempDir::new().unwrap();
    write_input(
        dir.path(),
        "data.jsonl.gz",
        &[
            json!({"type": "A", "v": 1}),
            json!({"type": "B", "v": 2}),
            json!({"type": "A", "v": null}),
        ],
    );

    let config = load_config_from_str(
        r"
filter_records:
  - path: type
    value: A
cleaners:
  - function: blank_string_to_null
    params:
      path: v
",
    )
    .unwrap();

    let output = dir.path().join("data.jsonl");
    let report = transform_file(&dir.path().join("data.jsonl.gz"), &output, &config).unwrap();

    assert!(!report.empty);
    assert_eq!(report.lines_written, 2);
    assert!(report.inference_errors.is_empty());

    let written = read_output_lines(&output);
    assert_eq!(written.len(), 2);
    assert_eq!(written[0]["type"], "A");
    assert_eq!(written[0]["v"], json!(1));
    // null is not a string, so blank_string_to_null leaves it untouched.
    assert_eq!(written[1]["v"], Value::Null);

    // Discarded records contribute nothing: no "B" widened anything.
    use crate::schema::{FieldMode, FieldType};
    assert_eq!(report.schema_map["type"].field_type, FieldType::String);
    assert_eq!(report.schema_map["type"].mode, FieldMode::Required);
    assert_eq!(report.schema_map["v"].field_type, FieldType::Integer);
    assert_eq!(report.schema_map["v"].mode, FieldMode::Nullable);
}

#[test]
fn test_transform_file_deletes_empty_output() {
    let dir = TempDir::new().unwrap();
    write_input(
        dir.path(),
        "data.jsonl.gz",
        &[json!({"type": "B"}), json!({"type": "C"})],
    );

    let config = load_config_from_str(
        r"
filter_records:
  - path: type
    value: A
",
    )
    .unwrap();

    let output = dir.path().join("data.jsonl");
    let report = transform_file(&dir.path().join("data.jsonl.gz"), &output, &config).unwrap();

    assert!(report.empty);
    assert_eq!(report.lines_written, 0);
    assert!(!output.exists(), "empty output artifact must be deleted");
}

#[test]
fn test_transform_file_preserves_record_order() {
    let dir = TempDir::new().unwrap();
    let records: Vec<Value> = (0..50).map(|i| json!({"i": i})).collect();
    write_input(dir.path(), "data.jsonl.gz", &records);

    let output = dir.path().join("data.jsonl");
    transform_file(
        &dir.path().join("data.jsonl.gz"),
        &output,
        &CompiledConfig::default(),
    )
    .unwrap();

    let written = read_output_lines(&output);
    for (i, record) in written.iter().enumerate() {
        assert_eq!(record["i"], json!(i));
    }
}

#[test]
fn test_transform_file_logs_inference_errors_per_record() {
    let dir = TempDir::new().unwrap();
    write_input(
        dir.path(),
        "data.jsonl.gz",
        &[
            json!({"ok": 1}),
            json!({"bad": [[1, 2]]}),
            json!({"ok": 2}),
        ],
    );

    let output = dir.path().join("data.jsonl");
    let report = transform_file(
        &dir.path().join("data.jsonl.gz"),
        &output,
        &CompiledConfig::default(),
    )
    .unwrap();

    // All three records were written; only the schema contribution of the
    // malformed one was skipped.
    assert_eq!(report.lines_written, 3);
    assert_eq!(report.inference_errors.len(), 1);
    assert!(report.inference_errors[0].contains("array of arrays"));
    assert!(report.schema_map.contains_key("ok"));
    assert!(!report.schema_map.contains_key("bad"));
}

#[test]
fn test_transform_file_propagates_malformed_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.jsonl.gz"), "{\"a\": 1}\nnot json\n").unwrap();

    let result = transform_file(
        &dir.path().join("bad.jsonl.gz"),
        &dir.path().join("bad.jsonl"),
        &CompiledConfig::default(),
    );

    assert!(result.is_err(), "malformed lines are catastrophic per file");
}

// ============================================================================
// Orchestrator
// ============================================================================

#[tokio::test]
async fn test_run_end_to_end_spec_scenario() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(
        input.path(),
        "data.jsonl.gz",
        &[
            json!({"type": "A", "v": 1}),
            json!({"type": "B", "v": 2}),
            json!({"type": "A", "v": null}),
        ],
    );

    let config = load_config_from_str(
        r"
filter_records:
  - path: type
    value: A
cleaners:
  - function: blank_string_to_null
    params:
      path: v
",
    )
    .unwrap();

    let summary = run(PipelineOptions::new(input.path(), output.path(), config)).await.unwrap();

    assert_eq!(summary.files_total, 1);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.lines_written, 2);

    let written = read_output_lines(&output.path().join("data.jsonl"));
    assert_eq!(written.len(), 2);

    let schema: Value =
        serde_json::from_str(&fs::read_to_string(summary.schema_path).unwrap()).unwrap();
    let v = schema_field(&schema, "v");
    assert_eq!(v["type"], "INTEGER");
    assert_eq!(v["mode"], "NULLABLE");
    let type_field = schema_field(&schema, "type");
    assert_eq!(type_field["type"], "STRING");
    assert_eq!(type_field["mode"], "REQUIRED");
}

#[tokio::test]
async fn test_run_merges_schemas_across_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "one.jsonl.gz", &[json!({"a": 1})]);
    write_input(input.path(), "sub/two.jsonl.gz", &[json!({"b": "x"})]);

    let summary = run(PipelineOptions::new(
        input.path(),
        output.path(),
        CompiledConfig::default(),
    ))
    .await
    .unwrap();

    assert_eq!(summary.files_total, 2);
    assert_eq!(summary.lines_written, 2);

    // The output tree mirrors the input tree.
    assert!(output.path().join("one.jsonl").exists());
    assert!(output.path().join("sub/two.jsonl").exists());

    let schema: Value =
        serde_json::from_str(&fs::read_to_string(summary.schema_path).unwrap()).unwrap();
    assert_eq!(schema_field(&schema, "a")["type"], "INTEGER");
    assert_eq!(schema_field(&schema, "b")["type"], "STRING");
}

#[tokio::test]
async fn test_run_schema_is_stable_across_worker_counts() {
    // Same inputs, different parallelism: the persisted schema must be
    // byte-identical because merging is order-independent.
    let mut rendered = Vec::new();

    for workers in [1, 4] {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_input(input.path(), "one.jsonl.gz", &[json!({"id": 1, "name": "x"})]);
        write_input(input.path(), "two.jsonl.gz", &[json!({"id": 2.5, "tags": ["t"]})]);
        write_input(input.path(), "three.jsonl.gz", &[json!({"id": 3, "extra": {"k": true}})]);

        let summary = run(
            PipelineOptions::new(input.path(), output.path(), CompiledConfig::default())
                .with_max_workers(workers),
        )
        .await
        .unwrap();

        rendered.push(fs::read_to_string(summary.schema_path).unwrap());
    }

    assert_eq!(rendered[0], rendered[1]);
}

#[tokio::test]
async fn test_run_survives_catastrophic_file() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "good.jsonl.gz", &[json!({"a": 1})]);
    fs::write(input.path().join("bad.jsonl.gz"), "not json at all\n").unwrap();

    let summary = run(PipelineOptions::new(
        input.path(),
        output.path(),
        CompiledConfig::default(),
    ))
    .await
    .unwrap();

    assert_eq!(summary.files_total, 2);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.lines_written, 1);

    // The run still produced a schema from the good file, and the failure
    // is enumerated in the error log.
    let schema: Value =
        serde_json::from_str(&fs::read_to_string(summary.schema_path).unwrap()).unwrap();
    assert_eq!(schema_field(&schema, "a")["type"], "INTEGER");

    let errors = fs::read_to_string(input.path().join("errors.txt")).unwrap();
    assert!(errors.contains("File "));
    assert!(errors.contains("bad.jsonl.gz"));
}

#[tokio::test]
async fn test_run_appends_inference_errors_to_log() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(
        input.path(),
        "data.jsonl.gz",
        &[json!({"ok": 1, "bad": [[1]]})],
    );

    let summary = run(PipelineOptions::new(
        input.path(),
        output.path(),
        CompiledConfig::default(),
    ))
    .await
    .unwrap();

    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.lines_written, 1);

    let errors = fs::read_to_string(input.path().join("errors.txt")).unwrap();
    assert!(errors.contains("data.jsonl.gz"));
    assert!(errors.contains("array of arrays"));
}

#[tokio::test]
async fn test_run_empty_dataset_still_writes_schema() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let summary = run(PipelineOptions::new(
        input.path(),
        output.path(),
        CompiledConfig::default(),
    ))
    .await
    .unwrap();

    assert_eq!(summary.files_total, 0);
    assert_eq!(summary.lines_written, 0);

    let schema: Value =
        serde_json::from_str(&fs::read_to_string(summary.schema_path).unwrap()).unwrap();
    assert_eq!(schema, json!([]));
}

#[tokio::test]
async fn test_run_fully_filtered_file_leaves_no_artifact() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "data.jsonl.gz", &[json!({"type": "B"})]);

    let config = load_config_from_str(
        r"
filter_records:
  - path: type
    value: A
",
    )
    .unwrap();

    let summary = run(PipelineOptions::new(input.path(), output.path(), config)).await.unwrap();

    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.lines_written, 0);
    assert!(!output.path().join("data.jsonl").exists());
}

#[tokio::test]
async fn test_run_aborts_on_cleaner_config_error() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(
        input.path(),
        "data.jsonl.gz",
        &[json!({"points": [[1, 2], 5]})],
    );

    let config = load_config_from_str(
        r"
cleaners:
  - function: nested_array_to_object
    params:
      path: points
      keys: [lat, lon]
",
    )
    .unwrap();

    // A cleaner meeting a shape its configuration cannot describe is a
    // configuration error and aborts the whole run.
    let result = run(PipelineOptions::new(input.path(), output.path(), config)).await;
    assert!(matches!(result, Err(crate::error::Error::Cleaner { .. })));
}

#[tokio::test]
async fn test_run_respects_chunking() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    for i in 0..5 {
        write_input(input.path(), &format!("f{i}.jsonl.gz"), &[json!({"i": i})]);
    }

    let summary = run(
        PipelineOptions::new(input.path(), output.path(), CompiledConfig::default())
            .with_chunk_size(2)
            .with_max_workers(2),
    )
    .await
    .unwrap();

    assert_eq!(summary.files_total, 5);
    assert_eq!(summary.lines_written, 5);
}
