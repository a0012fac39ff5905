//! Dataset orchestration
//!
//! Discovers input files, partitions them into bounded chunks, runs a pool
//! of per-file workers per chunk, and folds the results into the global
//! schema as they complete. All mutable cross-file state — the global
//! schema map, the shared error log, the progress counters — lives in this
//! module's single drain loop, so merges are serialized by construction.

use super::types::{FileReport, PipelineOptions, RunSummary};
use super::worker::transform_file;
use crate::error::{Error, Result};
use crate::ingest::{list_import_files, output_path_for};
use crate::schema::{flatten_schema_map, merge_schema_maps, sort_schema, to_pretty_json, SchemaMap};
use futures::stream::{FuturesUnordered, StreamExt};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Run the whole transform-and-schema-merge pipeline.
///
/// A per-file catastrophic failure is reported and counted but does not
/// abort the run; a completed run always persists `schema.json` and an
/// `errors.txt` enumerating what was skipped.
pub async fn run(options: PipelineOptions) -> Result<RunSummary> {
    let started = Instant::now();

    let files = list_import_files(&options.input_folder, &options.file_suffix)?;
    let total_files = files.len();
    let error_log = options.input_folder.join("errors.txt");

    info!(
        input = %options.input_folder.display(),
        output = %options.output_folder.display(),
        total_files,
        workers = options.max_workers,
        "Starting dataset run"
    );

    let config = Arc::new(options.config.clone());
    let mut global_map = SchemaMap::new();
    let mut completed: usize = 0;
    let mut failed: usize = 0;
    let mut lines_written: u64 = 0;

    for chunk in files.chunks(options.chunk_size.max(1)) {
        // One worker-pool generation per chunk; the pool is fully drained
        // before the next chunk starts.
        let semaphore = Arc::new(Semaphore::new(options.max_workers.max(1)));
        let mut in_flight = FuturesUnordered::new();

        for input in chunk {
            let input = input.clone();
            let output = output_path_for(
                &input,
                &options.input_folder,
                &options.output_folder,
                &options.file_suffix,
            )?;
            let config = Arc::clone(&config);
            let semaphore = Arc::clone(&semaphore);

            in_flight.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let worker_input = input.clone();
                let result = match tokio::task::spawn_blocking(move || {
                    transform_file(&worker_input, &output, &config)
                })
                .await
                {
                    Ok(result) => result,
                    Err(join_error) => Err(Error::WorkerPanic {
                        path: input.display().to_string(),
                        message: join_error.to_string(),
                    }),
                };
                (input, result)
            }));
        }

        // Drain results in completion order, not submission order. This
        // loop is the only writer of the global map and the error log.
        while let Some(joined) = in_flight.next().await {
            completed += 1;

            let (input, result) = match joined {
                Ok(pair) => pair,
                Err(join_error) => {
                    failed += 1;
                    error!("Dispatch task failed: {join_error}");
                    log_progress(completed, total_files, lines_written);
                    continue;
                }
            };

            match result {
                Ok(report) => {
                    if !report.empty {
                        lines_written += report.lines_written;
                        record_inference_errors(&error_log, &report)?;
                        match merge_schema_maps(&global_map, &report.schema_map) {
                            Ok(merged) => global_map = merged,
                            Err(e) => error!(
                                file = %report.input_path.display(),
                                "Schema merge failed ({e}); keeping previous schema"
                            ),
                        }
                    }
                }
                Err(e) => {
                    // A configuration-class failure (e.g. a cleaner given a
                    // shape its parameters cannot describe) aborts the run;
                    // per-file catastrophes are reported and skipped.
                    if e.is_fatal() {
                        error!("Aborting run: {e}");
                        return Err(e);
                    }
                    failed += 1;
                    let message = format!("File {}: {e}", input.display());
                    error!("{message}");
                    append_error_line(&error_log, &message)?;
                }
            }

            log_progress(completed, total_files, lines_written);
        }
    }

    let schema_path = persist_schema(&global_map, &options)?;

    info!(
        files = total_files,
        failed,
        lines = lines_written,
        elapsed = ?started.elapsed(),
        schema = %schema_path.display(),
        "Dataset run complete"
    );

    Ok(RunSummary {
        files_total: total_files,
        files_failed: failed,
        lines_written,
        schema_path,
    })
}

/// Flatten, canonically sort, and persist the final schema beside the input
/// dataset
fn persist_schema(global_map: &SchemaMap, options: &PipelineOptions) -> Result<PathBuf> {
    let mut fields = flatten_schema_map(global_map, options.keep_nulls);
    sort_schema(&mut fields);

    let schema_path = options.input_folder.join("schema.json");
    std::fs::write(&schema_path, to_pretty_json(&fields)?)?;
    Ok(schema_path)
}

/// Append a file's inference errors to the shared error log
fn record_inference_errors(error_log: &Path, report: &FileReport) -> Result<()> {
    if report.inference_errors.is_empty() {
        return Ok(());
    }

    let message = format!(
        "File {}: {}",
        report.input_path.display(),
        report.inference_errors.join("; ")
    );
    warn!("{message}");
    append_error_line(error_log, &message)
}

/// Append one line to the shared error log. Only the orchestrator's drain
/// loop calls this; workers return error text as data.
fn append_error_line(error_log: &Path, message: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(error_log)?;
    writeln!(file, "{message}")?;
    Ok(())
}

fn log_progress(completed: usize, total_files: usize, lines_written: u64) {
    let percent = if total_files == 0 {
        100.0
    } else {
        completed as f64 / total_files as f64 * 100.0
    };
    info!("Progress: {completed} / {total_files}, {percent:.2}%. {lines_written} lines written.");
}
