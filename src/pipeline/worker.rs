//! Per-file transform worker
//!
//! The unit of parallel work: read one input file, filter and clean each
//! record in input order, write survivors, and accumulate the file's schema.
//! Workers never touch shared state; everything they learn goes back to the
//! orchestrator inside a [`FileReport`].

use super::types::FileReport;
use crate::clean;
use crate::config::CompiledConfig;
use crate::error::Result;
use crate::filter;
use crate::ingest::JsonlReader;
use crate::schema::{SchemaGenerator, SchemaMap};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Transform one input file into its cleaned output file.
///
/// Per record, strictly in order: read, filter (discarded records are
/// neither cleaned, written, nor folded into the schema), clean, write,
/// accumulate schema. If nothing was written the empty output file is
/// deleted rather than left behind.
pub fn transform_file(
    input: &Path,
    output: &Path,
    config: &CompiledConfig,
) -> Result<FileReport> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let reader = JsonlReader::open(input)?;
    let mut writer = BufWriter::new(File::create(output)?);

    let mut generator = SchemaGenerator::new();
    let mut schema_map = SchemaMap::new();
    let mut inference_errors = Vec::new();
    let mut lines_written: u64 = 0;

    for record in reader {
        let mut record = record?;

        if !filter::passes(&record, &config.filters) {
            continue;
        }

        clean::apply_all(&mut record, &config.cleaners)?;

        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        lines_written += 1;

        // One record with an unfoldable shape must not abort the file.
        if let Err(e) = generator.deduce_record(&mut schema_map, &record) {
            inference_errors.push(e.to_string());
        }
    }

    writer.flush()?;
    drop(writer);

    let empty = lines_written == 0;
    if empty {
        fs::remove_file(output)?;
    }

    Ok(FileReport {
        input_path: input.to_path_buf(),
        empty,
        schema_map,
        inference_errors,
        lines_written,
    })
}
