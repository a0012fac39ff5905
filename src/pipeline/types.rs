//! Pipeline option and result types

use crate::config::CompiledConfig;
use crate::schema::SchemaMap;
use std::path::PathBuf;

/// Default number of files per chunk; bounds open file handles and in-flight
/// worker memory rather than affecting correctness
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default file suffix for input discovery
pub const DEFAULT_FILE_SUFFIX: &str = ".jsonl.gz";

/// Options for one dataset run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Root directory of the input dataset
    pub input_folder: PathBuf,

    /// Root directory for cleaned output files
    pub output_folder: PathBuf,

    /// Compiled filter/cleaner configuration
    pub config: CompiledConfig,

    /// Maximum number of concurrently processing files
    pub max_workers: usize,

    /// Keep schema fields that were never seen with a non-null value
    pub keep_nulls: bool,

    /// Suffix identifying input files
    pub file_suffix: String,

    /// Number of files per worker-pool generation
    pub chunk_size: usize,
}

impl PipelineOptions {
    /// Create options with defaults for workers, suffix, and chunking
    pub fn new(
        input_folder: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
        config: CompiledConfig,
    ) -> Self {
        Self {
            input_folder: input_folder.into(),
            output_folder: output_folder.into(),
            config,
            max_workers: num_cpus::get(),
            keep_nulls: true,
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the worker count
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Set null-field retention in the final schema
    #[must_use]
    pub fn with_keep_nulls(mut self, keep_nulls: bool) -> Self {
        self.keep_nulls = keep_nulls;
        self
    }

    /// Set the input file suffix
    #[must_use]
    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    /// Set the chunk size
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Everything a worker reports back for one file.
///
/// This is a plain value; workers share nothing and the orchestrator owns
/// all cross-file state.
#[derive(Debug)]
pub struct FileReport {
    /// The input file this report describes
    pub input_path: PathBuf,

    /// Whether every record was filtered out (the output file was deleted)
    pub empty: bool,

    /// Schema accumulated over the file's written records
    pub schema_map: SchemaMap,

    /// Per-record inference errors, logged but not fatal
    pub inference_errors: Vec<String>,

    /// Number of records written
    pub lines_written: u64,
}

/// Totals reported after a completed run
#[derive(Debug)]
pub struct RunSummary {
    /// Number of input files discovered
    pub files_total: usize,

    /// Files that failed catastrophically (I/O, malformed JSON, panics)
    pub files_failed: usize,

    /// Records written across all output files
    pub lines_written: u64,

    /// Where the final schema was persisted
    pub schema_path: PathBuf,
}
