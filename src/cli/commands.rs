//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Wash a JSONL dataset and generate its BigQuery-style schema
#[derive(Parser, Debug)]
#[command(name = "jsonwash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The input folder path
    pub input_folder: PathBuf,

    /// The output folder path
    pub output_folder: PathBuf,

    /// Path to the YAML config file for the data source
    pub config_path: PathBuf,

    /// Maximum number of workers (default: number of CPUs)
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Keep schema elements that are never populated
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub schema_keep_nulls: bool,

    /// File suffix of the target files for processing
    #[arg(long, default_value = ".jsonl.gz")]
    pub file_suffix: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
