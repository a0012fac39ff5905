// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # jsonwash
//!
//! A minimal, Rust-native pipeline for washing JSONL datasets: filter and
//! clean every record of a directory tree of (optionally gzipped) JSONL
//! files, write the survivors back out, and infer one merged BigQuery-style
//! schema for the whole dataset.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jsonwash::config::load_config;
//! use jsonwash::pipeline::{self, PipelineOptions};
//!
//! #[tokio::main]
//! async fn main() -> jsonwash::Result<()> {
//!     let config = load_config("wash.yaml")?;
//!     let options = PipelineOptions::new("data/in", "data/out", config);
//!     let summary = pipeline::run(options).await?;
//!     println!("{} lines written", summary.lines_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Orchestrator                           │
//! │  discover files → chunk → dispatch workers → drain results      │
//! │  merge per-file schemas → flatten/sort → persist schema.json    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │  Ingest  │  Filter   │    Clean      │  Schema   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ walkdir  │ equals    │ drop nulls    │ infer     │ JSONL       │
//! │ gzip     │ any-of    │ stringify     │ merge     │ schema.json │
//! │ JSONL    │ invert    │ geo/related   │ flatten   │ errors.txt  │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Add docs before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Record model and field path resolution
pub mod record;

/// Record filtering
pub mod filter;

/// Record cleaning transforms
pub mod clean;

/// Schema inference, merging, and flattening
pub mod schema;

/// File discovery and JSONL ingestion
pub mod ingest;

/// Configuration loading and validation
pub mod config;

/// The parallel transform-and-schema-merge pipeline
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use record::Record;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, CompiledConfig, WashConfig};
pub use pipeline::{PipelineOptions, RunSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
