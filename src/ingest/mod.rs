//! Dataset ingestion
//!
//! File discovery under the input root and line-oriented reading of
//! newline-delimited JSON, with gzip compression handled transparently.

mod paths;
mod reader;

pub use paths::{list_import_files, output_path_for};
pub use reader::JsonlReader;

#[cfg(test)]
mod tests;
