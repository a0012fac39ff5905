//! Input file discovery and output path mapping

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively list all files under `root` whose names end with `suffix`.
///
/// The list is sorted so dispatch order is deterministic; completion order
/// still depends on the worker pool.
pub fn list_import_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            Error::Other(format!("Failed to walk '{}': {e}", root.display()))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Map an input file to its output path: the same path relative to the
/// output root, with the input suffix replaced by `.jsonl`.
pub fn output_path_for(
    input: &Path,
    input_root: &Path,
    output_root: &Path,
    suffix: &str,
) -> Result<PathBuf> {
    let relative = input.strip_prefix(input_root).map_err(|_| {
        Error::config(format!(
            "Input file '{}' is not under the input folder '{}'",
            input.display(),
            input_root.display()
        ))
    })?;

    let name = relative.to_string_lossy();
    let renamed = match name.strip_suffix(suffix) {
        Some(stem) => format!("{stem}.jsonl"),
        None => format!("{name}.jsonl"),
    };

    Ok(output_root.join(renamed))
}
