//! CLI runner - validates arguments and executes the pipeline

use crate::cli::commands::Cli;
use crate::config::load_config;
use crate::error::{Error, Result};
use crate::pipeline::{self, PipelineOptions};
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Validate the invocation and run the dataset pipeline.
    ///
    /// Bad paths and a missing or non-YAML config are rejected here, before
    /// any file is processed.
    pub async fn run(&self) -> Result<()> {
        let input_folder = check_directory(&self.cli.input_folder)?;
        let output_folder = check_directory(&self.cli.output_folder)?;
        let config_path = check_yaml_file(&self.cli.config_path)?;

        let config = load_config(&config_path)?;

        let mut options = PipelineOptions::new(input_folder, output_folder, config)
            .with_keep_nulls(self.cli.schema_keep_nulls)
            .with_file_suffix(&self.cli.file_suffix);
        if let Some(max_workers) = self.cli.max_workers {
            options = options.with_max_workers(max_workers);
        }

        let summary = pipeline::run(options).await?;

        info!(
            files = summary.files_total,
            failed = summary.files_failed,
            lines = summary.lines_written,
            schema = %summary.schema_path.display(),
            "Run finished"
        );

        if summary.files_failed > 0 {
            return Err(Error::Other(format!(
                "{} of {} files failed; see errors.txt",
                summary.files_failed, summary.files_total
            )));
        }

        Ok(())
    }
}

/// Check that the provided path is an existing directory
fn check_directory(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(Error::config(format!(
            "The directory '{}' does not exist",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Check that the provided path is an existing YAML file
fn check_yaml_file(path: &Path) -> Result<PathBuf> {
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    if !path.is_file() || !is_yaml {
        return Err(Error::config(format!(
            "The config path '{}' does not exist or is not a YAML file",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_directory() {
        let dir = TempDir::new().unwrap();
        assert!(check_directory(dir.path()).is_ok());
        assert!(check_directory(&dir.path().join("missing")).is_err());

        let file = dir.path().join("file.txt");
        fs::write(&file, "").unwrap();
        assert!(check_directory(&file).is_err());
    }

    #[test]
    fn test_check_yaml_file() {
        let dir = TempDir::new().unwrap();

        let yaml = dir.path().join("config.yaml");
        fs::write(&yaml, "{}").unwrap();
        assert!(check_yaml_file(&yaml).is_ok());

        let yml = dir.path().join("config.yml");
        fs::write(&yml, "{}").unwrap();
        assert!(check_yaml_file(&yml).is_ok());

        let json = dir.path().join("config.json");
        fs::write(&json, "{}").unwrap();
        assert!(check_yaml_file(&json).is_err());

        assert!(check_yaml_file(&dir.path().join("missing.yaml")).is_err());
    }
}
