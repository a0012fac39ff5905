//! Error types for jsonwash
//!
//! This module defines the error hierarchy for the entire pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for jsonwash
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown cleaner function: {name}")]
    UnknownCleaner { name: String },

    #[error("Cleaner '{function}' failed: {message}")]
    Cleaner { function: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error("Schema inference failed: {message}")]
    SchemaInference { message: String },

    #[error("Schema merge failed for field '{field}': {message}")]
    SchemaMerge { field: String, message: String },

    // ============================================================================
    // File Processing Errors
    // ============================================================================
    #[error("Failed to transform '{path}': {message}")]
    FileTransform { path: String, message: String },

    #[error("Worker panicked while processing '{path}': {message}")]
    WorkerPanic { path: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown-cleaner error
    pub fn unknown_cleaner(name: impl Into<String>) -> Self {
        Self::UnknownCleaner { name: name.into() }
    }

    /// Create a cleaner error
    pub fn cleaner(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Cleaner {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Create a schema inference error
    pub fn inference(message: impl Into<String>) -> Self {
        Self::SchemaInference {
            message: message.into(),
        }
    }

    /// Create a schema merge error
    pub fn merge(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaMerge {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a file transform error
    pub fn transform(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileTransform {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error aborts the whole run rather than a single file.
    ///
    /// Configuration-class errors are fatal even when they only manifest
    /// against real data, like a cleaner meeting a shape its parameters
    /// cannot describe.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::UnknownCleaner { .. }
                | Error::Cleaner { .. }
                | Error::YamlParse(_)
        )
    }
}

/// Result type alias for jsonwash
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::unknown_cleaner("scrub_widgets");
        assert_eq!(err.to_string(), "Unknown cleaner function: scrub_widgets");

        let err = Error::merge("locations", "REPEATED vs NULLABLE");
        assert_eq!(
            err.to_string(),
            "Schema merge failed for field 'locations': REPEATED vs NULLABLE"
        );
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::config("bad input folder").is_fatal());
        assert!(Error::unknown_cleaner("nope").is_fatal());
        assert!(Error::cleaner("nested_array_to_object", "not a sequence").is_fatal());

        assert!(!Error::inference("array of arrays").is_fatal());
        assert!(!Error::transform("a.jsonl.gz", "truncated gzip").is_fatal());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
