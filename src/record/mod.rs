//! Record model and field path resolution
//!
//! A record is one newline-delimited JSON object, the unit of filtering and
//! cleaning. Field paths locate (possibly nested) fields inside a record.

mod path;

pub use path::{FieldPath, Target};

/// One parsed JSONL record: an ordered mapping of field names to JSON values.
pub type Record = serde_json::Map<String, serde_json::Value>;
