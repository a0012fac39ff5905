//! Schema types
//!
//! BigQuery-style structural schema model: a field has a type tag, a
//! repetition mode, and (for records) nested fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accumulated schema for one level of nesting, keyed by field name.
///
/// The BTreeMap keeps fields in name order regardless of insertion order,
/// which is what makes the merged schema independent of file-processing
/// order.
pub type SchemaMap = BTreeMap<String, SchemaEntry>;

/// BigQuery-style field type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Date,
    Record,
}

impl FieldType {
    /// Widen two observed types into the type covering both, or `None` when
    /// the combination is incompatible.
    ///
    /// The rules are commutative and associative: `INTEGER` widens to
    /// `FLOAT`, and the date-like string types widen to `STRING`.
    pub fn widen(self, other: FieldType) -> Option<FieldType> {
        use FieldType::{Date, Float, Integer, String, Timestamp};

        match (self, other) {
            (a, b) if a == b => Some(a),
            (Integer, Float) | (Float, Integer) => Some(Float),
            (Timestamp | Date, String) | (String, Timestamp | Date) | (Timestamp, Date)
            | (Date, Timestamp) => Some(String),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            FieldType::String => "STRING",
            FieldType::Integer => "INTEGER",
            FieldType::Float => "FLOAT",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Timestamp => "TIMESTAMP",
            FieldType::Date => "DATE",
            FieldType::Record => "RECORD",
        };
        write!(f, "{tag}")
    }
}

/// BigQuery-style repetition mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldMode {
    /// Non-null in every record observed so far
    Required,
    /// Null or missing in at least one record
    Nullable,
    /// An array field
    Repeated,
}

impl std::fmt::Display for FieldMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            FieldMode::Required => "REQUIRED",
            FieldMode::Nullable => "NULLABLE",
            FieldMode::Repeated => "REPEATED",
        };
        write!(f, "{tag}")
    }
}

/// One accumulated schema entry.
///
/// `filled` tracks whether any non-null value has been observed; an
/// unfilled entry carries a placeholder `STRING` type and only survives
/// into the final schema when null retention is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Observed (widened) field type
    pub field_type: FieldType,

    /// Observed repetition mode
    pub mode: FieldMode,

    /// Whether a non-null value has ever been seen for this field
    pub filled: bool,

    /// Nested fields, populated for `RECORD` entries
    #[serde(default, skip_serializing_if = "SchemaMap::is_empty")]
    pub fields: SchemaMap,
}

impl SchemaEntry {
    /// Create a filled scalar entry
    pub fn new(field_type: FieldType, mode: FieldMode) -> Self {
        Self {
            field_type,
            mode,
            filled: true,
            fields: SchemaMap::new(),
        }
    }

    /// Create the entry for an observed null: type unknown, nullable
    pub fn unfilled() -> Self {
        Self {
            field_type: FieldType::String,
            mode: FieldMode::Nullable,
            filled: false,
            fields: SchemaMap::new(),
        }
    }

    /// Create the entry for an observed empty array: element type unknown
    pub fn unfilled_repeated() -> Self {
        Self {
            field_type: FieldType::String,
            mode: FieldMode::Repeated,
            filled: false,
            fields: SchemaMap::new(),
        }
    }

    /// Create a record entry with nested fields
    pub fn record(fields: SchemaMap) -> Self {
        Self {
            field_type: FieldType::Record,
            mode: FieldMode::Required,
            filled: true,
            fields,
        }
    }

    /// Downgrade a required entry to nullable; repeated entries are left
    /// alone since a missing array reads back as empty
    pub fn make_nullable(&mut self) {
        if self.mode == FieldMode::Required {
            self.mode = FieldMode::Nullable;
        }
    }
}
