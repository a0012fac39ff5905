//! Flattening the accumulated schema into its persisted form
//!
//! The accumulated [`SchemaMap`] is an internal working structure; what gets
//! persisted is a tabular, BigQuery-style list of field descriptors with a
//! fixed key order (name, type, mode, description, fields), sorted by name
//! at every nesting level. The canonical form is stable: the same input set
//! produces a byte-identical `schema.json` regardless of processing order.

use super::types::{FieldMode, FieldType, SchemaEntry, SchemaMap};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One field descriptor of the final schema.
///
/// Serialization key order follows the declaration order here, which is the
/// canonical key order of the persisted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Field name
    pub name: String,

    /// Field type tag
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Repetition mode
    pub mode: FieldMode,

    /// Optional description (never inferred, kept for schema round-trips)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Nested fields for RECORD entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<SchemaField>>,
}

/// Flatten an accumulated map into field descriptors.
///
/// Unfilled fields (never seen with a non-null value) are kept as nullable
/// strings when `keep_nulls` is set and dropped otherwise. A record whose
/// nested fields all drop out is itself dropped, since a RECORD with no
/// fields is not a valid schema entry.
pub fn flatten_schema_map(map: &SchemaMap, keep_nulls: bool) -> Vec<SchemaField> {
    let mut flattened = Vec::with_capacity(map.len());

    for (name, entry) in map {
        if let Some(field) = flatten_entry(name, entry, keep_nulls) {
            flattened.push(field);
        }
    }

    flattened
}

fn flatten_entry(name: &str, entry: &SchemaEntry, keep_nulls: bool) -> Option<SchemaField> {
    if !entry.filled && !keep_nulls {
        return None;
    }

    let fields = if entry.field_type == FieldType::Record {
        let nested = flatten_schema_map(&entry.fields, keep_nulls);
        if nested.is_empty() {
            return None;
        }
        Some(nested)
    } else {
        None
    };

    Some(SchemaField {
        name: name.to_string(),
        field_type: entry.field_type,
        mode: entry.mode,
        description: None,
        fields,
    })
}

/// Canonically sort a flattened schema: fields alphabetically by name at
/// every nesting level. Idempotent — sorting an already-sorted schema is a
/// no-op.
pub fn sort_schema(fields: &mut [SchemaField]) {
    fields.sort_by(|a, b| a.name.cmp(&b.name));
    for field in fields {
        if let Some(nested) = field.fields.as_mut() {
            sort_schema(nested);
        }
    }
}

/// Render the final schema as pretty-printed JSON with 2-space indentation
pub fn to_pretty_json(fields: &[SchemaField]) -> Result<String> {
    Ok(serde_json::to_string_pretty(fields)?)
}
