//! Merging per-file schema maps into the global schema
//!
//! Each worker returns the schema map it accumulated for one file; the
//! orchestrator folds those maps into a single global map, one merge at a
//! time. The merge is associative and commutative over the observed field
//! set, so the completion order of files never changes the final schema.

use super::inference::merge_entry;
use super::types::SchemaMap;
use crate::error::Result;

/// Merge an incoming per-file map into an already-merged global map,
/// returning the combined map.
///
/// Fields absent from the global map are inserted as-is; fields present in
/// both are reconciled entry by entry, recursing through nested records.
/// The inputs are left untouched, so a failed merge lets the caller continue
/// with the prior global map.
pub fn merge_schema_maps(old: &SchemaMap, incoming: &SchemaMap) -> Result<SchemaMap> {
    if old.is_empty() {
        return Ok(incoming.clone());
    }

    let mut merged = old.clone();
    for (field, new_entry) in incoming {
        let entry = match merged.get(field) {
            Some(existing) => merge_entry(field, existing, new_entry)?,
            None => new_entry.clone(),
        };
        merged.insert(field.clone(), entry);
    }

    Ok(merged)
}
