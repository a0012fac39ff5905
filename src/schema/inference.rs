//! Schema inference from JSON records
//!
//! Folds one record at a time into a mutable [`SchemaMap`], widening types
//! and relaxing modes as new shapes are observed. A record whose shape
//! cannot be folded (arrays of arrays, nulls inside arrays, irreconcilable
//! type conflicts) produces an error and leaves the map's field set intact;
//! callers log these per record rather than aborting the file.

use super::types::{FieldMode, FieldType, SchemaEntry, SchemaMap};
use crate::error::{Error, Result};
use crate::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Shape prefilter for RFC 3339-ish datetimes, validated with chrono below
static DATETIME_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}").expect("static datetime regex")
});

/// Shape prefilter for plain dates
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date regex"));

/// Per-file schema accumulator.
///
/// Tracks how many records have been folded so that a field first seen in a
/// later record is known to be missing from earlier ones and enters the map
/// as nullable.
#[derive(Debug, Default)]
pub struct SchemaGenerator {
    records_seen: usize,
}

impl SchemaGenerator {
    /// Create a new generator for one file
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records successfully folded so far
    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    /// Fold one record's shape into the map.
    ///
    /// All fallible work happens before the map is touched, so an error
    /// skips the record's entire contribution.
    pub fn deduce_record(&mut self, map: &mut SchemaMap, record: &Record) -> Result<()> {
        let mut incoming = SchemaMap::new();
        for (name, value) in record {
            incoming.insert(name.clone(), infer_value(value)?);
        }

        // Stage the per-field merges; a conflict aborts before commit.
        let mut staged: Vec<(String, SchemaEntry)> = Vec::with_capacity(incoming.len());
        for (name, new_entry) in incoming {
            let entry = match map.get(&name) {
                Some(existing) => merge_entry(&name, existing, &new_entry)?,
                None if self.records_seen > 0 => {
                    // Earlier records lacked this field entirely.
                    let mut entry = new_entry;
                    entry.make_nullable();
                    entry
                }
                None => new_entry,
            };
            staged.push((name, entry));
        }

        // Commit: fields absent from this record relax to nullable.
        for (name, entry) in map.iter_mut() {
            if !record.contains_key(name) {
                entry.make_nullable();
            }
        }
        for (name, entry) in staged {
            map.insert(name, entry);
        }

        self.records_seen += 1;
        Ok(())
    }
}

/// Infer the schema entry for a single JSON value
fn infer_value(value: &Value) -> Result<SchemaEntry> {
    match value {
        Value::Null => Ok(SchemaEntry::unfilled()),
        Value::Bool(_) => Ok(SchemaEntry::new(FieldType::Boolean, FieldMode::Required)),
        Value::Number(n) => {
            let field_type = if n.is_i64() || n.is_u64() {
                FieldType::Integer
            } else {
                FieldType::Float
            };
            Ok(SchemaEntry::new(field_type, FieldMode::Required))
        }
        Value::String(s) => Ok(SchemaEntry::new(classify_string(s), FieldMode::Required)),
        Value::Object(map) => {
            let mut fields = SchemaMap::new();
            for (name, nested) in map {
                fields.insert(name.clone(), infer_value(nested)?);
            }
            Ok(SchemaEntry::record(fields))
        }
        Value::Array(items) => infer_array(items),
    }
}

/// Infer the element entry of an array and mark it repeated
fn infer_array(items: &[Value]) -> Result<SchemaEntry> {
    let mut element: Option<SchemaEntry> = None;

    for item in items {
        match item {
            Value::Null => {
                return Err(Error::inference(
                    "array contains null; repeated fields may not hold nulls",
                ))
            }
            Value::Array(_) => {
                return Err(Error::inference("array of arrays is not supported"))
            }
            _ => {}
        }

        let entry = infer_value(item)?;
        element = Some(match element {
            None => entry,
            Some(previous) => merge_entry("<array element>", &previous, &entry)?,
        });
    }

    match element {
        Some(mut entry) => {
            entry.mode = FieldMode::Repeated;
            Ok(entry)
        }
        None => Ok(SchemaEntry::unfilled_repeated()),
    }
}

/// Reconcile two observations of the same field.
///
/// This is the entry-merge primitive used both while folding records within
/// one file and when combining per-file maps into the global schema; it is
/// commutative and associative so merge order never changes the outcome.
pub fn merge_entry(field: &str, old: &SchemaEntry, new: &SchemaEntry) -> Result<SchemaEntry> {
    // An unfilled side contributes only its mode evidence (an observed null
    // or an observed empty array); the filled side supplies the type.
    if !old.filled {
        return absorb_unfilled(field, old, new);
    }
    if !new.filled {
        return absorb_unfilled(field, new, old);
    }

    let mode = merge_modes(field, old.mode, new.mode)?;

    if old.field_type == FieldType::Record && new.field_type == FieldType::Record {
        let fields = merge_nested_fields(&old.fields, &new.fields)?;
        return Ok(SchemaEntry {
            field_type: FieldType::Record,
            mode,
            filled: true,
            fields,
        });
    }

    let field_type = old.field_type.widen(new.field_type).ok_or_else(|| {
        Error::merge(
            field,
            format!("cannot merge {} with {}", old.field_type, new.field_type),
        )
    })?;

    Ok(SchemaEntry {
        field_type,
        mode,
        filled: true,
        fields: SchemaMap::new(),
    })
}

/// Fold an unfilled observation into a (possibly filled) one
fn absorb_unfilled(field: &str, unfilled: &SchemaEntry, other: &SchemaEntry) -> Result<SchemaEntry> {
    let mut merged = other.clone();

    match unfilled.mode {
        // An observed null relaxes a required field; arrays swallow nulls as
        // absence, so repeated fields are unaffected.
        FieldMode::Nullable => merged.make_nullable(),
        // An observed empty array is only compatible with an array field.
        FieldMode::Repeated => {
            if other.filled && other.mode != FieldMode::Repeated {
                return Err(Error::merge(
                    field,
                    format!("cannot merge REPEATED with {}", other.mode),
                ));
            }
            merged.mode = FieldMode::Repeated;
        }
        FieldMode::Required => {}
    }

    Ok(merged)
}

/// Reconcile two repetition modes
fn merge_modes(field: &str, old: FieldMode, new: FieldMode) -> Result<FieldMode> {
    use FieldMode::{Nullable, Repeated, Required};

    match (old, new) {
        (a, b) if a == b => Ok(a),
        (Required, Nullable) | (Nullable, Required) => Ok(Nullable),
        (Repeated, other) | (other, Repeated) => Err(Error::merge(
            field,
            format!("cannot merge REPEATED with {other}"),
        )),
        _ => unreachable!("mode pairs are covered above"),
    }
}

/// Merge the nested field maps of two record entries. Fields present on only
/// one side were missing from the other side's records and relax to nullable.
fn merge_nested_fields(old: &SchemaMap, new: &SchemaMap) -> Result<SchemaMap> {
    let mut merged = SchemaMap::new();

    for (name, old_entry) in old {
        match new.get(name) {
            Some(new_entry) => {
                merged.insert(name.clone(), merge_entry(name, old_entry, new_entry)?);
            }
            None => {
                let mut entry = old_entry.clone();
                entry.make_nullable();
                merged.insert(name.clone(), entry);
            }
        }
    }

    for (name, new_entry) in new {
        if !old.contains_key(name) {
            let mut entry = new_entry.clone();
            entry.make_nullable();
            merged.insert(name.clone(), entry);
        }
    }

    Ok(merged)
}

/// Classify a string value as TIMESTAMP, DATE, or plain STRING
fn classify_string(s: &str) -> FieldType {
    if DATETIME_SHAPE.is_match(s) && parses_as_datetime(s) {
        return FieldType::Timestamp;
    }
    if DATE_SHAPE.is_match(s) && chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
        return FieldType::Date;
    }
    FieldType::String
}

/// Validate a datetime-shaped string with chrono
fn parses_as_datetime(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
}
