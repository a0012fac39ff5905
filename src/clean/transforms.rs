//! The individual cleaning transforms

use crate::error::{Error, Result};
use crate::record::{FieldPath, Record, Target};
use serde_json::{Map, Value};

/// Bounding-box boundary fields normalized to string-or-null
const BOX_BOUNDS: [&str; 4] = [
    "northBoundLatitude",
    "southBoundLatitude",
    "eastBoundLongitude",
    "westBoundLongitude",
];

/// Related-item sub-fields normalized to string-or-null
const RELATED_ITEM_FIELDS: [&str; 3] = ["firstPage", "lastPage", "publicationYear"];

/// Remove members equal to null from a sequence field
pub(super) fn drop_null_members(record: &mut Record, path: &FieldPath) {
    if let Target::Found { container, key } = path.locate_mut(record) {
        if let Some(Value::Array(members)) = container.get_mut(&key) {
            members.retain(|member| !member.is_null());
        }
    }
}

/// Replace a whitespace-only string field with null
pub(super) fn blank_string_to_null(record: &mut Record, path: &FieldPath) {
    if let Target::Found { container, key } = path.locate_mut(record) {
        if let Some(value) = container.get_mut(&key) {
            if matches!(value, Value::String(s) if s.trim().is_empty()) {
                *value = Value::Null;
            }
        }
    }
}

/// Convert a scalar field to its string representation; booleans, blanks and
/// nulls become null. A sequence of objects is handled member-by-member for
/// the same leaf field name.
pub(super) fn stringify_or_null(record: &mut Record, path: &FieldPath) {
    let Target::Found { container, key } = path.locate_mut(record) else {
        return;
    };
    let Some(value) = container.get_mut(&key) else {
        return;
    };

    match value {
        Value::Array(members) if members.iter().all(Value::is_object) => {
            for member in members {
                if let Value::Object(map) = member {
                    if let Some(nested) = map.get(&key) {
                        let stringified = stringify_value(nested);
                        map.insert(key.clone(), stringified);
                    }
                }
            }
        }
        other => {
            let stringified = stringify_value(other);
            *other = stringified;
        }
    }
}

/// Rewrite a sequence of equal-length sequences into keyed objects.
///
/// An inner element that is not itself a sequence is a configuration error
/// and propagates rather than being silently swallowed.
pub(super) fn nested_array_to_object(
    record: &mut Record,
    path: &FieldPath,
    keys: &[String],
) -> Result<()> {
    let Target::Found { container, key } = path.locate_mut(record) else {
        return Ok(());
    };
    let Some(Value::Array(members)) = container.get(&key) else {
        return Ok(());
    };

    let mut rebuilt = Vec::with_capacity(members.len());
    for member in members {
        let Value::Array(inner) = member else {
            return Err(Error::cleaner(
                "nested_array_to_object",
                format!("member of '{path}' is not a sequence: {member}"),
            ));
        };

        let mut object = Map::new();
        for (name, value) in keys.iter().zip(inner) {
            object.insert(name.clone(), value.clone());
        }
        rebuilt.push(Value::Object(object));
    }

    container.insert(key, Value::Array(rebuilt));
    Ok(())
}

/// Remove members that are empty objects from a sequence field
pub(super) fn drop_empty_members(record: &mut Record, path: &FieldPath) {
    if let Target::Found { container, key } = path.locate_mut(record) {
        if let Some(Value::Array(members)) = container.get_mut(&key) {
            members.retain(|member| !matches!(member, Value::Object(map) if map.is_empty()));
        }
    }
}

/// Normalize a sequence of geographic location objects:
/// - a point sub-object becomes a well-known-text `POINT(<lon> <lat>)`
///   string when both coordinates are present, else null
/// - bounding-box boundaries become string-or-null
/// - polygon sub-fields are dropped entirely
/// - members left empty by the above are removed
pub(super) fn normalize_geo_locations(record: &mut Record, path: &FieldPath) {
    let Target::Found { container, key } = path.locate_mut(record) else {
        return;
    };
    let Some(Value::Array(members)) = container.get_mut(&key) else {
        return;
    };

    for member in members.iter_mut() {
        let Value::Object(location) = member else {
            continue;
        };

        if let Some(point) = location.get("geoLocationPoint") {
            let formatted = format_point(point).map_or(Value::Null, Value::String);
            location.insert("geoLocationPoint".to_string(), formatted);
        }

        if let Some(Value::Object(bounding_box)) = location.get_mut("geoLocationBox") {
            for bound in BOX_BOUNDS {
                if let Some(value) = bounding_box.get(bound) {
                    let normalized = string_or_null(value);
                    bounding_box.insert(bound.to_string(), normalized);
                }
            }
        }

        location.remove("geoLocationPolygon");
    }

    members.retain(|member| !matches!(member, Value::Object(map) if map.is_empty()));
}

/// Normalize page/year sub-fields of a sequence of related-item objects to
/// string-or-null, treating list values as null
pub(super) fn normalize_related_items(record: &mut Record, path: &FieldPath) {
    let Target::Found { container, key } = path.locate_mut(record) else {
        return;
    };
    let Some(Value::Array(members)) = container.get_mut(&key) else {
        return;
    };

    for member in members {
        let Value::Object(item) = member else {
            continue;
        };
        for field in RELATED_ITEM_FIELDS {
            if let Some(value) = item.get(field) {
                let normalized = string_or_null(value);
                item.insert(field.to_string(), normalized);
            }
        }
    }
}

/// Format a geo point sub-object as well-known text, longitude first
fn format_point(point: &Value) -> Option<String> {
    let map = point.as_object()?;
    let latitude = coordinate_repr(map.get("pointLatitude")?)?;
    let longitude = coordinate_repr(map.get("pointLongitude")?)?;
    Some(format!("POINT({longitude} {latitude})"))
}

/// Render a coordinate value for WKT output; null and non-scalars disqualify
/// the whole point
fn coordinate_repr(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Normalize any value to string-or-null: null, blank strings, lists and
/// objects become null; scalars become their string representation
fn string_or_null(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) if s.trim().is_empty() => Value::Null,
        Value::String(s) => Value::String(s.clone()),
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Array(_) | Value::Object(_) => Value::Null,
    }
}

/// Stringification rule for `stringify_or_null`: booleans, nulls and blank
/// strings become null, other scalars become strings, containers are
/// untouched
fn stringify_value(value: &Value) -> Value {
    match value {
        Value::Null | Value::Bool(_) => Value::Null,
        Value::String(s) if s.trim().is_empty() => Value::Null,
        Value::String(s) => Value::String(s.clone()),
        Value::Number(n) => Value::String(n.to_string()),
        other => other.clone(),
    }
}
