//! Record cleaning transforms
//!
//! A cleaner is a named, parameterized, in-place field transform. The set of
//! transforms is a closed enumeration; configuration selects them by name and
//! unknown names fail at config-load time, not at first use.
//!
//! Every transform degrades to a silent no-op when its target path is absent
//! or of the wrong shape, with one exception: `nested_array_to_object`
//! propagates an error when an inner element is not a sequence, because that
//! is a configuration mistake rather than a data-quality issue.

mod transforms;

use crate::error::{Error, Result};
use crate::record::{FieldPath, Record};
use serde::{Deserialize, Serialize};

/// Registry of cleaner names accepted in configuration
pub const CLEANER_NAMES: [&str; 7] = [
    "drop_null_members",
    "blank_string_to_null",
    "stringify_or_null",
    "nested_array_to_object",
    "drop_empty_members",
    "normalize_geo_locations",
    "normalize_related_items",
];

/// Raw cleaner entry as it appears in the YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerSpec {
    /// Name of the transform to apply
    pub function: String,

    /// Named arguments for the transform
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// A compiled, typed cleaning transform
#[derive(Debug, Clone)]
pub enum Cleaner {
    /// Remove null members from a sequence field
    DropNullMembers { path: FieldPath },

    /// Replace whitespace-only strings with null
    BlankStringToNull { path: FieldPath },

    /// Convert scalars to strings; booleans and blanks become null
    StringifyOrNull { path: FieldPath },

    /// Rewrite a sequence of positional sequences into keyed objects
    NestedArrayToObject { path: FieldPath, keys: Vec<String> },

    /// Remove empty object members from a sequence field
    DropEmptyMembers { path: FieldPath },

    /// Normalize geographic location entries (point, box, polygon)
    NormalizeGeoLocations { path: FieldPath },

    /// Normalize related-item page/year sub-fields to string-or-null
    NormalizeRelatedItems { path: FieldPath },
}

impl Cleaner {
    /// Compile a raw spec into a typed cleaner, validating the name and
    /// parameters. Called once at config-load time.
    pub fn from_spec(spec: &CleanerSpec) -> Result<Self> {
        let path = require_path(spec)?;

        match spec.function.as_str() {
            "drop_null_members" => Ok(Cleaner::DropNullMembers { path }),
            "blank_string_to_null" => Ok(Cleaner::BlankStringToNull { path }),
            "stringify_or_null" => Ok(Cleaner::StringifyOrNull { path }),
            "nested_array_to_object" => {
                let keys = require_keys(spec)?;
                Ok(Cleaner::NestedArrayToObject { path, keys })
            }
            "drop_empty_members" => Ok(Cleaner::DropEmptyMembers { path }),
            "normalize_geo_locations" => Ok(Cleaner::NormalizeGeoLocations { path }),
            "normalize_related_items" => Ok(Cleaner::NormalizeRelatedItems { path }),
            unknown => Err(Error::unknown_cleaner(unknown)),
        }
    }

    /// The configuration name of this cleaner
    pub fn name(&self) -> &'static str {
        match self {
            Cleaner::DropNullMembers { .. } => "drop_null_members",
            Cleaner::BlankStringToNull { .. } => "blank_string_to_null",
            Cleaner::StringifyOrNull { .. } => "stringify_or_null",
            Cleaner::NestedArrayToObject { .. } => "nested_array_to_object",
            Cleaner::DropEmptyMembers { .. } => "drop_empty_members",
            Cleaner::NormalizeGeoLocations { .. } => "normalize_geo_locations",
            Cleaner::NormalizeRelatedItems { .. } => "normalize_related_items",
        }
    }

    /// Apply this transform to one record in place
    pub fn apply(&self, record: &mut Record) -> Result<()> {
        match self {
            Cleaner::DropNullMembers { path } => {
                transforms::drop_null_members(record, path);
                Ok(())
            }
            Cleaner::BlankStringToNull { path } => {
                transforms::blank_string_to_null(record, path);
                Ok(())
            }
            Cleaner::StringifyOrNull { path } => {
                transforms::stringify_or_null(record, path);
                Ok(())
            }
            Cleaner::NestedArrayToObject { path, keys } => {
                transforms::nested_array_to_object(record, path, keys)
            }
            Cleaner::DropEmptyMembers { path } => {
                transforms::drop_empty_members(record, path);
                Ok(())
            }
            Cleaner::NormalizeGeoLocations { path } => {
                transforms::normalize_geo_locations(record, path);
                Ok(())
            }
            Cleaner::NormalizeRelatedItems { path } => {
                transforms::normalize_related_items(record, path);
                Ok(())
            }
        }
    }
}

/// Apply an ordered cleaner sequence to one record. Later cleaners observe
/// the mutations of earlier ones.
pub fn apply_all(record: &mut Record, cleaners: &[Cleaner]) -> Result<()> {
    for cleaner in cleaners {
        cleaner.apply(record)?;
    }
    Ok(())
}

/// Extract and validate the `path` parameter every cleaner requires
fn require_path(spec: &CleanerSpec) -> Result<FieldPath> {
    let raw = spec.params.get("path").ok_or_else(|| {
        Error::config(format!(
            "Cleaner '{}' is missing required param 'path'",
            spec.function
        ))
    })?;

    let path: FieldPath = serde_json::from_value(raw.clone()).map_err(|_| {
        Error::config(format!(
            "Cleaner '{}' param 'path' must be a string or a list of strings",
            spec.function
        ))
    })?;

    if path.is_empty() {
        return Err(Error::config(format!(
            "Cleaner '{}' param 'path' may not be empty",
            spec.function
        )));
    }

    Ok(path)
}

/// Extract and validate the `keys` parameter of `nested_array_to_object`
fn require_keys(spec: &CleanerSpec) -> Result<Vec<String>> {
    let raw = spec.params.get("keys").ok_or_else(|| {
        Error::config(format!(
            "Cleaner '{}' is missing required param 'keys'",
            spec.function
        ))
    })?;

    let keys: Vec<String> = serde_json::from_value(raw.clone()).map_err(|_| {
        Error::config(format!(
            "Cleaner '{}' param 'keys' must be a list of strings",
            spec.function
        ))
    })?;

    if keys.is_empty() {
        return Err(Error::config(format!(
            "Cleaner '{}' param 'keys' may not be empty",
            spec.function
        )));
    }

    Ok(keys)
}
