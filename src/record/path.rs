//! Field path resolution against nested records

use super::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered sequence of string segments identifying a field inside a record.
///
/// Deserializes from either a bare YAML string (a one-segment path) or a
/// sequence of strings (a nested path). A bare string is a single segment;
/// it is never split on dots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPath")]
pub struct FieldPath {
    segments: Vec<String>,
}

/// Raw YAML shape of a field path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPath {
    Single(String),
    Segments(Vec<String>),
}

impl From<RawPath> for FieldPath {
    fn from(raw: RawPath) -> Self {
        match raw {
            RawPath::Single(segment) => FieldPath {
                segments: vec![segment],
            },
            RawPath::Segments(segments) => FieldPath { segments },
        }
    }
}

/// Result of resolving a field path against a record.
///
/// The three cases are deliberately distinct: a missing leaf and a missing
/// intermediate are different situations from "present but null", and filter
/// and cleaner callers treat them differently.
#[derive(Debug)]
pub enum Target<'a> {
    /// The path resolved to a container and a leaf field name. For paths of
    /// more than one segment the leaf key itself may still be absent from
    /// the container; checking it is the caller's business.
    Found {
        /// The immediate parent object of the leaf field
        container: &'a mut Record,
        /// The leaf field name
        key: String,
    },

    /// A one-segment path whose key is not present in the record
    MissingLeaf,

    /// An intermediate segment was missing, empty, or not an object
    MissingBranch,
}

impl FieldPath {
    /// Create a one-segment path
    pub fn single(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    /// Create a path from segments
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Whether the path has no segments (invalid in configuration)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve the path to its container and leaf field name, mutably.
    ///
    /// Every intermediate segment must resolve to a non-empty object;
    /// otherwise the whole resolution is absent.
    pub fn locate_mut<'a>(&self, record: &'a mut Record) -> Target<'a> {
        let Some((leaf, branch)) = self.segments.split_last() else {
            return Target::MissingBranch;
        };

        if branch.is_empty() {
            return if record.contains_key(leaf) {
                Target::Found {
                    container: record,
                    key: leaf.clone(),
                }
            } else {
                Target::MissingLeaf
            };
        }

        let mut current = record;
        for segment in branch {
            current = match current.get_mut(segment) {
                Some(Value::Object(map)) if !map.is_empty() => map,
                _ => return Target::MissingBranch,
            };
        }

        Target::Found {
            container: current,
            key: leaf.clone(),
        }
    }

    /// Resolve the path to the leaf value, read-only.
    ///
    /// Returns `None` for any form of absence (missing leaf or missing
    /// branch); a present-but-null leaf returns `Some(&Value::Null)`.
    pub fn resolve<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        let (leaf, branch) = self.segments.split_last()?;

        let mut current = record;
        for segment in branch {
            current = match current.get(segment) {
                Some(Value::Object(map)) if !map.is_empty() => map,
                _ => return None,
            };
        }

        current.get(leaf)
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
