//! Record filtering
//!
//! Declarative include/exclude predicates evaluated against each record.
//! A record survives the filter stage only if every spec passes.

use crate::record::{FieldPath, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single filter predicate from the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Field to test
    pub path: FieldPath,

    /// Value to compare against; a sequence means set membership
    pub value: FilterValue,

    /// Expected outcome of the raw test; `false` inverts the predicate
    #[serde(default = "default_true")]
    pub desired_test_result: bool,
}

fn default_true() -> bool {
    true
}

/// Scalar equality or set membership
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Resolved value must be a member of the set
    AnyOf(Vec<Value>),
    /// Resolved value must equal this value exactly
    Equals(Value),
}

impl FilterSpec {
    /// Evaluate this spec against one record.
    ///
    /// An absent field resolves to null before comparison. Equality is exact
    /// across JSON types; there is no coercion.
    pub fn passes(&self, record: &Record) -> bool {
        let resolved = self.path.resolve(record).unwrap_or(&Value::Null);

        let raw_test = match &self.value {
            FilterValue::AnyOf(candidates) => candidates.iter().any(|c| c == resolved),
            FilterValue::Equals(value) => value == resolved,
        };

        raw_test == self.desired_test_result
    }
}

/// Evaluate an ordered filter set as a conjunction, short-circuiting on the
/// first failing spec.
pub fn passes(record: &Record, filters: &[FilterSpec]) -> bool {
    filters.iter().all(|spec| spec.passes(record))
}
