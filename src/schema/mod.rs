//! Schema inference, merging, and flattening
//!
//! Builds a single BigQuery-style structural schema covering every record in
//! the dataset.
//!
//! # How it fits together
//!
//! - **Inference**: each worker folds its file's records into a private
//!   [`SchemaMap`] via [`SchemaGenerator`]
//! - **Merging**: the orchestrator combines per-file maps with
//!   [`merge_schema_maps`], one merge at a time
//! - **Flattening**: the finished map becomes a sorted, tabular
//!   [`SchemaField`] list that is persisted as `schema.json`

mod flatten;
mod inference;
mod merge;
mod types;

pub use flatten::{flatten_schema_map, sort_schema, to_pretty_json, SchemaField};
pub use inference::{merge_entry, SchemaGenerator};
pub use merge::merge_schema_maps;
pub use types::{FieldMode, FieldType, SchemaEntry, SchemaMap};
