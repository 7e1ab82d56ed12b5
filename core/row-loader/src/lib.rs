//! FILENAME: core/row-loader/src/lib.rs
//! Row Loader
//!
//! Reads `aggregation_tree::Row` values from JSON. The expected input is an
//! array of objects, each with a `labels` map (dimension -> label value) and
//! a `value` payload:
//!
//! ```json
//! [
//!   { "labels": { "nation": "france", "eyes": "blue", "hair": "black" }, "value": 455 }
//! ]
//! ```
//!
//! Malformed JSON, JSON of the wrong shape and file system failures surface
//! as distinct `LoadError` variants.

mod error;
mod json_reader;

pub use error::LoadError;
pub use json_reader::{load_json_into, load_json_rows, parse_json_rows, read_json_rows};
