//! FILENAME: core/aggregation-tree/src/lib.rs
//! Aggregation Tree subsystem.
//!
//! This crate stores flat rows tagged with categorical dimensions in a tree
//! whose levels follow a fixed dimension ordering, and answers aggregate
//! queries for any prefix of that ordering.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the tree IS)
//! - `row`: The flat input record
//! - `node`: Composite/Leaf node hierarchy (HOW values are stored and cached)
//! - `tree`: Orchestration of insert, load and prefix queries
//! - `logging`: Category-tagged log lines over the `log` facade
//!
//! Threading contract: every call that mutates the tree or fills a cached
//! aggregate takes `&mut self`. Callers that share a tree across threads must
//! serialize those calls themselves; `AggregationTree::get_uncached` is the
//! only query usable through a shared reference.

pub mod definition;
pub mod error;
#[macro_use]
pub mod logging;
pub mod node;
pub mod row;
pub mod tree;


pub use definition::{LabelOrdering, TreeDefinition, DEFAULT_ROOT_LABEL};
pub use error::{InvalidRowReason, TreeError};
pub use node::{Composite, Leaf, Node, Payload};
pub use row::Row;
pub use tree::{AggregationTree, Reducer};
