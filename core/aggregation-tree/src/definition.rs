//! FILENAME: core/aggregation-tree/src/definition.rs
//! Aggregation Tree Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE a tree before any row
//! is inserted. These structures are designed to be:
//! - Serializable (a tree layout can be kept next to the data it aggregates)
//! - Validated on construction (an ordering never holds a duplicate name)
//! - Immutable once handed to an `AggregationTree`

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// Label of the synthetic root node that stands for the whole dataset.
pub const DEFAULT_ROOT_LABEL: &str = "All";

/// Minimum number of children before a node collects them in parallel.
/// Only consulted with the `parallel` feature.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

// ============================================================================
// LABEL ORDERING
// ============================================================================

/// Ordered, duplicate-free sequence of dimension names.
///
/// The ordering fixes the depth of the tree and the only valid query shapes:
/// a query must name dimension 1, then dimension 2, and so on, without gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelOrdering {
    names: Vec<String>,
}

impl LabelOrdering {
    /// Builds an ordering, refusing any name that appears twice.
    pub fn new<I, S>(names: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if collected.contains(&name) {
                return Err(TreeError::DuplicateDimension(name));
            }
            collected.push(name);
        }
        Ok(LabelOrdering { names: collected })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Depth (0-based) of the given dimension, if it is part of the ordering.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl TryFrom<Vec<String>> for LabelOrdering {
    type Error = TreeError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        LabelOrdering::new(names)
    }
}

impl From<LabelOrdering> for Vec<String> {
    fn from(ordering: LabelOrdering) -> Self {
        ordering.names
    }
}

// ============================================================================
// TREE DEFINITION
// ============================================================================

/// Complete configuration of an aggregation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDefinition {
    /// Dimensions, outermost first.
    pub ordering: LabelOrdering,

    /// Display label of the root node.
    #[serde(default = "default_root_label")]
    pub root_label: String,

    /// Whether aggregates are memoized from the start.
    #[serde(default)]
    pub caching: bool,

    /// Children count from which leaf collection fans out over the rayon
    /// pool. Ignored unless the crate is built with `parallel`.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_root_label() -> String {
    DEFAULT_ROOT_LABEL.to_string()
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl TreeDefinition {
    pub fn new(ordering: LabelOrdering) -> Self {
        TreeDefinition {
            ordering,
            root_label: default_root_label(),
            caching: false,
            parallel_threshold: default_parallel_threshold(),
        }
    }

    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}
