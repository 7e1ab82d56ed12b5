//! FILENAME: core/aggregation-tree/src/error.rs

use std::fmt;

use thiserror::Error;

/// Why a row was refused by `AggregationTree::insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRowReason {
    /// The row carries no payload value.
    MissingPayload,
    /// The row has no label value for this ordering dimension.
    MissingDimension(String),
}

impl fmt::Display for InvalidRowReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRowReason::MissingPayload => write!(f, "row does not have a value"),
            InvalidRowReason::MissingDimension(dim) => {
                write!(f, "row misses a value for aggregation dimension '{}'", dim)
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Invalid row ({reason}): {row}")]
    InvalidRow {
        row: String,
        reason: InvalidRowReason,
    },

    #[error("Query specifies too many labels: {given} given, ordering has {max}")]
    TooManyLabels { given: usize, max: usize },

    #[error("Query is not a prefix of the ordering: [{}]", .query.join(", "))]
    NotAPrefix { query: Vec<String> },

    #[error("Query specifies a missing label value: {0}")]
    MissingLabelValue(String),

    #[error("Dimension appears more than once in the ordering: {0}")]
    DuplicateDimension(String),
}
