//! FILENAME: core/aggregation-tree/src/row.rs
//! PURPOSE: The flat record handed to the tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A flat record: one label value per dimension plus a single payload.
///
/// No validation happens here. Whether a row is acceptable depends on the
/// ordering of the tree it is inserted into, so `AggregationTree::insert`
/// performs the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row<V> {
    #[serde(default)]
    labels: BTreeMap<String, String>,
    value: Option<V>,
}

impl<V> Row<V> {
    /// Creates a row with no labels and no payload.
    pub fn new() -> Self {
        Row {
            labels: BTreeMap::new(),
            value: None,
        }
    }

    pub fn with_value(value: V) -> Self {
        Row {
            labels: BTreeMap::new(),
            value: Some(value),
        }
    }

    /// Builder form of `set_label`.
    pub fn with_label(mut self, dimension: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_label(dimension, value);
        self
    }

    pub fn set_label(&mut self, dimension: impl Into<String>, value: impl Into<String>) {
        self.labels.insert(dimension.into(), value.into());
    }

    pub fn label(&self, dimension: &str) -> Option<&str> {
        self.labels.get(dimension).map(String::as_str)
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn set_value(&mut self, value: V) {
        self.value = Some(value);
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }
}

impl<V> Default for Row<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Display for Row<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (dim, value)) in self.labels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", dim, value)?;
        }
        match &self.value {
            Some(v) => write!(f, "] value={:?}", v),
            None => write!(f, "] value=<missing>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_labels_and_value() {
        let row = Row::with_value(100)
            .with_label("nation", "germany")
            .with_label("eyes", "blue");
        assert_eq!(row.label("nation"), Some("germany"));
        assert_eq!(row.label("eyes"), Some("blue"));
        assert_eq!(row.label("hair"), None);
        assert_eq!(row.value(), Some(&100));
    }

    #[test]
    fn test_set_label_overwrites() {
        let mut row: Row<i64> = Row::new();
        row.set_label("hair", "black");
        row.set_label("hair", "blonde");
        assert_eq!(row.labels().len(), 1);
        assert_eq!(row.label("hair"), Some("blonde"));
    }

    #[test]
    fn test_display_lists_labels_sorted() {
        let row = Row::with_value(7).with_label("nation", "italy").with_label("eyes", "dark");
        assert_eq!(row.to_string(), "[eyes=dark, nation=italy] value=7");

        let empty: Row<i64> = Row::new().with_label("nation", "spain");
        assert_eq!(empty.to_string(), "[nation=spain] value=<missing>");
    }

    #[test]
    fn test_deserialize_without_value() {
        let row: Row<i64> = serde_json::from_str(r#"{ "labels": { "nation": "france" } }"#).unwrap();
        assert_eq!(row.label("nation"), Some("france"));
        assert_eq!(row.value(), None);
    }
}
