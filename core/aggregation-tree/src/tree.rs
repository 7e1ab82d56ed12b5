//! FILENAME: core/aggregation-tree/src/tree.rs
//! Aggregation Tree - insertion and prefix queries over a fixed ordering.
//!
//! Algorithm:
//! 1. Insert validates the row, then walks from the root one ordering
//!    dimension at a time, descending into (or creating) the child whose
//!    label is the row's value for that dimension
//! 2. The payload becomes a new Leaf under the deepest Composite reached
//! 3. A query checks that it names a prefix of the ordering, walks the same
//!    kind of path, and stops at the first label value with no child
//! 4. Every payload under the reached node is flattened into one list and
//!    handed to the reduction function
//!
//! Caching: each insert bumps `generation`. Memoized aggregates stamped with
//! an older generation are recomputed on their next read, so a cached answer
//! never predates the last insert.

use std::fmt;

use smallvec::SmallVec;

use crate::definition::{LabelOrdering, TreeDefinition};
use crate::error::{InvalidRowReason, TreeError};
use crate::node::{Collect, Composite, Payload};
use crate::row::Row;

/// Reduction applied to the payloads under a node.
///
/// With the `parallel` feature the input order across sibling subtrees is not
/// part of the contract; reductions should not depend on it.
pub type Reducer<V, R> = Box<dyn Fn(&[V]) -> R + Send + Sync>;

/// Label values of a resolved query, outermost first.
type QueryPath<'q> = SmallVec<[&'q str; 8]>;

// ============================================================================
// AGGREGATION TREE
// ============================================================================

pub struct AggregationTree<V, R> {
    root: Composite<V>,
    definition: TreeDefinition,
    reduce: Reducer<V, R>,
    /// Bumped by every insert; see the module docs.
    generation: u64,
    /// Rows inserted so far.
    len: usize,
}

impl<V, R> fmt::Debug for AggregationTree<V, R>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregationTree")
            .field("definition", &self.definition)
            .field("generation", &self.generation)
            .field("len", &self.len)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<V: Payload, R> AggregationTree<V, R> {
    /// Creates an empty tree over the given ordering, with default settings.
    pub fn new<F>(reduce: F, ordering: LabelOrdering) -> Self
    where
        F: Fn(&[V]) -> R + Send + Sync + 'static,
    {
        Self::from_definition(TreeDefinition::new(ordering), reduce)
    }

    pub fn from_definition<F>(definition: TreeDefinition, reduce: F) -> Self
    where
        F: Fn(&[V]) -> R + Send + Sync + 'static,
    {
        let root = Composite::with_caching(definition.root_label.clone(), definition.caching);
        log_debug!(
            "TREE",
            "created tree ordering=[{}] caching={}",
            definition.ordering.names().join(","),
            definition.caching
        );
        AggregationTree {
            root,
            definition,
            reduce: Box::new(reduce),
            generation: 0,
            len: 0,
        }
    }

    /// Creates a tree and loads an initial dataset into it.
    pub fn with_rows<F>(rows: Vec<Row<V>>, reduce: F, ordering: LabelOrdering) -> Result<Self, TreeError>
    where
        F: Fn(&[V]) -> R + Send + Sync + 'static,
        V: fmt::Debug,
    {
        let mut tree = Self::new(reduce, ordering);
        tree.load(rows)?;
        Ok(tree)
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Inserts every row, in order.
    ///
    /// All rows are validated before the first one is inserted: either the
    /// whole batch lands in the tree or none of it does.
    pub fn load(&mut self, rows: Vec<Row<V>>) -> Result<(), TreeError>
    where
        V: fmt::Debug,
    {
        log_enter!("TREE", "load", "rows={}", rows.len());
        for row in &rows {
            if let Err(e) = self.validate(row) {
                log_warn!("TREE", "load rejected: {}", e);
                return Err(e);
            }
        }
        let count = rows.len();
        for row in rows {
            self.insert_unchecked(row);
        }
        log_exit!("TREE", "load", "inserted={} total={}", count, self.len);
        Ok(())
    }

    /// Inserts one row, creating the Composite nodes its label values need.
    ///
    /// Fails with `InvalidRow` when the payload is absent or a dimension of
    /// the ordering has no value in the row; the tree is untouched then.
    pub fn insert(&mut self, row: Row<V>) -> Result<(), TreeError>
    where
        V: fmt::Debug,
    {
        if let Err(e) = self.validate(&row) {
            log_warn!("TREE", "insert rejected: {}", e);
            return Err(e);
        }
        self.insert_unchecked(row);
        Ok(())
    }

    fn validate(&self, row: &Row<V>) -> Result<(), TreeError>
    where
        V: fmt::Debug,
    {
        if row.value().is_none() {
            return Err(TreeError::InvalidRow {
                row: row.to_string(),
                reason: InvalidRowReason::MissingPayload,
            });
        }
        if let Some(dim) = self.definition.ordering.iter().find(|d| row.label(d).is_none()) {
            return Err(TreeError::InvalidRow {
                row: row.to_string(),
                reason: InvalidRowReason::MissingDimension(dim.to_string()),
            });
        }
        Ok(())
    }

    /// Caller has validated the row; nothing is touched if it was not.
    fn insert_unchecked(&mut self, mut row: Row<V>) {
        let Some(value) = row.take_value() else {
            return;
        };
        let path: Option<QueryPath<'_>> =
            self.definition.ordering.iter().map(|dim| row.label(dim)).collect();
        let Some(path) = path else {
            return;
        };

        let caching = self.root.is_caching();
        let mut node = &mut self.root;
        for label in &path {
            node = node.child_or_insert(label, caching);
        }
        node.push_leaf(value);
        self.len += 1;
        self.invalidate_cache();
    }

    fn invalidate_cache(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.root.is_caching() {
            log_debug!("CACHE", "invalidated, generation={}", self.generation);
        }
    }

    /// Enables or disables memoization of aggregates in the whole tree.
    pub fn set_caching(&mut self, enabled: bool) {
        log_info!("CACHE", "set_caching enabled={}", enabled);
        self.root.set_caching(enabled);
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Aggregate for a prefix of the ordering given as label values only.
    ///
    /// `get(&["germany", "blue"])` on the ordering nation -> eyes -> hair
    /// aggregates the rows with nation=germany and eyes=blue. An empty slice
    /// aggregates the whole dataset, also on an empty tree, where the
    /// reduction receives an empty slice.
    pub fn get<S: AsRef<str>>(&mut self, label_values: &[S]) -> Result<R, TreeError> {
        let path = self.positional_path(label_values)?;
        self.aggregate(&path)
    }

    /// Aggregate for a query given as ordered `(dimension, label value)`
    /// pairs. The dimensions must be the leading dimensions of the ordering,
    /// in the same order.
    pub fn get_by<I, K, L>(&mut self, query: I) -> Result<R, TreeError>
    where
        I: IntoIterator<Item = (K, L)>,
        K: AsRef<str>,
        L: AsRef<str>,
    {
        let pairs: SmallVec<[(K, L); 8]> = query.into_iter().collect();
        let path = self.keyed_path(&pairs)?;
        self.aggregate(&path)
    }

    /// Like `get`, but through a shared reference: memoized aggregates are
    /// neither used nor filled. Several threads may run this at once as long
    /// as nothing mutates the tree meanwhile.
    pub fn get_uncached<S: AsRef<str>>(&self, label_values: &[S]) -> Result<R, TreeError> {
        let path = self.positional_path(label_values)?;
        let mut node = &self.root;
        for label in &path {
            node = node
                .child(label)
                .ok_or_else(|| missing_label(label))?;
        }
        let values = node.snapshot_values(self.definition.parallel_threshold);
        Ok((self.reduce)(&values))
    }

    fn positional_path<'q, S: AsRef<str>>(&self, label_values: &'q [S]) -> Result<QueryPath<'q>, TreeError> {
        let max = self.definition.ordering.len();
        if label_values.len() > max {
            return Err(TreeError::TooManyLabels {
                given: label_values.len(),
                max,
            });
        }
        Ok(label_values.iter().map(|s| s.as_ref()).collect())
    }

    fn keyed_path<'q, K, L>(&self, pairs: &'q [(K, L)]) -> Result<QueryPath<'q>, TreeError>
    where
        K: AsRef<str>,
        L: AsRef<str>,
    {
        let ordering = &self.definition.ordering;
        if pairs.len() > ordering.len() {
            return Err(TreeError::TooManyLabels {
                given: pairs.len(),
                max: ordering.len(),
            });
        }
        let is_prefix = pairs
            .iter()
            .zip(ordering.iter())
            .all(|((dim, _), expected)| dim.as_ref() == expected);
        if !is_prefix {
            return Err(TreeError::NotAPrefix {
                query: pairs.iter().map(|(dim, _)| dim.as_ref().to_string()).collect(),
            });
        }
        Ok(pairs.iter().map(|(_, value)| value.as_ref()).collect())
    }

    fn aggregate(&mut self, path: &[&str]) -> Result<R, TreeError> {
        let pass = Collect {
            generation: self.generation,
            parallel_threshold: self.definition.parallel_threshold,
        };
        let mut node = &mut self.root;
        for label in path {
            node = match node.child_mut(label) {
                Some(child) => child,
                None => {
                    log_debug!("TREE", "query [{}] missing label value {}", path.join(","), label);
                    return Err(missing_label(label));
                }
            };
        }
        let warm = node.is_caching() && node.cached_generation() == Some(pass.generation);
        let values = node.collect_values(pass);
        log_debug!(
            "TREE",
            "query [{}] values={} cache_hit={}",
            path.join(","),
            values.len(),
            warm
        );
        Ok((self.reduce)(&values))
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn ordering(&self) -> &LabelOrdering {
        &self.definition.ordering
    }

    pub fn definition(&self) -> &TreeDefinition {
        &self.definition
    }

    pub fn root(&self) -> &Composite<V> {
        &self.root
    }

    pub fn is_caching(&self) -> bool {
        self.root.is_caching()
    }

    /// Number of inserted rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cache generation; changes with every insert.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<V: fmt::Display, R> AggregationTree<V, R> {
    /// ASCII-art rendering of the whole tree, root first.
    pub fn print_tree(&self) -> String {
        self.root.render("", true)
    }
}

fn missing_label(label: &str) -> TreeError {
    TreeError::MissingLabelValue(label.to_string())
}
