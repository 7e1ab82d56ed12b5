//! FILENAME: core/aggregation-tree/src/node.rs
//! Tree nodes - the polymorphic Composite/Leaf hierarchy.
//!
//! A Composite stands for one label value at one depth of the ordering and
//! owns its children. A Leaf holds exactly one inserted payload and is always
//! a child of the deepest Composite on its path.
//!
//! Children are kept in insertion order, with a hash index from label value to
//! position for the Composite children. This keeps lookups O(1) and makes
//! rendering deterministic.
//!
//! Memoized aggregates are stamped with the tree generation they were
//! computed at. A memo is only reused while that generation is current, so an
//! insert invalidates every memo by bumping one counter.

use std::fmt;

use rustc_hash::FxHashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ============================================================================
// PAYLOAD BOUND
// ============================================================================

/// Bound on payload values stored in the tree.
///
/// Collected aggregates hand out copies of the payloads, hence `Clone`. With
/// the `parallel` feature, subtrees are collected on the rayon pool and
/// payloads must also cross threads.
#[cfg(not(feature = "parallel"))]
pub trait Payload: Clone {}

#[cfg(not(feature = "parallel"))]
impl<T: Clone> Payload for T {}

#[cfg(feature = "parallel")]
pub trait Payload: Clone + Send + Sync {}

#[cfg(feature = "parallel")]
impl<T: Clone + Send + Sync> Payload for T {}

/// Parameters of one collection pass over a subtree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Collect {
    /// Current tree generation; memos stamped with any other value are stale.
    pub generation: u64,
    /// Children count from which a node fans out in parallel.
    pub parallel_threshold: usize,
}

// ============================================================================
// NODE
// ============================================================================

/// A tree node: either an inner Composite or a payload-carrying Leaf.
#[derive(Debug, Clone)]
pub enum Node<V> {
    Leaf(Leaf<V>),
    Composite(Composite<V>),
}

impl<V> Node<V> {
    pub fn as_composite(&self) -> Option<&Composite<V>> {
        match self {
            Node::Composite(c) => Some(c),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf<V>> {
        match self {
            Node::Leaf(l) => Some(l),
            Node::Composite(_) => None,
        }
    }

    /// Toggles memoization on a Composite and all Composites below it.
    /// A Leaf has nothing to cache.
    pub fn set_caching(&mut self, enabled: bool) {
        match self {
            Node::Leaf(_) => {}
            Node::Composite(c) => c.set_caching(enabled),
        }
    }
}

impl<V: Payload> Node<V> {
    /// Every payload reachable from this node, filling memos on the way.
    pub(crate) fn collect_values(&mut self, pass: Collect) -> Vec<V> {
        match self {
            Node::Leaf(leaf) => vec![leaf.value.clone()],
            Node::Composite(c) => c.collect_values(pass),
        }
    }

    /// Every payload reachable from this node. Memos are neither read nor
    /// written.
    pub fn snapshot_values(&self, parallel_threshold: usize) -> Vec<V> {
        match self {
            Node::Leaf(leaf) => vec![leaf.value.clone()],
            Node::Composite(c) => c.snapshot_values(parallel_threshold),
        }
    }
}

impl<V: fmt::Display> Node<V> {
    /// ASCII rendering of this node and its subtree, one line per node.
    pub fn render(&self, indent: &str, is_last: bool) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, indent, is_last);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: &str, is_last: bool) {
        match self {
            Node::Leaf(leaf) => branch_line(out, indent, is_last, &leaf.value),
            Node::Composite(c) => c.write_pretty(out, indent, is_last),
        }
    }
}

fn branch_line(out: &mut String, indent: &str, is_last: bool, label: &dyn fmt::Display) {
    out.push_str(indent);
    out.push_str(if is_last { "\\-" } else { "|-" });
    out.push_str(&label.to_string());
    out.push('\n');
}

// ============================================================================
// LEAF
// ============================================================================

/// Holds exactly one inserted payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<V> {
    value: V,
}

impl<V> Leaf<V> {
    pub fn new(value: V) -> Self {
        Leaf { value }
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

// ============================================================================
// COMPOSITE
// ============================================================================

#[derive(Debug, Clone)]
struct Memo<V> {
    generation: u64,
    values: Vec<V>,
}

/// Inner node discriminated by one label value.
#[derive(Debug, Clone)]
pub struct Composite<V> {
    /// The label value this node stands for (the root uses a synthetic one).
    label: String,

    /// Children in insertion order.
    children: Vec<Node<V>>,

    /// Label value -> position in `children`, for Composite children only.
    index: FxHashMap<String, usize>,

    /// Whether collected values are memoized.
    caching: bool,

    /// Last collected values, with the generation they belong to.
    memo: Option<Memo<V>>,
}

impl<V> Composite<V> {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_caching(label, false)
    }

    pub fn with_caching(label: impl Into<String>, caching: bool) -> Self {
        Composite {
            label: label.into(),
            children: Vec::new(),
            index: FxHashMap::default(),
            caching,
            memo: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[Node<V>] {
        &self.children
    }

    pub fn is_caching(&self) -> bool {
        self.caching
    }

    /// Generation of the memoized aggregate, if one is held.
    pub fn cached_generation(&self) -> Option<u64> {
        self.memo.as_ref().map(|m| m.generation)
    }

    /// The Composite child with this label value.
    pub fn child(&self, label: &str) -> Option<&Composite<V>> {
        let pos = *self.index.get(label)?;
        self.children[pos].as_composite()
    }

    pub fn child_mut(&mut self, label: &str) -> Option<&mut Composite<V>> {
        let pos = *self.index.get(label)?;
        match &mut self.children[pos] {
            Node::Composite(c) => Some(c),
            Node::Leaf(_) => None,
        }
    }

    /// Descends into the child with this label value, creating it first if
    /// needed. A created child starts with the given caching flag.
    pub fn child_or_insert(&mut self, label: &str, caching: bool) -> &mut Composite<V> {
        let pos = match self.index.get(label) {
            Some(&pos) => pos,
            None => {
                let pos = self.children.len();
                self.children
                    .push(Node::Composite(Composite::with_caching(label, caching)));
                self.index.insert(label.to_string(), pos);
                pos
            }
        };
        match &mut self.children[pos] {
            Node::Composite(c) => c,
            Node::Leaf(_) => unreachable!("label index only points at composite children"),
        }
    }

    pub fn push_leaf(&mut self, value: V) {
        self.children.push(Node::Leaf(Leaf::new(value)));
    }

    /// Enables or disables memoization here and in every Composite below.
    /// Disabling drops the held memo.
    pub fn set_caching(&mut self, enabled: bool) {
        if self.caching && !enabled {
            self.memo = None;
        }
        for child in &mut self.children {
            if let Node::Composite(c) = child {
                c.set_caching(enabled);
            }
        }
        self.caching = enabled;
    }
}

impl<V: Payload> Composite<V> {
    pub(crate) fn collect_values(&mut self, pass: Collect) -> Vec<V> {
        if self.caching {
            if let Some(memo) = &self.memo {
                if memo.generation == pass.generation {
                    return memo.values.clone();
                }
            }
        }

        let values = match fan_out(&mut self.children, pass) {
            Some(values) => values,
            None => {
                let mut values = Vec::new();
                for child in &mut self.children {
                    match child {
                        Node::Leaf(leaf) => values.push(leaf.value.clone()),
                        Node::Composite(c) => values.extend(c.collect_values(pass)),
                    }
                }
                values
            }
        };

        if self.caching {
            self.memo = Some(Memo {
                generation: pass.generation,
                values: values.clone(),
            });
        }
        values
    }

    pub fn snapshot_values(&self, parallel_threshold: usize) -> Vec<V> {
        if let Some(values) = fan_out_shared(&self.children, parallel_threshold) {
            return values;
        }
        let mut values = Vec::new();
        for child in &self.children {
            match child {
                Node::Leaf(leaf) => values.push(leaf.value.clone()),
                Node::Composite(c) => values.extend(c.snapshot_values(parallel_threshold)),
            }
        }
        values
    }
}

impl<V: fmt::Display> Composite<V> {
    pub fn render(&self, indent: &str, is_last: bool) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, indent, is_last);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: &str, is_last: bool) {
        branch_line(out, indent, is_last, &self.label);

        let child_indent = format!("{}{}", indent, if is_last { "  " } else { "| " });
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            child.write_pretty(out, &child_indent, i == last);
        }
    }
}

// ============================================================================
// PARALLEL FAN-OUT
// ============================================================================

// Sibling results are concatenated in child order, but reductions must still
// accept any order and grouping of their input.

#[cfg(feature = "parallel")]
fn fan_out<V: Payload>(children: &mut [Node<V>], pass: Collect) -> Option<Vec<V>> {
    if children.len() < pass.parallel_threshold {
        return None;
    }
    Some(
        children
            .par_iter_mut()
            .map(|child| child.collect_values(pass))
            .reduce(Vec::new, |mut acc, mut part| {
                acc.append(&mut part);
                acc
            }),
    )
}

#[cfg(not(feature = "parallel"))]
fn fan_out<V: Payload>(_children: &mut [Node<V>], _pass: Collect) -> Option<Vec<V>> {
    None
}

#[cfg(feature = "parallel")]
fn fan_out_shared<V: Payload>(children: &[Node<V>], parallel_threshold: usize) -> Option<Vec<V>> {
    if children.len() < parallel_threshold {
        return None;
    }
    Some(
        children
            .par_iter()
            .map(|child| child.snapshot_values(parallel_threshold))
            .reduce(Vec::new, |mut acc, mut part| {
                acc.append(&mut part);
                acc
            }),
    )
}

#[cfg(not(feature = "parallel"))]
fn fan_out_shared<V: Payload>(_children: &[Node<V>], _parallel_threshold: usize) -> Option<Vec<V>> {
    None
}
