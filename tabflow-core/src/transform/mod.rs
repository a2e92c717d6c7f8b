//! Transforms and their registry.
//!
//! A transform is a pure function over a rowset: no I/O, no hidden state,
//! total over its parameter space. Missing or malformed optional parameters
//! fall back to documented defaults rather than raising — a broken parameter
//! degrades the node, it does not fail the pipeline.
//!
//! The registry maps a [`NodeType`] to its transform. Node types with no
//! registered transform (file and plot nodes) pass their input through
//! unchanged, so every node type flows through the same executor.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{NodeType, Params, Result, Row};

mod filter;
mod sampler;
mod select_columns;
mod select_rows;

pub use filter::{FilterMore, FilterOp};
pub use sampler::{SampleMethod, Sampler};
pub use select_columns::SelectColumns;
pub use select_rows::SelectRows;

/// A pure rowset transform.
pub trait Transform: Send + Sync {
    /// Human-readable name of this transform (for logging/tracing).
    fn name(&self) -> &'static str;

    /// Apply the transform to `rows` under `params`.
    fn apply(&self, rows: Vec<Row>, params: &Params) -> Result<Vec<Row>>;
}

/// Registry mapping node types to transforms.
pub struct TransformRegistry {
    transforms: HashMap<NodeType, Arc<dyn Transform>>,
}

impl TransformRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Create a registry with the four built-in transforms.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(NodeType::Sampler, Arc::new(Sampler));
        registry.register(NodeType::SelectColumns, Arc::new(SelectColumns));
        registry.register(NodeType::SelectRows, Arc::new(SelectRows));
        registry.register(NodeType::FilterMore, Arc::new(FilterMore));
        registry
    }

    /// Register a transform for a node type.
    ///
    /// Returns `false` (and leaves the registration unchanged) when the
    /// type already has a transform.
    pub fn register(&mut self, node_type: NodeType, transform: Arc<dyn Transform>) -> bool {
        if self.transforms.contains_key(&node_type) {
            return false;
        }
        self.transforms.insert(node_type, transform);
        true
    }

    /// The transform registered for `node_type`, if any.
    pub fn get(&self, node_type: &NodeType) -> Option<Arc<dyn Transform>> {
        self.transforms.get(node_type).cloned()
    }

    /// Number of registered transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether no transforms are registered.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
