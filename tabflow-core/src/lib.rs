//! # tabflow-core
//!
//! Cached dataflow engine for visual tabular pipelines.
//!
//! Users wire uploaded datasets through a DAG of processing nodes (sample,
//! select columns, select rows, filter) whose outputs feed plotting stages.
//! This crate is the engine under that editor:
//!
//! - a tabular value model (ordered sparse rows plus an advisory column
//!   list),
//! - an expiring key/value store partitioned into `dataset:` and `node:`
//!   namespaces,
//! - a registry of pure rowset transforms,
//! - a resolver that produces a node's input from its source dataset or its
//!   parents' cached results,
//! - an executor that ties them together per request and caches each node's
//!   output under a TTL.
//!
//! HTTP routing, file parsing and chart aggregation live in the serving
//! layers that call into this crate; no wire format is mandated here, and
//! every boundary shape is serde-serializable.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use tabflow_core::{
//!     DatasetMeta, MemoryStore, NodeDescriptor, NodeType, PipelineExecutor, Settings, Table,
//! };
//!
//! # async fn example() -> tabflow_core::Result<()> {
//! let settings = Arc::new(Settings::default());
//! let store = Arc::new(MemoryStore::new(settings.store_max_capacity));
//! let executor = PipelineExecutor::new(store, settings);
//!
//! // The ingestion collaborator stores a parsed upload...
//! let table: Table = serde_json::from_value(json!({
//!     "columns": ["city", "population"],
//!     "rows": [
//!         {"city": "Oslo", "population": 717710},
//!         {"city": "Bergen", "population": 291940},
//!     ],
//! }))
//! .unwrap();
//! executor.store_dataset("upload-1", table, DatasetMeta::default()).await?;
//!
//! // ...and the serving layer processes nodes against it.
//! let node = NodeDescriptor::new("n1", NodeType::FilterMore)
//!     .with_source("upload-1")
//!     .with_parameter("column", json!("population"))
//!     .with_parameter("operator", json!(">"))
//!     .with_parameter("value", json!(300000));
//! let result = executor.process(&node).await?;
//! assert_eq!(result.row_count, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Engine settings.
pub mod config;
/// Core data structures and error handling.
pub mod core;
/// The node dataflow engine.
pub mod engine;
/// The expiring key/value store.
pub mod store;
/// Transforms and their registry.
pub mod transform;

pub use crate::config::{Settings, SettingsBuilder};
pub use crate::core::{
    infer_columns, scalar_number, scalar_text, NodeData, NodeDescriptor, NodeType, Params,
    ProcessingResult, Result, Row, Table, TabflowError,
};
pub use crate::engine::{DependencyResolver, PipelineExecutor};
pub use crate::store::{
    CacheKey, CacheStore, CacheValue, DatasetMeta, DatasetSummary, MemoryStore, StoreError,
    StoreResult, StoredDataset,
};
pub use crate::transform::{
    FilterMore, FilterOp, SampleMethod, Sampler, SelectColumns, SelectRows, Transform,
    TransformRegistry,
};
