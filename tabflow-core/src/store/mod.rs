//! The expiring key/value store behind the engine.
//!
//! Two key namespaces partition the store: `dataset:` for ingested rowsets
//! and `node:` for computed node results. All operations are atomic per key;
//! `put` replaces both value and expiry. An unreachable backing store is a
//! [`StoreError`], never a miss — callers must be able to tell "not found"
//! from "store unreachable".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Table;

pub mod memory;

pub use memory::MemoryStore;

/// A namespaced cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// An ingested dataset, keyed by file id.
    Dataset(String),
    /// A computed node result, keyed by node id.
    Node(String),
}

impl CacheKey {
    /// Key for an ingested dataset.
    pub fn dataset(file_id: impl Into<String>) -> Self {
        Self::Dataset(file_id.into())
    }

    /// Key for a computed node result.
    pub fn node(node_id: impl Into<String>) -> Self {
        Self::Node(node_id.into())
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Dataset(id) => write!(f, "dataset:{id}"),
            CacheKey::Node(id) => write!(f, "node:{id}"),
        }
    }
}

/// Metadata carried alongside an ingested dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Original filename, when the ingestion collaborator knows it.
    #[serde(default)]
    pub filename: Option<String>,
    /// Upload size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
    /// When the dataset was ingested.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// An ingested dataset as stored: the rowset plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDataset {
    /// The ingested rowset.
    pub table: Table,
    /// Ingestion metadata.
    #[serde(default)]
    pub meta: DatasetMeta,
}

/// Upload summary returned to the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// The dataset's file id.
    pub file_id: String,
    /// Original filename, if known.
    pub filename: Option<String>,
    /// Declared column names.
    pub columns: Vec<String>,
    /// Number of rows ingested.
    pub row_count: usize,
    /// Upload size in bytes, if known.
    pub file_size: Option<u64>,
    /// When the dataset was ingested.
    pub uploaded_at: DateTime<Utc>,
}

/// What a cache entry holds, matching the key namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CacheValue {
    /// An ingested dataset (the `dataset:` namespace).
    Dataset(StoredDataset),
    /// A computed node result (the `node:` namespace).
    Rows(Table),
}

impl CacheValue {
    /// The rowset inside, regardless of namespace.
    pub fn table(&self) -> &Table {
        match self {
            CacheValue::Dataset(dataset) => &dataset.table,
            CacheValue::Rows(table) => table,
        }
    }

    /// The dataset inside, when this is a dataset entry.
    pub fn as_dataset(&self) -> Option<&StoredDataset> {
        match self {
            CacheValue::Dataset(dataset) => Some(dataset),
            CacheValue::Rows(_) => None,
        }
    }
}

/// The backing store was unreachable or failed an operation.
///
/// Deliberately not a miss: a timeout or connection failure on the store
/// client surfaces as this error, never as `None`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("cache store unavailable: {message}")]
pub struct StoreError {
    /// What went wrong on the backing store.
    pub message: String,
}

impl StoreError {
    /// Create a store-unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Contract of the expiring key/value store.
///
/// `ttl` is always positive; `put` with an existing key overwrites both
/// value and expiry. Operations on distinct keys must not contend, and a
/// read after expiry behaves exactly like a read of a never-created key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`.
    async fn put(&self, key: CacheKey, value: CacheValue, ttl: Duration) -> StoreResult<()>;

    /// Fetch the live value under `key`, or `None` on a miss.
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<Arc<CacheValue>>>;

    /// Remove the entry under `key`; `true` when an entry existed.
    async fn delete(&self, key: &CacheKey) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_namespaces() {
        assert_eq!(CacheKey::dataset("f1").to_string(), "dataset:f1");
        assert_eq!(CacheKey::node("n1").to_string(), "node:n1");
    }

    #[test]
    fn test_same_id_different_namespace() {
        assert_ne!(CacheKey::dataset("x"), CacheKey::node("x"));
        assert_ne!(
            CacheKey::dataset("x").to_string(),
            CacheKey::node("x").to_string()
        );
    }

    #[test]
    fn test_cache_value_table_access() {
        let table = Table::default();
        let value = CacheValue::Dataset(StoredDataset {
            table: table.clone(),
            meta: DatasetMeta::default(),
        });
        assert_eq!(value.table(), &table);
        assert!(value.as_dataset().is_some());

        let value = CacheValue::Rows(table.clone());
        assert_eq!(value.table(), &table);
        assert!(value.as_dataset().is_none());
    }
}
