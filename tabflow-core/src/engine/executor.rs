//! The per-request processing orchestrator.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::config::Settings;
use crate::core::{
    NodeData, NodeDescriptor, ProcessingResult, Result, Table, TabflowError,
};
use crate::store::{
    CacheKey, CacheStore, CacheValue, DatasetMeta, DatasetSummary, StoredDataset,
};
use crate::transform::TransformRegistry;

use super::resolver::{check_ancestry, DependencyResolver};

/// Rows included in a processing result's sample.
const SAMPLE_ROWS: usize = 5;

/// Orchestrates resolve → transform → store for one node request.
///
/// Each `process` call is independent and may run concurrently with others;
/// no lock is held across the resolve/transform/store sequence, so two
/// concurrent calls for the same node id race on the final write —
/// last write wins, no corruption. A failed call writes nothing, leaving
/// any previously cached result untouched.
pub struct PipelineExecutor {
    store: Arc<dyn CacheStore>,
    registry: TransformRegistry,
    resolver: DependencyResolver,
    settings: Arc<Settings>,
    /// Descriptors successfully processed so far, used to bound ancestry
    /// walks before resolution.
    submitted: RwLock<HashMap<String, NodeDescriptor>>,
}

impl PipelineExecutor {
    /// Create an executor with the built-in transforms.
    pub fn new(store: Arc<dyn CacheStore>, settings: Arc<Settings>) -> Self {
        Self::with_registry(store, TransformRegistry::with_builtins(), settings)
    }

    /// Create an executor with a caller-assembled registry.
    pub fn with_registry(
        store: Arc<dyn CacheStore>,
        registry: TransformRegistry,
        settings: Arc<Settings>,
    ) -> Self {
        let resolver = DependencyResolver::new(Arc::clone(&store));
        Self {
            store,
            registry,
            resolver,
            settings,
            submitted: RwLock::new(HashMap::new()),
        }
    }

    /// The settings this executor runs under.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Process one node: resolve its input, apply its transform, cache the
    /// result under `node:<node_id>` with the node-result TTL.
    ///
    /// Resolver errors propagate unchanged; transform errors are wrapped
    /// with the node's id and type. Reprocessing the same id overwrites the
    /// stored value (last write wins) without invalidating cached
    /// descendants.
    pub async fn process(&self, descriptor: &NodeDescriptor) -> Result<ProcessingResult> {
        {
            let catalog = self.submitted.read();
            check_ancestry(descriptor, &catalog, self.settings.max_resolve_depth)?;
        }

        let input = self.resolver.resolve(descriptor).await?;

        let rows = match self.registry.get(&descriptor.node_type) {
            Some(transform) => {
                tracing::debug!(
                    node_id = %descriptor.node_id,
                    transform = transform.name(),
                    input_rows = input.len(),
                    "applying transform"
                );
                transform
                    .apply(input.rows, &descriptor.parameters)
                    .map_err(|err| TabflowError::ProcessingFailed {
                        node_id: descriptor.node_id.clone(),
                        node_type: descriptor.node_type.to_string(),
                        message: err.to_string(),
                    })?
            }
            // No transform registered for this type: pass through unchanged.
            None => input.rows,
        };

        let output = Table::from_rows(rows);
        let result = ProcessingResult {
            node_id: descriptor.node_id.clone(),
            row_count: output.len(),
            columns: output.columns.clone(),
            sample: output.head(SAMPLE_ROWS),
        };

        self.store
            .put(
                CacheKey::node(&descriptor.node_id),
                CacheValue::Rows(output),
                self.settings.node_result_ttl,
            )
            .await?;
        self.submitted
            .write()
            .insert(descriptor.node_id.clone(), descriptor.clone());

        tracing::info!(
            node_id = %descriptor.node_id,
            node_type = %descriptor.node_type,
            rows = result.row_count,
            "node processed"
        );
        Ok(result)
    }

    /// Read a node's cached result without processing, truncated to `limit`
    /// rows. A miss (never processed, expired, or evicted) is not-found.
    pub async fn read_node(&self, node_id: &str, limit: usize) -> Result<NodeData> {
        let value = self
            .store
            .get(&CacheKey::node(node_id))
            .await?
            .ok_or_else(|| TabflowError::NodeNotFound {
                node_id: node_id.to_string(),
            })?;
        let table = value.table();
        Ok(NodeData {
            node_id: node_id.to_string(),
            rows: table.head(limit),
            total_rows: table.len(),
            columns: table.columns.clone(),
        })
    }

    /// Ingest a dataset under `dataset:<file_id>` with the dataset TTL.
    ///
    /// Stamps the upload time if the caller did not. Re-ingesting a file id
    /// replaces the previous entry and its expiry.
    pub async fn store_dataset(
        &self,
        file_id: &str,
        table: Table,
        meta: DatasetMeta,
    ) -> Result<DatasetSummary> {
        let uploaded_at = meta.uploaded_at.unwrap_or_else(Utc::now);
        let meta = DatasetMeta {
            uploaded_at: Some(uploaded_at),
            ..meta
        };
        let summary = DatasetSummary {
            file_id: file_id.to_string(),
            filename: meta.filename.clone(),
            columns: table.columns.clone(),
            row_count: table.len(),
            file_size: meta.file_size,
            uploaded_at,
        };

        self.store
            .put(
                CacheKey::dataset(file_id),
                CacheValue::Dataset(StoredDataset { table, meta }),
                self.settings.dataset_ttl,
            )
            .await?;

        tracing::info!(file_id, rows = summary.row_count, "dataset stored");
        Ok(summary)
    }

    /// Read an ingested dataset. A miss is source-not-found.
    pub async fn read_dataset(&self, file_id: &str) -> Result<StoredDataset> {
        self.store
            .get(&CacheKey::dataset(file_id))
            .await?
            .and_then(|value| value.as_dataset().cloned())
            .ok_or_else(|| TabflowError::SourceNotFound {
                file_id: file_id.to_string(),
            })
    }

    /// Delete an ingested dataset; `true` when an entry existed.
    ///
    /// Node results computed from the dataset are not invalidated — they
    /// live out their own TTLs.
    pub async fn delete_dataset(&self, file_id: &str) -> Result<bool> {
        let existed = self.store.delete(&CacheKey::dataset(file_id)).await?;
        tracing::info!(file_id, existed, "dataset delete");
        Ok(existed)
    }
}
