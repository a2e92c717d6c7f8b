//! Node input resolution.
//!
//! A node's input is either a named ingested dataset or the concatenation of
//! its parents' cached results, in parent-list order. A missing parent is a
//! terminal error — the resolver never recomputes it. That trade is
//! deliberate: parents are processed and cached before their children, and
//! recomputing on miss would turn one request into an unbounded recursive
//! fan-out with very different caching and latency behavior.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{NodeDescriptor, Result, Table, TabflowError};
use crate::store::{CacheKey, CacheStore};

/// Resolves a node descriptor to its input rowset.
pub struct DependencyResolver {
    store: Arc<dyn CacheStore>,
}

impl DependencyResolver {
    /// Create a resolver over the given store.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Produce the input rowset for `descriptor`.
    ///
    /// With `source_file_id` set, the named dataset is fetched; a miss is a
    /// terminal source-not-found. Otherwise each parent's cached result is
    /// fetched in order and the row sequences concatenated; any parent miss
    /// is a terminal upstream-not-found. No source and no parents resolves
    /// to an empty rowset, not an error.
    ///
    /// Concatenation does not compute a schema union — the declared columns
    /// are the first parent's, and downstream transforms tolerate
    /// heterogeneous row shapes per the sparse-row model.
    pub async fn resolve(&self, descriptor: &NodeDescriptor) -> Result<Table> {
        if let Some(file_id) = &descriptor.source_file_id {
            let value = self
                .store
                .get(&CacheKey::dataset(file_id))
                .await?
                .ok_or_else(|| TabflowError::SourceNotFound {
                    file_id: file_id.clone(),
                })?;
            tracing::debug!(
                node_id = %descriptor.node_id,
                file_id = %file_id,
                "resolved node input from dataset"
            );
            return Ok(value.table().clone());
        }

        if descriptor.parent_node_ids.is_empty() {
            return Ok(Table::default());
        }

        let mut columns = Vec::new();
        let mut rows = Vec::new();
        for parent_id in &descriptor.parent_node_ids {
            let value = self
                .store
                .get(&CacheKey::node(parent_id))
                .await?
                .ok_or_else(|| TabflowError::UpstreamNotFound {
                    node_id: parent_id.clone(),
                })?;
            let table = value.table();
            if columns.is_empty() {
                columns = table.columns.clone();
            }
            rows.extend(table.rows.iter().cloned());
        }
        tracing::debug!(
            node_id = %descriptor.node_id,
            parents = descriptor.parent_node_ids.len(),
            rows = rows.len(),
            "resolved node input from parents"
        );
        Ok(Table::new(columns, rows))
    }
}

/// Walk `descriptor`'s ancestry through previously submitted descriptors,
/// failing fast when the walk exceeds `limit` edges or revisits a node on
/// the current path.
///
/// Parent ids are caller-supplied with no structural cycle check, so a bad
/// graph must be caught here rather than by recursing until the stack goes.
/// Ancestors missing from `catalog` end their branch of the walk; if their
/// cached results are absent too, resolution reports them as not-found.
pub(crate) fn check_ancestry(
    descriptor: &NodeDescriptor,
    catalog: &HashMap<String, NodeDescriptor>,
    limit: usize,
) -> Result<()> {
    let mut path = vec![descriptor.node_id.as_str()];
    walk(&descriptor.parent_node_ids, catalog, limit, 1, &mut path)
}

fn walk<'a>(
    parent_ids: &'a [String],
    catalog: &'a HashMap<String, NodeDescriptor>,
    limit: usize,
    depth: usize,
    path: &mut Vec<&'a str>,
) -> Result<()> {
    for parent_id in parent_ids {
        if path.contains(&parent_id.as_str()) || depth > limit {
            return Err(TabflowError::GraphTooDeep {
                node_id: parent_id.clone(),
                limit,
            });
        }
        if let Some(parent) = catalog.get(parent_id) {
            path.push(parent_id.as_str());
            walk(&parent.parent_node_ids, catalog, limit, depth + 1, path)?;
            path.pop();
        }
    }
    Ok(())
}
