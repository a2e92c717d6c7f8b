//! Node descriptors and the boundary shapes of a processing request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::params::Params;
use super::table::Row;

/// The fixed enumeration of pipeline node types.
///
/// Only the four transform types change data. The file and plot types are
/// pass-through: they flow through the executor unchanged, which lets
/// terminal plot nodes and raw file nodes share the same processing path
/// without special-casing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NodeType {
    /// Raw uploaded file node (pass-through).
    File,
    /// CSV source node (pass-through).
    Csv,
    /// Seeded row sampling.
    Sampler,
    /// Column projection.
    SelectColumns,
    /// Row-range slicing.
    SelectRows,
    /// Row predicate filtering.
    FilterMore,
    /// Scatter plot sink (pass-through).
    ScatterPlot,
    /// Line plot sink (pass-through).
    LinePlot,
    /// Bar plot sink (pass-through).
    BarPlot,
    /// Box plot sink (pass-through).
    BoxPlot,
}

impl NodeType {
    /// Whether a built-in transform is registered for this type.
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            NodeType::Sampler
                | NodeType::SelectColumns
                | NodeType::SelectRows
                | NodeType::FilterMore
        )
    }
}

/// One step in the user-defined processing graph.
///
/// Descriptors are immutable once submitted to the executor. Resubmitting
/// the same `node_id` silently overwrites the node's cached result on the
/// next successful processing; cached descendants are not invalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Caller-assigned unique node id.
    pub node_id: String,
    /// Which transform (or pass-through) this node applies.
    pub node_type: NodeType,
    /// Transform-specific parameters.
    #[serde(default)]
    pub parameters: Params,
    /// When set, this node's input is the named ingested dataset rather
    /// than its parents.
    #[serde(default)]
    pub source_file_id: Option<String>,
    /// Parent node ids, in input-concatenation order. Each must have been
    /// processed and cached before this node resolves.
    #[serde(default)]
    pub parent_node_ids: Vec<String>,
}

impl NodeDescriptor {
    /// Create a descriptor with no source, parents or parameters.
    pub fn new(node_id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            node_id: node_id.into(),
            node_type,
            parameters: Params::new(),
            source_file_id: None,
            parent_node_ids: Vec::new(),
        }
    }

    /// Read input from the named ingested dataset.
    pub fn with_source(mut self, file_id: impl Into<String>) -> Self {
        self.source_file_id = Some(file_id.into());
        self
    }

    /// Read input from the given parent nodes, concatenated in order.
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_node_ids = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Set one transform parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key, value);
        self
    }
}

/// Summary returned by a successful node processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// The processed node.
    pub node_id: String,
    /// Rows in the stored result.
    pub row_count: usize,
    /// Column names of the first output row (empty when the output is
    /// empty; heterogeneous rowsets may under-report here).
    pub columns: Vec<String>,
    /// The first five output rows.
    pub sample: Vec<Row>,
}

/// A plain data read of a node's cached result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// The node read.
    pub node_id: String,
    /// Cached rows, truncated to the requested limit.
    pub rows: Vec<Row>,
    /// Total rows in the cached result, before truncation.
    pub total_rows: usize,
    /// Column names of the first cached row.
    pub columns: Vec<String>,
}
