//! Unified error handling for the tabflow engine.
//!
//! One error type covers the whole engine so callers can map outcomes to
//! transport-level responses without inspecting strings: the `*NotFound`
//! variants are 404-equivalents, `Store` is a 5xx-equivalent, and everything
//! else is a request-level failure.

use crate::store::StoreError;

/// Main error type for the tabflow engine.
#[derive(Debug, thiserror::Error)]
pub enum TabflowError {
    /// A node's `source_file_id` referenced a dataset that is not in the
    /// cache (never ingested, deleted, or expired).
    #[error("source dataset not found: {file_id}")]
    SourceNotFound {
        /// The dataset id that missed.
        file_id: String,
    },

    /// A parent node's result was not in the cache. Parents must be
    /// processed before their children; the engine does not recompute them.
    #[error("upstream node data not found: {node_id}")]
    UpstreamNotFound {
        /// The parent node id that missed.
        node_id: String,
    },

    /// A direct data read referenced a node with no cached result.
    #[error("node data not found: {node_id}")]
    NodeNotFound {
        /// The node id that missed.
        node_id: String,
    },

    /// The backing cache store could not be reached. Distinct from a miss:
    /// callers may retry the whole request, the engine does not.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A transform rejected its parameters. The built-in transforms fall
    /// back to documented defaults instead of raising this; it is available
    /// to registered transforms that choose strict validation.
    #[error("invalid parameters for node {node_id}: {message}")]
    InvalidParameters {
        /// The node whose parameters were rejected.
        node_id: String,
        /// What was wrong with them.
        message: String,
    },

    /// A transform failed on the data it was given. Wraps the transform's
    /// own error with the node it was running for.
    #[error("processing failed for node {node_id} ({node_type}): {message}")]
    ProcessingFailed {
        /// The node being processed.
        node_id: String,
        /// The node's type tag.
        node_type: String,
        /// The underlying transform error message.
        message: String,
    },

    /// The node's ancestry exceeded the configured depth bound or revisited
    /// a node already on the current path (a cycle).
    #[error("node graph too deep or cyclic at node {node_id} (depth limit {limit})")]
    GraphTooDeep {
        /// The node at which the walk gave up.
        node_id: String,
        /// The configured depth limit.
        limit: usize,
    },

    /// Engine settings failed validation.
    #[error("invalid configuration: {message}")]
    Config {
        /// What was invalid.
        message: String,
    },
}

impl TabflowError {
    /// Whether this error means "the referenced data does not exist".
    ///
    /// Serving layers map these to a 404-equivalent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TabflowError::SourceNotFound { .. }
                | TabflowError::UpstreamNotFound { .. }
                | TabflowError::NodeNotFound { .. }
        )
    }

    /// Whether this error means the backing store was unreachable.
    ///
    /// Serving layers map this to a 5xx-equivalent and may retry.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, TabflowError::Store(_))
    }
}

/// Convenient Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, TabflowError>;
