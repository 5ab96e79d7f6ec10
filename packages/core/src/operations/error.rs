//! Error types for page mutations
//!
//! Mutations are pure and synchronous, so the only things that can go wrong
//! are references to nodes that are not in the page.

use thiserror::Error;

/// Errors that can occur while applying a `PageMutation`
///
/// # Examples
///
/// ```rust
/// use pageblocks_core::operations::MutationError;
///
/// let err = MutationError::index_out_of_bounds(3, 2);
/// assert_eq!(err.to_string(), "Node index 3 is out of bounds for a page with 2 nodes");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Index-based operation addressed a node past the end of the page
    ///
    /// For insertions `index == len` is valid (append); everything else must
    /// satisfy `index < len`.
    #[error("Node index {index} is out of bounds for a page with {len} nodes")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Id-based operation referenced a node that is not in the page
    #[error("Node '{node_id}' does not exist")]
    NodeNotFound { node_id: String },

    /// Insertion would break the unique-id invariant
    #[error("Node '{node_id}' already exists in the page")]
    DuplicateNodeId { node_id: String },
}

impl MutationError {
    /// Create an IndexOutOfBounds error
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Create a NodeNotFound error
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            node_id: node_id.into(),
        }
    }

    /// Create a DuplicateNodeId error
    pub fn duplicate_node_id(node_id: impl Into<String>) -> Self {
        Self::DuplicateNodeId {
            node_id: node_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_error() {
        let err = MutationError::node_not_found("missing-node");
        assert!(matches!(err, MutationError::NodeNotFound { .. }));
        assert_eq!(format!("{}", err), "Node 'missing-node' does not exist");
    }

    #[test]
    fn test_duplicate_node_id_error() {
        let err = MutationError::duplicate_node_id("n1");
        assert_eq!(format!("{}", err), "Node 'n1' already exists in the page");
    }
}
