//! Error types for tree construction and layout.
//!
//! Layout itself is a total function over a well-formed tree, so errors come
//! from three places only: a malformed structure handed to a builder, a bad
//! argument at attachment time, and a degenerate configuration.

use thiserror::Error;

use crate::tree::NodeId;

/// Result type alias for tree and layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Top-level error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The input does not describe a rooted tree.
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    /// An argument was rejected at the tree-construction boundary.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The layout configuration cannot produce a valid layout.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl LayoutError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Ways in which a parent/child relation fails to be a tree.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    /// A node was reached twice while walking down from the root.
    #[error("{node} is reachable as its own descendant")]
    Cycle { node: NodeId },

    /// A node was named as the child of more than one parent.
    #[error("{node} has more than one parent")]
    MultipleParents { node: NodeId },

    /// An edge connects a node to itself.
    #[error("{node} is its own parent")]
    SelfLoop { node: NodeId },

    /// Every node has a parent, so there is nowhere to start.
    #[error("no root node could be found")]
    NoRoot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_message() {
        let err: LayoutError = StructuralError::Cycle { node: NodeId(3) }.into();
        assert_eq!(
            err.to_string(),
            "structural error: Node(3) is reachable as its own descendant"
        );
    }

    #[test]
    fn test_invalid_configuration_message() {
        let err = LayoutError::invalid_configuration("distance must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: distance must be positive"
        );
    }
}
