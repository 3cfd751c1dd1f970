//! Error types for the pane tree
//!
//! Tree algorithms never fail; these errors come from validating
//! constructors, invariant checks, and workspace lookups.

use super::types::{NodeId, TabId};

/// Errors raised while building or validating a pane tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaneError {
    /// A session handle was empty.
    #[error("session id must not be empty")]
    EmptySessionId,

    /// A split was given fewer than two children.
    #[error("split {split} has {count} children (at least 2 required)")]
    TooFewChildren {
        /// The offending split.
        split: NodeId,
        /// Number of children it was given.
        count: usize,
    },

    /// The sizes array does not line up with the children.
    #[error("split {split} has {children} children but {sizes} sizes")]
    SizeCountMismatch {
        /// The offending split.
        split: NodeId,
        /// Number of children.
        children: usize,
        /// Number of sizes.
        sizes: usize,
    },

    /// A size entry was negative, zero-summed, or not finite.
    #[error("invalid size in split {split}: {value}")]
    InvalidSize {
        /// The offending split.
        split: NodeId,
        /// The rejected value.
        value: f64,
    },

    /// The sizes of a split do not add up to 100.
    #[error("sizes of split {split} sum to {sum} instead of 100")]
    SizesNotNormalized {
        /// The offending split.
        split: NodeId,
        /// Actual sum.
        sum: f64,
    },

    /// The same node id appears twice in one tree.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(NodeId),
}

/// Errors raised by workspace orchestration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    /// The tab does not exist (never opened or already closed).
    #[error("tab not found: {0}")]
    TabNotFound(TabId),

    /// The pane does not exist in the tab's tree.
    #[error("pane not found: {0}")]
    PaneNotFound(NodeId),
}
