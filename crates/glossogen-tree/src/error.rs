//! Error types for the `glossogen-tree` crate.

use crate::timed_tree::NodeId;

/// Errors that can occur during timed-tree operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A node identifier does not refer to any node in the tree.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// A child was inserted above its parent on the time axis.
    #[error("child depth {depth} is above parent {parent} at depth {parent_depth}")]
    DepthInversion {
        /// The parent node.
        parent: NodeId,
        /// The parent's depth.
        parent_depth: f64,
        /// The rejected child depth.
        depth: f64,
    },

    /// A depth value was NaN or infinite.
    #[error("non-finite node depth: {depth}")]
    NonFiniteDepth {
        /// The rejected depth value.
        depth: f64,
    },

    /// A node's trait vector was read before being assigned.
    #[error("node {0} has no assigned state")]
    StateUnassigned(NodeId),

    /// Random tree growth was asked to use a non-positive branch rate.
    #[error("branch rate must be positive, got {rate}")]
    InvalidBranchRate {
        /// The rejected rate.
        rate: f64,
    },
}
