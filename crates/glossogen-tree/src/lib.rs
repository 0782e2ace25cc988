//! Rooted timed phylogenetic tree for the Glossogen simulator.
//!
//! A [`TimedTree`] is an arena of nodes, each carrying an elapsed-time-from-
//! root depth and an optional attached [`TraitVector`] state. The engine
//! consumes the tree top-down, assigning a state to every node, so the tree
//! exposes exactly the queries the engine needs: branch lengths, the leaf
//! set, the overall height, whole-subtree state assignment, and the frontier
//! of lineages alive at a given simulation time.
//!
//! # Modules
//!
//! - [`timed_tree`] -- [`NodeId`], [`TimedNode`], and the [`TimedTree`] arena.
//! - [`generate`] -- random binary tree growth for experiments and tests.
//! - [`error`] -- [`TreeError`] for structural failures.
//!
//! [`TraitVector`]: glossogen_types::TraitVector

pub mod error;
pub mod generate;
pub mod timed_tree;

// Re-export primary types at crate root.
pub use error::TreeError;
pub use generate::grow_random;
pub use timed_tree::{NodeId, TimedNode, TimedTree};
