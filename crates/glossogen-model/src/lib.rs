//! Mutation engine for the Glossogen language-evolution simulator.
//!
//! Simulates the evolution of binary trait vectors along the branches of a
//! rooted timed tree under a stochastic-Dollo birth/death process, either
//! branch by branch (each lineage independent) or on a single shared
//! timeline that additionally allows borrowing of active traits between
//! contemporaneous lineages.
//!
//! # Modules
//!
//! - [`config`] -- [`ModelConfig`], the rate parameters and their validation.
//! - [`registry`] -- [`LengthRegistry`], the tree-wide maximum vector length,
//!   threaded explicitly through every call that can grow it.
//! - [`model`] -- [`LineageModel`], the contract a substitution kernel
//!   implements.
//! - [`dollo`] -- [`StochasticDollo`], the birth/death kernel: gain is
//!   rate-constant, loss is irreversible and rate-proportional to the
//!   current active count.
//! - [`walker`] -- breadth-first non-borrowing traversal applying the kernel
//!   to every branch independently.
//! - [`scheduler`] -- the global event scheduler for borrowing mode: one
//!   shared clock, competing birth/death/borrowing clocks over the alive
//!   frontier, subtree-wide state propagation.
//! - [`sample`] -- shared random-draw helpers (exponential waiting times,
//!   categorical choice, index permutations).
//! - [`error`] -- [`ModelError`].

pub mod config;
pub mod dollo;
pub mod error;
pub mod model;
pub mod registry;
pub mod sample;
pub mod scheduler;
pub mod walker;

// Re-export primary types at crate root.
pub use config::ModelConfig;
pub use dollo::StochasticDollo;
pub use error::ModelError;
pub use model::LineageModel;
pub use registry::LengthRegistry;
pub use scheduler::{EventRates, GlobalEvent};
pub use walker::evolve_tree;
