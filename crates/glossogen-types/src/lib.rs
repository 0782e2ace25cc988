//! Shared type definitions for the Glossogen language-evolution simulator.
//!
//! This crate is the single source of truth for the plain data types used
//! across the Glossogen workspace: the binary trait vector that represents
//! one lineage's language state, and the diagnostic mutation log that records
//! every event applied to a lineage.
//!
//! # Modules
//!
//! - [`trait_vector`] -- [`TraitVector`], an append-only ordered sequence of
//!   binary trait states with O(1) active-count queries.
//! - [`mutation`] -- [`MutationLog`], the per-lineage diagnostic record of
//!   applied events.
//! - [`error`] -- [`TraitError`], errors for trait-vector operations.

pub mod error;
pub mod mutation;
pub mod trait_vector;

// Re-export primary types at crate root.
pub use error::TraitError;
pub use mutation::{EventKind, MutationLog, MutationRecord};
pub use trait_vector::{TraitState, TraitVector};
