//! Error types for the `glossogen-model` crate.
//!
//! Configuration rejection and structural failures are fatal: the shared
//! clock state cannot be trusted after a partial failure, so everything here
//! propagates and aborts the run.

use glossogen_tree::TreeError;
use glossogen_types::TraitError;

/// Errors that can occur during model construction or simulation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A rate parameter was outside its valid range at model construction.
    #[error("invalid rate parameter {name}: {value}")]
    InvalidRate {
        /// The parameter's name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A death event was drawn for a lineage with no active traits.
    ///
    /// This is guarded before any active-position search; reaching it means
    /// the competing-clocks bookkeeping is inconsistent.
    #[error("death event drawn on a vector with no active traits")]
    EmptyVector,

    /// A structural tree operation failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// A trait-vector operation failed.
    #[error(transparent)]
    Trait(#[from] TraitError),
}
