//! Error types for the `glossogen-types` crate.
//!
//! All fallible trait-vector operations return [`TraitError`] through the
//! standard [`Result`] type alias.

/// Errors that can occur during trait-vector operations.
#[derive(Debug, thiserror::Error)]
pub enum TraitError {
    /// A position lookup or write was out of range for the vector.
    #[error("trait index {index} out of bounds for vector of length {length}")]
    IndexOutOfBounds {
        /// The requested position.
        index: usize,
        /// The vector's current length.
        length: usize,
    },

    /// A character other than '0' or '1' appeared in a binary string.
    #[error("invalid trait symbol {symbol:?}, expected '0' or '1'")]
    InvalidSymbol {
        /// The offending character.
        symbol: char,
    },
}
