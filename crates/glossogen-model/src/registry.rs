//! The tree-wide maximum vector length.
//!
//! Every birth anywhere in the tree appends a new cognate class at the end
//! of the global index space. Lineages that were not involved only learn
//! about it when they are next mutated: [`LengthRegistry::pad_if_needed`]
//! appends absent positions until the lineage's vector matches the maximum
//! length observed so far.
//!
//! The registry is the single piece of state shared across lineages. It is
//! an explicit value owned by the caller and threaded by `&mut` through
//! every call that can grow it -- never ambient global state -- so all
//! readers observe one consistent value.

use serde::{Deserialize, Serialize};

use glossogen_types::{TraitState, TraitVector};

/// Monotone counter of the maximum trait-vector length ever created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRegistry {
    /// The maximum length observed anywhere in the simulation so far.
    max_len: usize,
}

impl LengthRegistry {
    /// Create a registry starting at `initial` positions.
    pub const fn new(initial: usize) -> Self {
        Self { max_len: initial }
    }

    /// Create a registry initialized to the root vector's length.
    pub fn from_vector(vector: &TraitVector) -> Self {
        Self {
            max_len: vector.len(),
        }
    }

    /// Return the current maximum length.
    pub const fn current_max(&self) -> usize {
        self.max_len
    }

    /// Raise the maximum to `n` if larger; otherwise a no-op.
    pub const fn grow_to(&mut self, n: usize) {
        if n > self.max_len {
            self.max_len = n;
        }
    }

    /// Append absent positions to `vector` until it reaches the current
    /// maximum length. Idempotent; a vector at or past the maximum is left
    /// untouched.
    ///
    /// Called before mutating any lineage, to absorb births that occurred
    /// elsewhere in the tree.
    pub fn pad_if_needed(&self, vector: &mut TraitVector) {
        while vector.len() < self.max_len {
            vector.append(TraitState::Absent);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
