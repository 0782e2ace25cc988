//! Binary trait vectors: one lineage's language state.
//!
//! A [`TraitVector`] is an ordered, index-addressed sequence of binary trait
//! states. Index `i` denotes the same abstract cognate class across every
//! lineage that shared ancestry at the time class `i` was created, so the
//! vector is append-only in length: positions are flipped in place or
//! appended at the end, never removed.
//!
//! The active-trait count is maintained incrementally on every write, so
//! [`TraitVector::count_active`] is O(1). This matters because the count is
//! recomputed at every simulated event to form death and borrowing rates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TraitError;

// ---------------------------------------------------------------------------
// TraitState
// ---------------------------------------------------------------------------

/// The presence state of a single trait (cognate class) in a lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitState {
    /// The trait is absent: never born here, lost, or not yet borrowed.
    Absent,
    /// The trait is currently active in the lineage.
    Active,
}

impl TraitState {
    /// Return `true` if the trait is [`TraitState::Active`].
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Parse a binary symbol: '0' is absent, '1' is active.
    pub const fn from_symbol(symbol: char) -> Result<Self, TraitError> {
        match symbol {
            '0' => Ok(Self::Absent),
            '1' => Ok(Self::Active),
            other => Err(TraitError::InvalidSymbol { symbol: other }),
        }
    }

    /// Render as a binary symbol: absent is '0', active is '1'.
    pub const fn as_symbol(self) -> char {
        match self {
            Self::Absent => '0',
            Self::Active => '1',
        }
    }
}

// ---------------------------------------------------------------------------
// TraitVector
// ---------------------------------------------------------------------------

/// An append-only ordered sequence of binary trait states.
///
/// Cloning produces an independent copy; divergence between lineages is
/// always expressed by cloning, never by aliasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitVector {
    /// The trait states, indexed by cognate class.
    traits: Vec<TraitState>,
    /// Number of active positions, maintained on every write.
    active: usize,
}

impl TraitVector {
    /// Create an empty trait vector.
    pub const fn new() -> Self {
        Self {
            traits: Vec::new(),
            active: 0,
        }
    }

    /// Create a vector of `length` positions, all active.
    pub fn all_active(length: usize) -> Self {
        Self {
            traits: vec![TraitState::Active; length],
            active: length,
        }
    }

    /// Create a vector of `length` positions, all absent.
    pub fn all_absent(length: usize) -> Self {
        Self {
            traits: vec![TraitState::Absent; length],
            active: 0,
        }
    }

    /// Parse a binary string such as `"01101"` into a trait vector.
    ///
    /// # Errors
    ///
    /// Returns [`TraitError::InvalidSymbol`] on any character other than
    /// '0' or '1'.
    pub fn from_binary_str(data: &str) -> Result<Self, TraitError> {
        let mut vector = Self::new();
        for symbol in data.chars() {
            vector.append(TraitState::from_symbol(symbol)?);
        }
        Ok(vector)
    }

    /// Return the number of positions in the vector.
    pub fn len(&self) -> usize {
        self.traits.len()
    }

    /// Return `true` if the vector has no positions.
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Return the state at `index`, or `None` if out of range.
    ///
    /// The borrowing index scan uses this lookup: a position beyond the
    /// vector's current length is treated as "trait absent", not an error.
    pub fn state(&self, index: usize) -> Option<TraitState> {
        self.traits.get(index).copied()
    }

    /// Return the state at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TraitError::IndexOutOfBounds`] if `index >= len()`. Outside
    /// the borrowing scan, an out-of-range access is a programming error and
    /// should be propagated.
    pub fn get(&self, index: usize) -> Result<TraitState, TraitError> {
        self.state(index).ok_or(TraitError::IndexOutOfBounds {
            index,
            length: self.traits.len(),
        })
    }

    /// Set the state at `index`, keeping the active count consistent.
    ///
    /// # Errors
    ///
    /// Returns [`TraitError::IndexOutOfBounds`] if `index >= len()`.
    pub fn set(&mut self, index: usize, state: TraitState) -> Result<(), TraitError> {
        let length = self.traits.len();
        let slot = self
            .traits
            .get_mut(index)
            .ok_or(TraitError::IndexOutOfBounds { index, length })?;

        match (slot.is_active(), state.is_active()) {
            (true, false) => self.active = self.active.saturating_sub(1),
            (false, true) => self.active = self.active.saturating_add(1),
            _ => {}
        }
        *slot = state;
        Ok(())
    }

    /// Append a new position at the end, growing the length by one.
    pub fn append(&mut self, state: TraitState) {
        if state.is_active() {
            self.active = self.active.saturating_add(1);
        }
        self.traits.push(state);
    }

    /// Return the number of active positions. O(1).
    pub const fn count_active(&self) -> usize {
        self.active
    }

    /// Return the indices of all active positions, in ascending order.
    ///
    /// This is the explicit reservoir used to pick a uniformly random active
    /// position: sampling an index from this list is uniform over active
    /// traits and terminates even when the vector is all-zero (the list is
    /// simply empty).
    pub fn active_positions(&self) -> Vec<usize> {
        self.traits
            .iter()
            .enumerate()
            .filter_map(|(index, state)| state.is_active().then_some(index))
            .collect()
    }

    /// Iterate over the trait states in index order.
    pub fn iter(&self) -> impl Iterator<Item = TraitState> + '_ {
        self.traits.iter().copied()
    }
}

impl fmt::Display for TraitVector {
    /// Render as a binary string, e.g. `"01101"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.traits {
            write!(f, "{}", state.as_symbol())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
