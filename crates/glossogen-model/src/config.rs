//! Rate parameters for the mutation engine.
//!
//! All rates are in branch-length time units. Validation happens once, at
//! model construction; a rejected configuration aborts the run before any
//! state is touched.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Parameters of the stochastic-Dollo process and its borrowing extension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Per-lineage trait birth rate `b` (0 to 1).
    pub birth_rate: f64,
    /// Per-active-trait death rate `d` (0 to 1).
    pub death_rate: f64,
    /// Borrowing rate multiplier; 0 disables borrowing entirely.
    pub borrow_rate: f64,
    /// Locality distance `z` for borrowing eligibility; 0 means global
    /// (unconstrained) borrowing.
    pub locality: f64,
    /// When set, a death that would leave a lineage with no active traits
    /// is rejected, so every lineage keeps at least one active trait.
    pub no_empty_trait: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            birth_rate: 0.5,
            death_rate: 0.5,
            borrow_rate: 0.0,
            locality: 0.0,
            no_empty_trait: false,
        }
    }
}

impl ModelConfig {
    /// Check all rate parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRate`] if `birth_rate` or `death_rate`
    /// lies outside `[0, 1]`, or if `borrow_rate` or `locality` is negative
    /// or non-finite.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [
            ("birth_rate", self.birth_rate),
            ("death_rate", self.death_rate),
        ] {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(ModelError::InvalidRate { name, value });
            }
        }
        for (name, value) in [
            ("borrow_rate", self.borrow_rate),
            ("locality", self.locality),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ModelError::InvalidRate { name, value });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_rates_above_one() {
        let config = ModelConfig {
            birth_rate: 1.5,
            ..ModelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ModelError::InvalidRate {
                name: "birth_rate",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_rates() {
        let config = ModelConfig {
            death_rate: -0.1,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            borrow_rate: -1.0,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_rates() {
        let config = ModelConfig {
            locality: f64::NAN,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn boundary_values_are_accepted() {
        let config = ModelConfig {
            birth_rate: 1.0,
            death_rate: 0.0,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
