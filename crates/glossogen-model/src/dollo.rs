//! The stochastic-Dollo birth/death kernel.
//!
//! Gain is rate-constant per lineage (`b`), loss is irreversible and
//! rate-proportional to the current active count (`d * k`). The per-branch
//! trajectory is a continuous-time Markov jump process simulated with
//! competing exponential clocks: draw the waiting time at the combined rate,
//! then choose death with probability `d*k / (b + d*k)`, birth otherwise.

use rand::Rng;

use glossogen_types::{EventKind, MutationLog, TraitState, TraitVector};

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::model::LineageModel;
use crate::registry::LengthRegistry;
use crate::sample::{next_exponential, pick_uniform};

/// The stochastic-Dollo substitution kernel.
///
/// Construction validates the configuration; an invalid rate never produces
/// a model.
#[derive(Debug, Clone)]
pub struct StochasticDollo {
    config: ModelConfig,
}

impl StochasticDollo {
    /// Create a kernel from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRate`] for any rate outside its valid
    /// range (see [`ModelConfig::validate`]).
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Return the kernel's configuration.
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Combined event rate for one lineage: `b + d * count_active`.
    pub(crate) fn lineage_rate(&self, vector: &TraitVector) -> f64 {
        self.config
            .death_rate
            .mul_add(active_count_f64(vector), self.config.birth_rate)
    }

    /// Return `true` if a death may be applied to `vector`.
    ///
    /// Always true when the no-empty-trait constraint is off; otherwise the
    /// lineage must keep at least one active trait after the loss.
    pub(crate) const fn death_allowed(&self, vector: &TraitVector) -> bool {
        if self.config.no_empty_trait {
            vector.count_active() > 1
        } else {
            true
        }
    }

    /// Kill a uniformly random active position of `vector`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyVector`] if no position is active; callers
    /// guard against drawing a death at zero active count, so reaching the
    /// error means the rate bookkeeping went inconsistent.
    pub(crate) fn apply_death<R: Rng>(
        &self,
        vector: &mut TraitVector,
        rng: &mut R,
    ) -> Result<usize, ModelError> {
        let positions = vector.active_positions();
        let position = *pick_uniform(rng, &positions).ok_or(ModelError::EmptyVector)?;
        vector.set(position, TraitState::Absent)?;
        Ok(position)
    }
}

impl LineageModel for StochasticDollo {
    fn name(&self) -> &'static str {
        "stochastic-dollo"
    }

    fn mutate_lineage<R: Rng>(
        &self,
        start: &TraitVector,
        duration: f64,
        registry: &mut LengthRegistry,
        log: &mut MutationLog,
        rng: &mut R,
    ) -> Result<TraitVector, ModelError> {
        let mut vector = start.clone();
        // Absorb births that occurred elsewhere in the tree first.
        registry.pad_if_needed(&mut vector);

        let mut elapsed = next_exponential(rng, self.lineage_rate(&vector));
        while elapsed < duration {
            let death_rate = self.config.death_rate * active_count_f64(&vector);
            let total = self.config.birth_rate + death_rate;
            let death_probability = if total > 0.0 { death_rate / total } else { 0.0 };

            if rng.random::<f64>() < death_probability {
                // A zero active count gives death probability 0, so the
                // death branch is never entered on an all-zero vector.
                if self.death_allowed(&vector) {
                    self.apply_death(&mut vector, rng)?;
                    log.record(elapsed, EventKind::Death, vector.clone());
                }
            } else {
                vector.append(TraitState::Active);
                registry.grow_to(vector.len());
                log.record(elapsed, EventKind::Birth, vector.clone());
            }

            elapsed += next_exponential(rng, self.lineage_rate(&vector));
        }

        Ok(vector)
    }
}

/// The active count as an event-rate multiplier.
///
/// Counts are tiny relative to the f64 mantissa.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn active_count_f64(vector: &TraitVector) -> f64 {
    vector.count_active() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
