//! The contract a substitution kernel implements.
//!
//! The engine is generic over the per-branch mutation law: the walker only
//! needs a way to evolve one lineage over one time interval. The
//! stochastic-Dollo kernel lives in [`crate::dollo`]; a symmetric binary
//! (GTR-style) kernel would be a second implementor of this trait with its
//! own rate law.

use rand::Rng;

use glossogen_types::{MutationLog, TraitVector};

use crate::error::ModelError;
use crate::registry::LengthRegistry;

/// A per-lineage continuous-time mutation kernel.
pub trait LineageModel {
    /// Human-readable kernel name, used in log output.
    fn name(&self) -> &'static str;

    /// Evolve `start` over a time interval of `duration`, returning the
    /// vector at the end of the branch.
    ///
    /// The input vector is padded to the registry's current maximum before
    /// any event is drawn, absorbing births from elsewhere in the tree, and
    /// the registry is grown when this lineage itself gains a trait. Every
    /// applied event is appended to `log` with a snapshot of the resulting
    /// vector. A zero duration returns the padded input unchanged.
    fn mutate_lineage<R: Rng>(
        &self,
        start: &TraitVector,
        duration: f64,
        registry: &mut LengthRegistry,
        log: &mut MutationLog,
        rng: &mut R,
    ) -> Result<TraitVector, ModelError>;
}
