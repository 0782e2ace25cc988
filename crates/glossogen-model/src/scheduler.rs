//! The global event scheduler: borrowing mode.
//!
//! Instead of simulating branches independently, a single scalar clock runs
//! over the whole tree. At every step the scheduler recomputes the frontier
//! of lineages alive at the current time, forms three competing event rates
//! over that frontier, draws the waiting time from their sum, and dispatches
//! the drawn event:
//!
//! - **birth** -- rate `|alive| * b`: a random alive lineage gains a new
//!   trait at the end of the index space;
//! - **death** -- rate `d * sum(count_active)`: a random alive lineage loses
//!   one of its active traits;
//! - **borrowing** -- rate `d * borrow * sum(count_active)`: a random donor
//!   copies one active trait into a random recipient that lacks it, subject
//!   to the locality constraint.
//!
//! The borrowing rate deliberately reuses the death-rate sum scaled by the
//! borrow multiplier; it is not a pair-count formula.
//!
//! Every applied event overwrites the state of the chosen node *and its
//! entire descendant subtree*. The frontier is recomputed from scratch each
//! step by descending from the root, so nodes below the frontier must
//! always present a consistent ancestral state; the subtree-wide overwrite
//! keeps them defined without simulating them individually (see
//! [`TimedTree::set_subtree_state`]). Borrowing mode is inherently
//! sequential: the shared clock and frontier preclude branch-level
//! parallelism.

use serde::{Deserialize, Serialize};

use rand::Rng;

use glossogen_tree::{NodeId, TimedTree};
use glossogen_types::{EventKind, TraitState};

use crate::dollo::{StochasticDollo, active_count_f64};
use crate::error::ModelError;
use crate::registry::LengthRegistry;
use crate::sample::{categorical, next_exponential, pick_uniform, shuffled_indices};

// ---------------------------------------------------------------------------
// Event rates
// ---------------------------------------------------------------------------

/// The three competing event rates over the alive frontier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventRates {
    /// Trait birth: `|alive| * b`.
    pub birth: f64,
    /// Trait death: `d * sum(count_active)` over alive lineages.
    pub death: f64,
    /// Borrowing: the death-rate sum scaled by the borrow multiplier.
    pub borrow: f64,
}

impl EventRates {
    /// Return the combined rate of all three clocks.
    pub const fn total(&self) -> f64 {
        self.birth + self.death + self.borrow
    }
}

// ---------------------------------------------------------------------------
// GlobalEvent
// ---------------------------------------------------------------------------

/// One event applied by the scheduler, for post-run diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalEvent {
    /// The shared-clock time of the event.
    pub time: f64,
    /// The kind of event.
    pub kind: EventKind,
    /// The lineage the event was applied to (the recipient, for borrowing).
    pub node: NodeId,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

impl StochasticDollo {
    /// Compute the competing event rates over the given alive frontier.
    ///
    /// # Errors
    ///
    /// Fails if any alive node has no assigned state.
    pub fn event_rates(
        &self,
        tree: &TimedTree,
        alive: &[NodeId],
    ) -> Result<EventRates, ModelError> {
        let mut active_sum = 0.0;
        for &id in alive {
            active_sum += active_count_f64(tree.state(id)?);
        }
        // Frontier sizes are tiny relative to the f64 mantissa.
        #[allow(clippy::cast_precision_loss)]
        let alive_count = alive.len() as f64;

        Ok(EventRates {
            birth: alive_count * self.config().birth_rate,
            death: self.config().death_rate * active_sum,
            borrow: self.config().death_rate * self.config().borrow_rate * active_sum,
        })
    }

    /// Run the shared-timeline simulation over the whole tree.
    ///
    /// The root must carry its starting state; it is propagated to every
    /// node up front so the frontier always reads a defined state, then
    /// events are drawn until the clock passes the tree height. Returns the
    /// applied events in order.
    ///
    /// Draw order per step -- waiting time, then event type, then node and
    /// position selection -- is part of the reproducibility contract.
    ///
    /// # Errors
    ///
    /// Fails on structural tree errors; the run is aborted since the shared
    /// clock state cannot be trusted after a partial failure.
    pub fn evolve_tree_borrowing<R: Rng>(
        &self,
        tree: &mut TimedTree,
        registry: &mut LengthRegistry,
        rng: &mut R,
    ) -> Result<Vec<GlobalEvent>, ModelError> {
        let height = tree.height();
        let root = tree.root();
        let root_state = tree.state(root)?.clone();
        tree.set_subtree_state(root, &root_state)?;
        registry.grow_to(root_state.len());

        let mut events = Vec::new();
        let mut t = 0.0_f64;

        loop {
            let alive = tree.alive_at(t);
            if alive.is_empty() {
                break;
            }
            let rates = self.event_rates(tree, &alive)?;

            t += next_exponential(rng, rates.total());
            if t >= height {
                break;
            }

            let Some(choice) = categorical(rng, &[rates.birth, rates.death, rates.borrow])
            else {
                break;
            };
            match choice {
                0 => self.apply_global_birth(tree, registry, &alive, t, &mut events, rng)?,
                1 => self.apply_global_death(tree, &alive, t, &mut events, rng)?,
                _ => self.apply_global_borrowing(tree, &alive, t, &mut events, rng)?,
            }
        }

        tracing::debug!(
            events = events.len(),
            height,
            max_length = registry.current_max(),
            "borrowing run complete"
        );
        Ok(events)
    }

    /// Birth: a random alive lineage gains a trait; its clade inherits it.
    fn apply_global_birth<R: Rng>(
        &self,
        tree: &mut TimedTree,
        registry: &mut LengthRegistry,
        alive: &[NodeId],
        t: f64,
        events: &mut Vec<GlobalEvent>,
        rng: &mut R,
    ) -> Result<(), ModelError> {
        let Some(&node) = pick_uniform(rng, alive) else {
            return Ok(());
        };
        let mut state = tree.state(node)?.clone();
        state.append(TraitState::Active);
        registry.grow_to(state.len());
        tree.set_subtree_state(node, &state)?;

        tracing::trace!(time = t, %node, "global birth");
        events.push(GlobalEvent {
            time: t,
            kind: EventKind::Birth,
            node,
        });
        Ok(())
    }

    /// Death: a random alive lineage loses a random active trait.
    ///
    /// A lineage with no active traits, or one protected by the
    /// no-empty-trait constraint, consumes the step without applying
    /// anything -- the unguarded search loop this replaces would never
    /// terminate on an all-zero vector.
    fn apply_global_death<R: Rng>(
        &self,
        tree: &mut TimedTree,
        alive: &[NodeId],
        t: f64,
        events: &mut Vec<GlobalEvent>,
        rng: &mut R,
    ) -> Result<(), ModelError> {
        let Some(&node) = pick_uniform(rng, alive) else {
            return Ok(());
        };
        let current = tree.state(node)?;
        if current.count_active() == 0 || !self.death_allowed(current) {
            return Ok(());
        }

        let mut state = current.clone();
        self.apply_death(&mut state, rng)?;
        tree.set_subtree_state(node, &state)?;

        tracing::trace!(time = t, %node, "global death");
        events.push(GlobalEvent {
            time: t,
            kind: EventKind::Death,
            node,
        });
        Ok(())
    }

    /// Borrowing: copy one active trait from a donor into a recipient.
    ///
    /// No-op (the step is consumed) when donor and recipient hold equal
    /// vectors, when the pair fails the locality bound, or when no position
    /// is donor-active and recipient-absent. Positions are scanned in a
    /// uniformly random permutation order; a position beyond either
    /// vector's length counts as absent on that side.
    fn apply_global_borrowing<R: Rng>(
        &self,
        tree: &mut TimedTree,
        alive: &[NodeId],
        t: f64,
        events: &mut Vec<GlobalEvent>,
        rng: &mut R,
    ) -> Result<(), ModelError> {
        let Some(&donor) = pick_uniform(rng, alive) else {
            return Ok(());
        };
        let Some(&recipient) = pick_uniform(rng, alive) else {
            return Ok(());
        };

        let donor_state = tree.state(donor)?.clone();
        let recipient_state = tree.state(recipient)?;
        if donor_state == *recipient_state {
            return Ok(());
        }
        if !self.is_local(tree, donor, recipient)? {
            tracing::trace!(time = t, %donor, %recipient, "borrowing rejected: not local");
            return Ok(());
        }

        let recipient_state = recipient_state.clone();
        for position in shuffled_indices(rng, donor_state.len()) {
            let donor_active = donor_state
                .state(position)
                .is_some_and(TraitState::is_active);
            let recipient_absent =
                matches!(recipient_state.state(position), Some(TraitState::Absent));
            if donor_active && recipient_absent {
                let mut state = recipient_state;
                state.set(position, TraitState::Active)?;
                tree.set_subtree_state(recipient, &state)?;

                tracing::trace!(time = t, %donor, %recipient, position, "borrowing");
                events.push(GlobalEvent {
                    time: t,
                    kind: EventKind::Borrowing,
                    node: recipient,
                });
                return Ok(());
            }
        }
        Ok(())
    }

    /// Locality check: walk both ancestor chains synchronously while each
    /// side's current parent-step depth difference stays within the bound.
    /// The pair is local if the chains meet at a common ancestor before
    /// either bound is exceeded. A zero bound means unconstrained (global)
    /// borrowing.
    pub fn is_local(
        &self,
        tree: &TimedTree,
        first: NodeId,
        second: NodeId,
    ) -> Result<bool, ModelError> {
        let z = self.config().locality;
        if z <= 0.0 {
            return Ok(true);
        }

        let mut a = first;
        let mut b = second;
        loop {
            let (Some(parent_a), Some(parent_b)) =
                (tree.node(a)?.parent(), tree.node(b)?.parent())
            else {
                // A chain reached the root without meeting the other.
                return Ok(false);
            };

            let step_a = tree.node(a)?.depth() - tree.node(parent_a)?.depth();
            let step_b = tree.node(b)?.depth() - tree.node(parent_b)?.depth();
            if step_a > z || step_b > z {
                return Ok(false);
            }
            if parent_a == parent_b {
                return Ok(true);
            }
            a = parent_a;
            b = parent_b;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use glossogen_types::TraitVector;

    use crate::config::ModelConfig;

    use super::*;

    fn model(config: ModelConfig) -> StochasticDollo {
        StochasticDollo::new(config).unwrap()
    }

    /// Two-leaf tree: root at 0, leaves at the given depths.
    fn two_leaf_tree(root_state: TraitVector, depth_a: f64, depth_b: f64) -> TimedTree {
        let mut tree = TimedTree::new(root_state);
        tree.add_child(tree.root(), depth_a).unwrap();
        tree.add_child(tree.root(), depth_b).unwrap();
        tree
    }

    // ------------------------------------------------------------------
    // Rates
    // ------------------------------------------------------------------

    #[test]
    fn rates_follow_frontier_counts() {
        let dollo = model(ModelConfig {
            birth_rate: 0.5,
            death_rate: 0.5,
            borrow_rate: 0.1,
            ..ModelConfig::default()
        });
        let root_state = TraitVector::from_binary_str("111").unwrap();
        let mut tree = two_leaf_tree(root_state.clone(), 2.0, 2.0);
        tree.set_subtree_state(tree.root(), &root_state).unwrap();

        let alive = tree.alive_at(0.0);
        let rates = dollo.event_rates(&tree, &alive).unwrap();

        // 2 alive nodes, 3 active traits each.
        assert_eq!(rates.birth, 2.0 * 0.5);
        assert_eq!(rates.death, 0.5 * 6.0);
        assert_eq!(rates.borrow, 0.5 * 0.1 * 6.0);
    }

    #[test]
    fn borrow_rate_zero_without_borrowing() {
        let dollo = model(ModelConfig::default());
        let root_state = TraitVector::from_binary_str("111").unwrap();
        let mut tree = two_leaf_tree(root_state.clone(), 2.0, 2.0);
        tree.set_subtree_state(tree.root(), &root_state).unwrap();

        let alive = tree.alive_at(0.0);
        let rates = dollo.event_rates(&tree, &alive).unwrap();
        assert_eq!(rates.borrow, 0.0);
    }

    // ------------------------------------------------------------------
    // End-to-end scheduler runs
    // ------------------------------------------------------------------

    #[test]
    fn run_assigns_every_node_and_terminates() {
        let dollo = model(ModelConfig {
            borrow_rate: 0.1,
            ..ModelConfig::default()
        });
        let root_state = TraitVector::from_binary_str("11111").unwrap();
        let mut tree = TimedTree::new(root_state.clone());
        let a = tree.add_child(tree.root(), 1.0).unwrap();
        tree.add_child(a, 2.5).unwrap();
        tree.add_child(a, 2.0).unwrap();
        tree.add_child(tree.root(), 3.0).unwrap();

        let mut registry = LengthRegistry::from_vector(&root_state);
        let mut rng = SmallRng::seed_from_u64(12);
        let events = dollo
            .evolve_tree_borrowing(&mut tree, &mut registry, &mut rng)
            .unwrap();

        for node in tree.nodes() {
            assert!(node.state().is_some());
        }
        for event in &events {
            assert!(event.time <= tree.height());
        }
    }

    #[test]
    fn no_borrowing_events_when_rate_is_zero() {
        let dollo = model(ModelConfig::default());
        let root_state = TraitVector::from_binary_str("11111").unwrap();
        let mut tree = two_leaf_tree(root_state.clone(), 5.0, 5.0);

        let mut registry = LengthRegistry::from_vector(&root_state);
        let mut rng = SmallRng::seed_from_u64(21);
        let events = dollo
            .evolve_tree_borrowing(&mut tree, &mut registry, &mut rng)
            .unwrap();

        assert!(
            events
                .iter()
                .all(|event| event.kind != EventKind::Borrowing)
        );
    }

    #[test]
    fn zero_total_rate_terminates_immediately() {
        // No birth pressure and an all-zero root: nothing can ever happen.
        let dollo = model(ModelConfig {
            birth_rate: 0.0,
            death_rate: 0.5,
            ..ModelConfig::default()
        });
        let root_state = TraitVector::all_absent(4);
        let mut tree = two_leaf_tree(root_state.clone(), 5.0, 5.0);

        let mut registry = LengthRegistry::from_vector(&root_state);
        let mut rng = SmallRng::seed_from_u64(2);
        let events = dollo
            .evolve_tree_borrowing(&mut tree, &mut registry, &mut rng)
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn same_seed_same_events() {
        let dollo = model(ModelConfig {
            borrow_rate: 0.2,
            ..ModelConfig::default()
        });
        let root_state = TraitVector::from_binary_str("1111111111").unwrap();

        let run = |seed: u64| {
            let mut tree = two_leaf_tree(root_state.clone(), 4.0, 4.0);
            let mut registry = LengthRegistry::from_vector(&root_state);
            let mut rng = SmallRng::seed_from_u64(seed);
            dollo
                .evolve_tree_borrowing(&mut tree, &mut registry, &mut rng)
                .unwrap()
        };

        assert_eq!(run(77), run(77));
    }

    #[test]
    fn no_empty_trait_holds_in_borrowing_mode() {
        let dollo = model(ModelConfig {
            birth_rate: 0.0,
            death_rate: 0.5,
            no_empty_trait: true,
            ..ModelConfig::default()
        });
        let root_state = TraitVector::from_binary_str("00001").unwrap();
        let mut tree = two_leaf_tree(root_state.clone(), 50.0, 50.0);

        let mut registry = LengthRegistry::from_vector(&root_state);
        let mut rng = SmallRng::seed_from_u64(14);
        dollo
            .evolve_tree_borrowing(&mut tree, &mut registry, &mut rng)
            .unwrap();

        for node in tree.nodes() {
            assert!(node.state().unwrap().count_active() >= 1);
        }
    }

    // ------------------------------------------------------------------
    // Locality
    // ------------------------------------------------------------------

    #[test]
    fn zero_locality_never_rejects() {
        let dollo = model(ModelConfig {
            borrow_rate: 0.1,
            locality: 0.0,
            ..ModelConfig::default()
        });
        let root_state = TraitVector::from_binary_str("1").unwrap();
        let tree = two_leaf_tree(root_state, 2.0, 9.0);
        let leaves = tree.leaves();

        assert!(dollo.is_local(&tree, leaves[0], leaves[1]).unwrap());
    }

    #[test]
    fn siblings_within_bound_are_local() {
        let dollo = model(ModelConfig {
            borrow_rate: 0.1,
            locality: 3.0,
            ..ModelConfig::default()
        });
        let root_state = TraitVector::from_binary_str("1").unwrap();
        // Sibling branches of length 2 and 2.5: both within z = 3.
        let tree = two_leaf_tree(root_state, 2.0, 2.5);
        let leaves = tree.leaves();

        assert!(dollo.is_local(&tree, leaves[0], leaves[1]).unwrap());
    }

    #[test]
    fn long_branches_exceed_bound() {
        let dollo = model(ModelConfig {
            borrow_rate: 0.1,
            locality: 1.0,
            ..ModelConfig::default()
        });
        let root_state = TraitVector::from_binary_str("1").unwrap();
        // Both branches longer than z = 1: the first parent step already
        // exceeds the bound on each side.
        let tree = two_leaf_tree(root_state, 5.0, 4.0);
        let leaves = tree.leaves();

        assert!(!dollo.is_local(&tree, leaves[0], leaves[1]).unwrap());
    }
}
