//! Random binary tree growth for experiments and tests.
//!
//! Grows a tree level by level from the root: every current leaf receives
//! two children whose shared branch length is drawn from an exponential
//! distribution with the given `branch_rate`. Growth stops once the leaf
//! count reaches `leaf_target`, so the result has at least `leaf_target`
//! leaves (the last doubling may overshoot).

use rand::Rng;

use glossogen_types::TraitVector;

use crate::error::TreeError;
use crate::timed_tree::{NodeId, TimedTree};

/// Grow a random binary tree with at least `leaf_target` leaves.
///
/// The root sits at depth 0 with `root_state` attached; all other nodes are
/// left unassigned for the engine to populate. Both children of a parent
/// share one drawn branch length, so sibling leaves are contemporaneous.
///
/// # Errors
///
/// Returns [`TreeError::InvalidBranchRate`] if `branch_rate` is not a
/// positive finite number.
pub fn grow_random<R: Rng>(
    rng: &mut R,
    root_state: TraitVector,
    leaf_target: usize,
    branch_rate: f64,
) -> Result<TimedTree, TreeError> {
    if !(branch_rate.is_finite() && branch_rate > 0.0) {
        return Err(TreeError::InvalidBranchRate { rate: branch_rate });
    }

    let mut tree = TimedTree::new(root_state);
    let mut frontier = vec![tree.root()];

    while frontier.len() < leaf_target {
        let mut next: Vec<NodeId> = Vec::with_capacity(frontier.len().saturating_mul(2));
        for parent in frontier {
            let parent_depth = tree.node(parent)?.depth();
            let length = exponential_branch_length(rng, branch_rate);
            let depth = parent_depth + length;
            next.push(tree.add_child(parent, depth)?);
            next.push(tree.add_child(parent, depth)?);
        }
        frontier = next;
    }

    Ok(tree)
}

/// Draw a branch length from Exponential(`rate`) by inverse transform.
///
/// Rate parametrization: the mean is `1 / rate`.
fn exponential_branch_length<R: Rng>(rng: &mut R, rate: f64) -> f64 {
    let u: f64 = rng.random();
    -(1.0 - u).ln() / rate
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
