//! Non-borrowing traversal: every branch simulated independently.
//!
//! Walks the tree breadth-first from the root. For each parent-child edge
//! the branch duration is the depth difference, and the kernel evolves the
//! parent's vector into the child's. There is no shared clock: siblings and
//! unrelated branches never interact, only the length registry is threaded
//! through so later branches absorb births from earlier ones.

use std::collections::{BTreeMap, VecDeque};

use rand::Rng;

use glossogen_tree::{NodeId, TimedTree};
use glossogen_types::MutationLog;

use crate::error::ModelError;
use crate::model::LineageModel;
use crate::registry::LengthRegistry;

/// Assign a trait vector to every node below the root.
///
/// The root must already carry its starting state. Returns the per-branch
/// mutation logs, keyed by the child node of each branch.
///
/// # Errors
///
/// Fails if a visited parent has no assigned state, or on any structural
/// tree error; failures abort the walk.
pub fn evolve_tree<M: LineageModel, R: Rng>(
    model: &M,
    tree: &mut TimedTree,
    registry: &mut LengthRegistry,
    rng: &mut R,
) -> Result<BTreeMap<NodeId, MutationLog>, ModelError> {
    let mut logs = BTreeMap::new();
    let mut queue: VecDeque<NodeId> = VecDeque::from([tree.root()]);

    while let Some(parent) = queue.pop_front() {
        let children: Vec<NodeId> = tree.node(parent)?.children().to_vec();
        for child in children {
            let duration = tree.branch_length(child)?;
            let start = tree.state(parent)?.clone();

            let mut log = MutationLog::new();
            let end = model.mutate_lineage(&start, duration, registry, &mut log, rng)?;
            tree.set_state(child, end)?;

            logs.insert(child, log);
            queue.push_back(child);
        }
    }

    tracing::debug!(
        kernel = model.name(),
        nodes = tree.len(),
        max_length = registry.current_max(),
        "tree walk complete"
    );
    Ok(logs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
