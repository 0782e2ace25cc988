//! The timed tree arena: nodes with depths, parents, children, and states.
//!
//! Nodes live in a contiguous arena and are addressed by [`NodeId`] indices.
//! Depth is elapsed time since the root and is monotonically non-decreasing
//! from root to leaves; the difference between a child's depth and its
//! parent's depth is the branch's time length.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use glossogen_types::TraitVector;

use crate::error::TreeError;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Arena index of a node in a [`TimedTree`].
///
/// Identifiers are only meaningful for the tree that produced them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(usize);

impl NodeId {
    /// Construct an identifier from a raw arena index.
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Return the raw arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TimedNode
// ---------------------------------------------------------------------------

/// One node of a timed tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedNode {
    /// This node's identifier.
    id: NodeId,
    /// Elapsed time since the root.
    depth: f64,
    /// The parent node, `None` for the root.
    parent: Option<NodeId>,
    /// Child nodes, in insertion order.
    children: Vec<NodeId>,
    /// The attached trait vector, once assigned.
    state: Option<TraitVector>,
}

impl TimedNode {
    /// Return this node's identifier.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Return the elapsed time since the root.
    pub const fn depth(&self) -> f64 {
        self.depth
    }

    /// Return the parent, `None` for the root.
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Return the attached state, if one has been assigned.
    pub const fn state(&self) -> Option<&TraitVector> {
        self.state.as_ref()
    }
}

// ---------------------------------------------------------------------------
// TimedTree
// ---------------------------------------------------------------------------

/// A rooted timed tree with trait-vector states attached to nodes.
///
/// The tree always contains at least the root, created at depth 0 with its
/// starting state. The engine assigns states to the remaining nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedTree {
    /// All nodes; index 0 is the root.
    nodes: Vec<TimedNode>,
}

impl TimedTree {
    /// Create a tree holding only the root, at depth 0, with `root_state`.
    pub fn new(root_state: TraitVector) -> Self {
        let root = TimedNode {
            id: NodeId::from_index(0),
            depth: 0.0,
            parent: None,
            children: Vec::new(),
            state: Some(root_state),
        };
        Self { nodes: vec![root] }
    }

    /// Return the root's identifier.
    pub const fn root(&self) -> NodeId {
        NodeId::from_index(0)
    }

    /// Return the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` if the tree holds no nodes. Construction always
    /// creates the root, so this only reports `true` for a default-like
    /// deserialized value.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child below `parent` at absolute depth `depth`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `parent` is not in the tree,
    /// [`TreeError::NonFiniteDepth`] if `depth` is NaN or infinite, and
    /// [`TreeError::DepthInversion`] if `depth` is above the parent's depth.
    /// A zero-length branch (equal depths) is allowed.
    pub fn add_child(&mut self, parent: NodeId, depth: f64) -> Result<NodeId, TreeError> {
        if !depth.is_finite() {
            return Err(TreeError::NonFiniteDepth { depth });
        }
        let parent_depth = self.node(parent)?.depth;
        if depth < parent_depth {
            return Err(TreeError::DepthInversion {
                parent,
                parent_depth,
                depth,
            });
        }

        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(TimedNode {
            id,
            depth,
            parent: Some(parent),
            children: Vec::new(),
            state: None,
        });
        if let Some(node) = self.nodes.get_mut(parent.index()) {
            node.children.push(id);
        }
        Ok(id)
    }

    /// Return the node with identifier `id`.
    pub fn node(&self, id: NodeId) -> Result<&TimedNode, TreeError> {
        self.nodes.get(id.index()).ok_or(TreeError::UnknownNode(id))
    }

    /// Return the attached state of node `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StateUnassigned`] if the node has no state yet.
    pub fn state(&self, id: NodeId) -> Result<&TraitVector, TreeError> {
        self.node(id)?
            .state
            .as_ref()
            .ok_or(TreeError::StateUnassigned(id))
    }

    /// Assign (or replace) the state of node `id`.
    pub fn set_state(&mut self, id: NodeId, state: TraitVector) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode(id))?;
        node.state = Some(state);
        Ok(())
    }

    /// Return the time length of the branch above node `id` (0 for the root).
    pub fn branch_length(&self, id: NodeId) -> Result<f64, TreeError> {
        let node = self.node(id)?;
        match node.parent {
            Some(parent) => Ok(node.depth - self.node(parent)?.depth),
            None => Ok(0.0),
        }
    }

    /// Return the identifiers of all leaves, in arena order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.is_leaf())
            .map(TimedNode::id)
            .collect()
    }

    /// Return the tree height: the maximum depth over all nodes.
    pub fn height(&self) -> f64 {
        self.nodes
            .iter()
            .map(TimedNode::depth)
            .fold(0.0, f64::max)
    }

    /// Return all descendants of `id` (excluding `id` itself), in
    /// breadth-first order. Iterative, so arbitrarily deep trees are safe.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut result = Vec::new();
        let mut queue: VecDeque<NodeId> = self.node(id)?.children.iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            result.push(current);
            queue.extend(self.node(current)?.children.iter().copied());
        }
        Ok(result)
    }

    /// Assign a copy of `state` to node `id` and to every descendant.
    ///
    /// The whole future clade of the target node is overwritten with the
    /// target's new state. This is a deliberate modeling approximation: the
    /// global event scheduler recomputes the alive frontier from scratch at
    /// every step, so nodes below the frontier must always present a
    /// consistent ancestral state even though they have not been visited
    /// individually yet.
    pub fn set_subtree_state(&mut self, id: NodeId, state: &TraitVector) -> Result<(), TreeError> {
        let descendants = self.descendants(id)?;
        self.set_state(id, state.clone())?;
        for descendant in descendants {
            self.set_state(descendant, state.clone())?;
        }
        Ok(())
    }

    /// Return the frontier of lineages alive at time `t`.
    ///
    /// Descends from the root: a child whose depth is at or past `t` is
    /// collected, otherwise its own children are examined. A childless root
    /// is its own frontier. Iterative with an explicit queue.
    pub fn alive_at(&self, t: f64) -> Vec<NodeId> {
        let root = self.root();
        let root_children = self
            .nodes
            .first()
            .map(|node| node.children.clone())
            .unwrap_or_default();
        if root_children.is_empty() {
            return vec![root];
        }

        let mut alive = Vec::new();
        let mut queue: VecDeque<NodeId> = root_children.into_iter().collect();
        while let Some(current) = queue.pop_front() {
            let Ok(node) = self.node(current) else {
                continue;
            };
            if node.depth >= t {
                alive.push(current);
            } else {
                queue.extend(node.children.iter().copied());
            }
        }
        alive
    }

    /// Iterate over all nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &TimedNode> {
        self.nodes.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
