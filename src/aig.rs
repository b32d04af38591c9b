//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`AigEdge`] and some others relevant structs.
//!
//! Every symbolic value of this crate is lowered to an AIG, see [`crate::bitvec`].
//! To start proving combinational equivalence, check [`crate::miter::Miter`] docs.

pub mod dfs;
pub mod dot;
pub mod edge;
pub mod error;
mod integrity;
pub mod node;

use std::collections::HashMap;

pub use edge::AigEdge;
pub use error::AigError;
pub use node::{AigNode, NodeId};

use crate::Result;

/// A whole AIG.
///
/// Nodes are stored in an append-only arena, the id of a node being its position in the arena.
/// As a node can only be created from already existing nodes, ids are a topological order.
/// Nothing is ever rewritten: building a new signal always returns a new (or an already existing,
/// structurally identical) edge, the previous ones stay valid.
///
/// The builder methods [`and`], [`or`] and [`xor`] perform constant propagation and structural hashing
/// (also known as *strashing*), so building the same gate twice returns the same node.
///
/// [`and`]: Aig::and
/// [`or`]: Aig::or
/// [`xor`]: Aig::xor
#[derive(Debug, Clone)]
pub struct Aig {
    nodes: Vec<AigNode>,
    inputs: Vec<NodeId>,
    input_names: HashMap<NodeId, String>,
    /// Maps the (ordered) fanins of every and gate to its id.
    strash: HashMap<(AigEdge, AigEdge), NodeId>,
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

impl Aig {
    /// Create a brand new AIG (constant node [`AigNode::False`] included).
    pub fn new() -> Self {
        Aig {
            nodes: vec![AigNode::False],
            inputs: Vec::new(),
            input_names: HashMap::new(),
            strash: HashMap::new(),
        }
    }

    /// Retrieves a node from its id.
    pub fn get_node(&self, id: NodeId) -> Option<&AigNode> {
        self.nodes.get(usize::try_from(id).ok()?)
    }

    /// Number of nodes, constant node included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true, the constant node always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of and gates.
    pub fn and_count(&self) -> usize {
        self.nodes.len() - self.inputs.len() - 1
    }

    /// Iterates over the nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &AigNode> {
        self.nodes.iter()
    }

    /// Retrieves inputs id, in creation order.
    pub fn get_inputs_id(&self) -> &[NodeId] {
        &self.inputs
    }

    /// The name given to an input when it was created.
    pub fn get_input_name(&self, id: NodeId) -> Option<&str> {
        self.input_names.get(&id).map(String::as_str)
    }

    fn next_id(&self) -> NodeId {
        self.nodes.len() as NodeId
    }

    fn check_edge(&self, edge: AigEdge) -> Result<()> {
        if self.get_node(edge.get_node_id()).is_none() {
            return Err(AigError::NodeDoesNotExist(edge.get_node_id()).into());
        }
        Ok(())
    }

    /// Create a new primary input and returns the (non complemented) edge pointing at it.
    pub fn add_input(&mut self, name: impl Into<String>) -> AigEdge {
        let id = self.next_id();
        self.nodes.push(AigNode::Input(id));
        self.inputs.push(id);
        self.input_names.insert(id, name.into());
        AigEdge::new(id, false)
    }

    /// Returns an edge for `a AND b`, creating an and gate only if needed.
    ///
    /// ```rust
    /// use carrycheck::{Aig, AigEdge};
    /// let mut aig = Aig::new();
    /// let i1 = aig.add_input("i1");
    /// let i2 = aig.add_input("i2");
    ///
    /// // Constants and trivial cases are folded
    /// assert_eq!(aig.and(i1, AigEdge::TRUE).unwrap(), i1);
    /// assert_eq!(aig.and(i1, !i1).unwrap(), AigEdge::FALSE);
    ///
    /// // Structurally identical gates are shared
    /// let g = aig.and(i1, i2).unwrap();
    /// assert_eq!(aig.and(i2, i1).unwrap(), g);
    /// assert_eq!(aig.and_count(), 1);
    ///
    /// // Edges must point at existing nodes
    /// assert!(aig.and(i1, AigEdge::new(42, false)).is_err());
    /// ```
    pub fn and(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        self.check_edge(a)?;
        self.check_edge(b)?;

        if a.is_cst_false() || b.is_cst_false() || a.is_complement_of(&b) {
            return Ok(AigEdge::FALSE);
        }
        if a.is_cst_true() || a == b {
            return Ok(b);
        }
        if b.is_cst_true() {
            return Ok(a);
        }

        // Same ordering as AigNode::and, so the strash key is canonical
        let key = if a.get_node_id() < b.get_node_id() {
            (b, a)
        } else {
            (a, b)
        };
        if let Some(&existing) = self.strash.get(&key) {
            return Ok(AigEdge::new(existing, false));
        }

        let id = self.next_id();
        self.strash.insert(key, id);
        self.nodes.push(AigNode::and(id, key.0, key.1));
        Ok(AigEdge::new(id, false))
    }

    /// Returns an edge for `a OR b`, ie `NOT(NOT a AND NOT b)`.
    pub fn or(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        Ok(!self.and(!a, !b)?)
    }

    /// Returns an edge for `a XOR b`, ie `(a AND NOT b) OR (NOT a AND b)`.
    pub fn xor(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        let l = self.and(a, !b)?;
        let r = self.and(!a, b)?;
        self.or(l, r)
    }

    /// Evaluates every node of the AIG for the given input values.
    ///
    /// The returned vector is indexed by node id, use [`Aig::edge_value`] to read an edge from it.
    /// Every input of the AIG must be assigned.
    pub fn simulate(&self, assignment: &HashMap<NodeId, bool>) -> Result<Vec<bool>> {
        let mut values = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let value = match node {
                AigNode::False => false,
                AigNode::Input(id) => *assignment
                    .get(id)
                    .ok_or(AigError::UnassignedInput(*id))?,
                AigNode::And { fanin0, fanin1, .. } => {
                    Self::edge_value(&values, *fanin0)? && Self::edge_value(&values, *fanin1)?
                }
            };
            values.push(value);
        }
        Ok(values)
    }

    /// Reads the value of an edge from the result of [`Aig::simulate`].
    pub fn edge_value(values: &[bool], edge: AigEdge) -> Result<bool> {
        let id = edge.get_node_id();
        let value = usize::try_from(id)
            .ok()
            .and_then(|i| values.get(i))
            .ok_or(AigError::NodeDoesNotExist(id))?;
        Ok(*value ^ edge.get_complement())
    }
}
