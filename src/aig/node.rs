use super::AigEdge;

/// A node id.
///
/// The constant node [`AigNode::False`] has id 0 by convention. Ids are also the position of the
/// node in the AIG arena, so a node can only refer to nodes with a smaller id.
pub type NodeId = u64;

/// An AIG node.
///
/// Each node has an id. By convention, id for constant node `False` is 0. The id must be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AigNode {
    /// The constant low/false signal.
    False,
    /// A primary input.
    Input(NodeId),
    /// An AND gate with two fanins.
    ///
    /// Fanins are ordered so that `fanin0` refers to a node with an id greater or equal to the
    /// one of `fanin1`, like in the AIGER format.
    And {
        id: NodeId,
        fanin0: AigEdge,
        fanin1: AigEdge,
    },
}

impl AigNode {
    /// Create an and gate, fanins are swapped if needed to respect the fanin ordering.
    pub fn and(id: NodeId, fanin0: AigEdge, fanin1: AigEdge) -> Self {
        if fanin0.get_node_id() < fanin1.get_node_id() {
            AigNode::And {
                id,
                fanin0: fanin1,
                fanin1: fanin0,
            }
        } else {
            AigNode::And {
                id,
                fanin0,
                fanin1,
            }
        }
    }

    pub fn get_id(&self) -> NodeId {
        match self {
            AigNode::False => 0,
            AigNode::Input(id) => *id,
            AigNode::And { id, .. } => *id,
        }
    }

    pub fn is_false(&self) -> bool {
        matches!(self, AigNode::False)
    }

    pub fn is_input(&self) -> bool {
        matches!(self, AigNode::Input(_))
    }

    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And { .. })
    }

    /// Returns the fanins of the node (empty for constants and inputs).
    pub fn get_fanins(&self) -> Vec<AigEdge> {
        match self {
            AigNode::And { fanin0, fanin1, .. } => vec![*fanin0, *fanin1],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn and_orders_fanins_test() {
        let a = AigEdge::new(1, false);
        let b = AigEdge::new(2, true);
        let n = AigNode::and(3, a, b);
        assert_eq!(n.get_fanins(), vec![b, a]);
        assert_eq!(n, AigNode::and(3, b, a));
        assert_eq!(n.get_id(), 3);
        assert!(n.is_and());
    }

    #[test]
    fn leaves_have_no_fanins_test() {
        assert!(AigNode::False.get_fanins().is_empty());
        assert!(AigNode::Input(4).get_fanins().is_empty());
        assert_eq!(AigNode::False.get_id(), 0);
        assert!(AigNode::False.is_false());
        assert!(AigNode::Input(4).is_input());
    }
}
