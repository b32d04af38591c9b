//! An [`AigEdge`] points at an [`AigNode`] and can be complemented (indicates the presence of a NOT gate).
//!
//! [`AigNode`]: crate::AigNode

use std::ops::Not;

use super::NodeId;

/// A directed edge representing a fanin for AIG nodes, or any signal built on top of an AIG.
///
/// The edge can carry an inverter according to the value of `complement`.
///
/// For example:
///
/// ```rust
/// use carrycheck::AigEdge;
/// let fanin_false = AigEdge::FALSE;
/// let fanin_true = AigEdge::TRUE;
/// assert_eq!(fanin_false, !fanin_true);
/// assert!(fanin_true.is_cst_true());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AigEdge {
    /// The node the edge is refering to.
    pub(super) node: NodeId,
    /// Set to true if signal should be inverted.
    pub(super) complement: bool,
}

impl Not for AigEdge {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl From<&AigEdge> for (NodeId, bool) {
    fn from(edge: &AigEdge) -> Self {
        (edge.get_node_id(), edge.get_complement())
    }
}

impl AigEdge {
    /// The constant low signal.
    pub const FALSE: AigEdge = AigEdge {
        node: 0,
        complement: false,
    };

    /// The constant high signal.
    pub const TRUE: AigEdge = AigEdge {
        node: 0,
        complement: true,
    };

    pub fn new(node: NodeId, complement: bool) -> Self {
        AigEdge { node, complement }
    }

    /// Constant edge for the given boolean.
    pub fn constant(value: bool) -> Self {
        if value { AigEdge::TRUE } else { AigEdge::FALSE }
    }

    pub fn get_node_id(&self) -> NodeId {
        self.node
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    pub fn is_cst_false(&self) -> bool {
        self.node == 0 && !self.complement
    }

    pub fn is_cst_true(&self) -> bool {
        self.node == 0 && self.complement
    }

    pub fn is_constant(&self) -> bool {
        self.node == 0
    }

    pub fn is_complement_of(&self, other: &AigEdge) -> bool {
        self.node == other.node && self.complement ^ other.complement
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn not_edge_test() {
        let e = AigEdge::new(3, false);
        assert_eq!(!e, AigEdge::new(3, true));
        assert_eq!(!!e, e);
        assert!(e.is_complement_of(&!e));
        assert!(!e.is_complement_of(&e));
    }

    #[test]
    fn constants_test() {
        assert!(AigEdge::FALSE.is_cst_false());
        assert!(AigEdge::TRUE.is_cst_true());
        assert_eq!(AigEdge::constant(true), AigEdge::TRUE);
        assert_eq!(AigEdge::constant(false), AigEdge::FALSE);
        assert!(!AigEdge::new(1, true).is_constant());
        let pair: (NodeId, bool) = (&AigEdge::TRUE).into();
        assert_eq!(pair, (0, true));
    }
}
