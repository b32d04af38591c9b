use super::{Aig, AigError, AigNode, NodeId};
use crate::Result;

impl Aig {
    /// Checking if the AIG structure is correct:
    /// - only node 0 is the constant `False`
    /// - every node id is its position in the arena
    /// - every and gate only refers to nodes created before it, with $id(z) \gt id(a) \geq id(b)$
    /// - every registered input is an input node.
    ///
    /// The builder methods are supposed to maintain these at any moment, this is checked before
    /// encoding a miter anyway.
    pub fn check_integrity(&self) -> Result<()> {
        match self.nodes.first() {
            Some(AigNode::False) => (),
            _ => {
                return Err(AigError::InvalidState("node 0 is not the constant".to_string()).into());
            }
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let id = node.get_id();
            if id != index as NodeId {
                return Err(AigError::InvalidState(format!(
                    "incoherent node id : {} in arena vs {} in node",
                    index, id
                ))
                .into());
            }
            self.check_node_integrity(node)?;
        }

        for &id in &self.inputs {
            match self.get_node(id) {
                Some(AigNode::Input(_)) => (),
                Some(_) => {
                    return Err(AigError::InvalidState(format!(
                        "input {} refers to a node which is not an input",
                        id
                    ))
                    .into());
                }
                None => return Err(AigError::NodeDoesNotExist(id).into()),
            }
        }

        Ok(())
    }

    fn check_node_integrity(&self, node: &AigNode) -> Result<()> {
        match node {
            AigNode::False => Ok(()),
            AigNode::Input(id) => {
                if *id == 0 {
                    return Err(AigError::IdZeroButNotFalse.into());
                }
                Ok(())
            }
            AigNode::And {
                id, fanin0, fanin1, ..
            } => {
                if *id == 0 {
                    return Err(AigError::IdZeroButNotFalse.into());
                }
                let i0 = fanin0.get_node_id();
                let i1 = fanin1.get_node_id();
                if *id <= i0 {
                    return Err(AigError::InvalidState(format!(
                        "id of parent {} should be strictly larger than its fanin0 {}",
                        id, i0
                    ))
                    .into());
                }
                if i0 < i1 {
                    return Err(AigError::InvalidState(format!(
                        "(parent {}) id of fanin0 {} should be superior or equal to fanin1 {}",
                        id, i0, i1
                    ))
                    .into());
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Aig, AigEdge, AigNode};

    #[test]
    fn built_aig_is_valid_test() {
        let mut aig = Aig::new();
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let x = aig.xor(a, b).unwrap();
        let _ = aig.or(x, !a).unwrap();
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn forward_reference_is_invalid_test() {
        let mut aig = Aig::new();
        let a = aig.add_input("a");
        // Manually pushing a gate that refers to itself
        aig.nodes.push(AigNode::And {
            id: 2,
            fanin0: AigEdge::new(2, false),
            fanin1: a,
        });
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn wrong_id_is_invalid_test() {
        let mut aig = Aig::new();
        aig.nodes.push(AigNode::Input(5));
        assert!(aig.check_integrity().is_err());
    }
}
