//! Provides a DFS visitor to allow simple AIG traversal.
//!
//! See [`Dfs`] for details.
//!
//! [`Dfs`]: Dfs

use std::collections::HashSet;

use super::{Aig, AigEdge, AigNode, NodeId};

/// A simple DFS visitor.
///
/// Nodes are yielded in preorder. You can:
/// - start a DFS from a node using [`from_node`]
/// - or visit the cone of several signals using [`from_edges`].
///
/// In the latter case, it will start by the fanin of the first signal,
/// then explore all non-previously-explored nodes from the fanin of the second signal,
/// and so on until all the signals have been processed.
///
/// [`from_node`]: Dfs::from_node
/// [`from_edges`]: Dfs::from_edges
///
/// Example:
///
/// ```rust
/// use carrycheck::{Aig, dfs::Dfs};
/// let mut aig = Aig::new();
/// let a = aig.add_input("a");
/// let b = aig.add_input("b");
/// let z = aig.and(a, !b).unwrap();
/// let mut dfs = Dfs::from_edges(&[z]);
/// let mut visited = 0;
/// while let Some(_node) = dfs.next(&aig) {
///     visited += 1;
/// }
/// assert_eq!(visited, 3);
/// ```
///
/// Inspired by [petgraph DFS](https://docs.rs/petgraph/latest/petgraph/visit/struct.Dfs.html).
pub struct Dfs {
    /// Must maintain the following invariant:
    /// - all nodes on the stack have not been visited yet
    /// - their `seen` flag is set to true to avoid adding them one more time to the stack
    /// - the different signals from which to start a DFS are in starts
    ///   (they might have been visited already by the time we start the DFS from them,
    ///   and will simply be discarded if that's the case).
    stack: Vec<NodeId>,
    seen: HashSet<NodeId>,
    starts: Vec<NodeId>,
}

impl Dfs {
    /// Create a DFS from the initial start node.
    /// You will only browse the fanin of this node.
    pub fn from_node(start: NodeId) -> Self {
        Dfs {
            stack: vec![start],
            seen: HashSet::from([start]),
            starts: Vec::new(),
        }
    }

    /// Create a DFS from the nodes pointed at by the given edges, in order.
    pub fn from_edges(edges: &[AigEdge]) -> Self {
        let mut starts: Vec<NodeId> = edges.iter().rev().map(|e| e.get_node_id()).collect();
        match starts.pop() {
            None => Dfs {
                stack: Vec::new(),
                seen: HashSet::new(),
                starts,
            },
            Some(start_id) => Dfs {
                stack: vec![start_id],
                seen: HashSet::from([start_id]),
                starts,
            },
        }
    }

    /// Returns true if we are ready to start again! Else false, we are done.
    /// Should only be called when stack is empty (ie we are done with the current fanin).
    fn new_start(&mut self) -> bool {
        while let Some(id) = self.starts.pop() {
            if self.seen.insert(id) {
                self.stack.push(id);
                return true;
            }
        }
        false
    }

    /// Yield the next node of the DFS, or None if it is done.
    /// Ids that do not belong to `aig` are skipped.
    pub fn next<'a>(&mut self, aig: &'a Aig) -> Option<&'a AigNode> {
        loop {
            while let Some(id) = self.stack.pop() {
                let Some(node) = aig.get_node(id) else {
                    continue;
                };
                for child in node.get_fanins() {
                    let child_id = child.get_node_id();
                    if self.seen.insert(child_id) {
                        self.stack.push(child_id);
                    }
                }
                return Some(node);
            }

            // Maybe we can start from a different signal?
            if !self.new_start() {
                return None;
            }
        }
    }
}
