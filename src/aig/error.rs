use thiserror::Error;

use super::NodeId;

/// Error returned when an AIG operation failed.
#[derive(Debug, Error)]
pub enum AigError {
    /// The node with given id does not exist.
    #[error("node with id={0} does not exist")]
    NodeDoesNotExist(NodeId),

    /// The id 0 is reserved for the `False` constant node only.
    #[error("id=0 is for node False only")]
    IdZeroButNotFalse,

    /// Simulation needs a value for every input of the AIG.
    #[error("input with id={0} has no assigned value")]
    UnassignedInput(NodeId),

    /// The AIG has reached an invalid state. This should never happen.
    /// For example, node `nodes[id]` should have id `id`.
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),
}
