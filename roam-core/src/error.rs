use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown vertex id {0}")]
    NotFound(NodeId),
    #[error("Spatial index contains no points")]
    EmptyIndex,
    #[error("No path exists between the snapped endpoints")]
    Unreachable,
    #[error("Vertices {0} and {1} share no way")]
    NoSharedWay(NodeId, NodeId),
    #[error("Instruction text does not match the expected format: {0:?}")]
    MalformedInstruction(String),
}
