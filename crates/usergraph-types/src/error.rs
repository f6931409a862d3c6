use thiserror::Error;

use crate::id::NodeId;

/// Errors produced by node model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("node {0} cannot be connected to itself")]
    SelfLoop(NodeId),

    #[error("user name must not be blank")]
    BlankName,

    #[error("node id must not be empty")]
    EmptyId,
}
