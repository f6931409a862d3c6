use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::NodeId;

/// A user record as embedded in a graph node and as returned to callers.
///
/// The store may hand back an empty `id` inside the embedded record; callers
/// always receive the user through [`GraphNode::user`](crate::GraphNode::user),
/// which fills it from the enclosing node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: NodeId,
    pub name: String,
}

impl User {
    /// A user that has not been stored yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::default(),
            name: name.into(),
        }
    }
}

/// Reject names that are empty or whitespace only.
pub fn validate_name(name: &str) -> Result<(), TypeError> {
    if name.trim().is_empty() {
        return Err(TypeError::BlankName);
    }
    Ok(())
}
