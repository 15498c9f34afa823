use std::fmt;
use strata_core::NodeId;

/// Misuse of the layout tree APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// The node has no measurement for the real pass yet.
    NotMeasured(NodeId),
    /// The node has no measurement for the lookahead pass yet.
    LookaheadNotMeasured(NodeId),
    NodeNotFound(NodeId),
    /// `index` is past the last child of `parent`.
    ChildIndexOutOfRange { parent: NodeId, index: usize },
    Detached(NodeId),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NotMeasured(id) => write!(f, "node {id} has not been measured"),
            LayoutError::LookaheadNotMeasured(id) => {
                write!(f, "node {id} has not been measured in the lookahead pass")
            }
            LayoutError::NodeNotFound(id) => write!(f, "node {id} not found"),
            LayoutError::ChildIndexOutOfRange { parent, index } => {
                write!(f, "node {parent} has no child at index {index}")
            }
            LayoutError::Detached(id) => write!(f, "node {id} is not attached to a layout tree"),
        }
    }
}

impl std::error::Error for LayoutError {}
