//! wren DOM - UI tree
//!
//! Arena-allocated node tree with attributes, document focus and
//! event dispatch. This is the surface the accessibility layer walks.

mod attributes;
mod document;
mod events;
mod node;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use document::Document;
pub use events::{
    EventDetail, EventHandler, EventKind, Key, KeyInput, ListenerId, ListenerRegistry, UiEvent,
};
pub use node::{ElementData, Node, NodeData};
pub use tree::{Ancestors, Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for a missing link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}

/// DOM error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Cannot insert {child} under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}
