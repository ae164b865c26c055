//! DOM Node
//!
//! Nodes link to each other through `NodeId` indices instead of pointers,
//! so the whole tree lives in one arena `Vec`.

use crate::{NamedNodeMap, NodeId};

/// One slot in the tree arena
#[derive(Debug)]
pub struct Node {
    /// `NodeId::NONE` for the document node and detached subtrees
    pub parent: NodeId,
    pub first_child: NodeId,
    /// Kept so appends never walk the sibling chain
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Detached element with no attributes
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Detached text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// The document (arena slot 0)
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Whether this node may hold children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Character data of a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// What a node holds
#[derive(Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

/// Tag and attributes of an element
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes
    pub attrs: NamedNodeMap,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: NamedNodeMap::new(),
        }
    }

    /// Value of the `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }
}
