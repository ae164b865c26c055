//! DOM Tree (arena-based allocation)

use crate::{DomError, Node, NodeId};

/// Arena-based DOM tree
///
/// Slot 0 always holds the document node. Removed nodes stay in the arena
/// detached, so stale IDs never alias a different node.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.push(Node::text(content))
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.get(parent).ok_or(DomError::UnknownNode(parent))?;
        if self.get(child).is_none() {
            return Err(DomError::UnknownNode(child));
        }
        if !parent_node.is_container() || child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.link(parent, child);
        Ok(())
    }

    /// Create an element and make it the last child of `parent`
    ///
    /// `parent` must be a container already in the arena.
    pub(crate) fn create_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create_element(tag);
        self.link(parent, child);
        child
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.unlink(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Detach `child` from `parent`; the subtree stays in the arena
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let node = self.get(child).ok_or(DomError::UnknownNode(child))?;
        if node.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }
        self.unlink(child);
        Ok(())
    }

    /// Remove every child of `id`
    pub fn clear_children(&mut self, id: NodeId) -> Result<(), DomError> {
        if self.get(id).is_none() {
            return Err(DomError::UnknownNode(id));
        }
        while let Some(child) = self.first_child(id) {
            self.unlink(child);
        }
        Ok(())
    }

    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Parent of `id`, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.first_child).filter(|c| c.is_valid())
    }

    /// Direct children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// All descendants of `id` in document (pre-order) order, `id` excluded
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            scope: id,
            next: self.first_child(id),
        }
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Inclusive containment: true when `node == ancestor` or lies below it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if self.get(node).is_none() {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether `id` is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    /// Pre-order successor of `id` without leaving `scope`
    fn following_within(&self, scope: NodeId, id: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(id) {
            return Some(child);
        }
        let mut current = id;
        while current != scope {
            let node = self.get(current)?;
            if node.next_sibling.is_valid() {
                return Some(node.next_sibling);
            }
            current = node.parent;
            if !current.is_valid() {
                return None;
            }
        }
        None
    }

    /// True when `a` comes before `b` in document order
    pub fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        for id in self.descendants(NodeId::ROOT) {
            if id == a {
                return self.is_connected(b);
            }
            if id == b {
                return false;
            }
        }
        false
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    /// Attribute value of an element
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.attrs.get(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.attrs.set(name, value);
        Ok(())
    }

    /// Remove an attribute; returns whether it was present
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        Ok(self.element_mut(id)?.attrs.remove(name).is_some())
    }

    /// Set or clear a boolean attribute such as `disabled`
    pub fn toggle_attribute(&mut self, id: NodeId, name: &str, on: bool) -> Result<(), DomError> {
        self.element_mut(id)?.attrs.toggle(name, Some(on));
        Ok(())
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut crate::ElementData, DomError> {
        self.get_mut(id)
            .ok_or(DomError::UnknownNode(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Replace the children of `id` with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.clear_children(id)?;
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// First connected element whose `id` attribute equals `element_id`
    pub fn find_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(NodeId::ROOT).find(|&id| {
            self.get(id)
                .and_then(Node::as_element)
                .and_then(|e| e.id())
                == Some(element_id)
        })
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self
            .tree
            .get(current)
            .map(|n| n.next_sibling)
            .filter(|s| s.is_valid());
        Some(current)
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    scope: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.following_within(self.scope, current);
        Some(current)
    }
}

/// Iterator walking up the parent chain
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
