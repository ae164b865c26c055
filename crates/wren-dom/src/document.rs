//! Document - High-level document API
//!
//! Owns the tree, the focused element and the listener registry, and
//! delivers events along the target's ancestor path.

use crate::{
    DomError, DomTree, EventHandler, EventKind, ListenerId, ListenerRegistry, NodeId, UiEvent,
};

/// UI document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    html_element: NodeId,
    body_element: NodeId,
    focused: Option<NodeId>,
    listeners: ListenerRegistry,
}

impl Document {
    /// Create a document with `<html><body>` in place
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_child(tree.root(), "html");
        let body = tree.create_child(html, "body");

        Self {
            tree,
            html_element: html,
            body_element: body,
            focused: None,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Create an element and append it under `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.tree.create_element(tag);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find_by_id(id)
    }

    /// Explicitly focused element, if it is still in the document
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|&id| self.tree.is_connected(id))
    }

    /// Element that receives keyboard input: the focused element or `<body>`
    pub fn active_element(&self) -> NodeId {
        self.focused().unwrap_or(self.body_element)
    }

    /// Move focus to `id`
    ///
    /// Fails for detached nodes, non-elements and disabled controls, leaving
    /// focus where it was.
    pub fn focus(&mut self, id: NodeId) -> bool {
        let focusable = self.tree.is_connected(id)
            && self.tree.get(id).is_some_and(|n| n.is_element())
            && !self.tree.has_attribute(id, "disabled");
        if focusable {
            tracing::trace!("focus -> {}", id);
            self.focused = Some(id);
        } else {
            tracing::trace!("focus({}) refused", id);
        }
        focusable
    }

    /// Drop focus back to the body
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Listener registrations
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Register a listener on a node of this document
    pub fn add_listener(&mut self, target: NodeId, kind: EventKind) -> Result<ListenerId, DomError> {
        if self.tree.get(target).is_none() {
            return Err(DomError::UnknownNode(target));
        }
        Ok(self.listeners.add(target, kind))
    }

    /// Unregister a listener; unknown ids are ignored
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Deliver `event` to listeners on its target and then each ancestor
    ///
    /// Listeners removed by an earlier handler in the same dispatch are
    /// skipped. Returns `false` when a listener prevented the default action.
    pub fn dispatch(&mut self, event: &mut UiEvent, handler: &mut dyn EventHandler) -> bool {
        let mut path = vec![event.target];
        path.extend(self.tree.ancestors(event.target));

        for node in path {
            event.current_target = node;
            for listener in self.listeners.matching(node, event.kind) {
                if self.listeners.contains(listener) {
                    handler.handle_event(self, listener, event);
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event.current_target = event.target;
        !event.is_default_prevented()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Key, KeyInput};

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(ListenerId, NodeId)>,
        stop_at: Option<ListenerId>,
        remove: Option<ListenerId>,
    }

    impl EventHandler for Recorder {
        fn handle_event(&mut self, doc: &mut Document, listener: ListenerId, event: &mut UiEvent) {
            self.seen.push((listener, event.current_target));
            if self.stop_at == Some(listener) {
                event.stop_propagation();
                event.prevent_default();
            }
            if let Some(other) = self.remove.take() {
                doc.remove_listener(other);
            }
        }
    }

    #[test]
    fn test_document_structure() {
        let doc = Document::new();
        assert_eq!(doc.tree().tag_name(doc.body()), Some("body"));
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.tree().parent(doc.document_element()), Some(doc.tree().root()));
        assert_eq!(doc.tree().len(), 3);
        assert_eq!(doc.active_element(), doc.body());
    }

    #[test]
    fn test_focus_rules() {
        let mut doc = Document::new();
        let body = doc.body();
        let button = doc.append_element(body, "button").unwrap();
        let disabled = doc.append_element(body, "button").unwrap();
        doc.tree_mut().set_attribute(disabled, "disabled", "").unwrap();
        let detached = doc.tree_mut().create_element("input");

        assert!(doc.focus(button));
        assert!(!doc.focus(disabled));
        assert!(!doc.focus(detached));
        assert_eq!(doc.active_element(), button);

        doc.tree_mut().remove_child(body, button).unwrap();
        assert_eq!(doc.focused(), None);
        assert_eq!(doc.active_element(), body);
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.append_element(body, "div").unwrap();
        let button = doc.append_element(div, "button").unwrap();

        let on_button = doc.add_listener(button, EventKind::Click).unwrap();
        let on_div = doc.add_listener(div, EventKind::Click).unwrap();
        let on_root = doc.add_listener(doc.tree().root(), EventKind::Click).unwrap();
        let _key = doc.add_listener(div, EventKind::KeyDown).unwrap();

        let mut recorder = Recorder::default();
        let mut event = UiEvent::click(button);
        assert!(doc.dispatch(&mut event, &mut recorder));
        assert_eq!(
            recorder.seen,
            vec![(on_button, button), (on_div, div), (on_root, doc.tree().root())]
        );
    }

    #[test]
    fn test_stop_propagation_and_prevent_default() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.append_element(body, "div").unwrap();
        let input = doc.append_element(div, "input").unwrap();
        let on_div = doc.add_listener(div, EventKind::KeyDown).unwrap();
        let _on_body = doc.add_listener(body, EventKind::KeyDown).unwrap();

        let mut recorder = Recorder {
            stop_at: Some(on_div),
            ..Default::default()
        };
        let mut event = UiEvent::key_down(input, KeyInput::new(Key::Tab));
        assert!(!doc.dispatch(&mut event, &mut recorder));
        assert_eq!(recorder.seen, vec![(on_div, div)]);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_is_skipped() {
        let mut doc = Document::new();
        let body = doc.body();
        let first = doc.add_listener(body, EventKind::Click).unwrap();
        let second = doc.add_listener(body, EventKind::Click).unwrap();

        let mut recorder = Recorder {
            remove: Some(second),
            ..Default::default()
        };
        doc.dispatch(&mut UiEvent::click(body), &mut recorder);
        assert_eq!(recorder.seen, vec![(first, body)]);
        assert!(!doc.remove_listener(second));
    }

    #[test]
    fn test_add_listener_unknown_node() {
        let mut doc = Document::new();
        let bogus = NodeId(999);
        assert_eq!(
            doc.add_listener(bogus, EventKind::Click),
            Err(DomError::UnknownNode(bogus))
        );
    }
}
