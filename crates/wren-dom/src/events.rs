//! UI Events
//!
//! Keyboard and pointer events, listener registrations and the handler
//! trait the dispatcher calls back into.

use crate::{Document, NodeId};

/// Event kinds a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    Click,
}

/// Logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Space,
}

impl Key {
    /// Parse a key name as reported by `KeyboardEvent.key`, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        if name == " " {
            return Some(Self::Space);
        }
        match name.to_ascii_lowercase().as_str() {
            "tab" => Some(Self::Tab),
            "escape" | "esc" => Some(Self::Escape),
            "enter" | "return" => Some(Self::Enter),
            "space" | "spacebar" => Some(Self::Space),
            _ => None,
        }
    }
}

/// A key press with its modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDetail {
    Key(KeyInput),
    Pointer,
}

/// UI event travelling from its target up through the ancestors
#[derive(Debug, Clone)]
pub struct UiEvent {
    pub kind: EventKind,
    pub target: NodeId,
    pub current_target: NodeId,
    pub detail: EventDetail,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl UiEvent {
    /// Create a keydown event
    pub fn key_down(target: NodeId, input: KeyInput) -> Self {
        Self::new(EventKind::KeyDown, target, EventDetail::Key(input))
    }

    /// Create a click event
    pub fn click(target: NodeId) -> Self {
        Self::new(EventKind::Click, target, EventDetail::Pointer)
    }

    fn new(kind: EventKind, target: NodeId, detail: EventDetail) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            detail,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Key payload for keyboard events
    pub fn key_input(&self) -> Option<KeyInput> {
        match self.detail {
            EventDetail::Key(input) => Some(input),
            EventDetail::Pointer => None,
        }
    }

    /// Whether this is a keydown for `key`, ignoring modifiers
    pub fn is_key(&self, key: Key) -> bool {
        self.key_input().is_some_and(|input| input.key == key)
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation to further ancestors
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Handle to a listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use = "a listener stays registered until removed with its id"]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy)]
struct Registration {
    id: ListenerId,
    target: NodeId,
    kind: EventKind,
}

/// Listener registrations in insertion order
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `kind` events reaching `target`
    pub fn add(&mut self, target: NodeId, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration { id, target, kind });
        id
    }

    /// Remove a registration; removing an unknown id is a no-op
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }

    /// Listeners on `target` for `kind`, in registration order
    pub fn matching(&self, target: NodeId, kind: EventKind) -> Vec<ListenerId> {
        self.registrations
            .iter()
            .filter(|r| r.target == target && r.kind == kind)
            .map(|r| r.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// Receives listener invocations during dispatch
pub trait EventHandler {
    fn handle_event(&mut self, doc: &mut Document, listener: ListenerId, event: &mut UiEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Tab"), Some(Key::Tab));
        assert_eq!(Key::from_name("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("tab"), Some(Key::Tab));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("ENTER"), Some(Key::Enter));
        assert_eq!(Key::from_name("x"), None);
        assert_eq!(Key::from_name("F13"), None);
    }

    #[test]
    fn test_registry_order_and_removal() {
        let mut registry = ListenerRegistry::new();
        let a = registry.add(NodeId(1), EventKind::Click);
        let b = registry.add(NodeId(1), EventKind::KeyDown);
        let c = registry.add(NodeId(1), EventKind::Click);

        assert_eq!(registry.matching(NodeId(1), EventKind::Click), vec![a, c]);
        assert_eq!(registry.matching(NodeId(1), EventKind::KeyDown), vec![b]);

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(!registry.contains(a));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_event_flags() {
        let mut event = UiEvent::key_down(NodeId(3), KeyInput::new(Key::Tab).shift());
        assert!(event.is_key(Key::Tab));
        assert_eq!(event.key_input().map(|k| k.shift), Some(true));

        event.prevent_default();
        event.stop_propagation();
        assert!(event.is_default_prevented());
        assert!(event.is_propagation_stopped());

        assert!(UiEvent::click(NodeId(3)).key_input().is_none());
    }
}
