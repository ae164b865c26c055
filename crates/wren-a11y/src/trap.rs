//! Focus Trap
//!
//! Keeps Tab and Shift+Tab cycling inside one container.

use wren_dom::{Document, EventKind, Key, ListenerId, Node, NodeId, UiEvent};

use crate::{A11yError, FocusScanner};

/// Keyboard focus trap scoped to a container
///
/// While active, a keydown listener sits on the container. Tab from the
/// last focusable element wraps to the first and Shift+Tab from the first
/// wraps to the last; moves between the two ends are left to the default
/// sequential navigation.
#[derive(Debug, Default)]
pub struct FocusTrap {
    container: Option<NodeId>,
    listener: Option<ListenerId>,
}

impl FocusTrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start trapping focus in `container`
    ///
    /// Does not move focus. Activating again on the same container is a
    /// no-op; activating on another container while active is an error.
    pub fn activate(&mut self, doc: &mut Document, container: NodeId) -> Result<(), A11yError> {
        if let Some(active) = self.container {
            if active == container {
                tracing::debug!("focus trap already active on {}", container);
                return Ok(());
            }
            return Err(A11yError::TrapAlreadyActive {
                active,
                requested: container,
            });
        }

        let is_element = doc.tree().get(container).is_some_and(Node::is_element);
        if !is_element || !doc.tree().is_connected(container) {
            return Err(A11yError::MissingContainer(container));
        }

        let listener = doc.add_listener(container, EventKind::KeyDown)?;
        self.container = Some(container);
        self.listener = Some(listener);
        tracing::debug!("focus trap active on {}", container);
        Ok(())
    }

    /// Stop trapping; safe to call when inactive
    pub fn deactivate(&mut self, doc: &mut Document) {
        if let Some(listener) = self.listener.take() {
            doc.remove_listener(listener);
        }
        if let Some(container) = self.container.take() {
            tracing::debug!("focus trap released from {}", container);
        }
    }

    pub fn is_active(&self) -> bool {
        self.container.is_some()
    }

    /// Container currently trapping focus
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Whether `listener` is this trap's keydown registration
    pub fn owns(&self, listener: ListenerId) -> bool {
        self.listener == Some(listener)
    }

    /// React to a keydown that reached the container
    pub fn handle_key(&self, doc: &mut Document, event: &mut UiEvent) {
        let Some(container) = self.container else {
            return;
        };
        let Some(input) = event.key_input() else {
            return;
        };
        if input.key != Key::Tab {
            return;
        }

        // Rescan on every press: the dialog content may have changed.
        let focusables = FocusScanner::scan(doc.tree(), container);
        let (Some(&first), Some(&last)) = (focusables.first(), focusables.last()) else {
            // Nothing to cycle through; hold focus where it is.
            event.prevent_default();
            return;
        };

        let active = doc.active_element();
        let wrap_to = match focusables.iter().position(|&id| id == active) {
            Some(0) if input.shift => Some(last),
            Some(index) if !input.shift && index == focusables.len() - 1 => Some(first),
            Some(_) => None,
            // Focus rests on the container or a non-tabbable descendant.
            None => FocusScanner::step(doc.tree(), &focusables, active, !input.shift),
        };

        if let Some(target) = wrap_to {
            event.prevent_default();
            doc.focus(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wren_dom::{EventHandler, KeyInput};

    struct TrapOnly<'a>(&'a FocusTrap);

    impl EventHandler for TrapOnly<'_> {
        fn handle_event(&mut self, doc: &mut Document, listener: ListenerId, event: &mut UiEvent) {
            if self.0.owns(listener) {
                self.0.handle_key(doc, event);
            }
        }
    }

    fn setup(count: usize) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let container = doc.append_element(body, "div").unwrap();
        doc.tree_mut().set_attribute(container, "tabindex", "-1").unwrap();
        let buttons = (0..count)
            .map(|_| doc.append_element(container, "button").unwrap())
            .collect();
        (doc, container, buttons)
    }

    fn tab(doc: &mut Document, trap: &FocusTrap, shift: bool) -> bool {
        let mut input = KeyInput::new(Key::Tab);
        if shift {
            input = input.shift();
        }
        let mut event = UiEvent::key_down(doc.active_element(), input);
        doc.dispatch(&mut event, &mut TrapOnly(trap))
    }

    #[test]
    fn test_activate_registers_one_listener() {
        let (mut doc, container, _) = setup(2);
        let mut trap = FocusTrap::new();
        trap.activate(&mut doc, container).unwrap();
        trap.activate(&mut doc, container).unwrap();

        assert!(trap.is_active());
        assert_eq!(doc.listeners().matching(container, EventKind::KeyDown).len(), 1);

        trap.deactivate(&mut doc);
        trap.deactivate(&mut doc);
        assert!(!trap.is_active());
        assert!(doc.listeners().is_empty());
    }

    #[test]
    fn test_activate_errors() {
        let (mut doc, container, _) = setup(1);
        let mut trap = FocusTrap::new();

        let detached = doc.tree_mut().create_element("div");
        assert_eq!(
            trap.activate(&mut doc, detached),
            Err(A11yError::MissingContainer(detached))
        );
        assert_eq!(
            trap.activate(&mut doc, NodeId::NONE),
            Err(A11yError::MissingContainer(NodeId::NONE))
        );

        trap.activate(&mut doc, container).unwrap();
        let other = doc.append_element(doc.body(), "div").unwrap();
        assert_eq!(
            trap.activate(&mut doc, other),
            Err(A11yError::TrapAlreadyActive {
                active: container,
                requested: other
            })
        );
        assert_eq!(trap.container(), Some(container));
    }

    #[test]
    fn test_tab_wraps_from_last_to_first() {
        let (mut doc, container, buttons) = setup(3);
        let mut trap = FocusTrap::new();
        trap.activate(&mut doc, container).unwrap();

        doc.focus(buttons[2]);
        assert!(!tab(&mut doc, &trap, false));
        assert_eq!(doc.active_element(), buttons[0]);

        assert!(!tab(&mut doc, &trap, true));
        assert_eq!(doc.active_element(), buttons[2]);
    }

    #[test]
    fn test_middle_elements_use_default_order() {
        let (mut doc, container, buttons) = setup(3);
        let mut trap = FocusTrap::new();
        trap.activate(&mut doc, container).unwrap();

        doc.focus(buttons[1]);
        assert!(tab(&mut doc, &trap, false));
        assert!(tab(&mut doc, &trap, true));
        assert_eq!(doc.active_element(), buttons[1]);
    }

    #[test]
    fn test_empty_and_single_element_containers() {
        let (mut doc, container, _) = setup(0);
        let mut trap = FocusTrap::new();
        trap.activate(&mut doc, container).unwrap();
        doc.focus(container);
        assert!(!tab(&mut doc, &trap, false));
        assert!(!tab(&mut doc, &trap, true));
        assert_eq!(doc.active_element(), container);

        let (mut doc, container, buttons) = setup(1);
        let mut trap = FocusTrap::new();
        trap.activate(&mut doc, container).unwrap();
        doc.focus(buttons[0]);
        assert!(!tab(&mut doc, &trap, false));
        assert_eq!(doc.active_element(), buttons[0]);
        assert!(!tab(&mut doc, &trap, true));
        assert_eq!(doc.active_element(), buttons[0]);
    }

    #[test]
    fn test_focus_on_container_enters_the_cycle() {
        let (mut doc, container, buttons) = setup(2);
        let mut trap = FocusTrap::new();
        trap.activate(&mut doc, container).unwrap();

        doc.focus(container);
        tab(&mut doc, &trap, true);
        assert_eq!(doc.active_element(), buttons[1]);

        doc.focus(container);
        tab(&mut doc, &trap, false);
        assert_eq!(doc.active_element(), buttons[0]);
    }

    #[test]
    fn test_other_keys_pass_through() {
        let (mut doc, container, buttons) = setup(2);
        let mut trap = FocusTrap::new();
        trap.activate(&mut doc, container).unwrap();
        doc.focus(buttons[1]);

        let mut event = UiEvent::key_down(buttons[1], KeyInput::new(Key::Enter));
        assert!(doc.dispatch(&mut event, &mut TrapOnly(&trap)));
        assert_eq!(doc.active_element(), buttons[1]);
    }

    #[test]
    fn test_inactive_trap_ignores_keys() {
        let (mut doc, container, buttons) = setup(2);
        let mut trap = FocusTrap::new();
        trap.activate(&mut doc, container).unwrap();
        trap.deactivate(&mut doc);

        doc.focus(buttons[1]);
        assert!(tab(&mut doc, &trap, false));
        assert_eq!(doc.active_element(), buttons[1]);
    }
}
