//! Event Dispatch
//!
//! Delivers input to the focused element and runs the platform default
//! action afterwards unless a listener prevented it.

use wren_dom::{Document, EventHandler, Key, KeyInput, NodeId, UiEvent};

use crate::FocusScanner;

/// Press a key on the active element
///
/// Default actions: Tab and Shift+Tab move through the document's focusable
/// elements (wrapping at the ends). Enter activates a button or link with a
/// click, Space only a button.
pub fn press_key(doc: &mut Document, input: KeyInput, handler: &mut dyn EventHandler) -> UiEvent {
    let target = doc.active_element();
    let mut event = UiEvent::key_down(target, input);
    if !doc.dispatch(&mut event, handler) {
        return event;
    }

    match input.key {
        Key::Tab => {
            let sequence = FocusScanner::scan(doc.tree(), doc.tree().root());
            if let Some(next) = FocusScanner::step(doc.tree(), &sequence, target, !input.shift) {
                doc.focus(next);
            }
        }
        Key::Enter | Key::Space if activates_on(doc, target, input.key) => {
            activate(doc, target, handler);
        }
        _ => {}
    }
    event
}

/// Click `target` with a pointer
///
/// Focus moves to the target first when it accepts focus, as pointer-down
/// precedes the click.
pub fn click(doc: &mut Document, target: NodeId, handler: &mut dyn EventHandler) -> UiEvent {
    if FocusScanner::accepts_focus(doc.tree(), target) {
        doc.focus(target);
    }
    activate(doc, target, handler)
}

fn activates_on(doc: &Document, target: NodeId, key: Key) -> bool {
    let tree = doc.tree();
    match tree.tag_name(target) {
        Some("button") => !tree.has_attribute(target, "disabled"),
        Some("a") => key == Key::Enter && tree.has_attribute(target, "href"),
        _ => false,
    }
}

fn activate(doc: &mut Document, target: NodeId, handler: &mut dyn EventHandler) -> UiEvent {
    let mut event = UiEvent::click(target);
    if doc.tree().has_attribute(target, "disabled") {
        tracing::trace!("click on disabled {} dropped", target);
        return event;
    }
    doc.dispatch(&mut event, handler);
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use wren_dom::{EventKind, ListenerId};

    #[derive(Default)]
    struct Clicks(Vec<NodeId>);

    impl EventHandler for Clicks {
        fn handle_event(&mut self, _doc: &mut Document, _listener: ListenerId, event: &mut UiEvent) {
            if event.kind == EventKind::Click {
                self.0.push(event.target);
            }
        }
    }

    fn page() -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append_element(body, "input").unwrap();
        let b = doc.append_element(body, "button").unwrap();
        let c = doc.append_element(body, "button").unwrap();
        (doc, vec![a, b, c])
    }

    #[test]
    fn test_tab_walks_the_document() {
        let (mut doc, ids) = page();
        let mut handler = Clicks::default();

        press_key(&mut doc, KeyInput::new(Key::Tab), &mut handler);
        assert_eq!(doc.active_element(), ids[0]);
        press_key(&mut doc, KeyInput::new(Key::Tab), &mut handler);
        assert_eq!(doc.active_element(), ids[1]);
        press_key(&mut doc, KeyInput::new(Key::Tab).shift(), &mut handler);
        assert_eq!(doc.active_element(), ids[0]);
        press_key(&mut doc, KeyInput::new(Key::Tab).shift(), &mut handler);
        assert_eq!(doc.active_element(), ids[2]);
    }

    #[test]
    fn test_enter_on_button_clicks() {
        let (mut doc, ids) = page();
        let _listener = doc.add_listener(ids[1], EventKind::Click).unwrap();
        let mut handler = Clicks::default();

        doc.focus(ids[1]);
        press_key(&mut doc, KeyInput::new(Key::Enter), &mut handler);
        press_key(&mut doc, KeyInput::new(Key::Space), &mut handler);
        assert_eq!(handler.0, vec![ids[1], ids[1]]);

        doc.focus(ids[0]);
        press_key(&mut doc, KeyInput::new(Key::Enter), &mut handler);
        assert_eq!(handler.0.len(), 2);
    }

    #[test]
    fn test_enter_follows_link_space_does_not() {
        let (mut doc, _) = page();
        let body = doc.body();
        let link = doc.append_element(body, "a").unwrap();
        doc.tree_mut().set_attribute(link, "href", "#main").unwrap();
        let _listener = doc.add_listener(link, EventKind::Click).unwrap();
        let mut handler = Clicks::default();

        doc.focus(link);
        press_key(&mut doc, KeyInput::new(Key::Space), &mut handler);
        assert!(handler.0.is_empty());
        press_key(&mut doc, KeyInput::new(Key::Enter), &mut handler);
        assert_eq!(handler.0, vec![link]);
    }

    #[test]
    fn test_click_focuses_and_dispatches() {
        let (mut doc, ids) = page();
        let body = doc.body();
        let _listener = doc.add_listener(body, EventKind::Click).unwrap();
        let mut handler = Clicks::default();

        click(&mut doc, ids[2], &mut handler);
        assert_eq!(doc.active_element(), ids[2]);
        assert_eq!(handler.0, vec![ids[2]]);

        // Non-focusable targets leave focus alone
        click(&mut doc, body, &mut handler);
        assert_eq!(doc.active_element(), ids[2]);
    }

    #[test]
    fn test_disabled_button_ignores_click() {
        let (mut doc, ids) = page();
        doc.tree_mut().toggle_attribute(ids[1], "disabled", true).unwrap();
        let _listener = doc.add_listener(ids[1], EventKind::Click).unwrap();
        let mut handler = Clicks::default();

        click(&mut doc, ids[1], &mut handler);
        assert!(handler.0.is_empty());
        assert_eq!(doc.focused(), None);
    }
}
