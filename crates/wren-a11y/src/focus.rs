//! Focus Management
//!
//! Which elements take part in sequential (Tab) navigation, and how to step
//! through them.

use wren_dom::{DomTree, ElementData, Node, NodeId};

/// Parsed `tabindex` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Negative value: focusable by script or pointer, skipped by Tab
    NotSequential,
    /// Zero or positive value
    Sequential(i32),
}

impl TabIndex {
    /// Parse an attribute value; non-numeric values count as absent
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Some(Self::NotSequential),
            Ok(n) => Some(Self::Sequential(n)),
            Err(_) => None,
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Computes the ordered focusable set of a container
///
/// The result is never cached: callers rescan whenever they need it, so
/// controls disabled or inserted between two key presses are seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusScanner;

impl FocusScanner {
    /// Focusable descendants of `container` in document order
    ///
    /// The container itself is not part of the set. Unknown or text nodes
    /// yield an empty set.
    pub fn scan(tree: &DomTree, container: NodeId) -> Vec<NodeId> {
        match tree.get(container) {
            Some(node) if node.is_container() => tree
                .descendants(container)
                .filter(|&id| Self::is_focusable(tree, id))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `id` is reachable with Tab
    pub fn is_focusable(tree: &DomTree, id: NodeId) -> bool {
        let Some(element) = tree.get(id).and_then(Node::as_element) else {
            return false;
        };
        if element.attrs.contains("disabled") || is_hidden_from_at(element) {
            return false;
        }
        match element.attrs.get("tabindex").and_then(TabIndex::parse) {
            Some(index) => index.is_sequential(),
            None => is_interactive(element),
        }
    }

    /// Whether `id` may take focus from a pointer or script, Tab order aside
    pub fn accepts_focus(tree: &DomTree, id: NodeId) -> bool {
        let Some(element) = tree.get(id).and_then(Node::as_element) else {
            return false;
        };
        !element.attrs.contains("disabled")
            && (is_interactive(element)
                || element.attrs.get("tabindex").and_then(TabIndex::parse).is_some())
    }

    /// Next stop after `from` in `set`, wrapping at either end
    ///
    /// `set` must be in document order. When `from` is not a member, the
    /// nearest member following (or preceding) it in the document is used.
    pub fn step(tree: &DomTree, set: &[NodeId], from: NodeId, forward: bool) -> Option<NodeId> {
        let (first, last) = (*set.first()?, *set.last()?);
        match set.iter().position(|&id| id == from) {
            Some(index) if forward => Some(set.get(index + 1).copied().unwrap_or(first)),
            Some(0) => Some(last),
            Some(index) => Some(set[index - 1]),
            None if forward => Some(
                set.iter()
                    .copied()
                    .find(|&id| tree.precedes(from, id))
                    .unwrap_or(first),
            ),
            None => Some(
                set.iter()
                    .rev()
                    .copied()
                    .find(|&id| tree.precedes(id, from))
                    .unwrap_or(last),
            ),
        }
    }
}

/// Native controls that are tabbable without a `tabindex`
fn is_interactive(element: &ElementData) -> bool {
    match element.tag.as_str() {
        "a" | "area" => element.attrs.contains("href"),
        "button" | "select" | "textarea" => true,
        "input" => !element
            .attrs
            .get("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
        _ => false,
    }
}

fn is_hidden_from_at(element: &ElementData) -> bool {
    element
        .attrs
        .get("aria-hidden")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wren_dom::Document;

    fn element(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = doc.append_element(parent, tag).unwrap();
        for (name, value) in attrs {
            doc.tree_mut().set_attribute(id, name, value).unwrap();
        }
        id
    }

    #[test]
    fn test_tab_index() {
        assert_eq!(TabIndex::parse("-1"), Some(TabIndex::NotSequential));
        assert_eq!(TabIndex::parse("0"), Some(TabIndex::Sequential(0)));
        assert_eq!(TabIndex::parse(" 5 "), Some(TabIndex::Sequential(5)));
        assert_eq!(TabIndex::parse("abc"), None);
        assert!(!TabIndex::NotSequential.is_sequential());
    }

    #[test]
    fn test_scan_selects_interactive_elements_in_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let dialog = element(&mut doc, body, "div", &[("role", "dialog"), ("tabindex", "-1")]);
        let link = element(&mut doc, dialog, "a", &[("href", "#main")]);
        let _bare_anchor = element(&mut doc, dialog, "a", &[]);
        let wrapper = element(&mut doc, dialog, "div", &[]);
        let input = element(&mut doc, wrapper, "input", &[]);
        let _hidden_input = element(&mut doc, wrapper, "input", &[("type", "hidden")]);
        let select = element(&mut doc, dialog, "select", &[]);
        let textarea = element(&mut doc, dialog, "textarea", &[]);
        let custom = element(&mut doc, dialog, "span", &[("tabindex", "0")]);
        let _plain = element(&mut doc, dialog, "span", &[]);
        let button = element(&mut doc, dialog, "button", &[]);

        assert_eq!(
            FocusScanner::scan(doc.tree(), dialog),
            vec![link, input, select, textarea, custom, button]
        );
    }

    #[test]
    fn test_scan_excludes_disabled_hidden_and_negative_tabindex() {
        let mut doc = Document::new();
        let body = doc.body();
        let container = element(&mut doc, body, "div", &[]);
        let _disabled = element(&mut doc, container, "button", &[("disabled", "")]);
        let _hidden = element(&mut doc, container, "button", &[("aria-hidden", "true")]);
        let _skipped = element(&mut doc, container, "button", &[("tabindex", "-1")]);
        let not_hidden = element(&mut doc, container, "button", &[("aria-hidden", "false")]);

        assert_eq!(FocusScanner::scan(doc.tree(), container), vec![not_hidden]);
    }

    #[test]
    fn test_scan_empty_and_invalid_containers() {
        let mut doc = Document::new();
        let body = doc.body();
        let empty = element(&mut doc, body, "div", &[]);
        let text = doc.tree_mut().create_text("x");

        assert!(FocusScanner::scan(doc.tree(), empty).is_empty());
        assert!(FocusScanner::scan(doc.tree(), text).is_empty());
        assert!(FocusScanner::scan(doc.tree(), NodeId::NONE).is_empty());
    }

    #[test]
    fn test_scan_sees_mutations() {
        let mut doc = Document::new();
        let body = doc.body();
        let container = element(&mut doc, body, "div", &[]);
        let a = element(&mut doc, container, "button", &[]);
        let b = element(&mut doc, container, "button", &[]);
        assert_eq!(FocusScanner::scan(doc.tree(), container), vec![a, b]);

        doc.tree_mut().toggle_attribute(b, "disabled", true).unwrap();
        assert_eq!(FocusScanner::scan(doc.tree(), container), vec![a]);
    }

    #[test]
    fn test_step_wraps_around() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = element(&mut doc, body, "button", &[]);
        let b = element(&mut doc, body, "button", &[]);
        let c = element(&mut doc, body, "button", &[]);
        let set = [a, b, c];
        let tree = doc.tree();

        assert_eq!(FocusScanner::step(tree, &set, a, true), Some(b));
        assert_eq!(FocusScanner::step(tree, &set, c, true), Some(a));
        assert_eq!(FocusScanner::step(tree, &set, a, false), Some(c));
        assert_eq!(FocusScanner::step(tree, &set, b, false), Some(a));
        assert_eq!(FocusScanner::step(tree, &[], a, true), None);
    }

    #[test]
    fn test_step_from_outside_the_set() {
        let mut doc = Document::new();
        let body = doc.body();
        let before = element(&mut doc, body, "p", &[]);
        let a = element(&mut doc, body, "button", &[]);
        let middle = element(&mut doc, body, "p", &[]);
        let b = element(&mut doc, body, "button", &[]);
        let set = [a, b];
        let tree = doc.tree();

        assert_eq!(FocusScanner::step(tree, &set, before, true), Some(a));
        assert_eq!(FocusScanner::step(tree, &set, before, false), Some(b));
        assert_eq!(FocusScanner::step(tree, &set, middle, true), Some(b));
        assert_eq!(FocusScanner::step(tree, &set, middle, false), Some(a));
    }

    #[test]
    fn test_accepts_focus() {
        let mut doc = Document::new();
        let body = doc.body();
        let dialog = element(&mut doc, body, "div", &[("tabindex", "-1")]);
        let plain = element(&mut doc, body, "div", &[]);
        let disabled = element(&mut doc, body, "button", &[("disabled", "")]);

        assert!(FocusScanner::accepts_focus(doc.tree(), dialog));
        assert!(!FocusScanner::is_focusable(doc.tree(), dialog));
        assert!(!FocusScanner::accepts_focus(doc.tree(), plain));
        assert!(!FocusScanner::accepts_focus(doc.tree(), disabled));
    }
}
