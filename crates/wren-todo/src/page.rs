//! Page Building Helpers
//!
//! Shared by the to-do page and the login page.

use wren_dom::{Document, NodeId};

use crate::TodoError;

/// Create `tag` under `parent` with attributes and optional text
pub(crate) fn element(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    attrs: &[(&str, &str)],
    text: Option<&str>,
) -> Result<NodeId, TodoError> {
    let id = doc.append_element(parent, tag)?;
    let tree = doc.tree_mut();
    for (name, value) in attrs {
        tree.set_attribute(id, name, value)?;
    }
    if let Some(text) = text {
        tree.set_text_content(id, text)?;
    }
    Ok(id)
}

/// Current value of a text field
pub(crate) fn field_value(doc: &Document, input: NodeId) -> String {
    doc.tree().attribute(input, "value").unwrap_or_default().to_string()
}

/// Short description of the focused element, e.g. `button "Add"`
pub fn describe_focus(doc: &Document) -> String {
    let tree = doc.tree();
    let id = doc.active_element();
    let mut out = tree.tag_name(id).unwrap_or("#node").to_string();
    if let Some(element_id) = tree.attribute(id, "id") {
        out.push('#');
        out.push_str(element_id);
    }
    if let Some(role) = tree.attribute(id, "role") {
        out.push_str(&format!("[role={role}]"));
    }
    if let Some(action) = tree.attribute(id, "data-action") {
        let item = tree.ancestors(id).find_map(|a| tree.attribute(a, "data-id"));
        out.push_str(&format!(" ({action} item {})", item.unwrap_or("?")));
    }
    if matches!(tree.tag_name(id), Some("button" | "a")) {
        out.push_str(&format!(" \"{}\"", tree.text_content(id)));
    }
    out
}
