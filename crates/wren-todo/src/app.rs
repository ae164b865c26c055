//! To-do Page
//!
//! Builds the to-do page in a `Document`, routes listener invocations to
//! page actions, and owns the clear-completed confirmation dialog.

use std::collections::BTreeMap;

use wren_a11y::{
    click, press_key, CloseReason, DialogController, DialogHost, DialogParts, LiveAnnouncer,
    Politeness,
};
use wren_dom::{
    Document, DomTree, EventHandler, EventKind, Key, KeyInput, ListenerId, NodeId, UiEvent,
};

use crate::page::{describe_focus, element, field_value};
use crate::{AppConfig, Filter, Todo, TodoError, TodoList, TodoStore};

const CLEAR_TITLE_ID: &str = "clear-title";

/// What a page listener does when invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageAction {
    SkipToMain,
    Submit,
    OpenClearDialog,
    Filter(Filter),
    /// Delegated handler for the controls inside each list item
    Items,
}

/// Long-lived page elements
#[derive(Debug, Clone, Copy)]
struct PageNodes {
    skip_link: NodeId,
    main: NodeId,
    input: NodeId,
    add: NodeId,
    filters: [NodeId; 3],
    clear: NodeId,
    list: NodeId,
}

/// Page state reachable from listeners and dialog callbacks
struct TodoHost {
    list: TodoList,
    store: TodoStore,
    live: LiveAnnouncer,
    nodes: PageNodes,
    actions: Vec<(ListenerId, PageAction)>,
    /// Items in edit mode and their drafts
    editing: BTreeMap<u64, String>,
    /// Dialog subtree; built on first open, detached while closed
    dialog_parts: Option<DialogParts>,
}

/// Listener routing: dialog listeners first, then page actions
struct Handlers<'a> {
    dialog: &'a mut DialogController,
    host: &'a mut TodoHost,
}

impl EventHandler for Handlers<'_> {
    fn handle_event(&mut self, doc: &mut Document, listener: ListenerId, event: &mut UiEvent) {
        if self.dialog.handle_event(doc, listener, event, &mut *self.host) {
            return;
        }
        let Some(action) = self.host.action_of(listener) else {
            return;
        };
        let result = match action {
            PageAction::SkipToMain => {
                event.prevent_default();
                doc.focus(self.host.nodes.main);
                Ok(())
            }
            PageAction::Submit => {
                if event.kind == EventKind::KeyDown && !event.is_key(Key::Enter) {
                    return;
                }
                event.prevent_default();
                self.host.submit(doc)
            }
            PageAction::OpenClearDialog => self.host.open_clear_dialog(doc, self.dialog),
            PageAction::Filter(filter) => self.host.set_filter(doc, filter),
            PageAction::Items => self.host.item_event(doc, event),
        };
        if let Err(err) = result {
            tracing::warn!("page action {:?} failed: {}", action, err);
        }
    }
}

fn edit_input_id(id: u64) -> String {
    format!("edit-{id}")
}

/// Id of the list item holding `node`
fn item_of(tree: &DomTree, node: NodeId) -> Option<u64> {
    tree.ancestors(node)
        .find_map(|a| tree.attribute(a, "data-id").and_then(|v| v.parse().ok()))
}

/// Control with `data-action="{action}"` inside the rendered item `id`
fn item_control(doc: &Document, id: u64, action: &str) -> Option<NodeId> {
    let li = doc.get_element_by_id(&format!("todo-{id}"))?;
    let tree = doc.tree();
    tree.descendants(li)
        .find(|&d| tree.attribute(d, "data-action") == Some(action))
}

impl TodoHost {
    fn action_of(&self, listener: ListenerId) -> Option<PageAction> {
        self.actions
            .iter()
            .find(|(id, _)| *id == listener)
            .map(|(_, action)| *action)
    }

    fn listen(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        kind: EventKind,
        action: PageAction,
    ) -> Result<(), TodoError> {
        let listener = doc.add_listener(target, kind)?;
        self.actions.push((listener, action));
        Ok(())
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(self.list.items()) {
            tracing::warn!("could not save items to {}: {}", self.store.path().display(), err);
        }
    }

    fn announce(&mut self, doc: &mut Document, message: impl Into<String>) -> Result<(), TodoError> {
        self.live.announce_fresh(message);
        self.live.render(doc)?;
        Ok(())
    }

    /// Add the new-item input's value and keep focus in the input
    fn submit(&mut self, doc: &mut Document) -> Result<(), TodoError> {
        let draft = field_value(doc, self.nodes.input);
        let Some(text) = self.list.add(&draft).map(|t| t.text.clone()) else {
            tracing::debug!("blank draft ignored");
            return Ok(());
        };
        doc.tree_mut().set_attribute(self.nodes.input, "value", "")?;
        self.persist();
        tracing::info!("added {:?}", text);
        self.announce(doc, format!("Added “{text}”."))?;
        self.render(doc)?;
        doc.focus(self.nodes.input);
        Ok(())
    }

    fn toggle(&mut self, doc: &mut Document, id: u64) -> Result<(), TodoError> {
        let completed = self.list.toggle(id).ok_or(TodoError::UnknownItem(id))?;
        self.persist();
        tracing::info!("item {} completed={}", id, completed);
        self.render(doc)
    }

    fn delete(&mut self, doc: &mut Document, id: u64) -> Result<(), TodoError> {
        let removed = self.list.remove(id);
        if removed.is_some() {
            self.persist();
        }
        let text = removed.map_or_else(|| "item".to_string(), |t| t.text);
        tracing::info!("deleted item {}", id);
        self.announce(doc, format!("Deleted “{text}”."))?;
        self.render(doc)
    }

    fn edit(&mut self, doc: &mut Document, id: u64, draft: &str) -> Result<(), TodoError> {
        self.list.edit(id, draft).ok_or(TodoError::UnknownItem(id))?;
        self.editing.remove(&id);
        self.persist();
        self.announce(doc, "Edited item.")?;
        self.render(doc)
    }

    /// Switch an item to edit mode with its text as the draft
    fn start_edit(&mut self, doc: &mut Document, id: u64) -> Result<(), TodoError> {
        let text = self.list.get(id).ok_or(TodoError::UnknownItem(id))?.text.clone();
        self.editing.insert(id, text);
        self.render(doc)?;
        if let Some(input) = doc.get_element_by_id(&edit_input_id(id)) {
            doc.focus(input);
        }
        Ok(())
    }

    /// Leave edit mode, saving the draft when `commit` is set
    ///
    /// Focus returns to the item's Edit button.
    fn finish_edit(&mut self, doc: &mut Document, id: u64, commit: bool) -> Result<(), TodoError> {
        let draft = self.editing.remove(&id).unwrap_or_default();
        if commit {
            self.edit(doc, id, &draft)?;
        } else {
            tracing::debug!("edit of item {} cancelled", id);
            self.render(doc)?;
        }
        if let Some(button) = item_control(doc, id, "edit") {
            doc.focus(button);
        }
        Ok(())
    }

    /// Item whose edit input is `node`
    fn editing_item(&self, doc: &Document, node: NodeId) -> Option<u64> {
        let tree = doc.tree();
        if tree.attribute(node, "data-action") != Some("edit-input") {
            return None;
        }
        item_of(tree, node).filter(|id| self.editing.contains_key(id))
    }

    fn set_filter(&mut self, doc: &mut Document, filter: Filter) -> Result<(), TodoError> {
        self.list.set_filter(filter);
        self.render(doc)
    }

    /// Clicks and keys inside the list
    fn item_event(&mut self, doc: &mut Document, event: &mut UiEvent) -> Result<(), TodoError> {
        let tree = doc.tree();
        let Some(action) = tree.attribute(event.target, "data-action").map(str::to_string) else {
            return Ok(());
        };
        let Some(id) = item_of(tree, event.target) else {
            return Ok(());
        };

        match (event.kind, action.as_str()) {
            (EventKind::Click, "toggle") => self.toggle(doc, id),
            (EventKind::KeyDown, "toggle") if event.is_key(Key::Space) => {
                event.prevent_default();
                self.toggle(doc, id)
            }
            (EventKind::Click, "edit") => self.start_edit(doc, id),
            (EventKind::Click, "delete") => self.delete(doc, id),
            (EventKind::Click, "save") => self.finish_edit(doc, id, true),
            (EventKind::Click, "cancel-edit") => self.finish_edit(doc, id, false),
            (EventKind::KeyDown, "edit-input") if event.is_key(Key::Enter) => {
                event.prevent_default();
                self.finish_edit(doc, id, true)
            }
            (EventKind::KeyDown, "edit-input") if event.is_key(Key::Escape) => {
                self.finish_edit(doc, id, false)
            }
            _ => Ok(()),
        }
    }

    /// Attach the dialog subtree and open it
    fn open_clear_dialog(
        &mut self,
        doc: &mut Document,
        dialog: &mut DialogController,
    ) -> Result<(), TodoError> {
        if dialog.is_open() {
            return Ok(());
        }
        let parts = self.attach_dialog(doc)?;
        if let Err(err) = dialog.open(doc, parts, None) {
            self.detach_dialog(doc);
            return Err(err.into());
        }
        tracing::info!("clear-completed dialog opened");
        Ok(())
    }

    fn attach_dialog(&mut self, doc: &mut Document) -> Result<DialogParts, TodoError> {
        let Some(parts) = self.dialog_parts else {
            let parts = build_clear_dialog(doc)?;
            self.dialog_parts = Some(parts);
            return Ok(parts);
        };
        let body = doc.body();
        doc.tree_mut().append_child(body, parts.backdrop)?;
        Ok(parts)
    }

    fn detach_dialog(&mut self, doc: &mut Document) {
        let Some(parts) = self.dialog_parts else {
            return;
        };
        if let Some(parent) = doc.tree().parent(parts.backdrop) {
            if let Err(err) = doc.tree_mut().remove_child(parent, parts.backdrop) {
                tracing::warn!("could not remove dialog: {}", err);
            }
        }
    }

    /// Identity of the focused list control, if focus is inside the list
    fn focused_item_control(&self, doc: &Document) -> Option<(u64, String)> {
        let focused = doc.focused()?;
        let tree = doc.tree();
        if !tree.contains(self.nodes.list, focused) {
            return None;
        }
        let action = tree.attribute(focused, "data-action")?.to_string();
        Some((item_of(tree, focused)?, action))
    }

    /// Rebuild the list and sync control state with the model
    ///
    /// Replaced list nodes stay detached in the arena, so every render
    /// grows it by the size of the visible list.
    fn render(&mut self, doc: &mut Document) -> Result<(), TodoError> {
        let restore = self.focused_item_control(doc);
        let nodes = self.nodes;
        let list = &self.list;
        self.editing.retain(|id, _| list.get(*id).is_some());

        doc.tree_mut().clear_children(nodes.list)?;
        let visible = self.list.visible();
        for todo in &visible {
            self.render_item(doc, todo)?;
        }
        if visible.is_empty() {
            element(doc, nodes.list, "li", &[("class", "empty")], Some("No items in this view."))?;
        }

        let current = self.list.filter();
        for (button, filter) in nodes.filters.into_iter().zip(Filter::ALL) {
            let selected = filter == current;
            let tree = doc.tree_mut();
            tree.set_attribute(button, "aria-pressed", if selected { "true" } else { "false" })?;
            tree.set_attribute(button, "class", if selected { "chip selected" } else { "chip" })?;
        }
        doc.tree_mut()
            .toggle_attribute(nodes.clear, "disabled", !self.list.has_completed())?;
        self.live.render(doc)?;

        if let Some((id, action)) = restore {
            match item_control(doc, id, &action) {
                Some(control) => doc.focus(control),
                None => doc.focus(nodes.input),
            };
        }
        Ok(())
    }

    /// `<li>` with checkbox and text, then Edit/Delete or the edit row
    fn render_item(&self, doc: &mut Document, todo: &Todo) -> Result<(), TodoError> {
        let id = todo.id.to_string();
        let li_id = format!("todo-{id}");
        let li = element(
            doc,
            self.nodes.list,
            "li",
            &[("id", li_id.as_str()), ("class", "li"), ("data-id", id.as_str())],
            None,
        )?;
        let label = element(doc, li, "label", &[("class", "checkbox")], None)?;
        let checked = if todo.completed { "true" } else { "false" };
        let checkbox = element(
            doc,
            label,
            "input",
            &[("type", "checkbox"), ("aria-checked", checked), ("data-action", "toggle")],
            None,
        )?;
        doc.tree_mut().toggle_attribute(checkbox, "checked", todo.completed)?;
        let class = if todo.completed { "done" } else { "" };
        element(doc, label, "span", &[("class", class)], Some(todo.text.as_str()))?;

        let actions = element(doc, li, "div", &[("class", "item-actions")], None)?;
        let Some(draft) = self.editing.get(&todo.id) else {
            element(doc, actions, "button", &[("type", "button"), ("data-action", "edit")], Some("Edit"))?;
            element(
                doc,
                actions,
                "button",
                &[("type", "button"), ("data-action", "delete")],
                Some("Delete"),
            )?;
            return Ok(());
        };
        let row = element(doc, actions, "div", &[("class", "edit-row")], None)?;
        let input_id = edit_input_id(todo.id);
        element(
            doc,
            row,
            "label",
            &[("for", input_id.as_str()), ("class", "sr-only")],
            Some("Edit task"),
        )?;
        element(
            doc,
            row,
            "input",
            &[("id", input_id.as_str()), ("value", draft.as_str()), ("data-action", "edit-input")],
            None,
        )?;
        element(doc, row, "button", &[("type", "button"), ("data-action", "save")], Some("Save"))?;
        element(
            doc,
            row,
            "button",
            &[("type", "button"), ("data-action", "cancel-edit")],
            Some("Cancel"),
        )?;
        Ok(())
    }
}

impl DialogHost for TodoHost {
    fn on_confirm(&mut self, doc: &mut Document) {
        let removed = self.list.clear_completed();
        self.persist();
        tracing::info!("cleared {} completed items", removed);
        if let Err(err) = self.announce(doc, "Cleared completed items.").and_then(|()| self.render(doc)) {
            tracing::warn!("could not update page after clearing: {}", err);
        }
    }

    fn on_close(&mut self, doc: &mut Document, reason: CloseReason) {
        self.detach_dialog(doc);
        // The invoker is disabled once nothing is completed.
        if doc.focused().is_none() {
            doc.focus(self.nodes.input);
        }
        tracing::info!("clear-completed dialog closed ({})", reason);
    }
}

/// Backdrop, dialog, title, text and the Confirm/Cancel pair
fn build_clear_dialog(doc: &mut Document) -> Result<DialogParts, TodoError> {
    let body = doc.body();
    let backdrop = element(doc, body, "div", &[("class", "backdrop"), ("role", "presentation")], None)?;
    let modal = element(
        doc,
        backdrop,
        "div",
        &[
            ("class", "modal"),
            ("role", "dialog"),
            ("aria-modal", "true"),
            ("aria-labelledby", CLEAR_TITLE_ID),
            ("tabindex", "-1"),
        ],
        None,
    )?;
    let content = element(doc, modal, "div", &[("class", "modal-body")], None)?;
    element(doc, content, "h3", &[("id", CLEAR_TITLE_ID)], Some("Clear all completed?"))?;
    element(doc, content, "p", &[], Some("This action will remove all completed items."))?;
    let actions = element(doc, modal, "div", &[("class", "modal-actions")], None)?;
    let confirm = element(doc, actions, "button", &[("type", "button")], Some("Confirm"))?;
    let cancel = element(doc, actions, "button", &[("type", "button")], Some("Cancel"))?;

    Ok(DialogParts::new(backdrop, modal)
        .with_confirm(confirm)
        .with_cancel(cancel))
}

/// The to-do page and its dialog
pub struct TodoApp {
    doc: Document,
    dialog: DialogController,
    host: TodoHost,
}

impl TodoApp {
    /// Build the page from configuration, loading saved items
    pub fn new(config: &AppConfig) -> Result<Self, TodoError> {
        Self::with_store(TodoStore::new(config.storage_path.clone()), config.politeness()?)
    }

    pub fn with_store(store: TodoStore, politeness: Politeness) -> Result<Self, TodoError> {
        let list = TodoList::from_items(store.load());
        let mut doc = Document::new();
        let nodes = build_page(&mut doc)?;

        let mut host = TodoHost {
            list,
            store,
            live: LiveAnnouncer::new(politeness),
            nodes,
            actions: Vec::new(),
            editing: BTreeMap::new(),
            dialog_parts: None,
        };
        host.live.mount(&mut doc)?;

        host.listen(&mut doc, nodes.skip_link, EventKind::Click, PageAction::SkipToMain)?;
        host.listen(&mut doc, nodes.input, EventKind::KeyDown, PageAction::Submit)?;
        host.listen(&mut doc, nodes.add, EventKind::Click, PageAction::Submit)?;
        for (button, filter) in nodes.filters.into_iter().zip(Filter::ALL) {
            host.listen(&mut doc, button, EventKind::Click, PageAction::Filter(filter))?;
        }
        host.listen(&mut doc, nodes.clear, EventKind::Click, PageAction::OpenClearDialog)?;
        host.listen(&mut doc, nodes.list, EventKind::Click, PageAction::Items)?;
        host.listen(&mut doc, nodes.list, EventKind::KeyDown, PageAction::Items)?;

        host.render(&mut doc)?;
        tracing::info!("to-do page ready with {} items", host.list.len());

        Ok(Self {
            doc,
            dialog: DialogController::new(),
            host,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn dialog(&self) -> &DialogController {
        &self.dialog
    }

    pub fn todos(&self) -> &TodoList {
        &self.host.list
    }

    /// Current live-region text
    pub fn announcement(&self) -> &str {
        self.host.live.message()
    }

    /// Announcement update counter
    pub fn announcement_generation(&self) -> u64 {
        self.host.live.generation()
    }

    pub fn new_item_input(&self) -> NodeId {
        self.host.nodes.input
    }

    pub fn clear_button(&self) -> NodeId {
        self.host.nodes.clear
    }

    pub fn add_button(&self) -> NodeId {
        self.host.nodes.add
    }

    pub fn filter_button(&self, filter: Filter) -> NodeId {
        let index = Filter::ALL.iter().position(|&f| f == filter).unwrap_or(0);
        self.host.nodes.filters[index]
    }

    /// Rendered `<li>` of an item, when it passes the filter
    pub fn item_element(&self, id: u64) -> Option<NodeId> {
        self.doc.get_element_by_id(&format!("todo-{id}"))
    }

    /// Control inside a rendered item: `"toggle"`, `"edit"`, `"delete"`,
    /// or `"edit-input"`, `"save"`, `"cancel-edit"` while editing
    pub fn item_control(&self, id: u64, action: &str) -> Option<NodeId> {
        item_control(&self.doc, id, action)
    }

    /// Replace the value of the focused edit input, or else of the
    /// new-item input
    pub fn type_text(&mut self, text: &str) -> Result<(), TodoError> {
        let editing = self
            .doc
            .focused()
            .and_then(|f| self.host.editing_item(&self.doc, f).map(|id| (id, f)));
        let field = match editing {
            Some((id, input)) => {
                self.host.editing.insert(id, text.to_string());
                input
            }
            None => self.host.nodes.input,
        };
        self.doc.tree_mut().set_attribute(field, "value", text)?;
        Ok(())
    }

    /// Type `text` into the new-item input and press Enter
    pub fn add(&mut self, text: &str) {
        self.doc.focus(self.host.nodes.input);
        if let Err(err) = self.type_text(text) {
            tracing::warn!("could not type into the new-item input: {}", err);
            return;
        }
        self.press(KeyInput::new(Key::Enter));
    }

    pub fn toggle(&mut self, id: u64) -> Result<(), TodoError> {
        self.host.toggle(&mut self.doc, id)
    }

    pub fn delete(&mut self, id: u64) -> Result<(), TodoError> {
        self.host.delete(&mut self.doc, id)
    }

    /// Replace an item's text directly, bypassing its edit row
    pub fn edit(&mut self, id: u64, text: &str) -> Result<(), TodoError> {
        self.host.edit(&mut self.doc, id, text)
    }

    /// Whether the item is showing its edit row
    pub fn is_editing(&self, id: u64) -> bool {
        self.host.editing.contains_key(&id)
    }

    /// Click the filter button for `filter`
    pub fn set_filter(&mut self, filter: Filter) {
        self.click(self.filter_button(filter));
    }

    /// Click "Clear completed"; returns whether the dialog is now open
    pub fn request_clear(&mut self) -> bool {
        self.click(self.host.nodes.clear);
        self.dialog.is_open()
    }

    /// Press a key on the focused element
    pub fn press(&mut self, input: KeyInput) -> UiEvent {
        let mut handlers = Handlers {
            dialog: &mut self.dialog,
            host: &mut self.host,
        };
        press_key(&mut self.doc, input, &mut handlers)
    }

    /// Click an element with the pointer
    pub fn click(&mut self, target: NodeId) -> UiEvent {
        let mut handlers = Handlers {
            dialog: &mut self.dialog,
            host: &mut self.host,
        };
        click(&mut self.doc, target, &mut handlers)
    }

    /// Click the dialog backdrop; false when no dialog is open
    pub fn click_backdrop(&mut self) -> bool {
        let Some(parts) = self.dialog.parts() else {
            return false;
        };
        self.click(parts.backdrop);
        true
    }

    /// Click the dialog's text; false when no dialog is open
    pub fn click_dialog_body(&mut self) -> bool {
        let Some(parts) = self.dialog.parts() else {
            return false;
        };
        let tree = self.doc.tree();
        let text = tree
            .descendants(parts.container)
            .find(|&d| tree.tag_name(d) == Some("p"))
            .unwrap_or(parts.container);
        self.click(text);
        true
    }

    /// Short description of the focused element, e.g. `button "Add"`
    pub fn describe_focus(&self) -> String {
        describe_focus(&self.doc)
    }

    /// Plain-text view of the visible items
    pub fn render_text(&self) -> String {
        let list = &self.host.list;
        let visible = list.visible();
        if visible.is_empty() {
            return format!("[{}] No items in this view.", list.filter().as_str());
        }
        let mut out = format!("[{}]", list.filter().as_str());
        for todo in visible {
            let mark = if todo.completed { 'x' } else { ' ' };
            out.push_str(&format!("\n  [{mark}] {:>3}  {}", todo.id, todo.text));
        }
        out
    }
}

/// Skip link, header, add form, filter group, Clear button and list
fn build_page(doc: &mut Document) -> Result<PageNodes, TodoError> {
    let body = doc.body();
    let skip_link = element(
        doc,
        body,
        "a",
        &[("class", "skip-link"), ("href", "#main")],
        Some("Skip to main content"),
    )?;
    let header = element(doc, body, "header", &[("class", "app-header"), ("role", "banner")], None)?;
    element(doc, header, "span", &[], Some("wren To-do"))?;

    let main = element(doc, body, "main", &[("id", "main"), ("tabindex", "-1")], None)?;
    let section = element(doc, main, "section", &[("aria-labelledby", "todo-title"), ("class", "card")], None)?;
    element(doc, section, "span", &[("id", "todo-title")], Some("Todos"))?;

    let form = element(doc, section, "form", &[("class", "add-row")], None)?;
    element(doc, form, "label", &[("for", "new-todo"), ("class", "sr-only")], Some("Add task"))?;
    let input = element(
        doc,
        form,
        "input",
        &[
            ("id", "new-todo"),
            ("placeholder", "Add a task and press Enter"),
            ("aria-describedby", "add-hint"),
        ],
        None,
    )?;
    let add = element(doc, form, "button", &[("type", "submit")], Some("Add"))?;
    element(
        doc,
        form,
        "div",
        &[("id", "add-hint"), ("class", "hint")],
        Some("Press Enter to add. Tasks are saved locally."),
    )?;

    let row = element(doc, section, "div", &[("class", "row")], None)?;
    element(doc, row, "span", &[("id", "filter-label"), ("class", "sr-only")], Some("Filter tasks"))?;
    let group = element(
        doc,
        row,
        "div",
        &[("role", "group"), ("aria-labelledby", "filter-label"), ("class", "filters")],
        None,
    )?;
    let mut filters = [NodeId::NONE; 3];
    for (slot, filter) in filters.iter_mut().zip(Filter::ALL) {
        *slot = element(doc, group, "button", &[("type", "button")], Some(filter.label()))?;
    }
    let clear = element(doc, row, "button", &[("type", "button")], Some("Clear completed"))?;
    let list = element(doc, section, "ul", &[("class", "list"), ("aria-live", "polite")], None)?;

    Ok(PageNodes {
        skip_link,
        main,
        input,
        add,
        filters,
        clear,
        list,
    })
}
