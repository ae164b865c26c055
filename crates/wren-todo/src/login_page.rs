//! Login Page
//!
//! The sign-in form in its own `Document`. Each field shows its message
//! underneath and carries `aria-invalid` while wrong. A failed submit builds
//! an error summary that takes focus before focus moves on to the first
//! invalid field. A successful submit signs in and, one step later, signs
//! out again.

use wren_a11y::{click, press_key, LiveAnnouncer, Politeness};
use wren_dom::{Document, EventHandler, EventKind, Key, KeyInput, ListenerId, NodeId, UiEvent};

use crate::login::{ErrorSummary, Field, LoginOutcome, LoginValidator, SIGNED_OUT};
use crate::page::{describe_focus, element, field_value};
use crate::TodoError;

/// What a form listener does when invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginAction {
    Submit,
    /// Enter submits; Tab leaving a field validates it
    FieldKey,
    TogglePassword,
}

/// Follow-up run by `LoginPage::tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    FocusField(Field),
    SignOut,
}

#[derive(Debug, Clone, Copy)]
struct LoginNodes {
    summary: NodeId,
    email: NodeId,
    email_error: NodeId,
    password: NodeId,
    password_error: NodeId,
    toggle: NodeId,
    submit: NodeId,
}

impl LoginNodes {
    fn input(&self, field: Field) -> NodeId {
        match field {
            Field::Email => self.email,
            Field::Password => self.password,
        }
    }

    fn error(&self, field: Field) -> NodeId {
        match field {
            Field::Email => self.email_error,
            Field::Password => self.password_error,
        }
    }

    fn field_of(&self, node: NodeId) -> Option<Field> {
        if node == self.email {
            Some(Field::Email)
        } else if node == self.password {
            Some(Field::Password)
        } else {
            None
        }
    }
}

struct LoginHost {
    validator: LoginValidator,
    live: LiveAnnouncer,
    nodes: LoginNodes,
    actions: Vec<(ListenerId, LoginAction)>,
    pending: Option<Pending>,
    /// Outcome of the latest submit, taken by `LoginPage::submit`
    outcome: Option<LoginOutcome>,
}

impl EventHandler for LoginHost {
    fn handle_event(&mut self, doc: &mut Document, listener: ListenerId, event: &mut UiEvent) {
        let Some(action) = self
            .actions
            .iter()
            .find(|(id, _)| *id == listener)
            .map(|(_, action)| *action)
        else {
            return;
        };
        let result = match action {
            LoginAction::Submit => {
                event.prevent_default();
                self.submit(doc)
            }
            LoginAction::FieldKey => match self.nodes.field_of(event.target) {
                Some(_) if event.is_key(Key::Enter) => {
                    event.prevent_default();
                    self.submit(doc)
                }
                Some(field) if event.is_key(Key::Tab) => self.check(doc, field),
                _ => Ok(()),
            },
            LoginAction::TogglePassword => self.toggle_password(doc),
        };
        if let Err(err) = result {
            tracing::warn!("login action {:?} failed: {}", action, err);
        }
    }
}

impl LoginHost {
    /// Validate one field and show or clear its message
    fn check(&self, doc: &mut Document, field: Field) -> Result<(), TodoError> {
        let input = self.nodes.input(field);
        let error = self.nodes.error(field);
        let value = field_value(doc, input);
        let result = self.validator.validate(field, &value);

        let tree = doc.tree_mut();
        match result {
            Ok(()) => {
                tree.set_text_content(error, "")?;
                tree.toggle_attribute(error, "hidden", true)?;
                tree.remove_attribute(input, "aria-invalid")?;
            }
            Err(message) => {
                tree.set_text_content(error, message)?;
                tree.toggle_attribute(error, "hidden", false)?;
                tree.set_attribute(input, "aria-invalid", "true")?;
            }
        }
        Ok(())
    }

    fn submit(&mut self, doc: &mut Document) -> Result<(), TodoError> {
        let summary = self.nodes.summary;
        doc.tree_mut().clear_children(summary)?;
        doc.tree_mut().toggle_attribute(summary, "hidden", true)?;
        self.live.announce("");

        self.check(doc, Field::Email)?;
        self.check(doc, Field::Password)?;
        let email = field_value(doc, self.nodes.email);
        let password = field_value(doc, self.nodes.password);
        let outcome = self.validator.submit(&email, &password);

        match &outcome {
            LoginOutcome::Invalid(errors) => {
                tracing::info!("sign-in rejected with {} problems", errors.items.len());
                self.show_summary(doc, errors)?;
                doc.focus(summary);
                self.pending = Some(Pending::FocusField(errors.focus));
            }
            LoginOutcome::SignedIn { message } => {
                tracing::info!("signed in as {}", email.trim());
                doc.tree_mut().toggle_attribute(self.nodes.submit, "disabled", true)?;
                self.live.announce(*message);
                self.pending = Some(Pending::SignOut);
            }
        }
        self.live.render(doc)?;
        self.outcome = Some(outcome);
        Ok(())
    }

    fn show_summary(&self, doc: &mut Document, errors: &ErrorSummary) -> Result<(), TodoError> {
        let summary = self.nodes.summary;
        element(doc, summary, "h3", &[], Some(errors.heading))?;
        let list = element(doc, summary, "ul", &[], None)?;
        for item in &errors.items {
            element(doc, list, "li", &[], Some(item.as_str()))?;
        }
        doc.tree_mut().toggle_attribute(summary, "hidden", false)?;
        Ok(())
    }

    /// Switch the password between hidden and shown, keeping focus in it
    fn toggle_password(&mut self, doc: &mut Document) -> Result<(), TodoError> {
        let nodes = self.nodes;
        let showing = doc.tree().attribute(nodes.password, "type") == Some("text");
        let tree = doc.tree_mut();
        tree.set_attribute(nodes.password, "type", if showing { "password" } else { "text" })?;
        tree.set_attribute(nodes.toggle, "aria-pressed", if showing { "false" } else { "true" })?;
        tree.set_text_content(nodes.toggle, if showing { "Show" } else { "Hide" })?;
        doc.focus(nodes.password);
        Ok(())
    }

    /// Clear the form after the demo sign-in
    fn sign_out(&mut self, doc: &mut Document) -> Result<(), TodoError> {
        let nodes = self.nodes;
        let tree = doc.tree_mut();
        tree.set_attribute(nodes.email, "value", "")?;
        tree.set_attribute(nodes.password, "value", "")?;
        tree.toggle_attribute(nodes.submit, "disabled", false)?;
        self.live.announce(SIGNED_OUT);
        self.live.render(doc)?;
        doc.focus(nodes.email);
        tracing::info!("signed out");
        Ok(())
    }
}

/// The login form page
pub struct LoginPage {
    doc: Document,
    host: LoginHost,
}

impl LoginPage {
    pub fn new(politeness: Politeness) -> Result<Self, TodoError> {
        let mut doc = Document::new();
        let (form, nodes) = build_form(&mut doc)?;
        let mut host = LoginHost {
            validator: LoginValidator::new()?,
            live: LiveAnnouncer::new(politeness),
            nodes,
            actions: Vec::new(),
            pending: None,
            outcome: None,
        };
        host.live.mount(&mut doc)?;

        for (target, kind, action) in [
            (nodes.submit, EventKind::Click, LoginAction::Submit),
            (form, EventKind::KeyDown, LoginAction::FieldKey),
            (nodes.toggle, EventKind::Click, LoginAction::TogglePassword),
        ] {
            let listener = doc.add_listener(target, kind)?;
            host.actions.push((listener, action));
        }
        Ok(Self { doc, host })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Input element of `field`
    pub fn field(&self, field: Field) -> NodeId {
        self.host.nodes.input(field)
    }

    pub fn error_summary(&self) -> NodeId {
        self.host.nodes.summary
    }

    pub fn toggle_button(&self) -> NodeId {
        self.host.nodes.toggle
    }

    pub fn submit_button(&self) -> NodeId {
        self.host.nodes.submit
    }

    /// Message shown under `field`; empty while valid
    pub fn error_message(&self, field: Field) -> String {
        self.doc.tree().text_content(self.host.nodes.error(field))
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.doc.tree().attribute(self.field(field), "aria-invalid") == Some("true")
    }

    /// Current live-region text
    pub fn announcement(&self) -> &str {
        self.host.live.message()
    }

    pub fn announcement_generation(&self) -> u64 {
        self.host.live.generation()
    }

    /// Focus `field` and replace its value
    pub fn fill(&mut self, field: Field, text: &str) -> Result<(), TodoError> {
        let input = self.field(field);
        self.doc.focus(input);
        self.doc.tree_mut().set_attribute(input, "value", text)?;
        Ok(())
    }

    /// Click the submit button; `None` while it is disabled
    pub fn submit(&mut self) -> Option<LoginOutcome> {
        self.host.outcome = None;
        self.click(self.host.nodes.submit);
        self.host.outcome.take()
    }

    /// Press a key on the focused element
    pub fn press(&mut self, input: KeyInput) -> UiEvent {
        press_key(&mut self.doc, input, &mut self.host)
    }

    /// Click an element with the pointer
    pub fn click(&mut self, target: NodeId) -> UiEvent {
        click(&mut self.doc, target, &mut self.host)
    }

    /// Run the step the last submit left pending; returns whether one ran
    ///
    /// After a failed submit this moves focus from the summary to the first
    /// invalid field. After a successful one it resets the form, announces
    /// the sign-out and focuses the email field.
    pub fn tick(&mut self) -> Result<bool, TodoError> {
        let Some(pending) = self.host.pending.take() else {
            return Ok(false);
        };
        match pending {
            Pending::FocusField(field) => {
                let input = self.field(field);
                self.doc.focus(input);
            }
            Pending::SignOut => self.host.sign_out(&mut self.doc)?,
        }
        Ok(true)
    }

    pub fn describe_focus(&self) -> String {
        describe_focus(&self.doc)
    }
}

/// Heading, error summary and the form; returns the form and its controls
fn build_form(doc: &mut Document) -> Result<(NodeId, LoginNodes), TodoError> {
    let body = doc.body();
    let main = element(doc, body, "main", &[("id", "main"), ("tabindex", "-1")], None)?;
    let card = element(doc, main, "section", &[("class", "card"), ("aria-labelledby", "login-title")], None)?;
    element(doc, card, "h1", &[("id", "login-title")], Some("Sign in"))?;
    let summary = element(
        doc,
        card,
        "div",
        &[
            ("id", "error-summary"),
            ("class", "error-summary"),
            ("role", "alert"),
            ("tabindex", "-1"),
            ("hidden", ""),
        ],
        None,
    )?;

    let form = element(doc, card, "form", &[("id", "login-form"), ("novalidate", "")], None)?;
    element(doc, form, "label", &[("for", Field::Email.element_id())], Some(Field::Email.label()))?;
    let email = element(
        doc,
        form,
        "input",
        &[
            ("id", Field::Email.element_id()),
            ("type", "email"),
            ("autocomplete", "email"),
            ("aria-describedby", Field::Email.error_id()),
        ],
        None,
    )?;
    let email_error = element(
        doc,
        form,
        "p",
        &[("id", Field::Email.error_id()), ("class", "error"), ("hidden", "")],
        None,
    )?;

    element(doc, form, "label", &[("for", Field::Password.element_id())], Some(Field::Password.label()))?;
    let password = element(
        doc,
        form,
        "input",
        &[
            ("id", Field::Password.element_id()),
            ("type", "password"),
            ("autocomplete", "current-password"),
            ("aria-describedby", Field::Password.error_id()),
        ],
        None,
    )?;
    let toggle = element(
        doc,
        form,
        "button",
        &[
            ("id", "toggle-password"),
            ("type", "button"),
            ("aria-pressed", "false"),
            ("aria-controls", Field::Password.element_id()),
        ],
        Some("Show"),
    )?;
    let password_error = element(
        doc,
        form,
        "p",
        &[("id", Field::Password.error_id()), ("class", "error"), ("hidden", "")],
        None,
    )?;
    let submit = element(doc, form, "button", &[("type", "submit")], Some("Sign in"))?;

    Ok((
        form,
        LoginNodes {
            summary,
            email,
            email_error,
            password,
            password_error,
            toggle,
            submit,
        },
    ))
}
