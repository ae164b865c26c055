//! Modal Dialog
//!
//! Open/closed state machine for a single modal dialog: focus trap, initial
//! focus, Escape and backdrop dismissal, confirm/cancel actions and focus
//! return to the invoking control.

use std::fmt;

use wren_dom::{Document, EventKind, Key, ListenerId, NodeId, UiEvent};

use crate::{A11yError, FocusTrap};

/// Dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

/// Why a dialog closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    Escape,
    Backdrop,
    Confirm,
    Cancel,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Escape => "escape",
            Self::Backdrop => "backdrop",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nodes making up one dialog instance
///
/// The host owns these nodes; the controller only keeps their IDs while
/// the dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogParts {
    /// Overlay around the dialog; clicks reaching it dismiss
    pub backdrop: NodeId,
    /// The `role="dialog"` element; focus is trapped inside it
    pub container: NodeId,
    pub confirm: Option<NodeId>,
    pub cancel: Option<NodeId>,
}

impl DialogParts {
    pub fn new(backdrop: NodeId, container: NodeId) -> Self {
        Self {
            backdrop,
            container,
            confirm: None,
            cancel: None,
        }
    }

    pub fn with_confirm(mut self, button: NodeId) -> Self {
        self.confirm = Some(button);
        self
    }

    pub fn with_cancel(mut self, button: NodeId) -> Self {
        self.cancel = Some(button);
        self
    }
}

/// Host callbacks
///
/// `on_confirm` and `on_cancel` run before the dialog is reported closed;
/// `on_close` runs last, once the trap and listeners are released.
pub trait DialogHost {
    fn on_confirm(&mut self, _doc: &mut Document) {}

    fn on_cancel(&mut self, _doc: &mut Document) {}

    fn on_close(&mut self, _doc: &mut Document, _reason: CloseReason) {}
}

/// Host with no follow-up actions
impl DialogHost for () {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Escape,
    Backdrop,
    Containment,
    Confirm,
    Cancel,
}

/// Listeners and focus bookkeeping held for one open interval
#[derive(Debug)]
struct OpenSession {
    parts: DialogParts,
    return_focus: Option<NodeId>,
    listeners: Vec<(ListenerId, Role)>,
}

impl OpenSession {
    fn acquire(
        doc: &mut Document,
        parts: DialogParts,
        return_focus: Option<NodeId>,
    ) -> Result<Self, A11yError> {
        let mut session = Self {
            parts,
            return_focus,
            listeners: Vec::new(),
        };
        let root = doc.tree().root();
        let wanted = [
            (Some(root), EventKind::KeyDown, Role::Escape),
            (Some(parts.backdrop), EventKind::Click, Role::Backdrop),
            (Some(parts.container), EventKind::Click, Role::Containment),
            (parts.confirm, EventKind::Click, Role::Confirm),
            (parts.cancel, EventKind::Click, Role::Cancel),
        ];
        for (target, kind, role) in wanted {
            let Some(target) = target else { continue };
            match doc.add_listener(target, kind) {
                Ok(id) => session.listeners.push((id, role)),
                Err(err) => {
                    session.release(doc);
                    return Err(err.into());
                }
            }
        }
        Ok(session)
    }

    fn role_of(&self, listener: ListenerId) -> Option<Role> {
        self.listeners
            .iter()
            .find(|(id, _)| *id == listener)
            .map(|&(_, role)| role)
    }

    /// Remove every listener; returns the element to give focus back to
    fn release(self, doc: &mut Document) -> Option<NodeId> {
        for (id, _) in self.listeners {
            doc.remove_listener(id);
        }
        self.return_focus
    }
}

/// Modal dialog controller
///
/// One controller drives one dialog at a time; there is no stacking.
#[derive(Debug, Default)]
pub struct DialogController {
    state: DialogState,
    trap: FocusTrap,
    session: Option<OpenSession>,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    /// Parts of the open dialog
    pub fn parts(&self) -> Option<DialogParts> {
        self.session.as_ref().map(|s| s.parts)
    }

    /// The focus trap, for inspection
    pub fn trap(&self) -> &FocusTrap {
        &self.trap
    }

    /// Open the dialog
    ///
    /// Remembers the focused element for restoration, traps focus in
    /// `parts.container`, and focuses `initial_focus` or else the container.
    /// Opening an open dialog changes nothing.
    pub fn open(
        &mut self,
        doc: &mut Document,
        parts: DialogParts,
        initial_focus: Option<NodeId>,
    ) -> Result<DialogState, A11yError> {
        if self.is_open() {
            tracing::debug!("open() ignored: dialog already open");
            return Ok(self.state);
        }

        let return_focus = doc.focused();
        self.trap.activate(doc, parts.container)?;
        let session = match OpenSession::acquire(doc, parts, return_focus) {
            Ok(session) => session,
            Err(err) => {
                self.trap.deactivate(doc);
                return Err(err);
            }
        };

        let focused = initial_focus.is_some_and(|target| doc.focus(target));
        if !focused {
            doc.focus(parts.container);
        }

        self.session = Some(session);
        self.state = DialogState::Open;
        tracing::debug!("dialog opened on {}", parts.container);
        Ok(self.state)
    }

    /// Close the dialog for `reason`
    ///
    /// Confirm and cancel callbacks run first, then the trap and every
    /// listener are released, focus returns to the invoker (or the body when
    /// the invoker can no longer take focus), and finally `on_close` reports
    /// the closure. Returns
    /// `false` when the dialog was already closed.
    pub fn close<H>(&mut self, doc: &mut Document, reason: CloseReason, host: &mut H) -> bool
    where
        H: DialogHost + ?Sized,
    {
        let Some(session) = self.session.take() else {
            tracing::debug!("close({}) ignored: dialog already closed", reason);
            return false;
        };

        match reason {
            CloseReason::Confirm => host.on_confirm(doc),
            CloseReason::Cancel => host.on_cancel(doc),
            CloseReason::Escape | CloseReason::Backdrop => {}
        }

        self.trap.deactivate(doc);
        let restored = session.release(doc).is_some_and(|invoker| doc.focus(invoker));
        if !restored {
            doc.blur();
        }
        self.state = DialogState::Closed;
        tracing::debug!("dialog closed ({})", reason);

        host.on_close(doc, reason);
        true
    }

    /// Route a listener invocation
    ///
    /// Returns `false` when `listener` does not belong to this dialog.
    pub fn handle_event<H>(
        &mut self,
        doc: &mut Document,
        listener: ListenerId,
        event: &mut UiEvent,
        host: &mut H,
    ) -> bool
    where
        H: DialogHost + ?Sized,
    {
        if self.trap.owns(listener) {
            self.trap.handle_key(doc, event);
            return true;
        }
        let Some(role) = self.session.as_ref().and_then(|s| s.role_of(listener)) else {
            return false;
        };

        match role {
            Role::Escape => {
                if event.is_key(Key::Escape) {
                    event.prevent_default();
                    self.close(doc, CloseReason::Escape, host);
                }
            }
            Role::Backdrop => {
                self.close(doc, CloseReason::Backdrop, host);
            }
            // Clicks inside the dialog body never reach the backdrop.
            Role::Containment => event.stop_propagation(),
            Role::Confirm => {
                self.close(doc, CloseReason::Confirm, host);
            }
            Role::Cancel => {
                self.close(doc, CloseReason::Cancel, host);
            }
        }
        true
    }
}
