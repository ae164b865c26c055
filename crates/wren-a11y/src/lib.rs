//! wren Accessibility
//!
//! Accessible modal dialog support on top of `wren-dom`.
//!
//! Features:
//! - Focusable element scanning
//! - Focus trap with Tab/Shift+Tab wrap-around
//! - Modal dialog state machine (Escape, backdrop, confirm, cancel)
//! - Live region announcements
//! - Event dispatch with platform default actions

pub mod dialog;
pub mod dispatch;
pub mod focus;
pub mod live_region;
pub mod trap;

pub use dialog::{CloseReason, DialogController, DialogHost, DialogParts, DialogState};
pub use dispatch::{click, press_key};
pub use focus::{FocusScanner, TabIndex};
pub use live_region::{LiveAnnouncer, Politeness};
pub use trap::FocusTrap;

use wren_dom::{DomError, NodeId};

/// Accessibility error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum A11yError {
    #[error("Container {0} is not an element in the document")]
    MissingContainer(NodeId),

    #[error("Focus trap already active on {active}, cannot trap {requested}")]
    TrapAlreadyActive { active: NodeId, requested: NodeId },

    #[error("Invalid politeness level: {0}")]
    InvalidPoliteness(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}
