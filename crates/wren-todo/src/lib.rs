//! wren To-do
//!
//! A keyboard-accessible to-do list page built on `wren-dom` and
//! `wren-a11y`: list model with inline editing, JSON persistence, the
//! clear-completed confirmation dialog, live announcements and a login
//! form page.

pub mod app;
pub mod command;
pub mod config;
pub mod login;
pub mod login_page;
pub mod model;
pub mod page;
pub mod storage;

pub use app::TodoApp;
pub use command::Command;
pub use config::AppConfig;
pub use login::{ErrorSummary, Field, LoginOutcome, LoginValidator};
pub use login_page::LoginPage;
pub use model::{Filter, Todo, TodoList};
pub use storage::TodoStore;

use wren_a11y::A11yError;
use wren_dom::DomError;

/// To-do application error
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No item with id {0}")]
    UnknownItem(u64),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    A11y(#[from] A11yError),

    #[error(transparent)]
    Dom(#[from] DomError),
}
