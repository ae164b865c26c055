//! Line Commands
//!
//! One command per stdin line; the first word selects the command.

use std::str::FromStr;

use wren_dom::{Key, KeyInput};

use crate::{Filter, TodoError};

/// A driver command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(u64),
    Delete(u64),
    Edit(u64, String),
    Filter(Filter),
    List,
    /// Press the "Clear completed" button
    Clear,
    /// Press a key on the focused element
    Press(KeyInput),
    /// Replace the focused text field's value
    Type(String),
    ClickBackdrop,
    ClickBody,
    Login { email: String, password: String },
    /// Click Show/Hide next to the login password
    ShowPassword,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add <text>            add an item
  toggle <id>           mark an item done / not done
  delete <id>           delete an item
  edit <id> <text>      change an item's text
  filter all|active|completed
  list                  show the visible items
  clear                 press \"Clear completed\"
  tab | shift-tab       move focus
  enter | esc | space   press a key on the focused element
  key [shift+]<name>    press any of Tab, Enter, Escape, Space
  type <text>           set the focused field (or the new-item input)
  click-backdrop        click outside the open dialog
  click-body            click inside the open dialog
  login <email> <password>
  show-password         toggle the login password's visibility
  help | quit";

fn parse_id(arg: &str, line: &str) -> Result<u64, TodoError> {
    arg.parse()
        .map_err(|_| TodoError::UnknownCommand(line.to_string()))
}

/// `Enter`, `esc`, `shift+tab`, ...
fn parse_key(chord: &str) -> Option<KeyInput> {
    let (shift, name) = match chord.split_once('+') {
        Some((modifier, name)) if modifier.eq_ignore_ascii_case("shift") => (true, name),
        _ => (false, chord),
    };
    let input = KeyInput::new(Key::from_name(name)?);
    Some(if shift { input.shift() } else { input })
}

impl Command {
    /// Whether the command drives the login page
    pub fn is_login(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::ShowPassword)
    }
}

impl FromStr for Command {
    type Err = TodoError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let unknown = || TodoError::UnknownCommand(line.to_string());

        let command = match word.to_ascii_lowercase().as_str() {
            "add" => Self::Add(rest.to_string()),
            "toggle" => Self::Toggle(parse_id(rest, line)?),
            "delete" | "del" => Self::Delete(parse_id(rest, line)?),
            "edit" => {
                let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Self::Edit(parse_id(id, line)?, text.to_string())
            }
            "filter" => Self::Filter(Filter::parse(rest).ok_or_else(unknown)?),
            "list" | "ls" => Self::List,
            "clear" => Self::Clear,
            "tab" | "enter" | "esc" | "escape" | "space" => {
                Self::Press(parse_key(word).ok_or_else(unknown)?)
            }
            "shift-tab" => Self::Press(KeyInput::new(Key::Tab).shift()),
            "key" | "press" => Self::Press(parse_key(rest).ok_or_else(unknown)?),
            "type" => Self::Type(rest.to_string()),
            "click-backdrop" => Self::ClickBackdrop,
            "click-body" => Self::ClickBody,
            "login" => {
                let mut parts = rest.split_whitespace();
                Self::Login {
                    email: parts.next().unwrap_or_default().to_string(),
                    password: parts.next().unwrap_or_default().to_string(),
                }
            }
            "show-password" => Self::ShowPassword,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(unknown()),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_commands() {
        assert_eq!("add  Buy milk ".parse::<Command>().unwrap(), Command::Add("Buy milk".into()));
        assert_eq!("toggle 3".parse::<Command>().unwrap(), Command::Toggle(3));
        assert_eq!("delete 0".parse::<Command>().unwrap(), Command::Delete(0));
        assert_eq!(
            "edit 2 Walk the dog".parse::<Command>().unwrap(),
            Command::Edit(2, "Walk the dog".into())
        );
        assert_eq!("edit 2".parse::<Command>().unwrap(), Command::Edit(2, String::new()));
    }

    #[test]
    fn test_parse_navigation_commands() {
        let tab = KeyInput::new(Key::Tab);
        assert_eq!("tab".parse::<Command>().unwrap(), Command::Press(tab));
        assert_eq!("shift-tab".parse::<Command>().unwrap(), Command::Press(tab.shift()));
        assert_eq!("ESC".parse::<Command>().unwrap(), Command::Press(KeyInput::new(Key::Escape)));
        assert_eq!("key Shift+Tab".parse::<Command>().unwrap(), Command::Press(tab.shift()));
        assert_eq!("press space".parse::<Command>().unwrap(), Command::Press(KeyInput::new(Key::Space)));
        assert_eq!("type  Buy oat milk".parse::<Command>().unwrap(), Command::Type("Buy oat milk".into()));
        assert_eq!("click-backdrop".parse::<Command>().unwrap(), Command::ClickBackdrop);
        assert_eq!("filter Active".parse::<Command>().unwrap(), Command::Filter(Filter::Active));
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            "login a@b.co hunter22".parse::<Command>().unwrap(),
            Command::Login {
                email: "a@b.co".into(),
                password: "hunter22".into()
            }
        );
        assert_eq!(
            "login".parse::<Command>().unwrap(),
            Command::Login {
                email: String::new(),
                password: String::new()
            }
        );
        assert!("login".parse::<Command>().unwrap().is_login());
        assert!("show-password".parse::<Command>().unwrap().is_login());
        assert!(!"tab".parse::<Command>().unwrap().is_login());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("toggle x".parse::<Command>(), Err(TodoError::UnknownCommand(_))));
        assert!(matches!("filter done".parse::<Command>(), Err(TodoError::UnknownCommand(_))));
        assert!(matches!("dance".parse::<Command>(), Err(TodoError::UnknownCommand(_))));
        assert!(matches!("key F13".parse::<Command>(), Err(TodoError::UnknownCommand(_))));
        assert!(matches!("key ctrl+tab".parse::<Command>(), Err(TodoError::UnknownCommand(_))));
    }
}
