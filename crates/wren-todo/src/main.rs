//! wren To-do - Command line driver
//!
//! Reads one command per line from stdin and prints focus moves and
//! live-region announcements after each one. Login commands drive a
//! separate login page.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use wren_todo::command::HELP;
use wren_todo::{AppConfig, Command, Field, LoginOutcome, LoginPage, TodoApp};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("failed to load configuration")?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting wren to-do (items in {})", config.storage_path.display());

    let mut app = TodoApp::new(&config).context("failed to build the to-do page")?;
    let mut login = LoginPage::new(config.politeness()?).context("failed to build the login page")?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", app.render_text())?;
    writeln!(out, "type `help` for commands")?;

    let mut seen = app.announcement_generation();
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err} (try `help`)")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if command.is_login() {
            if let Err(err) = run_login(&mut login, command, &mut out) {
                writeln!(out, "error: {err}")?;
            }
            continue;
        }

        if let Err(err) = run(&mut app, command, &mut out) {
            writeln!(out, "error: {err}")?;
        }
        if app.announcement_generation() != seen {
            seen = app.announcement_generation();
            writeln!(out, "live: {}", app.announcement())?;
        }
        writeln!(out, "focus: {}", app.describe_focus())?;
    }

    tracing::info!("bye");
    Ok(())
}

fn run(app: &mut TodoApp, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Add(text) => app.add(&text),
        Command::Toggle(id) => app.toggle(id)?,
        Command::Delete(id) => app.delete(id)?,
        Command::Edit(id, text) => app.edit(id, &text)?,
        Command::Filter(filter) => {
            app.set_filter(filter);
            writeln!(out, "{}", app.render_text())?;
        }
        Command::List => writeln!(out, "{}", app.render_text())?,
        Command::Clear => {
            if app.request_clear() {
                writeln!(out, "dialog: Clear all completed? [Confirm] [Cancel]")?;
            } else {
                writeln!(out, "nothing completed to clear")?;
            }
        }
        Command::Press(input) => {
            app.press(input);
        }
        Command::Type(text) => app.type_text(&text)?,
        Command::ClickBackdrop => {
            if !app.click_backdrop() {
                writeln!(out, "no dialog open")?;
            }
        }
        Command::ClickBody => {
            if !app.click_dialog_body() {
                writeln!(out, "no dialog open")?;
            }
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Login { .. } | Command::ShowPassword | Command::Quit => {}
    }
    Ok(())
}

fn run_login(page: &mut LoginPage, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            page.fill(Field::Email, &email)?;
            page.fill(Field::Password, &password)?;
            match page.submit() {
                Some(LoginOutcome::Invalid(summary)) => {
                    writeln!(out, "{}", summary.heading)?;
                    for item in &summary.items {
                        writeln!(out, "  - {item}")?;
                    }
                }
                Some(LoginOutcome::SignedIn { .. }) => {}
                None => writeln!(out, "sign-in already in progress")?,
            }
            print_login(page, out)?;
            if page.tick()? {
                print_login(page, out)?;
            }
        }
        Command::ShowPassword => {
            page.click(page.toggle_button());
            print_login(page, out)?;
        }
        _ => {}
    }
    Ok(())
}

fn print_login(page: &LoginPage, out: &mut impl Write) -> anyhow::Result<()> {
    if !page.announcement().is_empty() {
        writeln!(out, "login live: {}", page.announcement())?;
    }
    writeln!(out, "login focus: {}", page.describe_focus())?;
    Ok(())
}
