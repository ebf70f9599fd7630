//! Address Book TUI
//!
//! Terminal user interface over one session's list and form views.
//!
//! ## Layout
//!
//! Two-pane layout:
//! - Left: Contact list (a table of the list view's columns)
//! - Right: Contact form (hidden while the list is maximized)
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move highlight up/down
//! - Enter: Show the highlighted contact in the form
//! - ]/[: Next/previous page
//! - m: Maximize/normalize the list
//! - q: Quit
//!
//! ## Form
//!
//! - e: Edit the shown contact
//! - n: New contact
//! - d: Remove the shown contact
//! - Tab: Next field (edit mode)
//! - Enter: Save (edit mode)
//! - Esc: Cancel the edit, or clear the form

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;

use addressbook_core::{Config, Session};

use app::App;

use crate::commands::open_store;

/// Run the TUI application
pub fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if ADDRESSBOOK_LOG is set)
    init_tui_logging(&config);

    // Open (and seed) the store before taking over the terminal
    let store = open_store(&config)?;
    let session = Session::new(store, config.page_size).context("Failed to load contacts")?;
    let mut app = App::new(session);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Dispatch a key press
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // If error modal is showing, any key dismisses it
    if app.has_error() {
        app.clear_error();
        return;
    }

    // If help is showing, any key dismisses it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.is_editing() {
        handle_edit_mode(app, code);
    } else {
        handle_normal_mode(app, code);
    }
}

/// Handle key events while browsing
fn handle_normal_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
        }
        KeyCode::Enter => {
            app.select_current();
        }
        KeyCode::Char('m') => {
            app.toggle_maximized();
        }
        KeyCode::Char('e') => {
            app.begin_edit();
        }
        KeyCode::Char('n') => {
            app.begin_create();
        }
        KeyCode::Char('d') => {
            app.remove();
        }
        KeyCode::Char(']') => {
            app.next_page();
        }
        KeyCode::Char('[') => {
            app.prev_page();
        }
        KeyCode::Esc => {
            app.cancel();
        }
        KeyCode::Char('?') => {
            app.toggle_help();
        }
        _ => {}
    }
}

/// Handle key events while the form is in edit mode
fn handle_edit_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.cancel();
        }
        KeyCode::Enter => {
            app.save();
        }
        KeyCode::Tab => {
            app.next_field();
        }
        KeyCode::Backspace => {
            app.delete_char();
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
        }
        _ => {}
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if ADDRESSBOOK_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    // Only log if ADDRESSBOOK_LOG is set
    let Ok(log_level) = std::env::var(crate::LOG_ENV) else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Create log file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(crate::log_filter(&log_level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use addressbook_core::{Field, ViewMode, WindowState};
    use tempfile::TempDir;

    use super::app::tests::app_with_contacts;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, code, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_edit_keys_go_to_the_form() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app_with_contacts(&temp_dir, 3);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.session.form().mode(), ViewMode::Edit);

        // 'q' is text while editing
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.active_field, Field::LastName);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.form().mode(), ViewMode::View);
        assert_eq!(
            app.session.list().rows()[0].last_name.as_deref(),
            Some("Last1q")
        );
    }

    #[test]
    fn test_escape_cancels_edit() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app_with_contacts(&temp_dir, 1);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "zzz");

        press(&mut app, KeyCode::Esc);

        assert_eq!(app.session.form().mode(), ViewMode::View);
        assert_eq!(app.session.form().fields().first_name, "First1");
    }

    #[test]
    fn test_maximize_and_quit() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app_with_contacts(&temp_dir, 1);

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.session.list().window_state(), WindowState::Maximized);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_error_modal_swallows_next_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app_with_contacts(&temp_dir, 1);
        app.set_error("boom");

        press(&mut app, KeyCode::Char('q'));

        assert!(!app.has_error());
        assert!(!app.should_quit);
    }
}
