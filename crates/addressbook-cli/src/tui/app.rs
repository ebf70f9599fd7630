//! Application state and logic

use std::time::{Duration, Instant};

use addressbook_core::{Field, FormError, Session, WindowState};

/// How long a status message stays visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Application state
pub struct App {
    /// Views and the store, wired over one event bus
    pub session: Session,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Form field receiving input in edit mode
    pub active_field: Field,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Error shown in a modal until a key is pressed
    pub error_message: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            should_quit: false,
            active_field: Field::FirstName,
            status_message: None,
            status_message_time: None,
            error_message: None,
            show_help: false,
        }
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Whether keystrokes go to the form fields
    pub fn is_editing(&self) -> bool {
        self.session.form().is_editable()
    }

    pub fn move_up(&mut self) {
        self.session.list_mut().move_up();
    }

    pub fn move_down(&mut self) {
        self.session.list_mut().move_down();
    }

    /// Show the highlighted row in the form
    pub fn select_current(&mut self) {
        if self.session.select_current().is_none() {
            self.set_status("No contact highlighted");
        }
        self.surface_handler_error();
    }

    pub fn toggle_maximized(&mut self) {
        match self.session.toggle_window_state() {
            WindowState::Maximized => self.set_status("List maximized"),
            WindowState::Normal => self.set_status("List normalized"),
        }
    }

    /// Start editing the contact shown in the form
    pub fn begin_edit(&mut self) {
        if self.session.form().contact().is_none() {
            self.set_status("No contact selected. Press n for a new one");
            return;
        }
        if self.session.begin_edit() {
            self.active_field = Field::FirstName;
        }
    }

    /// Start editing a blank contact
    pub fn begin_create(&mut self) {
        self.session.begin_create();
        self.active_field = Field::FirstName;
    }

    /// Save the form
    pub fn save(&mut self) {
        match self.session.save() {
            Ok(id) => self.set_status(format!("Saved contact {}", id)),
            Err(e @ FormError::InvalidField { .. }) => self.set_status(e.to_string()),
            Err(FormError::Store(e)) if e.is_recoverable() => {
                self.set_error(format!(
                    "Failed to save contact: {}. Your changes are kept; save again",
                    e
                ))
            }
            Err(e) => self.set_error(format!("Failed to save contact: {}", e)),
        }
        self.surface_handler_error();
    }

    /// Cancel the edit, or clear the form outside edit mode
    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    /// Remove the contact shown in the form
    pub fn remove(&mut self) {
        let id = self.session.form().contact_id();
        match self.session.remove() {
            Ok(true) => {
                if let Some(id) = id {
                    self.set_status(format!("Removed contact {}", id));
                }
            }
            Ok(false) => self.set_status("No contact selected"),
            Err(e) => self.set_error(format!("Failed to remove contact: {}", e)),
        }
        self.surface_handler_error();
    }

    pub fn next_page(&mut self) {
        match self.session.next_page() {
            Ok(true) => {}
            Ok(false) => self.set_status("No more contacts"),
            Err(e) => self.set_error(format!("Failed to load page: {}", e)),
        }
    }

    pub fn prev_page(&mut self) {
        match self.session.prev_page() {
            Ok(true) => {}
            Ok(false) => self.set_status("Already on the first page"),
            Err(e) => self.set_error(format!("Failed to load page: {}", e)),
        }
    }

    /// Move input to the next form field
    pub fn next_field(&mut self) {
        self.active_field = self.active_field.next();
    }

    /// Type a character into the active field
    pub fn insert_char(&mut self, c: char) {
        if let Ok(field) = self.session.form_mut().field_mut(self.active_field) {
            field.push(c);
        }
    }

    /// Delete the last character of the active field
    pub fn delete_char(&mut self) {
        if let Ok(field) = self.session.form_mut().field_mut(self.active_field) {
            field.pop();
        }
    }

    /// Show a failure that happened while the views handled an event
    fn surface_handler_error(&mut self) {
        if let Some(e) = self.session.take_handler_error() {
            self.set_error(format!("Failed to refresh view: {}", e));
        }
    }
}
