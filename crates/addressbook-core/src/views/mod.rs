//! View models for the list and form views
//!
//! These hold the state a UI renders (rows, selection, bound fields,
//! edit mode, window state) and implement what happens on user actions.
//! They do no rendering themselves; the terminal UI draws them.

pub mod form;
pub mod list;

pub use form::{ContactFormView, Field, FormError, FormFields};
pub use list::{Column, ContactListView};

/// Whether a view's editable region accepts input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Read-only, bound fields disabled
    #[default]
    View,
    /// Fields writable
    Edit,
}

/// Size of the window hosting a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Maximized,
}

impl WindowState {
    pub fn toggled(self) -> Self {
        match self {
            WindowState::Normal => WindowState::Maximized,
            WindowState::Maximized => WindowState::Normal,
        }
    }
}
