//! Contact list (grid) view

use tracing::debug;

use super::WindowState;
use crate::events::ViewEvent;
use crate::models::{Contact, ContactId};
use crate::storage::StoreResult;
use crate::store::ContactStore;

/// A column the list can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    FirstName,
    LastName,
    PhoneNumber,
    Email,
    BirthDate,
}

const NORMAL_COLUMNS: &[Column] = &[Column::FirstName, Column::LastName, Column::PhoneNumber];

const MAXIMIZED_COLUMNS: &[Column] = &[
    Column::FirstName,
    Column::LastName,
    Column::PhoneNumber,
    Column::Email,
    Column::BirthDate,
];

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::FirstName => "First name",
            Column::LastName => "Last name",
            Column::PhoneNumber => "Phone number",
            Column::Email => "Email",
            Column::BirthDate => "Birth date",
        }
    }

    /// Cell text for a contact
    pub fn value(&self, contact: &Contact) -> String {
        match self {
            Column::FirstName => contact.first_name.clone().unwrap_or_default(),
            Column::LastName => contact.last_name.clone().unwrap_or_default(),
            Column::PhoneNumber => contact.phone_number.clone().unwrap_or_default(),
            Column::Email => contact.email.clone().unwrap_or_default(),
            Column::BirthDate => contact
                .birth_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Rows of contacts with a single selection
#[derive(Debug, Default)]
pub struct ContactListView {
    rows: Vec<Contact>,
    selected: Option<usize>,
    window_state: WindowState,
    page_size: Option<usize>,
    page: usize,
}

impl ContactListView {
    /// Create an empty list; `page_size` of `None` shows every contact
    pub fn new(page_size: Option<usize>) -> Self {
        Self {
            page_size: page_size.filter(|size| *size > 0),
            ..Self::default()
        }
    }

    /// Re-fetch the current page (or everything) from the store
    pub fn reload(&mut self, store: &ContactStore) -> StoreResult<()> {
        self.rows = match self.page_size {
            Some(size) => {
                let mut rows = store.page(size, self.page * size)?;
                // The current page may have emptied out under us
                while rows.is_empty() && self.page > 0 {
                    self.page -= 1;
                    rows = store.page(size, self.page * size)?;
                }
                rows
            }
            None => store.list()?,
        };

        self.selected = match self.selected {
            _ if self.rows.is_empty() => None,
            Some(i) => Some(i.min(self.rows.len() - 1)),
            None => None,
        };
        debug!(rows = self.rows.len(), page = self.page, "Reloaded contact list");
        Ok(())
    }

    pub fn rows(&self) -> &[Contact] {
        &self.rows
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    pub fn move_up(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        });
    }

    pub fn move_down(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(self.rows.len() - 1),
            None => 0,
        });
    }

    /// Activate a row; the returned event tells the form which contact to show
    pub fn activate(&mut self, index: usize) -> Option<ViewEvent> {
        let contact = self.rows.get(index)?;
        let event = ViewEvent::ContactSelected {
            contact_id: contact.id,
        };
        self.selected = Some(index);
        Some(event)
    }

    pub fn activate_selected(&mut self) -> Option<ViewEvent> {
        self.selected.and_then(|i| self.activate(i))
    }

    /// Refresh a single row after the contact changed
    ///
    /// A contact not shown yet is appended when it fits on this page; one
    /// that no longer exists is dropped.
    pub fn on_contact_updated(&mut self, store: &ContactStore, id: ContactId) -> StoreResult<()> {
        let position = self.rows.iter().position(|c| c.id == id);

        match (store.find_by_id(id)?, position) {
            (Some(contact), Some(i)) => self.rows[i] = contact,
            (Some(contact), None) => {
                let fits = self.page_size.map_or(true, |size| self.rows.len() < size);
                if fits {
                    self.rows.push(contact);
                }
            }
            (None, Some(i)) => {
                self.rows.remove(i);
                self.selected = self
                    .selected
                    .filter(|_| !self.rows.is_empty())
                    .map(|s| s.min(self.rows.len() - 1));
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Full reload after the set of contacts changed
    pub fn on_list_changed(&mut self, store: &ContactStore) -> StoreResult<()> {
        self.reload(store)
    }

    pub fn window_state(&self) -> WindowState {
        self.window_state
    }

    pub fn set_window_state(&mut self, state: WindowState) {
        self.window_state = state;
    }

    pub fn toggle_window_state(&mut self) -> WindowState {
        self.window_state = self.window_state.toggled();
        self.window_state
    }

    /// Columns shown in the current window state
    pub fn columns(&self) -> &'static [Column] {
        match self.window_state {
            WindowState::Normal => NORMAL_COLUMNS,
            WindowState::Maximized => MAXIMIZED_COLUMNS,
        }
    }

    /// Label of the button that switches window state
    pub fn window_button_label(&self) -> &'static str {
        match self.window_state {
            WindowState::Normal => "Maximize",
            WindowState::Maximized => "Normalize",
        }
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Zero-based index of the current page
    pub fn page(&self) -> usize {
        self.page
    }

    /// Advance one page. Stays put (returning false) past the last page.
    pub fn next_page(&mut self, store: &ContactStore) -> StoreResult<bool> {
        let Some(size) = self.page_size else {
            return Ok(false);
        };
        if store.page(size, (self.page + 1) * size)?.is_empty() {
            return Ok(false);
        }
        self.page += 1;
        self.selected = None;
        self.reload(store)?;
        Ok(true)
    }

    pub fn prev_page(&mut self, store: &ContactStore) -> StoreResult<bool> {
        if self.page_size.is_none() || self.page == 0 {
            return Ok(false);
        }
        self.page -= 1;
        self.selected = None;
        self.reload(store)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::seeded_store;
    use tempfile::TempDir;

    #[test]
    fn test_reload_shows_all_contacts() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);

        let mut list = ContactListView::new(None);
        list.reload(&store).unwrap();

        assert_eq!(list.rows().len(), 20);
        assert!(list.selected().is_none());
    }

    #[test]
    fn test_activate_yields_selection_event() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let mut list = ContactListView::new(None);
        list.reload(&store).unwrap();

        let event = list.activate(6).unwrap();

        assert_eq!(event, ViewEvent::ContactSelected { contact_id: 7 });
        assert_eq!(list.selected_contact().map(|c| c.id), Some(7));
        assert!(list.activate(99).is_none());
    }

    #[test]
    fn test_move_selection_is_clamped() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let mut list = ContactListView::new(Some(3));
        list.reload(&store).unwrap();

        list.move_up();
        assert_eq!(list.selected(), Some(0));
        list.move_down();
        list.move_down();
        list.move_down();
        assert_eq!(list.selected(), Some(2));
    }

    #[test]
    fn test_contact_updated_refreshes_one_row() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let mut list = ContactListView::new(None);
        list.reload(&store).unwrap();

        let mut changed = store.find_by_id(4).unwrap().unwrap();
        changed.first_name = Some("my pal".to_string());
        store.update(&changed).unwrap();

        list.on_contact_updated(&store, 4).unwrap();

        assert_eq!(list.rows()[3].first_name.as_deref(), Some("my pal"));
        assert_eq!(list.rows().len(), 20);
    }

    #[test]
    fn test_contact_updated_appends_new_contact() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let mut list = ContactListView::new(None);
        list.reload(&store).unwrap();

        let created = store.create_next(&Contact::new(0).with_first_name("New")).unwrap();
        list.on_contact_updated(&store, created.id).unwrap();

        assert_eq!(list.rows().len(), 21);
        assert_eq!(list.rows()[20].id, 21);
    }

    #[test]
    fn test_contact_updated_drops_removed_contact() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let mut list = ContactListView::new(None);
        list.reload(&store).unwrap();
        list.activate(19);

        store.remove(20).unwrap();
        list.on_contact_updated(&store, 20).unwrap();

        assert_eq!(list.rows().len(), 19);
        assert_eq!(list.selected(), Some(18));
    }

    #[test]
    fn test_list_changed_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let mut list = ContactListView::new(None);
        list.reload(&store).unwrap();

        store.remove(1).unwrap();
        store.remove(2).unwrap();
        list.on_list_changed(&store).unwrap();

        assert_eq!(list.rows().len(), 18);
        assert_eq!(list.rows()[0].id, 3);
    }

    #[test]
    fn test_window_state_changes_columns() {
        let mut list = ContactListView::new(None);
        assert_eq!(list.columns().len(), 3);
        assert_eq!(list.window_button_label(), "Maximize");

        assert_eq!(list.toggle_window_state(), WindowState::Maximized);
        assert_eq!(list.columns().len(), 5);
        assert!(list.columns().contains(&Column::Email));
        assert_eq!(list.window_button_label(), "Normalize");

        list.set_window_state(WindowState::Normal);
        assert_eq!(list.columns(), NORMAL_COLUMNS);
    }

    #[test]
    fn test_paging() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let mut list = ContactListView::new(Some(10));
        list.reload(&store).unwrap();

        assert_eq!(list.rows().len(), 10);
        assert_eq!(list.rows()[0].id, 1);

        assert!(list.next_page(&store).unwrap());
        assert_eq!(list.page(), 1);
        assert_eq!(list.rows()[0].id, 11);

        assert!(!list.next_page(&store).unwrap());
        assert_eq!(list.page(), 1);

        assert!(list.prev_page(&store).unwrap());
        assert!(!list.prev_page(&store).unwrap());
        assert_eq!(list.rows()[0].id, 1);
    }

    #[test]
    fn test_reload_steps_back_from_emptied_page() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let mut list = ContactListView::new(Some(10));
        list.reload(&store).unwrap();
        list.next_page(&store).unwrap();

        for id in 11..=20 {
            store.remove(id).unwrap();
        }
        list.on_list_changed(&store).unwrap();

        assert_eq!(list.page(), 0);
        assert_eq!(list.rows().len(), 10);
    }

    #[test]
    fn test_column_values() {
        let contact = Contact::new(1)
            .with_first_name("Ada")
            .with_birth_date(chrono::NaiveDate::from_ymd_opt(1815, 12, 10).unwrap());

        assert_eq!(Column::FirstName.value(&contact), "Ada");
        assert_eq!(Column::Email.value(&contact), "");
        assert_eq!(Column::BirthDate.value(&contact), "1815-12-10");
    }
}
