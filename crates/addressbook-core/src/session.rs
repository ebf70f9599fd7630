//! One UI session: a store, an event bus, and the views subscribed to it
//!
//! Actions go through the session. A view returns the event its action
//! produced; the session publishes it, and the subscribed views re-fetch
//! whatever they need from the store.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use tracing::warn;

use crate::bus::EventBus;
use crate::events::{EventKind, ViewEvent};
use crate::models::ContactId;
use crate::storage::{StoreError, StoreResult};
use crate::store::ContactStore;
use crate::views::{ContactFormView, ContactListView, FormError, WindowState};

pub struct Session {
    store: Rc<ContactStore>,
    bus: EventBus,
    list: Rc<RefCell<ContactListView>>,
    form: Rc<RefCell<ContactFormView>>,
    /// Most recent failure inside an event handler
    handler_error: Rc<RefCell<Option<StoreError>>>,
}

impl Session {
    /// Wire up the views and load the first page of contacts
    pub fn new(store: ContactStore, page_size: Option<usize>) -> StoreResult<Self> {
        let store = Rc::new(store);
        let list = Rc::new(RefCell::new(ContactListView::new(page_size)));
        let form = Rc::new(RefCell::new(ContactFormView::new()));
        let handler_error = Rc::new(RefCell::new(None));
        let mut bus = EventBus::new();

        list.borrow_mut().reload(&store)?;

        {
            let (list, store, errors) = (list.clone(), store.clone(), handler_error.clone());
            bus.subscribe(EventKind::ContactUpdated, move |event| {
                if let Some(id) = event.contact_id() {
                    let result = list.borrow_mut().on_contact_updated(&store, id);
                    record(&errors, event, result);
                }
            });
        }
        {
            let (list, store, errors) = (list.clone(), store.clone(), handler_error.clone());
            bus.subscribe(EventKind::ContactListChanged, move |event| {
                let result = list.borrow_mut().on_list_changed(&store);
                record(&errors, event, result);
            });
        }
        {
            let (form, store, errors) = (form.clone(), store.clone(), handler_error.clone());
            bus.subscribe(EventKind::ContactSelected, move |event| {
                if let Some(id) = event.contact_id() {
                    let result = form.borrow_mut().on_contact_selected(&store, id);
                    record(&errors, event, result);
                }
            });
        }

        Ok(Self {
            store,
            bus,
            list,
            form,
            handler_error,
        })
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    pub fn list(&self) -> Ref<'_, ContactListView> {
        self.list.borrow()
    }

    pub fn list_mut(&self) -> RefMut<'_, ContactListView> {
        self.list.borrow_mut()
    }

    pub fn form(&self) -> Ref<'_, ContactFormView> {
        self.form.borrow()
    }

    pub fn form_mut(&self) -> RefMut<'_, ContactFormView> {
        self.form.borrow_mut()
    }

    /// Broadcast an event to the views
    pub fn publish(&mut self, event: &ViewEvent) -> usize {
        self.bus.publish(event)
    }

    /// Take the last error raised while handling an event
    pub fn take_handler_error(&self) -> Option<StoreError> {
        self.handler_error.borrow_mut().take()
    }

    /// Activate a list row, showing its contact in the form
    pub fn select_row(&mut self, index: usize) -> Option<ContactId> {
        let event = self.list.borrow_mut().activate(index)?;
        self.publish(&event);
        event.contact_id()
    }

    /// Activate the highlighted list row
    pub fn select_current(&mut self) -> Option<ContactId> {
        let index = self.list.borrow().selected()?;
        self.select_row(index)
    }

    pub fn begin_edit(&self) -> bool {
        self.form.borrow_mut().begin_edit()
    }

    pub fn begin_create(&self) {
        self.form.borrow_mut().begin_create();
    }

    /// Save the form and let the list pick up the change
    pub fn save(&mut self) -> Result<ContactId, FormError> {
        let event = self.form.borrow_mut().save(&self.store)?;
        self.publish(&event);
        Ok(event.contact_id().unwrap_or_default())
    }

    pub fn cancel(&self) {
        self.form.borrow_mut().cancel();
    }

    /// Remove the contact shown in the form. Returns false if none was shown.
    pub fn remove(&mut self) -> StoreResult<bool> {
        let event = self.form.borrow_mut().remove(&self.store)?;
        match event {
            Some(event) => {
                self.publish(&event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn toggle_window_state(&self) -> WindowState {
        self.list.borrow_mut().toggle_window_state()
    }

    pub fn next_page(&self) -> StoreResult<bool> {
        self.list.borrow_mut().next_page(&self.store)
    }

    pub fn prev_page(&self) -> StoreResult<bool> {
        self.list.borrow_mut().prev_page(&self.store)
    }

    /// Re-read the list from the store
    pub fn refresh(&self) -> StoreResult<()> {
        self.list.borrow_mut().reload(&self.store)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

fn record(slot: &RefCell<Option<StoreError>>, event: &ViewEvent, result: StoreResult<()>) {
    if let Err(e) = result {
        warn!(%event, error = %e, "View failed to handle event");
        *slot.borrow_mut() = Some(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::seeded_store;
    use crate::views::{Field, ViewMode};
    use tempfile::TempDir;

    fn session(temp_dir: &TempDir) -> Session {
        Session::new(seeded_store(temp_dir), None).unwrap()
    }

    #[test]
    fn test_new_session_loads_list() {
        let temp_dir = TempDir::new().unwrap();
        let session = session(&temp_dir);

        assert_eq!(session.list().rows().len(), 20);
        assert!(session.form().contact().is_none());
    }

    #[test]
    fn test_select_row_shows_contact_in_form() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);

        assert_eq!(session.select_row(6), Some(7));

        assert_eq!(session.form().contact_id(), Some(7));
        assert_eq!(session.form().fields().first_name, "First6");
    }

    #[test]
    fn test_selecting_absent_contact_clears_form() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);
        session.select_row(0);
        session.store().remove(7).unwrap();

        session.publish(&ViewEvent::ContactSelected { contact_id: 7 });

        assert!(session.form().contact().is_none());
        assert!(session.take_handler_error().is_none());
    }

    #[test]
    fn test_save_refreshes_list_row() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);
        session.select_row(3);
        session.begin_edit();
        session
            .form_mut()
            .set_field(Field::FirstName, "my pal")
            .unwrap();

        assert_eq!(session.save().unwrap(), 4);

        assert_eq!(session.list().rows()[3].first_name.as_deref(), Some("my pal"));
        assert_eq!(session.form().mode(), ViewMode::View);
    }

    #[test]
    fn test_create_appends_to_list() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);
        session.begin_create();
        session
            .form_mut()
            .set_field(Field::FirstName, "Newcomer")
            .unwrap();

        let id = session.save().unwrap();

        assert_eq!(id, 21);
        let list = session.list();
        assert_eq!(list.rows().len(), 21);
        assert_eq!(list.rows()[20].first_name.as_deref(), Some("Newcomer"));
    }

    #[test]
    fn test_remove_reloads_list() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);
        session.select_row(0);

        assert!(session.remove().unwrap());

        assert_eq!(session.list().rows().len(), 19);
        assert_eq!(session.list().rows()[0].id, 2);
        assert!(session.form().contact().is_none());
        assert!(!session.remove().unwrap());
    }

    #[test]
    fn test_failed_save_publishes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);
        session.select_row(1);
        session.begin_edit();
        session
            .form_mut()
            .set_field(Field::BirthDate, "not a date")
            .unwrap();

        assert!(session.save().is_err());

        let stored = session.store().find_by_id(2).unwrap().unwrap();
        assert_eq!(session.list().rows()[1], stored);
        assert!(session.form().is_editable());
    }

    #[test]
    fn test_handler_error_is_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);
        std::fs::remove_dir_all(temp_dir.path()).unwrap();

        session.publish(&ViewEvent::ContactListChanged);

        assert!(session.take_handler_error().is_some());
        assert!(session.take_handler_error().is_none());
    }

    #[test]
    fn test_toggle_window_state() {
        let temp_dir = TempDir::new().unwrap();
        let session = session(&temp_dir);

        assert_eq!(session.toggle_window_state(), WindowState::Maximized);
        assert_eq!(session.list().columns().len(), 5);
    }
}
