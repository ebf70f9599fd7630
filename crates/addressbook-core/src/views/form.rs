//! Contact form (detail) view
//!
//! Shows one contact at a time. In `View` mode the fields are read-only;
//! `Edit` mode makes them writable until the contact is saved or the edit
//! is cancelled.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use super::ViewMode;
use crate::events::ViewEvent;
use crate::models::{Contact, ContactId};
use crate::storage::{StoreError, StoreResult};
use crate::store::ContactStore;

/// Date format accepted by the birth date field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An editable field of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    PhoneNumber,
    Email,
    BirthDate,
}

impl Field {
    /// Every field, in display order
    pub const ALL: [Field; 5] = [
        Field::FirstName,
        Field::LastName,
        Field::PhoneNumber,
        Field::Email,
        Field::BirthDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::PhoneNumber => "Phone number",
            Field::Email => "Email",
            Field::BirthDate => "Birth date",
        }
    }

    /// The next field in display order, wrapping around
    pub fn next(&self) -> Field {
        let index = Field::ALL.iter().position(|f| f == self).unwrap_or(0);
        Field::ALL[(index + 1) % Field::ALL.len()]
    }
}

#[derive(Error, Debug)]
pub enum FormError {
    #[error("The form is not in edit mode")]
    ReadOnly,

    #[error("{label}: {reason}", label = .field.label())]
    InvalidField { field: Field, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Text values bound to a contact's fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub birth_date: String,
}

impl FormFields {
    /// Fill the fields from a contact
    pub fn read_contact(contact: &Contact) -> Self {
        Self {
            first_name: contact.first_name.clone().unwrap_or_default(),
            last_name: contact.last_name.clone().unwrap_or_default(),
            phone_number: contact.phone_number.clone().unwrap_or_default(),
            email: contact.email.clone().unwrap_or_default(),
            birth_date: contact
                .birth_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    /// Write the fields into a contact
    ///
    /// Validates everything first; on error the contact is left untouched.
    /// Blank fields become `None`.
    pub fn write_contact(&self, contact: &mut Contact) -> Result<(), FormError> {
        let birth_date = match self.birth_date.trim() {
            "" => None,
            text => Some(NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
                FormError::InvalidField {
                    field: Field::BirthDate,
                    reason: format!("'{}' is not a date (expected YYYY-MM-DD)", text),
                }
            })?),
        };

        let email = non_blank(&self.email);
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(FormError::InvalidField {
                    field: Field::Email,
                    reason: format!("'{}' is not an email address", email),
                });
            }
        }

        contact.first_name = non_blank(&self.first_name);
        contact.last_name = non_blank(&self.last_name);
        contact.phone_number = non_blank(&self.phone_number);
        contact.email = email;
        contact.birth_date = birth_date;
        Ok(())
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::PhoneNumber => &self.phone_number,
            Field::Email => &self.email,
            Field::BirthDate => &self.birth_date,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::PhoneNumber => &mut self.phone_number,
            Field::Email => &mut self.email,
            Field::BirthDate => &mut self.birth_date,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Detail view of a single contact
#[derive(Debug, Default)]
pub struct ContactFormView {
    mode: ViewMode,
    /// The record last loaded from (or saved to) the store
    contact: Option<Contact>,
    fields: FormFields,
}

impl ContactFormView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_editable(&self) -> bool {
        self.mode == ViewMode::Edit
    }

    pub fn contact(&self) -> Option<&Contact> {
        self.contact.as_ref()
    }

    pub fn contact_id(&self) -> Option<ContactId> {
        self.contact.as_ref().map(|c| c.id)
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Change a field's text. Only allowed in edit mode.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), FormError> {
        *self.field_mut(field)? = value.into();
        Ok(())
    }

    /// Mutable access to a field's text. Only allowed in edit mode.
    pub fn field_mut(&mut self, field: Field) -> Result<&mut String, FormError> {
        if !self.is_editable() {
            return Err(FormError::ReadOnly);
        }
        Ok(self.fields.get_mut(field))
    }

    /// Picture URL of the shown contact, when it has one
    pub fn image(&self) -> Option<&str> {
        self.contact
            .as_ref()
            .map(|c| c.image.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Whether the remove action is offered
    pub fn can_remove(&self) -> bool {
        self.contact.is_some()
    }

    /// Label of the primary action button
    pub fn action_label(&self) -> &'static str {
        match (self.mode, &self.contact) {
            (ViewMode::Edit, _) => "Save",
            (ViewMode::View, Some(_)) => "Edit",
            (ViewMode::View, None) => "Create new",
        }
    }

    /// Show the contact with the given id, or clear the form if it is gone
    pub fn on_contact_selected(&mut self, store: &ContactStore, id: ContactId) -> StoreResult<()> {
        match store.find_by_id(id)? {
            Some(contact) => {
                debug!(id, "Form showing contact");
                self.fields = FormFields::read_contact(&contact);
                self.contact = Some(contact);
            }
            None => {
                debug!(id, "Selected contact no longer exists, clearing form");
                self.clear();
            }
        }
        Ok(())
    }

    /// Switch to edit mode. Returns false if already editing.
    pub fn begin_edit(&mut self) -> bool {
        if self.is_editable() {
            return false;
        }
        self.mode = ViewMode::Edit;
        true
    }

    /// Start editing a blank contact
    pub fn begin_create(&mut self) {
        self.clear();
        self.mode = ViewMode::Edit;
    }

    /// The primary action: begin editing in view mode, save in edit mode
    pub fn action(&mut self, store: &ContactStore) -> Result<Option<ViewEvent>, FormError> {
        match self.mode {
            ViewMode::View => {
                self.begin_edit();
                Ok(None)
            }
            ViewMode::Edit => self.save(store).map(Some),
        }
    }

    /// Write the fields back to the store
    ///
    /// Updates the loaded contact, or creates a new one with the next free
    /// id when nothing was loaded. On success the form shows the stored
    /// record in view mode. On failure it stays in edit mode with the
    /// user's input intact.
    pub fn save(&mut self, store: &ContactStore) -> Result<ViewEvent, FormError> {
        if !self.is_editable() {
            return Err(FormError::ReadOnly);
        }

        let saved = match &self.contact {
            Some(existing) => {
                let mut contact = existing.clone();
                self.fields.write_contact(&mut contact)?;
                store.update(&contact)?;
                info!(id = contact.id, "Saved contact");
                contact
            }
            None => {
                let mut contact = Contact::new(0);
                self.fields.write_contact(&mut contact)?;
                let contact = store.create_next(&contact)?;
                info!(id = contact.id, "Created contact");
                contact
            }
        };

        let event = ViewEvent::ContactUpdated {
            contact_id: saved.id,
        };
        self.fields = FormFields::read_contact(&saved);
        self.contact = Some(saved);
        self.mode = ViewMode::View;
        Ok(event)
    }

    /// Abandon the current edit, or clear the form when not editing
    ///
    /// In edit mode the last loaded record is restored (blank fields if
    /// there was none) and the form returns to view mode.
    pub fn cancel(&mut self) {
        match self.mode {
            ViewMode::Edit => {
                self.fields = self
                    .contact
                    .as_ref()
                    .map(FormFields::read_contact)
                    .unwrap_or_default();
                self.mode = ViewMode::View;
            }
            ViewMode::View => self.clear(),
        }
    }

    /// Forget the shown contact and return to view mode
    pub fn clear(&mut self) {
        self.contact = None;
        self.fields = FormFields::default();
        self.mode = ViewMode::View;
    }

    /// Delete the shown contact from the store
    ///
    /// Returns the event to broadcast, or `None` if no contact was shown.
    pub fn remove(&mut self, store: &ContactStore) -> StoreResult<Option<ViewEvent>> {
        let Some(id) = self.contact_id() else {
            return Ok(None);
        };
        let existed = store.remove(id)?;
        info!(id, existed, "Removed contact");
        self.clear();
        Ok(Some(ViewEvent::ContactListChanged))
    }
}
