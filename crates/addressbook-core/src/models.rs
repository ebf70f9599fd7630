//! Data models for the address book
//!
//! Defines the `Contact` record. Contacts are owned by the
//! [`ContactStore`](crate::store::ContactStore); views only ever hold
//! transient copies that they re-fetch by id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a stored contact
pub type ContactId = i64;

/// A single address book entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique identifier, assigned by the store and never changed
    pub id: ContactId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// URL of the contact's picture (empty when there is none)
    #[serde(default)]
    pub image: String,
}

impl Contact {
    /// Create an empty contact with the given id
    pub fn new(id: ContactId) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            phone_number: None,
            email: None,
            birth_date: None,
            image: String::new(),
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Copy of this contact carrying a different id
    pub fn with_id(&self, id: ContactId) -> Self {
        Self { id, ..self.clone() }
    }

    /// "First Last", falling back to the email or the id
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !name.is_empty() {
            name
        } else if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            email.to_string()
        } else {
            format!("#{}", self.id)
        }
    }
}

/// Two contacts are equal when every field except `image` matches
impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.phone_number == other.phone_number
            && self.email == other.email
            && self.birth_date == other.birth_date
    }
}

impl Eq for Contact {}

#[cfg(test)]
mod tests {
    use super::*;

    fn miriam() -> Contact {
        Contact::new(21)
            .with_first_name("Miriam")
            .with_last_name("Mirador")
            .with_birth_date(NaiveDate::from_ymd_opt(1985, 1, 1).unwrap())
            .with_email("me@boogle.bong")
            .with_phone_number("112 332 15141")
    }

    #[test]
    fn test_contact_new() {
        let contact = Contact::new(3);
        assert_eq!(contact.id, 3);
        assert!(contact.first_name.is_none());
        assert!(contact.birth_date.is_none());
        assert!(contact.image.is_empty());
    }

    #[test]
    fn test_equality_ignores_image() {
        let a = miriam().with_image("https://example.com/a.jpg");
        let b = miriam().with_image("https://example.com/b.jpg");
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_compares_other_fields() {
        let a = miriam();
        assert_ne!(a, a.clone().with_first_name("Other"));
        assert_ne!(a, a.with_id(22));
        assert_ne!(a, Contact { birth_date: None, ..a.clone() });
    }

    #[test]
    fn test_display_name() {
        assert_eq!(miriam().display_name(), "Miriam Mirador");
        assert_eq!(
            Contact::new(1).with_email("x@y.z").display_name(),
            "x@y.z"
        );
        assert_eq!(Contact::new(7).display_name(), "#7");
    }

    #[test]
    fn test_serialization_uses_column_names() {
        let json = serde_json::to_value(miriam()).unwrap();
        assert_eq!(json["firstName"], "Miriam");
        assert_eq!(json["phoneNumber"], "112 332 15141");
        assert_eq!(json["birthDate"], "1985-01-01");

        let back: Contact = serde_json::from_value(json).unwrap();
        assert_eq!(back, miriam());
    }
}
