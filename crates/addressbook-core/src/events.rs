//! Coordination events between views
//!
//! Views never reference each other. They talk through a handful of named
//! events that carry a contact id and nothing else; whoever receives one
//! re-fetches the record from the store.
//!
//! The wire form (name plus string parameters keyed by `contactId`) is kept
//! so events can cross a process or transport boundary unchanged.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::models::ContactId;

pub const EVENT_CONTACT_SELECTED: &str = "contact-selected";
pub const EVENT_CONTACT_UPDATED: &str = "contact-updated";
pub const EVENT_CONTACT_LIST_CHANGED: &str = "contact-list-changed";

/// Parameter key carrying the contact id
pub const KEY_CONTACT_ID: &str = "contactId";

/// A coordination event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// A row was activated in the list
    ContactSelected { contact_id: ContactId },
    /// A contact was created or saved
    ContactUpdated { contact_id: ContactId },
    /// The set of contacts changed; subscribers should reload everything
    ContactListChanged,
}

/// Event kinds, used to subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ContactSelected,
    ContactUpdated,
    ContactListChanged,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EventError {
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),

    #[error("Event '{event}' is missing the '{key}' parameter")]
    MissingParameter { event: String, key: &'static str },

    #[error("Event '{event}' has an invalid contact id '{value}'")]
    InvalidContactId { event: String, value: String },
}

impl ViewEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ViewEvent::ContactSelected { .. } => EventKind::ContactSelected,
            ViewEvent::ContactUpdated { .. } => EventKind::ContactUpdated,
            ViewEvent::ContactListChanged => EventKind::ContactListChanged,
        }
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The contact this event refers to, if any
    pub fn contact_id(&self) -> Option<ContactId> {
        match self {
            ViewEvent::ContactSelected { contact_id } | ViewEvent::ContactUpdated { contact_id } => {
                Some(*contact_id)
            }
            ViewEvent::ContactListChanged => None,
        }
    }

    /// Parameters in wire form
    pub fn parameters(&self) -> BTreeMap<String, String> {
        self.contact_id()
            .map(|id| (KEY_CONTACT_ID.to_string(), id.to_string()))
            .into_iter()
            .collect()
    }

    /// Rebuild an event from its wire form
    pub fn from_parameters(
        name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Self, EventError> {
        let kind = EventKind::from_name(name)?;
        if kind == EventKind::ContactListChanged {
            return Ok(ViewEvent::ContactListChanged);
        }

        let value = parameters
            .get(KEY_CONTACT_ID)
            .ok_or_else(|| EventError::MissingParameter {
                event: name.to_string(),
                key: KEY_CONTACT_ID,
            })?;
        let contact_id = value
            .trim()
            .parse()
            .map_err(|_| EventError::InvalidContactId {
                event: name.to_string(),
                value: value.clone(),
            })?;

        Ok(match kind {
            EventKind::ContactSelected => ViewEvent::ContactSelected { contact_id },
            EventKind::ContactUpdated => ViewEvent::ContactUpdated { contact_id },
            EventKind::ContactListChanged => ViewEvent::ContactListChanged,
        })
    }
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::ContactSelected => EVENT_CONTACT_SELECTED,
            EventKind::ContactUpdated => EVENT_CONTACT_UPDATED,
            EventKind::ContactListChanged => EVENT_CONTACT_LIST_CHANGED,
        }
    }

    pub fn from_name(name: &str) -> Result<Self, EventError> {
        match name {
            EVENT_CONTACT_SELECTED => Ok(EventKind::ContactSelected),
            EVENT_CONTACT_UPDATED => Ok(EventKind::ContactUpdated),
            EVENT_CONTACT_LIST_CHANGED => Ok(EventKind::ContactListChanged),
            other => Err(EventError::UnknownEvent(other.to_string())),
        }
    }
}

impl fmt::Display for ViewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.contact_id() {
            Some(id) => write!(f, "{}{{{}: {}}}", self.name(), KEY_CONTACT_ID, id),
            None => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_names() {
        assert_eq!(
            ViewEvent::ContactSelected { contact_id: 1 }.name(),
            "contact-selected"
        );
        assert_eq!(
            ViewEvent::ContactUpdated { contact_id: 1 }.name(),
            "contact-updated"
        );
        assert_eq!(ViewEvent::ContactListChanged.name(), "contact-list-changed");
    }

    #[test]
    fn test_parameters_carry_only_the_id() {
        let event = ViewEvent::ContactUpdated { contact_id: 12 };
        assert_eq!(event.parameters(), params(&[("contactId", "12")]));
        assert!(ViewEvent::ContactListChanged.parameters().is_empty());
    }

    #[test]
    fn test_from_parameters() {
        let event =
            ViewEvent::from_parameters("contact-selected", &params(&[("contactId", "7")])).unwrap();
        assert_eq!(event, ViewEvent::ContactSelected { contact_id: 7 });

        let event = ViewEvent::from_parameters("contact-list-changed", &BTreeMap::new()).unwrap();
        assert_eq!(event, ViewEvent::ContactListChanged);
    }

    #[test]
    fn test_from_parameters_errors() {
        assert_eq!(
            ViewEvent::from_parameters("contact-deleted", &BTreeMap::new()),
            Err(EventError::UnknownEvent("contact-deleted".to_string()))
        );
        assert!(matches!(
            ViewEvent::from_parameters("contact-updated", &BTreeMap::new()),
            Err(EventError::MissingParameter { .. })
        ));
        assert!(matches!(
            ViewEvent::from_parameters("contact-updated", &params(&[("contactId", "seven")])),
            Err(EventError::InvalidContactId { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ViewEvent::ContactSelected { contact_id: 3 }.to_string(),
            "contact-selected{contactId: 3}"
        );
        assert_eq!(
            ViewEvent::ContactListChanged.to_string(),
            "contact-list-changed"
        );
    }
}
