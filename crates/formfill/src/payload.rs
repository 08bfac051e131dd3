//! submission payload
//!
//! Each field type maps its message to the field names google forms expects:
//!
//! | type       | fields                                                   |
//! |------------|----------------------------------------------------------|
//! | words      | `entry.<key>`                                            |
//! | choice     | `entry.<key>`, `entry.<key>_sentinel` (always empty)     |
//! | checkboxes | `entry.<key>` (repeated once per choice)                 |
//! | date       | `entry.<key>_month`, `entry.<key>_day`, `entry.<key>_year` |
//! | time       | `entry.<key>_hour`, `entry.<key>_minute`                 |
//! | extra      | `<key>`                                                  |
//!
//! Skipped dates and times (an empty message) produce no fields at all.
use crate::entry::{Entry, FieldType};
use crate::message::Message;
use serde::{ser::SerializeMap, Serializer};

/// Ordered form fields, ready to be form-encoded
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Payload {
    fields: indexmap::IndexMap<String, Message>,
}

impl Payload {
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<Message>) {
        let key = key.into();
        let previous = self.fields.insert(key, message.into());
        debug_assert!(previous.is_none(), "payload field collision");
    }

    /// Merge all fields of `other`, fields never collide across entries
    pub fn extend(&mut self, other: Payload) {
        for (key, message) in other.fields {
            self.insert(key, message);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Message> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.fields.iter().map(|(key, message)| (key.as_str(), message))
    }

    /// Flat key/value pairs as sent in a form-encoded body
    ///
    /// Multi-value fields repeat their key.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .flat_map(|(key, message)| message.values().map(move |value| (key, value)))
    }
}

impl FromIterator<(String, Message)> for Payload {
    fn from_iter<T: IntoIterator<Item = (String, Message)>>(iter: T) -> Self {
        let mut payload = Payload::default();
        for (key, message) in iter {
            payload.insert(key, message);
        }
        payload
    }
}

impl serde::ser::Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, message) in &self.fields {
            ser.serialize_entry(key, message)?;
        }
        ser.end()
    }
}

const DATE_FIELDS: [&str; 3] = ["month", "day", "year"];
const TIME_FIELDS: [&str; 2] = ["hour", "minute"];

/// Every field name an entry can send
///
/// Two entries of one config must not share any of these.
pub fn field_names(key: &str, field_type: FieldType) -> Vec<String> {
    let suffixed = |suffixes: &[&str]| -> Vec<String> {
        suffixes
            .iter()
            .map(|suffix| format!("entry.{key}_{suffix}"))
            .collect()
    };

    match field_type {
        FieldType::Words | FieldType::Checkboxes => vec![format!("entry.{key}")],
        FieldType::Choice => vec![format!("entry.{key}"), format!("entry.{key}_sentinel")],
        FieldType::Date => suffixed(&DATE_FIELDS),
        FieldType::Time => suffixed(&TIME_FIELDS),
        FieldType::Extra => vec![key.to_string()],
    }
}

/// Format a message into form fields
///
/// # Panic
/// Panics if the message shape does not match what [crate::message::parse_value] produces for
/// `field_type`, e.g. a date with two elements.
pub fn format_message(key: &str, field_type: FieldType, message: Message) -> Payload {
    let mut payload = Payload::default();

    match field_type {
        FieldType::Words | FieldType::Checkboxes => payload.insert(format!("entry.{key}"), message),
        FieldType::Choice => {
            payload.insert(format!("entry.{key}"), message);
            payload.insert(format!("entry.{key}_sentinel"), "");
        }
        FieldType::Date => zip_fields(&mut payload, key, &DATE_FIELDS, message),
        FieldType::Time => zip_fields(&mut payload, key, &TIME_FIELDS, message),
        FieldType::Extra => payload.insert(key, message),
    }

    payload
}

fn zip_fields(payload: &mut Payload, key: &str, suffixes: &[&str], message: Message) {
    match message {
        Message::Multiple(values) => {
            assert_eq!(
                values.len(),
                suffixes.len(),
                "message for entry.{key} has the wrong number of fields"
            );
            for (suffix, value) in suffixes.iter().zip(values) {
                payload.insert(format!("entry.{key}_{suffix}"), value);
            }
        }
        Message::Single(value) => {
            assert!(
                value.is_empty(),
                "message for entry.{key} must be a list or skipped"
            );
        }
    }
}

/// Format and merge messages of all entries, in entry order
pub fn format_entries(entries: &[Entry], messages: Vec<Message>) -> Payload {
    debug_assert_eq!(entries.len(), messages.len());

    let mut payload = Payload::default();
    for (entry, message) in entries.iter().zip(messages) {
        payload.extend(format_message(&entry.key, entry.field_type, message));
    }
    payload
}
