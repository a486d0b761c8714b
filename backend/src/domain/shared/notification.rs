//! Accumulator for validation failures raised while mutating an aggregate.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    General(String),
    Field { field: String, messages: Vec<String> },
}

/// Ordered collection of general and field-keyed validation messages.
///
/// Entries keep insertion order; a field appears once and keeps its
/// messages deduplicated.
///
/// # Examples
/// ```
/// use atelier::domain::Notification;
/// use serde_json::json;
///
/// let mut notification = Notification::default();
/// notification.add_error("Customer name is required", Some("customer_name"));
/// notification.add_error("Booking is locked", None);
/// assert!(notification.has_errors());
/// assert_eq!(
///     notification.to_json(),
///     json!([{ "customer_name": ["Customer name is required"] }, "Booking is locked"])
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    entries: Vec<Entry>,
}

impl Notification {
    /// Empty notification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, to `field` when given or as a general error.
    pub fn add_error(&mut self, message: impl Into<String>, field: Option<&str>) {
        let message = message.into();
        match field {
            Some(field) => {
                if let Some(messages) = self.field_messages_mut(field)
                    && !messages.contains(&message)
                {
                    messages.push(message);
                }
            }
            None => {
                let known = self
                    .entries
                    .iter()
                    .any(|entry| matches!(entry, Entry::General(existing) if *existing == message));
                if !known {
                    self.entries.push(Entry::General(message));
                }
            }
        }
    }

    /// Replace the messages of `field`, or add general messages when no
    /// field is given.
    pub fn set_error<I, S>(&mut self, messages: I, field: Option<&str>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match field {
            Some(field) => {
                let replacement: Vec<String> = messages.into_iter().map(Into::into).collect();
                if let Some(existing) = self.field_messages_mut(field) {
                    *existing = replacement;
                }
            }
            None => {
                for message in messages {
                    self.add_error(message, None);
                }
            }
        }
    }

    /// True when any message has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|entry| match entry {
            Entry::General(_) => true,
            Entry::Field { messages, .. } => !messages.is_empty(),
        })
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                Entry::Field {
                    field: name,
                    messages,
                } if name == field => Some(messages.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Messages not tied to a field.
    pub fn general_errors(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::General(message) => Some(message.as_str()),
            Entry::Field { .. } => None,
        })
    }

    /// Merge every message from `other`.
    pub fn copy_errors(&mut self, other: &Notification) {
        for entry in &other.entries {
            match entry {
                Entry::General(message) => self.add_error(message.clone(), None),
                Entry::Field { field, messages } => {
                    for message in messages {
                        self.add_error(message.clone(), Some(field));
                    }
                }
            }
        }
    }

    /// Drop the messages recorded for `field`.
    pub fn clear_field(&mut self, field: &str) {
        self.entries
            .retain(|entry| !matches!(entry, Entry::Field { field: name, .. } if name == field));
    }

    /// JSON array of plain strings (general errors) and `{field: [messages]}`
    /// objects, in insertion order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let items = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::General(message) => Some(Value::String(message.clone())),
                Entry::Field { messages, .. } if messages.is_empty() => None,
                Entry::Field { field, messages } => {
                    let mut object = Map::new();
                    object.insert(
                        field.clone(),
                        Value::Array(messages.iter().cloned().map(Value::String).collect()),
                    );
                    Some(Value::Object(object))
                }
            })
            .collect();
        Value::Array(items)
    }

    fn field_messages_mut(&mut self, field: &str) -> Option<&mut Vec<String>> {
        let known = self
            .entries
            .iter()
            .any(|entry| matches!(entry, Entry::Field { field: name, .. } if name == field));
        if !known {
            self.entries.push(Entry::Field {
                field: field.to_owned(),
                messages: Vec::new(),
            });
        }
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Field {
                field: name,
                messages,
            } if name == field => Some(messages),
            _ => None,
        })
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn field_messages_are_deduplicated() {
        let mut notification = Notification::new();
        notification.add_error("required", Some("color"));
        notification.add_error("required", Some("color"));
        notification.add_error("too long", Some("color"));
        assert_eq!(notification.field_errors("color"), ["required", "too long"]);
    }

    #[rstest]
    fn set_error_replaces_field_messages() {
        let mut notification = Notification::new();
        notification.add_error("old", Some("model"));
        notification.set_error(["new"], Some("model"));
        assert_eq!(notification.field_errors("model"), ["new"]);
    }

    #[rstest]
    fn set_error_without_field_adds_general_messages() {
        let mut notification = Notification::new();
        notification.set_error(["a", "b"], None);
        assert_eq!(notification.general_errors().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[rstest]
    fn empty_notification_has_no_errors() {
        let notification = Notification::new();
        assert!(!notification.has_errors());
        assert_eq!(notification.to_json(), json!([]));
    }

    #[rstest]
    fn copy_errors_merges_in_order() {
        let mut first = Notification::new();
        first.add_error("a", Some("x"));
        let mut second = Notification::new();
        second.add_error("b", Some("x"));
        second.add_error("general", None);
        first.copy_errors(&second);
        assert_eq!(first.to_json(), json!([{ "x": ["a", "b"] }, "general"]));
    }

    #[rstest]
    fn clear_field_removes_only_that_field() {
        let mut notification = Notification::new();
        notification.add_error("a", Some("x"));
        notification.add_error("b", Some("y"));
        notification.clear_field("x");
        assert_eq!(notification.to_json(), json!([{ "y": ["b"] }]));
    }
}
