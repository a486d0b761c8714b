//! Typed failures raised by aggregates, value objects and use cases.
//!
//! Each converts into the transport-agnostic [`Error`] payload so inbound
//! adapters only ever see one error type.

use serde_json::json;

use super::Notification;
use crate::domain::Error;

/// A lookup by id found nothing.
///
/// # Examples
/// ```
/// use atelier::domain::EntityNotFoundError;
///
/// let err = EntityNotFoundError::new("Clutch", ["42"]);
/// assert_eq!(err.to_string(), "Clutch with id(s) 42 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with id(s) {} not found", .ids.join(", "))]
pub struct EntityNotFoundError {
    entity: &'static str,
    ids: Vec<String>,
}

impl EntityNotFoundError {
    /// Record the entity name and the ids that were requested.
    pub fn new<I, S>(entity: &'static str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            entity,
            ids: ids.into_iter().map(|id| id.to_string()).collect(),
        }
    }

    /// Entity name, for example `Dress`.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Ids that could not be found.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl From<EntityNotFoundError> for Error {
    fn from(value: EntityNotFoundError) -> Self {
        Error::not_found(value.to_string())
    }
}

/// An aggregate accumulated validation errors during a behaviour call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Entity validation failed: {notification}")]
pub struct EntityValidationError {
    notification: Notification,
}

impl EntityValidationError {
    /// Wrap the accumulated notification.
    pub fn new(notification: Notification) -> Self {
        Self { notification }
    }

    /// Accumulated messages.
    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    /// `Ok` when `notification` is clean, otherwise the wrapped error.
    pub fn check(notification: &Notification) -> Result<(), Self> {
        if notification.has_errors() {
            Err(Self::new(notification.clone()))
        } else {
            Ok(())
        }
    }
}

impl From<EntityValidationError> for Error {
    fn from(value: EntityValidationError) -> Self {
        Error::unprocessable_entity("Entity validation failed")
            .with_details(value.notification.to_json())
    }
}

/// A value object rejected its raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value object: {}", .errors.join("; "))]
pub struct InvalidValueObject {
    errors: Vec<String>,
}

impl InvalidValueObject {
    /// Single-message failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }

    /// Failure carrying several messages.
    pub fn from_errors<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    /// Raw messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Record every message against `field` in a fresh notification.
    pub fn into_field_notification(self, field: &str) -> Notification {
        let mut notification = Notification::new();
        for message in self.errors {
            notification.add_error(message, Some(field));
        }
        notification
    }
}

impl From<InvalidValueObject> for Error {
    fn from(value: InvalidValueObject) -> Self {
        Error::invalid_request("Invalid value object").with_details(json!({ "errors": value.errors }))
    }
}
