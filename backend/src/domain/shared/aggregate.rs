//! Behaviour shared by every aggregate root.

use super::{EntityValidationError, Notification};
use crate::domain::DomainEvent;

/// Entity with identity, an error notification and an event outbox.
pub trait AggregateRoot {
    /// Validation messages accumulated by the last behaviour calls.
    fn notification(&self) -> &Notification;

    /// Take the events recorded since the last drain.
    fn drain_events(&mut self) -> Vec<DomainEvent>;

    /// `Err` carrying the notification when it holds any message.
    fn ensure_valid(&self) -> Result<(), EntityValidationError> {
        EntityValidationError::check(self.notification())
    }
}
