//! Port for handing drained aggregate events to the outside world.

use async_trait::async_trait;

use crate::domain::DomainEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised while publishing domain events.
    pub enum DomainEventPublisherError {
        /// The events could not be delivered.
        Publish { message: String } => ServiceUnavailable:
            "domain event publish failed: {message}",
    }
}

/// Port for publishing events after the owning aggregate was saved.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainEventPublisher: Send + Sync {
    /// Publish `events` in order.
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), DomainEventPublisherError>;
}

/// Publisher that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDomainEventPublisher;

#[async_trait]
impl DomainEventPublisher for FixtureDomainEventPublisher {
    async fn publish(&self, _events: Vec<DomainEvent>) -> Result<(), DomainEventPublisherError> {
        Ok(())
    }
}
