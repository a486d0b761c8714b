//! Publisher that writes every domain event to the structured log.
//!
//! Events are logged at `info` under the `atelier::events` target with
//! their dotted name and JSON payload, so a log shipper can route them
//! without a message broker.

use async_trait::async_trait;
use tracing::info;

use crate::domain::DomainEvent;
use crate::domain::ports::{DomainEventPublisher, DomainEventPublisherError};

/// Logs events instead of delivering them to a broker.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

#[async_trait]
impl DomainEventPublisher for TracingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), DomainEventPublisherError> {
        for event in &events {
            let payload = serde_json::to_string(event)
                .map_err(|err| DomainEventPublisherError::publish(err.to_string()))?;
            info!(target: "atelier::events", event = event.name(), %payload, "domain event");
        }
        Ok(())
    }
}
