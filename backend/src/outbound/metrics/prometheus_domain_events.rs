//! Prometheus decorator counting published domain events.
//!
//! Wraps another [`DomainEventPublisher`] and increments one counter per
//! event after the inner publisher accepted the batch.

use std::sync::Arc;

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::DomainEvent;
use crate::domain::ports::{DomainEventPublisher, DomainEventPublisherError};

/// Counting publisher.
///
/// # Metric Specification
///
/// - **Name**: `atelier_domain_events_total`
/// - **Type**: Counter
/// - **Labels**:
///   - `event`: dotted event name, e.g. `booking.created`
pub struct PrometheusEventPublisher {
    inner: Arc<dyn DomainEventPublisher>,
    events_total: IntCounterVec,
}

impl PrometheusEventPublisher {
    /// Register the counter with `registry` and wrap `inner`.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already
    /// registered.
    pub fn new(
        inner: Arc<dyn DomainEventPublisher>,
        registry: &Registry,
    ) -> Result<Self, prometheus::Error> {
        let events_total = IntCounterVec::new(
            Opts::new(
                "atelier_domain_events_total",
                "Domain events published by name",
            ),
            &["event"],
        )?;
        registry.register(Box::new(events_total.clone()))?;
        Ok(Self {
            inner,
            events_total,
        })
    }
}

#[async_trait]
impl DomainEventPublisher for PrometheusEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), DomainEventPublisherError> {
        let names: Vec<&'static str> = events.iter().map(DomainEvent::name).collect();
        self.inner.publish(events).await?;
        for name in names {
            self.events_total.with_label_values(&[name]).inc();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::MockDomainEventPublisher;
    use crate::domain::{ProductEvent, ProductKind};

    fn picked_up() -> DomainEvent {
        DomainEvent::from(ProductEvent::PickedUp {
            kind: ProductKind::Dress,
            id: Uuid::new_v4(),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn counts_events_the_inner_publisher_accepted() {
        let mut inner = MockDomainEventPublisher::new();
        inner.expect_publish().times(1).returning(|_| Ok(()));
        let registry = Registry::new();
        let publisher =
            PrometheusEventPublisher::new(Arc::new(inner), &registry).expect("registers");

        publisher
            .publish(vec![picked_up(), picked_up()])
            .await
            .expect("publish succeeds");

        let counter = publisher
            .events_total
            .with_label_values(&["product.picked_up"]);
        assert_eq!(counter.get(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_publish_is_not_counted() {
        let mut inner = MockDomainEventPublisher::new();
        inner
            .expect_publish()
            .returning(|_| Err(DomainEventPublisherError::publish("broker down")));
        let registry = Registry::new();
        let publisher =
            PrometheusEventPublisher::new(Arc::new(inner), &registry).expect("registers");

        let result = publisher.publish(vec![picked_up()]).await;

        assert!(result.is_err());
        let counter = publisher
            .events_total
            .with_label_values(&["product.picked_up"]);
        assert_eq!(counter.get(), 0);
    }
}
