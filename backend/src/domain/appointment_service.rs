//! Appointment domain service.
//!
//! Implements the appointment command and query driving ports: load the
//! aggregate, apply one behaviour, reject invalid results, save and publish
//! the drained events.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use pagination::{SearchParams, SearchResult};
use tracing::info;

use crate::domain::ports::{
    AppointmentChanges, AppointmentCommand, AppointmentQuery, AppointmentRepository,
    DomainEventPublisher,
};
use crate::domain::service_support::publish_events;
use crate::domain::{
    AggregateRoot, Appointment, AppointmentDraft, AppointmentFilter, AppointmentId,
    EntityNotFoundError, Error,
};

/// Appointment service implementing the command and query ports.
#[derive(Clone)]
pub struct AppointmentService<R> {
    repo: Arc<R>,
    events: Arc<dyn DomainEventPublisher>,
    clock: Arc<dyn Clock>,
}

impl<R> AppointmentService<R> {
    /// Create a service over the appointment repository.
    pub fn new(
        repo: Arc<R>,
        events: Arc<dyn DomainEventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            events,
            clock,
        }
    }
}

impl<R> AppointmentService<R>
where
    R: AppointmentRepository,
{
    async fn load(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| EntityNotFoundError::new("Appointment", [id]).into())
    }

    async fn commit(&self, mut appointment: Appointment) -> Result<Appointment, Error> {
        appointment.ensure_valid()?;
        self.repo.save(&appointment).await?;
        publish_events(self.events.as_ref(), appointment.drain_events()).await;
        Ok(appointment)
    }

    async fn transition<F>(&self, id: AppointmentId, apply: F) -> Result<Appointment, Error>
    where
        F: FnOnce(&mut Appointment, DateTime<Utc>) + Send,
    {
        let mut appointment = self.load(id).await?;
        apply(&mut appointment, self.clock.utc());
        let appointment = self.commit(appointment).await?;
        info!(
            appointment_id = %appointment.id(),
            status = %appointment.status(),
            "appointment updated"
        );
        Ok(appointment)
    }
}

#[async_trait]
impl<R> AppointmentCommand for AppointmentService<R>
where
    R: AppointmentRepository,
{
    async fn schedule(&self, draft: AppointmentDraft) -> Result<Appointment, Error> {
        let appointment = Appointment::create(draft, self.clock.utc());
        let appointment = self.commit(appointment).await?;
        info!(
            appointment_id = %appointment.id(),
            kind = %appointment.kind(),
            "appointment scheduled"
        );
        Ok(appointment)
    }

    async fn cancel(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.transition(id, |appointment, now| appointment.cancel(now))
            .await
    }

    async fn complete(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.transition(id, |appointment, now| appointment.complete(now))
            .await
    }

    async fn reschedule(
        &self,
        id: AppointmentId,
        appointment_date: DateTime<Utc>,
    ) -> Result<Appointment, Error> {
        self.transition(id, move |appointment, now| {
            appointment.reschedule(appointment_date, now);
        })
        .await
    }

    async fn update(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Appointment, Error> {
        self.transition(id, move |appointment, _now| {
            if let Some(customer_name) = changes.customer_name {
                appointment.change_customer_name(customer_name);
            }
            if let Some(event_date) = changes.event_date {
                appointment.change_event_date(event_date);
            }
        })
        .await
    }

    async fn delete(&self, id: AppointmentId) -> Result<(), Error> {
        let removed = self.repo.delete(&id).await?;
        if !removed {
            return Err(EntityNotFoundError::new("Appointment", [id]).into());
        }
        info!(appointment_id = %id, "appointment deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> AppointmentQuery for AppointmentService<R>
where
    R: AppointmentRepository,
{
    async fn get(&self, id: AppointmentId) -> Result<Appointment, Error> {
        self.load(id).await
    }

    async fn search(
        &self,
        params: SearchParams<AppointmentFilter>,
    ) -> Result<SearchResult<Appointment>, Error> {
        self.repo
            .search(&params)
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "appointment_service_tests.rs"]
mod tests;
