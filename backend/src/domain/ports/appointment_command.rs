//! Driving port for appointment mutations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Appointment, AppointmentDraft, AppointmentId, Error};

/// Partial update of an appointment's customer details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentChanges {
    /// New customer name.
    pub customer_name: Option<String>,
    /// New event date.
    pub event_date: Option<NaiveDate>,
}

impl AppointmentChanges {
    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none() && self.event_date.is_none()
    }
}

/// Driving port for appointment write operations.
///
/// Every mutation returns the saved aggregate. Validation failures surface
/// as `unprocessable_entity` errors carrying the notification as details;
/// unknown ids surface as `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentCommand: Send + Sync {
    /// Schedule a new appointment.
    async fn schedule(&self, draft: AppointmentDraft) -> Result<Appointment, Error>;

    /// Cancel a scheduled appointment.
    async fn cancel(&self, id: AppointmentId) -> Result<Appointment, Error>;

    /// Mark a scheduled appointment as completed.
    async fn complete(&self, id: AppointmentId) -> Result<Appointment, Error>;

    /// Move a scheduled appointment to a new time.
    async fn reschedule(
        &self,
        id: AppointmentId,
        appointment_date: DateTime<Utc>,
    ) -> Result<Appointment, Error>;

    /// Change customer details.
    async fn update(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Appointment, Error>;

    /// Remove an appointment.
    async fn delete(&self, id: AppointmentId) -> Result<(), Error>;
}
