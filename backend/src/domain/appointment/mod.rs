//! Appointment aggregate: fittings, adjustments, pick-ups and returns.
//!
//! Status only moves through [`Appointment::cancel`],
//! [`Appointment::complete`] and [`Appointment::reschedule`]; each move
//! appends to the history. Invalid transitions are recorded as `status`
//! errors on the notification instead of failing.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use pagination::{SearchFilter, normalize_text};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::shared::{define_identifier, string_enum};
use crate::domain::{
    AggregateRoot, AppointmentEvent, BookingId, DomainEvent, Notification, Outbox, Rule,
    ValidationRules, is_present, max_chars,
};

define_identifier! {
    /// Appointment identifier.
    AppointmentId
}

/// Maximum length of the customer name.
pub const CUSTOMER_NAME_MAX: usize = 255;

/// Recorded when the customer name is blank.
pub const CUSTOMER_NAME_REQUIRED: &str = "Customer name is required";
/// Recorded when the customer name is too long.
pub const CUSTOMER_NAME_TOO_LONG: &str = "Customer name must be at most 255 characters";
/// Recorded when an appointment is placed before the current time.
pub const APPOINTMENT_DATE_IN_PAST: &str = "Appointment date cannot be in the past";

/// Reason for the visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentKind {
    /// First fitting.
    InitialVisit,
    /// Follow-up to check adjustments.
    ReturnForAdjustment,
    /// Customer collects the items.
    Pickup,
    /// Customer brings the items back.
    Return,
}

/// Appointment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    /// Waiting to happen.
    Scheduled,
    /// Called off.
    Cancelled,
    /// Took place.
    Completed,
}

string_enum!(AppointmentKind {
    InitialVisit => "INITIAL_VISIT",
    ReturnForAdjustment => "RETURN_FOR_ADJUSTMENT",
    Pickup => "PICKUP",
    Return => "RETURN",
});

string_enum!(AppointmentStatus {
    Scheduled => "SCHEDULED",
    Cancelled => "CANCELLED",
    Completed => "COMPLETED",
});

/// One status change in the appointment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentHistoryEntry {
    /// Status entered.
    pub status: AppointmentStatus,
    /// When the change happened.
    pub date: DateTime<Utc>,
}

/// Input for [`Appointment::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    /// Booking this appointment belongs to, if any.
    pub booking_id: Option<BookingId>,
    /// Scheduled time.
    pub appointment_date: DateTime<Utc>,
    /// Customer name.
    pub customer_name: String,
    /// Date of the customer's event.
    pub event_date: NaiveDate,
    /// Reason for the visit.
    pub kind: AppointmentKind,
}

/// Persisted state used by [`Appointment::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRecord {
    /// Identifier.
    pub id: AppointmentId,
    /// Owning booking.
    pub booking_id: Option<BookingId>,
    /// Scheduled time.
    pub appointment_date: DateTime<Utc>,
    /// Customer name.
    pub customer_name: String,
    /// Date of the customer's event.
    pub event_date: NaiveDate,
    /// Reason for the visit.
    pub kind: AppointmentKind,
    /// Current status.
    pub status: AppointmentStatus,
    /// Status history, oldest first.
    pub history: Vec<AppointmentHistoryEntry>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

static RULES: LazyLock<ValidationRules<Appointment>> = LazyLock::new(|| {
    ValidationRules::new().field(
        "customer_name",
        [
            Rule::new(CUSTOMER_NAME_REQUIRED, |a: &Appointment| {
                is_present(&a.customer_name)
            }),
            Rule::new(CUSTOMER_NAME_TOO_LONG, |a: &Appointment| {
                max_chars(&a.customer_name, CUSTOMER_NAME_MAX)
            }),
        ],
    )
});

/// Appointment aggregate root.
///
/// # Examples
/// ```
/// use atelier::domain::{AggregateRoot, Appointment, AppointmentDraft, AppointmentKind, AppointmentStatus};
/// use chrono::{Duration, NaiveDate, Utc};
///
/// let now = Utc::now();
/// let mut appointment = Appointment::create(
///     AppointmentDraft {
///         booking_id: None,
///         appointment_date: now + Duration::days(1),
///         customer_name: "Ana".into(),
///         event_date: NaiveDate::from_ymd_opt(2099, 1, 1).expect("valid date"),
///         kind: AppointmentKind::InitialVisit,
///     },
///     now,
/// );
/// appointment.cancel(now);
/// appointment.cancel(now);
/// assert_eq!(appointment.status(), AppointmentStatus::Cancelled);
/// assert!(appointment.notification().has_errors());
/// ```
#[derive(Debug, Clone)]
pub struct Appointment {
    id: AppointmentId,
    booking_id: Option<BookingId>,
    appointment_date: DateTime<Utc>,
    customer_name: String,
    event_date: NaiveDate,
    kind: AppointmentKind,
    status: AppointmentStatus,
    history: Vec<AppointmentHistoryEntry>,
    created_at: DateTime<Utc>,
    notification: Notification,
    outbox: Outbox<DomainEvent>,
}

impl Appointment {
    /// Schedule a new appointment, validating every field.
    pub fn create(draft: AppointmentDraft, now: DateTime<Utc>) -> Self {
        let AppointmentDraft {
            booking_id,
            appointment_date,
            customer_name,
            event_date,
            kind,
        } = draft;
        let mut appointment = Self {
            id: AppointmentId::random(),
            booking_id,
            appointment_date,
            customer_name,
            event_date,
            kind,
            status: AppointmentStatus::Scheduled,
            history: vec![AppointmentHistoryEntry {
                status: AppointmentStatus::Scheduled,
                date: now,
            }],
            created_at: now,
            notification: Notification::new(),
            outbox: Outbox::default(),
        };
        appointment.revalidate(None);
        appointment.check_date_not_past(now);
        appointment
            .outbox
            .record(DomainEvent::from(AppointmentEvent::Scheduled {
                id: appointment.id,
                appointment_date,
            }));
        appointment
    }

    /// Rebuild from persisted state without re-running validation.
    pub fn restore(record: AppointmentRecord) -> Self {
        Self {
            id: record.id,
            booking_id: record.booking_id,
            appointment_date: record.appointment_date,
            customer_name: record.customer_name,
            event_date: record.event_date,
            kind: record.kind,
            status: record.status,
            history: record.history,
            created_at: record.created_at,
            notification: Notification::new(),
            outbox: Outbox::default(),
        }
    }

    /// Identifier.
    pub fn id(&self) -> AppointmentId {
        self.id
    }

    /// Owning booking.
    pub fn booking_id(&self) -> Option<BookingId> {
        self.booking_id
    }

    /// Scheduled time.
    pub fn appointment_date(&self) -> DateTime<Utc> {
        self.appointment_date
    }

    /// Customer name.
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Customer event date.
    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }

    /// Reason for the visit.
    pub fn kind(&self) -> AppointmentKind {
        self.kind
    }

    /// Current status.
    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    /// Status history, oldest first.
    pub fn history(&self) -> &[AppointmentHistoryEntry] {
        &self.history
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Call the appointment off.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        if self.reject_unless_scheduled("Only scheduled appointments can be cancelled") {
            return;
        }
        self.transition(AppointmentStatus::Cancelled, now);
        self.outbox
            .record(DomainEvent::from(AppointmentEvent::Cancelled { id: self.id }));
    }

    /// Mark the appointment as attended.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        if self.reject_unless_scheduled("Only scheduled appointments can be completed") {
            return;
        }
        self.transition(AppointmentStatus::Completed, now);
        self.outbox
            .record(DomainEvent::from(AppointmentEvent::Completed { id: self.id }));
    }

    /// Move the appointment to `appointment_date`, keeping it scheduled.
    pub fn reschedule(&mut self, appointment_date: DateTime<Utc>, now: DateTime<Utc>) {
        if self.reject_unless_scheduled("Only scheduled appointments can be rescheduled") {
            return;
        }
        self.notification.clear_field("appointment_date");
        if appointment_date < now {
            self.notification
                .add_error(APPOINTMENT_DATE_IN_PAST, Some("appointment_date"));
            return;
        }
        self.appointment_date = appointment_date;
        self.transition(AppointmentStatus::Scheduled, now);
        self.outbox
            .record(DomainEvent::from(AppointmentEvent::Rescheduled {
                id: self.id,
                appointment_date,
            }));
    }

    /// Replace the customer name.
    pub fn change_customer_name(&mut self, customer_name: impl Into<String>) {
        self.customer_name = customer_name.into();
        self.revalidate(Some(&["customer_name"]));
    }

    /// Replace the event date.
    pub fn change_event_date(&mut self, event_date: NaiveDate) {
        self.event_date = event_date;
    }

    fn reject_unless_scheduled(&mut self, message: &str) -> bool {
        if self.status == AppointmentStatus::Scheduled {
            return false;
        }
        self.notification.add_error(message, Some("status"));
        true
    }

    fn transition(&mut self, status: AppointmentStatus, now: DateTime<Utc>) {
        self.status = status;
        self.history
            .push(AppointmentHistoryEntry { status, date: now });
    }

    fn check_date_not_past(&mut self, now: DateTime<Utc>) {
        if self.appointment_date < now {
            self.notification
                .add_error(APPOINTMENT_DATE_IN_PAST, Some("appointment_date"));
        }
    }

    fn revalidate(&mut self, fields: Option<&[&str]>) {
        for field in fields.into_iter().flatten() {
            self.notification.clear_field(field);
        }
        let found = RULES.check(self, fields);
        self.notification.copy_errors(&found);
    }
}

impl AggregateRoot for Appointment {
    fn notification(&self) -> &Notification {
        &self.notification
    }

    fn drain_events(&mut self) -> Vec<DomainEvent> {
        self.outbox.drain()
    }
}

/// Search criteria for appointments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilter {
    /// Appointments on this day.
    pub appointment_date: Option<NaiveDate>,
    /// Case-insensitive substring of the customer name.
    pub customer_name: Option<String>,
    /// Exact status.
    pub status: Option<AppointmentStatus>,
    /// Exact kind.
    pub kind: Option<AppointmentKind>,
}

impl SearchFilter for AppointmentFilter {
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["appointment_date", "customer_name", "event_date", "created_at"];

    fn is_empty(&self) -> bool {
        self.appointment_date.is_none()
            && self.customer_name.is_none()
            && self.status.is_none()
            && self.kind.is_none()
    }

    fn normalized(self) -> Option<Self> {
        let filter = Self {
            customer_name: normalize_text(self.customer_name),
            ..self
        };
        if filter.is_empty() { None } else { Some(filter) }
    }
}

#[cfg(test)]
mod tests;
