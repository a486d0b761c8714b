//! Domain events recorded in aggregate outboxes.
//!
//! Use cases drain the outbox after a successful save and hand the events
//! to the [`DomainEventPublisher`](crate::domain::ports::DomainEventPublisher)
//! port.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{AppointmentId, BookingId, Money, Period, ProductKind};

/// Appointment lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppointmentEvent {
    /// A new appointment was booked.
    Scheduled {
        /// Appointment id.
        id: AppointmentId,
        /// Scheduled time.
        appointment_date: DateTime<Utc>,
    },
    /// A scheduled appointment was cancelled.
    Cancelled {
        /// Appointment id.
        id: AppointmentId,
    },
    /// A scheduled appointment took place.
    Completed {
        /// Appointment id.
        id: AppointmentId,
    },
    /// A scheduled appointment moved to another time.
    Rescheduled {
        /// Appointment id.
        id: AppointmentId,
        /// New time.
        appointment_date: DateTime<Utc>,
    },
}

/// Booking lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A booking was opened.
    Created {
        /// Booking id.
        id: BookingId,
        /// Agreed pick-up date.
        pick_up_date: NaiveDate,
    },
    /// A payment was registered.
    PaymentAdded {
        /// Booking id.
        id: BookingId,
        /// Amount received.
        amount: Money,
    },
    /// The customer picked the items up.
    Started {
        /// Booking id.
        id: BookingId,
    },
    /// The customer returned the items.
    Completed {
        /// Booking id.
        id: BookingId,
    },
    /// The booking was called off.
    Cancelled {
        /// Booking id.
        id: BookingId,
    },
    /// Customer name, event date or agreed dates changed.
    Updated {
        /// Booking id.
        id: BookingId,
    },
    /// The item list was replaced.
    ItemsReplaced {
        /// Booking id.
        id: BookingId,
        /// Number of items after the replacement.
        count: usize,
    },
}

/// Product inventory events, shared by dresses and clutches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    /// A product was registered.
    Created {
        /// Product kind.
        kind: ProductKind,
        /// Product id.
        id: Uuid,
    },
    /// The product left the shop.
    PickedUp {
        /// Product kind.
        kind: ProductKind,
        /// Product id.
        id: Uuid,
    },
    /// The product came back.
    DroppedOff {
        /// Product kind.
        kind: ProductKind,
        /// Product id.
        id: Uuid,
    },
    /// A reservation period was added.
    Reserved {
        /// Product kind.
        kind: ProductKind,
        /// Product id.
        id: Uuid,
        /// Reserved range.
        period: Period,
    },
    /// A reservation period was released.
    Released {
        /// Product kind.
        kind: ProductKind,
        /// Product id.
        id: Uuid,
        /// Released range.
        period: Period,
    },
    /// The stored image changed.
    ImageChanged {
        /// Product kind.
        kind: ProductKind,
        /// Product id.
        id: Uuid,
    },
}

/// Any event recorded by an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "aggregate", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Appointment events.
    Appointment(AppointmentEvent),
    /// Booking events.
    Booking(BookingEvent),
    /// Product events.
    Product(ProductEvent),
}

impl DomainEvent {
    /// Stable dotted name used in logs, e.g. `booking.payment_added`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Appointment(event) => match event {
                AppointmentEvent::Scheduled { .. } => "appointment.scheduled",
                AppointmentEvent::Cancelled { .. } => "appointment.cancelled",
                AppointmentEvent::Completed { .. } => "appointment.completed",
                AppointmentEvent::Rescheduled { .. } => "appointment.rescheduled",
            },
            Self::Booking(event) => match event {
                BookingEvent::Created { .. } => "booking.created",
                BookingEvent::PaymentAdded { .. } => "booking.payment_added",
                BookingEvent::Started { .. } => "booking.started",
                BookingEvent::Completed { .. } => "booking.completed",
                BookingEvent::Cancelled { .. } => "booking.cancelled",
                BookingEvent::Updated { .. } => "booking.updated",
                BookingEvent::ItemsReplaced { .. } => "booking.items_replaced",
            },
            Self::Product(event) => match event {
                ProductEvent::Created { .. } => "product.created",
                ProductEvent::PickedUp { .. } => "product.picked_up",
                ProductEvent::DroppedOff { .. } => "product.dropped_off",
                ProductEvent::Reserved { .. } => "product.reserved",
                ProductEvent::Released { .. } => "product.released",
                ProductEvent::ImageChanged { .. } => "product.image_changed",
            },
        }
    }
}

impl From<AppointmentEvent> for DomainEvent {
    fn from(value: AppointmentEvent) -> Self {
        Self::Appointment(value)
    }
}

impl From<BookingEvent> for DomainEvent {
    fn from(value: BookingEvent) -> Self {
        Self::Booking(value)
    }
}

impl From<ProductEvent> for DomainEvent {
    fn from(value: ProductEvent) -> Self {
        Self::Product(value)
    }
}
