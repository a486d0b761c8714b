//! Booking aggregate: products rented by one customer for one event.
//!
//! Lifecycle: `PAYMENT_PENDING -> READY -> IN_PROGRESS -> COMPLETED`, with
//! `CANCELLED` reachable from any open state. Payments can never exceed the
//! sum of item rent prices.

mod item;
mod period;

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use pagination::{SearchFilter, normalize_text};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::shared::{define_identifier, string_enum};
use crate::domain::{
    AggregateRoot, BookingEvent, DomainEvent, Money, Notification, Outbox, Rule,
    ValidationRules, is_present, max_chars,
};

pub use item::{Adjustment, BookingItem, BookingItemId};
pub use period::{BookingPeriod, PICK_UP_AFTER_RETURN, PICK_UP_IN_PAST, RETURN_IN_PAST};

define_identifier! {
    /// Booking identifier.
    BookingId
}

/// Recorded when a payment would push the paid amount above the total.
pub const PAYMENT_EXCEEDS_TOTAL: &str = "Valor pago não pode ser maior que o valor total da reserva";
/// Recorded when a payment is zero or negative.
pub const PAYMENT_NOT_POSITIVE: &str = "Payment amount must be greater than zero";
/// Recorded when a booking has no items.
pub const ITEMS_REQUIRED: &str = "Booking must have at least one item";
/// Recorded when an item snapshot is malformed.
pub const ITEM_INVALID: &str = "Booking items must have a name, a positive price and labelled adjustments";

const CUSTOMER_NAME_MAX: usize = 255;

/// Booking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Waiting for full payment.
    PaymentPending,
    /// Fully paid, waiting for pick-up.
    Ready,
    /// Items are with the customer.
    InProgress,
    /// Items came back.
    Completed,
    /// Called off.
    Cancelled,
}

string_enum!(BookingStatus {
    PaymentPending => "PAYMENT_PENDING",
    Ready => "READY",
    InProgress => "IN_PROGRESS",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

impl BookingStatus {
    /// True for `COMPLETED` and `CANCELLED`.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Input for [`Booking::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    /// Customer name.
    pub customer_name: String,
    /// Date of the customer's event.
    pub event_date: NaiveDate,
    /// Agreed pick-up and return dates.
    pub expected_period: BookingPeriod,
    /// Booked products.
    pub items: Vec<BookingItem>,
    /// Down payment taken at booking time.
    pub amount_paid: Money,
}

/// Edits accepted by [`Booking::update`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingUpdate {
    /// New customer name.
    pub customer_name: Option<String>,
    /// New event date.
    pub event_date: Option<NaiveDate>,
    /// New agreed dates, already checked against today.
    pub expected_period: Option<BookingPeriod>,
}

/// Persisted state used by [`Booking::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    /// Identifier.
    pub id: BookingId,
    /// Customer name.
    pub customer_name: String,
    /// Date of the customer's event.
    pub event_date: NaiveDate,
    /// Agreed dates.
    pub expected_period: BookingPeriod,
    /// Dates the items actually left and came back.
    pub actual_period: Option<BookingPeriod>,
    /// Booked products.
    pub items: Vec<BookingItem>,
    /// Amount received so far.
    pub amount_paid: Money,
    /// Current status.
    pub status: BookingStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

static RULES: LazyLock<ValidationRules<Booking>> = LazyLock::new(|| {
    ValidationRules::new()
        .field(
            "customer_name",
            [
                Rule::new("Customer name is required", |b: &Booking| {
                    is_present(&b.customer_name)
                }),
                Rule::new("Customer name must be at most 255 characters", |b: &Booking| {
                    max_chars(&b.customer_name, CUSTOMER_NAME_MAX)
                }),
            ],
        )
        .field(
            "items",
            [
                Rule::new(ITEMS_REQUIRED, |b: &Booking| !b.items.is_empty()),
                Rule::new(ITEM_INVALID, |b: &Booking| {
                    b.items.iter().all(BookingItem::is_valid)
                }),
            ],
        )
        .field(
            "amount_paid",
            [
                Rule::new("Amount paid cannot be negative", |b: &Booking| {
                    b.amount_paid >= Money::ZERO
                }),
                Rule::new(PAYMENT_EXCEEDS_TOTAL, |b: &Booking| {
                    b.amount_paid <= b.total_booking_price()
                }),
            ],
        )
});

/// Booking aggregate root.
#[derive(Debug, Clone)]
pub struct Booking {
    id: BookingId,
    customer_name: String,
    event_date: NaiveDate,
    expected_period: BookingPeriod,
    actual_period: Option<BookingPeriod>,
    items: Vec<BookingItem>,
    amount_paid: Money,
    status: BookingStatus,
    created_at: DateTime<Utc>,
    notification: Notification,
    outbox: Outbox<DomainEvent>,
}

impl Booking {
    /// Open a booking, validating every field.
    pub fn create(draft: BookingDraft, now: DateTime<Utc>) -> Self {
        let BookingDraft {
            customer_name,
            event_date,
            expected_period,
            items,
            amount_paid,
        } = draft;
        let mut booking = Self {
            id: BookingId::random(),
            customer_name,
            event_date,
            expected_period,
            actual_period: None,
            items,
            amount_paid,
            status: BookingStatus::PaymentPending,
            created_at: now,
            notification: Notification::new(),
            outbox: Outbox::default(),
        };
        booking.revalidate(None);
        booking.refresh_payment_status();
        booking.record(BookingEvent::Created {
            id: booking.id,
            pick_up_date: expected_period.pick_up_date(),
        });
        booking
    }

    /// Rebuild from persisted state without re-running validation.
    pub fn restore(record: BookingRecord) -> Self {
        Self {
            id: record.id,
            customer_name: record.customer_name,
            event_date: record.event_date,
            expected_period: record.expected_period,
            actual_period: record.actual_period,
            items: record.items,
            amount_paid: record.amount_paid,
            status: record.status,
            created_at: record.created_at,
            notification: Notification::new(),
            outbox: Outbox::default(),
        }
    }

    /// Identifier.
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// Customer name.
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Customer event date.
    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }

    /// Agreed dates.
    pub fn expected_period(&self) -> BookingPeriod {
        self.expected_period
    }

    /// Actual pick-up and return dates once started.
    pub fn actual_period(&self) -> Option<BookingPeriod> {
        self.actual_period
    }

    /// Booked items.
    pub fn items(&self) -> &[BookingItem] {
        &self.items
    }

    /// Amount received so far.
    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    /// Current status.
    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of item rent prices.
    pub fn total_booking_price(&self) -> Money {
        self.items.iter().map(BookingItem::rent_price).sum()
    }

    /// Amount still owed.
    pub fn remaining_balance(&self) -> Money {
        Money::from_cents(
            self.total_booking_price()
                .cents()
                .saturating_sub(self.amount_paid.cents()),
        )
    }

    /// Register a payment.
    ///
    /// A payment that would exceed the total leaves the booking untouched
    /// and records an `amount_paid` error.
    ///
    /// # Examples
    /// ```
    /// # use atelier::domain::{AggregateRoot, Booking, BookingPeriod, BookingRecord, BookingStatus, BookingId, Money};
    /// # use chrono::{NaiveDate, Utc};
    /// # let day = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date");
    /// # let mut booking = Booking::restore(BookingRecord {
    /// #     id: BookingId::random(),
    /// #     customer_name: "Ana".into(),
    /// #     event_date: day,
    /// #     expected_period: BookingPeriod::restore(day, None),
    /// #     actual_period: None,
    /// #     items: Vec::new(),
    /// #     amount_paid: Money::ZERO,
    /// #     status: BookingStatus::PaymentPending,
    /// #     created_at: Utc::now(),
    /// # });
    /// booking.add_payment(Money::from_cents(100));
    /// assert_eq!(booking.amount_paid(), Money::ZERO);
    /// assert_eq!(
    ///     booking.notification().field_errors("amount_paid"),
    ///     ["Valor pago não pode ser maior que o valor total da reserva"]
    /// );
    /// ```
    pub fn add_payment(&mut self, amount: Money) {
        self.notification.clear_field("amount_paid");
        if self.reject_when_closed("Payments cannot be added to a closed booking") {
            return;
        }
        if !amount.is_positive() {
            self.notification
                .add_error(PAYMENT_NOT_POSITIVE, Some("amount_paid"));
            return;
        }
        let Some(paid) = self
            .amount_paid
            .checked_add(amount)
            .filter(|paid| *paid <= self.total_booking_price())
        else {
            self.notification
                .add_error(PAYMENT_EXCEEDS_TOTAL, Some("amount_paid"));
            return;
        };
        self.amount_paid = paid;
        self.refresh_payment_status();
        self.record(BookingEvent::PaymentAdded {
            id: self.id,
            amount,
        });
    }

    /// Hand the items to the customer on `today`.
    pub fn start(&mut self, today: NaiveDate) {
        if self.status != BookingStatus::Ready {
            self.notification
                .add_error("Only ready bookings can be started", Some("status"));
            return;
        }
        self.status = BookingStatus::InProgress;
        self.actual_period = Some(BookingPeriod::restore(today, None));
        self.record(BookingEvent::Started { id: self.id });
    }

    /// Take the items back on `today`.
    pub fn complete(&mut self, today: NaiveDate) {
        if self.status != BookingStatus::InProgress {
            self.notification
                .add_error("Only bookings in progress can be completed", Some("status"));
            return;
        }
        self.status = BookingStatus::Completed;
        let actual = self
            .actual_period
            .unwrap_or_else(|| BookingPeriod::restore(today, None));
        self.actual_period = Some(actual.with_return_date(today));
        self.record(BookingEvent::Completed { id: self.id });
    }

    /// Call the booking off.
    pub fn cancel(&mut self) {
        if self.reject_when_closed("Completed or cancelled bookings cannot be cancelled") {
            return;
        }
        self.status = BookingStatus::Cancelled;
        self.record(BookingEvent::Cancelled { id: self.id });
    }

    /// Replace every item, re-validating items and the paid amount.
    pub fn add_many_items(&mut self, items: Vec<BookingItem>) {
        if self.reject_when_closed("Items cannot be changed on a closed booking") {
            return;
        }
        if self.status == BookingStatus::InProgress {
            self.notification
                .add_error("Items cannot be changed after pick-up", Some("status"));
            return;
        }
        self.items = items;
        self.revalidate(Some(&["items", "amount_paid"]));
        self.refresh_payment_status();
        self.record(BookingEvent::ItemsReplaced {
            id: self.id,
            count: self.items.len(),
        });
    }

    /// Apply the edits in `update`, recording one `Updated` event.
    ///
    /// Closed bookings reject every edit. Dates cannot move once the items
    /// have been picked up. Rejected edits leave the booking untouched.
    pub fn update(&mut self, update: BookingUpdate) {
        if self.reject_when_closed("Closed bookings cannot be changed") {
            return;
        }
        let BookingUpdate {
            customer_name,
            event_date,
            expected_period,
        } = update;
        let moves_dates = event_date.is_some() || expected_period.is_some();
        if moves_dates && self.status == BookingStatus::InProgress {
            self.notification
                .add_error("Dates cannot be changed after pick-up", Some("status"));
            return;
        }
        if let Some(name) = customer_name {
            self.change_customer_name(name);
        }
        if let Some(date) = event_date {
            self.change_event_date(date);
        }
        if let Some(period) = expected_period {
            self.change_expected_period(period);
        }
        self.record(BookingEvent::Updated { id: self.id });
    }

    fn change_expected_period(&mut self, expected_period: BookingPeriod) {
        self.expected_period = expected_period;
    }

    fn change_customer_name(&mut self, customer_name: String) {
        self.customer_name = customer_name;
        self.revalidate(Some(&["customer_name"]));
    }

    fn change_event_date(&mut self, event_date: NaiveDate) {
        self.event_date = event_date;
    }

    fn reject_when_closed(&mut self, message: &str) -> bool {
        if self.status.is_closed() {
            self.notification.add_error(message, Some("status"));
            return true;
        }
        false
    }

    fn refresh_payment_status(&mut self) {
        let fully_paid = !self.items.is_empty() && self.amount_paid >= self.total_booking_price();
        self.status = match (self.status, fully_paid) {
            (BookingStatus::PaymentPending, true) => BookingStatus::Ready,
            (BookingStatus::Ready, false) => BookingStatus::PaymentPending,
            (status, _) => status,
        };
    }

    fn revalidate(&mut self, fields: Option<&[&str]>) {
        for field in fields.into_iter().flatten() {
            self.notification.clear_field(field);
        }
        let found = RULES.check(self, fields);
        self.notification.copy_errors(&found);
    }

    fn record(&mut self, event: BookingEvent) {
        self.outbox.record(DomainEvent::from(event));
    }
}

impl AggregateRoot for Booking {
    fn notification(&self) -> &Notification {
        &self.notification
    }

    fn drain_events(&mut self) -> Vec<DomainEvent> {
        self.outbox.drain()
    }
}

/// Search criteria for bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    /// Case-insensitive substring of the customer name.
    pub customer_name: Option<String>,
    /// Exact status.
    pub status: Option<BookingStatus>,
    /// Exact event date.
    pub event_date: Option<NaiveDate>,
}

impl SearchFilter for BookingFilter {
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["customer_name", "event_date", "pick_up_date", "created_at"];

    fn is_empty(&self) -> bool {
        self.customer_name.is_none() && self.status.is_none() && self.event_date.is_none()
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
