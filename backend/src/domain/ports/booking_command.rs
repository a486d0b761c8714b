//! Driving port for booking mutations.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Adjustment, BookingId, Error, Money, ProductKind};

use super::BookingView;

/// One product requested for a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingItemRequest {
    /// Product family, selecting the repository to load from.
    pub kind: ProductKind,
    /// Product identifier.
    pub product_id: Uuid,
    /// Requested tailoring.
    pub adjustments: Vec<Adjustment>,
}

/// Input for [`BookingCommand::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    /// Customer name.
    pub customer_name: String,
    /// Date of the customer's event.
    pub event_date: NaiveDate,
    /// Expected pick-up date.
    pub pick_up_date: NaiveDate,
    /// Expected return date, when known.
    pub return_date: Option<NaiveDate>,
    /// Requested products.
    pub items: Vec<BookingItemRequest>,
    /// Amount paid up front.
    pub amount_paid: Money,
}

/// Partial update of a booking's customer details and agreed dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingChanges {
    /// New customer name.
    pub customer_name: Option<String>,
    /// New event date.
    pub event_date: Option<NaiveDate>,
    /// New expected pick-up date.
    pub pick_up_date: Option<NaiveDate>,
    /// New expected return date.
    pub return_date: Option<NaiveDate>,
}

impl BookingChanges {
    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.event_date.is_none()
            && self.pick_up_date.is_none()
            && self.return_date.is_none()
    }

    /// True when the agreed dates move.
    pub fn moves_period(&self) -> bool {
        self.pick_up_date.is_some() || self.return_date.is_some()
    }
}

/// Driving port for booking write operations.
///
/// Creating a booking and replacing its items reserve the expected period
/// on every booked product; cancelling and deleting release it again, and
/// moving the dates moves the reservation with them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Create a booking from catalogue products.
    async fn create(&self, request: CreateBookingRequest) -> Result<BookingView, Error>;

    /// Register a payment.
    async fn add_payment(&self, id: BookingId, amount: Money) -> Result<BookingView, Error>;

    /// Hand the products to the customer.
    async fn start(&self, id: BookingId) -> Result<BookingView, Error>;

    /// Take the products back.
    async fn complete(&self, id: BookingId) -> Result<BookingView, Error>;

    /// Change customer details or agreed dates, moving the product
    /// reservations when the reserved range changes.
    async fn update(&self, id: BookingId, changes: BookingChanges) -> Result<BookingView, Error>;

    /// Cancel an open booking.
    async fn cancel(&self, id: BookingId) -> Result<BookingView, Error>;

    /// Replace every booked product.
    async fn replace_items(
        &self,
        id: BookingId,
        items: Vec<BookingItemRequest>,
    ) -> Result<BookingView, Error>;

    /// Remove a booking.
    async fn delete(&self, id: BookingId) -> Result<(), Error>;
}
