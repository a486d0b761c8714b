//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each row is read, inserted and used as
//! the update changeset of an upsert, so nullable columns are written as
//! `NULL` rather than skipped.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{appointments, booking_items, bookings, clutches, dresses};

/// Row struct for the `appointments` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub booking_id: Option<Uuid>,
    pub appointment_date: DateTime<Utc>,
    pub customer_name: String,
    pub event_date: NaiveDate,
    pub kind: String,
    pub status: String,
    pub history: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Booking models
// ---------------------------------------------------------------------------

/// Row struct for the `bookings` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub customer_name: String,
    pub event_date: NaiveDate,
    pub expected_pick_up_date: NaiveDate,
    pub expected_return_date: Option<NaiveDate>,
    pub actual_pick_up_date: Option<NaiveDate>,
    pub actual_return_date: Option<NaiveDate>,
    pub amount_paid_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Row struct for the `booking_items` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = booking_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingItemRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub position: i32,
    pub product_id: Uuid,
    pub kind: String,
    pub product_name: String,
    pub rent_price_cents: i64,
    pub image_path: String,
    pub adjustments: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Product models
// ---------------------------------------------------------------------------

/// Row struct for the `dresses` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = dresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DressRow {
    pub id: Uuid,
    pub image_path: String,
    pub rent_price_cents: i64,
    pub color: String,
    pub model: String,
    pub fabric: String,
    pub is_picked_up: bool,
    pub reservation_periods: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Row struct for the `clutches` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = clutches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClutchRow {
    pub id: Uuid,
    pub image_path: String,
    pub rent_price_cents: i64,
    pub color: String,
    pub model: String,
    pub is_picked_up: bool,
    pub reservation_periods: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
