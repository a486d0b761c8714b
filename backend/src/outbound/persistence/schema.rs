//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` or update by hand when a migration changes a
//! table.

diesel::table! {
    /// Dresses available for rent.
    dresses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Object storage key of the product image.
        image_path -> Varchar,
        /// Rent price in cents.
        rent_price_cents -> Int8,
        /// Colour.
        color -> Varchar,
        /// Model or cut.
        model -> Varchar,
        /// Fabric.
        fabric -> Varchar,
        /// True while a customer holds the dress.
        is_picked_up -> Bool,
        /// Reserved `{start, end}` ranges.
        reservation_periods -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Clutches available for rent.
    clutches (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Object storage key of the product image.
        image_path -> Varchar,
        /// Rent price in cents.
        rent_price_cents -> Int8,
        /// Colour.
        color -> Varchar,
        /// Model.
        model -> Varchar,
        /// True while a customer holds the clutch.
        is_picked_up -> Bool,
        /// Reserved `{start, end}` ranges.
        reservation_periods -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookings and their agreed and actual dates.
    bookings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Customer name.
        customer_name -> Varchar,
        /// Date of the customer's event.
        event_date -> Date,
        /// Agreed pick-up date.
        expected_pick_up_date -> Date,
        /// Agreed return date, when known.
        expected_return_date -> Nullable<Date>,
        /// Day the items left the shop.
        actual_pick_up_date -> Nullable<Date>,
        /// Day the items came back.
        actual_return_date -> Nullable<Date>,
        /// Amount received so far, in cents.
        amount_paid_cents -> Int8,
        /// Booking status wire name.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Product snapshots held by a booking, in request order.
    booking_items (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning booking.
        booking_id -> Uuid,
        /// Zero-based position within the booking.
        position -> Int4,
        /// Booked product; not a foreign key.
        product_id -> Uuid,
        /// `DRESS` or `CLUTCH`.
        kind -> Varchar,
        /// Product name at booking time.
        product_name -> Varchar,
        /// Rent price at booking time, in cents.
        rent_price_cents -> Int8,
        /// Image key at booking time.
        image_path -> Varchar,
        /// Requested tailoring.
        adjustments -> Jsonb,
    }
}

diesel::table! {
    /// Fittings, pick-ups and returns.
    appointments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Related booking, when any.
        booking_id -> Nullable<Uuid>,
        /// Scheduled time.
        appointment_date -> Timestamptz,
        /// Customer name.
        customer_name -> Varchar,
        /// Date of the customer's event.
        event_date -> Date,
        /// Appointment kind wire name.
        kind -> Varchar,
        /// Appointment status wire name.
        status -> Varchar,
        /// Status history, oldest first.
        history -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(booking_items -> bookings (booking_id));

diesel::allow_tables_to_appear_in_same_query!(appointments, booking_items, bookings, clutches, dresses,);
