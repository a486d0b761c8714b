//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: model the rental back office (appointments, bookings, dresses
//! and clutches) independently of HTTP, SQL and object storage. Aggregates
//! validate themselves into a [`Notification`] and queue events in an
//! [`Outbox`]; services load, mutate, persist and publish through the
//! traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Appointment, Booking, Dress, Clutch — aggregates.
//! - AppointmentService, BookingService, ProductService, AuthService —
//!   driving port implementations.

pub mod error;
pub mod ports;

mod appointment;
mod appointment_service;
mod auth;
mod auth_service;
mod booking;
mod booking_service;
mod events;
mod product;
mod product_service;
mod service_support;
pub(crate) mod shared;
mod trace_id;

pub use self::appointment::{
    APPOINTMENT_DATE_IN_PAST, Appointment, AppointmentDraft, AppointmentFilter,
    AppointmentHistoryEntry, AppointmentId, AppointmentKind, AppointmentRecord,
    AppointmentStatus, CUSTOMER_NAME_MAX, CUSTOMER_NAME_REQUIRED, CUSTOMER_NAME_TOO_LONG,
};
pub use self::appointment_service::AppointmentService;
pub use self::auth::{
    AccessToken, AuthenticatedUser, LoginCredentials, LoginValidationError, StaticUser,
};
pub use self::auth_service::AuthService;
pub use self::booking::{
    Adjustment, Booking, BookingDraft, BookingFilter, BookingId, BookingItem, BookingItemId,
    BookingPeriod, BookingRecord, BookingStatus, BookingUpdate, ITEM_INVALID, ITEMS_REQUIRED,
    PAYMENT_EXCEEDS_TOTAL, PAYMENT_NOT_POSITIVE, PICK_UP_AFTER_RETURN, PICK_UP_IN_PAST,
    RETURN_IN_PAST,
};
pub use self::booking_service::{BookingService, ProductCatalogue};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::{AppointmentEvent, BookingEvent, DomainEvent, ProductEvent};
pub use self::product::{
    ALREADY_PICKED_UP, Clutch, ClutchChanges, ClutchDraft, ClutchFilter, ClutchId,
    DESCRIPTION_MAX, Dress, DressChanges, DressDraft, DressFilter, DressId, IMAGE_PATH_REQUIRED,
    NOT_PICKED_UP, Product, ProductCore, ProductDraft, ProductKind, ProductRecord,
    RENT_PRICE_NOT_POSITIVE, RESERVATION_OVERLAP,
};
pub use self::product_service::ProductService;
pub use self::shared::{
    AggregateRoot, END_BEFORE_START_MESSAGE, EntityNotFoundError, EntityValidationError,
    INVALID_ID_MESSAGE, InvalidValueObject, Money, Notification, Outbox, Period, Rule,
    ValidationRules, is_present, max_chars,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use atelier::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::conflict("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
