//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every handler of the inbound HTTP layer (auth, appointments,
//!   bookings, dresses, clutches, health)
//! - **Schemas**: request and response bodies plus the domain wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) and the multipart form
//!   descriptions
//! - **Security**: bearer JWT and the `access_token` cookie
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{
    Adjustment, AppointmentHistoryEntry, AppointmentKind, AppointmentStatus, BookingPeriod,
    BookingStatus, Period, ProductKind,
};
use crate::inbound::http::appointments::{
    AppointmentResponse, CreateAppointmentRequest, RescheduleAppointmentRequest,
    UpdateAppointmentRequest,
};
use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::bookings::{
    AddPaymentRequestBody, BookingItemBody, BookingItemResponse, BookingResponse,
    CreateBookingRequestBody, ReplaceItemsRequestBody, UpdateBookingRequestBody,
};
use crate::inbound::http::clutches::{ClutchResponse, UpdateClutchRequest};
use crate::inbound::http::dresses::{DressResponse, UpdateDressRequest};
use crate::inbound::http::products::AvailabilityResponse;
use crate::inbound::http::schemas::{
    CreateClutchForm, CreateDressForm, ErrorCodeSchema, ErrorSchema, ImageUploadForm,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the access token security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token returned by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "AccessTokenCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "access_token",
                "Cookie set by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Atelier back-office API",
        description = "Appointments, bookings and the dress and clutch catalogue of a rental boutique.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = []), ("AccessTokenCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::appointments::list_appointments,
        crate::inbound::http::appointments::create_appointment,
        crate::inbound::http::appointments::get_appointment,
        crate::inbound::http::appointments::update_appointment,
        crate::inbound::http::appointments::delete_appointment,
        crate::inbound::http::appointments::cancel_appointment,
        crate::inbound::http::appointments::complete_appointment,
        crate::inbound::http::appointments::reschedule_appointment,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::update_booking,
        crate::inbound::http::bookings::delete_booking,
        crate::inbound::http::bookings::add_payment,
        crate::inbound::http::bookings::start_booking,
        crate::inbound::http::bookings::complete_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::bookings::replace_booking_items,
        crate::inbound::http::dresses::list_dresses,
        crate::inbound::http::dresses::create_dress,
        crate::inbound::http::dresses::get_dress,
        crate::inbound::http::dresses::update_dress,
        crate::inbound::http::dresses::delete_dress,
        crate::inbound::http::dresses::replace_dress_image,
        crate::inbound::http::dresses::pick_up_dress,
        crate::inbound::http::dresses::drop_off_dress,
        crate::inbound::http::dresses::dress_availability,
        crate::inbound::http::clutches::list_clutches,
        crate::inbound::http::clutches::create_clutch,
        crate::inbound::http::clutches::get_clutch,
        crate::inbound::http::clutches::update_clutch,
        crate::inbound::http::clutches::delete_clutch,
        crate::inbound::http::clutches::replace_clutch_image,
        crate::inbound::http::clutches::pick_up_clutch,
        crate::inbound::http::clutches::drop_off_clutch,
        crate::inbound::http::clutches::clutch_availability,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        LoginResponse,
        AppointmentResponse,
        AppointmentHistoryEntry,
        AppointmentKind,
        AppointmentStatus,
        CreateAppointmentRequest,
        UpdateAppointmentRequest,
        RescheduleAppointmentRequest,
        BookingResponse,
        BookingItemResponse,
        BookingItemBody,
        BookingPeriod,
        BookingStatus,
        Adjustment,
        CreateBookingRequestBody,
        AddPaymentRequestBody,
        ReplaceItemsRequestBody,
        UpdateBookingRequestBody,
        DressResponse,
        UpdateDressRequest,
        CreateDressForm,
        ClutchResponse,
        UpdateClutchRequest,
        CreateClutchForm,
        ImageUploadForm,
        AvailabilityResponse,
        Period,
        ProductKind,
    )),
    tags(
        (name = "auth", description = "Access token issuance"),
        (name = "appointments", description = "Fitting and return appointments"),
        (name = "bookings", description = "Rentals, payments and their lifecycle"),
        (name = "dresses", description = "Dress catalogue"),
        (name = "clutches", description = "Clutch catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
