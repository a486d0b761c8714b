//! Booking HTTP handlers.
//!
//! ```text
//! GET    /api/v1/bookings
//! POST   /api/v1/bookings
//! GET    /api/v1/bookings/{id}
//! PATCH  /api/v1/bookings/{id}
//! DELETE /api/v1/bookings/{id}
//! POST   /api/v1/bookings/{id}/payments
//! POST   /api/v1/bookings/{id}/start
//! POST   /api/v1/bookings/{id}/complete
//! POST   /api/v1/bookings/{id}/cancel
//! PUT    /api/v1/bookings/{id}/items
//! ```
//!
//! Amounts travel as decimal numbers (`199.9`); item images are rendered as
//! presigned URLs.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{BookingChanges, BookingItemRequest, BookingView, CreateBookingRequest};
use crate::domain::{
    Adjustment, BookingFilter, BookingId, BookingItemId, BookingPeriod, BookingStatus, Error,
    Money, ProductKind,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedCaller;
use crate::inbound::http::listing::{PageQuery, Paginated};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_amount, parse_date, parse_enum, parse_optional_date, parse_optional_enum,
    parse_path_id, parse_uuid, require, require_text,
};

/// One booked product as rendered by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingItemResponse {
    pub id: BookingItemId,
    #[schema(format = "uuid")]
    pub product_id: Uuid,
    pub kind: ProductKind,
    #[schema(example = "Azul, Tomara que caia, Seda")]
    pub product_name: String,
    #[schema(example = 200.0)]
    pub rent_price: f64,
    /// Presigned image URL; absent when signing failed.
    pub image_url: Option<String>,
    pub adjustments: Vec<Adjustment>,
}

/// Booking as rendered by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub customer_name: String,
    pub event_date: NaiveDate,
    pub expected_period: BookingPeriod,
    pub actual_period: Option<BookingPeriod>,
    pub items: Vec<BookingItemResponse>,
    pub amount_paid: f64,
    pub total_booking_price: f64,
    pub remaining_balance: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&BookingView> for BookingResponse {
    fn from(view: &BookingView) -> Self {
        let booking = &view.booking;
        Self {
            id: booking.id(),
            customer_name: booking.customer_name().to_owned(),
            event_date: booking.event_date(),
            expected_period: booking.expected_period(),
            actual_period: booking.actual_period(),
            items: booking
                .items()
                .iter()
                .map(|item| BookingItemResponse {
                    id: item.id(),
                    product_id: item.product_id(),
                    kind: item.kind(),
                    product_name: item.product_name().to_owned(),
                    rent_price: item.rent_price().to_decimal(),
                    image_url: view.image_url(item.id()).map(str::to_owned),
                    adjustments: item.adjustments().to_vec(),
                })
                .collect(),
            amount_paid: booking.amount_paid().to_decimal(),
            total_booking_price: booking.total_booking_price().to_decimal(),
            remaining_balance: booking.remaining_balance().to_decimal(),
            status: booking.status(),
            created_at: booking.created_at(),
        }
    }
}

/// Requested product in a booking body.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingItemBody {
    #[schema(value_type = Option<ProductKind>)]
    pub kind: Option<String>,
    #[schema(format = "uuid")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

impl TryFrom<BookingItemBody> for BookingItemRequest {
    type Error = Error;

    fn try_from(value: BookingItemBody) -> Result<Self, Self::Error> {
        let kind = require_text(value.kind, KIND)?;
        let product_id = require_text(value.product_id, PRODUCT_ID)?;
        Ok(Self {
            kind: parse_enum(&kind, KIND)?,
            product_id: parse_uuid(&product_id, PRODUCT_ID)?,
            adjustments: value.adjustments,
        })
    }
}

fn parse_items(items: Option<Vec<BookingItemBody>>) -> Result<Vec<BookingItemRequest>, Error> {
    require(items, ITEMS)?
        .into_iter()
        .map(BookingItemRequest::try_from)
        .collect()
}

/// Request body for `POST /api/v1/bookings`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequestBody {
    #[schema(example = "Maria Souza")]
    pub customer_name: Option<String>,
    #[schema(format = "date", example = "2026-06-20")]
    pub event_date: Option<String>,
    #[schema(format = "date", example = "2026-06-18")]
    pub pick_up_date: Option<String>,
    #[schema(format = "date", example = "2026-06-22")]
    pub return_date: Option<String>,
    pub items: Option<Vec<BookingItemBody>>,
    /// Amount paid up front; defaults to zero.
    #[schema(example = 100.0)]
    pub amount_paid: Option<f64>,
}

impl TryFrom<CreateBookingRequestBody> for CreateBookingRequest {
    type Error = Error;

    fn try_from(value: CreateBookingRequestBody) -> Result<Self, Self::Error> {
        let event_date = require_text(value.event_date, EVENT_DATE)?;
        let pick_up_date = require_text(value.pick_up_date, PICK_UP_DATE)?;
        Ok(Self {
            customer_name: value.customer_name.unwrap_or_default(),
            event_date: parse_date(&event_date, EVENT_DATE)?,
            pick_up_date: parse_date(&pick_up_date, PICK_UP_DATE)?,
            return_date: parse_optional_date(value.return_date, RETURN_DATE)?,
            items: parse_items(value.items)?,
            amount_paid: value
                .amount_paid
                .map(|amount| parse_amount(amount, AMOUNT_PAID))
                .transpose()?
                .unwrap_or(Money::ZERO),
        })
    }
}

/// Request body for `PATCH /api/v1/bookings/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequestBody {
    pub customer_name: Option<String>,
    #[schema(format = "date")]
    pub event_date: Option<String>,
    #[schema(format = "date")]
    pub pick_up_date: Option<String>,
    #[schema(format = "date")]
    pub return_date: Option<String>,
}

impl TryFrom<UpdateBookingRequestBody> for BookingChanges {
    type Error = Error;

    fn try_from(value: UpdateBookingRequestBody) -> Result<Self, Self::Error> {
        let changes = Self {
            customer_name: value.customer_name,
            event_date: parse_optional_date(value.event_date, EVENT_DATE)?,
            pick_up_date: parse_optional_date(value.pick_up_date, PICK_UP_DATE)?,
            return_date: parse_optional_date(value.return_date, RETURN_DATE)?,
        };
        if changes.is_empty() {
            return Err(Error::invalid_request(
                "at least one of customerName, eventDate, pickUpDate or returnDate is required",
            ));
        }
        Ok(changes)
    }
}

/// Request body for `POST /api/v1/bookings/{id}/payments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentRequestBody {
    #[schema(example = 50.0)]
    pub amount: Option<f64>,
}

/// Request body for `PUT /api/v1/bookings/{id}/items`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceItemsRequestBody {
    pub items: Option<Vec<BookingItemBody>>,
}

/// Filters accepted by `GET /api/v1/bookings`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    /// Case-insensitive substring of the customer name.
    pub customer_name: Option<String>,
    /// Exact status, e.g. `READY`.
    pub status: Option<String>,
    /// Exact event date, `YYYY-MM-DD`.
    pub event_date: Option<String>,
}

impl TryFrom<BookingListQuery> for BookingFilter {
    type Error = Error;

    fn try_from(value: BookingListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            customer_name: value.customer_name,
            status: parse_optional_enum(value.status, FieldName::new("status"))?,
            event_date: parse_optional_date(value.event_date, EVENT_DATE)?,
        })
    }
}

const AMOUNT_PAID: FieldName = FieldName::new("amountPaid");
const EVENT_DATE: FieldName = FieldName::new("eventDate");
const ITEMS: FieldName = FieldName::new("items");
const KIND: FieldName = FieldName::new("kind");
const PICK_UP_DATE: FieldName = FieldName::new("pickUpDate");
const PRODUCT_ID: FieldName = FieldName::new("productId");
const RETURN_DATE: FieldName = FieldName::new("returnDate");

/// Register the booking routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_bookings)
        .service(create_booking)
        .service(get_booking)
        .service(update_booking)
        .service(delete_booking)
        .service(add_payment)
        .service(start_booking)
        .service(complete_booking)
        .service(cancel_booking)
        .service(replace_booking_items);
}

fn render(view: &BookingView) -> web::Json<BookingResponse> {
    web::Json(BookingResponse::from(view))
}

/// List bookings with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(PageQuery, BookingListQuery),
    responses(
        (status = 200, description = "Bookings page", body = Paginated<BookingResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    req: HttpRequest,
    page: web::Query<PageQuery>,
    filter: web::Query<BookingListQuery>,
) -> ApiResult<web::Json<Paginated<BookingResponse>>> {
    let filter = BookingFilter::try_from(filter.into_inner())?;
    let params = page
        .into_inner()
        .into_params(filter, state.default_page_size)?;
    let result = state.bookings_query.search(params).await?;
    Paginated::from_result(&req, result, |view| BookingResponse::from(&view)).map(web::Json)
}

/// Open a booking for catalogue products, reserving them for the
/// expected period.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequestBody,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema),
        (status = 409, description = "Products already reserved", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    payload: web::Json<CreateBookingRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateBookingRequest::try_from(payload.into_inner())?;
    let view = state.bookings.create(request).await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(&view)))
}

/// Fetch one booking.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingResponse>> {
    let view = state.bookings_query.get(parse_path_id(&path)?).await?;
    Ok(render(&view))
}

/// Change customer details or move the agreed dates.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    request_body = UpdateBookingRequestBody,
    responses(
        (status = 200, description = "Booking updated", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Products already reserved", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBooking"
)]
#[patch("/bookings/{id}")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<UpdateBookingRequestBody>,
) -> ApiResult<web::Json<BookingResponse>> {
    let id = parse_path_id(&path)?;
    let changes = BookingChanges::try_from(payload.into_inner())?;
    let view = state.bookings.update(id, changes).await?;
    Ok(render(&view))
}

/// Remove a booking and release its reservations.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 204, description = "Booking removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "deleteBooking"
)]
#[delete("/bookings/{id}")]
pub async fn delete_booking(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: BookingId = parse_path_id(&path)?;
    state.bookings.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register a payment.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/payments",
    params(("id" = String, Path, description = "Booking id")),
    request_body = AddPaymentRequestBody,
    responses(
        (status = 200, description = "Payment registered", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Payment rejected", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "addBookingPayment"
)]
#[post("/bookings/{id}/payments")]
pub async fn add_payment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<AddPaymentRequestBody>,
) -> ApiResult<web::Json<BookingResponse>> {
    let id = parse_path_id(&path)?;
    let amount_field = FieldName::new("amount");
    let amount = parse_amount(require(payload.into_inner().amount, amount_field)?, amount_field)?;
    let view = state.bookings.add_payment(id, amount).await?;
    Ok(render(&view))
}

/// Hand the booked products to the customer.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/start",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking in progress", body = BookingResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Booking not ready", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "startBooking"
)]
#[post("/bookings/{id}/start")]
pub async fn start_booking(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingResponse>> {
    let view = state.bookings.start(parse_path_id(&path)?).await?;
    Ok(render(&view))
}

/// Take the booked products back.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/complete",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking completed", body = BookingResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Booking not in progress", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "completeBooking"
)]
#[post("/bookings/{id}/complete")]
pub async fn complete_booking(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingResponse>> {
    let view = state.bookings.complete(parse_path_id(&path)?).await?;
    Ok(render(&view))
}

/// Cancel an open booking and release its reservations.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Booking already closed", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[post("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingResponse>> {
    let view = state.bookings.cancel(parse_path_id(&path)?).await?;
    Ok(render(&view))
}

/// Replace every booked product.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/items",
    params(("id" = String, Path, description = "Booking id")),
    request_body = ReplaceItemsRequestBody,
    responses(
        (status = 200, description = "Items replaced", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Booking or product not found", body = ErrorSchema),
        (status = 409, description = "Products already reserved", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "replaceBookingItems"
)]
#[put("/bookings/{id}/items")]
pub async fn replace_booking_items(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<ReplaceItemsRequestBody>,
) -> ApiResult<web::Json<BookingResponse>> {
    let id = parse_path_id(&path)?;
    let items = parse_items(payload.into_inner().items)?;
    let view = state.bookings.replace_items(id, items).await?;
    Ok(render(&view))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
