//! Appointment HTTP handlers.
//!
//! ```text
//! GET    /api/v1/appointments
//! POST   /api/v1/appointments
//! GET    /api/v1/appointments/{id}
//! PATCH  /api/v1/appointments/{id}
//! DELETE /api/v1/appointments/{id}
//! POST   /api/v1/appointments/{id}/cancel
//! POST   /api/v1/appointments/{id}/complete
//! POST   /api/v1/appointments/{id}/reschedule
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::AppointmentChanges;
use crate::domain::{
    Appointment, AppointmentDraft, AppointmentFilter, AppointmentHistoryEntry, AppointmentId,
    AppointmentKind, AppointmentStatus, BookingId, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedCaller;
use crate::inbound::http::listing::{PageQuery, Paginated};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_enum, parse_optional_date, parse_optional_enum, parse_path_id,
    parse_rfc3339_timestamp, parse_uuid, require_text,
};

/// Appointment as rendered by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: AppointmentId,
    pub booking_id: Option<BookingId>,
    pub appointment_date: DateTime<Utc>,
    #[schema(example = "Maria Souza")]
    pub customer_name: String,
    pub event_date: NaiveDate,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub history: Vec<AppointmentHistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl From<&Appointment> for AppointmentResponse {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id(),
            booking_id: appointment.booking_id(),
            appointment_date: appointment.appointment_date(),
            customer_name: appointment.customer_name().to_owned(),
            event_date: appointment.event_date(),
            kind: appointment.kind(),
            status: appointment.status(),
            history: appointment.history().to_vec(),
            created_at: appointment.created_at(),
        }
    }
}

/// Request body for `POST /api/v1/appointments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[schema(format = "uuid")]
    pub booking_id: Option<String>,
    #[schema(format = "date-time", example = "2026-05-10T14:00:00Z")]
    pub appointment_date: Option<String>,
    #[schema(example = "Maria Souza")]
    pub customer_name: Option<String>,
    #[schema(format = "date", example = "2026-06-20")]
    pub event_date: Option<String>,
    #[schema(value_type = Option<AppointmentKind>)]
    pub kind: Option<String>,
}

impl TryFrom<CreateAppointmentRequest> for AppointmentDraft {
    type Error = Error;

    fn try_from(value: CreateAppointmentRequest) -> Result<Self, Self::Error> {
        let appointment_date = require_text(value.appointment_date, APPOINTMENT_DATE)?;
        let event_date = require_text(value.event_date, EVENT_DATE)?;
        let kind = require_text(value.kind, KIND)?;
        Ok(Self {
            booking_id: value
                .booking_id
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| parse_uuid(&raw, FieldName::new("bookingId")).map(BookingId::from_uuid))
                .transpose()?,
            appointment_date: parse_rfc3339_timestamp(&appointment_date, APPOINTMENT_DATE)?,
            customer_name: value.customer_name.unwrap_or_default(),
            event_date: parse_date(&event_date, EVENT_DATE)?,
            kind: parse_enum(&kind, KIND)?,
        })
    }
}

/// Request body for `PATCH /api/v1/appointments/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub customer_name: Option<String>,
    #[schema(format = "date")]
    pub event_date: Option<String>,
}

impl TryFrom<UpdateAppointmentRequest> for AppointmentChanges {
    type Error = Error;

    fn try_from(value: UpdateAppointmentRequest) -> Result<Self, Self::Error> {
        let changes = Self {
            customer_name: value.customer_name,
            event_date: parse_optional_date(value.event_date, EVENT_DATE)?,
        };
        if changes.is_empty() {
            return Err(Error::invalid_request(
                "at least one of customerName or eventDate is required",
            ));
        }
        Ok(changes)
    }
}

/// Request body for `POST /api/v1/appointments/{id}/reschedule`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleAppointmentRequest {
    #[schema(format = "date-time", example = "2026-05-12T09:30:00Z")]
    pub appointment_date: Option<String>,
}

/// Filters accepted by `GET /api/v1/appointments`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AppointmentListQuery {
    /// Appointments on this UTC day, `YYYY-MM-DD`.
    pub appointment_date: Option<String>,
    /// Case-insensitive substring of the customer name.
    pub customer_name: Option<String>,
    /// Exact status, e.g. `SCHEDULED`.
    pub status: Option<String>,
    /// Exact kind, e.g. `PICKUP`.
    pub kind: Option<String>,
}

impl TryFrom<AppointmentListQuery> for AppointmentFilter {
    type Error = Error;

    fn try_from(value: AppointmentListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            appointment_date: parse_optional_date(value.appointment_date, APPOINTMENT_DATE)?,
            customer_name: value.customer_name,
            status: parse_optional_enum(value.status, FieldName::new("status"))?,
            kind: parse_optional_enum(value.kind, KIND)?,
        })
    }
}

const APPOINTMENT_DATE: FieldName = FieldName::new("appointmentDate");
const EVENT_DATE: FieldName = FieldName::new("eventDate");
const KIND: FieldName = FieldName::new("kind");

/// Register the appointment routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_appointments)
        .service(create_appointment)
        .service(get_appointment)
        .service(update_appointment)
        .service(delete_appointment)
        .service(cancel_appointment)
        .service(complete_appointment)
        .service(reschedule_appointment);
}

/// List appointments with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    params(PageQuery, AppointmentListQuery),
    responses(
        (status = 200, description = "Appointments page", body = Paginated<AppointmentResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments"
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    req: HttpRequest,
    page: web::Query<PageQuery>,
    filter: web::Query<AppointmentListQuery>,
) -> ApiResult<web::Json<Paginated<AppointmentResponse>>> {
    let filter = AppointmentFilter::try_from(filter.into_inner())?;
    let params = page
        .into_inner()
        .into_params(filter, state.default_page_size)?;
    let result = state.appointments_query.search(params).await?;
    Paginated::from_result(&req, result, |appointment| {
        AppointmentResponse::from(&appointment)
    })
    .map(web::Json)
}

/// Schedule an appointment.
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment scheduled", body = AppointmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "createAppointment"
)]
#[post("/appointments")]
pub async fn create_appointment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    payload: web::Json<CreateAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    let draft = AppointmentDraft::try_from(payload.into_inner())?;
    let appointment = state.appointments.schedule(draft).await?;
    Ok(HttpResponse::Created().json(AppointmentResponse::from(&appointment)))
}

/// Fetch one appointment.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "getAppointment"
)]
#[get("/appointments/{id}")]
pub async fn get_appointment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    let id = parse_path_id(&path)?;
    let appointment = state.appointments_query.get(id).await?;
    Ok(web::Json(AppointmentResponse::from(&appointment)))
}

/// Change the customer name or event date.
#[utoipa::path(
    patch,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "updateAppointment"
)]
#[patch("/appointments/{id}")]
pub async fn update_appointment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<UpdateAppointmentRequest>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    let id = parse_path_id(&path)?;
    let changes = AppointmentChanges::try_from(payload.into_inner())?;
    let appointment = state.appointments.update(id, changes).await?;
    Ok(web::Json(AppointmentResponse::from(&appointment)))
}

/// Remove an appointment.
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 204, description = "Appointment removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "deleteAppointment"
)]
#[delete("/appointments/{id}")]
pub async fn delete_appointment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: AppointmentId = parse_path_id(&path)?;
    state.appointments.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Cancel a scheduled appointment.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/cancel",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Not scheduled", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "cancelAppointment"
)]
#[post("/appointments/{id}/cancel")]
pub async fn cancel_appointment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    let appointment = state.appointments.cancel(parse_path_id(&path)?).await?;
    Ok(web::Json(AppointmentResponse::from(&appointment)))
}

/// Mark a scheduled appointment as completed.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/complete",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment completed", body = AppointmentResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Not scheduled", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "completeAppointment"
)]
#[post("/appointments/{id}/complete")]
pub async fn complete_appointment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    let appointment = state.appointments.complete(parse_path_id(&path)?).await?;
    Ok(web::Json(AppointmentResponse::from(&appointment)))
}

/// Move a scheduled appointment to a new time.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/reschedule",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = RescheduleAppointmentRequest,
    responses(
        (status = 200, description = "Appointment rescheduled", body = AppointmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "rescheduleAppointment"
)]
#[post("/appointments/{id}/reschedule")]
pub async fn reschedule_appointment(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<RescheduleAppointmentRequest>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    let id = parse_path_id(&path)?;
    let raw = require_text(payload.into_inner().appointment_date, APPOINTMENT_DATE)?;
    let appointment_date = parse_rfc3339_timestamp(&raw, APPOINTMENT_DATE)?;
    let appointment = state.appointments.reschedule(id, appointment_date).await?;
    Ok(web::Json(AppointmentResponse::from(&appointment)))
}

#[cfg(test)]
#[path = "appointments_tests.rs"]
mod tests;
