//! Clutch HTTP handlers.
//!
//! ```text
//! GET    /api/v1/clutches
//! POST   /api/v1/clutches                    (multipart: image + fields)
//! GET    /api/v1/clutches/{id}
//! PATCH  /api/v1/clutches/{id}
//! DELETE /api/v1/clutches/{id}
//! PUT    /api/v1/clutches/{id}/image          (multipart: image)
//! POST   /api/v1/clutches/{id}/pick-up
//! POST   /api/v1/clutches/{id}/drop-off
//! GET    /api/v1/clutches/{id}/availability?date=YYYY-MM-DD
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ProductCommand, ProductQuery, ProductView};
use crate::domain::{
    Clutch, ClutchChanges, ClutchFilter, ClutchId, Error, Period, Product,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedCaller;
use crate::inbound::http::listing::{PageQuery, Paginated};
use crate::inbound::http::multipart::ProductForm;
use crate::inbound::http::products::{
    AvailabilityQuery, AvailabilityResponse, ProductResource, create_product, delete_product,
    drop_off_product, ensure_changes, get_product, list_products, optional_rent_price,
    pick_up_product, product_availability, product_draft, replace_product_image,
    update_product,
};
use crate::inbound::http::schemas::{CreateClutchForm, ErrorSchema, ImageUploadForm};
use crate::inbound::http::state::HttpState;

/// Clutch as rendered by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClutchResponse {
    pub id: ClutchId,
    #[schema(example = "Dourada, Envelope")]
    pub name: String,
    /// Presigned download URL of the image.
    pub image_url: String,
    #[schema(example = 50.0)]
    pub rent_price: f64,
    pub color: String,
    pub model: String,
    pub is_picked_up: bool,
    pub reservation_periods: Vec<Period>,
    pub created_at: DateTime<Utc>,
}

impl From<&ProductView<Clutch>> for ClutchResponse {
    fn from(view: &ProductView<Clutch>) -> Self {
        let clutch = &view.product;
        let core = clutch.core();
        Self {
            id: clutch.id(),
            name: clutch.name(),
            image_url: view.image_url.clone(),
            rent_price: core.rent_price().to_decimal(),
            color: core.color().to_owned(),
            model: core.model().to_owned(),
            is_picked_up: core.is_picked_up(),
            reservation_periods: core.reservation_periods().to_vec(),
            created_at: core.created_at(),
        }
    }
}

/// Request body for `PATCH /api/v1/clutches/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClutchRequest {
    pub rent_price: Option<f64>,
    pub color: Option<String>,
    pub model: Option<String>,
}

impl TryFrom<UpdateClutchRequest> for ClutchChanges {
    type Error = Error;

    fn try_from(value: UpdateClutchRequest) -> Result<Self, Self::Error> {
        let changes = Self {
            rent_price: optional_rent_price(value.rent_price)?,
            color: value.color,
            model: value.model,
        };
        ensure_changes(
            changes.rent_price.is_some()
                || changes.color.is_some()
                || changes.model.is_some(),
        )?;
        Ok(changes)
    }
}

/// Filters accepted by `GET /api/v1/clutches`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClutchListQuery {
    /// Case-insensitive substring of the colour.
    pub color: Option<String>,
    /// Case-insensitive substring of the model.
    pub model: Option<String>,
}

impl From<ClutchListQuery> for ClutchFilter {
    fn from(value: ClutchListQuery) -> Self {
        Self {
            color: value.color,
            model: value.model,
        }
    }
}

impl ProductResource for Clutch {
    type Response = ClutchResponse;

    fn commands(state: &HttpState) -> &dyn ProductCommand<Self> {
        state.clutches.as_ref()
    }

    fn queries(state: &HttpState) -> &dyn ProductQuery<Self> {
        state.clutches_query.as_ref()
    }

    fn draft(form: &mut ProductForm) -> Result<Self::Draft, Error> {
        product_draft(form)
    }
}

/// Register the clutch routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_clutches)
        .service(create_clutch)
        .service(get_clutch)
        .service(update_clutch)
        .service(delete_clutch)
        .service(replace_clutch_image)
        .service(pick_up_clutch)
        .service(drop_off_clutch)
        .service(clutch_availability);
}

/// List clutches with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/clutches",
    params(PageQuery, ClutchListQuery),
    responses(
        (status = 200, description = "Clutches page", body = Paginated<ClutchResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "listClutches"
)]
#[get("/clutches")]
pub async fn list_clutches(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    req: HttpRequest,
    page: web::Query<PageQuery>,
    filter: web::Query<ClutchListQuery>,
) -> ApiResult<web::Json<Paginated<ClutchResponse>>> {
    list_products::<Clutch>(&state, &req, page.into_inner(), filter.into_inner().into()).await
}

/// Upload the image and create a clutch.
#[utoipa::path(
    post,
    path = "/api/v1/clutches",
    request_body(content = CreateClutchForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Clutch created", body = ClutchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "createClutch"
)]
#[post("/clutches")]
pub async fn create_clutch(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    create_product::<Clutch>(&state, payload).await
}

/// Fetch one clutch.
#[utoipa::path(
    get,
    path = "/api/v1/clutches/{id}",
    params(("id" = String, Path, description = "Clutch id")),
    responses(
        (status = 200, description = "Clutch", body = ClutchResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "getClutch"
)]
#[get("/clutches/{id}")]
pub async fn get_clutch(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClutchResponse>> {
    get_product::<Clutch>(&state, &path).await
}

/// Change price or descriptive fields.
#[utoipa::path(
    patch,
    path = "/api/v1/clutches/{id}",
    params(("id" = String, Path, description = "Clutch id")),
    request_body = UpdateClutchRequest,
    responses(
        (status = 200, description = "Clutch updated", body = ClutchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "updateClutch"
)]
#[patch("/clutches/{id}")]
pub async fn update_clutch(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<UpdateClutchRequest>,
) -> ApiResult<web::Json<ClutchResponse>> {
    update_product::<Clutch, _>(&state, &path, payload.into_inner()).await
}

/// Remove a clutch and its image.
#[utoipa::path(
    delete,
    path = "/api/v1/clutches/{id}",
    params(("id" = String, Path, description = "Clutch id")),
    responses(
        (status = 204, description = "Clutch removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "deleteClutch"
)]
#[delete("/clutches/{id}")]
pub async fn delete_clutch(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    delete_product::<Clutch>(&state, &path).await
}

/// Swap the clutch image.
#[utoipa::path(
    put,
    path = "/api/v1/clutches/{id}/image",
    params(("id" = String, Path, description = "Clutch id")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image replaced", body = ClutchResponse),
        (status = 400, description = "Invalid image", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "replaceClutchImage"
)]
#[put("/clutches/{id}/image")]
pub async fn replace_clutch_image(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<web::Json<ClutchResponse>> {
    replace_product_image::<Clutch>(&state, &path, payload).await
}

/// Hand the clutch to a customer.
#[utoipa::path(
    post,
    path = "/api/v1/clutches/{id}/pick-up",
    params(("id" = String, Path, description = "Clutch id")),
    responses(
        (status = 200, description = "Clutch picked up", body = ClutchResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Already picked up", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "pickUpClutch"
)]
#[post("/clutches/{id}/pick-up")]
pub async fn pick_up_clutch(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClutchResponse>> {
    pick_up_product::<Clutch>(&state, &path).await
}

/// Take the clutch back.
#[utoipa::path(
    post,
    path = "/api/v1/clutches/{id}/drop-off",
    params(("id" = String, Path, description = "Clutch id")),
    responses(
        (status = 200, description = "Clutch dropped off", body = ClutchResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Not picked up", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "dropOffClutch"
)]
#[post("/clutches/{id}/drop-off")]
pub async fn drop_off_clutch(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClutchResponse>> {
    drop_off_product::<Clutch>(&state, &path).await
}

/// Check whether the clutch is free on a day.
#[utoipa::path(
    get,
    path = "/api/v1/clutches/{id}/availability",
    params(("id" = String, Path, description = "Clutch id"), AvailabilityQuery),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["clutches"],
    operation_id = "clutchAvailability"
)]
#[get("/clutches/{id}/availability")]
pub async fn clutch_availability(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    query: web::Query<AvailabilityQuery>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    product_availability::<Clutch>(&state, &path, query.into_inner().date).await
}

#[cfg(test)]
#[path = "clutches_tests.rs"]
mod tests;
