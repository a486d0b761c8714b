//! Dress HTTP handlers.
//!
//! ```text
//! GET    /api/v1/dresses
//! POST   /api/v1/dresses                    (multipart: image + fields)
//! GET    /api/v1/dresses/{id}
//! PATCH  /api/v1/dresses/{id}
//! DELETE /api/v1/dresses/{id}
//! PUT    /api/v1/dresses/{id}/image          (multipart: image)
//! POST   /api/v1/dresses/{id}/pick-up
//! POST   /api/v1/dresses/{id}/drop-off
//! GET    /api/v1/dresses/{id}/availability?date=YYYY-MM-DD
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ProductCommand, ProductQuery, ProductView};
use crate::domain::{
    Dress, DressChanges, DressDraft, DressFilter, DressId, Error, Period, Product,
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
use crate::inbound::http::schemas::{CreateDressForm, ErrorSchema, ImageUploadForm};
use crate::inbound::http::state::HttpState;

/// Dress as rendered by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DressResponse {
    pub id: DressId,
    #[schema(example = "Azul, Tomara que caia, Seda")]
    pub name: String,
    /// Presigned download URL of the image.
    pub image_url: String,
    #[schema(example = 200.0)]
    pub rent_price: f64,
    pub color: String,
    pub model: String,
    pub fabric: String,
    pub is_picked_up: bool,
    pub reservation_periods: Vec<Period>,
    pub created_at: DateTime<Utc>,
}

impl From<&ProductView<Dress>> for DressResponse {
    fn from(view: &ProductView<Dress>) -> Self {
        let dress = &view.product;
        let core = dress.core();
        Self {
            id: dress.id(),
            name: dress.name(),
            image_url: view.image_url.clone(),
            rent_price: core.rent_price().to_decimal(),
            color: core.color().to_owned(),
            model: core.model().to_owned(),
            fabric: dress.fabric().to_owned(),
            is_picked_up: core.is_picked_up(),
            reservation_periods: core.reservation_periods().to_vec(),
            created_at: core.created_at(),
        }
    }
}

/// Request body for `PATCH /api/v1/dresses/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDressRequest {
    pub rent_price: Option<f64>,
    pub color: Option<String>,
    pub model: Option<String>,
    pub fabric: Option<String>,
}

impl TryFrom<UpdateDressRequest> for DressChanges {
    type Error = Error;

    fn try_from(value: UpdateDressRequest) -> Result<Self, Self::Error> {
        let changes = Self {
            rent_price: optional_rent_price(value.rent_price)?,
            color: value.color,
            model: value.model,
            fabric: value.fabric,
        };
        ensure_changes(
            changes.rent_price.is_some()
                || changes.color.is_some()
                || changes.model.is_some()
                || changes.fabric.is_some(),
        )?;
        Ok(changes)
    }
}

/// Filters accepted by `GET /api/v1/dresses`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DressListQuery {
    /// Case-insensitive substring of the colour.
    pub color: Option<String>,
    /// Case-insensitive substring of the model.
    pub model: Option<String>,
    /// Case-insensitive substring of the fabric.
    pub fabric: Option<String>,
}

impl From<DressListQuery> for DressFilter {
    fn from(value: DressListQuery) -> Self {
        Self {
            color: value.color,
            model: value.model,
            fabric: value.fabric,
        }
    }
}

impl ProductResource for Dress {
    type Response = DressResponse;

    fn commands(state: &HttpState) -> &dyn ProductCommand<Self> {
        state.dresses.as_ref()
    }

    fn queries(state: &HttpState) -> &dyn ProductQuery<Self> {
        state.dresses_query.as_ref()
    }

    fn draft(form: &mut ProductForm) -> Result<Self::Draft, Error> {
        Ok(DressDraft {
            product: product_draft(form)?,
            fabric: form.take("fabric").unwrap_or_default(),
        })
    }
}

/// Register the dress routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_dresses)
        .service(create_dress)
        .service(get_dress)
        .service(update_dress)
        .service(delete_dress)
        .service(replace_dress_image)
        .service(pick_up_dress)
        .service(drop_off_dress)
        .service(dress_availability);
}

/// List dresses with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/dresses",
    params(PageQuery, DressListQuery),
    responses(
        (status = 200, description = "Dresses page", body = Paginated<DressResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "listDresses"
)]
#[get("/dresses")]
pub async fn list_dresses(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    req: HttpRequest,
    page: web::Query<PageQuery>,
    filter: web::Query<DressListQuery>,
) -> ApiResult<web::Json<Paginated<DressResponse>>> {
    list_products::<Dress>(&state, &req, page.into_inner(), filter.into_inner().into()).await
}

/// Upload the image and create a dress.
#[utoipa::path(
    post,
    path = "/api/v1/dresses",
    request_body(content = CreateDressForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Dress created", body = DressResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "createDress"
)]
#[post("/dresses")]
pub async fn create_dress(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    create_product::<Dress>(&state, payload).await
}

/// Fetch one dress.
#[utoipa::path(
    get,
    path = "/api/v1/dresses/{id}",
    params(("id" = String, Path, description = "Dress id")),
    responses(
        (status = 200, description = "Dress", body = DressResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "getDress"
)]
#[get("/dresses/{id}")]
pub async fn get_dress(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DressResponse>> {
    get_product::<Dress>(&state, &path).await
}

/// Change price or descriptive fields.
#[utoipa::path(
    patch,
    path = "/api/v1/dresses/{id}",
    params(("id" = String, Path, description = "Dress id")),
    request_body = UpdateDressRequest,
    responses(
        (status = 200, description = "Dress updated", body = DressResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "updateDress"
)]
#[patch("/dresses/{id}")]
pub async fn update_dress(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<UpdateDressRequest>,
) -> ApiResult<web::Json<DressResponse>> {
    update_product::<Dress, _>(&state, &path, payload.into_inner()).await
}

/// Remove a dress and its image.
#[utoipa::path(
    delete,
    path = "/api/v1/dresses/{id}",
    params(("id" = String, Path, description = "Dress id")),
    responses(
        (status = 204, description = "Dress removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "deleteDress"
)]
#[delete("/dresses/{id}")]
pub async fn delete_dress(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    delete_product::<Dress>(&state, &path).await
}

/// Swap the dress image.
#[utoipa::path(
    put,
    path = "/api/v1/dresses/{id}/image",
    params(("id" = String, Path, description = "Dress id")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image replaced", body = DressResponse),
        (status = 400, description = "Invalid image", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "replaceDressImage"
)]
#[put("/dresses/{id}/image")]
pub async fn replace_dress_image(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<web::Json<DressResponse>> {
    replace_product_image::<Dress>(&state, &path, payload).await
}

/// Hand the dress to a customer.
#[utoipa::path(
    post,
    path = "/api/v1/dresses/{id}/pick-up",
    params(("id" = String, Path, description = "Dress id")),
    responses(
        (status = 200, description = "Dress picked up", body = DressResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Already picked up", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "pickUpDress"
)]
#[post("/dresses/{id}/pick-up")]
pub async fn pick_up_dress(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DressResponse>> {
    pick_up_product::<Dress>(&state, &path).await
}

/// Take the dress back.
#[utoipa::path(
    post,
    path = "/api/v1/dresses/{id}/drop-off",
    params(("id" = String, Path, description = "Dress id")),
    responses(
        (status = 200, description = "Dress dropped off", body = DressResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Not picked up", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "dropOffDress"
)]
#[post("/dresses/{id}/drop-off")]
pub async fn drop_off_dress(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DressResponse>> {
    drop_off_product::<Dress>(&state, &path).await
}

/// Check whether the dress is free on a day.
#[utoipa::path(
    get,
    path = "/api/v1/dresses/{id}/availability",
    params(("id" = String, Path, description = "Dress id"), AvailabilityQuery),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dresses"],
    operation_id = "dressAvailability"
)]
#[get("/dresses/{id}/availability")]
pub async fn dress_availability(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<String>,
    query: web::Query<AvailabilityQuery>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    product_availability::<Dress>(&state, &path, query.into_inner().date).await
}

#[cfg(test)]
#[path = "dresses_tests.rs"]
mod tests;
