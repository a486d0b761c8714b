//! OpenAPI schema definitions that have no runtime counterpart.
//!
//! The error payload is a domain type and stays free of `ToSchema`; its
//! schema is registered here under the domain name. The multipart forms are
//! decoded by hand in [`super::multipart`], so their schemas exist only for
//! documentation.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the current resource state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The entity failed domain validation; details hold the messages.
    #[schema(rename = "unprocessable_entity")]
    UnprocessableEntity,
    /// A downstream dependency is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "unprocessable_entity")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Entity validation failed")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field errors or validation messages.
    details: Option<serde_json::Value>,
}

/// `multipart/form-data` body creating a dress.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreateDressForm {
    /// JPEG or PNG, at most 3 MB.
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
    /// Decimal rent price.
    #[schema(example = "200.00")]
    rent_price: String,
    color: String,
    model: String,
    fabric: String,
}

/// `multipart/form-data` body creating a clutch.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreateClutchForm {
    /// JPEG or PNG, at most 3 MB.
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
    /// Decimal rent price.
    #[schema(example = "50.00")]
    rent_price: String,
    color: String,
    model: String,
}

/// `multipart/form-data` body replacing a product image.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ImageUploadForm {
    /// JPEG or PNG, at most 3 MB.
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}
