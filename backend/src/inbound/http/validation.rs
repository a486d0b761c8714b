//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies and query strings arrive as loosely typed text; these
//! helpers turn them into domain values or an `invalid_request` error whose
//! details name the offending field, the raw value and a stable code.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, Money};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidTimestamp,
    InvalidAmount,
    InvalidInteger,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidAmount => "invalid_amount",
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({
            "field": field.as_str(),
            "value": value,
            "code": code.as_str(),
        }),
        None => json!({
            "field": field.as_str(),
            "code": code.as_str(),
        }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
        None,
    )
}

/// Unwrap an optional field, failing with `missing_field`.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Reject a required text field that is absent or blank.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(missing_field_error(field)),
    }
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be a valid UUID"),
            ErrorCode::InvalidUuid,
            Some(value),
        )
    })
}

/// Parse the `{id}` path segment into a typed identifier.
pub(crate) fn parse_path_id<I: From<Uuid>>(value: &str) -> Result<I, Error> {
    parse_uuid(value, FieldName::new("id")).map(I::from)
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be a date in YYYY-MM-DD format"),
            ErrorCode::InvalidDate,
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date(&raw, field))
        .transpose()
}

pub(crate) fn parse_rfc3339_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            field_error(
                field,
                format!("{name} must be an RFC 3339 timestamp"),
                ErrorCode::InvalidTimestamp,
                Some(value),
            )
        })
}

/// Convert a decimal amount into [`Money`].
///
/// Sign rules belong to the aggregates; only non-finite numbers are
/// rejected here.
pub(crate) fn parse_amount(value: f64, field: FieldName) -> Result<Money, Error> {
    Money::from_decimal(value).map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be a finite decimal amount"),
            ErrorCode::InvalidAmount,
            Some(&value.to_string()),
        )
    })
}

/// Parse a decimal amount sent as a form field, digit by digit.
pub(crate) fn parse_amount_text(value: &str, field: FieldName) -> Result<Money, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be a decimal amount"),
            ErrorCode::InvalidAmount,
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_integer(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<i64>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|_| {
                let name = field.as_str();
                field_error(
                    field,
                    format!("{name} must be an integer"),
                    ErrorCode::InvalidInteger,
                    Some(&raw),
                )
            })
        })
        .transpose()
}

/// Parse an enum by its wire name, e.g. `SCHEDULED`.
pub(crate) fn parse_enum<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.trim().parse().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} has an unsupported value"),
            ErrorCode::InvalidValue,
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_enum<T: FromStr>(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<T>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_enum(&raw, field))
        .transpose()
}
