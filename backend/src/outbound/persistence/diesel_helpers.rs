//! Shared helpers and macros for Diesel repository implementations.
//!
//! This module provides common utilities for database access including:
//! - Error mapping from pool and Diesel errors to port errors
//! - Page window conversion for `OFFSET`/`LIMIT`
//! - JSONB encoding for value-object columns
//! - A declarative macro for whitelisted `ORDER BY` columns

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use pagination::SearchParams;

use super::pool::PoolError;

/// Constructors every repository error type offers, plus the mapping of
/// pool and Diesel failures onto them.
pub(crate) trait RepositoryErrorKind: Sized {
    /// The database could not be reached.
    fn connection(message: String) -> Self;
    /// A query failed or returned unusable data.
    fn query(message: String) -> Self;

    /// Map pool errors into a repository connection error.
    fn from_pool(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::connection(message)
            }
        }
    }

    /// Map Diesel errors into repository query or connection errors.
    fn from_diesel(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::NotFound => Self::query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::query("database query error".to_owned()),
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::connection("database connection error".to_owned())
            }
            _ => Self::query("database error".to_owned()),
        }
    }
}

macro_rules! impl_repository_error_kind {
    ($($error:ty),+ $(,)?) => {
        $(
            impl RepositoryErrorKind for $error {
                fn connection(message: String) -> Self {
                    <$error>::connection(message)
                }

                fn query(message: String) -> Self {
                    <$error>::query(message)
                }
            }
        )+
    };
}

impl_repository_error_kind!(
    crate::domain::ports::AppointmentRepositoryError,
    crate::domain::ports::BookingRepositoryError,
    crate::domain::ports::ProductRepositoryError,
);

/// `OFFSET` and `LIMIT` for the page requested by `params`.
pub(crate) fn page_window<F>(params: &SearchParams<F>) -> Result<(i64, i64), String> {
    let offset = i64::try_from(params.offset())
        .map_err(|_| "page offset exceeds i64 range".to_owned())?;
    let limit =
        i64::try_from(params.limit()).map_err(|_| "page size exceeds i64 range".to_owned())?;
    Ok((offset, limit))
}

/// Convert a `COUNT(*)` result into a page total.
pub(crate) fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Case-insensitive substring pattern for `ILIKE`, with wildcards escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Encode a value object stored in a JSONB column.
pub(crate) fn to_json<T: Serialize>(value: &T, column: &str) -> Result<serde_json::Value, String> {
    serde_json::to_value(value).map_err(|err| format!("encode {column}: {err}"))
}

/// Decode a value object stored in a JSONB column.
pub(crate) fn from_json<T: DeserializeOwned>(
    value: serde_json::Value,
    column: &str,
) -> Result<T, String> {
    serde_json::from_value(value).map_err(|err| format!("decode {column}: {err}"))
}

/// Parse an enum stored by its wire name.
pub(crate) fn parse_column<T>(value: &str, column: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err| format!("decode {column}: {err}"))
}

/// Order a boxed query by one column in the requested direction.
///
/// Expands to an expression so callers can use it inside `match` arms.
macro_rules! order_by_column {
    ($query:expr, $column:expr, $descending:expr) => {
        if $descending {
            $query.order_by($column.desc())
        } else {
            $query.order_by($column.asc())
        }
    };
}

pub(crate) use order_by_column;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::ProductRepositoryError;

    #[rstest]
    #[case("azul", "%azul%")]
    #[case("50%_off", "%50\\%\\_off%")]
    #[case("a\\b", "%a\\\\b%")]
    fn contains_pattern_escapes_wildcards(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = ProductRepositoryError::from_diesel(DieselError::NotFound);
        assert_eq!(err, ProductRepositoryError::query("record not found"));
    }

    #[rstest]
    fn pool_checkout_maps_to_connection_error() {
        let err = ProductRepositoryError::from_pool(PoolError::checkout("timed out"));
        assert_eq!(err, ProductRepositoryError::connection("timed out"));
    }

    #[rstest]
    #[case(-3, 0)]
    #[case(42, 42)]
    fn negative_counts_clamp_to_zero(#[case] count: i64, #[case] expected: u64) {
        assert_eq!(count_to_total(count), expected);
    }

    #[rstest]
    fn malformed_json_is_a_query_error() {
        let result: Result<Vec<crate::domain::Period>, String> =
            from_json(serde_json::json!([{ "start": "2026-05-10" }]), "reservation_periods");
        assert!(result.is_err_and(|message| message.starts_with("decode reservation_periods")));
    }
}
