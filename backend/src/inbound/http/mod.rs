//! HTTP inbound adapter exposing REST endpoints.

pub mod appointments;
pub mod auth;
pub mod auth_config;
pub mod bookings;
pub mod clutches;
pub mod dresses;
pub mod error;
pub mod health;
pub mod listing;
pub mod multipart;
pub mod products;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;
