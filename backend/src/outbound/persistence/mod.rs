//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel rows and domain aggregates. No business rules live here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) never leave this module.
//! - **Value objects as JSONB**: reservation periods, adjustments and the
//!   appointment history are stored as JSONB documents next to their row.
//! - **Strongly typed errors**: All database errors are mapped to the
//!   repository error of the port being served.
//!
//! # Example
//!
//! ```ignore
//! use atelier::outbound::persistence::{DbPool, PoolConfig, DieselDressRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/atelier")).await?;
//! let dresses = DieselDressRepository::new(pool);
//! ```

mod diesel_appointment_repository;
mod diesel_booking_repository;
pub(crate) mod diesel_helpers;
mod diesel_product_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_product_repository::{DieselClutchRepository, DieselDressRepository};
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
