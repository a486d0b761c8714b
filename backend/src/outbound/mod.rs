//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories for tests and database-less runs
//! - **storage**: S3 and in-memory image storage
//! - **token**: JWT access token signing
//! - **events**: domain event publishers
//! - **metrics**: Prometheus-backed decorators (feature-gated)
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod events;
pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod storage;
pub mod token;
