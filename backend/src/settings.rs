//! Application settings loaded via OrthoConfig.
//!
//! Values come from `ATELIER_*` environment variables, configuration files
//! and command-line flags. Authentication secrets are read separately by
//! [`crate::inbound::http::auth_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::DEFAULT_PER_PAGE;
use serde::Deserialize;

use crate::outbound::storage::S3StorageConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised when a setting holds an unusable value.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address {value}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Runtime configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ATELIER")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Absent means in-memory repositories.
    pub database_url: Option<String>,
    /// Upper bound of pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Bucket holding product images. Absent means in-memory storage.
    pub s3_bucket: Option<String>,
    /// AWS region override for the bucket.
    pub s3_region: Option<String>,
    /// Endpoint of an S3-compatible service such as MinIO.
    pub s3_endpoint: Option<String>,
    /// Lifetime of presigned image URLs, in seconds.
    #[ortho_config(default = 900)]
    pub presign_ttl_secs: u64,
    /// Page size used when a list request omits `limit`.
    pub page_size: Option<u32>,
    /// Lifetime of issued access tokens, in minutes.
    #[ortho_config(default = 480)]
    pub token_ttl_minutes: i64,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured pool size; zero is raised to one connection.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }

    /// Object storage settings when a bucket is configured.
    pub fn s3(&self) -> Option<S3StorageConfig> {
        self.s3_bucket.as_ref().map(|bucket| S3StorageConfig {
            bucket: bucket.clone(),
            region: self.s3_region.clone(),
            endpoint: self.s3_endpoint.clone(),
        })
    }

    /// Lifetime of presigned image URLs.
    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_secs)
    }

    /// Default page size; zero falls back to the library default.
    pub fn page_size(&self) -> u32 {
        match self.page_size {
            Some(size) if size > 0 => size,
            _ => DEFAULT_PER_PAGE,
        }
    }

    /// Lifetime of issued access tokens.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }
}
