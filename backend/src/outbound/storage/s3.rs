//! S3-backed `ImageStorage` adapter.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use crate::domain::ports::{ImageStorage, ImageStorageError, ImageUpload};

/// Bucket and endpoint selection for [`S3ImageStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3StorageConfig {
    /// Bucket holding product images.
    pub bucket: String,
    /// AWS region; falls back to the SDK's provider chain when absent.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services such as MinIO. Enables
    /// path-style addressing.
    pub endpoint: Option<String>,
}

/// Product images stored in an S3 bucket.
#[derive(Clone)]
pub struct S3ImageStorage {
    client: Client,
    bucket: String,
}

impl S3ImageStorage {
    /// Wrap an existing client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the ambient AWS configuration and `config`.
    ///
    /// Credentials come from the standard provider chain (environment,
    /// profile, instance metadata).
    pub async fn connect(config: &S3StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self::new(Client::from_conf(builder.build()), config.bucket.clone())
    }
}

#[async_trait]
impl ImageStorage for S3ImageStorage {
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageStorageError> {
        let ImageUpload {
            name,
            bytes,
            content_type,
        } = image;
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&name)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| ImageStorageError::upload(DisplayErrorContext(&err).to_string()))?;
        debug!(key = %name, size, "image uploaded");
        Ok(name)
    }

    async fn delete(&self, key: &str) -> Result<(), ImageStorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| ImageStorageError::delete(DisplayErrorContext(&err).to_string()))?;
        debug!(key, "image deleted");
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, ImageStorageError> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|err| ImageStorageError::presign(err.to_string()))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|err| ImageStorageError::presign(DisplayErrorContext(&err).to_string()))?;
        Ok(request.uri().to_string())
    }
}
