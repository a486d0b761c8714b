//! Port for storing product images in object storage.

use std::time::Duration;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image storage adapters.
    pub enum ImageStorageError {
        /// The object could not be written.
        Upload { message: String } => ServiceUnavailable:
            "image upload failed: {message}",
        /// The object could not be removed.
        Delete { message: String } => ServiceUnavailable:
            "image delete failed: {message}",
        /// A download URL could not be signed.
        Presign { message: String } => ServiceUnavailable:
            "image presign failed: {message}",
    }
}

/// An image ready to be written to storage.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Object key, e.g. `dresses/<uuid>.png`.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type sent with the object.
    pub content_type: String,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Port for image persistence and signed download links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `image` and return the key it was written under.
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageStorageError>;

    /// Remove the object stored under `key`.
    async fn delete(&self, key: &str) -> Result<(), ImageStorageError>;

    /// Time-limited download URL for `key`.
    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, ImageStorageError>;
}

/// Fixture storage that accepts every upload and signs fake URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageStorage;

#[async_trait]
impl ImageStorage for FixtureImageStorage {
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageStorageError> {
        Ok(image.name)
    }

    async fn delete(&self, _key: &str) -> Result<(), ImageStorageError> {
        Ok(())
    }

    async fn presigned_url(&self, key: &str, _ttl: Duration) -> Result<String, ImageStorageError> {
        Ok(format!("https://fixture.invalid/{key}"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_upload_returns_name_as_key() {
        let key = FixtureImageStorage
            .upload(ImageUpload {
                name: "dresses/a.png".to_owned(),
                bytes: vec![1, 2, 3],
                content_type: "image/png".to_owned(),
            })
            .await
            .expect("fixture upload succeeds");
        assert_eq!(key, "dresses/a.png");
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_presign_embeds_key() {
        let url = FixtureImageStorage
            .presigned_url("clutches/b.jpg", Duration::from_secs(60))
            .await
            .expect("fixture presign succeeds");
        assert_eq!(url, "https://fixture.invalid/clutches/b.jpg");
    }

    #[rstest]
    fn debug_hides_file_contents() {
        let upload = ImageUpload {
            name: "k".to_owned(),
            bytes: vec![0xff; 4],
            content_type: "image/jpeg".to_owned(),
        };
        assert!(format!("{upload:?}").contains("bytes: 4"));
    }
}
