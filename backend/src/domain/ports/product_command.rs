//! Driving port for dress and clutch mutations.

use async_trait::async_trait;

use crate::domain::{Error, Product};

use super::{ImageUpload, ProductView};

/// Driving port for product write operations.
///
/// Uploaded images arrive with their original file name; the implementation
/// chooses the storage key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCommand<P: Product>: Send + Sync {
    /// Store the image and create the product.
    async fn create(&self, draft: P::Draft, image: ImageUpload) -> Result<ProductView<P>, Error>;

    /// Change descriptive fields and price.
    async fn update(&self, id: P::Id, changes: P::Changes) -> Result<ProductView<P>, Error>;

    /// Swap the product image.
    async fn replace_image(&self, id: P::Id, image: ImageUpload)
    -> Result<ProductView<P>, Error>;

    /// Hand the product to a customer.
    async fn pick_up(&self, id: P::Id) -> Result<ProductView<P>, Error>;

    /// Take the product back.
    async fn drop_off(&self, id: P::Id) -> Result<ProductView<P>, Error>;

    /// Remove the product and its image.
    async fn delete(&self, id: P::Id) -> Result<(), Error>;
}
