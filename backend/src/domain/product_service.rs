//! Dress and clutch domain service.
//!
//! One generic service serves both product kinds. Images are uploaded
//! before the product row is written and removed again when the product is
//! rejected; replaced and deleted images are removed after the row changes.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::future::try_join_all;
use mockable::Clock;
use pagination::{SearchParams, SearchResult};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    DomainEventPublisher, ImageStorage, ImageUpload, ProductCommand, ProductQuery,
    ProductRepository, ProductView,
};
use crate::domain::service_support::{DEFAULT_PRESIGN_TTL, discard_image, presign, publish_events};
use crate::domain::{EntityNotFoundError, Error, Product, ProductKind};

/// Object key prefix for a product family.
fn key_prefix(kind: ProductKind) -> &'static str {
    match kind {
        ProductKind::Dress => "dresses",
        ProductKind::Clutch => "clutches",
    }
}

/// File extension for an uploaded image, preferring the MIME type.
fn image_extension(upload: &ImageUpload) -> String {
    match upload.content_type.as_str() {
        "image/png" => "png".to_owned(),
        "image/jpeg" | "image/jpg" => "jpg".to_owned(),
        _ => Path::new(&upload.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or_else(|| "bin".to_owned(), str::to_ascii_lowercase),
    }
}

/// Product service implementing the product command and query ports.
pub struct ProductService<P, R> {
    repo: Arc<R>,
    storage: Arc<dyn ImageStorage>,
    events: Arc<dyn DomainEventPublisher>,
    clock: Arc<dyn Clock>,
    presign_ttl: Duration,
    product: PhantomData<fn() -> P>,
}

impl<P, R> Clone for ProductService<P, R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            storage: Arc::clone(&self.storage),
            events: Arc::clone(&self.events),
            clock: Arc::clone(&self.clock),
            presign_ttl: self.presign_ttl,
            product: PhantomData,
        }
    }
}

impl<P, R> ProductService<P, R> {
    /// Create a service over one product repository and the image store.
    pub fn new(
        repo: Arc<R>,
        storage: Arc<dyn ImageStorage>,
        events: Arc<dyn DomainEventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            storage,
            events,
            clock,
            presign_ttl: DEFAULT_PRESIGN_TTL,
            product: PhantomData,
        }
    }

    /// Override how long presigned image URLs stay valid.
    #[must_use]
    pub fn with_presign_ttl(mut self, presign_ttl: Duration) -> Self {
        self.presign_ttl = presign_ttl;
        self
    }
}

impl<P, R> ProductService<P, R>
where
    P: Product,
    R: ProductRepository<P>,
{
    async fn load(&self, id: P::Id) -> Result<P, Error> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| EntityNotFoundError::new(P::ENTITY_NAME, [id]).into())
    }

    async fn view(&self, product: P) -> Result<ProductView<P>, Error> {
        let image_url =
            presign(self.storage.as_ref(), product.image_path(), self.presign_ttl).await?;
        Ok(ProductView { product, image_url })
    }

    async fn store_image(&self, image: ImageUpload) -> Result<String, Error> {
        let name = format!(
            "{}/{}.{}",
            key_prefix(P::KIND),
            Uuid::new_v4(),
            image_extension(&image)
        );
        self.storage
            .upload(ImageUpload { name, ..image })
            .await
            .map_err(Error::from)
    }

    async fn save(&self, product: &mut P) -> Result<(), Error> {
        self.repo.save(product).await?;
        publish_events(self.events.as_ref(), product.drain_events()).await;
        Ok(())
    }

    async fn mutate<F>(&self, id: P::Id, apply: F) -> Result<ProductView<P>, Error>
    where
        F: FnOnce(&mut P) + Send,
    {
        let mut product = self.load(id).await?;
        apply(&mut product);
        product.ensure_valid()?;
        self.save(&mut product).await?;
        self.view(product).await
    }
}

#[async_trait]
impl<P, R> ProductCommand<P> for ProductService<P, R>
where
    P: Product,
    R: ProductRepository<P>,
{
    async fn create(&self, draft: P::Draft, image: ImageUpload) -> Result<ProductView<P>, Error> {
        let key = self.store_image(image).await?;
        let mut product = P::create(draft, key.clone(), self.clock.utc());

        let saved = match product.ensure_valid() {
            Ok(()) => self.save(&mut product).await,
            Err(error) => Err(error.into()),
        };
        if let Err(error) = saved {
            discard_image(self.storage.as_ref(), &key).await;
            return Err(error);
        }

        info!(kind = %P::KIND, id = %product.id(), "product created");
        self.view(product).await
    }

    async fn update(&self, id: P::Id, changes: P::Changes) -> Result<ProductView<P>, Error> {
        self.mutate(id, move |product| product.apply_changes(changes))
            .await
    }

    async fn replace_image(
        &self,
        id: P::Id,
        image: ImageUpload,
    ) -> Result<ProductView<P>, Error> {
        let mut product = self.load(id).await?;
        let previous = product.image_path().to_owned();
        let key = self.store_image(image).await?;
        product.change_image_path(key.clone());

        let saved = match product.ensure_valid() {
            Ok(()) => self.save(&mut product).await,
            Err(error) => Err(error.into()),
        };
        if let Err(error) = saved {
            discard_image(self.storage.as_ref(), &key).await;
            return Err(error);
        }

        if previous != key {
            discard_image(self.storage.as_ref(), &previous).await;
        }
        info!(kind = %P::KIND, %id, "product image replaced");
        self.view(product).await
    }

    async fn pick_up(&self, id: P::Id) -> Result<ProductView<P>, Error> {
        self.mutate(id, |product| product.pick_up()).await
    }

    async fn drop_off(&self, id: P::Id) -> Result<ProductView<P>, Error> {
        self.mutate(id, |product| product.drop_off()).await
    }

    async fn delete(&self, id: P::Id) -> Result<(), Error> {
        let product = self.load(id).await?;
        let removed = self.repo.delete(&id).await?;
        if !removed {
            warn!(kind = %P::KIND, %id, "product disappeared before delete");
            return Err(EntityNotFoundError::new(P::ENTITY_NAME, [id]).into());
        }
        discard_image(self.storage.as_ref(), product.image_path()).await;
        info!(kind = %P::KIND, %id, "product deleted");
        Ok(())
    }
}

#[async_trait]
impl<P, R> ProductQuery<P> for ProductService<P, R>
where
    P: Product,
    R: ProductRepository<P>,
{
    async fn get(&self, id: P::Id) -> Result<ProductView<P>, Error> {
        let product = self.load(id).await?;
        self.view(product).await
    }

    async fn search(
        &self,
        params: SearchParams<P::Filter>,
    ) -> Result<SearchResult<ProductView<P>>, Error> {
        let result = self.repo.search(&params).await?;
        let (total, page, per_page) = (result.total(), result.current_page(), result.per_page());
        let views = try_join_all(result.into_items().into_iter().map(|p| self.view(p))).await?;
        Ok(SearchResult::new(views, total, page, per_page))
    }

    async fn check_availability(&self, id: P::Id, date: NaiveDate) -> Result<bool, Error> {
        Ok(self.load(id).await?.is_available_for(date))
    }
}

#[cfg(test)]
#[path = "product_service_tests.rs"]
mod tests;
