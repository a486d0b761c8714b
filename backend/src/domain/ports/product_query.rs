//! Driving port for dress and clutch reads.

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::{SearchParams, SearchResult};

use crate::domain::{Error, Product};

/// A product with a signed download URL for its image.
#[derive(Debug, Clone)]
pub struct ProductView<P> {
    /// The product aggregate.
    pub product: P,
    /// Time-limited image URL.
    pub image_url: String,
}

/// Driving port for product read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductQuery<P: Product>: Send + Sync {
    /// Fetch one product, failing with `not_found` when absent.
    async fn get(&self, id: P::Id) -> Result<ProductView<P>, Error>;

    /// Filter, sort and page products.
    async fn search(
        &self,
        params: SearchParams<P::Filter>,
    ) -> Result<SearchResult<ProductView<P>>, Error>;

    /// True when no reservation covers `date`.
    async fn check_availability(&self, id: P::Id, date: NaiveDate) -> Result<bool, Error>;
}
