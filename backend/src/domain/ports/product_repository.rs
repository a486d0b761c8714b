//! Port for product persistence, generic over dresses and clutches.

use std::marker::PhantomData;

use async_trait::async_trait;
use pagination::{SearchParams, SearchResult};

use crate::domain::Product;

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable:
            "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError:
            "product repository query failed: {message}",
    }
}

/// Port for storing and searching one product kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository<P: Product>: Send + Sync {
    /// Insert or update a product, reservations included.
    async fn save(&self, product: &P) -> Result<(), ProductRepositoryError>;

    /// Find a product by id.
    async fn find_by_id(&self, id: &P::Id) -> Result<Option<P>, ProductRepositoryError>;

    /// Find every product whose id is listed; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[P::Id]) -> Result<Vec<P>, ProductRepositoryError>;

    /// Remove a product. Returns whether a row was deleted.
    async fn delete(&self, id: &P::Id) -> Result<bool, ProductRepositoryError>;

    /// Filter, sort and page products.
    async fn search(
        &self,
        params: &SearchParams<P::Filter>,
    ) -> Result<SearchResult<P>, ProductRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Clone, Copy)]
pub struct FixtureProductRepository<P>(PhantomData<fn() -> P>);

impl<P> Default for FixtureProductRepository<P> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

#[async_trait]
impl<P: Product> ProductRepository<P> for FixtureProductRepository<P> {
    async fn save(&self, _product: &P) -> Result<(), ProductRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &P::Id) -> Result<Option<P>, ProductRepositoryError> {
        Ok(None)
    }

    async fn find_by_ids(&self, _ids: &[P::Id]) -> Result<Vec<P>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: &P::Id) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }

    async fn search(
        &self,
        params: &SearchParams<P::Filter>,
    ) -> Result<SearchResult<P>, ProductRepositoryError> {
        Ok(SearchResult::empty(params.page(), params.per_page()))
    }
}
