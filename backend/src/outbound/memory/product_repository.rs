//! In-memory `ProductRepository`, shared by dresses and clutches.

use async_trait::async_trait;
use pagination::{InMemorySearch, SearchParams, SearchResult, paginate_in_memory};
use uuid::Uuid;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{Clutch, Dress, Product};

use super::Store;

type Error = ProductRepositoryError;

/// Products of one kind held in process memory.
pub struct InMemoryProductRepository<P> {
    store: Store<P>,
}

impl<P> Default for InMemoryProductRepository<P> {
    fn default() -> Self {
        Self {
            store: Store::default(),
        }
    }
}

impl<P> InMemoryProductRepository<P> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// In-memory dress repository.
pub type InMemoryDressRepository = InMemoryProductRepository<Dress>;
/// In-memory clutch repository.
pub type InMemoryClutchRepository = InMemoryProductRepository<Clutch>;

#[async_trait]
impl<P> ProductRepository<P> for InMemoryProductRepository<P>
where
    P: Product + InMemorySearch<P::Filter>,
{
    async fn save(&self, product: &P) -> Result<(), Error> {
        let mut stored = product.clone();
        stored.drain_events();
        self.store
            .lock(Error::query)?
            .insert(stored.core().id(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &P::Id) -> Result<Option<P>, Error> {
        let key: Uuid = (*id).into();
        Ok(self.store.lock(Error::query)?.get(&key).cloned())
    }

    async fn find_by_ids(&self, ids: &[P::Id]) -> Result<Vec<P>, Error> {
        let store = self.store.lock(Error::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                let key: Uuid = (*id).into();
                store.get(&key).cloned()
            })
            .collect())
    }

    async fn delete(&self, id: &P::Id) -> Result<bool, Error> {
        let key: Uuid = (*id).into();
        Ok(self.store.lock(Error::query)?.remove(&key).is_some())
    }

    async fn search(&self, params: &SearchParams<P::Filter>) -> Result<SearchResult<P>, Error> {
        let snapshot: Vec<P> = self.store.lock(Error::query)?.values().cloned().collect();
        Ok(paginate_in_memory(snapshot, params))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::{AggregateRoot, ClutchId, DressFilter, Period};
    use crate::test_support::fixtures::{clutch, dress, may};
    use pagination::RawSearchParams;

    #[rstest]
    #[tokio::test]
    async fn save_overwrites_and_drops_pending_events() {
        let repo = InMemoryDressRepository::new();
        let mut item = dress();
        repo.save(&item).await.expect("save succeeds");

        item.add_reservation_period(Period::new(may(10), may(12)).expect("ordered"));
        repo.save(&item).await.expect("save succeeds");

        let mut found = repo
            .find_by_id(&item.id())
            .await
            .expect("lookup succeeds")
            .expect("dress stored");
        assert_eq!(found.core().reservation_periods().len(), 1);
        assert!(found.drain_events().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn find_by_ids_skips_unknown_ids() {
        let repo = InMemoryClutchRepository::new();
        let item = clutch();
        repo.save(&item).await.expect("save succeeds");

        let found = repo
            .find_by_ids(&[item.id(), ClutchId::random()])
            .await
            .expect("lookup succeeds");
        assert_eq!(found.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn search_pages_filtered_dresses() {
        let repo = InMemoryDressRepository::new();
        for _ in 0..3 {
            repo.save(&dress()).await.expect("save succeeds");
        }
        let params = SearchParams::create(RawSearchParams {
            page: Some(2),
            per_page: Some(2),
            filter: Some(DressFilter {
                color: Some("azul".to_owned()),
                ..DressFilter::default()
            }),
            ..RawSearchParams::default()
        });

        let result = repo.search(&params).await.expect("search succeeds");
        assert_eq!(result.total(), 3);
        assert_eq!(result.items().len(), 1);
        assert_eq!(result.last_page(), 2);
    }
}
