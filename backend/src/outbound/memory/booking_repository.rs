//! In-memory `BookingRepository`.

use async_trait::async_trait;
use pagination::{SearchParams, SearchResult, paginate_in_memory};

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{AggregateRoot, Booking, BookingFilter, BookingId};

use super::Store;

type Error = BookingRepositoryError;

/// Bookings held in process memory.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    store: Store<Booking>,
}

impl InMemoryBookingRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), Error> {
        let mut stored = booking.clone();
        stored.drain_events();
        self.store
            .lock(Error::query)?
            .insert(*stored.id().as_uuid(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, Error> {
        Ok(self.store.lock(Error::query)?.get(id.as_uuid()).cloned())
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, Error> {
        Ok(self.store.lock(Error::query)?.remove(id.as_uuid()).is_some())
    }

    async fn search(
        &self,
        params: &SearchParams<BookingFilter>,
    ) -> Result<SearchResult<Booking>, Error> {
        let snapshot: Vec<Booking> = self.store.lock(Error::query)?.values().cloned().collect();
        Ok(paginate_in_memory(snapshot, params))
    }
}
