//! Port for booking persistence and search.

use async_trait::async_trait;
use pagination::{SearchParams, SearchResult};

use crate::domain::{Booking, BookingFilter, BookingId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable:
            "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError:
            "booking repository query failed: {message}",
    }
}

/// Port for storing and searching bookings with their items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert or update a booking and replace its items.
    async fn save(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Find a booking by id.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Remove a booking and its items. Returns whether a row was deleted.
    async fn delete(&self, id: &BookingId) -> Result<bool, BookingRepositoryError>;

    /// Filter, sort and page bookings.
    async fn search(
        &self,
        params: &SearchParams<BookingFilter>,
    ) -> Result<SearchResult<Booking>, BookingRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingRepository;

#[async_trait]
impl BookingRepository for FixtureBookingRepository {
    async fn save(&self, _booking: &Booking) -> Result<(), BookingRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: &BookingId) -> Result<bool, BookingRepositoryError> {
        Ok(false)
    }

    async fn search(
        &self,
        params: &SearchParams<BookingFilter>,
    ) -> Result<SearchResult<Booking>, BookingRepositoryError> {
        Ok(SearchResult::empty(params.page(), params.per_page()))
    }
}
