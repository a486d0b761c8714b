//! Driving port for booking reads.

use std::collections::HashMap;

use async_trait::async_trait;
use pagination::{SearchParams, SearchResult};

use crate::domain::{Booking, BookingFilter, BookingId, BookingItemId, Error};

/// A booking with signed image URLs for each item.
#[derive(Debug, Clone)]
pub struct BookingView {
    /// The booking aggregate.
    pub booking: Booking,
    /// Download URL per item, keyed by item id.
    pub image_urls: HashMap<BookingItemId, String>,
}

impl BookingView {
    /// Download URL for `item`, if one was signed.
    pub fn image_url(&self, item: BookingItemId) -> Option<&str> {
        self.image_urls.get(&item).map(String::as_str)
    }
}

/// Driving port for booking read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Fetch one booking, failing with `not_found` when absent.
    async fn get(&self, id: BookingId) -> Result<BookingView, Error>;

    /// Filter, sort and page bookings.
    async fn search(
        &self,
        params: SearchParams<BookingFilter>,
    ) -> Result<SearchResult<BookingView>, Error>;
}
