//! Driving port for appointment reads.

use async_trait::async_trait;
use pagination::{SearchParams, SearchResult};

use crate::domain::{Appointment, AppointmentFilter, AppointmentId, Error};

/// Driving port for appointment read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentQuery: Send + Sync {
    /// Fetch one appointment, failing with `not_found` when absent.
    async fn get(&self, id: AppointmentId) -> Result<Appointment, Error>;

    /// Filter, sort and page appointments.
    async fn search(
        &self,
        params: SearchParams<AppointmentFilter>,
    ) -> Result<SearchResult<Appointment>, Error>;
}
