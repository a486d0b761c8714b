//! Port for appointment persistence and search.

use async_trait::async_trait;
use pagination::{SearchParams, SearchResult};

use crate::domain::{Appointment, AppointmentFilter, AppointmentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable:
            "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError:
            "appointment repository query failed: {message}",
    }
}

/// Port for storing and searching appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert or update an appointment, history included.
    async fn save(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError>;

    /// Find an appointment by id.
    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// Remove an appointment. Returns whether a row was deleted.
    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError>;

    /// Filter, sort and page appointments.
    async fn search(
        &self,
        params: &SearchParams<AppointmentFilter>,
    ) -> Result<SearchResult<Appointment>, AppointmentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAppointmentRepository;

#[async_trait]
impl AppointmentRepository for FixtureAppointmentRepository {
    async fn save(&self, _appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: &AppointmentId) -> Result<bool, AppointmentRepositoryError> {
        Ok(false)
    }

    async fn search(
        &self,
        params: &SearchParams<AppointmentFilter>,
    ) -> Result<SearchResult<Appointment>, AppointmentRepositoryError> {
        Ok(SearchResult::empty(params.page(), params.per_page()))
    }
}
