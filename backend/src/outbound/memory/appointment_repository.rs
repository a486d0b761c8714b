//! In-memory `AppointmentRepository`.

use async_trait::async_trait;
use pagination::{SearchParams, SearchResult, paginate_in_memory};

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{AggregateRoot, Appointment, AppointmentFilter, AppointmentId};

use super::Store;

type Error = AppointmentRepositoryError;

/// Appointments held in process memory.
#[derive(Default)]
pub struct InMemoryAppointmentRepository {
    store: Store<Appointment>,
}

impl InMemoryAppointmentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn save(&self, appointment: &Appointment) -> Result<(), Error> {
        let mut stored = appointment.clone();
        stored.drain_events();
        self.store
            .lock(Error::query)?
            .insert(*stored.id().as_uuid(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, Error> {
        Ok(self.store.lock(Error::query)?.get(id.as_uuid()).cloned())
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, Error> {
        Ok(self.store.lock(Error::query)?.remove(id.as_uuid()).is_some())
    }

    async fn search(
        &self,
        params: &SearchParams<AppointmentFilter>,
    ) -> Result<SearchResult<Appointment>, Error> {
        let snapshot: Vec<Appointment> = self.store.lock(Error::query)?.values().cloned().collect();
        Ok(paginate_in_memory(snapshot, params))
    }
}
