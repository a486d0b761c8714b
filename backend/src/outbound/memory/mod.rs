//! In-process adapters for the repository ports.
//!
//! Used by integration tests and by local runs without a database. Each
//! repository keeps cloned aggregates in a mutex-guarded map and searches
//! them through [`pagination::paginate_in_memory`], so filtering and
//! sorting follow the same whitelists as the Diesel adapters.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

mod appointment_repository;
mod booking_repository;
mod product_repository;
mod search;

pub use appointment_repository::InMemoryAppointmentRepository;
pub use booking_repository::InMemoryBookingRepository;
pub use product_repository::{
    InMemoryClutchRepository, InMemoryDressRepository, InMemoryProductRepository,
};

/// Aggregates keyed by id.
struct Store<V> {
    entries: Mutex<HashMap<Uuid, V>>,
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> Store<V> {
    fn lock<E>(
        &self,
        error: impl FnOnce(String) -> E,
    ) -> Result<MutexGuard<'_, HashMap<Uuid, V>>, E> {
        self.entries
            .lock()
            .map_err(|_| error("in-memory store lock poisoned".to_owned()))
    }
}

/// Case-insensitive substring match used by the text filters.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
