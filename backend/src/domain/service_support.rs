//! Helpers shared by the domain services for event publishing, image
//! presigning and best-effort image cleanup.

use std::time::Duration;

use tracing::warn;

use crate::domain::ports::{DomainEventPublisher, ImageStorage};
use crate::domain::{DomainEvent, Error};

/// Lifetime of presigned image URLs when none is configured.
pub const DEFAULT_PRESIGN_TTL: Duration = Duration::from_secs(60 * 60);

/// Hand `events` to the publisher after the owning aggregate was saved.
///
/// The write already happened, so a publishing failure is logged and
/// swallowed.
pub(crate) async fn publish_events(publisher: &dyn DomainEventPublisher, events: Vec<DomainEvent>) {
    if events.is_empty() {
        return;
    }
    let count = events.len();
    if let Err(error) = publisher.publish(events).await {
        warn!(%error, count, "failed to publish domain events");
    }
}

/// Remove an image whose owner no longer references it.
pub(crate) async fn discard_image(storage: &dyn ImageStorage, key: &str) {
    if let Err(error) = storage.delete(key).await {
        warn!(%error, key, "failed to delete stored image");
    }
}

/// Signed download URL for `key`.
pub(crate) async fn presign(
    storage: &dyn ImageStorage,
    key: &str,
    ttl: Duration,
) -> Result<String, Error> {
    Ok(storage.presigned_url(key, ttl).await?)
}
