//! Process-local `ImageStorage` adapter.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{ImageStorage, ImageStorageError, ImageUpload};

/// Images kept in memory; presigned URLs point at a fake host.
#[derive(Default)]
pub struct InMemoryImageStorage {
    objects: Mutex<HashMap<String, ImageUpload>>,
}

impl InMemoryImageStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when an object is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .is_ok_and(|objects| objects.contains_key(key))
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().map_or(0, |objects| objects.len())
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn upload(&self, image: ImageUpload) -> Result<String, ImageStorageError> {
        let key = image.name.clone();
        self.objects
            .lock()
            .map_err(|_| ImageStorageError::upload("image store lock poisoned"))?
            .insert(key.clone(), image);
        Ok(key)
    }

    async fn delete(&self, key: &str) -> Result<(), ImageStorageError> {
        self.objects
            .lock()
            .map_err(|_| ImageStorageError::delete("image store lock poisoned"))?
            .remove(key);
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, ImageStorageError> {
        Ok(format!("https://images.local/{key}?expires={}", ttl.as_secs()))
    }
}
