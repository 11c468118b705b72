//! In-memory media store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::task::yield_now;

use super::lock;
use crate::domain::ports::{MediaStore, MediaStoreError};
use crate::domain::{MediaContentType, MediaPath};

/// Blob map with URLs under a fixed public base.
#[derive(Debug, Clone)]
pub struct InMemoryMediaStore {
    public_base_url: String,
    objects: Arc<Mutex<BTreeMap<String, (MediaContentType, usize)>>>,
}

impl InMemoryMediaStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
            objects: Arc::default(),
        }
    }

    /// Stored paths in lexical order.
    pub fn paths(&self) -> Vec<String> {
        lock(&self.objects)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for InMemoryMediaStore {
    fn default() -> Self {
        Self::new("http://localhost:8080/media")
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn put(
        &self,
        path: &MediaPath,
        content_type: MediaContentType,
        bytes: Vec<u8>,
    ) -> Result<String, MediaStoreError> {
        yield_now().await;
        let mut objects = lock(&self.objects).map_err(MediaStoreError::unavailable)?;
        objects.insert(path.to_string(), (content_type, bytes.len()));
        Ok(format!("{}/{}", self.public_base_url, path))
    }

    async fn delete(&self, paths: &[MediaPath]) -> Result<(), MediaStoreError> {
        yield_now().await;
        let mut objects = lock(&self.objects).map_err(MediaStoreError::unavailable)?;
        for path in paths {
            objects.remove(path.as_ref());
        }
        Ok(())
    }
}
