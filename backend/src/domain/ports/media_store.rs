//! Driven port for the blob store holding listing media.

use async_trait::async_trait;

use crate::domain::{MediaContentType, MediaPath};

use super::define_port_error;

define_port_error! {
    /// Errors raised by media store adapters.
    pub enum MediaStoreError {
        /// The store could not be reached or answered with a server error.
        Unavailable { message: String } => "media store unavailable: {message}",
        /// The store did not answer within the configured timeout.
        Timeout { message: String } => "media store timed out: {message}",
        /// The store refused the request.
        Rejected { message: String } => "media store rejected the request: {message}",
    }
}

/// Port for storing and removing media blobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` under `path` and return the object's public URL.
    async fn put(
        &self,
        path: &MediaPath,
        content_type: MediaContentType,
        bytes: Vec<u8>,
    ) -> Result<String, MediaStoreError>;

    /// Remove every object in `paths`. Missing objects are not an error.
    async fn delete(&self, paths: &[MediaPath]) -> Result<(), MediaStoreError>;
}
