//! Driving port for listing media uploads and removals.

use async_trait::async_trait;

use crate::domain::{Error, StoredMedia, UserProfile};

/// Raw upload received from an inbound adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUploadRequest {
    /// Declared MIME type; validated by the service.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Domain use-case port for managing listing media.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyMediaCommand: Send + Sync {
    /// Store an image under the listing's media prefix.
    async fn upload(
        &self,
        caller: &UserProfile,
        identifier: &str,
        upload: MediaUploadRequest,
    ) -> Result<StoredMedia, Error>;

    /// Delete media paths, all of which must belong to the listing.
    ///
    /// Returns the number of paths removed.
    async fn delete(
        &self,
        caller: &UserProfile,
        identifier: &str,
        paths: Vec<String>,
    ) -> Result<usize, Error>;
}
