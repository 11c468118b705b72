//! Listing media service.
//!
//! Every object lives under the owning listing's media prefix
//! (`properties/{code}/`). Uploads get a fresh random file name; deletions
//! must name paths under that prefix only.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::port_error_mapping::map_media_error;
use super::ports::{MediaStore, MediaUploadRequest, PropertyMediaCommand, PropertyRepository};
use super::{
    Error, MAX_MEDIA_BYTES, MAX_MEDIA_DELETE_BATCH, MediaContentType, MediaPath, OwnershipGuard,
    StoredMedia, UserProfile,
};

/// Media service implementing [`PropertyMediaCommand`].
pub struct MediaService<P, M> {
    guard: OwnershipGuard<P>,
    store: Arc<M>,
}

impl<P, M> MediaService<P, M> {
    pub fn new(properties: Arc<P>, store: Arc<M>) -> Self {
        Self {
            guard: OwnershipGuard::new(properties),
            store,
        }
    }
}

fn validate_upload(upload: &MediaUploadRequest) -> Result<MediaContentType, Error> {
    let content_type = MediaContentType::from_mime(&upload.content_type).ok_or_else(|| {
        Error::invalid_request("unsupported media type; use jpeg, png, webp or gif").with_details(
            json!({ "field": "contentType", "code": "unsupported_media_type" }),
        )
    })?;
    if upload.bytes.is_empty() {
        return Err(Error::invalid_request("media body must not be empty")
            .with_details(json!({ "field": "body", "code": "empty" })));
    }
    if upload.bytes.len() > MAX_MEDIA_BYTES {
        return Err(Error::invalid_request("media exceeds the size limit").with_details(json!({
            "field": "body",
            "code": "too_large",
            "maxBytes": MAX_MEDIA_BYTES,
        })));
    }
    Ok(content_type)
}

fn parse_owned_paths(raw: Vec<String>, prefix: &str) -> Result<Vec<MediaPath>, Error> {
    if raw.is_empty() {
        return Err(Error::invalid_request("at least one media path is required")
            .with_details(json!({ "field": "paths", "code": "empty" })));
    }
    if raw.len() > MAX_MEDIA_DELETE_BATCH {
        return Err(Error::invalid_request("too many media paths").with_details(json!({
            "field": "paths",
            "code": "too_many",
            "max": MAX_MEDIA_DELETE_BATCH,
        })));
    }
    raw.into_iter()
        .map(|path| match MediaPath::new(path) {
            Ok(parsed) if parsed.is_under(prefix) => Ok(parsed),
            _ => Err(
                Error::policy_violation("media paths must belong to this listing")
                    .with_details(json!({ "code": "foreign_media_path" })),
            ),
        })
        .collect()
}

#[async_trait]
impl<P, M> PropertyMediaCommand for MediaService<P, M>
where
    P: PropertyRepository,
    M: MediaStore,
{
    async fn upload(
        &self,
        caller: &UserProfile,
        identifier: &str,
        upload: MediaUploadRequest,
    ) -> Result<StoredMedia, Error> {
        let property = self.guard.load_owned(caller, identifier).await?;
        let content_type = validate_upload(&upload)?;
        let path = MediaPath::new(format!(
            "{}{}.{}",
            property.media_prefix(),
            Uuid::new_v4().simple(),
            content_type.extension()
        ))
        .map_err(|err| Error::internal(format!("generated media path invalid: {err}")))?;
        let size_bytes = upload.bytes.len();
        let public_url = self
            .store
            .put(&path, content_type, upload.bytes)
            .await
            .map_err(map_media_error)?;
        info!(property_id = %property.id, %path, size_bytes, "listing media stored");
        Ok(StoredMedia {
            path,
            public_url,
            content_type,
            size_bytes,
        })
    }

    async fn delete(
        &self,
        caller: &UserProfile,
        identifier: &str,
        paths: Vec<String>,
    ) -> Result<usize, Error> {
        let property = self.guard.load_owned(caller, identifier).await?;
        let paths = parse_owned_paths(paths, &property.media_prefix())?;
        self.store.delete(&paths).await.map_err(map_media_error)?;
        info!(property_id = %property.id, count = paths.len(), "listing media removed");
        Ok(paths.len())
    }
}
