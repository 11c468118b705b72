//! Reqwest-backed object storage adapter.
//!
//! Objects are written with `POST {base}/storage/v1/object/{bucket}/{path}`
//! and removed in bulk with `DELETE {base}/storage/v1/object/{bucket}`.
//! Public URLs are `{public_base}/{path}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{MediaStore, MediaStoreError};
use crate::domain::{MediaContentType, MediaPath};

/// Location and credentials of the object store.
#[derive(Debug, Clone)]
pub struct MediaStoreEndpoint {
    pub base_url: Url,
    pub bucket: String,
    pub public_base_url: Url,
    pub service_key: String,
}

/// Media store adapter speaking the storage HTTP API.
pub struct HttpMediaStore {
    client: Client,
    object_root: Url,
    public_base: String,
    service_key: String,
}

#[derive(Serialize)]
struct DeleteObjectsBody<'a> {
    prefixes: Vec<&'a str>,
}

impl HttpMediaStore {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint URLs cannot be combined or the
    /// reqwest client cannot be constructed.
    pub fn new(endpoint: MediaStoreEndpoint, timeout: Duration) -> Result<Self, MediaStoreError> {
        let object_root = endpoint
            .base_url
            .join(&format!("storage/v1/object/{}/", endpoint.bucket))
            .map_err(|err| MediaStoreError::rejected(format!("storage url: {err}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| MediaStoreError::unavailable(err.to_string()))?;
        Ok(Self {
            client,
            object_root,
            public_base: endpoint.public_base_url.as_str().trim_end_matches('/').to_owned(),
            service_key: endpoint.service_key,
        })
    }

    fn object_url(&self, path: &MediaPath) -> Result<Url, MediaStoreError> {
        self.object_root
            .join(path.as_ref())
            .map_err(|err| MediaStoreError::rejected(format!("object url: {err}")))
    }

    fn bucket_url(&self) -> Url {
        let mut url = self.object_root.clone();
        let trimmed = url.path().trim_end_matches('/').to_owned();
        url.set_path(&trimmed);
        url
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn put(
        &self,
        path: &MediaPath,
        content_type: MediaContentType,
        bytes: Vec<u8>,
    ) -> Result<String, MediaStoreError> {
        let response = self
            .client
            .post(self.object_url(path)?)
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type.mime())
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response.status())?;
        Ok(format!("{}/{}", self.public_base, path))
    }

    async fn delete(&self, paths: &[MediaPath]) -> Result<(), MediaStoreError> {
        if paths.is_empty() {
            return Ok(());
        }
        let body = DeleteObjectsBody {
            prefixes: paths.iter().map(AsRef::as_ref).collect(),
        };
        let response = self
            .client
            .delete(self.bucket_url())
            .bearer_auth(&self.service_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response.status())
    }
}

fn check_status(status: StatusCode) -> Result<(), MediaStoreError> {
    if status.is_success() {
        return Ok(());
    }
    let message = format!("status {}", status.as_u16());
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            Err(MediaStoreError::timeout(message))
        }
        StatusCode::TOO_MANY_REQUESTS => Err(MediaStoreError::unavailable(message)),
        _ if status.is_client_error() => Err(MediaStoreError::rejected(message)),
        _ => Err(MediaStoreError::unavailable(message)),
    }
}

fn map_transport_error(error: reqwest::Error) -> MediaStoreError {
    if error.is_timeout() {
        MediaStoreError::timeout(error.to_string())
    } else {
        MediaStoreError::unavailable(error.to_string())
    }
}
