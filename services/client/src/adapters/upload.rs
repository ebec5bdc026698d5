//! services/client/src/adapters/upload.rs
//!
//! Client for the file-upload edge function. The proxy itself is a separate
//! deployment with no state of its own: `POST /` forwards a multipart body
//! into object storage under a shared-secret bearer, `GET /<key>` streams the
//! stored object back. This adapter speaks that contract and nothing else.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, multipart, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::adapters::http::{extract_status_error, map_reqwest_error};
use crate::config::Config;
use spotter_core::ports::{TransportError, TransportResult};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Confirmation body the proxy returns on a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    /// The key the object was stored under.
    pub key: String,
}

/// A downloaded object with the content type it was originally stored with.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Port over the upload proxy, substitutable in tests. `StorageService`
/// only ever speaks this trait; the reqwest client below is its one real
/// implementation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// The public URL an uploaded key is served from.
    fn public_url(&self, key: &str) -> TransportResult<Url>;

    /// Uploads `data` under `key` with its original content type.
    async fn upload(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> TransportResult<UploadReceipt>;

    /// Fetches the object stored under `key`.
    async fn download(&self, key: &str) -> TransportResult<StoredObject>;
}

pub struct UploadProxyClient {
    client: Client,
    endpoint: Url,
    secret: String,
}

impl UploadProxyClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self, crate::ClientError> {
        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: config.upload_url.clone(),
            secret: config.upload_secret.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for UploadProxyClient {
    fn public_url(&self, key: &str) -> TransportResult<Url> {
        self.endpoint.join(key).map_err(|e| TransportError::Decode {
            detail: format!("invalid object key '{key}': {e}"),
        })
    }

    /// The `filename` part overrides the stored key; the proxy would
    /// otherwise fall back to the multipart file's own name.
    async fn upload(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> TransportResult<UploadReceipt> {
        let file_part = multipart::Part::bytes(data)
            .file_name(key.to_string())
            .mime_str(content_type)
            .map_err(|e| TransportError::Decode {
                detail: format!("invalid content type '{content_type}': {e}"),
            })?;
        let form = multipart::Form::new()
            .part("file", file_part)
            .text("filename", key.to_string());

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.secret)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(extract_status_error(status, response).await);
        }
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
            detail: format!("upload confirmation did not decode: {e}"),
        })
    }

    /// A missing object surfaces as the proxy's 404 and maps to
    /// `NotFound` downstream.
    async fn download(&self, key: &str) -> TransportResult<StoredObject> {
        let url = self.public_url(key)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(extract_status_error(status, response).await);
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(StoredObject {
            bytes,
            content_type,
        })
    }
}
