//! services/client/src/services/storage.rs
//!
//! Object uploads and downloads through the upload proxy. The proxy holds
//! no state; this service only adds the identity guard (uploads are always
//! on behalf of a signed-in user) and the shared error mapping.

use std::sync::Arc;
use url::Url;

use crate::adapters::upload::{ObjectStore, StoredObject};
use spotter_core::error::{map_transport, AppError, AppResult};
use spotter_core::ports::IdentityProvider;

pub struct StorageService {
    proxy: Arc<dyn ObjectStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl StorageService {
    pub fn new(proxy: Arc<dyn ObjectStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { proxy, identity }
    }

    /// Uploads `data` under `key` and returns the public URL it is served
    /// from. Fails with `Unauthorized` before any network call when no one
    /// is signed in.
    pub async fn upload(&self, data: Vec<u8>, key: &str, content_type: &str) -> AppResult<Url> {
        self.identity
            .current_user_id()
            .await
            .ok_or(AppError::Unauthorized)?;
        let receipt = self
            .proxy
            .upload(data, key, content_type)
            .await
            .map_err(|e| map_transport(&e))?;
        self.proxy
            .public_url(&receipt.key)
            .map_err(|e| map_transport(&e))
    }

    /// Fetches the object stored under `key`; missing objects surface as
    /// `NotFound`.
    pub async fn download(&self, key: &str) -> AppResult<StoredObject> {
        self.proxy
            .download(key)
            .await
            .map_err(|e| map_transport(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::upload::UploadReceipt;
    use crate::test_support::{FakeIdentity, FakeObjectStore};
    use bytes::Bytes;
    use spotter_core::ports::TransportError;
    use uuid::Uuid;

    #[tokio::test]
    async fn upload_requires_identity_before_the_proxy() {
        let proxy = FakeObjectStore::new();
        let storage = StorageService::new(proxy.clone(), FakeIdentity::signed_out());

        assert_eq!(
            storage
                .upload(vec![1, 2, 3], "avatars/u1.jpg", "image/jpeg")
                .await,
            Err(AppError::Unauthorized)
        );
        assert_eq!(proxy.call_count(), 0);
    }

    #[tokio::test]
    async fn upload_returns_the_public_url_for_the_stored_key() {
        let proxy = FakeObjectStore::new();
        proxy.enqueue_upload(Ok(UploadReceipt {
            key: "avatars/u1.jpg".into(),
        }));
        let storage = StorageService::new(proxy, FakeIdentity::signed_in(Uuid::new_v4()));

        let url = storage
            .upload(vec![0xFF], "avatars/u1.jpg", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url.as_str(), "https://uploads.example.co/avatars/u1.jpg");
    }

    #[tokio::test]
    async fn missing_object_download_maps_to_not_found() {
        let proxy = FakeObjectStore::new();
        proxy.enqueue_download(Err(TransportError::Status {
            status: 404,
            code: None,
            message: "object not found".into(),
        }));
        let storage = StorageService::new(proxy, FakeIdentity::signed_out());

        let error = storage.download("missing.jpg").await.unwrap_err();
        assert_eq!(error, AppError::NotFound);
    }

    #[tokio::test]
    async fn download_returns_bytes_with_their_content_type() {
        let proxy = FakeObjectStore::new();
        proxy.enqueue_download(Ok(StoredObject {
            bytes: Bytes::from_static(b"jpeg bytes"),
            content_type: "image/jpeg".into(),
        }));
        let storage = StorageService::new(proxy, FakeIdentity::signed_out());

        let object = storage.download("avatars/u1.jpg").await.unwrap();
        assert_eq!(object.content_type, "image/jpeg");
        assert_eq!(object.bytes.as_ref(), b"jpeg bytes");
    }
}
