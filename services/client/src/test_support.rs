//! services/client/src/test_support.rs
//!
//! In-memory doubles for the transport and identity ports, exposed behind
//! the `test-support` feature so integration tests can drive the services
//! without a network. The backend double is a call-count spy with scripted
//! per-operation response queues; scripting responses in sequence is how
//! tests model an eventually-consistent backend.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use url::Url;
use uuid::Uuid;

use crate::adapters::upload::{ObjectStore, StoredObject, UploadReceipt};
use spotter_core::ports::{
    BackendTransport, Filter, IdentityProvider, TransportError, TransportResult,
};

/// A fixed identity double: either signed in as one user or signed out.
pub struct FakeIdentity {
    user: Option<Uuid>,
}

impl FakeIdentity {
    pub fn signed_in(user: Uuid) -> Arc<Self> {
        Arc::new(Self { user: Some(user) })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self { user: None })
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn current_user_id(&self) -> Option<Uuid> {
        self.user
    }
}

#[derive(Default)]
struct FakeBackendState {
    calls: Vec<String>,
    responses: HashMap<String, VecDeque<TransportResult<Vec<u8>>>>,
    last_payload: Option<Value>,
}

/// Scripted transport double.
///
/// Responses are keyed by `"{operation}:{target}"` — e.g. `rpc:get_feed`,
/// `select:profiles`, `upsert:gyms` — and consumed front-to-back. A call
/// with no scripted response panics, which keeps test scripts honest.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeBackendState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Scripts a successful response body for the keyed operation.
    pub fn enqueue_ok(&self, key: &str, body: Value) {
        self.enqueue(key, Ok(serde_json::to_vec(&body).expect("body serializes")));
    }

    /// Scripts a transport failure for the keyed operation.
    pub fn enqueue_err(&self, key: &str, error: TransportError) {
        self.enqueue(key, Err(error));
    }

    /// Total number of transport calls made, across all operations.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// The recorded operations, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// The payload of the most recent RPC call or table write.
    pub fn last_payload(&self) -> Option<Value> {
        self.lock().last_payload.clone()
    }

    fn enqueue(&self, key: &str, response: TransportResult<Vec<u8>>) {
        self.lock()
            .responses
            .entry(key.to_string())
            .or_default()
            .push_back(response);
    }

    fn take(&self, key: &str) -> TransportResult<Vec<u8>> {
        let mut state = self.lock();
        state.calls.push(key.to_string());
        state
            .responses
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no scripted response for '{key}'"))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeBackendState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[derive(Default)]
struct FakeStoreState {
    calls: Vec<String>,
    uploads: VecDeque<TransportResult<UploadReceipt>>,
    downloads: VecDeque<TransportResult<StoredObject>>,
}

/// Scripted upload-proxy double. Same queue discipline as [`FakeBackend`]:
/// responses are consumed front-to-back and an unscripted call panics.
#[derive(Default)]
pub struct FakeObjectStore {
    state: Mutex<FakeStoreState>,
}

impl FakeObjectStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn enqueue_upload(&self, response: TransportResult<UploadReceipt>) {
        self.lock().uploads.push_back(response);
    }

    pub fn enqueue_download(&self, response: TransportResult<StoredObject>) {
        self.lock().downloads.push_back(response);
    }

    /// Total number of proxy calls made.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeStoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    fn public_url(&self, key: &str) -> TransportResult<Url> {
        Url::parse("https://uploads.example.co/")
            .expect("base url parses")
            .join(key)
            .map_err(|e| TransportError::Decode {
                detail: e.to_string(),
            })
    }

    async fn upload(
        &self,
        _data: Vec<u8>,
        _key: &str,
        _content_type: &str,
    ) -> TransportResult<UploadReceipt> {
        let mut state = self.lock();
        state.calls.push("upload".to_string());
        state
            .uploads
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted upload response"))
    }

    async fn download(&self, key: &str) -> TransportResult<StoredObject> {
        let mut state = self.lock();
        state.calls.push(format!("download:{key}"));
        state
            .downloads
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted download response for '{key}'"))
    }
}

#[async_trait]
impl BackendTransport for FakeBackend {
    async fn rpc(&self, procedure: &str, params: Value) -> TransportResult<Vec<u8>> {
        self.lock().last_payload = Some(params);
        self.take(&format!("rpc:{procedure}"))
    }

    async fn select(
        &self,
        table: &str,
        _filters: &[Filter],
        _order: Option<&str>,
        _limit: Option<u32>,
    ) -> TransportResult<Vec<u8>> {
        self.take(&format!("select:{table}"))
    }

    async fn insert(&self, table: &str, _rows: Value) -> TransportResult<Vec<u8>> {
        self.take(&format!("insert:{table}"))
    }

    async fn upsert(
        &self,
        table: &str,
        _rows: Value,
        _on_conflict: &str,
    ) -> TransportResult<Vec<u8>> {
        self.take(&format!("upsert:{table}"))
    }

    async fn update(
        &self,
        table: &str,
        _filters: &[Filter],
        patch: Value,
    ) -> TransportResult<Vec<u8>> {
        self.lock().last_payload = Some(patch);
        self.take(&format!("update:{table}"))
    }

    async fn delete(&self, table: &str, _filters: &[Filter]) -> TransportResult<()> {
        self.take(&format!("delete:{table}")).map(|_| ())
    }
}
