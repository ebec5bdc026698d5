//! services/client/src/gateway.rs
//!
//! The typed gateway every service calls through. It owns the three
//! responsibilities the services share: serializing typed parameter structs,
//! decoding responses into typed models, and normalizing any failure into
//! `AppError` via the core mapping policy. Failures are logged here with the
//! operation name; logging is best-effort and never changes the outcome.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use spotter_core::error::{map_transport, AppError, AppResult};
use spotter_core::ports::{BackendTransport, Filter, TransportError};

/// Decodes a JSON response body into `T`. This is the default decode policy;
/// [`RpcGateway::call_with`] accepts a custom one for non-standard shapes.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TransportError> {
    serde_json::from_slice(bytes).map_err(|e| TransportError::Decode {
        detail: e.to_string(),
    })
}

/// Generic typed wrapper over the backend transport.
#[derive(Clone)]
pub struct RpcGateway {
    transport: Arc<dyn BackendTransport>,
}

impl RpcGateway {
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    /// Invokes the named procedure and decodes the response as JSON.
    pub async fn call<T, P>(&self, procedure: &str, params: &P) -> AppResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        self.call_with(procedure, params, decode_json).await
    }

    /// Invokes the named procedure with an explicit decode policy, for
    /// responses whose timestamp rendering the default decode cannot handle.
    pub async fn call_with<T, P, F>(&self, procedure: &str, params: &P, decode: F) -> AppResult<T>
    where
        P: Serialize + ?Sized,
        F: FnOnce(&[u8]) -> Result<T, TransportError>,
    {
        let params = self.encode(procedure, params)?;
        let bytes = self
            .transport
            .rpc(procedure, params)
            .await
            .map_err(|e| self.fail(procedure, e))?;
        decode(&bytes).map_err(|e| self.fail(procedure, e))
    }

    /// Reads rows matching `filters` and decodes them as a `Vec<T>`.
    pub async fn select_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
        limit: Option<u32>,
    ) -> AppResult<Vec<T>> {
        let bytes = self
            .transport
            .select(table, filters, order, limit)
            .await
            .map_err(|e| self.fail(table, e))?;
        decode_json(&bytes).map_err(|e| self.fail(table, e))
    }

    /// Inserts rows and decodes the returned representation.
    pub async fn insert_returning<T, R>(&self, table: &str, rows: &R) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let rows = self.encode(table, rows)?;
        let bytes = self
            .transport
            .insert(table, rows)
            .await
            .map_err(|e| self.fail(table, e))?;
        decode_json(&bytes).map_err(|e| self.fail(table, e))
    }

    /// Upserts rows on `on_conflict` and decodes the returned representation.
    pub async fn upsert_returning<T, R>(
        &self,
        table: &str,
        rows: &R,
        on_conflict: &str,
    ) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let rows = self.encode(table, rows)?;
        let bytes = self
            .transport
            .upsert(table, rows, on_conflict)
            .await
            .map_err(|e| self.fail(table, e))?;
        decode_json(&bytes).map_err(|e| self.fail(table, e))
    }

    /// Patches rows matching `filters` and decodes the updated representation.
    pub async fn update_rows<T, P>(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &P,
    ) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let patch = self.encode(table, patch)?;
        let bytes = self
            .transport
            .update(table, filters, patch)
            .await
            .map_err(|e| self.fail(table, e))?;
        decode_json(&bytes).map_err(|e| self.fail(table, e))
    }

    /// Deletes rows matching `filters`.
    pub async fn delete_rows(&self, table: &str, filters: &[Filter]) -> AppResult<()> {
        self.transport
            .delete(table, filters)
            .await
            .map_err(|e| self.fail(table, e))
    }

    fn encode<P: Serialize + ?Sized>(&self, operation: &str, payload: &P) -> AppResult<Value> {
        serde_json::to_value(payload).map_err(|e| {
            self.fail(
                operation,
                TransportError::Decode {
                    detail: format!("request payload failed to serialize: {e}"),
                },
            )
        })
    }

    fn fail(&self, operation: &str, error: TransportError) -> AppError {
        // Decode failures carry serde's field-level detail in `error`.
        warn!(operation, error = %error, "backend call failed");
        map_transport(&error)
    }
}
