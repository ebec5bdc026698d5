//! crates/spotter_core/src/ports.rs
//!
//! Defines the boundary contracts (traits) between the data-access services
//! and the outside world: the hosted backend's transport and the external
//! auth provider's identity. These traits keep the services independent of
//! reqwest and make the transport substitutable in tests.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// The raw failure shapes a transport can produce. These are the inputs to
/// the error-mapping policy in [`crate::error::map_transport`]; nothing
/// above the transport layer inspects them directly.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The request never completed: no connectivity, DNS failure, or timeout.
    #[error("connectivity failure (timeout={timeout}): {detail}")]
    Connectivity { timeout: bool, detail: String },

    /// The backend answered with a non-2xx status. `code` carries the
    /// database SQLSTATE when the error body included one.
    #[error("backend returned status {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("response decoding failed: {detail}")]
    Decode { detail: String },
}

/// A convenience alias for transport-level results.
pub type TransportResult<T> = Result<T, TransportError>;

/// An equality predicate on a named column, for table-style operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    /// Builds a `column = value` filter. Values are rendered as their
    /// unquoted wire form (UUIDs, numbers, and plain strings all stringify).
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self {
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

/// Transport to the hosted backend: named stored-procedure calls plus the
/// table-style operations that do not warrant a procedure.
///
/// Implementations return raw response bytes; typed decoding and error
/// normalization happen in the gateway so that every service shares one
/// decode-and-map path.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    /// Invokes the named stored procedure with a JSON parameter object whose
    /// keys are the procedure's exact snake_case parameter names.
    async fn rpc(&self, procedure: &str, params: Value) -> TransportResult<Vec<u8>>;

    /// Reads rows matching all `filters`, optionally ordered and capped.
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
        limit: Option<u32>,
    ) -> TransportResult<Vec<u8>>;

    /// Inserts `rows` (a JSON object or array of objects), returning the
    /// inserted representation.
    async fn insert(&self, table: &str, rows: Value) -> TransportResult<Vec<u8>>;

    /// Inserts `rows`, merging into the existing row on `on_conflict`
    /// collisions, returning the resulting representation.
    async fn upsert(&self, table: &str, rows: Value, on_conflict: &str)
        -> TransportResult<Vec<u8>>;

    /// Applies `patch` to all rows matching `filters`, returning the updated
    /// representation.
    async fn update(&self, table: &str, filters: &[Filter], patch: Value)
        -> TransportResult<Vec<u8>>;

    /// Deletes all rows matching `filters`.
    async fn delete(&self, table: &str, filters: &[Filter]) -> TransportResult<()>;
}

/// Read-only view of the external auth provider's session.
///
/// The provider owns credential storage and rotation; this layer only ever
/// asks "who is signed in right now". Identity-scoped operations fail with
/// `AppError::Unauthorized` before any network call when this returns `None`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user_id(&self) -> Option<Uuid>;
}
