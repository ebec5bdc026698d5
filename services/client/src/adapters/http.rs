//! services/client/src/adapters/http.rs
//!
//! The reqwest-backed implementation of the `BackendTransport` port. This
//! adapter owns transport details only: endpoint construction, auth headers,
//! HTTP error extraction, and handing raw bytes back to the gateway. It never
//! decodes domain types and never classifies errors beyond the raw
//! `TransportError` shapes.

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::adapters::session::SharedSession;
use crate::config::Config;
use spotter_core::ports::{BackendTransport, Filter, TransportError, TransportResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The error body the backend's REST layer returns on failure. `code`
/// carries the database SQLSTATE when the failure originated in a constraint.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Transport adapter for the hosted backend's REST surface.
///
/// Stored procedures go to `POST {base}/rest/v1/rpc/{name}`; table-style
/// operations target `{base}/rest/v1/{table}` with `col=eq.value` filters.
pub struct HttpBackend {
    client: Client,
    rest_root: Url,
    anon_key: String,
    session: Arc<SharedSession>,
}

impl HttpBackend {
    /// Builds the adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// configured base URL cannot host the REST path.
    pub fn new(config: &Config, session: Arc<SharedSession>) -> Result<Self, crate::ClientError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let rest_root = config
            .backend_url
            .join("rest/v1/")
            .map_err(|e| crate::ClientError::Config(crate::config::ConfigError::InvalidValue(
                "SPOTTER_BACKEND_URL".to_string(),
                e.to_string(),
            )))?;
        Ok(Self {
            client,
            rest_root,
            anon_key: config.anon_key.clone(),
            session,
        })
    }

    fn endpoint(&self, path: &str) -> TransportResult<Url> {
        self.rest_root.join(path).map_err(|e| TransportError::Decode {
            detail: format!("invalid request URL '{path}': {e}"),
        })
    }

    /// Applies the API key and bearer credentials. Signed-out requests fall
    /// back to the anonymous key as the bearer, matching the backend's
    /// anonymous-role convention.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .session
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone());
        request
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(bearer)
    }

    fn apply_filters(url: &mut Url, filters: &[Filter]) {
        let mut pairs = url.query_pairs_mut();
        for filter in filters {
            pairs.append_pair(&filter.column, &format!("eq.{}", filter.value));
        }
    }

    async fn execute(&self, request: RequestBuilder) -> TransportResult<Vec<u8>> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            return Ok(body.to_vec());
        }
        Err(extract_status_error(status, response).await)
    }
}

/// Converts a reqwest failure into the raw connectivity shape. Timeouts and
/// connection failures both count as "the request never completed".
pub(crate) fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    TransportError::Connectivity {
        timeout: error.is_timeout(),
        detail: error.to_string(),
    }
}

/// Reads a non-2xx response into `TransportError::Status`, pulling the
/// SQLSTATE out of the error body when the backend supplied one.
pub(crate) async fn extract_status_error(status: StatusCode, response: Response) -> TransportError {
    let body = response.bytes().await.unwrap_or_default();
    let parsed: Option<BackendErrorBody> = serde_json::from_slice(&body).ok();
    let (code, message) = match parsed {
        Some(parsed) => (
            parsed.code,
            parsed
                .message
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned()),
        ),
        None => (None, String::from_utf8_lossy(&body).into_owned()),
    };
    TransportError::Status {
        status: status.as_u16(),
        code,
        message,
    }
}

#[async_trait]
impl BackendTransport for HttpBackend {
    async fn rpc(&self, procedure: &str, params: Value) -> TransportResult<Vec<u8>> {
        let url = self.endpoint(&format!("rpc/{procedure}"))?;
        let request = self
            .authorize(self.client.post(url))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&params);
        self.execute(request).await
    }

    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
        limit: Option<u32>,
    ) -> TransportResult<Vec<u8>> {
        let mut url = self.endpoint(table)?;
        Self::apply_filters(&mut url, filters);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if let Some(order) = order {
                pairs.append_pair("order", order);
            }
            if let Some(limit) = limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        self.execute(self.authorize(self.client.get(url))).await
    }

    async fn insert(&self, table: &str, rows: Value) -> TransportResult<Vec<u8>> {
        let url = self.endpoint(table)?;
        let request = self
            .authorize(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(&rows);
        self.execute(request).await
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Value,
        on_conflict: &str,
    ) -> TransportResult<Vec<u8>> {
        let mut url = self.endpoint(table)?;
        url.query_pairs_mut().append_pair("on_conflict", on_conflict);
        let request = self
            .authorize(self.client.post(url))
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .json(&rows);
        self.execute(request).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> TransportResult<Vec<u8>> {
        let mut url = self.endpoint(table)?;
        Self::apply_filters(&mut url, filters);
        let request = self
            .authorize(self.client.patch(url))
            .header("Prefer", "return=representation")
            .json(&patch);
        self.execute(request).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> TransportResult<()> {
        let mut url = self.endpoint(table)?;
        Self::apply_filters(&mut url, filters);
        self.execute(self.authorize(self.client.delete(url)))
            .await
            .map(|_| ())
    }
}
