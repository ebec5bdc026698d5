//! services/client/src/adapters/session.rs
//!
//! The shared session cell. The external auth provider owns sign-in,
//! refresh, and credential storage; whenever its session changes it pushes
//! the new credentials here. Everything in this crate reads identity from
//! this one place and never persists or rotates credentials itself.

use async_trait::async_trait;
use std::sync::RwLock;
use uuid::Uuid;

use spotter_core::ports::IdentityProvider;

/// The credentials the auth provider hands over after sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub user_id: Uuid,
    /// Bearer token sent on authenticated backend requests.
    pub access_token: String,
}

/// Process-wide session cell shared by the transport and every service.
#[derive(Debug, Default)]
pub struct SharedSession {
    inner: RwLock<Option<SessionCredentials>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the credentials for a freshly signed-in user.
    pub fn begin(&self, credentials: SessionCredentials) {
        *self.write() = Some(credentials);
    }

    /// Drops the credentials on sign-out.
    pub fn end(&self) {
        *self.write() = None;
    }

    /// The current bearer token, when signed in.
    pub fn access_token(&self) -> Option<String> {
        self.read().as_ref().map(|c| c.access_token.clone())
    }

    /// The current user id, when signed in.
    pub fn user_id(&self) -> Option<Uuid> {
        self.read().as_ref().map(|c| c.user_id)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<SessionCredentials>> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<SessionCredentials>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SharedSession {
    async fn current_user_id(&self) -> Option<Uuid> {
        self.user_id()
    }
}
