//! services/client/src/container.rs
//!
//! The composition root. Constructed once at process start from `Config`
//! and passed down by reference to every consumer — there is no hidden
//! global state. One HTTP backend, one gateway, one session cell, and one
//! shared instance of each service for the app's lifetime.

use std::sync::Arc;

use crate::adapters::{HttpBackend, SharedSession, UploadProxyClient};
use crate::config::Config;
use crate::error::ClientError;
use crate::gateway::RpcGateway;
use crate::services::{
    CommentService, FollowService, GymMembershipService, GymService, LikeService, PostService,
    ProfileService, StorageService,
};
use spotter_core::ports::IdentityProvider;

pub struct ServiceContainer {
    pub config: Arc<Config>,
    pub session: Arc<SharedSession>,
    pub profiles: Arc<ProfileService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub likes: Arc<LikeService>,
    pub follows: Arc<FollowService>,
    pub gyms: Arc<GymService>,
    pub memberships: Arc<GymMembershipService>,
    pub storage: Arc<StorageService>,
}

impl ServiceContainer {
    /// Wires the whole layer up against the real HTTP backend.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let config = Arc::new(config);
        let session = Arc::new(SharedSession::new());
        let backend = Arc::new(HttpBackend::new(&config, session.clone())?);
        let proxy = Arc::new(UploadProxyClient::new(&config)?);
        let gateway = Arc::new(RpcGateway::new(backend));
        let identity: Arc<dyn IdentityProvider> = session.clone();

        Ok(Self {
            profiles: Arc::new(ProfileService::new(gateway.clone(), identity.clone())),
            posts: Arc::new(PostService::new(gateway.clone(), identity.clone())),
            comments: Arc::new(CommentService::new(gateway.clone(), identity.clone())),
            likes: Arc::new(LikeService::new(gateway.clone(), identity.clone())),
            follows: Arc::new(FollowService::new(gateway.clone(), identity.clone())),
            gyms: Arc::new(GymService::new(gateway.clone())),
            memberships: Arc::new(GymMembershipService::new(gateway, identity.clone())),
            storage: Arc::new(StorageService::new(proxy, identity)),
            config,
            session,
        })
    }

    /// Loads configuration from the environment and wires the layer up.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(Config::from_env()?)
    }

    /// Ends the session and drops the cached profile. The next
    /// identity-scoped call fails with `Unauthorized` until the auth
    /// provider installs new credentials.
    pub fn sign_out(&self) {
        self.session.end();
        self.profiles.clear_cache();
    }
}
