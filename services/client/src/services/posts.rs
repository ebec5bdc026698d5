//! services/client/src/services/posts.rs
//!
//! Feed posts: creation, the follow-scoped feed, radius discovery, and
//! author-scoped reads/deletes. Stateless façade over the gateway — the
//! post rows live for one request/response cycle and are owned by the UI
//! after that.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::gateway::RpcGateway;
use spotter_core::domain::{NewPost, Post};
use spotter_core::error::{AppError, AppResult};
use spotter_core::ports::{Filter, IdentityProvider};

const POSTS_TABLE: &str = "posts";

#[derive(Serialize)]
struct CreatePostParams<'a> {
    author_id: Uuid,
    caption: Option<&'a str>,
    image_url: Option<&'a str>,
    gym_id: Option<Uuid>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Serialize)]
struct GetFeedParams {
    viewer_id: Uuid,
    max_results: u32,
    skip: u32,
}

/// Radius is in metres; callers convert from display units themselves
/// (see `spotter_core::domain::miles_to_meters`).
#[derive(Serialize)]
struct NearbyPostsParams {
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
}

pub struct PostService {
    gateway: Arc<RpcGateway>,
    identity: Arc<dyn IdentityProvider>,
}

impl PostService {
    pub fn new(gateway: Arc<RpcGateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { gateway, identity }
    }

    async fn require_identity(&self) -> AppResult<Uuid> {
        self.identity
            .current_user_id()
            .await
            .ok_or(AppError::Unauthorized)
    }

    /// Creates a post authored by the current identity.
    pub async fn create(&self, new: NewPost) -> AppResult<Post> {
        let author_id = self.require_identity().await?;
        self.gateway
            .call(
                "create_post",
                &CreatePostParams {
                    author_id,
                    caption: new.caption.as_deref(),
                    image_url: new.image_url.as_deref(),
                    gym_id: new.gym_id,
                    latitude: new.latitude,
                    longitude: new.longitude,
                },
            )
            .await
    }

    /// The follow-scoped feed for the current identity, newest first.
    pub async fn feed(&self, limit: u32, offset: u32) -> AppResult<Vec<Post>> {
        let viewer_id = self.require_identity().await?;
        self.gateway
            .call(
                "get_feed",
                &GetFeedParams {
                    viewer_id,
                    max_results: limit,
                    skip: offset,
                },
            )
            .await
    }

    /// Posts within `radius_meters` of the given point.
    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> AppResult<Vec<Post>> {
        self.gateway
            .call(
                "get_nearby_posts",
                &NearbyPostsParams {
                    latitude,
                    longitude,
                    radius_meters,
                },
            )
            .await
    }

    /// All posts by one author, newest first.
    pub async fn by_author(&self, author_id: Uuid) -> AppResult<Vec<Post>> {
        self.gateway
            .select_rows(
                POSTS_TABLE,
                &[Filter::eq("author_id", author_id)],
                Some("created_at.desc"),
                None,
            )
            .await
    }

    /// Deletes one of the current identity's own posts. The author filter
    /// keeps the delete scoped even if the id belongs to someone else.
    pub async fn delete(&self, post_id: Uuid) -> AppResult<()> {
        let author_id = self.require_identity().await?;
        self.gateway
            .delete_rows(
                POSTS_TABLE,
                &[Filter::eq("id", post_id), Filter::eq("author_id", author_id)],
            )
            .await
    }
}
