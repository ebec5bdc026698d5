//! services/client/src/services/likes.rs
//!
//! Post likes: a pure relation table. The silent variants exist for
//! optimistic UI toggles — the tap already flipped the heart, so a failure
//! here is logged and swallowed rather than propagated. That is a named,
//! bounded exception to the error-propagation rule, not a general policy.

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::gateway::RpcGateway;
use spotter_core::domain::LikeRow;
use spotter_core::error::{AppError, AppResult};
use spotter_core::ports::{Filter, IdentityProvider};

const LIKES_TABLE: &str = "post_likes";

#[derive(Serialize)]
struct NewLikeRow {
    post_id: Uuid,
    user_id: Uuid,
}

pub struct LikeService {
    gateway: Arc<RpcGateway>,
    identity: Arc<dyn IdentityProvider>,
}

impl LikeService {
    pub fn new(gateway: Arc<RpcGateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { gateway, identity }
    }

    async fn require_identity(&self) -> AppResult<Uuid> {
        self.identity
            .current_user_id()
            .await
            .ok_or(AppError::Unauthorized)
    }

    pub async fn like(&self, post_id: Uuid) -> AppResult<()> {
        let user_id = self.require_identity().await?;
        let _: Vec<LikeRow> = self
            .gateway
            .insert_returning(LIKES_TABLE, &NewLikeRow { post_id, user_id })
            .await?;
        Ok(())
    }

    pub async fn unlike(&self, post_id: Uuid) -> AppResult<()> {
        let user_id = self.require_identity().await?;
        self.gateway
            .delete_rows(
                LIKES_TABLE,
                &[Filter::eq("post_id", post_id), Filter::eq("user_id", user_id)],
            )
            .await
    }

    /// Fire-and-forget like for optimistic UI. Errors are logged, not
    /// returned; recovery UX is the caller's concern.
    pub async fn like_silently(&self, post_id: Uuid) {
        if let Err(error) = self.like(post_id).await {
            warn!(%post_id, %error, "optimistic like failed");
        }
    }

    /// Fire-and-forget unlike. Same policy as [`Self::like_silently`].
    pub async fn unlike_silently(&self, post_id: Uuid) {
        if let Err(error) = self.unlike(post_id).await {
            warn!(%post_id, %error, "optimistic unlike failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, FakeIdentity};
    use serde_json::json;
    use spotter_core::ports::TransportError;

    #[tokio::test]
    async fn like_requires_identity() {
        let backend = FakeBackend::new();
        let likes = LikeService::new(
            Arc::new(RpcGateway::new(backend.clone())),
            FakeIdentity::signed_out(),
        );
        assert_eq!(likes.like(Uuid::new_v4()).await, Err(AppError::Unauthorized));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn silent_variants_swallow_failures() {
        let backend = FakeBackend::new();
        backend.enqueue_err(
            "insert:post_likes",
            TransportError::Connectivity {
                timeout: false,
                detail: "offline".into(),
            },
        );
        let likes = LikeService::new(
            Arc::new(RpcGateway::new(backend.clone())),
            FakeIdentity::signed_in(Uuid::new_v4()),
        );

        // Does not panic and does not propagate the failure.
        likes.like_silently(Uuid::new_v4()).await;
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn like_inserts_the_relation_row() {
        let backend = FakeBackend::new();
        let user = Uuid::new_v4();
        let post = Uuid::new_v4();
        backend.enqueue_ok(
            "insert:post_likes",
            json!([{ "post_id": post, "user_id": user }]),
        );
        let likes = LikeService::new(
            Arc::new(RpcGateway::new(backend.clone())),
            FakeIdentity::signed_in(user),
        );

        likes.like(post).await.unwrap();
        assert_eq!(backend.calls(), vec!["insert:post_likes".to_string()]);
    }
}
