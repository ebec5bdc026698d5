//! services/client/src/services/follows.rs
//!
//! The follow graph: relation-row writes plus the follower/following list
//! procedures. Follow/unfollow get silent variants for the same optimistic
//! UI reason as likes.

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::gateway::RpcGateway;
use spotter_core::domain::{FollowRow, UserProfile};
use spotter_core::error::{AppError, AppResult};
use spotter_core::ports::{Filter, IdentityProvider};

const FOLLOWS_TABLE: &str = "follows";

#[derive(Serialize)]
struct NewFollowRow {
    follower_id: Uuid,
    followee_id: Uuid,
}

#[derive(Serialize)]
struct FollowListParams {
    target_id: Uuid,
    max_results: u32,
}

pub struct FollowService {
    gateway: Arc<RpcGateway>,
    identity: Arc<dyn IdentityProvider>,
}

impl FollowService {
    pub fn new(gateway: Arc<RpcGateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { gateway, identity }
    }

    async fn require_identity(&self) -> AppResult<Uuid> {
        self.identity
            .current_user_id()
            .await
            .ok_or(AppError::Unauthorized)
    }

    /// Follows `followee_id` as the current identity. A repeat follow
    /// collides with the relation's primary key and surfaces as `Conflict`.
    pub async fn follow(&self, followee_id: Uuid) -> AppResult<()> {
        let follower_id = self.require_identity().await?;
        let _: Vec<FollowRow> = self
            .gateway
            .insert_returning(
                FOLLOWS_TABLE,
                &NewFollowRow {
                    follower_id,
                    followee_id,
                },
            )
            .await?;
        Ok(())
    }

    pub async fn unfollow(&self, followee_id: Uuid) -> AppResult<()> {
        let follower_id = self.require_identity().await?;
        self.gateway
            .delete_rows(
                FOLLOWS_TABLE,
                &[
                    Filter::eq("follower_id", follower_id),
                    Filter::eq("followee_id", followee_id),
                ],
            )
            .await
    }

    /// Fire-and-forget follow for optimistic UI; errors are logged only.
    pub async fn follow_silently(&self, followee_id: Uuid) {
        if let Err(error) = self.follow(followee_id).await {
            warn!(%followee_id, %error, "optimistic follow failed");
        }
    }

    /// Fire-and-forget unfollow; errors are logged only.
    pub async fn unfollow_silently(&self, followee_id: Uuid) {
        if let Err(error) = self.unfollow(followee_id).await {
            warn!(%followee_id, %error, "optimistic unfollow failed");
        }
    }

    /// Profiles following `target_id`.
    pub async fn followers(&self, target_id: Uuid, limit: u32) -> AppResult<Vec<UserProfile>> {
        self.gateway
            .call(
                "get_followers",
                &FollowListParams {
                    target_id,
                    max_results: limit,
                },
            )
            .await
    }

    /// Profiles `target_id` follows.
    pub async fn following(&self, target_id: Uuid, limit: u32) -> AppResult<Vec<UserProfile>> {
        self.gateway
            .call(
                "get_following",
                &FollowListParams {
                    target_id,
                    max_results: limit,
                },
            )
            .await
    }

    /// Whether the current identity follows `followee_id`.
    pub async fn is_following(&self, followee_id: Uuid) -> AppResult<bool> {
        let follower_id = self.require_identity().await?;
        let rows: Vec<FollowRow> = self
            .gateway
            .select_rows(
                FOLLOWS_TABLE,
                &[
                    Filter::eq("follower_id", follower_id),
                    Filter::eq("followee_id", followee_id),
                ],
                None,
                Some(1),
            )
            .await?;
        Ok(!rows.is_empty())
    }
}
