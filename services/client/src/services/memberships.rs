//! services/client/src/services/memberships.rs
//!
//! Gym membership verification. One active membership per user, so joining
//! upserts on `user_id`: switching gyms replaces the row rather than
//! accumulating memberships.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::gateway::RpcGateway;
use spotter_core::domain::GymMembership;
use spotter_core::error::{AppError, AppResult};
use spotter_core::ports::{Filter, IdentityProvider};

const MEMBERSHIPS_TABLE: &str = "gym_memberships";

#[derive(Serialize)]
struct NewMembershipRow {
    user_id: Uuid,
    gym_id: Uuid,
}

pub struct GymMembershipService {
    gateway: Arc<RpcGateway>,
    identity: Arc<dyn IdentityProvider>,
}

impl GymMembershipService {
    pub fn new(gateway: Arc<RpcGateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { gateway, identity }
    }

    async fn require_identity(&self) -> AppResult<Uuid> {
        self.identity
            .current_user_id()
            .await
            .ok_or(AppError::Unauthorized)
    }

    /// Records the current identity as a member of `gym_id`.
    pub async fn join(&self, gym_id: Uuid) -> AppResult<GymMembership> {
        let user_id = self.require_identity().await?;
        self.gateway
            .upsert_returning(
                MEMBERSHIPS_TABLE,
                &NewMembershipRow { user_id, gym_id },
                "user_id",
            )
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::Unexpected)
    }

    /// The current identity's membership, when one exists.
    pub async fn current(&self) -> AppResult<Option<GymMembership>> {
        let user_id = self.require_identity().await?;
        let rows: Vec<GymMembership> = self
            .gateway
            .select_rows(
                MEMBERSHIPS_TABLE,
                &[Filter::eq("user_id", user_id)],
                None,
                Some(1),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Ends the current identity's membership.
    pub async fn leave(&self) -> AppResult<()> {
        let user_id = self.require_identity().await?;
        self.gateway
            .delete_rows(MEMBERSHIPS_TABLE, &[Filter::eq("user_id", user_id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, FakeIdentity};
    use serde_json::json;

    #[tokio::test]
    async fn current_is_none_when_no_membership_exists() {
        let backend = FakeBackend::new();
        backend.enqueue_ok("select:gym_memberships", json!([]));
        let memberships = GymMembershipService::new(
            Arc::new(RpcGateway::new(backend)),
            FakeIdentity::signed_in(Uuid::new_v4()),
        );
        assert_eq!(memberships.current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn join_requires_identity() {
        let backend = FakeBackend::new();
        let memberships = GymMembershipService::new(
            Arc::new(RpcGateway::new(backend.clone())),
            FakeIdentity::signed_out(),
        );
        assert_eq!(
            memberships.join(Uuid::new_v4()).await,
            Err(AppError::Unauthorized)
        );
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn join_upserts_and_returns_the_membership() {
        let backend = FakeBackend::new();
        let user = Uuid::new_v4();
        let gym = Uuid::new_v4();
        backend.enqueue_ok(
            "upsert:gym_memberships",
            json!([{
                "user_id": user,
                "gym_id": gym,
                "joined_at": "2024-03-01T09:30:00Z"
            }]),
        );
        let memberships = GymMembershipService::new(
            Arc::new(RpcGateway::new(backend)),
            FakeIdentity::signed_in(user),
        );

        let membership = memberships.join(gym).await.unwrap();
        assert_eq!(membership.gym_id, gym);
    }
}
