//! services/client/src/services/comments.rs
//!
//! Comments on posts. Table-style operations only; none of these warrant a
//! stored procedure.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::gateway::RpcGateway;
use spotter_core::domain::Comment;
use spotter_core::error::{AppError, AppResult};
use spotter_core::ports::{Filter, IdentityProvider};

const COMMENTS_TABLE: &str = "comments";

#[derive(Serialize)]
struct NewCommentRow<'a> {
    post_id: Uuid,
    author_id: Uuid,
    body: &'a str,
}

pub struct CommentService {
    gateway: Arc<RpcGateway>,
    identity: Arc<dyn IdentityProvider>,
}

impl CommentService {
    pub fn new(gateway: Arc<RpcGateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { gateway, identity }
    }

    async fn require_identity(&self) -> AppResult<Uuid> {
        self.identity
            .current_user_id()
            .await
            .ok_or(AppError::Unauthorized)
    }

    /// Adds a comment authored by the current identity.
    pub async fn add(&self, post_id: Uuid, body: &str) -> AppResult<Comment> {
        let author_id = self.require_identity().await?;
        self.gateway
            .insert_returning(
                COMMENTS_TABLE,
                &NewCommentRow {
                    post_id,
                    author_id,
                    body,
                },
            )
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::Unexpected)
    }

    /// All comments on a post, oldest first.
    pub async fn for_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>> {
        self.gateway
            .select_rows(
                COMMENTS_TABLE,
                &[Filter::eq("post_id", post_id)],
                Some("created_at.asc"),
                None,
            )
            .await
    }

    /// Deletes one of the current identity's own comments.
    pub async fn delete(&self, comment_id: Uuid) -> AppResult<()> {
        let author_id = self.require_identity().await?;
        self.gateway
            .delete_rows(
                COMMENTS_TABLE,
                &[
                    Filter::eq("id", comment_id),
                    Filter::eq("author_id", author_id),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, FakeIdentity};
    use serde_json::json;

    #[tokio::test]
    async fn add_fails_fast_without_identity() {
        let backend = FakeBackend::new();
        let comments = CommentService::new(
            Arc::new(RpcGateway::new(backend.clone())),
            FakeIdentity::signed_out(),
        );
        assert_eq!(
            comments.add(Uuid::new_v4(), "nice lift").await,
            Err(AppError::Unauthorized)
        );
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn add_returns_the_inserted_row() {
        let backend = FakeBackend::new();
        let user = Uuid::new_v4();
        let post = Uuid::new_v4();
        backend.enqueue_ok(
            "insert:comments",
            json!([{
                "id": Uuid::new_v4(),
                "post_id": post,
                "author_id": user,
                "body": "nice lift",
                "created_at": "2024-03-01T09:30:00.123456Z"
            }]),
        );
        let comments = CommentService::new(
            Arc::new(RpcGateway::new(backend)),
            FakeIdentity::signed_in(user),
        );

        let comment = comments.add(post, "nice lift").await.unwrap();
        assert_eq!(comment.body, "nice lift");
        assert_eq!(comment.post_id, post);
    }
}
