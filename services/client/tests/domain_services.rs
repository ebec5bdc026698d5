//! Cross-service exercises of the shared request/response/error-mapping
//! pattern: every service speaks through the same gateway, so a failure
//! anywhere arrives at the caller as one of the seven application error
//! kinds, never a raw transport shape.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use spotter_client::gateway::RpcGateway;
use spotter_client::services::{FollowService, GymService, LikeService, PostService};
use spotter_client::test_support::{FakeBackend, FakeIdentity};
use spotter_core::domain::{miles_to_meters, NewGym, NewPost};
use spotter_core::error::AppError;
use spotter_core::ports::TransportError;

fn gateway(backend: &Arc<FakeBackend>) -> Arc<RpcGateway> {
    Arc::new(RpcGateway::new(backend.clone()))
}

#[tokio::test]
async fn every_identity_scoped_service_guards_before_the_network() {
    let backend = FakeBackend::new();
    let gw = gateway(&backend);
    let signed_out = FakeIdentity::signed_out();

    let posts = PostService::new(gw.clone(), signed_out.clone());
    let likes = LikeService::new(gw.clone(), signed_out.clone());
    let follows = FollowService::new(gw, signed_out);

    assert_eq!(
        posts.create(NewPost::default()).await,
        Err(AppError::Unauthorized)
    );
    assert_eq!(posts.feed(10, 0).await, Err(AppError::Unauthorized));
    assert_eq!(likes.like(Uuid::new_v4()).await, Err(AppError::Unauthorized));
    assert_eq!(
        follows.follow(Uuid::new_v4()).await,
        Err(AppError::Unauthorized)
    );
    assert_eq!(backend.call_count(), 0);
}

#[rstest::rstest]
#[case::server_error(503, AppError::ServerError)]
#[case::expired_token(401, AppError::Unauthorized)]
#[case::missing_procedure(404, AppError::NotFound)]
#[tokio::test]
async fn feed_failures_arrive_as_mapped_kinds(#[case] status: u16, #[case] expected: AppError) {
    let backend = FakeBackend::new();
    let posts = PostService::new(gateway(&backend), FakeIdentity::signed_in(Uuid::new_v4()));

    backend.enqueue_err(
        "rpc:get_feed",
        TransportError::Status {
            status,
            code: None,
            message: "backend refused the call".into(),
        },
    );
    assert_eq!(posts.feed(10, 0).await, Err(expected));
}

#[tokio::test]
async fn nearby_radius_is_converted_at_the_call_site() {
    let backend = FakeBackend::new();
    backend.enqueue_ok("rpc:get_nearby_gyms", json!([]));
    let gyms = GymService::new(gateway(&backend));

    // 5 display miles become metres before the parameter struct is built.
    gyms.nearby(30.0, -97.0, miles_to_meters(5.0)).await.unwrap();
    let params = backend.last_payload().unwrap();
    assert_eq!(params["radius_meters"], json!(8046.72));
}

#[tokio::test]
async fn duplicate_follow_maps_to_conflict() {
    let backend = FakeBackend::new();
    backend.enqueue_err(
        "insert:follows",
        TransportError::Status {
            status: 409,
            code: Some("23505".into()),
            message: "duplicate key".into(),
        },
    );
    let follows = FollowService::new(gateway(&backend), FakeIdentity::signed_in(Uuid::new_v4()));

    assert_eq!(
        follows.follow(Uuid::new_v4()).await,
        Err(AppError::Conflict)
    );
}

#[tokio::test]
async fn liking_a_deleted_post_maps_to_validation_failed() {
    let backend = FakeBackend::new();
    // The relation insert trips the post_id foreign key.
    backend.enqueue_err(
        "insert:post_likes",
        TransportError::Status {
            status: 409,
            code: Some("23503".into()),
            message: "violates foreign key constraint".into(),
        },
    );
    let likes = LikeService::new(gateway(&backend), FakeIdentity::signed_in(Uuid::new_v4()));

    assert_eq!(
        likes.like(Uuid::new_v4()).await,
        Err(AppError::ValidationFailed(Some("Missing related item".into())))
    );
}

#[tokio::test]
async fn resubmitting_the_same_gym_converges_to_one_row() {
    let backend = FakeBackend::new();
    let gym_id = Uuid::new_v4();
    let row = json!([{
        "id": gym_id,
        "name": "Iron Temple",
        "address": "500 Congress Ave",
        "latitude": 30.2672,
        "longitude": -97.7431
    }]);
    backend.enqueue_ok("upsert:gyms", row.clone());
    backend.enqueue_ok("upsert:gyms", row);
    let gyms = GymService::new(gateway(&backend));

    let candidate = NewGym {
        name: "Iron Temple".into(),
        address: "500 Congress Ave".into(),
        latitude: 30.2672,
        longitude: -97.7431,
    };
    let first = gyms.insert_gyms(vec![candidate.clone()]).await.unwrap();
    let second = gyms.insert_gyms(vec![candidate]).await.unwrap();
    assert_eq!(first[0].id, second[0].id);
}
