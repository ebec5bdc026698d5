pub mod comments;
pub mod follows;
pub mod gyms;
pub mod likes;
pub mod memberships;
pub mod posts;
pub mod profile;
pub mod storage;

pub use comments::CommentService;
pub use follows::FollowService;
pub use gyms::GymService;
pub use likes::LikeService;
pub use memberships::GymMembershipService;
pub use posts::PostService;
pub use profile::ProfileService;
pub use storage::StorageService;
