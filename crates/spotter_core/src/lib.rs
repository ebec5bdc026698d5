pub mod domain;
pub mod error;
pub mod ports;
pub mod timestamps;

pub use domain::{
    Comment, FollowRow, Gym, GymMembership, LikeRow, NewGym, NewPost, NewProfile, Post,
    ProfilePatch, UserProfile,
};
pub use error::{map_transport, AppError, AppResult, ErrorPresentation};
pub use ports::{BackendTransport, Filter, IdentityProvider, TransportError, TransportResult};
