//! crates/spotter_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! Field names are part of the backend wire contract: every struct here
//! serializes with the exact snake_case column/parameter names the backend
//! declares, so the serde shape is the contract, not an implementation detail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamps;

/// Metres per statute mile.
///
/// Radius-based RPCs take metres; UI surfaces work in miles. The conversion
/// belongs at the call site, never inside the gateway.
pub const METERS_PER_MILE: f64 = 1609.344;

/// Converts a radius in miles to the metres the backend expects.
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

//=========================================================================================
// Profiles
//=========================================================================================

/// A user profile row, keyed by the auth provider's user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Immutable primary key; equals the owning identity's UUID.
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all profiles; mutable.
    pub username: String,
    pub bio: Option<String>,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: Option<String>,
    /// Free-text location label chosen by the user.
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avatar_url: Option<String>,
    #[serde(with = "timestamps::flexible")]
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

impl UserProfile {
    /// The display name used in search and feed surfaces.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The field set supplied when a profile is first created at the end of
/// onboarding. The row id and creation timestamp are assigned elsewhere:
/// the id comes from the current identity, the timestamp from the backend.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub bio: Option<String>,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avatar_url: Option<String>,
    pub is_public: bool,
}

/// A partial profile update. `None` fields are omitted from the payload
/// entirely, so the backend leaves them untouched; this is deliberately
/// different from RPC parameters, where absent values must be explicit nulls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl ProfilePatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().map(|o| o.is_empty()).unwrap_or(true))
            .unwrap_or(true)
    }
}

//=========================================================================================
// Posts, comments, likes
//=========================================================================================

/// A feed post as returned by the post RPCs. Counts are computed
/// server-side and default to zero on table reads that do not join them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub caption: Option<String>,
    pub image_url: Option<String>,
    /// Gym the post is tagged with, when any.
    pub gym_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(with = "timestamps::flexible")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub comment_count: i64,
}

/// The caller-supplied half of a new post; author id and timestamps are
/// filled in by the service and the backend respectively.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPost {
    pub caption: Option<String>,
    pub image_url: Option<String>,
    pub gym_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    #[serde(with = "timestamps::flexible")]
    pub created_at: DateTime<Utc>,
}

/// A like relation row. Pure join table; no surrogate key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeRow {
    pub post_id: Uuid,
    pub user_id: Uuid,
}

//=========================================================================================
// Follows
//=========================================================================================

/// A follow relation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowRow {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
}

//=========================================================================================
// Gyms and memberships
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gym {
    pub id: Uuid,
    pub name: String,
    /// Street address; doubles as the real-world dedup key for upserts.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A gym candidate sourced from an external lookup, prior to insertion.
/// Repeated submission of the same gym converges to one row because the
/// insert upserts on `address`.
#[derive(Debug, Clone, Serialize)]
pub struct NewGym {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The signed-in user's gym membership. One active membership per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymMembership {
    pub user_id: Uuid,
    pub gym_id: Uuid,
    #[serde(with = "timestamps::flexible")]
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            first_name: "Nate".into(),
            last_name: "Ruiz".into(),
            username: "nate_lifts".into(),
            bio: None,
            email: "nate@example.com".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1996, 7, 4).unwrap(),
            phone_number: None,
            location: Some("Austin, TX".into()),
            latitude: Some(30.2672),
            longitude: Some(-97.7431),
            avatar_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            is_public: true,
        }
    }

    #[test]
    fn profile_round_trips_with_snake_case_wire_names() {
        let profile = sample_profile();
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["first_name"], "Nate");
        assert_eq!(value["date_of_birth"], "1996-07-04");
        // Absent optionals serialize as explicit nulls, not omissions.
        assert!(value.as_object().unwrap().contains_key("bio"));
        assert!(value["bio"].is_null());

        let back: UserProfile = serde_json::from_value(value).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn profile_decodes_whole_second_timestamps() {
        let mut value = serde_json::to_value(sample_profile()).unwrap();
        value["created_at"] = serde_json::json!("2024-03-01T09:30:00Z");
        let decoded: UserProfile = serde_json::from_value(value).unwrap();
        assert_eq!(
            decoded.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn patch_omits_unset_fields() {
        let patch = ProfilePatch {
            first_name: Some("Zoe".into()),
            ..ProfilePatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["first_name"], "Zoe");
        assert!(ProfilePatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_covers_every_mutable_profile_field() {
        // The partial and full update paths agree on what is mutable:
        // everything except id and created_at.
        let patch = ProfilePatch {
            first_name: Some("Zoe".into()),
            last_name: Some("Park".into()),
            username: Some("zoe_lifts".into()),
            bio: Some("coach".into()),
            email: Some("zoe@example.com".into()),
            date_of_birth: NaiveDate::from_ymd_opt(1992, 11, 3),
            phone_number: Some("+15550100".into()),
            location: Some("Austin, TX".into()),
            latitude: Some(30.2672),
            longitude: Some(-97.7431),
            avatar_url: Some("https://cdn.example.co/z.jpg".into()),
            is_public: Some(false),
        };
        let value = serde_json::to_value(&patch).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["email"], "zoe@example.com");
        assert_eq!(object["date_of_birth"], "1992-11-03");
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("created_at"));
        assert_eq!(object.len(), 12);
    }

    #[test]
    fn miles_convert_to_meters() {
        assert_eq!(miles_to_meters(1.0), 1609.344);
        assert_eq!(miles_to_meters(0.0), 0.0);
    }

    #[test]
    fn full_name_joins_first_and_last() {
        assert_eq!(sample_profile().full_name(), "Nate Ruiz");
    }
}
