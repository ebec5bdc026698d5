//! services/client/src/services/profile.rs
//!
//! Owns the current user's profile lifecycle: creation at onboarding,
//! reads by id and by "mine", search, partial and full updates, and the
//! username availability probe. "My profile" reads are collapsed through
//! the single-entry cache so independent UI surfaces share one network
//! round trip per explicit refresh.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::cache::SingleEntryCache;
use crate::gateway::RpcGateway;
use spotter_core::domain::{NewProfile, ProfilePatch, UserProfile};
use spotter_core::error::{AppError, AppResult};
use spotter_core::ports::{Filter, IdentityProvider};

const PROFILES_TABLE: &str = "profiles";

/// How long to wait after a partial update before re-reading the row.
/// The backend acknowledges writes before replicas serve them, so an
/// immediate re-fetch can return the pre-update row. This delay is a
/// workaround for that read-after-write lag, not a retry.
const SETTLE_DELAY: Duration = Duration::from_millis(250);

//=========================================================================================
// Request payload types
//=========================================================================================

/// Insert payload: the onboarding field set plus the row id, which is
/// always the current identity's UUID.
#[derive(Serialize)]
struct ProfileRow<'a> {
    id: Uuid,
    #[serde(flatten)]
    fields: &'a NewProfile,
}

/// Parameters for the `search_profiles` procedure. Names match the
/// procedure's declared arguments exactly.
#[derive(Serialize)]
struct SearchProfilesParams<'a> {
    search_text: &'a str,
    max_results: u32,
}

/// Full-update payload: every mutable column. The id and creation
/// timestamp never change after insert and are deliberately absent.
#[derive(Serialize)]
struct FullProfileUpdate<'a> {
    first_name: &'a str,
    last_name: &'a str,
    username: &'a str,
    bio: Option<&'a str>,
    email: &'a str,
    date_of_birth: chrono::NaiveDate,
    phone_number: Option<&'a str>,
    location: Option<&'a str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    avatar_url: Option<&'a str>,
    is_public: bool,
}

#[derive(Deserialize)]
struct UsernameRow {
    #[allow(dead_code)]
    username: String,
}

//=========================================================================================
// The service
//=========================================================================================

pub struct ProfileService {
    gateway: Arc<RpcGateway>,
    identity: Arc<dyn IdentityProvider>,
    cache: SingleEntryCache<Uuid, UserProfile>,
}

impl ProfileService {
    pub fn new(gateway: Arc<RpcGateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            gateway,
            identity,
            cache: SingleEntryCache::new(),
        }
    }

    async fn require_identity(&self) -> AppResult<Uuid> {
        self.identity
            .current_user_id()
            .await
            .ok_or(AppError::Unauthorized)
    }

    /// Inserts a new profile row keyed by the current identity.
    ///
    /// A second create for the same identity collides with the primary key
    /// and surfaces as `Conflict`; malformed input surfaces as
    /// `ValidationFailed` via the backend's check constraints.
    pub async fn create(&self, fields: NewProfile) -> AppResult<UserProfile> {
        let user_id = self.require_identity().await?;
        let row = ProfileRow {
            id: user_id,
            fields: &fields,
        };
        self.gateway
            .insert_returning(PROFILES_TABLE, &row)
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::Unexpected)
    }

    /// Unconditional remote fetch of exactly one profile.
    pub async fn fetch_by_id(&self, id: Uuid) -> AppResult<UserProfile> {
        let rows: Vec<UserProfile> = self
            .gateway
            .select_rows(PROFILES_TABLE, &[Filter::eq("id", id)], None, Some(1))
            .await?;
        rows.into_iter().next().ok_or(AppError::NotFound)
    }

    /// Returns the current user's profile, served from the cache unless
    /// `refresh` forces a round trip. On a miss the fetched row is stored
    /// keyed by the identity that requested it.
    pub async fn fetch_mine(&self, refresh: bool) -> AppResult<UserProfile> {
        let user_id = self.require_identity().await?;
        if !refresh {
            if let Some(cached) = self.cache.get(&user_id) {
                return Ok(cached);
            }
        }
        let profile = self.fetch_by_id(user_id).await?;
        self.cache.store(profile.clone(), user_id);
        Ok(profile)
    }

    /// Case-insensitive substring search over username and full name,
    /// username ascending, capped at `limit`. A whitespace-only query
    /// returns an empty set without touching the network.
    pub async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<UserProfile>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        self.gateway
            .call(
                "search_profiles",
                &SearchProfilesParams {
                    search_text: trimmed,
                    max_results: limit,
                },
            )
            .await
    }

    /// Applies a partial update, waits out the backend's read-after-write
    /// lag, then re-fetches the authoritative row and refreshes the cache.
    ///
    /// The write is committed once the backend acknowledges it; a failure
    /// in the re-fetch surfaces as a normal error without rolling back.
    pub async fn update_fields(&self, patch: ProfilePatch) -> AppResult<UserProfile> {
        let user_id = self.require_identity().await?;
        if patch.is_empty() {
            // Nothing to write; hand back the authoritative row.
            return self.fetch_mine(true).await;
        }
        let _: Vec<UserProfile> = self
            .gateway
            .update_rows(PROFILES_TABLE, &[Filter::eq("id", user_id)], &patch)
            .await?;

        tokio::time::sleep(SETTLE_DELAY).await;

        let profile = self.fetch_by_id(user_id).await?;
        self.cache.store(profile.clone(), user_id);
        Ok(profile)
    }

    /// Writes the full mutable field set, then stores the given object
    /// directly in the cache. No re-fetch: unlike `update_fields`, the
    /// caller already holds the complete authoritative shape.
    pub async fn update_full(&self, profile: UserProfile) -> AppResult<()> {
        let user_id = self.require_identity().await?;
        let update = FullProfileUpdate {
            first_name: &profile.first_name,
            last_name: &profile.last_name,
            username: &profile.username,
            bio: profile.bio.as_deref(),
            email: &profile.email,
            date_of_birth: profile.date_of_birth,
            phone_number: profile.phone_number.as_deref(),
            location: profile.location.as_deref(),
            latitude: profile.latitude,
            longitude: profile.longitude,
            avatar_url: profile.avatar_url.as_deref(),
            is_public: profile.is_public,
        };
        let _: Vec<UserProfile> = self
            .gateway
            .update_rows(PROFILES_TABLE, &[Filter::eq("id", user_id)], &update)
            .await?;
        self.cache.store(profile, user_id);
        Ok(())
    }

    /// Whether `name` can be claimed.
    ///
    /// The requester's own cached username counts as available (they already
    /// hold it). Otherwise probes for an existing row; no row means
    /// available. Indeterminate failures also return true — failing open
    /// here keeps a transient error from blocking onboarding, at the cost
    /// of a later `Conflict` if the probe was wrong.
    pub async fn check_username_available(&self, name: &str) -> AppResult<bool> {
        if let Some(user_id) = self.identity.current_user_id().await {
            if let Some(cached) = self.cache.get(&user_id) {
                if cached.username == name {
                    return Ok(true);
                }
            }
        }
        let probe: AppResult<Vec<UsernameRow>> = self
            .gateway
            .select_rows(PROFILES_TABLE, &[Filter::eq("username", name)], None, Some(1))
            .await;
        match probe {
            Ok(rows) => Ok(rows.is_empty()),
            Err(error) => {
                warn!(username = name, %error, "availability probe failed; treating as available");
                Ok(true)
            }
        }
    }

    /// Drops the cached profile. Called on sign-out.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
