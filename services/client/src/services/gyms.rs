//! services/client/src/services/gyms.rs
//!
//! Gym discovery and ingestion. Gyms arrive from external map lookups, so
//! insertion is an upsert keyed on the street address: submitting the same
//! real-world gym twice converges to one row instead of duplicating it.

use serde::Serialize;
use std::sync::Arc;

use crate::gateway::RpcGateway;
use spotter_core::domain::{Gym, NewGym};
use spotter_core::error::AppResult;

const GYMS_TABLE: &str = "gyms";
const GYM_CONFLICT_KEY: &str = "address";

#[derive(Serialize)]
struct NearbyGymsParams {
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
}

#[derive(Serialize)]
struct SearchGymsParams<'a> {
    search_text: &'a str,
    max_results: u32,
}

pub struct GymService {
    gateway: Arc<RpcGateway>,
}

impl GymService {
    pub fn new(gateway: Arc<RpcGateway>) -> Self {
        Self { gateway }
    }

    /// Gyms within `radius_meters` of the given point. Callers convert
    /// from display units before calling.
    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> AppResult<Vec<Gym>> {
        self.gateway
            .call(
                "get_nearby_gyms",
                &NearbyGymsParams {
                    latitude,
                    longitude,
                    radius_meters,
                },
            )
            .await
    }

    /// Name/address search. A whitespace-only query returns an empty set
    /// without touching the network.
    pub async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<Gym>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        self.gateway
            .call(
                "search_gyms",
                &SearchGymsParams {
                    search_text: trimmed,
                    max_results: limit,
                },
            )
            .await
    }

    /// Inserts a batch of externally-sourced gyms, upserting on address.
    /// An empty batch is a no-op that never reaches the network.
    pub async fn insert_gyms(&self, gyms: Vec<NewGym>) -> AppResult<Vec<Gym>> {
        if gyms.is_empty() {
            return Ok(Vec::new());
        }
        self.gateway
            .upsert_returning(GYMS_TABLE, &gyms, GYM_CONFLICT_KEY)
            .await
    }
}
