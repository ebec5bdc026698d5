//! services/client/src/cache.rs
//!
//! A single-slot, key-validated cache.
//!
//! Capacity is exactly one entry: the only caller is "fetch the profile for
//! the current identity", so there is nothing to evict. The slot is tagged
//! with the owning key and a lookup hits only when the stored key equals the
//! requested one — a mismatch is a miss, never stale data for the wrong user.

use std::sync::{Mutex, MutexGuard};

/// One mutex-guarded `(key, value)` slot.
///
/// All three operations take the lock for their full duration, so concurrent
/// get/store/clear calls serialize against each other.
#[derive(Debug, Default)]
pub struct SingleEntryCache<K, V> {
    slot: Mutex<Option<(K, V)>>,
}

impl<K: Eq, V: Clone> SingleEntryCache<K, V> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value only when `key` matches the stored owner.
    pub fn get(&self, key: &K) -> Option<V> {
        let slot = self.lock();
        match slot.as_ref() {
            Some((owner, value)) if owner == key => Some(value.clone()),
            _ => None,
        }
    }

    /// Overwrites the slot unconditionally, replacing any previous owner.
    pub fn store(&self, value: V, key: K) {
        *self.lock() = Some((key, value));
    }

    /// Drops both the value and its owning key.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    // A poisoned mutex only means another caller panicked mid-operation;
    // the slot itself is still a coherent Option, so recover the guard.
    fn lock(&self) -> MutexGuard<'_, Option<(K, V)>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
