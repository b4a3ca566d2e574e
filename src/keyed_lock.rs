//! Mutual exclusion scoped to dynamically named resources.
//!
//! A [`KeyedLock`] lazily materializes one exclusive lock per string key, so
//! callers can serialize bursts of work against a dynamic set of targets
//! without declaring a lock per target up front. All callers using the same
//! key share the same underlying lock; distinct keys never contend.
//!
//! The registry is an explicit object with caller-controlled lifetime, not a
//! process-wide singleton, so tests and independent subsystems construct
//! isolated instances.
//!
//! # Memory
//!
//! The registry grows with the number of distinct keys ever locked and
//! entries are never reclaimed. This is an accepted characteristic, not a
//! leak to fix: expected key cardinality is small and bounded, such as the
//! set of configured target names.
//!
//! # Examples
//!
//! ```rust
//! use loadgauge::keyed_lock::KeyedLock;
//!
//! let locks = KeyedLock::new();
//!
//! {
//!     let _guard = locks.lock("https://example.com");
//!     // Exclusive for this key until the guard drops.
//! }
//!
//! // Reacquiring after release does not deadlock.
//! let _guard = locks.lock("https://example.com");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};

/// A registry of exclusive locks keyed by arbitrary strings.
///
/// Lock slots are created exactly once per distinct key; when several threads
/// race on a key that has no slot yet, the first one inserts it and all of
/// them converge on that same slot. Acquisition order within one key is
/// whatever the underlying mutex hands out, with no fairness guarantee.
#[derive(Debug, Default)]
pub struct KeyedLock {
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Exclusive ownership of one key, released exactly once on drop.
///
/// Dropping the guard is the release handle: it runs on every exit path,
/// including panics and early returns, so a key can never be left locked by
/// a caller that forgot to clean up.
#[must_use = "the key stays locked only while the guard is held"]
pub struct KeyedLockGuard {
    _slot: ArcMutexGuard<RawMutex, ()>,
}

impl KeyedLock {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires exclusive ownership of `key`, blocking the calling thread
    /// until no other caller holds the same key.
    ///
    /// The registry lock is held only for the get-or-create step; the
    /// blocking acquire happens on the key's own slot, so callers of other
    /// keys are never blocked by this call.
    pub fn lock(&self, key: &str) -> KeyedLockGuard {
        let slot = {
            let mut slots = self.slots.lock();
            match slots.get(key) {
                Some(slot) => Arc::clone(slot),
                None => {
                    let slot = Arc::new(Mutex::new(()));
                    slots.insert(key.to_owned(), Arc::clone(&slot));
                    slot
                }
            }
        };

        KeyedLockGuard {
            _slot: slot.lock_arc(),
        }
    }
}
