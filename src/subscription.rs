// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing callback registry.
//!
//! The host platform registers interest in accessory state changes here
//! instead of the accessory reaching into platform-global characteristic
//! registries. Today the only event an accessory emits is a power change
//! reported by an inbound notification.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::types::PowerState;

/// Unique identifier for a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type PowerCallback = Arc<dyn Fn(PowerState) + Send + Sync>;

/// Registry storing host callbacks.
///
/// Thread-safe via `parking_lot::RwLock`; callbacks are wrapped in `Arc` so
/// dispatch clones them out of the lock before invoking.
#[derive(Default)]
pub struct CallbackRegistry {
    next_id: AtomicU64,
    power_callbacks: RwLock<HashMap<SubscriptionId, PowerCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for power state changes reported by the device.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Removes a previously registered callback. Returns true if it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.power_callbacks.write().remove(&id).is_some()
    }

    /// Dispatches a power change to every registered callback.
    pub fn notify_power_changed(&self, state: PowerState) {
        let callbacks: Vec<PowerCallback> =
            self.power_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(state);
        }
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("power_callbacks", &self.power_callbacks.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn dispatches_to_registered_callbacks() {
        let registry = CallbackRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        registry.on_power_changed(move |state| {
            assert_eq!(state, PowerState::On);
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.notify_power_changed(PowerState::On);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_dispatch() {
        let registry = CallbackRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let id = registry.on_power_changed(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));

        registry.notify_power_changed(PowerState::Off);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn ids_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.on_power_changed(|_| {});
        let b = registry.on_power_changed(|_| {});
        assert_ne!(a, b);
    }
}
