// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Suppression of notification-induced power writes.
//!
//! When an out-of-band notification reports a power change, the accessory
//! updates the host's characteristic, and the host synchronously re-invokes
//! the power set operation. Without suppression that write would go back out
//! to the device that originated the change, looping forever.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-shot suppression flag for the power set operation.
///
/// [`arm`](Self::arm) before applying a notification; the next
/// [`consume`](Self::consume) returns true exactly once and the suppressed
/// set succeeds without a device call. Strictly one-shot: a second set
/// arriving afterwards proceeds normally.
#[derive(Debug, Default)]
pub struct PowerStateGuard {
    suppress_next: AtomicBool,
}

impl PowerStateGuard {
    /// Creates a disarmed guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the guard: the next power set is suppressed.
    pub fn arm(&self) {
        self.suppress_next.store(true, Ordering::SeqCst);
    }

    /// Consumes the guard. Returns true when the current power set must be
    /// suppressed; the guard is disarmed either way.
    pub fn consume(&self) -> bool {
        self.suppress_next.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_by_default() {
        let guard = PowerStateGuard::new();
        assert!(!guard.consume());
    }

    #[test]
    fn exactly_one_shot() {
        let guard = PowerStateGuard::new();
        guard.arm();
        assert!(guard.consume());
        assert!(!guard.consume());
        assert!(!guard.consume());
    }

    #[test]
    fn rearming_works() {
        let guard = PowerStateGuard::new();
        guard.arm();
        assert!(guard.consume());
        guard.arm();
        assert!(guard.consume());
        assert!(!guard.consume());
    }
}
