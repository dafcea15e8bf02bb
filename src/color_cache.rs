// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color state cache and hue/saturation write coalescing.
//!
//! A host platform that models color as separate hue and saturation
//! characteristics issues both writes back-to-back for a single user-intended
//! color change. Forwarding each one individually would push two device
//! requests (the first with a stale partner value) per change. The cache
//! therefore buffers the first of the pair and flushes a single combined push
//! on the second.
//!
//! Known fragility, preserved on purpose: if only one of the pair ever
//! arrives, the machine stays in [`AwaitingPair`](PushState::AwaitingPair)
//! and the buffered value reaches the device only when some later
//! hue/saturation write flushes it — possibly paired with a stale partner.
//! Brightness has no pairing partner and is never deferred.

use parking_lot::Mutex;

use crate::types::HsbColor;

/// Coalescing machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushState {
    /// No buffered write; the next hue/saturation set is buffered.
    Idle,
    /// One half of a hue/saturation pair is buffered; the next hue/saturation
    /// set flushes a combined push.
    AwaitingPair,
}

/// What the caller must do after a set operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDecision {
    /// The value was buffered; succeed without any device call.
    Buffered,
    /// Perform one combined device push with this full color state.
    PushColor(HsbColor),
}

#[derive(Debug)]
struct Inner {
    color: HsbColor,
    state: PushState,
}

/// Holds the last-known hue/saturation/brightness and decides when a device
/// push happens.
///
/// The lock is only held to mutate the snapshot; callers execute the decided
/// I/O afterwards, so interleaved writers degrade to last-writer-wins rather
/// than queueing.
#[derive(Debug)]
pub struct ColorStateCache {
    inner: Mutex<Inner>,
}

impl ColorStateCache {
    /// Creates a cache in `Idle` with hue 0, saturation 0 and the given
    /// initial brightness (100 when the device has no brightness source of
    /// its own, 0 otherwise).
    #[must_use]
    pub fn new(initial_brightness: u8) -> Self {
        Self {
            inner: Mutex::new(Inner {
                color: HsbColor::clamped(0, 0, initial_brightness),
                state: PushState::Idle,
            }),
        }
    }

    /// Returns the current color snapshot.
    #[must_use]
    pub fn snapshot(&self) -> HsbColor {
        self.inner.lock().color
    }

    /// Returns the current machine state.
    #[must_use]
    pub fn state(&self) -> PushState {
        self.inner.lock().state
    }

    /// Stores a new hue and advances the coalescing machine.
    pub fn set_hue(&self, hue: u16) -> PushDecision {
        let mut inner = self.inner.lock();
        inner.color = HsbColor::clamped(hue, inner.color.saturation(), inner.color.brightness());
        Self::advance(&mut inner)
    }

    /// Stores a new saturation and advances the coalescing machine.
    pub fn set_saturation(&self, saturation: u8) -> PushDecision {
        let mut inner = self.inner.lock();
        inner.color = HsbColor::clamped(inner.color.hue(), saturation, inner.color.brightness());
        Self::advance(&mut inner)
    }

    /// Stores a new brightness and returns the updated full state.
    ///
    /// Brightness writes never touch the coalescing flag: with an independent
    /// brightness endpoint the caller pushes there immediately, and with a
    /// brightness-aware color endpoint the caller performs the combined push
    /// immediately.
    pub fn set_brightness(&self, brightness: u8) -> HsbColor {
        let mut inner = self.inner.lock();
        inner.color = HsbColor::clamped(inner.color.hue(), inner.color.saturation(), brightness);
        inner.color
    }

    /// Records a hue observed on the device (status read), without touching
    /// the coalescing flag.
    pub fn record_hue(&self, hue: u16) {
        let mut inner = self.inner.lock();
        inner.color = HsbColor::clamped(hue, inner.color.saturation(), inner.color.brightness());
    }

    /// Records a saturation observed on the device (status read), without
    /// touching the coalescing flag.
    pub fn record_saturation(&self, saturation: u8) {
        let mut inner = self.inner.lock();
        inner.color = HsbColor::clamped(inner.color.hue(), saturation, inner.color.brightness());
    }

    fn advance(inner: &mut Inner) -> PushDecision {
        match inner.state {
            PushState::Idle => {
                inner.state = PushState::AwaitingPair;
                PushDecision::Buffered
            }
            PushState::AwaitingPair => {
                inner.state = PushState::Idle;
                PushDecision::PushColor(inner.color)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_initial_brightness() {
        let cache = ColorStateCache::new(100);
        assert_eq!(cache.state(), PushState::Idle);
        assert_eq!(cache.snapshot(), HsbColor::new(0, 0, 100).unwrap());

        let cache = ColorStateCache::new(0);
        assert_eq!(cache.snapshot().brightness(), 0);
    }

    #[test]
    fn hue_then_saturation_coalesce_into_one_push() {
        let cache = ColorStateCache::new(100);

        assert_eq!(cache.set_hue(10), PushDecision::Buffered);
        assert_eq!(cache.state(), PushState::AwaitingPair);

        let decision = cache.set_saturation(20);
        assert_eq!(
            decision,
            PushDecision::PushColor(HsbColor::new(10, 20, 100).unwrap())
        );
        assert_eq!(cache.state(), PushState::Idle);
    }

    #[test]
    fn saturation_first_also_coalesces() {
        let cache = ColorStateCache::new(100);
        assert_eq!(cache.set_saturation(50), PushDecision::Buffered);
        assert_eq!(
            cache.set_hue(200),
            PushDecision::PushColor(HsbColor::new(200, 50, 100).unwrap())
        );
    }

    #[test]
    fn unpaired_write_stays_buffered_until_next_write() {
        // A lone hue write arms the machine; a much later, unrelated
        // saturation write flushes the stale pair. Deliberately preserved.
        let cache = ColorStateCache::new(100);
        assert_eq!(cache.set_hue(10), PushDecision::Buffered);
        assert_eq!(cache.state(), PushState::AwaitingPair);

        // Nothing happens until the next hue/saturation write.
        assert_eq!(cache.snapshot().hue(), 10);

        assert_eq!(
            cache.set_saturation(99),
            PushDecision::PushColor(HsbColor::new(10, 99, 100).unwrap())
        );
    }

    #[test]
    fn two_hue_writes_flush_with_stale_saturation() {
        let cache = ColorStateCache::new(100);
        assert_eq!(cache.set_hue(10), PushDecision::Buffered);
        assert_eq!(
            cache.set_hue(20),
            PushDecision::PushColor(HsbColor::new(20, 0, 100).unwrap())
        );
    }

    #[test]
    fn brightness_never_touches_the_flag() {
        let cache = ColorStateCache::new(100);
        assert_eq!(cache.set_brightness(40), HsbColor::new(0, 0, 40).unwrap());
        assert_eq!(cache.state(), PushState::Idle);

        // Mid-pair brightness write keeps the pair armed.
        cache.set_hue(120);
        cache.set_brightness(80);
        assert_eq!(cache.state(), PushState::AwaitingPair);
        assert_eq!(
            cache.set_saturation(100),
            PushDecision::PushColor(HsbColor::new(120, 100, 80).unwrap())
        );
    }

    #[test]
    fn status_reads_record_without_arming() {
        let cache = ColorStateCache::new(100);
        cache.record_hue(33);
        cache.record_saturation(44);
        assert_eq!(cache.state(), PushState::Idle);
        assert_eq!(cache.snapshot(), HsbColor::new(33, 44, 100).unwrap());
    }
}
