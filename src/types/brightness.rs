// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type and host/device rescaling.
//!
//! The host platform always speaks 0-100 percent. Devices may use a different
//! native maximum (e.g. 0-255); [`BrightnessScale`] converts between the two.

use std::fmt;

use crate::error::ValueError;

/// Host-side brightness level as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use rgblink_lib::types::Brightness;
///
/// let level = Brightness::new(75).unwrap();
/// assert_eq!(level.value(), 75);
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness value (0%).
    pub const MIN: Self = Self(0);

    /// Maximum brightness value (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidBrightness` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::InvalidBrightness(value));
        }
        Ok(Self(value))
    }

    /// Creates a brightness value, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the brightness percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Rescales brightness between the host's 0-100 range and a device's native
/// range with the given maximum.
///
/// The write path rounds up so that any nonzero host level stays nonzero on
/// the device; the read path rounds to nearest.
///
/// # Examples
///
/// ```
/// use rgblink_lib::types::{Brightness, BrightnessScale};
///
/// let scale = BrightnessScale::new(255).unwrap();
/// assert_eq!(scale.to_device(Brightness::new(50).unwrap()), 128);
/// assert_eq!(scale.to_host(128).value(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BrightnessScale(u32);

impl BrightnessScale {
    /// The identity scale: device range matches the host's 0-100.
    pub const DEFAULT: Self = Self(100);

    /// Creates a new scale with the given device-native maximum.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ZeroScale` when the maximum is zero.
    pub fn new(max: u32) -> Result<Self, ValueError> {
        if max == 0 {
            return Err(ValueError::ZeroScale);
        }
        Ok(Self(max))
    }

    /// Returns the device-native maximum.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.0
    }

    /// Rescales a host level to the device-native range:
    /// `ceil(max / 100 * host)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_device(&self, level: Brightness) -> u32 {
        (f64::from(self.0) / 100.0 * f64::from(level.value())).ceil() as u32
    }

    /// Rescales a device-native level to the host range:
    /// `round(100 / max * device)`, clamped to 100.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_host(&self, device_level: u32) -> Brightness {
        let host = (100.0 / f64::from(self.0) * f64::from(device_level)).round() as u8;
        Brightness::clamped(host)
    }
}

impl Default for BrightnessScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}
