// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound out-of-band status notifications.
//!
//! Devices can report state changes through an external notification channel
//! (delivery transport is not part of this crate). The payload names a
//! characteristic and carries its new value.

use serde::Deserialize;

/// A status update delivered by the notification channel.
///
/// # Examples
///
/// ```
/// use rgblink_lib::notification::Notification;
///
/// let n: Notification =
///     serde_json::from_str(r#"{"characteristic": "On", "value": true}"#).unwrap();
/// assert_eq!(n.characteristic, "On");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Optional service name; informational only.
    #[serde(default)]
    pub service: Option<String>,
    /// The characteristic being updated.
    pub characteristic: String,
    /// The new value.
    pub value: serde_json::Value,
}

impl Notification {
    /// Convenience constructor for a power update.
    #[must_use]
    pub fn power(value: bool) -> Self {
        Self {
            service: None,
            characteristic: KnownCharacteristic::On.name().to_string(),
            value: serde_json::Value::Bool(value),
        }
    }
}

/// The closed set of characteristic names the accessory understands on the
/// notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownCharacteristic {
    /// The power state characteristic.
    On,
}

impl KnownCharacteristic {
    /// Maps a characteristic name to its known kind, if any.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "On" => Some(Self::On),
            _ => None,
        }
    }

    /// Returns the wire name of this characteristic.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::On => "On",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_payload() {
        let n: Notification = serde_json::from_str(
            r#"{"service": "light-a", "characteristic": "On", "value": false}"#,
        )
        .unwrap();
        assert_eq!(n.service.as_deref(), Some("light-a"));
        assert_eq!(n.value, serde_json::Value::Bool(false));
    }

    #[test]
    fn known_characteristic_mapping() {
        assert_eq!(
            KnownCharacteristic::from_name("On"),
            Some(KnownCharacteristic::On)
        );
        assert_eq!(KnownCharacteristic::from_name("Brightness"), None);
        assert_eq!(KnownCharacteristic::from_name("on"), None);
    }

    #[test]
    fn power_constructor() {
        let n = Notification::power(true);
        assert_eq!(n.characteristic, "On");
        assert_eq!(n.value, serde_json::Value::Bool(true));
    }
}
