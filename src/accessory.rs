// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-accessory orchestration.
//!
//! [`Accessory`] is what the host platform talks to: four gettable/settable
//! capabilities (power, brightness, hue, saturation), an identify operation
//! and the inbound notification entry point. All endpoint resolution happens
//! once at construction; capability operations fail fast with a
//! `ConfigError` before any network call when their endpoints are missing.

use std::time::Duration;

use reqwest::Method;

use crate::color_cache::{ColorStateCache, PushDecision};
use crate::config::{AccessoryConfig, Endpoint, EndpointConfig};
use crate::error::{ConfigError, Error, Result, ValueError};
use crate::guard::PowerStateGuard;
use crate::matcher::{self, PowerMatcher};
use crate::notification::{KnownCharacteristic, Notification};
use crate::protocol::HttpClient;
use crate::subscription::{CallbackRegistry, SubscriptionId};
use crate::template::TokenValues;
use crate::types::{Brightness, BrightnessScale, HsbColor, PowerState, RgbColor};

/// Delay between the off and on halves of an identify toggle.
const IDENTIFY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct SwitchCaps {
    power_on: Endpoint,
    power_off: Endpoint,
    status: Option<StatusCaps>,
}

#[derive(Debug)]
struct StatusCaps {
    url: String,
    matcher: PowerMatcher,
}

#[derive(Debug)]
struct BrightnessCaps {
    status_url: String,
    set: Endpoint,
    scale: BrightnessScale,
}

#[derive(Debug)]
struct ColorCaps {
    status_url: Option<String>,
    set: Option<Endpoint>,
    brightness_aware: bool,
}

/// One HTTP RGB accessory.
///
/// # Examples
///
/// ```no_run
/// use rgblink_lib::Accessory;
/// use rgblink_lib::config::{AccessoryConfig, ColorConfig, EndpointConfig};
///
/// # async fn example() -> rgblink_lib::Result<()> {
/// let config = AccessoryConfig::new("Desk Light").with_color(
///     ColorConfig::new()
///         .with_status_url("http://light.local/color/status")
///         .with_set(EndpointConfig::new("http://light.local/color/set/%s")),
/// );
///
/// let accessory = Accessory::new(config)?;
/// accessory.set_hue(120).await?;
/// accessory.set_saturation(100).await?; // one combined push happens here
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Accessory {
    name: String,
    client: HttpClient,
    switch: Option<SwitchCaps>,
    brightness: Option<BrightnessCaps>,
    color: Option<ColorCaps>,
    cache: ColorStateCache,
    guard: PowerStateGuard,
    callbacks: CallbackRegistry,
}

impl Accessory {
    /// Builds an accessory from its configuration.
    ///
    /// Endpoint methods and body patterns are resolved here, once; the
    /// returned accessory never branches on configuration shape again.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid methods or body patterns, and
    /// `TransportError` if the HTTP client cannot be constructed.
    pub fn new(config: AccessoryConfig) -> Result<Self> {
        let default_method = config.default_method()?;
        let client = HttpClient::new(config.timeout(), config.credentials.clone())?;

        let switch = config
            .switch
            .as_ref()
            .map(|s| -> Result<SwitchCaps> {
                Ok(SwitchCaps {
                    power_on: s.power_on.resolve(&default_method)?,
                    power_off: s.power_off.resolve(&default_method)?,
                    status: s
                        .status
                        .as_ref()
                        .map(|status| -> Result<StatusCaps> {
                            Ok(StatusCaps {
                                url: status.url.clone(),
                                matcher: status.matcher()?,
                            })
                        })
                        .transpose()?,
                })
            })
            .transpose()?;

        let brightness = config
            .brightness
            .as_ref()
            .map(|b| -> Result<BrightnessCaps> {
                let set = b
                    .set
                    .clone()
                    .unwrap_or_else(|| EndpointConfig::new(b.status_url.clone()));
                let scale = match b.max {
                    Some(max) => BrightnessScale::new(max)?,
                    None => BrightnessScale::default(),
                };
                Ok(BrightnessCaps {
                    status_url: b.status_url.clone(),
                    set: set.resolve(&default_method)?,
                    scale,
                })
            })
            .transpose()?;

        let color = config
            .color
            .as_ref()
            .map(|c| -> Result<ColorCaps> {
                let set = match (&c.set, &c.status_url) {
                    (Some(set), _) => Some(set.clone()),
                    (None, Some(status_url)) => Some(EndpointConfig::new(status_url.clone())),
                    (None, None) => None,
                };
                Ok(ColorCaps {
                    status_url: c.status_url.clone(),
                    set: set.map(|s| s.resolve(&default_method)).transpose()?,
                    brightness_aware: c.brightness,
                })
            })
            .transpose()?;

        // With no device-side brightness endpoint the host still expects a
        // sensible color: assume full brightness until told otherwise.
        let initial_brightness = if brightness.is_some() { 0 } else { 100 };

        Ok(Self {
            name: config.name,
            client,
            switch,
            brightness,
            color,
            cache: ColorStateCache::new(initial_brightness),
            guard: PowerStateGuard::new(),
            callbacks: CallbackRegistry::new(),
        })
    }

    /// Returns the accessory's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether brightness is settable at all, either through an
    /// independent endpoint or encoded into the color push.
    #[must_use]
    pub fn supports_brightness(&self) -> bool {
        self.brightness.is_some() || self.color_brightness_aware()
    }

    fn color_brightness_aware(&self) -> bool {
        self.color.as_ref().is_some_and(|c| c.brightness_aware)
    }

    // ========== Power ==========

    /// Reads the power state through the status endpoint.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingEndpoint` without a status endpoint; transport
    /// and status errors from the exchange.
    pub async fn get_power_state(&self) -> Result<bool> {
        let status = self
            .switch
            .as_ref()
            .and_then(|s| s.status.as_ref())
            .ok_or_else(|| missing_endpoint("power status"))?;

        let body = self.client.send(Method::GET, &status.url, "").await?;
        let on = status.matcher.matches(&body);
        tracing::debug!(name = %self.name, power = %PowerState::from(on), "power state read");
        Ok(on)
    }

    /// Sets the power state.
    ///
    /// A set arriving directly after an inbound power notification is
    /// suppressed (the device originated that change); see
    /// [`handle_notification`](Self::handle_notification).
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingEndpoint` when the switch capability is not
    /// configured; transport and status errors from the exchange.
    pub async fn set_power_state(&self, on: bool) -> Result<()> {
        let switch = self
            .switch
            .as_ref()
            .ok_or_else(|| missing_endpoint("power on/off"))?;

        if self.guard.consume() {
            tracing::debug!(name = %self.name, "suppressing notification-induced power write");
            return Ok(());
        }

        let endpoint = if on {
            &switch.power_on
        } else {
            &switch.power_off
        };
        let rendered = endpoint.template().render(&TokenValues::default());
        self.client
            .send(endpoint.method().clone(), &rendered.url, &rendered.body)
            .await?;
        tracing::debug!(name = %self.name, power = %PowerState::from(on), "power state set");
        Ok(())
    }

    // ========== Brightness ==========

    /// Reads the brightness level (0-100).
    ///
    /// With an independent endpoint the device-native level is fetched and
    /// rescaled; with only a brightness-aware color endpoint the last cached
    /// level is answered.
    ///
    /// # Errors
    ///
    /// `ConfigError::UnsupportedCapability` when brightness is not
    /// configured in any form; transport, status and parse errors otherwise.
    pub async fn get_brightness(&self) -> Result<Brightness> {
        if !self.supports_brightness() {
            return Err(unsupported("brightness"));
        }

        match &self.brightness {
            Some(caps) => {
                let body = self.client.send(Method::GET, &caps.status_url, "").await?;
                let device_level = matcher::parse_brightness_body(&body)?;
                let level = caps.scale.to_host(device_level);
                tracing::debug!(name = %self.name, level = %level, "brightness read");
                Ok(level)
            }
            None => Ok(Brightness::clamped(self.cache.snapshot().brightness())),
        }
    }

    /// Sets the brightness level (0-100).
    ///
    /// Brightness is never deferred: with an independent endpoint the
    /// rescaled level is pushed there immediately; with a brightness-aware
    /// color endpoint the full combined color is pushed immediately. The
    /// hue/saturation coalescing flag is untouched either way.
    ///
    /// # Errors
    ///
    /// `ValueError::InvalidBrightness` above 100;
    /// `ConfigError::UnsupportedCapability` when brightness is not
    /// configured; transport/status/conversion errors from the push.
    pub async fn set_brightness(&self, level: u8) -> Result<()> {
        if !self.supports_brightness() {
            return Err(unsupported("brightness"));
        }
        let level = Brightness::new(level)?;
        let state = self.cache.set_brightness(level.value());

        if self.color_brightness_aware() {
            return self.push_color(state).await;
        }

        // supports_brightness() without a brightness-aware color implies the
        // independent endpoint exists.
        let Some(caps) = &self.brightness else {
            return Err(unsupported("brightness"));
        };
        let device_level = caps.scale.to_device(level);
        let rendered = caps
            .set
            .template()
            .render(&TokenValues::value(device_level.to_string()));
        self.client
            .send(caps.set.method().clone(), &rendered.url, &rendered.body)
            .await?;
        tracing::debug!(name = %self.name, level = %level, device_level, "brightness set");
        Ok(())
    }

    // ========== Hue / Saturation ==========

    /// Reads the hue (0-360) from the color status endpoint and caches it.
    ///
    /// # Errors
    ///
    /// `ConfigError` without a color status endpoint; transport, status and
    /// parse errors otherwise.
    pub async fn get_hue(&self) -> Result<u16> {
        let hsb = self.read_device_color().await?;
        self.cache.record_hue(hsb.hue());
        tracing::debug!(name = %self.name, hue = hsb.hue(), "hue read");
        Ok(hsb.hue())
    }

    /// Reads the saturation (0-100) from the color status endpoint and
    /// caches it.
    ///
    /// # Errors
    ///
    /// `ConfigError` without a color status endpoint; transport, status and
    /// parse errors otherwise.
    pub async fn get_saturation(&self) -> Result<u8> {
        let hsb = self.read_device_color().await?;
        self.cache.record_saturation(hsb.saturation());
        tracing::debug!(name = %self.name, saturation = hsb.saturation(), "saturation read");
        Ok(hsb.saturation())
    }

    /// Sets the hue (0-360).
    ///
    /// The first half of a hue/saturation pair is buffered with no device
    /// call; the second half triggers exactly one combined push.
    ///
    /// # Errors
    ///
    /// `ValueError::InvalidHue` above 360; `ConfigError` without a color set
    /// endpoint; transport/status/conversion errors from the push.
    pub async fn set_hue(&self, hue: u16) -> Result<()> {
        self.color_set_endpoint()?;
        if hue > HsbColor::MAX_HUE {
            return Err(ValueError::InvalidHue(hue).into());
        }
        match self.cache.set_hue(hue) {
            PushDecision::Buffered => {
                tracing::debug!(name = %self.name, hue, "hue buffered awaiting pair");
                Ok(())
            }
            PushDecision::PushColor(state) => self.push_color(state).await,
        }
    }

    /// Sets the saturation (0-100).
    ///
    /// Coalesced with hue writes exactly like [`set_hue`](Self::set_hue).
    ///
    /// # Errors
    ///
    /// `ValueError::InvalidSaturation` above 100; `ConfigError` without a
    /// color set endpoint; transport/status/conversion errors from the push.
    pub async fn set_saturation(&self, saturation: u8) -> Result<()> {
        self.color_set_endpoint()?;
        if saturation > HsbColor::MAX_SATURATION {
            return Err(ValueError::InvalidSaturation(saturation).into());
        }
        match self.cache.set_saturation(saturation) {
            PushDecision::Buffered => {
                tracing::debug!(name = %self.name, saturation, "saturation buffered awaiting pair");
                Ok(())
            }
            PushDecision::PushColor(state) => self.push_color(state).await,
        }
    }

    // ========== Identify / Notifications ==========

    /// Visually identifies the accessory by toggling power off and back on
    /// after a short delay.
    ///
    /// Best-effort: toggle failures are logged and swallowed so that
    /// identification never fails the overall operation.
    pub async fn identify(&self) {
        tracing::info!(name = %self.name, "identify requested");
        if let Err(e) = self.set_power_state(false).await {
            tracing::debug!(name = %self.name, error = %e, "identify off-toggle failed");
        }
        tokio::time::sleep(IDENTIFY_DELAY).await;
        if let Err(e) = self.set_power_state(true).await {
            tracing::debug!(name = %self.name, error = %e, "identify on-toggle failed");
        }
    }

    /// Applies an inbound out-of-band status notification.
    ///
    /// A power notification arms the one-shot suppression guard and fans out
    /// to the callbacks registered via
    /// [`on_power_changed`](Self::on_power_changed); the host's re-entrant
    /// power set is then absorbed without a device call. Unknown
    /// characteristics are logged and ignored — the notification channel has
    /// no synchronous caller to fail.
    pub fn handle_notification(&self, notification: &Notification) {
        match KnownCharacteristic::from_name(&notification.characteristic) {
            Some(KnownCharacteristic::On) => {
                let Some(on) = notification.value.as_bool() else {
                    tracing::warn!(
                        name = %self.name,
                        value = %notification.value,
                        "ignoring power notification with non-boolean value"
                    );
                    return;
                };
                self.guard.arm();
                self.callbacks.notify_power_changed(PowerState::from(on));
            }
            None => {
                tracing::warn!(
                    name = %self.name,
                    characteristic = %notification.characteristic,
                    "ignoring notification for unknown characteristic"
                );
            }
        }
    }

    /// Registers a host callback for device-reported power changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.callbacks.on_power_changed(callback)
    }

    /// Removes a previously registered callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    // ========== Helpers ==========

    fn color_set_endpoint(&self) -> Result<&Endpoint> {
        self.color
            .as_ref()
            .and_then(|c| c.set.as_ref())
            .ok_or_else(|| missing_endpoint("color set"))
    }

    async fn read_device_color(&self) -> Result<HsbColor> {
        let url = self
            .color
            .as_ref()
            .and_then(|c| c.status_url.as_deref())
            .ok_or_else(|| missing_endpoint("color status"))?;

        let body = self.client.send(Method::GET, url, "").await?;
        let rgb = matcher::parse_color_body(&body)?;
        Ok(rgb.to_hsb())
    }

    /// Performs the combined device push for the given full color state.
    ///
    /// Chromaticity is only computed when the template mentions an xy token;
    /// a black-point conversion failure aborts the push instead of sending a
    /// malformed request.
    async fn push_color(&self, state: HsbColor) -> Result<()> {
        let endpoint = self.color_set_endpoint()?;
        let rgb = RgbColor::from_hsb(&state);

        let mut tokens = TokenValues::value(rgb.to_hex());
        if endpoint.template().mentions_chromaticity() {
            let xy = rgb.to_xy()?;
            tokens = tokens.with_chromaticity(xy.x(), xy.y());
        }

        let rendered = endpoint.template().render(&tokens);
        tracing::debug!(
            name = %self.name,
            hsb = %state,
            rgb = %rgb,
            url = %rendered.url,
            "pushing combined color"
        );
        self.client
            .send(endpoint.method().clone(), &rendered.url, &rendered.body)
            .await?;
        Ok(())
    }
}

fn missing_endpoint(capability: &str) -> Error {
    Error::Config(ConfigError::MissingEndpoint {
        capability: capability.to_string(),
    })
}

fn unsupported(capability: &str) -> Error {
    Error::Config(ConfigError::UnsupportedCapability {
        capability: capability.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BrightnessConfig, ColorConfig, SwitchConfig};

    fn color_only_config() -> AccessoryConfig {
        AccessoryConfig::new("Light").with_color(
            ColorConfig::new()
                .with_status_url("http://h/color/status")
                .with_set(EndpointConfig::new("http://h/color/set/%s")),
        )
    }

    #[tokio::test]
    async fn power_ops_fail_fast_without_switch() {
        let accessory = Accessory::new(color_only_config()).unwrap();

        let err = accessory.get_power_state().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingEndpoint { .. })
        ));

        let err = accessory.set_power_state(true).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn brightness_unsupported_without_any_source() {
        let accessory = Accessory::new(color_only_config()).unwrap();
        let err = accessory.set_brightness(50).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnsupportedCapability { .. })
        ));
        let err = accessory.get_brightness().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnsupportedCapability { .. })
        ));
    }

    #[tokio::test]
    async fn cached_brightness_answered_without_endpoint() {
        // Brightness-aware color but no independent endpoint: reads come
        // from the cache, initialized to 100.
        let config = AccessoryConfig::new("Light").with_color(
            ColorConfig::new()
                .with_set(EndpointConfig::new("http://h/color/set/%s"))
                .with_brightness(true),
        );
        let accessory = Accessory::new(config).unwrap();
        assert_eq!(accessory.get_brightness().await.unwrap().value(), 100);
    }

    #[tokio::test]
    async fn initial_brightness_zero_with_independent_endpoint() {
        let config = color_only_config()
            .with_brightness(BrightnessConfig::new("http://h/brightness/status"));
        let accessory = Accessory::new(config).unwrap();
        assert_eq!(accessory.cache.snapshot().brightness(), 0);
    }

    #[tokio::test]
    async fn color_ops_fail_fast_without_color() {
        let config = AccessoryConfig::new("Light").with_switch(SwitchConfig::new(
            EndpointConfig::new("http://h/on"),
            EndpointConfig::new("http://h/off"),
        ));
        let accessory = Accessory::new(config).unwrap();

        let err = accessory.set_hue(10).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingEndpoint { .. })
        ));
        let err = accessory.get_hue().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn out_of_range_values_rejected_before_buffering() {
        let accessory = Accessory::new(color_only_config()).unwrap();
        assert!(matches!(
            accessory.set_hue(361).await.unwrap_err(),
            Error::Value(ValueError::InvalidHue(361))
        ));
        assert!(matches!(
            accessory.set_saturation(101).await.unwrap_err(),
            Error::Value(ValueError::InvalidSaturation(101))
        ));
    }

    #[tokio::test]
    async fn unknown_notification_is_ignored() {
        let accessory = Accessory::new(color_only_config()).unwrap();
        let n: Notification =
            serde_json::from_str(r#"{"characteristic": "Brightness", "value": 50}"#).unwrap();
        // Must not panic, must not arm the guard.
        accessory.handle_notification(&n);
        assert!(!accessory.guard.consume());
    }

    #[tokio::test]
    async fn status_endpoint_falls_back_as_color_set() {
        // A color capability with only a status URL still supports sets.
        let config = AccessoryConfig::new("Light")
            .with_color(ColorConfig::new().with_status_url("http://h/color"));
        let accessory = Accessory::new(config).unwrap();
        assert!(accessory.color_set_endpoint().is_ok());
    }
}
