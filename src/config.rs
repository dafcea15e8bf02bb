// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured accessory configuration.
//!
//! Every capability endpoint is either absent or a fully specified value.
//! Method strings are resolved to [`reqwest::Method`] once, when the
//! accessory is constructed; call sites never branch on configuration shape.

use std::time::Duration;

use reqwest::Method;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::matcher::PowerMatcher;
use crate::template::RequestTemplate;

/// Basic-auth credentials shared by every endpoint of an accessory.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

/// One configurable device endpoint: URL template, optional body template
/// and an optional per-endpoint method override.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// URL template; may carry substitution tokens.
    pub url: String,
    /// Body template; empty means no body.
    #[serde(default)]
    pub body: String,
    /// HTTP method override; inherits the accessory default when absent.
    #[serde(default)]
    pub http_method: Option<String>,
}

impl EndpointConfig {
    /// Creates an endpoint with only a URL template.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: String::new(),
            http_method: None,
        }
    }

    /// Sets the body template.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a per-endpoint method override.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.http_method = Some(method.into());
        self
    }

    /// Resolves this configuration into an immutable [`Endpoint`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMethod` if the override is not a valid
    /// HTTP verb.
    pub fn resolve(&self, default_method: &Method) -> Result<Endpoint, ConfigError> {
        let method = match &self.http_method {
            Some(m) => parse_method(m)?,
            None => default_method.clone(),
        };
        Ok(Endpoint {
            method,
            template: RequestTemplate::new(self.url.clone(), self.body.clone()),
        })
    }
}

/// A fully resolved, immutable device endpoint.
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    template: RequestTemplate,
}

impl Endpoint {
    /// Returns the HTTP method for this endpoint.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URL/body template pair.
    #[must_use]
    pub fn template(&self) -> &RequestTemplate {
        &self.template
    }
}

/// Power status endpoint with its body pattern.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Status URL, queried with GET.
    pub url: String,
    /// Pattern tested against the response body; defaults to
    /// [`PowerMatcher::DEFAULT_PATTERN`].
    #[serde(default)]
    pub body_pattern: Option<String>,
}

impl StatusConfig {
    /// Creates a status endpoint with the default body pattern.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body_pattern: None,
        }
    }

    /// Sets a custom body pattern.
    #[must_use]
    pub fn with_body_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.body_pattern = Some(pattern.into());
        self
    }

    /// Compiles the configured (or default) body pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBodyPattern` if the pattern does not
    /// compile.
    pub fn matcher(&self) -> Result<PowerMatcher, ConfigError> {
        match &self.body_pattern {
            Some(pattern) => PowerMatcher::new(pattern),
            None => Ok(PowerMatcher::default()),
        }
    }
}

/// On/off switch capability.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchConfig {
    /// Endpoint driven to turn the device on.
    pub power_on: EndpointConfig,
    /// Endpoint driven to turn the device off.
    pub power_off: EndpointConfig,
    /// Optional status endpoint; without it the power state is write-only.
    #[serde(default)]
    pub status: Option<StatusConfig>,
}

impl SwitchConfig {
    /// Creates a switch capability from on/off endpoints.
    #[must_use]
    pub fn new(power_on: EndpointConfig, power_off: EndpointConfig) -> Self {
        Self {
            power_on,
            power_off,
            status: None,
        }
    }

    /// Adds a status endpoint.
    #[must_use]
    pub fn with_status(mut self, status: StatusConfig) -> Self {
        self.status = Some(status);
        self
    }
}

/// Independent brightness capability.
#[derive(Debug, Clone, Deserialize)]
pub struct BrightnessConfig {
    /// Status URL answering the device-native level, queried with GET.
    pub status_url: String,
    /// Set endpoint; defaults to the status URL when absent.
    #[serde(default)]
    pub set: Option<EndpointConfig>,
    /// Device-native maximum level; defaults to 100 (host range).
    #[serde(default)]
    pub max: Option<u32>,
}

impl BrightnessConfig {
    /// Creates a brightness capability around a status URL.
    #[must_use]
    pub fn new(status_url: impl Into<String>) -> Self {
        Self {
            status_url: status_url.into(),
            set: None,
            max: None,
        }
    }

    /// Sets a dedicated set endpoint.
    #[must_use]
    pub fn with_set(mut self, set: EndpointConfig) -> Self {
        self.set = Some(set);
        self
    }

    /// Sets the device-native maximum level.
    #[must_use]
    pub fn with_max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }
}

/// Combined color capability.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorConfig {
    /// Status URL answering the current hex triplet, queried with GET.
    #[serde(default)]
    pub status_url: Option<String>,
    /// Set endpoint; defaults to the status URL when absent.
    #[serde(default)]
    pub set: Option<EndpointConfig>,
    /// Whether the color endpoint also encodes brightness. When true,
    /// brightness writes go through the combined color push instead of an
    /// independent endpoint.
    #[serde(default)]
    pub brightness: bool,
}

impl ColorConfig {
    /// Creates an empty color capability.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status_url: None,
            set: None,
            brightness: false,
        }
    }

    /// Sets the status URL.
    #[must_use]
    pub fn with_status_url(mut self, url: impl Into<String>) -> Self {
        self.status_url = Some(url.into());
        self
    }

    /// Sets a dedicated set endpoint.
    #[must_use]
    pub fn with_set(mut self, set: EndpointConfig) -> Self {
        self.set = Some(set);
        self
    }

    /// Marks the color endpoint as brightness-aware.
    #[must_use]
    pub fn with_brightness(mut self, brightness: bool) -> Self {
        self.brightness = brightness;
        self
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete configuration for one accessory.
///
/// # Examples
///
/// ```
/// use rgblink_lib::config::{AccessoryConfig, EndpointConfig, SwitchConfig};
///
/// let config = AccessoryConfig::new("Desk Light").with_switch(SwitchConfig::new(
///     EndpointConfig::new("http://light.local/on"),
///     EndpointConfig::new("http://light.local/off"),
/// ));
/// assert_eq!(config.name, "Desk Light");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AccessoryConfig {
    /// Display name of the accessory.
    pub name: String,
    /// Default HTTP method for set endpoints; defaults to GET.
    #[serde(default)]
    pub http_method: Option<String>,
    /// Optional basic-auth credentials, shared across endpoints.
    #[serde(default)]
    pub credentials: Option<Credentials>,
    /// Request timeout in milliseconds; defaults to 5000.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// On/off capability.
    #[serde(default)]
    pub switch: Option<SwitchConfig>,
    /// Independent brightness capability.
    #[serde(default)]
    pub brightness: Option<BrightnessConfig>,
    /// Combined color capability.
    #[serde(default)]
    pub color: Option<ColorConfig>,
}

impl AccessoryConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

    /// Creates a configuration with no capabilities.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            http_method: None,
            credentials: None,
            timeout_ms: None,
            switch: None,
            brightness: None,
            color: None,
        }
    }

    /// Sets the default HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.http_method = Some(method.into());
        self
    }

    /// Sets basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Sets the request timeout in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Adds the switch capability.
    #[must_use]
    pub fn with_switch(mut self, switch: SwitchConfig) -> Self {
        self.switch = Some(switch);
        self
    }

    /// Adds the independent brightness capability.
    #[must_use]
    pub fn with_brightness(mut self, brightness: BrightnessConfig) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Adds the color capability.
    #[must_use]
    pub fn with_color(mut self, color: ColorConfig) -> Self {
        self.color = Some(color);
        self
    }

    /// Resolves the default method (GET when unset).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMethod` for an unrecognized verb.
    pub fn default_method(&self) -> Result<Method, ConfigError> {
        match &self.http_method {
            Some(m) => parse_method(m),
            None => Ok(Method::GET),
        }
    }

    /// Returns the configured request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map_or(Self::DEFAULT_TIMEOUT, Duration::from_millis)
    }
}

fn parse_method(method: &str) -> Result<Method, ConfigError> {
    Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| ConfigError::InvalidMethod(method.to_string()))
}
