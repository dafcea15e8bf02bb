// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status response body matchers.
//!
//! Status endpoints answer with a free-form body. For power, a configurable
//! pattern tested against the raw body derives the boolean state; for
//! brightness and color the entire (trimmed) body is the value.

use regex::Regex;

use crate::error::{ConfigError, ConversionError};
use crate::types::RgbColor;

/// Pattern tested against a power status body to derive the on/off state.
///
/// # Examples
///
/// ```
/// use rgblink_lib::matcher::PowerMatcher;
///
/// let matcher = PowerMatcher::default();
/// assert!(matcher.matches("1"));
/// assert!(!matcher.matches("0"));
///
/// let json = PowerMatcher::new(r#""switch": "on""#).unwrap();
/// assert!(json.matches(r#"{"switch": "on"}"#));
/// ```
#[derive(Debug, Clone)]
pub struct PowerMatcher {
    pattern: Regex,
}

impl PowerMatcher {
    /// The default pattern: the body contains the digit `1`.
    pub const DEFAULT_PATTERN: &'static str = "1";

    /// Compiles a matcher from the given pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBodyPattern` if the pattern does not
    /// compile.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidBodyPattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Tests the raw response body against the pattern.
    #[must_use]
    pub fn matches(&self, body: &str) -> bool {
        self.pattern.is_match(body)
    }
}

impl Default for PowerMatcher {
    fn default() -> Self {
        // Safe: the default pattern is a literal that always compiles.
        Self::new(Self::DEFAULT_PATTERN).expect("default pattern compiles")
    }
}

/// Parses a brightness status body: the entire trimmed body is a
/// device-native integer level.
///
/// # Errors
///
/// Returns `ConversionError::UnparseableBody` if the body is not an integer.
pub fn parse_brightness_body(body: &str) -> Result<u32, ConversionError> {
    body.trim()
        .parse::<u32>()
        .map_err(|_| ConversionError::UnparseableBody {
            field: "brightness".to_string(),
            body: body.to_string(),
        })
}

/// Parses a color status body: the entire trimmed body is a 6-hex-digit RGB
/// triplet, with an optional `#` prefix tolerated.
///
/// # Errors
///
/// Returns `ConversionError::UnparseableBody` if the body is not a hex
/// triplet.
pub fn parse_color_body(body: &str) -> Result<RgbColor, ConversionError> {
    let trimmed = body.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 {
        return Err(ConversionError::UnparseableBody {
            field: "RGB triplet".to_string(),
            body: body.to_string(),
        });
    }
    RgbColor::from_hex(digits).map_err(|_| ConversionError::UnparseableBody {
        field: "RGB triplet".to_string(),
        body: body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matcher_contains_one() {
        let matcher = PowerMatcher::default();
        assert!(matcher.matches("1"));
        assert!(matcher.matches("power: 1"));
        assert!(!matcher.matches("0"));
        assert!(!matcher.matches("off"));
    }

    #[test]
    fn custom_matcher() {
        let matcher = PowerMatcher::new(r#""switch": "on""#).unwrap();
        assert!(matcher.matches(r#"{"switch": "on"}"#));
        assert!(!matcher.matches(r#"{"switch": "off"}"#));
    }

    #[test]
    fn invalid_pattern_rejected() {
        assert!(matches!(
            PowerMatcher::new("("),
            Err(ConfigError::InvalidBodyPattern(_))
        ));
    }

    #[test]
    fn brightness_body_whole_integer() {
        assert_eq!(parse_brightness_body("42").unwrap(), 42);
        assert_eq!(parse_brightness_body(" 100\n").unwrap(), 100);
        assert!(parse_brightness_body("bright").is_err());
        assert!(parse_brightness_body("4.2").is_err());
    }

    #[test]
    fn color_body_hex_triplet() {
        assert_eq!(parse_color_body("00FF00").unwrap(), RgbColor::new(0, 255, 0));
        assert_eq!(
            parse_color_body("#aabbcc\n").unwrap(),
            RgbColor::new(0xAA, 0xBB, 0xCC)
        );
        assert!(parse_color_body("00FF0").is_err());
        assert!(parse_color_body("GGFFAA").is_err());
    }
}
