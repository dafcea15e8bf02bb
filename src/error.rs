// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `RgbLink` library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: configuration problems, transport failures, HTTP status errors,
//! color conversion failures, and value validation.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when driving an
/// HTTP RGB accessory.
#[derive(Debug, Error)]
pub enum Error {
    /// A required endpoint or URL is absent or malformed. Detected before any
    /// network call and never retried.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network-level failure or timeout. Surfaced as-is, not retried.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The HTTP exchange completed but the device answered with a status code
    /// other than 200.
    #[error("device returned HTTP {code}: {body:?}")]
    Status {
        /// The HTTP status code returned by the device.
        code: u16,
        /// The raw response body.
        body: String,
    },

    /// Degenerate color math, e.g. the chromaticity of pure black. The device
    /// push is aborted instead of sending a malformed request.
    #[error("color conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors caused by an incomplete or malformed accessory configuration.
///
/// These are all detected before a network call is attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The capability has no endpoint configured.
    #[error("no endpoint configured for {capability}")]
    MissingEndpoint {
        /// The capability that lacks an endpoint.
        capability: String,
    },

    /// The accessory does not expose the requested capability at all.
    #[error("accessory does not support {capability}")]
    UnsupportedCapability {
        /// The capability that is not supported.
        capability: String,
    },

    /// A body pattern failed to compile.
    #[error("invalid status body pattern: {0}")]
    InvalidBodyPattern(String),

    /// An HTTP method string was not a valid verb.
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
}

/// Errors related to the HTTP transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request failed at the network level (connection refused,
    /// DNS failure, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Errors from degenerate color space conversions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Pure black has no chromaticity: X+Y+Z is zero and the normalization
    /// would divide by zero.
    #[error("cannot derive chromaticity for black (X+Y+Z = 0)")]
    BlackPoint,

    /// A response body did not contain a parseable value.
    #[error("failed to parse {field} from response body: {body:?}")]
    UnparseableBody {
        /// What was being parsed (e.g. "brightness", "RGB triplet").
        field: String,
        /// The offending body.
        body: String,
    },
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A hue value is outside the valid range (0-360).
    #[error("hue value {0} is out of range [0, 360]")]
    InvalidHue(u16),

    /// A saturation value is outside the valid range (0-100).
    #[error("saturation value {0} is out of range [0, 100]")]
    InvalidSaturation(u8),

    /// A brightness value is outside the valid range (0-100).
    #[error("brightness value {0} is out of range [0, 100]")]
    InvalidBrightness(u8),

    /// An invalid hex color string was provided.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A brightness scale maximum of zero makes rescaling meaningless.
    #[error("brightness scale maximum must be greater than zero")]
    ZeroScale,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
