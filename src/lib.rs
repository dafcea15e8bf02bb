// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `RgbLink` Lib - A Rust library to bridge HTTP RGB light devices into home
//! automation platforms.
//!
//! Host platforms model a color light as four independent characteristics:
//! power, brightness, hue and saturation. Many simple devices instead accept
//! a single combined color write (hex RGB or CIE xy chromaticity) over HTTP.
//! This library reconciles the two models per accessory:
//!
//! - **Write coalescing**: a host issues hue and saturation as two separate
//!   calls for one color change; the first is buffered and the second flushes
//!   exactly one combined device push.
//! - **Color conversion**: HSB ⇄ RGB ⇄ CIE xy, rendered into configurable
//!   URL/body templates.
//! - **Response classification**: every exchange resolves to a body, an HTTP
//!   status error carrying code and body, or a transport error. Nothing is
//!   retried.
//! - **Notification loop suppression**: when the device itself reports a
//!   power change, the host's re-entrant power write is absorbed instead of
//!   being echoed back to the device.
//!
//! # Quick Start
//!
//! ```no_run
//! use rgblink_lib::Accessory;
//! use rgblink_lib::config::{AccessoryConfig, ColorConfig, EndpointConfig, SwitchConfig};
//!
//! #[tokio::main]
//! async fn main() -> rgblink_lib::Result<()> {
//!     let config = AccessoryConfig::new("Desk Light")
//!         .with_switch(SwitchConfig::new(
//!             EndpointConfig::new("http://light.local/power/on"),
//!             EndpointConfig::new("http://light.local/power/off"),
//!         ))
//!         .with_color(
//!             ColorConfig::new()
//!                 .with_status_url("http://light.local/color/status")
//!                 .with_set(EndpointConfig::new("http://light.local/color/set/%s")),
//!         );
//!
//!     let accessory = Accessory::new(config)?;
//!
//!     accessory.set_power_state(true).await?;
//!
//!     // One user-intended color change, two host calls, one device push.
//!     accessory.set_hue(120).await?;
//!     accessory.set_saturation(100).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Inbound notifications
//!
//! ```no_run
//! use rgblink_lib::{Accessory, Notification};
//! # fn wire(accessory: &Accessory) {
//! accessory.on_power_changed(|state| {
//!     println!("device reports power {state}");
//! });
//!
//! // Delivered by an external notification channel:
//! accessory.handle_notification(&Notification::power(true));
//! // The host's re-entrant set_power_state(true) is now suppressed once.
//! # }
//! ```

mod accessory;
pub mod color_cache;
pub mod config;
pub mod error;
mod guard;
pub mod matcher;
pub mod notification;
pub mod protocol;
pub mod subscription;
pub mod template;
pub mod types;

pub use accessory::Accessory;
pub use color_cache::{ColorStateCache, PushDecision, PushState};
pub use config::{
    AccessoryConfig, BrightnessConfig, ColorConfig, Credentials, Endpoint, EndpointConfig,
    StatusConfig, SwitchConfig,
};
pub use error::{ConfigError, ConversionError, Error, Result, TransportError, ValueError};
pub use guard::PowerStateGuard;
pub use notification::{KnownCharacteristic, Notification};
pub use protocol::HttpClient;
pub use subscription::{CallbackRegistry, SubscriptionId};
pub use template::{RenderedRequest, RequestTemplate, TokenValues};
pub use types::{Brightness, BrightnessScale, Chromaticity, HsbColor, PowerState, RgbColor};
