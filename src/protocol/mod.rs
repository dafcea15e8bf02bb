// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-facing HTTP transport.
//!
//! Accessories are stateless on the wire: every operation is one independent
//! HTTP exchange with no persistent connection, no retry and no cancellation.

mod http;

pub use http::HttpClient;
