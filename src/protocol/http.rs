// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for device endpoints.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};

use crate::config::Credentials;
use crate::error::{Error, TransportError};

/// HTTP client shared by every endpoint of one accessory.
///
/// One [`reqwest::Client`] is built per accessory with the configured request
/// timeout. Server certificate validation is intentionally relaxed: these
/// devices live on the local network and commonly present self-signed
/// certificates or plain HTTP. This is a deliberate trade-off, not an
/// oversight — do not point this client at hosts you do not control.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    credentials: Option<Credentials>,
}

impl HttpClient {
    /// Creates a new client with the given timeout and optional shared
    /// basic-auth credentials.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(
        timeout: Duration,
        credentials: Option<Credentials>,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            credentials,
        })
    }

    /// Performs one HTTP exchange and classifies the result.
    ///
    /// A transport-level failure (connection refused, DNS failure, timeout)
    /// yields `Error::Transport`; a completed exchange with a status code
    /// other than 200 yields `Error::Status` carrying code and body; a 200
    /// response yields the raw body.
    ///
    /// # Errors
    ///
    /// See classification above. Nothing is retried.
    pub async fn send(&self, method: Method, url: &str, body: &str) -> Result<String, Error> {
        tracing::debug!(method = %method, url = %url, "sending device request");

        let mut request = self.client.request(method, url);

        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }
        if !body.is_empty() {
            request = request.body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        tracing::debug!(status = status.as_u16(), body = %body, "received device response");

        if status == StatusCode::OK {
            Ok(body)
        } else {
            Err(Error::Status {
                code: status.as_u16(),
                body,
            })
        }
    }
}
