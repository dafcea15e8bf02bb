// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request templating.
//!
//! Endpoint URLs and bodies are configured as templates carrying placeholder
//! tokens. Rendering substitutes every occurrence of every *provided* token
//! in both strings; tokens without a provided value, and anything that is not
//! a recognized token, are left verbatim. Hex-only devices simply never
//! provide the chromaticity tokens.

use std::fmt::Write as _;

/// Primary substitution token: the main value of a request (hex triplet,
/// device-native brightness level, ...).
pub const VALUE_TOKEN: &str = "%s";

/// Chromaticity x coordinate token.
pub const CIE_X_TOKEN: &str = "%cie-x%";

/// Chromaticity y coordinate token.
pub const CIE_Y_TOKEN: &str = "%cie-y%";

/// A URL/body template pair for one device endpoint.
///
/// # Examples
///
/// ```
/// use rgblink_lib::template::{RequestTemplate, TokenValues};
///
/// let template = RequestTemplate::new("http://h/set/%s", "");
/// let rendered = template.render(&TokenValues::value("AABBCC"));
/// assert_eq!(rendered.url, "http://h/set/AABBCC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    url: String,
    body: String,
}

impl RequestTemplate {
    /// Creates a template from a URL template and a body template. Either may
    /// be empty.
    #[must_use]
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// Returns the raw URL template.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the raw body template.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true when the URL or body mentions a chromaticity token.
    ///
    /// Pushes only compute xy coordinates when the template actually asks for
    /// them, so hex-only devices can still be driven to pure black.
    #[must_use]
    pub fn mentions_chromaticity(&self) -> bool {
        self.url.contains(CIE_X_TOKEN)
            || self.url.contains(CIE_Y_TOKEN)
            || self.body.contains(CIE_X_TOKEN)
            || self.body.contains(CIE_Y_TOKEN)
    }

    /// Renders the final URL and body by substituting the provided tokens.
    ///
    /// Values substituted into the URL are percent-encoded; body
    /// substitutions are literal.
    #[must_use]
    pub fn render(&self, tokens: &TokenValues) -> RenderedRequest {
        let mut url = self.url.clone();
        let mut body = self.body.clone();

        for (token, value) in tokens.iter() {
            url = url.replace(token, &urlencoding::encode(value));
            body = body.replace(token, value);
        }

        RenderedRequest { url, body }
    }
}

/// The token values provided for one rendering.
#[derive(Debug, Clone, Default)]
pub struct TokenValues {
    value: Option<String>,
    cie_x: Option<String>,
    cie_y: Option<String>,
}

impl TokenValues {
    /// Provides only the primary value token.
    #[must_use]
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Adds chromaticity coordinates, formatted to 4 decimal digits.
    #[must_use]
    pub fn with_chromaticity(mut self, x: f64, y: f64) -> Self {
        let mut xs = String::new();
        let mut ys = String::new();
        // Writing to a String cannot fail.
        let _ = write!(xs, "{x:.4}");
        let _ = write!(ys, "{y:.4}");
        self.cie_x = Some(xs);
        self.cie_y = Some(ys);
        self
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (VALUE_TOKEN, self.value.as_deref()),
            (CIE_X_TOKEN, self.cie_x.as_deref()),
            (CIE_Y_TOKEN, self.cie_y.as_deref()),
        ]
        .into_iter()
        .filter_map(|(token, value)| value.map(|v| (token, v)))
    }
}

/// A fully rendered URL and body, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRequest {
    /// The final request URL.
    pub url: String,
    /// The final request body; empty means no body.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_primary_token_in_url() {
        let template = RequestTemplate::new("http://h/set/%s", "");
        let rendered = template.render(&TokenValues::value("AABBCC"));
        assert_eq!(rendered.url, "http://h/set/AABBCC");
        assert_eq!(rendered.body, "");
    }

    #[test]
    fn substitutes_every_occurrence() {
        let template = RequestTemplate::new("http://h/%s", "{\"rgb\": \"%s\", \"raw\": \"%s\"}");
        let rendered = template.render(&TokenValues::value("00FF00"));
        assert_eq!(rendered.url, "http://h/00FF00");
        assert_eq!(rendered.body, "{\"rgb\": \"00FF00\", \"raw\": \"00FF00\"}");
    }

    #[test]
    fn unused_chromaticity_tokens_left_verbatim() {
        let template = RequestTemplate::new("http://h/%s?x=%cie-x%", "");
        let rendered = template.render(&TokenValues::value("AABBCC"));
        assert_eq!(rendered.url, "http://h/AABBCC?x=%cie-x%");
    }

    #[test]
    fn chromaticity_substitution() {
        let template =
            RequestTemplate::new("http://h/xy", "{\"x\": %cie-x%, \"y\": %cie-y%}");
        let rendered = template.render(&TokenValues::value("FFFFFF").with_chromaticity(0.3127, 0.329));
        assert_eq!(rendered.body, "{\"x\": 0.3127, \"y\": 0.3290}");
    }

    #[test]
    fn unrecognized_tokens_untouched() {
        let template = RequestTemplate::new("http://h/%other%/%s", "");
        let rendered = template.render(&TokenValues::value("1"));
        assert_eq!(rendered.url, "http://h/%other%/1");
    }

    #[test]
    fn url_values_are_percent_encoded() {
        let template = RequestTemplate::new("http://h/set/%s", "%s");
        let rendered = template.render(&TokenValues::value("a b"));
        assert_eq!(rendered.url, "http://h/set/a%20b");
        // Body substitutions stay literal.
        assert_eq!(rendered.body, "a b");
    }

    #[test]
    fn mentions_chromaticity() {
        assert!(RequestTemplate::new("http://h/?x=%cie-x%", "").mentions_chromaticity());
        assert!(RequestTemplate::new("http://h/", "y=%cie-y%").mentions_chromaticity());
        assert!(!RequestTemplate::new("http://h/set/%s", "").mentions_chromaticity());
    }
}
