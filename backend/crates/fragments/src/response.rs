//! Transport-neutral fragment responses.

/// Header naming client-side events the fragment wants re-broadcast.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Header instructing the client to navigate to a new location.
pub const HX_REDIRECT: &str = "HX-Redirect";

/// A rendered fragment plus the metadata the transport needs to answer.
///
/// Statuses are plain `u16` so the crate stays free of any HTTP framework;
/// adapters map them onto their own status types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentResponse {
    status: u16,
    headers: Vec<(String, String)>,
    html: String,
}

impl FragmentResponse {
    /// A `200 OK` response carrying `html`.
    #[must_use]
    pub fn ok(html: impl Into<String>) -> Self {
        Self::with_status(200, html)
    }

    /// A response carrying `html` under an explicit status.
    #[must_use]
    pub fn with_status(status: u16, html: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            html: html.into(),
        }
    }

    /// A `200 OK` response whose only purpose is an [`HX_REDIRECT`] header.
    ///
    /// HTMX performs client-side navigation on the header; the body is left
    /// empty and ignored.
    #[must_use]
    pub fn hx_redirect(location: impl Into<String>) -> Self {
        Self::ok("").header(HX_REDIRECT, location)
    }

    /// Set a header, replacing any earlier value under the same name.
    ///
    /// Header names compare case-insensitively.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header in place, replacing any earlier value under the same
    /// name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            existing.1 = value;
        } else {
            self.headers.push((name, value));
        }
    }

    /// Response status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The rendered HTML body.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}
