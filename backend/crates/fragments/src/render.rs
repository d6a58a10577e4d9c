//! Rendering port between controllers and the template layer.

use std::fmt;

use thiserror::Error;

use crate::data::FragmentData;
use crate::response::FragmentResponse;

/// Identifier a controller declares for its template, e.g.
/// `tickets.showTicketModal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewName(String);

impl ViewName {
    /// Wrap a view identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Raised when a view cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFault {
    /// No template is registered under the requested view identifier.
    #[error("no template registered for view `{view}`")]
    UnknownView {
        /// The identifier that failed to resolve.
        view: String,
    },
    /// The template exists but could not be evaluated against the data.
    #[error("template for view `{view}` failed: {message}")]
    Template {
        /// The identifier of the failing template.
        view: String,
        /// Renderer-specific failure detail.
        message: String,
    },
}

/// HTML produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFragment {
    html: String,
}

impl RenderedFragment {
    /// Wrap rendered HTML.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The HTML as a string slice.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Promote the fragment to a `200 OK` response.
    #[must_use]
    pub fn into_response(self) -> FragmentResponse {
        FragmentResponse::ok(self.html)
    }
}

/// Port implemented by the template layer.
pub trait RenderFragment: Send + Sync {
    /// Render `view` against `data`.
    fn render(&self, view: &ViewName, data: &FragmentData) -> Result<RenderedFragment, RenderFault>;
}

/// Escape a string for interpolation into HTML text or attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renderer for tests and demos: wraps the assigned data in a tagged
/// `<section>` without consulting any template source.
#[derive(Debug, Clone, Default)]
pub struct FixtureRenderer;

impl RenderFragment for FixtureRenderer {
    fn render(&self, view: &ViewName, data: &FragmentData) -> Result<RenderedFragment, RenderFault> {
        let payload = serde_json::to_string(data).map_err(|err| RenderFault::Template {
            view: view.to_string(),
            message: err.to_string(),
        })?;
        Ok(RenderedFragment::new(format!(
            "<section data-view=\"{view}\">{payload}</section>"
        )))
    }
}
