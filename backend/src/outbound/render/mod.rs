//! Fragment rendering adapters.

mod html_renderer;

pub use html_renderer::HtmlRenderer;
