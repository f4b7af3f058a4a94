//! Line serializers
//!
//! The screen hands each line to a [`LineRenderer`] and joins the results;
//! the renderer decides what a line looks like as output text.

mod html;

pub use html::HtmlRenderer;
pub(crate) use html::html_escape_into;

use crate::core::Line;

/// Per-line serializer used by [`crate::core::Screen::render_markup`]
pub trait LineRenderer {
    /// Render one line's cells and metadata
    fn render_line(&self, line: &Line) -> String;
}
