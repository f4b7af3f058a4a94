//! HTML line serializer
//!
//! Each line becomes:
//! - one processing instruction per metadata namespace, e.g. `<?bk t="1"?>`
//! - runs of equally styled cells wrapped in `<span class=".." style="..">`
//! - elements as `<img>` or `<a>`
//!
//! Trailing blanks are trimmed and an empty line renders as `blank_line`.

use std::fmt::Write;

use super::LineRenderer;
use crate::core::{Cell, CellContent, Color, Element, Line, Style};

/// Renders lines as HTML fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRenderer {
    /// Prefix for CSS class names (`term` gives `term-fg31`)
    pub class_prefix: String,
    /// Output for a line with no visible content
    pub blank_line: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            class_prefix: "term".to_string(),
            blank_line: "&nbsp;".to_string(),
        }
    }
}

impl HtmlRenderer {
    /// Create a renderer with the default class prefix and blank line
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    fn write_metadata(&self, out: &mut String, line: &Line) {
        for (namespace, entries) in line.metadata() {
            if !is_name(namespace) {
                tracing::debug!("skipping metadata namespace {:?}", namespace);
                continue;
            }

            let _ = write!(out, "<?{namespace}");
            for (key, value) in entries.iter().filter(|(key, _)| is_name(key)) {
                let _ = write!(out, " {key}=\"");
                html_escape_into(out, value);
                out.push('"');
            }
            out.push_str("?>");
        }
    }

    fn open_span(&self, out: &mut String, style: &Style) {
        out.push_str("<span");

        let classes = style.classes(&self.class_prefix);
        if !classes.is_empty() {
            out.push_str(" class=\"");
            html_escape_into(out, &classes.join(" "));
            out.push('"');
        }
        if let Some(css) = style.inline_css() {
            let _ = write!(out, " style=\"{css}\"");
        }

        out.push('>');
    }
}

impl LineRenderer for HtmlRenderer {
    fn render_line(&self, line: &Line) -> String {
        let mut out = String::new();
        self.write_metadata(&mut out, line);

        let cells = visible_cells(line.cells());
        if cells.is_empty() {
            out.push_str(&self.blank_line);
            return out;
        }

        for run in cells.chunk_by(|a, b| a.style == b.style) {
            let style = &run[0].style;
            let styled = !style.is_plain();

            if styled {
                self.open_span(&mut out, style);
            }
            for cell in run {
                match &cell.content {
                    CellContent::Char(c) => html_escape_char(&mut out, *c),
                    CellContent::Element(element) => write_element(&mut out, element),
                }
            }
            if styled {
                out.push_str("</span>");
            }
        }

        out
    }
}

/// Drop trailing spaces and tabs that would render as nothing
fn visible_cells(cells: &[Cell]) -> &[Cell] {
    let end = cells
        .iter()
        .rposition(|cell| !is_invisible_blank(cell))
        .map_or(0, |i| i + 1);
    &cells[..end]
}

/// A blank shows nothing unless something paints its background
fn is_invisible_blank(cell: &Cell) -> bool {
    matches!(cell.content, CellContent::Char(' ' | '\t'))
        && cell.style.bg == Color::Default
        && !cell.style.inverse
}

fn write_element(out: &mut String, element: &Element) {
    match element {
        Element::Image {
            url,
            alt,
            width,
            height,
        } => {
            out.push_str("<img src=\"");
            html_escape_into(out, url);
            out.push_str("\" alt=\"");
            html_escape_into(out, alt);
            out.push('"');
            if let Some(width) = width {
                out.push_str(" width=\"");
                html_escape_into(out, width);
                out.push('"');
            }
            if let Some(height) = height {
                out.push_str(" height=\"");
                html_escape_into(out, height);
                out.push('"');
            }
            out.push('>');
        }
        Element::Link { url, content } => {
            out.push_str("<a href=\"");
            html_escape_into(out, url);
            out.push_str("\">");
            html_escape_into(out, content);
            out.push_str("</a>");
        }
    }
}

/// Processing instruction names and attribute keys must be plain words
fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn html_escape_char(out: &mut String, c: char) {
    match c {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// HTML-escape a string into the output buffer
pub(crate) fn html_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        html_escape_char(out, c);
    }
}
