//! Screen cell
//!
//! Represents a single position in the screen grid: either a character or an
//! embedded element, plus the style that was active when it was written.

use std::sync::Arc;

use super::style::Style;

/// A rich item embedded in the output, occupying one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// An image, either an external URL or an inline `data:` URI
    Image {
        url: String,
        alt: String,
        width: Option<String>,
        height: Option<String>,
    },
    /// A clickable link
    Link { url: String, content: String },
}

/// What a cell displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Char(char),
    /// Shared with whoever constructed the element; the cell never owns it
    Element(Arc<Element>),
}

/// A single cell in the screen grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub content: CellContent,
    pub style: Style,
}

impl Default for Cell {
    /// The blank cell used to fill gaps and cleared ranges
    fn default() -> Self {
        Self {
            content: CellContent::Char(' '),
            style: Style::default(),
        }
    }
}

impl Cell {
    /// Create a character cell with the given style
    pub fn new(c: char, style: Style) -> Self {
        Self {
            content: CellContent::Char(c),
            style,
        }
    }

    /// Create an element cell with the given style
    pub fn element(element: Arc<Element>, style: Style) -> Self {
        Self {
            content: CellContent::Element(element),
            style,
        }
    }

    /// The character in this cell, or `None` for element cells
    pub fn char(&self) -> Option<char> {
        match self.content {
            CellContent::Char(c) => Some(c),
            CellContent::Element(_) => None,
        }
    }

    /// The element in this cell, if any
    pub fn as_element(&self) -> Option<&Element> {
        match &self.content {
            CellContent::Element(element) => Some(element),
            CellContent::Char(_) => None,
        }
    }

    /// Check if this cell is the blank placeholder
    pub fn is_empty(&self) -> bool {
        *self == Cell::default()
    }
}
