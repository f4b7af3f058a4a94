//! Screen Core Module
//!
//! The mutable state reconstructed from terminal output:
//! - Cells holding a character or an embedded element, plus a style
//! - Lines that grow as they are written and carry namespaced metadata
//! - The screen: lines, cursor, and active style
//! - Escape sequence dispatch onto the screen
//!
//! Given the same sequence of operations, the screen always ends up in the
//! same state.

mod cell;
mod cursor;
mod escape;
mod line;
mod screen;
mod style;

pub use cell::{Cell, CellContent, Element};
pub use cursor::Cursor;
pub use line::{Line, Metadata, END_OF_LINE, START_OF_LINE};
pub use screen::Screen;
pub use style::{Color, Style};
