//! Terminal Output Renderer Library
//!
//! Reconstructs the screen a program's terminal output would produce and
//! renders it as HTML or plain text, without a terminal attached.
//! This crate provides:
//!
//! - `core`: Screen model, cells, lines, cursor, styles, escape dispatch
//! - `parser`: Streaming tokenizer for terminal output
//! - `render`: Per-line HTML serializer
//! - `terminal`: Executor applying parsed actions to the screen
//! - `app`: Configuration
//!
//! ```
//! let html = term_render::render_html(b"\x1b[31mred\x1b[0m plain");
//! assert_eq!(html, "<span class=\"term-fg31\">red</span> plain");
//! ```

pub mod app;
pub mod core;
pub mod parser;
pub mod render;
pub mod terminal;

pub use terminal::Terminal;

/// Render terminal output as HTML with the default settings
pub fn render_html(input: &[u8]) -> String {
    let mut term = Terminal::new();
    term.process(input);
    term.finish();
    term.render_html()
}

/// Render terminal output as plain text
pub fn render_text(input: &[u8]) -> String {
    let mut term = Terminal::new();
    term.process(input);
    term.finish();
    term.render_text()
}
