//! Terminal Executor
//!
//! Ties together the parser and the screen model, applying parsed actions
//! to the screen in input order. This is the main integration point between
//! parsing and the screen model.

use std::sync::Arc;

use crate::core::Screen;
use crate::parser::{Action, ControlCode, CsiAction, EscAction, Parser};
use crate::render::{HtmlRenderer, LineRenderer};

/// Terminal executor that processes parsed actions and updates the screen
#[derive(Debug, Default)]
pub struct Terminal {
    /// The reconstructed screen
    screen: Screen,
    /// The escape sequence parser
    parser: Parser,
}

impl Terminal {
    /// Create a terminal with an empty screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reference to the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Get a mutable reference to the screen
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Process a chunk of output. Sequences may be split across calls.
    pub fn process(&mut self, data: &[u8]) {
        let actions = self.parser.parse(data);
        for action in actions {
            self.apply_action(action);
        }
    }

    /// Signal end of input, flushing a trailing partial character
    pub fn finish(&mut self) {
        for action in self.parser.finish() {
            self.apply_action(action);
        }
    }

    /// Render the screen as HTML with the default renderer
    pub fn render_html(&self) -> String {
        self.render_with(&HtmlRenderer::default())
    }

    /// Render the screen with a custom line renderer
    pub fn render_with<R: LineRenderer + ?Sized>(&self, renderer: &R) -> String {
        self.screen.render_markup(renderer)
    }

    /// Render the screen as plain text
    pub fn render_text(&self) -> String {
        self.screen.render_plain_text()
    }

    /// Finish input and take the screen
    pub fn into_screen(mut self) -> Screen {
        self.finish();
        self.screen
    }

    /// Apply a single parsed action to the screen
    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Print(c) => self.screen.append_char(c),
            Action::Control(code) => self.execute_control(code),
            Action::Csi(csi) => self.execute_csi(csi),
            Action::Esc(esc) => self.execute_esc(esc),
            Action::Element(element) => self.screen.append_element(Arc::new(element)),
            Action::Metadata { namespace, entries } => {
                self.screen.set_line_metadata(&namespace, entries);
            }
        }
    }

    fn execute_control(&mut self, code: ControlCode) {
        match code {
            ControlCode::LineFeed => self.screen.line_feed(),
            ControlCode::CarriageReturn => self.screen.carriage_return(),
            ControlCode::Backspace => self.screen.backspace(),
        }
    }

    /// Execute a CSI sequence
    fn execute_csi(&mut self, csi: CsiAction) {
        if !csi.is_standard() {
            tracing::debug!(
                "ignoring CSI {:?}{:?} {:?} {}",
                csi.private_marker,
                csi.params,
                csi.intermediates,
                csi.final_char
            );
            return;
        }

        self.screen.apply_escape(csi.final_char, &csi.params);
    }

    /// Execute an ESC sequence
    fn execute_esc(&mut self, esc: EscAction) {
        match esc {
            EscAction::Index => self.screen.index(),
            EscAction::NextLine => self.screen.line_feed(),
            EscAction::ReverseIndex => self.screen.reverse_line_feed(),
            EscAction::FullReset => self.screen.reset(),
            EscAction::Unknown(seq) => {
                tracing::debug!("ignoring ESC sequence {:?}", String::from_utf8_lossy(&seq));
            }
        }
    }
}
