//! Terminal output tokenizer
//!
//! A stateful parser that converts bytes into actions for the screen.
//! Based on the VT500-series parser model from <https://vt100.net/emu/dec_ansi_parser>

mod actions;
mod osc;
mod state;

pub use actions::{Action, ControlCode, CsiAction, EscAction};
pub use state::{Parser, MAX_STRING_LEN};
