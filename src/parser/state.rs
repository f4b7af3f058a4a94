//! Parser State Machine
//!
//! A VT500-style byte state machine. It accepts input in arbitrary chunks
//! (a sequence or a UTF-8 character may be split across calls) and produces
//! actions in input order.
//!
//! # States
//!
//! - Ground: normal text, UTF-8 decoded
//! - Escape / EscapeIntermediate: after ESC
//! - CsiEntry / CsiParam / CsiIntermediate / CsiIgnore: `ESC [` sequences
//! - OscString: `ESC ]` payload, terminated by BEL or ST
//! - ApcString: `ESC _` payload, terminated by BEL or ST
//! - IgnoreString: `ESC P`, `ESC X`, `ESC ^` payloads, discarded
//!
//! Reference: <https://vt100.net/emu/dec_ansi_parser>

use std::collections::BTreeMap;

use super::actions::{Action, ControlCode, CsiAction, EscAction};
use super::osc;

/// Maximum number of CSI parameters kept; extras are dropped
const MAX_PARAMS: usize = 32;
/// Maximum length of a single CSI parameter string
const MAX_PARAM_LEN: usize = 32;
/// Maximum OSC/APC payload size in bytes
pub const MAX_STRING_LEN: usize = 64 * 1024;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    OscString,
    ApcString,
    IgnoreString,
}

/// Which string sequence an ESC interrupted, so `ESC \` can terminate it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingString {
    Osc,
    Apc,
    Ignore,
}

/// The terminal output parser
#[derive(Debug)]
pub struct Parser {
    state: State,
    /// Intermediate bytes collected during parsing
    intermediates: Vec<u8>,
    /// Completed CSI parameters
    params: Vec<String>,
    /// Current parameter being built
    current_param: String,
    /// Private marker of the current CSI sequence
    private_marker: Option<char>,
    /// OSC/APC payload
    string_buf: Vec<u8>,
    /// Payload exceeded `MAX_STRING_LEN` and will be discarded
    string_overflow: bool,
    /// String sequence waiting for the `\` of an `ESC \` terminator
    pending_string: Option<PendingString>,
    /// UTF-8 decoder state
    utf8_buffer: Vec<u8>,
    utf8_remaining: u8,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in the ground state
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            intermediates: Vec::with_capacity(4),
            params: Vec::with_capacity(16),
            current_param: String::new(),
            private_marker: None,
            string_buf: Vec::with_capacity(256),
            string_overflow: false,
            pending_string: None,
            utf8_buffer: Vec::with_capacity(4),
            utf8_remaining: 0,
        }
    }

    /// Reset the parser to initial state
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.clear_params();
        self.clear_string();
        self.pending_string = None;
        self.utf8_buffer.clear();
        self.utf8_remaining = 0;
    }

    /// Clear parameter state
    fn clear_params(&mut self) {
        self.intermediates.clear();
        self.params.clear();
        self.current_param.clear();
        self.private_marker = None;
    }

    fn clear_string(&mut self) {
        self.string_buf.clear();
        self.string_overflow = false;
    }

    /// Process a chunk of bytes, returning actions
    pub fn parse(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        for &byte in data {
            self.process_byte(byte, &mut actions);
        }
        actions
    }

    /// Flush an incomplete UTF-8 character at end of input
    pub fn finish(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.utf8_remaining > 0 {
            self.utf8_buffer.clear();
            self.utf8_remaining = 0;
            actions.push(Action::Print(char::REPLACEMENT_CHARACTER));
        }
        actions
    }

    /// Process a single byte
    fn process_byte(&mut self, byte: u8, out: &mut Vec<Action>) {
        // Handle UTF-8 continuation in ground state
        if self.state == State::Ground && self.utf8_remaining > 0 {
            if (0x80..=0xBF).contains(&byte) {
                self.continue_utf8(byte, out);
                return;
            }
            // Invalid continuation: replace what we had, then handle the
            // byte on its own.
            self.utf8_buffer.clear();
            self.utf8_remaining = 0;
            out.push(Action::Print(char::REPLACEMENT_CHARACTER));
        }

        match self.state {
            State::OscString | State::ApcString | State::IgnoreString => {
                self.process_string(byte, out);
                return;
            }
            _ => {}
        }

        // C0 controls are handled in every non-string state
        if byte < 0x20 {
            self.process_c0(byte, out);
            return;
        }

        // DEL is ignored
        if byte == 0x7F {
            return;
        }

        match self.state {
            State::Ground => self.process_ground(byte, out),
            State::Escape => self.process_escape(byte, out),
            State::EscapeIntermediate => self.process_escape_intermediate(byte, out),
            State::CsiEntry => self.process_csi_entry(byte, out),
            State::CsiParam => self.process_csi_param(byte, out),
            State::CsiIntermediate => self.process_csi_intermediate(byte, out),
            State::CsiIgnore => self.process_csi_ignore(byte),
            State::OscString | State::ApcString | State::IgnoreString => {}
        }
    }

    /// Process C0 control characters (0x00-0x1F)
    fn process_c0(&mut self, byte: u8, out: &mut Vec<Action>) {
        match byte {
            // CAN, SUB - cancel current sequence
            0x18 | 0x1A => {
                self.state = State::Ground;
                self.pending_string = None;
            }
            // ESC - start escape sequence
            0x1B => {
                self.state = State::Escape;
                self.clear_params();
            }
            0x08 => out.push(Action::Control(ControlCode::Backspace)),
            // TAB is kept as a literal character
            0x09 => out.push(Action::Print('\t')),
            0x0A..=0x0C => out.push(Action::Control(ControlCode::LineFeed)),
            0x0D => out.push(Action::Control(ControlCode::CarriageReturn)),
            _ => tracing::trace!("ignoring C0 control 0x{:02x}", byte),
        }
    }

    /// Process bytes in ground state (normal text)
    fn process_ground(&mut self, byte: u8, out: &mut Vec<Action>) {
        match byte {
            0x20..=0x7E => out.push(Action::Print(byte as char)),
            0xC0..=0xDF => self.start_utf8(byte, 1),
            0xE0..=0xEF => self.start_utf8(byte, 2),
            0xF0..=0xF7 => self.start_utf8(byte, 3),
            // Stray continuation bytes and invalid lead bytes
            _ => out.push(Action::Print(char::REPLACEMENT_CHARACTER)),
        }
    }

    /// Start UTF-8 sequence
    fn start_utf8(&mut self, byte: u8, remaining: u8) {
        self.utf8_buffer.clear();
        self.utf8_buffer.push(byte);
        self.utf8_remaining = remaining;
    }

    /// Process UTF-8 continuation byte
    fn continue_utf8(&mut self, byte: u8, out: &mut Vec<Action>) {
        self.utf8_buffer.push(byte);
        self.utf8_remaining -= 1;

        if self.utf8_remaining == 0 {
            let c = std::str::from_utf8(&self.utf8_buffer)
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            self.utf8_buffer.clear();
            out.push(Action::Print(c));
        }
    }

    /// Process bytes in escape state
    fn process_escape(&mut self, byte: u8, out: &mut Vec<Action>) {
        // ESC \ terminates a string that the ESC interrupted
        if let Some(pending) = self.pending_string.take() {
            if byte == b'\\' {
                self.state = State::Ground;
                self.terminate_string(pending, out);
                return;
            }
            self.clear_string();
        }

        match byte {
            // Intermediate bytes
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::EscapeIntermediate;
            }
            // CSI (ESC [)
            b'[' => {
                self.state = State::CsiEntry;
                self.clear_params();
            }
            // OSC (ESC ])
            b']' => self.start_string(State::OscString),
            // APC (ESC _)
            b'_' => self.start_string(State::ApcString),
            // DCS (ESC P), SOS (ESC X), PM (ESC ^)
            b'P' | b'X' | b'^' => self.start_string(State::IgnoreString),
            // Final bytes - dispatch ESC sequence
            0x30..=0x7E => {
                self.state = State::Ground;
                self.dispatch_esc(byte, out);
            }
            _ => self.state = State::Ground,
        }
    }

    /// Process bytes in escape intermediate state
    fn process_escape_intermediate(&mut self, byte: u8, out: &mut Vec<Action>) {
        match byte {
            0x20..=0x2F => self.intermediates.push(byte),
            0x30..=0x7E => {
                self.state = State::Ground;
                self.dispatch_esc(byte, out);
            }
            _ => self.state = State::Ground,
        }
    }

    /// Dispatch ESC sequence
    fn dispatch_esc(&mut self, final_byte: u8, out: &mut Vec<Action>) {
        let action = if self.intermediates.is_empty() {
            match final_byte {
                b'D' => EscAction::Index,
                b'E' => EscAction::NextLine,
                b'M' => EscAction::ReverseIndex,
                b'c' => EscAction::FullReset,
                _ => EscAction::Unknown(vec![final_byte]),
            }
        } else {
            let mut seq = self.intermediates.clone();
            seq.push(final_byte);
            EscAction::Unknown(seq)
        };

        out.push(Action::Esc(action));
    }

    /// Process bytes in CSI entry state
    fn process_csi_entry(&mut self, byte: u8, out: &mut Vec<Action>) {
        match byte {
            // Private marker
            b'?' | b'>' | b'<' | b'=' => {
                self.private_marker = Some(byte as char);
                self.state = State::CsiParam;
            }
            _ => {
                self.state = State::CsiParam;
                self.process_csi_param(byte, out);
            }
        }
    }

    /// Process bytes in CSI param state
    fn process_csi_param(&mut self, byte: u8, out: &mut Vec<Action>) {
        match byte {
            b'0'..=b'9' => {
                if self.current_param.len() < MAX_PARAM_LEN {
                    self.current_param.push(byte as char);
                }
            }
            // Parameter and subparameter separators
            b';' | b':' => self.push_param(),
            // Intermediate bytes
            0x20..=0x2F => {
                self.finish_params();
                self.intermediates.push(byte);
                self.state = State::CsiIntermediate;
            }
            // Final bytes - dispatch
            0x40..=0x7E => {
                self.finish_params();
                self.state = State::Ground;
                self.dispatch_csi(byte, out);
            }
            // Private markers in the wrong position
            _ => self.state = State::CsiIgnore,
        }
    }

    fn push_param(&mut self) {
        let param = std::mem::take(&mut self.current_param);
        if self.params.len() < MAX_PARAMS {
            self.params.push(param);
        }
    }

    /// Close the last parameter. A sequence with no parameter bytes at all
    /// keeps an empty list.
    fn finish_params(&mut self) {
        if !self.current_param.is_empty() || !self.params.is_empty() {
            self.push_param();
        }
    }

    /// Process bytes in CSI intermediate state
    fn process_csi_intermediate(&mut self, byte: u8, out: &mut Vec<Action>) {
        match byte {
            0x20..=0x2F => self.intermediates.push(byte),
            0x40..=0x7E => {
                self.state = State::Ground;
                self.dispatch_csi(byte, out);
            }
            _ => self.state = State::CsiIgnore,
        }
    }

    /// Process bytes in CSI ignore state
    fn process_csi_ignore(&mut self, byte: u8) {
        if (0x40..=0x7E).contains(&byte) {
            self.state = State::Ground;
        }
    }

    /// Dispatch CSI sequence
    fn dispatch_csi(&mut self, final_byte: u8, out: &mut Vec<Action>) {
        out.push(Action::Csi(CsiAction {
            params: std::mem::take(&mut self.params),
            intermediates: std::mem::take(&mut self.intermediates),
            private_marker: self.private_marker.take(),
            final_char: final_byte as char,
        }));
    }

    fn start_string(&mut self, state: State) {
        self.state = state;
        self.clear_string();
    }

    /// Process bytes inside OSC/APC/DCS/SOS/PM strings
    fn process_string(&mut self, byte: u8, out: &mut Vec<Action>) {
        let pending = match self.state {
            State::OscString => PendingString::Osc,
            State::ApcString => PendingString::Apc,
            _ => PendingString::Ignore,
        };

        match byte {
            // BEL terminates. Payloads are UTF-8, so 0x9C is a continuation
            // byte here and never an 8-bit ST.
            0x07 => {
                self.state = State::Ground;
                self.terminate_string(pending, out);
            }
            // ESC may be the start of ST (ESC \)
            0x1B => {
                self.state = State::Escape;
                self.clear_params();
                self.pending_string = Some(pending);
            }
            0x18 | 0x1A => {
                self.state = State::Ground;
                self.clear_string();
            }
            _ if pending == PendingString::Ignore => {}
            _ => {
                if self.string_buf.len() < MAX_STRING_LEN {
                    self.string_buf.push(byte);
                } else {
                    self.string_overflow = true;
                }
            }
        }
    }

    /// Terminate string sequence and dispatch its payload
    fn terminate_string(&mut self, kind: PendingString, out: &mut Vec<Action>) {
        if self.string_overflow {
            tracing::debug!("discarding string sequence over {} bytes", MAX_STRING_LEN);
            self.clear_string();
            return;
        }

        let payload = String::from_utf8_lossy(&self.string_buf).into_owned();
        self.clear_string();

        match kind {
            PendingString::Osc => {
                if let Some(element) = osc::parse_element(&payload) {
                    out.push(Action::Element(element));
                }
            }
            PendingString::Apc => {
                if let Some(action) = parse_metadata(&payload) {
                    out.push(action);
                }
            }
            PendingString::Ignore => {}
        }
    }
}

/// Parse an APC payload of the form `namespace;key=value;key=value`
fn parse_metadata(payload: &str) -> Option<Action> {
    let mut parts = payload.split(';');
    let namespace = parts.next().filter(|ns| !ns.is_empty())?;

    let entries: BTreeMap<String, String> = parts
        .filter_map(|part| part.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if entries.is_empty() {
        tracing::debug!("ignoring APC without entries: {:?}", payload);
        return None;
    }

    Some(Action::Metadata {
        namespace: namespace.to_string(),
        entries,
    })
}
