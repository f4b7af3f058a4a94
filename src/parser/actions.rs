//! Actions produced by the parser
//!
//! These actions represent the semantic meaning of the input, in the order it
//! appeared. The terminal applies them to the screen one by one.

use std::collections::BTreeMap;

use crate::core::Element;

/// Actions produced by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print a character at the cursor
    Print(char),
    /// A control character with an effect on the cursor
    Control(ControlCode),
    /// CSI sequence: ESC [ params final
    Csi(CsiAction),
    /// Non-CSI escape sequence: ESC [intermediates] final
    Esc(EscAction),
    /// An embedded element from an OSC sequence
    Element(Element),
    /// Line metadata from an APC sequence, e.g. `ESC _ bk;t=123 BEL`
    Metadata {
        namespace: String,
        entries: BTreeMap<String, String>,
    },
}

/// C0 controls that move the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    /// LF, VT, FF
    LineFeed,
    /// CR
    CarriageReturn,
    /// BS
    Backspace,
}

/// A parsed CSI sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiAction {
    /// Raw parameter strings, split on `;` (and `:`)
    pub params: Vec<String>,
    /// Intermediate bytes (0x20-0x2F)
    pub intermediates: Vec<u8>,
    /// Private marker (`?`, `>`, `<`, `=`) if present
    pub private_marker: Option<char>,
    /// Final character
    pub final_char: char,
}

impl CsiAction {
    /// True for plain `ESC [ params final` sequences
    pub fn is_standard(&self) -> bool {
        self.private_marker.is_none() && self.intermediates.is_empty()
    }
}

/// Non-CSI escape sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscAction {
    /// ESC D - Index
    Index,
    /// ESC E - Next Line
    NextLine,
    /// ESC M - Reverse Index
    ReverseIndex,
    /// ESC c - Full Reset
    FullReset,
    /// Anything else, as the raw intermediates plus final byte
    Unknown(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csi_is_standard() {
        let mut csi = CsiAction {
            params: vec!["1".to_string()],
            intermediates: vec![],
            private_marker: None,
            final_char: 'm',
        };
        assert!(csi.is_standard());

        csi.private_marker = Some('?');
        assert!(!csi.is_standard());

        csi.private_marker = None;
        csi.intermediates.push(b'!');
        assert!(!csi.is_standard());
    }
}
