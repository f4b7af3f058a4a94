//! Escape sequence dispatch
//!
//! Maps a CSI final character and its parameter strings onto screen
//! mutations. Anything unrecognised is ignored: captured program output is
//! often truncated or malformed and rendering must carry on regardless.

use std::num::IntErrorKind;

use super::line::{END_OF_LINE, START_OF_LINE};
use super::screen::Screen;

impl Screen {
    /// Apply a CSI sequence with final character `code`.
    ///
    /// An empty parameter list is treated as a single empty parameter.
    pub fn apply_escape(&mut self, code: char, params: &[String]) {
        let default = [String::new()];
        let params = if params.is_empty() { &default[..] } else { params };
        let first = params[0].as_str();

        tracing::trace!("CSI {:?} {}", params, code);

        match code {
            // SGR - Select Graphic Rendition
            'm' => self.set_active_color(params),
            // CHA - always column 0, whatever the parameter says
            'G' => self.cursor_mut().col = 0,
            // ED - Erase in Display
            'J' => self.erase_in_display(first),
            // EL - Erase in Line
            'K' => self.erase_in_line(first),
            'A' => self.move_up(first),
            'B' => self.move_down(first),
            'C' => self.move_forward(first),
            'D' => self.move_backward(first),
            _ => tracing::debug!("ignoring CSI {:?} {}", params, code),
        }
    }

    fn erase_in_display(&mut self, mode: &str) {
        let row = self.cursor().row;
        let col = self.cursor().col;

        match mode {
            // Cursor to end of screen
            "0" | "" => {
                self.clear(row, col, END_OF_LINE);
                self.truncate_below_cursor();
            }
            // Start of screen to cursor
            "1" => {
                self.clear(row, START_OF_LINE, col);
                self.truncate_above_cursor();
            }
            // Whole screen; there is no scrollback, so 3 is the same as 2
            "2" | "3" => self.erase_all(),
            _ => tracing::debug!("ignoring erase in display mode {:?}", mode),
        }
    }

    fn erase_in_line(&mut self, mode: &str) {
        let row = self.cursor().row;
        let col = self.cursor().col;

        match mode {
            "0" | "" => self.clear(row, col, END_OF_LINE),
            "1" => self.clear(row, START_OF_LINE, col),
            "2" => self.clear(row, START_OF_LINE, END_OF_LINE),
            _ => tracing::debug!("ignoring erase in line mode {:?}", mode),
        }
    }
}

/// Parse a cursor movement count.
///
/// An empty parameter means 1 and anything that is not a number means 0.
/// Counts are limited to the range of an `i8`; larger values saturate.
pub(crate) fn ansi_int(param: &str) -> i64 {
    if param.is_empty() {
        return 1;
    }
    match param.parse::<i64>() {
        Ok(n) => n.clamp(i64::from(i8::MIN), i64::from(i8::MAX)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::from(i8::MAX),
            IntErrorKind::NegOverflow => i64::from(i8::MIN),
            _ => 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::Color;

    fn params(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn screen_with(rows: &[&str]) -> Screen {
        let mut screen = Screen::new();
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                screen.line_feed();
            }
            screen.append_many(row.chars());
        }
        screen
    }

    fn texts(screen: &Screen) -> Vec<String> {
        screen.lines().iter().map(|line| line.text()).collect()
    }

    #[test]
    fn test_ansi_int() {
        assert_eq!(ansi_int(""), 1);
        assert_eq!(ansi_int("0"), 0);
        assert_eq!(ansi_int("5"), 5);
        assert_eq!(ansi_int("abc"), 0);
        assert_eq!(ansi_int("1;2"), 0);
        assert_eq!(ansi_int("-3"), -3);
        assert_eq!(ansi_int("200"), 127);
        assert_eq!(ansi_int("99999999999999999999999"), 127);
        assert_eq!(ansi_int("-99999999999999999999999"), -128);
    }

    #[test]
    fn test_sgr_dispatch() {
        let mut screen = Screen::new();
        screen.apply_escape('m', &params(&["31"]));
        assert_eq!(screen.style().fg, Color::RED);

        screen.apply_escape('m', &[]);
        assert!(screen.style().is_plain());
    }

    #[test]
    fn test_cursor_movement_dispatch() {
        let mut screen = Screen::new();
        screen.apply_escape('B', &params(&["3"]));
        screen.apply_escape('C', &[]);
        assert_eq!(screen.cursor().row, 3);
        assert_eq!(screen.cursor().col, 1);

        screen.apply_escape('A', &params(&["10"]));
        screen.apply_escape('D', &params(&["10"]));
        assert_eq!(screen.cursor().row, 0);
        assert_eq!(screen.cursor().col, 0);
    }

    #[test]
    fn test_column_reset_ignores_parameter() {
        let mut screen = screen_with(&["abcdef"]);
        screen.apply_escape('G', &params(&["4"]));
        assert_eq!(screen.cursor().col, 0);
    }

    #[test]
    fn test_erase_in_line() {
        let mut screen = screen_with(&["ABCDEFGHIJ"]);
        screen.cursor_mut().col = 5;
        screen.apply_escape('K', &[]);
        assert_eq!(texts(&screen), vec!["ABCDE"]);

        screen.cursor_mut().col = 1;
        screen.apply_escape('K', &params(&["1"]));
        assert_eq!(texts(&screen), vec!["  CDE"]);

        screen.apply_escape('K', &params(&["2"]));
        assert!(screen.line(0).unwrap().is_empty());
    }

    #[test]
    fn test_erase_in_line_unknown_mode() {
        let mut screen = screen_with(&["ABC"]);
        screen.apply_escape('K', &params(&["7"]));
        assert_eq!(texts(&screen), vec!["ABC"]);
    }

    #[test]
    fn test_erase_display_below() {
        let mut screen = screen_with(&["one", "two", "three"]);
        screen.cursor_mut().row = 1;
        screen.cursor_mut().col = 1;
        screen.apply_escape('J', &params(&["0"]));

        assert_eq!(texts(&screen), vec!["one", "t"]);
    }

    #[test]
    fn test_erase_display_above() {
        let mut screen = screen_with(&["one", "two", "three"]);
        screen.cursor_mut().row = 1;
        screen.cursor_mut().col = 1;
        screen.apply_escape('J', &params(&["1"]));

        assert_eq!(texts(&screen), vec!["  o", "three"]);
        assert_eq!(screen.cursor().row, 0);
        assert_eq!(screen.cursor().col, 1);
    }

    #[test]
    fn test_erase_display_above_past_last_row() {
        let mut screen = screen_with(&["abc", "def"]);
        screen.line_feed();
        screen.apply_escape('J', &params(&["1"]));

        assert!(screen.lines().is_empty());
        assert_eq!(screen.cursor().row, 0);

        screen.append_char('X');
        assert_eq!(texts(&screen), vec!["X"]);
    }

    #[test]
    fn test_erase_display_all() {
        for mode in ["2", "3"] {
            let mut screen = screen_with(&["one", "two"]);
            screen.apply_escape('m', &params(&["1"]));
            screen.apply_escape('J', &params(&[mode]));

            assert!(screen.lines().is_empty());
            assert_eq!(screen.cursor().row, 0);
            assert_eq!(screen.cursor().col, 0);
            assert!(screen.style().bold);
        }
    }

    #[test]
    fn test_unknown_code_is_ignored() {
        let mut screen = screen_with(&["abc"]);
        let before = screen.clone();
        screen.apply_escape('Z', &params(&["1"]));
        screen.apply_escape('H', &[]);
        assert_eq!(screen, before);
    }
}
