//! Screen model implementation
//!
//! The screen is an unbounded, lazily grown grid of lines plus a cursor and
//! the active style. Rows and columns only come into existence when
//! something is written to them; moving the cursor alone never allocates.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::cell::{Cell, CellContent, Element};
use super::cursor::Cursor;
use super::escape::ansi_int;
use super::line::Line;
use super::style::Style;
use crate::render::LineRenderer;

/// The reconstructed screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    /// Rows, top to bottom
    lines: Vec<Line>,
    /// Where the next write lands
    cursor: Cursor,
    /// Style stamped onto every cell written from now on
    style: Style,
}

impl Screen {
    /// Create an empty screen with the cursor at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Get a line at the given row
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Get a cell at the given position
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.lines.get(row).and_then(|line| line.cell(col))
    }

    /// Get the cursor
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Get a mutable reference to the cursor
    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// The active style
    pub fn style(&self) -> Style {
        self.style
    }

    /// Move the cursor up; an empty parameter means 1
    pub fn move_up(&mut self, param: &str) {
        self.cursor.move_up(ansi_int(param));
    }

    /// Move the cursor down; an empty parameter means 1
    pub fn move_down(&mut self, param: &str) {
        self.cursor.move_down(ansi_int(param));
    }

    /// Move the cursor forward on the line; an empty parameter means 1
    pub fn move_forward(&mut self, param: &str) {
        self.cursor.move_right(ansi_int(param));
    }

    /// Move the cursor backward on the line; an empty parameter means 1
    pub fn move_backward(&mut self, param: &str) {
        self.cursor.move_left(ansi_int(param));
    }

    /// Make sure the cursor's row exists and is long enough to hold the
    /// cursor's column, growing with empty rows and blank cells.
    pub fn ensure_writable(&mut self) -> &mut Line {
        let Cursor { col, row } = self.cursor;
        if self.lines.len() <= row {
            self.lines.resize_with(row + 1, Line::new);
        }

        let line = &mut self.lines[row];
        line.ensure_col(col);
        line
    }

    /// Write content at the cursor with the active style, without moving
    pub fn write_cell(&mut self, content: CellContent) {
        let col = self.cursor.col;
        let cell = Cell {
            content,
            style: self.style,
        };
        self.ensure_writable().set(col, cell);
    }

    /// Write a character at the cursor and advance
    pub fn append_char(&mut self, c: char) {
        self.write_cell(CellContent::Char(c));
        self.cursor.col += 1;
    }

    /// Append each character in order
    pub fn append_many<I>(&mut self, chars: I)
    where
        I: IntoIterator<Item = char>,
    {
        for c in chars {
            self.append_char(c);
        }
    }

    /// Write an element at the cursor and advance
    pub fn append_element(&mut self, element: Arc<Element>) {
        self.write_cell(CellContent::Element(element));
        self.cursor.col += 1;
    }

    /// Merge metadata into the current line under `namespace`.
    ///
    /// Keys that already exist in the namespace are overwritten; other keys
    /// are left alone.
    pub fn set_line_metadata(&mut self, namespace: &str, entries: BTreeMap<String, String>) {
        self.ensure_writable().merge_metadata(namespace, entries);
    }

    /// Replace the active style with the result of an SGR transition
    pub fn set_active_color(&mut self, params: &[String]) {
        self.style = self.style.color(params);
    }

    /// Clear the inclusive column range on `row`; out-of-range rows are ignored
    pub fn clear(&mut self, row: usize, x_start: usize, x_end: usize) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear_range(x_start, x_end);
        }
    }

    /// Drop every row below the cursor row
    pub(crate) fn truncate_below_cursor(&mut self) {
        let row = self.cursor.row;
        if self.lines.len() > row {
            self.lines.truncate(row + 1);
        }
    }

    /// Drop every row above the cursor row; the cursor row becomes row 0
    pub(crate) fn truncate_above_cursor(&mut self) {
        let row = self.cursor.row.min(self.lines.len());
        self.lines.drain(..row);
        self.cursor.row = 0;
    }

    /// Discard all content and home the cursor. The active style is kept.
    pub fn erase_all(&mut self) {
        self.lines.clear();
        self.cursor.reset();
    }

    /// Return to the freshly created state, style included
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Handle linefeed (LF): start of the next row
    pub fn line_feed(&mut self) {
        self.cursor.line_feed();
    }

    /// Handle index (IND): down one row in the same column
    pub fn index(&mut self) {
        self.cursor.index();
    }

    /// Handle reverse index (RI): up one row, stopping at the top
    pub fn reverse_line_feed(&mut self) {
        self.cursor.reverse_line_feed();
    }

    /// Handle carriage return (CR)
    pub fn carriage_return(&mut self) {
        self.cursor.carriage_return();
    }

    /// Handle backspace (BS)
    pub fn backspace(&mut self) {
        self.cursor.backspace();
    }

    /// Render every row with `renderer`, joined by newlines
    pub fn render_markup<R: LineRenderer + ?Sized>(&self, renderer: &R) -> String {
        let rendered: Vec<String> = self
            .lines
            .iter()
            .map(|line| renderer.render_line(line))
            .collect();
        rendered.join("\n")
    }

    /// Render the characters only, dropping elements and styles.
    ///
    /// Trailing spaces and tabs are trimmed from the end of the whole
    /// output; trailing blanks on earlier lines are kept.
    pub fn render_plain_text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text());
        }
        out.trim_end_matches([' ', '\t']).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::Color;

    fn params(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_screen_new() {
        let screen = Screen::new();
        assert!(screen.lines().is_empty());
        assert_eq!(*screen.cursor(), Cursor::new());
        assert!(screen.style().is_plain());
    }

    #[test]
    fn test_append_char() {
        let mut screen = Screen::new();
        screen.append_char('H');
        screen.append_char('i');

        assert_eq!(screen.cell(0, 0).unwrap().char(), Some('H'));
        assert_eq!(screen.cell(1, 0).unwrap().char(), Some('i'));
        assert_eq!(screen.cursor().col, 2);
    }

    #[test]
    fn test_write_cell_does_not_move() {
        let mut screen = Screen::new();
        screen.write_cell(CellContent::Char('X'));
        assert_eq!(screen.cursor().col, 0);
        assert_eq!(screen.line(0).unwrap().len(), 1);
    }

    #[test]
    fn test_write_beyond_bounds_grows() {
        let mut screen = Screen::new();
        screen.cursor_mut().row = 2;
        screen.cursor_mut().col = 3;
        screen.append_char('X');

        assert_eq!(screen.lines().len(), 3);
        assert!(screen.line(0).unwrap().is_empty());
        assert!(screen.line(1).unwrap().is_empty());

        let line = screen.line(2).unwrap();
        assert_eq!(line.len(), 4);
        assert!(line.cells()[..3].iter().all(Cell::is_empty));
        assert_eq!(line.cell(3).unwrap().char(), Some('X'));
    }

    #[test]
    fn test_move_without_write_does_not_allocate() {
        let mut screen = Screen::new();
        screen.move_down("5");
        screen.move_forward("5");
        assert!(screen.lines().is_empty());
        assert_eq!(screen.cursor().row, 5);
        assert_eq!(screen.cursor().col, 5);
    }

    #[test]
    fn test_move_parameters() {
        let mut screen = Screen::new();
        screen.move_down("");
        assert_eq!(screen.cursor().row, 1);

        screen.move_down("abc");
        assert_eq!(screen.cursor().row, 1);

        screen.move_up("9");
        assert_eq!(screen.cursor().row, 0);

        screen.move_forward("3");
        screen.move_backward("");
        assert_eq!(screen.cursor().col, 2);

        screen.move_backward("-4");
        assert_eq!(screen.cursor().col, 6);
    }

    #[test]
    fn test_append_many_and_element() {
        let mut screen = Screen::new();
        screen.append_many("ab".chars());
        screen.append_element(Arc::new(Element::Link {
            url: "https://example.com".to_string(),
            content: "x".to_string(),
        }));

        assert_eq!(screen.cursor().col, 3);
        assert!(screen.cell(2, 0).unwrap().as_element().is_some());
        assert_eq!(screen.render_plain_text(), "ab");
    }

    #[test]
    fn test_style_stamped_on_write() {
        let mut screen = Screen::new();
        screen.append_char('A');
        screen.set_active_color(&params(&["31"]));
        screen.append_char('B');
        screen.set_active_color(&params(&["0"]));
        screen.append_char('C');

        assert!(screen.cell(0, 0).unwrap().style.is_plain());
        assert_eq!(screen.cell(1, 0).unwrap().style.fg, Color::RED);
        assert!(screen.cell(2, 0).unwrap().style.is_plain());
    }

    #[test]
    fn test_set_line_metadata_merges() {
        let mut screen = Screen::new();
        screen.set_line_metadata(
            "bk",
            BTreeMap::from([("t".to_string(), "1".to_string())]),
        );
        screen.set_line_metadata(
            "bk",
            BTreeMap::from([
                ("t".to_string(), "2".to_string()),
                ("x".to_string(), "y".to_string()),
            ]),
        );

        let line = screen.line(0).unwrap();
        assert_eq!(line.len(), 1);
        assert_eq!(line.metadata()["bk"]["t"], "2");
        assert_eq!(line.metadata()["bk"]["x"], "y");
    }

    #[test]
    fn test_clear_out_of_range_row_is_noop() {
        let mut screen = Screen::new();
        screen.append_many("abc".chars());
        screen.clear(5, 0, 1);
        assert_eq!(screen.render_plain_text(), "abc");
    }

    #[test]
    fn test_carriage_return_overwrites() {
        let mut screen = Screen::new();
        screen.append_char('A');
        screen.carriage_return();
        screen.append_char('B');

        assert_eq!(screen.lines().len(), 1);
        assert_eq!(screen.render_plain_text(), "B");
    }

    #[test]
    fn test_plain_text_trims_only_the_end() {
        let mut screen = Screen::new();
        screen.append_many("a  ".chars());
        screen.line_feed();
        screen.append_many("b \t ".chars());

        assert_eq!(screen.render_plain_text(), "a  \nb");
    }

    #[test]
    fn test_plain_text_element_only_line_is_empty() {
        let mut screen = Screen::new();
        screen.append_char('a');
        screen.line_feed();
        screen.append_element(Arc::new(Element::Image {
            url: "https://example.com/a.png".to_string(),
            alt: String::new(),
            width: None,
            height: None,
        }));
        screen.line_feed();
        screen.append_char('b');

        assert_eq!(screen.render_plain_text(), "a\n\nb");
    }

    #[test]
    fn test_reset() {
        let mut screen = Screen::new();
        screen.set_active_color(&params(&["1"]));
        screen.append_char('x');
        screen.reset();
        assert_eq!(screen, Screen::new());
    }
}
