//! Cursor position
//!
//! The screen has no fixed size, so the cursor is only ever clamped at the
//! top-left. Moving right or down is unbounded; rows and columns appear
//! when something is written there.

/// Cursor position (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Column position
    pub col: usize,
    /// Row position
    pub row: usize,
}

impl Cursor {
    /// Create a new cursor at the home position
    pub fn new() -> Self {
        Self::default()
    }

    /// Move up by `n` rows, stopping at row 0
    pub fn move_up(&mut self, n: i64) {
        self.row = offset(self.row, n.saturating_neg());
    }

    /// Move down by `n` rows
    pub fn move_down(&mut self, n: i64) {
        self.row = offset(self.row, n);
    }

    /// Move right by `n` columns
    pub fn move_right(&mut self, n: i64) {
        self.col = offset(self.col, n);
    }

    /// Move left by `n` columns, stopping at column 0
    pub fn move_left(&mut self, n: i64) {
        self.col = offset(self.col, n.saturating_neg());
    }

    /// Move to column 0 (CR)
    pub fn carriage_return(&mut self) {
        self.col = 0;
    }

    /// Move to the start of the next row (LF)
    pub fn line_feed(&mut self) {
        self.col = 0;
        self.row = self.row.saturating_add(1);
    }

    /// Move down one row, keeping the column (IND)
    pub fn index(&mut self) {
        self.row = self.row.saturating_add(1);
    }

    /// Move up one row, stopping at row 0 (RI)
    pub fn reverse_line_feed(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    /// Move left one column, stopping at column 0 (BS)
    pub fn backspace(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    /// Move to the home position
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Apply a signed offset to a coordinate, clamping at zero
fn offset(pos: usize, n: i64) -> usize {
    match isize::try_from(n) {
        Ok(n) => pos.saturating_add_signed(n),
        Err(_) if n < 0 => 0,
        Err(_) => usize::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_new() {
        let cursor = Cursor::new();
        assert_eq!(cursor.col, 0);
        assert_eq!(cursor.row, 0);
    }

    #[test]
    fn test_cursor_move_up_clamps() {
        let mut cursor = Cursor { col: 0, row: 3 };
        cursor.move_up(2);
        assert_eq!(cursor.row, 1);
        cursor.move_up(10);
        assert_eq!(cursor.row, 0);
    }

    #[test]
    fn test_cursor_move_left_clamps() {
        let mut cursor = Cursor { col: 2, row: 0 };
        cursor.move_left(5);
        assert_eq!(cursor.col, 0);
    }

    #[test]
    fn test_cursor_negative_counts() {
        let mut cursor = Cursor { col: 1, row: 1 };
        cursor.move_down(-5);
        cursor.move_right(-5);
        assert_eq!(cursor, Cursor::new());

        cursor.move_up(-3);
        assert_eq!(cursor.row, 3);
    }

    #[test]
    fn test_cursor_controls() {
        let mut cursor = Cursor { col: 4, row: 0 };
        cursor.backspace();
        assert_eq!(cursor.col, 3);

        cursor.line_feed();
        assert_eq!(cursor, Cursor { col: 0, row: 1 });

        cursor.reverse_line_feed();
        cursor.reverse_line_feed();
        assert_eq!(cursor.row, 0);

        cursor.backspace();
        assert_eq!(cursor.col, 0);
    }

    #[test]
    fn test_cursor_index_keeps_column() {
        let mut cursor = Cursor { col: 5, row: 2 };
        cursor.index();
        assert_eq!(cursor, Cursor { col: 5, row: 3 });
    }
}
