//! Screen line representation
//!
//! A line is a row of cells that grows lazily as the cursor writes past its
//! end, plus namespaced metadata (such as timestamps) kept apart from the
//! cell content.

use std::collections::BTreeMap;

use super::cell::Cell;

/// Line metadata: `namespace => { key => value }`
pub type Metadata = BTreeMap<String, BTreeMap<String, String>>;

/// First column of a line
pub const START_OF_LINE: usize = 0;
/// "As far right as the line goes"; clearing up to it truncates
pub const END_OF_LINE: usize = usize::MAX;

/// A row of cells on the screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    cells: Vec<Cell>,
    metadata: Metadata,
}

impl Line {
    /// Create an empty line
    pub fn new() -> Self {
        Self {
            cells: Vec::with_capacity(80),
            metadata: Metadata::new(),
        }
    }

    /// Number of cells in this line
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the line has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to a cell at the given column
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Get all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get the line metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Grow the line with blank cells so that `col` is a valid index
    pub(crate) fn ensure_col(&mut self, col: usize) {
        if self.cells.len() <= col {
            self.cells.resize_with(col + 1, Cell::default);
        }
    }

    /// Overwrite the cell at `col`, growing the line if needed
    pub(crate) fn set(&mut self, col: usize, cell: Cell) {
        self.ensure_col(col);
        self.cells[col] = cell;
    }

    /// Merge `entries` into the metadata under `namespace`.
    ///
    /// Colliding keys take the new value; other existing keys are kept.
    pub(crate) fn merge_metadata(&mut self, namespace: &str, entries: BTreeMap<String, String>) {
        match self.metadata.get_mut(namespace) {
            Some(existing) => existing.extend(entries),
            None => {
                self.metadata.insert(namespace.to_string(), entries);
            }
        }
    }

    /// Clear the inclusive column range `[x_start, x_end]`.
    ///
    /// A range reaching the last cell (or beyond) truncates the line to
    /// `x_start` cells. An interior range is overwritten with blank cells
    /// and the length is kept. Ranges that start past the end of the line
    /// or end before they start are ignored.
    pub fn clear_range(&mut self, x_start: usize, x_end: usize) {
        if x_end < x_start {
            return;
        }
        if x_start >= self.cells.len() {
            return;
        }

        if x_end >= self.cells.len() - 1 {
            self.cells.truncate(x_start);
            return;
        }

        for cell in &mut self.cells[x_start..=x_end] {
            *cell = Cell::default();
        }
    }

    /// The characters of this line; element cells contribute nothing
    pub fn text(&self) -> String {
        self.cells.iter().filter_map(Cell::char).collect()
    }
}
