//! The screen's content container.
//!
//! A [`ContentGrid`] is a single-column grid. Row 0 holds the screen content
//! and fills the available height; a second, fixed-height row is reserved
//! while the screen's command bar is enabled. Every child view sits in the
//! same cell, so the most recently added one is the one on display.
//!
//! Grids are mutated on the UI context. Their state sits behind a mutex so
//! queries from other threads stay consistent.

use parking_lot::Mutex;

use crate::widget::ViewId;

/// Height of a grid row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowHeight {
    /// A share of the remaining height.
    Star(f32),
    /// A fixed height in pixels.
    Pixels(f32),
}

/// A child view and the cell it is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// The child's view.
    pub view: ViewId,
    /// Row index.
    pub row: usize,
    /// Column index.
    pub column: usize,
}

#[derive(Debug)]
struct GridState {
    rows: Vec<RowHeight>,
    cells: Vec<GridCell>,
}

/// The container holding a screen's content.
#[derive(Debug)]
pub struct ContentGrid {
    view: ViewId,
    state: Mutex<GridState>,
}

impl Default for ContentGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentGrid {
    /// A grid with one content row and no children.
    pub fn new() -> Self {
        Self {
            view: ViewId::next(),
            state: Mutex::new(GridState {
                rows: vec![RowHeight::Star(1.0)],
                cells: Vec::new(),
            }),
        }
    }

    /// The grid's own view id.
    pub fn view(&self) -> ViewId {
        self.view
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Current row definitions.
    pub fn rows(&self) -> Vec<RowHeight> {
        self.state.lock().rows.clone()
    }

    /// Number of row definitions.
    pub fn row_count(&self) -> usize {
        self.state.lock().rows.len()
    }

    /// Whether the command bar row is reserved.
    pub fn has_reserved_row(&self) -> bool {
        self.row_count() >= 2
    }

    /// Reserve a fixed-height row below the content.
    ///
    /// Row 0 is reset to fill the remaining height. Returns `false` when the
    /// row was already reserved.
    pub fn reserve_row(&self, extent: f32) -> bool {
        let mut state = self.state.lock();
        if state.rows.len() >= 2 {
            return false;
        }
        state.rows.push(RowHeight::Pixels(extent));
        state.rows[0] = RowHeight::Star(1.0);
        true
    }

    /// Drop the reserved row. Returns `false` when none was reserved.
    pub fn release_reserved_row(&self) -> bool {
        let mut state = self.state.lock();
        if state.rows.len() < 2 {
            return false;
        }
        state.rows.remove(1);
        true
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Append a child view pinned at row 0, column 0.
    pub fn add_view(&self, view: ViewId) {
        self.state.lock().cells.push(GridCell {
            view,
            row: 0,
            column: 0,
        });
    }

    /// Remove a child view. Returns `false` if it was not present.
    pub fn remove_view(&self, view: ViewId) -> bool {
        let mut state = self.state.lock();
        match state.cells.iter().position(|c| c.view == view) {
            Some(index) => {
                state.cells.remove(index);
                true
            }
            None => false,
        }
    }

    /// Move a child view to another cell. Returns `false` if it is not a child.
    #[cfg(test)]
    pub(crate) fn place(&self, view: ViewId, row: usize, column: usize) -> bool {
        let mut state = self.state.lock();
        match state.cells.iter_mut().find(|c| c.view == view) {
            Some(cell) => {
                cell.row = row;
                cell.column = column;
                true
            }
            None => false,
        }
    }

    /// Pin the last child back to row 0, column 0.
    pub fn pin_last(&self) {
        if let Some(cell) = self.state.lock().cells.last_mut() {
            cell.row = 0;
            cell.column = 0;
        }
    }

    /// Child views in insertion order.
    pub fn cells(&self) -> Vec<GridCell> {
        self.state.lock().cells.clone()
    }

    /// The cell holding `view`.
    pub fn cell_of(&self, view: ViewId) -> Option<GridCell> {
        self.state.lock().cells.iter().find(|c| c.view == view).copied()
    }

    /// The child on display: the last one added.
    pub fn visible_view(&self) -> Option<ViewId> {
        self.state.lock().cells.last().map(|c| c.view)
    }

    /// Number of child views.
    pub fn child_count(&self) -> usize {
        self.state.lock().cells.len()
    }
}

static_assertions::assert_impl_all!(ContentGrid: Send, Sync);
