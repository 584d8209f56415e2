//! Board module - manages the game grid
//!
//! The board is a 10x20 grid of `u8` cells: `0` is empty, `1..=7` is a locked
//! cell tagged with the [`PieceKind`] id that produced it.
//! Uses a flat array for better cache locality and zero-allocation.
//!
//! Two coordinate conventions are exposed:
//! - `(row, col)` for the raw cell accessors ([`Board::get_cell`], [`Board::set_cell`])
//! - `(x, y)` for collision checks against piece blocks ([`Board::is_free`])
//!
//! Out-of-bounds access never panics: reads return the [`OUT_OF_BOUNDS`]
//! sentinel and writes are ignored.

use crate::types::{Grid, PieceKind, BOARD_CELLS, BOARD_HEIGHT, BOARD_WIDTH, MAX_CELL, OUT_OF_BOUNDS};

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [u8; BOARD_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [0; BOARD_CELLS],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(row: i32, col: i32) -> Option<usize> {
        if row < 0 || row >= BOARD_HEIGHT as i32 || col < 0 || col >= BOARD_WIDTH as i32 {
            return None;
        }
        Some((row as usize) * (BOARD_WIDTH as usize) + (col as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Cell value at (row, col), or `-1` when out of bounds.
    pub fn get_cell(&self, row: i32, col: i32) -> i8 {
        match Self::index(row, col) {
            Some(idx) => self.cells[idx] as i8,
            None => OUT_OF_BOUNDS,
        }
    }

    /// Write a cell. Out-of-bounds positions and values above 7 are ignored.
    pub fn set_cell(&mut self, row: i32, col: i32, value: u8) {
        if value > MAX_CELL {
            return;
        }
        if let Some(idx) = Self::index(row, col) {
            self.cells[idx] = value;
        }
    }

    /// Typed read: `None` when out of bounds.
    pub fn get(&self, row: i32, col: i32) -> Option<u8> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Piece kind locked at (row, col), if any.
    pub fn kind_at(&self, row: i32, col: i32) -> Option<PieceKind> {
        self.get(row, col).and_then(PieceKind::from_id)
    }

    /// Check if a block at (x, y) could be placed: within bounds and empty
    #[inline]
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(y as i32, x as i32), Some(0))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = row * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|&cell| cell != 0)
    }

    /// Check if a row is completely empty
    pub fn is_row_empty(&self, row: usize) -> bool {
        if row >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = row * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|&cell| cell == 0)
    }

    /// Remove a row: every row above it moves down by one and row 0 is cleared.
    ///
    /// Returns false (and does nothing) if `row` is out of bounds.
    pub fn clear_row(&mut self, row: usize) -> bool {
        if row >= BOARD_HEIGHT as usize {
            return false;
        }

        let width = BOARD_WIDTH as usize;

        // copy_within handles the overlapping ranges
        for r in (1..=row).rev() {
            let src_start = (r - 1) * width;
            let dst_start = r * width;
            self.cells.copy_within(src_start..src_start + width, dst_start);
        }

        for cell in &mut self.cells[..width] {
            *cell = 0;
        }

        true
    }

    /// Flat row-major view of the cells
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Copy the board into a 2D grid.
    pub fn grid(&self) -> Grid {
        let mut out = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.write_grid(&mut out);
        out
    }

    /// Copy the board into an existing grid without allocating.
    pub fn write_grid(&self, out: &mut Grid) {
        let width = BOARD_WIDTH as usize;
        for (row, dst) in out.iter_mut().enumerate() {
            let start = row * width;
            dst.copy_from_slice(&self.cells[start..start + width]);
        }
    }

    /// Overwrite every cell from a grid. Values above 7 are stored as empty.
    pub fn load_grid(&mut self, grid: &Grid) {
        let width = BOARD_WIDTH as usize;
        for (row, src) in grid.iter().enumerate() {
            for (col, &value) in src.iter().enumerate() {
                self.cells[row * width + col] = if value > MAX_CELL { 0 } else { value };
            }
        }
    }

    /// Number of occupied cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Clear the entire board
    pub fn reset(&mut self) {
        self.cells = [0; BOARD_CELLS];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
