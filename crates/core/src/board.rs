//! Board module - manages the game grid
//!
//! The board is a `cols x rows` grid where each cell is empty or holds a
//! locked block. Storage is a flat row-major `Vec` sized once per game.
//! Coordinates: (x, y) with x growing right and y growing down; y may be
//! negative for pieces still entering from above the top row.

use crate::matrix::Matrix;

/// A block left behind by a locked piece.
///
/// Paint and style are resolved through the shape registry, so the record
/// only remembers where in which rotation of which shape it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockedBlock {
    /// Index into the shape registry
    pub shape: u16,
    pub rotation: u8,
    /// Position of the block inside the rotation matrix
    pub cell_x: u8,
    pub cell_y: u8,
}

/// A board cell: `None` when empty.
pub type Cell = Option<LockedBlock>;

/// The game board, row-major (`y * cols + x`).
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some((y as usize) * self.cols + (x as usize))
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_some()))
    }

    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.rows {
            return None;
        }
        let start = y * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Topmost row holding any locked block.
    pub fn highest_occupied_row(&self) -> Option<usize> {
        (0..self.rows).find(|&y| self.row(y).is_some_and(|r| r.iter().any(Option::is_some)))
    }

    /// Remove every full row, shift the rest down and return how many were removed.
    ///
    /// Two-pointer pass from the bottom; rows above the last kept row are cleared.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.cols;
        let mut write_y = self.rows;
        let mut cleared = 0;

        // Scan from bottom to top
        for read_y in (0..self.rows).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        self.cells[..write_y * width].fill(None);
        cleared
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// Whether `matrix` placed with its top-left at `(x, y)` hits a wall, the floor
/// or a locked block.
///
/// Cells above row 0 only check the side walls so pieces can enter from above.
pub fn collides(board: &Board, x: i32, y: i32, matrix: &Matrix) -> bool {
    matrix.occupied().any(|(mx, my)| {
        let bx = x + mx as i32;
        let by = y + my as i32;
        if bx < 0 || bx as usize >= board.cols() {
            return true;
        }
        if by >= board.rows() as i32 {
            return true;
        }
        by >= 0 && board.is_occupied(bx, by)
    })
}

#[cfg(test)]
impl Board {
    /// Build from rows of `#` (filled) and `.` (empty) for tests.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut board = Board::new(cols, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '.' {
                    board.set(x as i32, y as i32, Some(test_block()));
                }
            }
        }
        board
    }
}

#[cfg(test)]
pub(crate) fn test_block() -> LockedBlock {
    LockedBlock {
        shape: 0,
        rotation: 0,
        cell_x: 0,
        cell_y: 0,
    }
}
