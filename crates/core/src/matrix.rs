//! Small rectangular grids used for piece geometry and pixel-art paint.

/// Row-major rectangular grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Occupancy matrix of one piece orientation.
pub type Matrix = Grid<bool>;

/// Bounding box found by [`Matrix::trimmed`], in source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Build from rows. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Rotate 90° clockwise: `(x, y)` moves to `(h - 1 - y, x)`.
    pub fn rotate_cw(&self) -> Self {
        let (w, h) = (self.width, self.height);
        let mut cells = Vec::with_capacity(self.cells.len());
        for ny in 0..w {
            for nx in 0..h {
                cells.push(self.cells[(h - 1 - nx) * w + ny].clone());
            }
        }
        Self {
            width: h,
            height: w,
            cells,
        }
    }

    /// Copy out a sub-rectangle. Returns `None` if it leaves the grid.
    pub fn crop(&self, left: usize, top: usize, width: usize, height: usize) -> Option<Self> {
        if left + width > self.width || top + height > self.height {
            return None;
        }
        let mut cells = Vec::with_capacity(width * height);
        for y in top..top + height {
            let start = y * self.width + left;
            cells.extend_from_slice(&self.cells[start..start + width]);
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }
}

impl Grid<bool> {
    /// `(x, y)` of every occupied cell, row by row.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &filled)| filled)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }

    pub fn count_occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Minimal bounding box around the occupied cells, or `None` if there are none.
    pub fn trimmed(&self) -> Option<(Self, Bounds)> {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        for (x, y) in self.occupied() {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if min_x == usize::MAX {
            return None;
        }
        let bounds = Bounds {
            left: min_x,
            top: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        };
        let grid = self.crop(bounds.left, bounds.top, bounds.width, bounds.height)?;
        Some((grid, bounds))
    }

    /// Parse rows where `X` marks a filled cell and any other glyph is empty.
    ///
    /// Shorter rows are padded with empty cells.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let rows = rows
            .iter()
            .map(|r| {
                let mut row: Vec<bool> = r.as_ref().chars().map(|c| c == 'X').collect();
                row.resize(width, false);
                row
            })
            .collect();
        Self::from_rows(rows).unwrap_or_else(|| Self::filled(0, 0, false))
    }
}
