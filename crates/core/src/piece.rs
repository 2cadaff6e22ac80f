//! Active piece and its movement rules.

use crate::board::{collides, Board};
use crate::shapes::ShapeDefinition;

/// Offsets tried in order when a rotation does not fit in place.
pub const WALL_KICKS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1)];

/// The falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    /// Index into the shape registry
    pub shape: usize,
    /// Index into the shape's kept rotations
    pub rotation: usize,
    pub x: i32,
    /// Negative while the piece is still entering from above
    pub y: i32,
}

impl ActivePiece {
    /// Centered spawn, fully above the board in rotation 0.
    pub fn spawn(shape_idx: usize, shape: &ShapeDefinition, cols: usize) -> Self {
        let matrix = shape.rotation(0);
        Self {
            shape: shape_idx,
            rotation: 0,
            x: (cols as i32 - matrix.width() as i32).div_euclid(2),
            y: -(matrix.height() as i32),
        }
    }

    pub fn collides(&self, shape: &ShapeDefinition, board: &Board) -> bool {
        collides(board, self.x, self.y, shape.rotation(self.rotation))
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Next rotation state placed at the first wall kick that fits.
    ///
    /// Shapes with a single kept rotation never rotate.
    pub fn rotated(&self, shape: &ShapeDefinition, board: &Board) -> Option<Self> {
        let count = shape.rotations.len();
        if count <= 1 {
            return None;
        }
        let rotation = (self.rotation + 1) % count;
        let matrix = &shape.rotations[rotation];
        WALL_KICKS.iter().find_map(|&(kx, ky)| {
            let (x, y) = (self.x + kx, self.y + ky);
            (!collides(board, x, y, matrix)).then_some(Self {
                rotation,
                x,
                y,
                ..*self
            })
        })
    }

    /// Board coordinates of every block, paired with its position in the matrix.
    pub fn blocks<'a>(
        &self,
        shape: &'a ShapeDefinition,
    ) -> impl Iterator<Item = ((i32, i32), (usize, usize))> + 'a {
        let (px, py) = (self.x, self.y);
        shape
            .rotation(self.rotation)
            .occupied()
            .map(move |(mx, my)| ((px + mx as i32, py + my as i32), (mx, my)))
    }
}

/// Lock-delay state of the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPhase {
    #[default]
    Falling,
    /// Resting on something; locks once `elapsed_ms` reaches the threshold
    Grace { elapsed_ms: u32 },
}

impl LockPhase {
    pub fn in_grace(&self) -> bool {
        matches!(self, LockPhase::Grace { .. })
    }
}
