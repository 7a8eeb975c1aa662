/// Destructible wall made of a grid of solid pieces.  Pieces never regrow.
use crate::alien::Cells;
use crate::environment::overlaps;
use crate::layout::WallLayout;
use crate::vector::{Size, Vector};

/// Lazy walk over a wall's pieces as `(row, column, solid)`.
pub type Pieces<'a> = Cells<'a, bool>;

#[derive(Clone, Debug)]
pub struct Wall {
    position: Vector,
    size: Size,
    pieces: Vec<Vec<bool>>,
}

impl Wall {
    pub fn new(position: Vector, size: Size, layout: &WallLayout) -> Self {
        Self {
            position,
            size,
            pieces: layout.pieces().to_vec(),
        }
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn piece_grid(&self) -> &[Vec<bool>] {
        &self.pieces
    }

    pub fn piece_size(&self) -> Size {
        let rows = self.pieces.len().max(1) as f32;
        let columns = self.pieces.first().map_or(1, Vec::len).max(1) as f32;
        Size::new(self.size.w / columns, self.size.h / rows)
    }

    pub fn pieces(&self) -> Pieces<'_> {
        Cells::new(&self.pieces)
    }

    pub fn solid_count(&self) -> usize {
        self.pieces.iter().flatten().filter(|&&solid| solid).count()
    }

    /// Absolute top-left of the piece at `(row, column)`.
    pub fn piece_position(&self, row: usize, column: usize) -> Vector {
        let piece = self.piece_size();
        self.position + Vector::new(column as f32 * piece.w, row as f32 * piece.h)
    }

    /// Destroy every solid piece overlapping the given box.  Returns whether
    /// at least one piece was destroyed.
    pub fn collide(&mut self, position: Vector, size: Size) -> bool {
        if !overlaps(position, size, self.position, self.size) {
            return false;
        }

        let piece = self.piece_size();
        let origin = self.position;
        let mut destroyed = false;

        for (row, pieces) in self.pieces.iter_mut().enumerate() {
            for (column, solid) in pieces.iter_mut().enumerate() {
                if !*solid {
                    continue;
                }
                let at = origin + Vector::new(column as f32 * piece.w, row as f32 * piece.h);
                if overlaps(position, size, at, piece) {
                    *solid = false;
                    destroyed = true;
                }
            }
        }
        destroyed
    }
}
