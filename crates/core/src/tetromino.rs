//! Tetromino - a movable piece instance
//!
//! A piece is fully described by its shape, its 1-based orientation, the pixel origin of its
//! bounding box, and its cell size. The four occupied blocks are always derived from those
//! values through the shape catalog; they are never stored or moved on their own, so a resize
//! or move can never leave stale block geometry behind.

use arrayvec::ArrayVec;

use crate::shapes;
use crate::types::{Rect, Rgb, ShapeKind, CATALOG_CELL_SIZE};

/// Derive the four world-space blocks of a piece.
pub fn derive_blocks(kind: ShapeKind, orientation: u8, origin: (i32, i32), size: i32) -> [Rect; 4] {
    let side = shapes::box_size(kind) as i32;
    shapes::orientation_cells(kind, orientation).map(|cell| {
        let cell = cell as i32;
        Rect::new(
            origin.0 + (cell % side) * size,
            origin.1 + (cell / side) * size,
            size,
            size,
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    kind: ShapeKind,
    orientation: u8,
    origin: (i32, i32),
    size: i32,
}

impl Tetromino {
    /// Fresh catalog piece: orientation 1, catalog cell size, bounding box at (0, 0).
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            orientation: 1,
            origin: (0, 0),
            size: CATALOG_CELL_SIZE,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn color(&self) -> Rgb {
        shapes::color(self.kind)
    }

    /// Current orientation, in `1..=orientation_count`
    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    pub fn orientation_count(&self) -> u8 {
        shapes::orientation_count(self.kind)
    }

    /// Cell edge length in pixels
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Pixel position of the bounding box's top-left cell
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Every cell of the bounding box, row-major
    pub fn bounds(&self) -> ArrayVec<Rect, 16> {
        let side = shapes::box_size(self.kind) as i32;
        (0..side * side)
            .map(|i| {
                Rect::new(
                    self.origin.0 + (i % side) * self.size,
                    self.origin.1 + (i / side) * self.size,
                    self.size,
                    self.size,
                )
            })
            .collect()
    }

    /// The four occupied blocks in world coordinates
    pub fn blocks(&self) -> [Rect; 4] {
        derive_blocks(self.kind, self.orientation, self.origin, self.size)
    }

    /// Y coordinate of the topmost block
    pub fn top(&self) -> i32 {
        self.blocks().iter().map(|b| b.y).min().unwrap_or(self.origin.1)
    }

    /// True if any block starts above `y`
    pub fn is_above(&self, y: i32) -> bool {
        self.top() < y
    }

    /// Rescale to a new cell size. The origin's offset from (0, 0) scales by the same ratio,
    /// so calling this again with the current size changes nothing.
    pub fn resize(&mut self, cell_size: i32) {
        if cell_size <= 0 || cell_size == self.size {
            return;
        }
        let old = self.size;
        self.origin = (
            self.origin.0 * cell_size / old,
            self.origin.1 * cell_size / old,
        );
        self.size = cell_size;
    }

    /// Anchor the bounding box at (x, y).
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.origin = (x, y);
    }

    pub fn shift_left(&mut self) {
        self.move_to(self.origin.0 - self.size, self.origin.1);
    }

    pub fn shift_right(&mut self) {
        self.move_to(self.origin.0 + self.size, self.origin.1);
    }

    /// Move down one cell (gravity, manual drop and lock probes all use this)
    pub fn drop(&mut self) {
        self.move_to(self.origin.0, self.origin.1 + self.size);
    }

    pub fn rotate_clockwise(&mut self) {
        let count = self.orientation_count();
        self.orientation = if self.orientation >= count {
            1
        } else {
            self.orientation + 1
        };
    }

    pub fn rotate_counter_clockwise(&mut self) {
        let count = self.orientation_count();
        self.orientation = if self.orientation <= 1 {
            count
        } else {
            self.orientation - 1
        };
    }

    /// Copy of this piece after `f` is applied, for collision probes.
    pub fn probe(&self, f: impl FnOnce(&mut Tetromino)) -> Tetromino {
        let mut candidate = *self;
        f(&mut candidate);
        candidate
    }
}
