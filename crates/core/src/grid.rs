//! Grid module - the fixed-size occupancy board
//!
//! The grid is `height` rows of `width` cells stored row-major in a flat vector (row 0 is the
//! top). Every cell's pixel rectangle is computed once at construction and never changes;
//! locking and line clears only flip `occupied` and `color`.
//!
//! Pieces never touch the grid directly. The engine asks it whether a set of block
//! rectangles collides, and writes locked blocks into the cells whose rectangles match them
//! exactly.

use serde::Serialize;

use crate::error::EngineError;
use crate::types::{Rect, Rgb, BACKGROUND, SPAWN_COLUMN};

/// One board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub rect: Rect,
    pub color: Rgb,
    pub occupied: bool,
}

impl Cell {
    fn empty(rect: Rect) -> Self {
        Self {
            rect,
            color: BACKGROUND,
            occupied: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    x: i32,
    y: i32,
    cell_size: i32,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    spawn_point: (i32, i32),
    alt_spawn_point: (i32, i32),
}

impl Grid {
    /// Build an empty grid with its top-left cell at (x, y).
    pub fn new(
        x: i32,
        y: i32,
        cell_size: i32,
        width: usize,
        height: usize,
    ) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidGridSize { width, height });
        }
        if cell_size <= 0 {
            return Err(EngineError::InvalidCellSize(cell_size));
        }

        let mut grid = Self {
            x,
            y,
            cell_size,
            width,
            height,
            cells: Vec::with_capacity(width * height),
            spawn_point: (0, 0),
            alt_spawn_point: (0, 0),
        };
        for row in 0..height {
            for col in 0..width {
                grid.cells.push(Cell::empty(grid.cell_rect(row, col)));
            }
        }

        let spawn_cell = grid.cell_rect(0, SPAWN_COLUMN.min(width - 1));
        grid.spawn_point = (spawn_cell.x, spawn_cell.y - cell_size);
        grid.alt_spawn_point = (spawn_cell.x, spawn_cell.y - 3 * cell_size);

        Ok(grid)
    }

    fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            self.x + col as i32 * self.cell_size,
            self.y + row as i32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Left edge in pixels
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Top edge in pixels
    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn pixel_width(&self) -> i32 {
        self.width as i32 * self.cell_size
    }

    pub fn pixel_height(&self) -> i32 {
        self.height as i32 * self.cell_size
    }

    /// Bounding-box anchor for new pieces: column 3, one cell above row 0
    pub fn spawn_point(&self) -> (i32, i32) {
        self.spawn_point
    }

    /// Fallback anchor two cells above the spawn point
    pub fn alt_spawn_point(&self) -> (i32, i32) {
        self.alt_spawn_point
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row.min(self.height) * self.width;
        let end = (start + self.width).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Occupy a cell with a color. Returns false if out of bounds.
    pub fn fill(&mut self, row: usize, col: usize, color: Rgb) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i].occupied = true;
                self.cells[i].color = color;
                true
            }
            None => false,
        }
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(|c| c.occupied)
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.height && self.row(row).iter().all(|c| c.occupied)
    }

    /// True when no cell is occupied (a clear leaving this is a "bravo")
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| !c.occupied)
    }

    /// Empty `row`, then move the occupancy of every row above it down by one.
    /// Row 0 is left empty. Cell geometry never moves.
    pub fn clear_row(&mut self, row: usize) {
        if row >= self.height {
            return;
        }
        let width = self.width;

        for cell in &mut self.cells[row * width..(row + 1) * width] {
            *cell = Cell::empty(cell.rect);
        }

        for i in (1..=row).rev() {
            for col in 0..width {
                let above = self.cells[(i - 1) * width + col];
                let cell = &mut self.cells[i * width + col];
                cell.occupied = above.occupied;
                cell.color = above.color;
            }
        }

        for cell in &mut self.cells[..width] {
            *cell = Cell::empty(cell.rect);
        }
    }

    /// Clear every full row, scanning top to bottom. Returns how many were cleared.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        for row in 0..self.height {
            if self.is_row_full(row) {
                self.clear_row(row);
                cleared += 1;
            }
        }
        cleared
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::empty(cell.rect);
        }
    }

    /// True if `rect` leaves the playfield through the left, right or bottom edge.
    /// Space above the top edge is open.
    pub fn is_outside(&self, rect: &Rect) -> bool {
        rect.x < self.x
            || rect.x >= self.x + self.pixel_width()
            || rect.y >= self.y + self.pixel_height()
    }

    /// True if `rect` overlaps any occupied cell.
    pub fn overlaps_occupied(&self, rect: &Rect) -> bool {
        if rect.w <= 0 || rect.h <= 0 {
            return false;
        }
        let size = self.cell_size;
        let col_lo = (rect.x - self.x).div_euclid(size).max(0);
        let col_hi = (rect.right() - 1 - self.x).div_euclid(size);
        let row_lo = (rect.y - self.y).div_euclid(size).max(0);
        let row_hi = (rect.bottom() - 1 - self.y).div_euclid(size);
        if col_hi < 0 || row_hi < 0 {
            return false;
        }

        for row in row_lo as usize..=(row_hi as usize).min(self.height.saturating_sub(1)) {
            for col in col_lo as usize..=(col_hi as usize).min(self.width.saturating_sub(1)) {
                let cell = &self.cells[row * self.width + col];
                if cell.occupied && cell.rect.intersects(rect) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether a set of blocks would collide with the walls, floor, or locked cells.
    pub fn collides(&self, blocks: &[Rect]) -> bool {
        blocks.iter().any(|b| self.is_outside(b)) || blocks.iter().any(|b| self.overlaps_occupied(b))
    }

    /// Occupy the cell whose rectangle equals `rect`. Returns false when no cell matches.
    pub fn occupy_matching(&mut self, rect: &Rect, color: Rgb) -> bool {
        let size = self.cell_size;
        let (dx, dy) = (rect.x - self.x, rect.y - self.y);
        if dx < 0 || dy < 0 || dx % size != 0 || dy % size != 0 {
            return false;
        }
        let (row, col) = ((dy / size) as usize, (dx / size) as usize);
        match self.index(row, col) {
            Some(i) if self.cells[i].rect == *rect => {
                self.cells[i].occupied = true;
                self.cells[i].color = color;
                true
            }
            _ => false,
        }
    }

    /// Occupancy as rows of booleans (top row first)
    pub fn occupancy(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.occupied).collect())
            .collect()
    }
}
