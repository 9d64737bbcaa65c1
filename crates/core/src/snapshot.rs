use serde::Serialize;

use crate::grid::Cell;
use crate::rules;
use crate::tetromino::Tetromino;
use crate::types::{Rect, Rgb, ShapeKind, Step, Track};

/// Renderable state of one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub kind: ShapeKind,
    pub orientation: u8,
    pub color: Rgb,
    pub blocks: [Rect; 4],
}

impl From<&Tetromino> for PieceSnapshot {
    fn from(value: &Tetromino) -> Self {
        Self {
            kind: value.kind(),
            orientation: value.orientation(),
            color: value.color(),
            blocks: value.blocks(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimersSnapshot {
    pub das_frames: u32,
    pub lock_frames: u32,
    pub clear_frames: u32,
    pub are_frames: u32,
    pub soft_frames: u32,
    /// Gravity accumulator in 1/256 cells
    pub gravity: u32,
}

/// Everything a host needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub step: Step,
    pub track: Track,
    /// Pixel position of the top-left cell
    pub grid_origin: (i32, i32),
    pub cell_size: i32,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Row-major, row 0 first
    pub cells: Vec<Cell>,
    pub active: Option<PieceSnapshot>,
    /// Catalog-sized preview anchored at (0, 0)
    pub next: Option<PieceSnapshot>,
    pub level: u32,
    pub score: u64,
    pub combo: u32,
    pub bravo: u32,
    pub grade: &'static str,
    pub play_frames: u64,
    pub timers: TimersSnapshot,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            step: Step::Menu,
            track: Track::Menu,
            grid_origin: (0, 0),
            cell_size: 0,
            grid_width: 0,
            grid_height: 0,
            cells: Vec::new(),
            active: None,
            next: None,
            level: 0,
            score: 0,
            combo: 1,
            bravo: 1,
            grade: "9",
            play_frames: 0,
            timers: TimersSnapshot::default(),
        }
    }
}

impl Snapshot {
    /// Cell at (row, col)
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if col >= self.grid_width {
            return None;
        }
        self.cells.get(row * self.grid_width + col)
    }

    pub fn playable(&self) -> bool {
        self.active.is_some()
    }

    /// Play time as `mm:ss:cc`
    pub fn run_time(&self) -> String {
        rules::format_run_time(self.play_frames)
    }

    /// Board (column, row) of a rectangle's top-left corner. Rows above the board are negative.
    pub fn cell_position(&self, rect: &Rect) -> (i32, i32) {
        if self.cell_size <= 0 {
            return (0, 0);
        }
        (
            (rect.x - self.grid_origin.0).div_euclid(self.cell_size),
            (rect.y - self.grid_origin.1).div_euclid(self.cell_size),
        )
    }
}
