//! Core types module - shared data structures and constants
//!
//! This crate defines the plain data shared by the engine and its hosts: shape identities,
//! player commands, state-machine tags, music cues, and the pixel geometry the engine works in.
//! Nothing here carries game logic.
//!
//! # Playfield
//!
//! The engine works in screen pixels rather than board indices:
//!
//! - **Grid**: 10 columns x 20 rows of 20px cells, origin at (200, 0)
//! - **Spawn anchor**: the bounding box of a new piece is placed at column 3, one cell above row 0
//! - **Catalog size**: freshly generated pieces use 10px cells until resized to the grid
//!
//! # Timing
//!
//! All delays are counted in frames at a fixed 60 FPS:
//!
//! | Constant | Frames | Description |
//! |----------|--------|-------------|
//! | `DAS_DELAY_FRAMES` | 14 | Held shift frames before auto-repeat |
//! | `LOCK_DELAY_FRAMES` | 30 | Grounded frames before a piece locks |
//! | `ARE_DELAY_FRAMES` | 30 | Spawn delay after a lock |
//! | `CLEAR_DELAY_FRAMES` | 41 | Pause after a line clear |
//! | `TRANSITION_DELAY_FRAMES` | 90 | Jingle settling time between menu and play |
//!
//! # Examples
//!
//! ```
//! use tgm_tetris_types::{Command, Rect, ShapeKind, GRID_HEIGHT, GRID_WIDTH};
//!
//! // Shapes round-trip through their catalog index
//! assert_eq!(ShapeKind::from_index(3), Some(ShapeKind::O));
//! assert_eq!(ShapeKind::O.index(), 3);
//!
//! // Commands parse from config/log strings
//! assert_eq!(Command::from_str("shiftLeft"), Some(Command::ShiftLeft));
//!
//! // Touching rectangles do not intersect
//! let a = Rect::new(0, 0, 20, 20);
//! assert!(!a.intersects(&Rect::new(20, 0, 20, 20)));
//! assert!(a.intersects(&Rect::new(10, 10, 20, 20)));
//!
//! assert_eq!(GRID_WIDTH, 10);
//! assert_eq!(GRID_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Grid width in cells (10 columns)
pub const GRID_WIDTH: usize = 10;

/// Grid height in cells (20 rows)
pub const GRID_HEIGHT: usize = 20;

/// Grid cell edge length in pixels
pub const CELL_SIZE: i32 = 20;

/// Left edge of the grid in pixels (centered in a 600px wide screen)
pub const GRID_ORIGIN_X: i32 = 600 / 2 - (GRID_WIDTH as i32 * CELL_SIZE) / 2;

/// Top edge of the grid in pixels
pub const GRID_ORIGIN_Y: i32 = 0;

/// Cell edge length of a freshly generated piece, before it is resized to the grid
pub const CATALOG_CELL_SIZE: i32 = 10;

/// Column of row 0 the spawn anchor is derived from
pub const SPAWN_COLUMN: usize = 3;

/// Fixed frame rate the delays are expressed in
pub const FRAME_RATE: u32 = 60;

/// Frames a shift must be held before it auto-repeats
pub const DAS_DELAY_FRAMES: u32 = 14;

/// Frames a grounded piece may rest before locking
pub const LOCK_DELAY_FRAMES: u32 = 30;

/// Spawn (ARE) delay in frames
pub const ARE_DELAY_FRAMES: u32 = 30;

/// Line clear delay in frames
pub const CLEAR_DELAY_FRAMES: u32 = 41;

/// Frames spent in the transition state while a jingle plays
pub const TRANSITION_DELAY_FRAMES: u32 = 90;

/// The seven tetromino shapes
///
/// The declaration order is the catalog order: the randomizer draws an index in `0..7`
/// and maps it through [`ShapeKind::from_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl ShapeKind {
    /// Every shape, in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::Z,
    ];

    /// Number of distinct shapes
    pub const COUNT: u8 = 7;

    /// Catalog index (0..7)
    pub fn index(self) -> u8 {
        match self {
            ShapeKind::I => 0,
            ShapeKind::J => 1,
            ShapeKind::L => 2,
            ShapeKind::O => 3,
            ShapeKind::S => 4,
            ShapeKind::T => 5,
            ShapeKind::Z => 6,
        }
    }

    /// Inverse of [`ShapeKind::index`]. Returns None for ids outside the catalog.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Parse shape from string (case-insensitive)
    ///
    /// ```
    /// use tgm_tetris_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
    /// assert_eq!(ShapeKind::from_str("Z"), Some(ShapeKind::Z));
    /// assert_eq!(ShapeKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            "o" => Some(ShapeKind::O),
            "s" => Some(ShapeKind::S),
            "t" => Some(ShapeKind::T),
            "z" => Some(ShapeKind::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
            ShapeKind::O => "o",
            ShapeKind::S => "s",
            ShapeKind::T => "t",
            ShapeKind::Z => "z",
        }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Empty cell color
pub const BACKGROUND: Rgb = Rgb::new(0x00, 0x00, 0x00);

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// True when the two rectangles share a non-empty area. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Player commands, buffered by the host once per frame
///
/// "No command" is represented as `Option<Command>::None`; the host clears the buffer
/// when the key is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Move the piece one cell left (auto-repeats under DAS)
    ShiftLeft,
    /// Move the piece one cell right (auto-repeats under DAS)
    ShiftRight,
    /// Rotate clockwise, once per press
    RotateClockwise,
    /// Rotate counter-clockwise, once per press
    RotateCounterClockwise,
    /// Drop one cell per frame while held; locks instantly on contact
    ManualDrop,
    /// Leave the menu and start a game
    Start,
}

impl Command {
    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use tgm_tetris_types::Command;
    ///
    /// assert_eq!(Command::from_str("manualDrop"), Some(Command::ManualDrop));
    /// assert_eq!(Command::from_str("ROTATECLOCKWISE"), Some(Command::RotateClockwise));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shiftleft" => Some(Command::ShiftLeft),
            "shiftright" => Some(Command::ShiftRight),
            "rotateclockwise" => Some(Command::RotateClockwise),
            "rotatecounterclockwise" => Some(Command::RotateCounterClockwise),
            "manualdrop" => Some(Command::ManualDrop),
            "start" => Some(Command::Start),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::ShiftLeft => "shiftLeft",
            Command::ShiftRight => "shiftRight",
            Command::RotateClockwise => "rotateClockwise",
            Command::RotateCounterClockwise => "rotateCounterClockwise",
            Command::ManualDrop => "manualDrop",
            Command::Start => "start",
        }
    }
}

/// Observable tag of the engine's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Menu,
    Transition,
    Locking,
    Clearing,
    ClearDelay,
    Spawning,
    GameOver,
}

impl Step {
    /// Whether gameplay logic (commands, gravity, timers) runs in this step
    pub fn is_active(self) -> bool {
        !matches!(self, Step::Menu | Step::Transition)
    }
}

/// Music cues the engine asks the host to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    /// Looping menu music
    Menu,
    /// One-shot "insert coin" jingle played during the start transition
    Start,
    /// Looping gameplay music below level 500
    Easy,
    /// Looping gameplay music from level 500
    Hard,
    /// One-shot game over jingle
    GameOver,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Menu => "menu",
            Track::Start => "start",
            Track::Easy => "easy",
            Track::Hard => "hard",
            Track::GameOver => "gameOver",
        }
    }

    /// Whether the cue loops until replaced
    pub fn is_looping(&self) -> bool {
        matches!(self, Track::Menu | Track::Easy | Track::Hard)
    }
}
