//! Core game logic - pure, deterministic, and testable
//!
//! Everything the arcade rules decide lives here: the shape catalog, piece geometry, the TGM
//! randomizer, the board and the frame-driven engine. There is no I/O, no clock reads outside
//! randomizer seeding, and no logging; hosts feed one [`Command`](types::Command) per frame
//! and read a [`Snapshot`] back.
//!
//! # Module Structure
//!
//! - [`shapes`]: orientation tables, bounding boxes and colors for the seven shapes
//! - [`tetromino`]: a piece instance whose blocks are derived from shape, orientation and origin
//! - [`randomizer`]: 4-slot history randomizer with the "no S/Z/O first" rule
//! - [`grid`]: fixed-geometry cells, collision queries and line-clear cascades
//! - [`rules`]: gravity curve, scoring, level stops and grading
//! - [`game`]: the [`Engine`] state machine
//! - [`config`]: timings and geometry, loadable from JSON or the environment
//!
//! # Example
//!
//! ```
//! use tgm_tetris_core::{Engine, EngineConfig, Randomizer};
//! use tgm_tetris_core::types::{Command, Step};
//!
//! let config = EngineConfig { transition_delay: 1, ..EngineConfig::default() };
//! let mut engine = Engine::with_randomizer(config, Randomizer::with_seed(42)).unwrap();
//!
//! engine.buffer_command(Some(Command::Start));
//! engine.process_frame(); // menu -> transition
//! engine.process_frame(); // transition -> first piece in play
//! assert_eq!(engine.step(), Step::Locking);
//! assert_eq!(engine.level(), 1);
//! ```
//!
//! # Timing
//!
//! Everything is counted in frames at 60 fps: DAS 14, lock delay 30, ARE 30, line-clear
//! delay 41. Gravity is accumulated in 1/256 cells per frame, so 20G (5120) moves a piece
//! twenty cells in a single frame.

pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod randomizer;
pub mod rules;
pub mod shapes;
pub mod snapshot;
pub mod tetromino;

pub use tgm_tetris_types as types;

// Re-export commonly used types for convenience
pub use config::{EngineConfig, GridConfig};
pub use error::EngineError;
pub use game::{Engine, GameEvent, Phase, EVENT_CAPACITY};
pub use grid::{Cell, Grid};
pub use randomizer::{Randomizer, SeedSource, SimpleRng};
pub use rules::{gravity_for_level, grade_for};
pub use snapshot::{PieceSnapshot, Snapshot, TimersSnapshot};
pub use tetromino::{derive_blocks, Tetromino};
