//! TGM Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates as `tgm_tetris::{core, input, term, types}` so the binary,
//! the integration tests and the benchmarks share one import path.

pub use tgm_tetris_core as core;
pub use tgm_tetris_input as input;
pub use tgm_tetris_term as term;
pub use tgm_tetris_types as types;

pub mod journal;
