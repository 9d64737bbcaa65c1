//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events to [`Command`](types::Command)s and keeps the one command the
//! engine sees each frame. The engine does its own DAS in frames, so this layer only has to
//! know whether a key is still held, using release events when the terminal reports them and a
//! short timeout when it does not.

pub mod buffer;
pub mod map;

pub use tgm_tetris_types as types;

pub use buffer::{CommandBuffer, DEFAULT_RELEASE_TIMEOUT_FRAMES};
pub use map::{command_for_key, should_quit};
