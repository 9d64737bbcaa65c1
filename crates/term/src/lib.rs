//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the engine snapshot is drawn into a character
//! framebuffer, which is then diffed against the previous frame and flushed with `crossterm`.
//! Board cells are drawn two characters wide to roughly match their pixel aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tgm_tetris_core as core;
pub use tgm_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
