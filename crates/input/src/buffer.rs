//! Per-frame command buffer.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::command_for_key;
use crate::types::Command;

// In terminals without key-release events, a short timeout keeps a single tap from turning
// into a sustained hold. 9 frames is 150ms at 60 fps.
pub const DEFAULT_RELEASE_TIMEOUT_FRAMES: u32 = 9;

/// Holds the command the engine should see this frame.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    held: Option<Command>,
    frames_since_input: u32,
    release_timeout: Option<u32>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self {
            held: None,
            frames_since_input: 0,
            release_timeout: Some(DEFAULT_RELEASE_TIMEOUT_FRAMES),
        }
    }

    /// Buffer for terminals that report key releases: commands stay held until released.
    pub fn with_release_events() -> Self {
        Self {
            release_timeout: None,
            ..Self::new()
        }
    }

    pub fn with_release_timeout(mut self, frames: u32) -> Self {
        self.release_timeout = Some(frames);
        self
    }

    pub fn release_timeout(&self) -> Option<u32> {
        self.release_timeout
    }

    pub fn held(&self) -> Option<Command> {
        self.held
    }

    /// Feed one key event. Returns the command it maps to, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        let command = command_for_key(key)?;
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press(command),
            KeyEventKind::Release => self.release(command),
        }
        Some(command)
    }

    pub fn press(&mut self, command: Command) {
        self.held = Some(command);
        self.frames_since_input = 0;
    }

    /// Release `command` if it is the one held. Releasing a key pressed earlier does not
    /// cancel a newer one.
    pub fn release(&mut self, command: Command) {
        if self.held == Some(command) {
            self.held = None;
        }
    }

    pub fn clear(&mut self) {
        self.held = None;
    }

    /// Advance one frame and return the command to buffer into the engine.
    pub fn tick(&mut self) -> Option<Command> {
        if let Some(timeout) = self.release_timeout {
            if self.frames_since_input >= timeout {
                self.held = None;
            }
        }
        self.frames_since_input = self.frames_since_input.saturating_add(1);
        self.held
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}
