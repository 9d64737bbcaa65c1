//! Engine configuration
//!
//! Defaults are the arcade timings on a 10x20 board of 20px cells. Every field is optional in
//! JSON, so a config file only needs to list what it overrides.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{
    ARE_DELAY_FRAMES, CELL_SIZE, CLEAR_DELAY_FRAMES, DAS_DELAY_FRAMES, GRID_HEIGHT, GRID_ORIGIN_X,
    GRID_ORIGIN_Y, GRID_WIDTH, LOCK_DELAY_FRAMES, TRANSITION_DELAY_FRAMES,
};

/// Board geometry in pixels and cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub origin_x: i32,
    pub origin_y: i32,
    pub cell_size: i32,
    pub width: usize,
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin_x: GRID_ORIGIN_X,
            origin_y: GRID_ORIGIN_Y,
            cell_size: CELL_SIZE,
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
        }
    }
}

/// Frame timings and board geometry for one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub das_delay: u32,
    pub lock_delay: u32,
    pub are_delay: u32,
    pub clear_delay: u32,
    /// Frames the start and game-over jingles are given to play out
    pub transition_delay: u32,
    /// Fixed randomizer seed; `None` seeds from the clock on every start
    pub seed: Option<u32>,
    pub grid: GridConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            das_delay: DAS_DELAY_FRAMES,
            lock_delay: LOCK_DELAY_FRAMES,
            are_delay: ARE_DELAY_FRAMES,
            clear_delay: CLEAR_DELAY_FRAMES,
            transition_delay: TRANSITION_DELAY_FRAMES,
            seed: None,
            grid: GridConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `TGM_*` environment variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        use std::env;

        fn frames(name: &str) -> Option<u32> {
            env::var(name).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            das_delay: frames("TGM_DAS_DELAY").unwrap_or(defaults.das_delay),
            lock_delay: frames("TGM_LOCK_DELAY").unwrap_or(defaults.lock_delay),
            are_delay: frames("TGM_ARE_DELAY").unwrap_or(defaults.are_delay),
            clear_delay: frames("TGM_CLEAR_DELAY").unwrap_or(defaults.clear_delay),
            transition_delay: frames("TGM_TRANSITION_DELAY").unwrap_or(defaults.transition_delay),
            seed: frames("TGM_SEED"),
            grid: defaults.grid,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let grid = &self.grid;
        if grid.width == 0 || grid.height == 0 {
            return Err(EngineError::InvalidGridSize {
                width: grid.width,
                height: grid.height,
            });
        }
        if grid.cell_size <= 0 {
            return Err(EngineError::InvalidCellSize(grid.cell_size));
        }

        let delays = [
            ("das_delay", self.das_delay),
            ("lock_delay", self.lock_delay),
            ("are_delay", self.are_delay),
            ("clear_delay", self.clear_delay),
            ("transition_delay", self.transition_delay),
        ];
        for (name, value) in delays {
            if value == 0 {
                return Err(EngineError::InvalidDelay(name));
            }
        }
        Ok(())
    }
}
