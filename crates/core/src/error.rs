//! Construction-time errors.
//!
//! Gameplay itself never fails: rejected moves are normal control flow. These errors only
//! come out of building a grid, an engine, or a configuration from bad input.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Grid width or height is zero
    InvalidGridSize { width: usize, height: usize },
    /// Cell edge length is not positive
    InvalidCellSize(i32),
    /// A frame delay that must be positive is zero
    InvalidDelay(&'static str),
    /// Shape id outside the catalog
    UnknownShape(u8),
    /// Configuration text could not be parsed
    InvalidConfig(String),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidGridSize { .. } | EngineError::InvalidCellSize(_) => {
                "invalid_grid"
            }
            EngineError::InvalidDelay(_) | EngineError::InvalidConfig(_) => "invalid_config",
            EngineError::UnknownShape(_) => "unknown_shape",
        }
    }

    pub fn message(&self) -> String {
        match self {
            EngineError::InvalidGridSize { width, height } => {
                format!("grid must have at least one cell, got {width}x{height}")
            }
            EngineError::InvalidCellSize(size) => {
                format!("cell size must be positive, got {size}")
            }
            EngineError::InvalidDelay(name) => format!("{name} must be at least one frame"),
            EngineError::UnknownShape(id) => format!("shape id {id} is not in the catalog"),
            EngineError::InvalidConfig(reason) => format!("config could not be parsed: {reason}"),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EngineError::InvalidGridSize {
                width: 0,
                height: 20
            }
            .code(),
            "invalid_grid"
        );
        assert_eq!(EngineError::InvalidDelay("lock_delay").code(), "invalid_config");
        assert_eq!(EngineError::UnknownShape(9).code(), "unknown_shape");
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::InvalidCellSize(-4);
        assert_eq!(
            err.to_string(),
            "invalid_grid: cell size must be positive, got -4"
        );
    }
}
