//! Error types
//!
//! Only configuration problems are fatal. Placement starvation, unreachable
//! hallway edges and triangulation degeneracy are reported through logging
//! and `GenerationStats` instead.

use thiserror::Error;

/// Rejected generator configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid extent must be positive, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },

    #[error("grid extent {width}x{height} exceeds the {max} cell limit")]
    GridTooLarge { width: i32, height: i32, max: i32 },

    #[error("roof extension {value} exceeds {max}")]
    RoofExtensionTooLarge { value: u32, max: u32 },

    #[error("room {axis} must be at least 1, got {value}")]
    ZeroRoomSize { axis: &'static str, value: i32 },

    #[error("room min {axis} {min} exceeds max {axis} {max}")]
    InvertedRoomSize {
        axis: &'static str,
        min: i32,
        max: i32,
    },

    #[error("room min {axis} {min} does not fit in grid {axis} {extent}")]
    RoomLargerThanGrid {
        axis: &'static str,
        min: i32,
        extent: i32,
    },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{name} must be at least 1")]
    InvalidBudget { name: &'static str },

    #[error("could not read config: {0}")]
    Io(String),

    #[error("could not parse config: {0}")]
    Parse(String),
}

/// Errors surfaced by a generation call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
