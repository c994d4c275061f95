//! Configuration errors.

use thiserror::Error;

/// Rejected construction parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: u32,
        value: u32,
    },

    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvalidBounds {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("route needs at least 2 waypoints, got {0}")]
    RouteTooShort(usize),

    #[error("clock end {end} precedes start {start}")]
    EndBeforeStart { start: f64, end: f64 },

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
