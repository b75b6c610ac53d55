//! Error types for terra

use thiserror::Error;

/// The main error type for terra operations
#[derive(Debug, Error)]
pub enum TerraError {
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("No active zone")]
    NoActiveZone,

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Result type alias for terra operations
pub type Result<T> = std::result::Result<T, TerraError>;
