//! Error types for gamut compression.
//!
//! The math engine itself never fails: numeric degeneracies degrade to a
//! deterministic value. Errors only come from the outer surfaces:
//! - parameter validation
//! - packed buffer shape checks
//! - config file I/O and YAML parsing

use thiserror::Error;

/// Error type for gamut compression operations.
#[derive(Error, Debug)]
pub enum GamutError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer does not match the requested channel layout.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// I/O error reading or writing config files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for gamut compression operations.
pub type GamutResult<T> = Result<T, GamutError>;
