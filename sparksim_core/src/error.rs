//! Error types for the fallible edges of SparkSim.
//!
//! The cost model itself never fails; these errors come from parsing
//! user input and loading level data.

use thiserror::Error;

/// Errors raised while parsing options or loading level data.
#[derive(Debug, Error)]
pub enum SimError {
    /// A knob value was not one of the recognized options
    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },

    /// No level with the requested id exists in the level set
    #[error("Unknown level: {0}")]
    UnknownLevel(String),

    /// Level or configuration data could not be decoded
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading a data file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Creates an unknown-option error.
    pub fn unknown_option(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownOption {
            kind,
            value: value.into(),
        }
    }

    /// Creates an unknown-level error.
    pub fn unknown_level(id: impl std::fmt::Display) -> Self {
        Self::UnknownLevel(id.to_string())
    }
}
