//! Error types for simulation construction, matrix import and config files.

use std::fmt;

/// Invalid simulation parameters, rejected before any simulation is created
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoParticles,
    NoColors,
    InvalidDt(f64),
    InvalidMaxRadius(f64),
    InvalidFrictionHalfLife(f64),
    InvalidBeta(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoParticles => write!(f, "particle_count must be greater than 0"),
            ConfigError::NoColors => write!(f, "color_count must be greater than 0"),
            ConfigError::InvalidDt(v) => write!(f, "dt must be positive and finite (got {v})"),
            ConfigError::InvalidMaxRadius(v) => {
                write!(f, "max_radius must be positive and finite (got {v})")
            }
            ConfigError::InvalidFrictionHalfLife(v) => {
                write!(f, "friction_half_life must be non-negative and finite (got {v})")
            }
            ConfigError::InvalidBeta(v) => {
                write!(f, "beta must lie strictly between 0 and 1 (got {v})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised when an attraction matrix is supplied from outside the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Row count or row length does not match the expected color count
    SizeMismatch { expected: usize, actual: usize },
    /// A coefficient outside [-1, 1] (or not finite)
    OutOfRange { row: usize, col: usize, value: f64 },
    /// A token that is not a number
    Parse { row: usize, token: String },
    /// No rows at all
    Empty,
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::SizeMismatch { expected, actual } => {
                write!(f, "matrix size mismatch: expected {expected}, got {actual}")
            }
            MatrixError::OutOfRange { row, col, value } => {
                write!(f, "matrix entry ({row}, {col}) = {value} is outside [-1, 1]")
            }
            MatrixError::Parse { row, token } => {
                write!(f, "could not parse '{token}' on matrix row {row}")
            }
            MatrixError::Empty => write!(f, "matrix text contains no rows"),
        }
    }
}

impl std::error::Error for MatrixError {}

/// Errors from building a simulation around caller-supplied state
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    Matrix(MatrixError),
    /// Parallel arrays of different lengths, or length != particle_count
    StateLength { expected: usize, actual: usize },
    /// A particle whose color index is not below color_count
    ColorOutOfRange { index: usize, color: usize },
    /// A particle with a NaN or infinite position or velocity
    NonFinite { index: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "Invalid configuration: {}", e),
            SimulationError::Matrix(e) => write!(f, "Invalid attraction matrix: {}", e),
            SimulationError::StateLength { expected, actual } => write!(
                f,
                "particle state holds {actual} particles, expected {expected}"
            ),
            SimulationError::ColorOutOfRange { index, color } => {
                write!(f, "particle {index} has color {color} outside the palette")
            }
            SimulationError::NonFinite { index } => {
                write!(f, "particle {index} has a non-finite position or velocity")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<MatrixError> for SimulationError {
    fn from(e: MatrixError) -> Self {
        SimulationError::Matrix(e)
    }
}

/// Errors from reading or writing JSON config and preset files
#[derive(Debug)]
pub enum ConfigFileError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(ConfigError),
    NoConfigDir,
}

impl fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFileError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigFileError::Json(e) => write!(f, "Failed to parse config file: {}", e),
            ConfigFileError::Invalid(e) => write!(f, "Invalid configuration: {}", e),
            ConfigFileError::NoConfigDir => write!(f, "Could not determine config directory"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigFileError::Io(e) => Some(e),
            ConfigFileError::Json(e) => Some(e),
            ConfigFileError::Invalid(e) => Some(e),
            ConfigFileError::NoConfigDir => None,
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(e: std::io::Error) -> Self {
        ConfigFileError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigFileError {
    fn from(e: serde_json::Error) -> Self {
        ConfigFileError::Json(e)
    }
}

impl From<ConfigError> for ConfigFileError {
    fn from(e: ConfigError) -> Self {
        ConfigFileError::Invalid(e)
    }
}
