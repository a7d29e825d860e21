//! Error types for bone spheres

use thiserror::Error;

/// Errors reported by sphere creation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SphereError {
    /// Radius was zero, negative or NaN
    #[error("Invalid sphere radius: {0}")]
    InvalidRadius(f32),

    /// Anchor bone could not be resolved in the skeleton
    #[error("Bone not found: {0}")]
    BoneNotFound(String),

    /// Every handle value has been issued once already
    #[error("Sphere handle space exhausted")]
    HandlesExhausted,
}

/// Result type for sphere operations
pub type Result<T> = std::result::Result<T, SphereError>;

/// Errors reported while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but violates a constraint
    #[error("Invalid config: {0}")]
    Invalid(String),
}
