//! Error types for shapeshift.

use thiserror::Error;

/// Crate-wide error type.
///
/// Only construction and loading can fail. Runtime growth operations are
/// infallible and degrade to no-ops instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A block or app configuration violates its invariants
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A lateral block whose yaw is not one of the four cardinal angles
    #[error("Unsupported orientation: yaw {yaw} is not a cardinal angle")]
    UnsupportedOrientation { yaw: f32 },

    /// Entity or resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Level description could not be loaded
    #[error("Level error: {0}")]
    Level(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
