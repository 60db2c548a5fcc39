//! Error types for voxelgrid-rs.

use thiserror::Error;

/// The main error type for voxel lattice operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// Voxel size is zero, negative, or not finite.
    #[error("invalid voxel size {0}: must be finite and greater than zero")]
    InvalidVoxelSize(f64),

    /// Bounding volume is inverted or has a non-finite corner.
    #[error("invalid bounds on axis {axis}: min {min} > max {max} or not finite")]
    InvalidBounds { axis: usize, min: f64, max: f64 },

    /// The lattice would hold more cells than the configured limit.
    #[error("lattice needs {requested} cells, limit is {limit}")]
    TooManyCells { requested: u64, limit: usize },

    /// Output buffer length does not match the lattice.
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Instance scale factor is outside `(0, 1]`.
    #[error("invalid scale factor {0}: must be in (0, 1]")]
    InvalidScaleFactor(f32),

    /// Maximum cell count is zero.
    #[error("invalid cell limit: must be at least 1")]
    InvalidCellLimit,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for voxel lattice operations.
pub type Result<T> = std::result::Result<T, GridError>;
