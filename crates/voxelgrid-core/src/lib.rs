//! Core engine for voxelgrid-rs.
//!
//! This crate partitions an axis-aligned bounding volume into a uniform lattice
//! of cubic cells and writes one instance transform per cell:
//! - [`dimension`] computes lattice dimensions for a volume and voxel size
//! - [`build`] fills a caller-owned `f32` buffer with column-major 4x4 transforms
//! - [`BoundingVolume`] and [`LatticeDimensions`] describe inputs and results
//! - [`GridConfig`] holds the caller-facing settings
//!
//! All operations are pure and hold no state between calls.

// Internal functions don't need exhaustive error docs
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod bounds;
pub mod config;
pub mod error;
pub mod lattice;
pub mod transform;

pub use bounds::BoundingVolume;
pub use config::{GridConfig, MAX_SUGGESTED_VOXEL_SIZE, MIN_SUGGESTED_VOXEL_SIZE};
pub use error::{GridError, Result};
pub use lattice::{
    cell_center, cell_of_point, dimension, dimension_with_limit, lattice_origin,
    validate_voxel_size, LatticeDimensions, DEFAULT_MAX_CELL_COUNT,
};
pub use transform::{
    buffer_len, build, build_instances, validate_scale_factor, InstanceTransform,
    FLOATS_PER_TRANSFORM,
};

// Re-export glam types for convenience
pub use glam::{DVec3, Mat4, UVec3};
