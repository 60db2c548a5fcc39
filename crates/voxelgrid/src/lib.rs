//! voxelgrid-rs: uniform voxel lattices over 3D bounding volumes.
//!
//! Given the bounding box of a loaded model and a voxel edge length, this crate
//! computes how many cubic cells cover the box and produces one GPU-ready
//! instance transform per cell.
//!
//! # Quick Start
//!
//! ```
//! use voxelgrid::*;
//!
//! fn main() -> Result<()> {
//!     let bounds = BoundingVolume::try_new(DVec3::ZERO, DVec3::new(2.0, 1.0, 0.5))?;
//!
//!     // Pure engine calls: the caller owns the buffer
//!     let dims = dimension(&bounds, 0.5)?;
//!     let mut transforms = vec![0.0_f32; buffer_len(dims)];
//!     build(&bounds, 0.5, dims, 0.95, &mut transforms)?;
//!     assert_eq!(dims.count(), 8);
//!
//!     // Or keep everything together and recompute on change
//!     let mut grid = VoxelGrid::with_bounds(GridConfig::new().with_voxel_size(0.5), bounds)?;
//!     grid.set_voxel_size(0.25)?;
//!     assert_eq!(grid.stats().total, 64);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Cell order
//!
//! Cell `i` has coordinate `x = i % nx`, `y = (i / nx) % ny`, `z = i / (nx * ny)`.
//! Transform `i` occupies floats `16 * i .. 16 * i + 16` of the buffer.

// Accessors are trivially named and documented on the type
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod grid;

pub use grid::{GridStats, VoxelGrid};

// Re-export core types
pub use voxelgrid_core::{
    bounds::BoundingVolume,
    config::{GridConfig, MAX_SUGGESTED_VOXEL_SIZE, MIN_SUGGESTED_VOXEL_SIZE},
    error::{GridError, Result},
    lattice::{
        cell_center, cell_of_point, dimension, dimension_with_limit, lattice_origin,
        LatticeDimensions, DEFAULT_MAX_CELL_COUNT,
    },
    transform::{buffer_len, build, build_instances, InstanceTransform, FLOATS_PER_TRANSFORM},
    DVec3, Mat4, UVec3,
};
