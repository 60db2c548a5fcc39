//! Per-cell instance transforms.
//!
//! Each cell gets one column-major 4x4 matrix with a uniform scale on the
//! diagonal and the cell center as translation:
//!
//! ```text
//! offset:  0  1  2  3 | 4  5  6  7 | 8  9 10 11 | 12 13 14 15
//! value:   s  0  0  0 | 0  s  0  0 | 0  0  s  0 | cx cy cz  1
//! ```

#![allow(clippy::cast_possible_truncation)]

use glam::{DVec3, Mat4};

use crate::bounds::BoundingVolume;
use crate::error::{GridError, Result};
use crate::lattice::{lattice_origin, validate_voxel_size, LatticeDimensions};

/// Number of floats in one instance transform.
pub const FLOATS_PER_TRANSFORM: usize = 16;

/// GPU-compatible per-instance transform.
///
/// Layout matches one 16-float block of a transform buffer, so a
/// `[InstanceTransform]` can be cast to `[f32]` with `bytemuck`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    /// Matrix columns.
    pub cols: [[f32; 4]; 4],
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            cols: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

impl InstanceTransform {
    /// Creates a uniform-scale transform centered at `center`.
    #[must_use]
    pub fn new(scale: f32, center: DVec3) -> Self {
        Self {
            cols: [
                [scale, 0.0, 0.0, 0.0],
                [0.0, scale, 0.0, 0.0],
                [0.0, 0.0, scale, 0.0],
                [center.x as f32, center.y as f32, center.z as f32, 1.0],
            ],
        }
    }

    /// Converts to a glam matrix.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.cols)
    }

    /// Converts from a glam matrix.
    #[must_use]
    pub fn from_mat4(matrix: Mat4) -> Self {
        Self {
            cols: matrix.to_cols_array_2d(),
        }
    }

    /// Returns the translation component.
    #[must_use]
    pub fn translation(&self) -> [f32; 3] {
        let [x, y, z, _] = self.cols[3];
        [x, y, z]
    }
}

/// Checks that an instance scale factor lies in `(0, 1]`.
pub fn validate_scale_factor(scale_factor: f32) -> Result<()> {
    if scale_factor > 0.0 && scale_factor <= 1.0 {
        Ok(())
    } else {
        Err(GridError::InvalidScaleFactor(scale_factor))
    }
}

/// Returns the buffer length in floats needed for `dims`.
#[must_use]
pub fn buffer_len(dims: LatticeDimensions) -> usize {
    dims.count().saturating_mul(FLOATS_PER_TRANSFORM)
}

/// Writes one transform per cell of `dims` into `out`.
///
/// Cells are written in linear index order (x fastest, then y, then z). Every
/// float of `out` is overwritten. All inputs are checked before the first
/// write, so `out` is left untouched on error.
///
/// # Errors
///
/// Fails if the voxel size, bounds or scale factor are invalid, or if
/// `out.len() != dims.count() * 16`.
pub fn build(
    bounds: &BoundingVolume,
    voxel_size: f64,
    dims: LatticeDimensions,
    scale_factor: f32,
    out: &mut [f32],
) -> Result<()> {
    validate_voxel_size(voxel_size)?;
    bounds.validate()?;
    validate_scale_factor(scale_factor)?;

    let expected = buffer_len(dims);
    if out.len() != expected {
        return Err(GridError::BufferSizeMismatch {
            expected,
            actual: out.len(),
        });
    }

    let template: [f32; FLOATS_PER_TRANSFORM] =
        bytemuck::cast(InstanceTransform::new(scale_factor, DVec3::ZERO).cols);
    let origin = lattice_origin(bounds, voxel_size);

    let mut blocks = out.chunks_exact_mut(FLOATS_PER_TRANSFORM);
    for z in 0..dims.nz {
        let cz = axis_center(origin.z, voxel_size, z);
        for y in 0..dims.ny {
            let cy = axis_center(origin.y, voxel_size, y);
            for x in 0..dims.nx {
                let cx = axis_center(origin.x, voxel_size, x);
                // length already checked against dims
                let Some(block) = blocks.next() else {
                    return Ok(());
                };
                block.copy_from_slice(&template);
                block[12] = cx;
                block[13] = cy;
                block[14] = cz;
            }
        }
    }
    Ok(())
}

/// Typed variant of [`build`] writing into a slice of [`InstanceTransform`].
///
/// # Errors
///
/// Same as [`build`], with `out.len()` counted in transforms.
pub fn build_instances(
    bounds: &BoundingVolume,
    voxel_size: f64,
    dims: LatticeDimensions,
    scale_factor: f32,
    out: &mut [InstanceTransform],
) -> Result<()> {
    if out.len() != dims.count() {
        return Err(GridError::BufferSizeMismatch {
            expected: dims.count(),
            actual: out.len(),
        });
    }
    build(
        bounds,
        voxel_size,
        dims,
        scale_factor,
        bytemuck::cast_slice_mut(out),
    )
}

fn axis_center(min: f64, voxel_size: f64, i: u32) -> f32 {
    (min + (f64::from(i) + 0.5) * voxel_size) as f32
}
