//! Lattice dimensioning and cell indexing.
//!
//! Cells are enumerated with x varying fastest, then y, then z. The linear
//! index of cell `(x, y, z)` is `x + nx * (y + ny * z)`. Renderers reading the
//! instance buffer rely on this order.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use std::fmt;

use glam::{DVec3, UVec3};
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingVolume;
use crate::error::{GridError, Result};

/// Default upper bound on the number of cells in one lattice.
pub const DEFAULT_MAX_CELL_COUNT: usize = 1 << 24;

/// Rounding error bound, in ulps, for `(max - min) / voxel_size`.
const SNAP_ULPS: f64 = 4.0;

/// Number of cells along each axis of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LatticeDimensions {
    /// Cells along X.
    pub nx: u32,
    /// Cells along Y.
    pub ny: u32,
    /// Cells along Z.
    pub nz: u32,
}

impl LatticeDimensions {
    /// Creates lattice dimensions from per-axis cell counts.
    #[must_use]
    pub const fn new(nx: u32, ny: u32, nz: u32) -> Self {
        Self { nx, ny, nz }
    }

    /// Returns the total number of cells, saturating at `usize::MAX`.
    #[must_use]
    pub fn count(&self) -> usize {
        (self.nx as usize)
            .saturating_mul(self.ny as usize)
            .saturating_mul(self.nz as usize)
    }

    /// Returns true if the lattice holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0 || self.nz == 0
    }

    /// Returns the dimensions as a vector.
    #[must_use]
    pub fn as_uvec3(&self) -> UVec3 {
        UVec3::new(self.nx, self.ny, self.nz)
    }

    /// Flattens a cell coordinate to its linear index.
    ///
    /// Returns `None` if the coordinate lies outside the lattice.
    #[must_use]
    pub fn linear_index(&self, coord: UVec3) -> Option<usize> {
        if coord.cmpge(self.as_uvec3()).any() {
            return None;
        }
        let (nx, ny) = (self.nx as usize, self.ny as usize);
        (coord.z as usize)
            .checked_mul(ny)?
            .checked_add(coord.y as usize)?
            .checked_mul(nx)?
            .checked_add(coord.x as usize)
    }

    /// Unflattens a linear index to its cell coordinate.
    ///
    /// Returns `None` if `index >= self.count()`.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<UVec3> {
        if index >= self.count() {
            return None;
        }
        let (nx, ny) = (self.nx as usize, self.ny as usize);
        let x = index % nx;
        let y = (index / nx) % ny;
        let z = index / (nx * ny);
        Some(UVec3::new(x as u32, y as u32, z as u32))
    }
}

impl From<UVec3> for LatticeDimensions {
    fn from(v: UVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for LatticeDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {}", self.nx, self.ny, self.nz)
    }
}

/// Checks that a voxel edge length is finite and positive.
pub fn validate_voxel_size(voxel_size: f64) -> Result<()> {
    if voxel_size.is_finite() && voxel_size > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidVoxelSize(voxel_size))
    }
}

/// Computes lattice dimensions using [`DEFAULT_MAX_CELL_COUNT`] as the limit.
pub fn dimension(bounds: &BoundingVolume, voxel_size: f64) -> Result<LatticeDimensions> {
    dimension_with_limit(bounds, voxel_size, DEFAULT_MAX_CELL_COUNT)
}

/// Computes the number of cells of edge `voxel_size` needed to cover `bounds`.
///
/// Each axis gets `ceil(extent / voxel_size)` cells. An extent that is an exact
/// multiple of the voxel size gets exactly that many cells, and a flat axis
/// gets one.
///
/// # Errors
///
/// Fails if the voxel size or bounds are invalid, if `max_cell_count` is zero,
/// or if the lattice would need more than `max_cell_count` cells.
pub fn dimension_with_limit(
    bounds: &BoundingVolume,
    voxel_size: f64,
    max_cell_count: usize,
) -> Result<LatticeDimensions> {
    validate_voxel_size(voxel_size)?;
    bounds.validate()?;
    if max_cell_count == 0 {
        return Err(GridError::InvalidCellLimit);
    }

    let size = bounds.size();
    let magnitude = bounds.min.abs().max(bounds.max.abs());
    let cells = [
        axis_cells(size.x, magnitude.x, voxel_size),
        axis_cells(size.y, magnitude.y, voxel_size),
        axis_cells(size.z, magnitude.z, voxel_size),
    ];

    if cells.iter().any(|&n| n > f64::from(u32::MAX)) {
        let product = cells[0] * cells[1] * cells[2];
        let requested = if product >= u64::MAX as f64 {
            u64::MAX
        } else {
            product as u64
        };
        return Err(GridError::TooManyCells {
            requested,
            limit: max_cell_count,
        });
    }

    let dims = LatticeDimensions::new(cells[0] as u32, cells[1] as u32, cells[2] as u32);
    let count = u128::from(dims.nx) * u128::from(dims.ny) * u128::from(dims.nz);
    if count > max_cell_count as u128 {
        return Err(GridError::TooManyCells {
            requested: u64::try_from(count).unwrap_or(u64::MAX),
            limit: max_cell_count,
        });
    }

    Ok(dims)
}

/// Cell count along one axis, as a float so oversized results can be reported.
///
/// `magnitude` is the larger absolute corner coordinate on the axis. The
/// quotient only snaps down to an integer when it lies within the rounding
/// error of computing the extent from corners of that size.
fn axis_cells(extent: f64, magnitude: f64, voxel_size: f64) -> f64 {
    if extent <= 0.0 {
        return 1.0;
    }
    let quotient = extent / voxel_size;
    let nearest = quotient.round();
    let tolerance = SNAP_ULPS * f64::EPSILON * (magnitude / voxel_size + quotient);
    if nearest >= 1.0 && (quotient - nearest).abs() <= tolerance {
        nearest
    } else {
        quotient.ceil()
    }
}

/// Returns the world-space corner of cell `(0, 0, 0)`.
///
/// This is `bounds.min`, except on flat axes where the single layer of cells
/// is centered on the plane of the volume.
#[must_use]
pub fn lattice_origin(bounds: &BoundingVolume, voxel_size: f64) -> DVec3 {
    let flat = bounds.size().cmple(DVec3::ZERO);
    DVec3::select(flat, bounds.min - 0.5 * voxel_size, bounds.min)
}

/// Returns the world-space center of the cell at `coord`.
#[must_use]
pub fn cell_center(bounds: &BoundingVolume, voxel_size: f64, coord: UVec3) -> DVec3 {
    lattice_origin(bounds, voxel_size) + (coord.as_dvec3() + 0.5) * voxel_size
}

/// Returns the coordinate of the cell containing `point`.
///
/// Points on the upper faces of `bounds` belong to the last cell along that
/// axis. Returns `None` for points outside `bounds`, an empty lattice, or an
/// invalid voxel size.
#[must_use]
pub fn cell_of_point(
    bounds: &BoundingVolume,
    voxel_size: f64,
    dims: LatticeDimensions,
    point: DVec3,
) -> Option<UVec3> {
    if validate_voxel_size(voxel_size).is_err() || dims.is_empty() || !bounds.contains(point) {
        return None;
    }
    let rel = ((point - lattice_origin(bounds, voxel_size)) / voxel_size).floor();
    let last = (dims.as_uvec3() - UVec3::ONE).as_dvec3();
    Some(rel.clamp(DVec3::ZERO, last).as_uvec3())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_bounds(max: DVec3) -> BoundingVolume {
        BoundingVolume::new(DVec3::ZERO, max)
    }

    #[test]
    fn test_dimension_basic() {
        let bounds = unit_bounds(DVec3::new(2.0, 1.0, 0.5));
        let dims = dimension(&bounds, 0.5).unwrap();
        assert_eq!(dims, LatticeDimensions::new(4, 2, 1));
        assert_eq!(dims.count(), 8);
    }

    #[test]
    fn test_dimension_rounds_up() {
        let bounds = unit_bounds(DVec3::new(2.1, 0.9, 0.2));
        let dims = dimension(&bounds, 0.5).unwrap();
        assert_eq!(dims, LatticeDimensions::new(5, 2, 1));
    }

    #[test]
    fn test_dimension_exact_multiple_no_extra_cell() {
        // 0.3 / 0.1 and 0.7 / 0.1 are not exact in binary floating point
        let bounds = unit_bounds(DVec3::new(0.3, 0.7, 1.0));
        let dims = dimension(&bounds, 0.1).unwrap();
        assert_eq!(dims, LatticeDimensions::new(3, 7, 10));
    }

    #[test]
    fn test_dimension_partial_cell_on_long_axis() {
        let bounds = unit_bounds(DVec3::new(1000.000_001, 1.0, 1.0));
        let dims = dimension(&bounds, 1.0).unwrap();
        assert_eq!(dims.nx, 1001);

        let bounds = unit_bounds(DVec3::new(10_000_000.005, 0.0, 0.0));
        let dims = dimension(&bounds, 1.0).unwrap();
        assert_eq!(dims.nx, 10_000_001);
        assert!(f64::from(dims.nx) >= bounds.size().x);
    }

    #[test]
    fn test_dimension_exact_multiple_offset_bounds() {
        let min = DVec3::new(1.0e5, -250.0, 0.0);
        let max = min + DVec3::new(3000.0 * 0.1, 0.0, 0.0);
        let dims = dimension(&BoundingVolume::new(min, max), 0.1).unwrap();
        assert_eq!(dims, LatticeDimensions::new(3000, 1, 1));
    }

    #[test]
    fn test_dimension_flat_axis_clamps_to_one() {
        let bounds = unit_bounds(DVec3::new(2.0, 0.0, 1.0));
        let dims = dimension(&bounds, 1.0).unwrap();
        assert_eq!(dims, LatticeDimensions::new(2, 1, 1));
    }

    #[test]
    fn test_dimension_point_volume() {
        let bounds = BoundingVolume::from_point(DVec3::new(-3.0, 2.0, 7.5));
        let dims = dimension(&bounds, 0.25).unwrap();
        assert_eq!(dims.count(), 1);
    }

    #[test]
    fn test_dimension_invalid_voxel_size() {
        let bounds = unit_bounds(DVec3::ONE);
        for voxel_size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                dimension(&bounds, voxel_size),
                Err(GridError::InvalidVoxelSize(_))
            ));
        }
    }

    #[test]
    fn test_dimension_invalid_bounds() {
        let bounds = BoundingVolume::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 1.0));
        assert!(matches!(
            dimension(&bounds, 0.5),
            Err(GridError::InvalidBounds { axis: 0, .. })
        ));
    }

    #[test]
    fn test_dimension_too_many_cells() {
        let bounds = unit_bounds(DVec3::splat(10.0));
        let err = dimension_with_limit(&bounds, 1.0, 999).unwrap_err();
        match err {
            GridError::TooManyCells { requested, limit } => {
                assert_eq!(requested, 1000);
                assert_eq!(limit, 999);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(dimension_with_limit(&bounds, 1.0, 1000).is_ok());
    }

    #[test]
    fn test_dimension_axis_overflow_saturates() {
        let bounds = unit_bounds(DVec3::splat(1.0e12));
        let err = dimension(&bounds, 1.0e-3).unwrap_err();
        assert!(matches!(
            err,
            GridError::TooManyCells {
                requested: u64::MAX,
                ..
            }
        ));
    }

    #[test]
    fn test_dimension_zero_limit() {
        let bounds = unit_bounds(DVec3::ONE);
        assert!(matches!(
            dimension_with_limit(&bounds, 1.0, 0),
            Err(GridError::InvalidCellLimit)
        ));
    }

    #[test]
    fn test_index_conversion() {
        let dims = LatticeDimensions::new(5, 6, 7);
        let idx = dims.linear_index(UVec3::new(2, 3, 4)).unwrap();
        assert_eq!(idx, 2 + 5 * (3 + 6 * 4));
        assert_eq!(dims.coord_of(idx), Some(UVec3::new(2, 3, 4)));
    }

    #[test]
    fn test_index_out_of_range() {
        let dims = LatticeDimensions::new(2, 2, 2);
        assert_eq!(dims.linear_index(UVec3::new(2, 0, 0)), None);
        assert_eq!(dims.coord_of(8), None);
        assert_eq!(LatticeDimensions::default().coord_of(0), None);
    }

    #[test]
    fn test_linear_index_overflow() {
        let dims = LatticeDimensions::new(u32::MAX, u32::MAX, u32::MAX);
        let last = dims.as_uvec3() - UVec3::ONE;
        assert_eq!(dims.linear_index(last), None);
        assert_eq!(dims.linear_index(UVec3::new(1, 0, 0)), Some(1));
    }

    #[test]
    fn test_x_varies_fastest() {
        let dims = LatticeDimensions::new(3, 2, 2);
        assert_eq!(dims.coord_of(0), Some(UVec3::new(0, 0, 0)));
        assert_eq!(dims.coord_of(1), Some(UVec3::new(1, 0, 0)));
        assert_eq!(dims.coord_of(3), Some(UVec3::new(0, 1, 0)));
        assert_eq!(dims.coord_of(6), Some(UVec3::new(0, 0, 1)));
        assert_eq!(dims.coord_of(11), Some(UVec3::new(2, 1, 1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(LatticeDimensions::new(4, 2, 1).to_string(), "4 x 2 x 1");
    }

    #[test]
    fn test_cell_center() {
        let bounds = unit_bounds(DVec3::new(2.0, 1.0, 0.5));
        let c0 = cell_center(&bounds, 0.5, UVec3::ZERO);
        assert!((c0 - DVec3::splat(0.25)).length() < 1e-12);
        let c7 = cell_center(&bounds, 0.5, UVec3::new(3, 1, 0));
        assert!((c7 - DVec3::new(1.75, 0.75, 0.25)).length() < 1e-12);
    }

    #[test]
    fn test_cell_center_flat_axis() {
        let point = DVec3::new(1.0, -2.0, 3.0);
        let bounds = BoundingVolume::from_point(point);
        assert_eq!(cell_center(&bounds, 0.5, UVec3::ZERO), point);

        let slab = BoundingVolume::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0));
        let c = cell_center(&slab, 0.5, UVec3::new(1, 0, 1));
        assert_eq!(c, DVec3::new(0.75, 0.0, 0.75));
        assert_eq!(
            cell_of_point(&slab, 0.5, LatticeDimensions::new(2, 1, 2), c),
            Some(UVec3::new(1, 0, 1))
        );
    }

    #[test]
    fn test_cell_of_point() {
        let bounds = unit_bounds(DVec3::new(2.0, 1.0, 0.5));
        let dims = dimension(&bounds, 0.5).unwrap();
        assert_eq!(
            cell_of_point(&bounds, 0.5, dims, DVec3::new(1.6, 0.1, 0.3)),
            Some(UVec3::new(3, 0, 0))
        );
        assert_eq!(
            cell_of_point(&bounds, 0.5, dims, DVec3::new(2.0, 1.0, 0.5)),
            Some(UVec3::new(3, 1, 0))
        );
        assert_eq!(
            cell_of_point(&bounds, 0.5, dims, DVec3::new(-0.1, 0.0, 0.0)),
            None
        );
        for voxel_size in [0.0, -0.5, f64::NAN] {
            assert_eq!(
                cell_of_point(&bounds, voxel_size, dims, DVec3::splat(0.25)),
                None
            );
        }
    }

    proptest! {
        #[test]
        fn prop_count_matches_product(
            ext in prop::array::uniform3(0.0f64..50.0),
            voxel_size in 0.5f64..5.0,
        ) {
            let bounds = unit_bounds(DVec3::from_array(ext));
            let dims = dimension(&bounds, voxel_size).unwrap();
            prop_assert!(dims.nx >= 1 && dims.ny >= 1 && dims.nz >= 1);
            prop_assert_eq!(dims.count(), (dims.nx * dims.ny * dims.nz) as usize);
        }

        #[test]
        fn prop_lattice_covers_bounds(
            ext in prop::array::uniform3(0.0f64..50.0),
            voxel_size in 0.5f64..5.0,
        ) {
            let bounds = unit_bounds(DVec3::from_array(ext));
            let dims = dimension(&bounds, voxel_size).unwrap();
            let covered = dims.as_uvec3().as_dvec3() * voxel_size;
            let size = bounds.size();
            prop_assert!(covered.cmpge(size - 1e-6).all());
            // never more than one extra partial cell per axis
            prop_assert!((covered - size).cmplt(DVec3::splat(voxel_size) + 1e-6).all());
        }

        #[test]
        fn prop_long_axis_never_undercounts(
            extent in 1.0f64..1.0e6,
            voxel_size in 0.5f64..4.0,
        ) {
            let bounds = unit_bounds(DVec3::new(extent, 0.0, 0.0));
            let dims = dimension(&bounds, voxel_size).unwrap();
            let quotient = extent / voxel_size;
            prop_assert!(f64::from(dims.nx) >= quotient * (1.0 - 1e-12));
            prop_assert!(f64::from(dims.nx) < quotient + 1.0);
        }

        #[test]
        fn prop_exact_multiple(
            k in prop::array::uniform3(1u32..200),
            voxel_size in 0.01f64..3.0,
        ) {
            let max = UVec3::from_array(k).as_dvec3() * voxel_size;
            let dims = dimension(&unit_bounds(max), voxel_size).unwrap();
            prop_assert_eq!(dims.as_uvec3(), UVec3::from_array(k));
        }

        #[test]
        fn prop_index_roundtrip(
            nx in 1u32..40,
            ny in 1u32..40,
            nz in 1u32..40,
            seed in any::<usize>(),
        ) {
            let dims = LatticeDimensions::new(nx, ny, nz);
            let idx = seed % dims.count();
            let coord = dims.coord_of(idx).unwrap();
            prop_assert_eq!(dims.linear_index(coord), Some(idx));
        }
    }
}
