//! Axis-aligned bounding volumes.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// An axis-aligned box to be voxelized.
///
/// A valid volume has finite corners with `min[i] <= max[i]` on every axis.
/// A volume with `min == max` is a single point and still voxelizes to one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl BoundingVolume {
    /// Creates a bounding volume without checking the corners.
    #[must_use]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Creates a bounding volume, rejecting inverted or non-finite corners.
    pub fn try_new(min: DVec3, max: DVec3) -> Result<Self> {
        let bounds = Self::new(min, max);
        bounds.validate()?;
        Ok(bounds)
    }

    /// Creates a degenerate volume containing a single point.
    #[must_use]
    pub const fn from_point(point: DVec3) -> Self {
        Self::new(point, point)
    }

    /// Returns the smallest volume enclosing all points, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for point in iter {
            bounds.grow(point);
        }
        Some(bounds)
    }

    /// Returns the volume enclosing a triangle.
    #[must_use]
    pub fn from_triangle(tri: [DVec3; 3]) -> Self {
        Self::new(tri[0].min(tri[1]).min(tri[2]), tri[0].max(tri[1]).max(tri[2]))
    }

    /// Expands the volume to include `point`.
    pub fn grow(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns the smallest volume enclosing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Returns the midpoint of the volume.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the extent along each axis.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Returns true if `point` lies inside the volume (faces inclusive).
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Checks that every corner is finite and `min <= max` on each axis.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min.to_array(), self.max.to_array());
        for axis in 0..3 {
            // NaN fails the comparison too
            if !(min[axis].is_finite() && max[axis].is_finite() && min[axis] <= max[axis]) {
                return Err(GridError::InvalidBounds {
                    axis,
                    min: min[axis],
                    max: max[axis],
                });
            }
        }
        Ok(())
    }
}
