//! Caller-side voxel grid holder.
//!
//! [`VoxelGrid`] keeps the current bounds, configuration and transform buffer
//! for one voxelized volume, and recomputes explicitly whenever an input is
//! changed through its setters.

use voxelgrid_core::{
    buffer_len, build, dimension_with_limit, validate_scale_factor, BoundingVolume, GridConfig,
    InstanceTransform, LatticeDimensions, Result,
};

/// Summary of a lattice for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridStats {
    /// Cells along each axis.
    pub dims: LatticeDimensions,
    /// Total number of cells.
    pub total: usize,
}

/// A voxelized bounding volume with its instance transform buffer.
///
/// The buffer is reused across recomputations and only reallocated when the
/// lattice grows. A failed update leaves the grid exactly as it was.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    config: GridConfig,
    bounds: Option<BoundingVolume>,
    visible: bool,

    dims: LatticeDimensions,
    transforms: Vec<f32>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self {
            config: GridConfig::default(),
            bounds: None,
            visible: true,
            dims: LatticeDimensions::default(),
            transforms: Vec::new(),
        }
    }
}

impl VoxelGrid {
    /// Creates an empty grid with the given configuration.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Creates a grid over `bounds` and computes its transforms.
    pub fn with_bounds(config: GridConfig, bounds: BoundingVolume) -> Result<Self> {
        let mut grid = Self::new(config)?;
        grid.set_bounds(bounds)?;
        Ok(grid)
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns the current bounds, if any.
    pub fn bounds(&self) -> Option<&BoundingVolume> {
        self.bounds.as_ref()
    }

    /// Returns the current lattice dimensions.
    pub fn dims(&self) -> LatticeDimensions {
        self.dims
    }

    /// Returns the number of cells in the current lattice.
    pub fn cell_count(&self) -> usize {
        self.dims.count()
    }

    /// Returns the flat transform buffer, 16 floats per cell.
    pub fn transforms(&self) -> &[f32] {
        &self.transforms
    }

    /// Returns the transform buffer viewed as one transform per cell.
    pub fn instances(&self) -> &[InstanceTransform] {
        bytemuck::cast_slice(self.transforms.as_slice())
    }

    /// Returns the lattice summary.
    pub fn stats(&self) -> GridStats {
        GridStats {
            dims: self.dims,
            total: self.dims.count(),
        }
    }

    /// Gets whether the grid should be drawn.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sets whether the grid should be drawn. Does not recompute.
    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }

    /// Sets the bounds and recomputes.
    pub fn set_bounds(&mut self, bounds: BoundingVolume) -> Result<&mut Self> {
        let config = self.config.clone();
        self.recompute(&config, bounds)?;
        self.bounds = Some(bounds);
        Ok(self)
    }

    /// Removes the bounds and empties the grid.
    pub fn clear_bounds(&mut self) -> &mut Self {
        self.bounds = None;
        self.dims = LatticeDimensions::default();
        self.transforms.clear();
        self
    }

    /// Sets the voxel size and recomputes.
    pub fn set_voxel_size(&mut self, voxel_size: f64) -> Result<&mut Self> {
        let config = self.config.clone().with_voxel_size(voxel_size);
        self.set_config(config)
    }

    /// Sets the instance scale factor and recomputes.
    pub fn set_scale_factor(&mut self, scale_factor: f32) -> Result<&mut Self> {
        let config = self.config.clone().with_scale_factor(scale_factor);
        self.set_config(config)
    }

    /// Replaces the whole configuration and recomputes.
    pub fn set_config(&mut self, config: GridConfig) -> Result<&mut Self> {
        if let Err(e) = config.validate() {
            log::warn!("rejected voxel grid config: {e}");
            return Err(e);
        }
        if let Some(bounds) = self.bounds {
            self.recompute(&config, bounds)?;
        }
        self.config = config;
        Ok(self)
    }

    /// Recomputes dimensions and transforms, committing only on success.
    fn recompute(&mut self, config: &GridConfig, bounds: BoundingVolume) -> Result<()> {
        validate_scale_factor(config.scale_factor)?;
        let dims = match dimension_with_limit(&bounds, config.voxel_size, config.max_cell_count) {
            Ok(dims) => dims,
            Err(e) => {
                log::warn!("voxel grid not updated: {e}");
                return Err(e);
            }
        };

        // Inputs are validated above, so the build below cannot fail on them
        // and the buffer is never left half-written.
        self.transforms.resize(buffer_len(dims), 0.0);
        build(
            &bounds,
            config.voxel_size,
            dims,
            config.scale_factor,
            &mut self.transforms,
        )?;
        self.dims = dims;

        log::debug!(
            "voxel grid recomputed: {} cells ({dims}), voxel size {}",
            dims.count(),
            config.voxel_size
        );
        Ok(())
    }
}
