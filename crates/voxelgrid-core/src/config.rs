//! Configuration for voxel lattice generation.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::lattice::{validate_voxel_size, DEFAULT_MAX_CELL_COUNT};
use crate::transform::validate_scale_factor;

/// Smallest voxel size offered by interactive controls.
pub const MIN_SUGGESTED_VOXEL_SIZE: f64 = 0.1;

/// Largest voxel size offered by interactive controls.
pub const MAX_SUGGESTED_VOXEL_SIZE: f64 = 2.0;

/// Caller-facing lattice configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of one cubic cell.
    pub voxel_size: f64,

    /// Uniform scale applied to each instance, leaving a gap between cells.
    pub scale_factor: f32,

    /// Upper bound on cells per lattice.
    pub max_cell_count: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            voxel_size: 2.0,
            scale_factor: 0.95,
            max_cell_count: DEFAULT_MAX_CELL_COUNT,
        }
    }
}

impl GridConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the voxel size.
    #[must_use]
    pub fn with_voxel_size(mut self, voxel_size: f64) -> Self {
        self.voxel_size = voxel_size;
        self
    }

    /// Sets the instance scale factor.
    #[must_use]
    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Sets the maximum cell count.
    #[must_use]
    pub fn with_max_cell_count(mut self, max_cell_count: usize) -> Self {
        self.max_cell_count = max_cell_count;
        self
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        validate_voxel_size(self.voxel_size)?;
        validate_scale_factor(self.scale_factor)?;
        if self.max_cell_count == 0 {
            return Err(GridError::InvalidCellLimit);
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
