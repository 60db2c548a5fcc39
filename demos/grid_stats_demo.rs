//! Voxel grid statistics demo.
//!
//! Voxelizes the bounding box of a small room model at several voxel sizes,
//! printing the grid dimensions and a few instance transforms.
//!
//! Run with: `RUST_LOG=debug cargo run --example grid_stats_demo`

use voxelgrid::*;

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    // Corners of a 6m x 3m x 4m room, slightly offset from the origin
    let corners = [
        DVec3::new(-3.0, 0.0, -2.0),
        DVec3::new(3.0, 0.0, -2.0),
        DVec3::new(3.0, 3.0, 2.0),
        DVec3::new(-3.0, 3.0, 2.0),
    ];
    let Some(bounds) = BoundingVolume::from_points(corners) else {
        return Ok(());
    };

    let mut grid = VoxelGrid::with_bounds(GridConfig::default(), bounds)?;
    for voxel_size in [2.0, 1.0, 0.5, 0.25, MIN_SUGGESTED_VOXEL_SIZE] {
        grid.set_voxel_size(voxel_size)?;
        let stats = grid.stats();
        println!(
            "voxel size {voxel_size:>5}: {} ({} voxels)",
            stats.dims, stats.total
        );
    }

    grid.set_voxel_size(1.0)?;
    for (i, instance) in grid.instances().iter().take(4).enumerate() {
        println!("  cell {i}: center {:?}", instance.translation());
    }

    // Pathologically small voxels are rejected rather than allocated
    if let Err(e) = grid.set_voxel_size(1.0e-4) {
        println!("voxel size too small for this room: {e}");
    }

    Ok(())
}
