//! Mesh generation for voxel rendering.
//!
//! This module converts a chunk's voxel data into [`ChunkGeometry`]: every
//! solid voxel becomes one instance of a unit cube placed at its world
//! position, grouped by block type.
//!
//! # Design
//! - No face culling is done between neighbouring solid voxels. Every solid
//!   voxel contributes a full cube, trading overdraw for a trivial builder.
//! - Batches are allocated for the chunk's maximum voxel count up front, so
//!   the scan never reallocates; they are shrunk once the scan is done.
//! - The builder is a pure function of its input. Rebuilding a chunk always
//!   produces a complete replacement, never a patch.

use cgmath::Point3;
use log::trace;

use crate::engine_state::voxels::{
    block::BlockType,
    chunk::{ChunkData, CHUNK_VOLUME},
    coords::{local_to_world, ChunkPosition},
};

use super::instance::BlockInstance;

mod geometry;

pub use geometry::{ChunkGeometry, InstanceBatch};

/// Builds the geometry for the chunk at `position` from its voxel `data`.
///
/// # Examples
///
/// ```
/// use block_world::engine_state::{
///     rendering::meshing::build_chunk_geometry,
///     voxels::{block::BlockType, chunk::ChunkData},
/// };
/// use cgmath::Point3;
///
/// let mut data = ChunkData::empty();
/// data.set(1, 2, 3, BlockType::STONE.voxel());
///
/// let geometry = build_chunk_geometry(Point3::new(1, 0, 0), &data);
/// assert_eq!(geometry.instance_count(), 1);
/// assert_eq!(geometry.batches.len(), BlockType::PALETTE.len());
/// ```
pub fn build_chunk_geometry(position: ChunkPosition, data: &ChunkData) -> ChunkGeometry {
    let mut batches: Vec<InstanceBatch> = BlockType::PALETTE
        .iter()
        .map(|&block_type| InstanceBatch::with_capacity(block_type, CHUNK_VOLUME))
        .collect();

    for (local, block_type) in data.iter_solid() {
        let local = Point3::new(local.x as i32, local.y as i32, local.z as i32);
        let world = local_to_world(position, local);
        // PALETTE holds solid ids 1.. in order.
        let batch = &mut batches[block_type.voxel() as usize - 1];
        batch.instances.push(BlockInstance::new(world, block_type));
    }

    for batch in &mut batches {
        batch.instances.shrink_to_fit();
    }

    let geometry = ChunkGeometry { position, batches };
    trace!(
        "Built geometry for chunk {:?}: {} instances",
        position,
        geometry.instance_count()
    );
    geometry
}
