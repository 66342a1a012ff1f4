//! Instance data structures for voxel rendering.
//!
//! Every solid voxel is drawn as one instance of a shared unit cube. This
//! module defines the per-instance record a render surface uploads.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockType;

/// One unit-cube instance.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), the cube's center in world space
/// - Block id: u32 (4 bytes)
///
/// Total size: 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockInstance {
    /// Cube center in world space
    pub position: [f32; 3],
    /// Voxel id of the block this cube shows
    pub block_id: u32,
}

impl BlockInstance {
    /// Creates the instance for the voxel at world coordinate `world`.
    pub fn new(world: Point3<i32>, block_type: BlockType) -> Self {
        BlockInstance {
            position: [world.x as f32, world.y as f32, world.z as f32],
            block_id: block_type.voxel() as u32,
        }
    }

    /// World voxel coordinate this instance was built from.
    pub fn world_position(&self) -> Point3<i32> {
        Point3::new(
            self.position[0] as i32,
            self.position[1] as i32,
            self.position[2] as i32,
        )
    }
}
