//! Geometry data produced by the mesh builder.
//!
//! A chunk's geometry is a set of instance batches, one per solid block type,
//! so a render surface can issue one instanced draw per material.

use crate::engine_state::{
    rendering::instance::BlockInstance,
    voxels::{block::BlockType, coords::ChunkPosition},
};

/// All instances of one block type within a chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceBatch {
    /// The block type every instance in this batch shows
    pub block_type: BlockType,
    /// One entry per voxel of this type
    pub instances: Vec<BlockInstance>,
}

impl InstanceBatch {
    /// Creates an empty batch with room for `capacity` instances.
    pub fn with_capacity(block_type: BlockType, capacity: usize) -> Self {
        InstanceBatch {
            block_type,
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The instance records as raw bytes, ready for a buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Renderable representation of one chunk's voxel contents.
///
/// Always holds one batch per entry of [`BlockType::PALETTE`], in palette
/// order, even when a batch is empty.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkGeometry {
    /// The chunk this geometry was built from
    pub position: ChunkPosition,
    /// Instance batches indexed in palette order
    pub batches: Vec<InstanceBatch>,
}

impl ChunkGeometry {
    /// The batch holding instances of `block_type`, `None` for air.
    pub fn batch(&self, block_type: BlockType) -> Option<&InstanceBatch> {
        self.batches.iter().find(|b| b.block_type == block_type)
    }

    /// Total number of instances across all batches.
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(InstanceBatch::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(InstanceBatch::is_empty)
    }
}
