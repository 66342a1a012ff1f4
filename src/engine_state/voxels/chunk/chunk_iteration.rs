//! # Chunk Iteration Module
//!
//! This module provides an iterator that walks the non-air voxels of a chunk
//! in storage order, skipping air cells without materializing them.

use cgmath::Point3;

use crate::engine_state::voxels::block::{BlockType, AIR};

use super::ChunkData;

/// An iterator over all non-air voxels in a chunk.
///
/// Yields the local position of each solid voxel together with its block
/// type. Voxels holding an id that is not a known [`BlockType`] are skipped.
pub struct ChunkVoxelIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a ChunkData,
    /// Next flat index to inspect
    current_offset: usize,
}

impl<'a> ChunkVoxelIterator<'a> {
    /// Creates a new iterator positioned at the start of the chunk.
    pub fn new(chunk_ref: &'a ChunkData) -> Self {
        ChunkVoxelIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl Iterator for ChunkVoxelIterator<'_> {
    type Item = (Point3<usize>, BlockType);

    fn next(&mut self) -> Option<Self::Item> {
        let voxels = self.chunk_ref.voxels();
        while self.current_offset < voxels.len() {
            let offset = self.current_offset;
            self.current_offset += 1;

            let voxel = voxels[offset];
            if voxel == AIR {
                continue;
            }
            if let Some(block_type) = BlockType::from_voxel(voxel) {
                return Some((ChunkData::position_of(offset), block_type));
            }
        }
        None
    }
}
