//! # Chunk Module
//!
//! This module provides [`ChunkData`], the dense voxel storage for one
//! `CHUNK_SIZE × CHUNK_HEIGHT × CHUNK_SIZE` cell of the world.
//!
//! ## Memory Layout
//!
//! Voxels live in a single flat, contiguous array indexed as
//! `((x * CHUNK_SIZE) + z) * CHUNK_HEIGHT + y`. A column of Y values is
//! therefore contiguous, which is the access pattern of both the terrain
//! generator (column by column) and the mesh builder (full scan).
//!
//! Each cell holds a [`BlockTypeSize`]; `0` is air.

use cgmath::Point3;

use super::block::{BlockType, BlockTypeSize, AIR};

pub mod chunk_iteration;

pub use chunk_iteration::ChunkVoxelIterator;

/// Width and depth (X and Z) of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;
/// Height (Y) of a chunk in blocks.
pub const CHUNK_HEIGHT: i32 = 16;
/// The number of voxels in a single chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_HEIGHT) as usize;

/// Dense voxel contents of one chunk.
///
/// Created zero-filled (all air) by the chunk store, filled once by the
/// terrain generator and then mutated only by single-voxel edits.
#[derive(Clone, PartialEq, Eq)]
pub struct ChunkData {
    voxels: Box<[BlockTypeSize]>,
}

impl ChunkData {
    /// Creates a chunk filled with air.
    pub fn empty() -> Self {
        ChunkData {
            voxels: vec![AIR; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Flat array index of local `(x, y, z)`.
    ///
    /// Callers must pass in-bounds coordinates; see [`ChunkData::contains`].
    #[inline]
    pub fn index(x: usize, y: usize, z: usize) -> usize {
        ((x * CHUNK_SIZE as usize) + z) * CHUNK_HEIGHT as usize + y
    }

    /// Inverse of [`ChunkData::index`].
    #[inline]
    pub fn position_of(index: usize) -> Point3<usize> {
        let y = index % CHUNK_HEIGHT as usize;
        let column = index / CHUNK_HEIGHT as usize;
        let z = column % CHUNK_SIZE as usize;
        let x = column / CHUNK_SIZE as usize;
        Point3::new(x, y, z)
    }

    /// Whether a signed local coordinate falls inside the chunk.
    pub fn contains(local: Point3<i32>) -> bool {
        (0..CHUNK_SIZE).contains(&local.x)
            && (0..CHUNK_HEIGHT).contains(&local.y)
            && (0..CHUNK_SIZE).contains(&local.z)
    }

    /// Gets the voxel at local `(x, y, z)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockTypeSize {
        self.voxels[Self::index(x, y, z)]
    }

    /// Sets the voxel at local `(x, y, z)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: BlockTypeSize) {
        self.voxels[Self::index(x, y, z)] = voxel;
    }

    /// Bounds-checked read with a signed local coordinate.
    pub fn voxel_at(&self, local: Point3<i32>) -> Option<BlockTypeSize> {
        if Self::contains(local) {
            Some(self.get(local.x as usize, local.y as usize, local.z as usize))
        } else {
            None
        }
    }

    /// Bounds-checked block lookup with a signed local coordinate.
    ///
    /// Unknown voxel ids read as `None`, same as out-of-bounds coordinates.
    pub fn block_at(&self, local: Point3<i32>) -> Option<BlockType> {
        self.voxel_at(local).and_then(BlockType::from_voxel)
    }

    /// The raw voxel array in storage order.
    pub fn voxels(&self) -> &[BlockTypeSize] {
        &self.voxels
    }

    /// Number of non-air voxels.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|&&v| v != AIR).count()
    }

    /// Iterates over every non-air voxel with its local position.
    pub fn iter_solid(&self) -> ChunkVoxelIterator<'_> {
        ChunkVoxelIterator::new(self)
    }
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ChunkData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkData")
            .field("solid", &self.solid_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_follows_column_major_layout() {
        assert_eq!(ChunkData::index(0, 0, 0), 0);
        assert_eq!(ChunkData::index(0, 1, 0), 1);
        assert_eq!(ChunkData::index(0, 0, 1), CHUNK_HEIGHT as usize);
        assert_eq!(
            ChunkData::index(1, 0, 0),
            (CHUNK_SIZE * CHUNK_HEIGHT) as usize
        );
        assert_eq!(ChunkData::index(15, 15, 15), CHUNK_VOLUME - 1);
        for index in [0, 17, 255, 1000, CHUNK_VOLUME - 1] {
            let p = ChunkData::position_of(index);
            assert_eq!(ChunkData::index(p.x, p.y, p.z), index);
        }
    }

    #[test]
    fn new_chunks_are_air() {
        let chunk = ChunkData::empty();
        assert_eq!(chunk.voxels().len(), CHUNK_VOLUME);
        assert_eq!(chunk.solid_count(), 0);
    }

    #[test]
    fn bounds_checked_access() {
        let mut chunk = ChunkData::empty();
        chunk.set(3, 4, 5, BlockType::STONE.voxel());
        assert_eq!(chunk.block_at(Point3::new(3, 4, 5)), Some(BlockType::STONE));
        assert_eq!(chunk.voxel_at(Point3::new(-1, 0, 0)), None);
        assert_eq!(chunk.voxel_at(Point3::new(0, CHUNK_HEIGHT, 0)), None);
        assert_eq!(chunk.solid_count(), 1);
    }
}
