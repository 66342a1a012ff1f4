//! # World Module
//!
//! This module provides the `World` struct, the chunk store of the voxel
//! engine. It owns the sparse mapping from chunk coordinates to voxel data
//! and the terrain generator that fills chunks on first access.
//!
//! ## Architecture
//!
//! Only chunks that have been requested are kept in memory, which allows for
//! effectively infinite worlds. A chunk's data is generated exactly once;
//! after that it is the durable source of truth for its region and is only
//! changed by single-voxel edits. Geometry derived from it may come and go,
//! the data stays.
//!
//! ## Residency
//!
//! Chunks are kept in least-recently-used order. By default nothing is ever
//! dropped. When a residency cap is configured, [`World::trim`] drops the
//! least recently ensured chunks that the caller does not protect; such a
//! chunk is regenerated from the seed on its next access and loses any edits.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use log::debug;
use lru::LruCache;

use super::{
    block::BlockType,
    chunk::ChunkData,
    coords::{world_to_chunk, world_to_local, ChunkKey, ChunkPosition},
    generation::{TerrainGenerator, TerrainParams},
};
use cgmath::Point3;

/// Sparse store of generated chunks.
///
/// # Examples
///
/// ```
/// use block_world::engine_state::voxels::{generation::TerrainParams, world::World};
/// use cgmath::Point3;
///
/// let mut world = World::new(TerrainParams::default(), None);
/// world.ensure(Point3::new(0, 2, 0));
/// assert!(world.get(Point3::new(0, 2, 0)).is_some());
/// assert!(world.get(Point3::new(0, 3, 0)).is_none());
/// ```
pub struct World {
    /// Chunk data keyed by chunk key, most recently ensured first.
    chunks: LruCache<ChunkKey, ChunkData>,
    /// Fills newly allocated chunks.
    generator: TerrainGenerator,
    /// Optional cap on resident chunks, enforced by [`World::trim`].
    max_resident: Option<NonZeroUsize>,
}

impl World {
    /// Creates an empty world.
    pub fn new(params: TerrainParams, max_resident_chunks: Option<usize>) -> Self {
        World {
            chunks: LruCache::unbounded(),
            generator: TerrainGenerator::new(params),
            max_resident: max_resident_chunks.and_then(NonZeroUsize::new),
        }
    }

    /// Returns the chunk at `position`, generating it first if needed.
    ///
    /// Repeated calls return the same data without regenerating, so earlier
    /// edits are preserved.
    pub fn ensure(&mut self, position: ChunkPosition) -> &mut ChunkData {
        let generator = &mut self.generator;
        self.chunks.get_or_insert_mut(ChunkKey::new(position), || {
            let mut data = ChunkData::empty();
            generator.generate(position, &mut data);
            data
        })
    }

    /// Non-generating lookup.
    pub fn get(&self, position: ChunkPosition) -> Option<&ChunkData> {
        self.chunks.peek(&ChunkKey::new(position))
    }

    /// Non-generating mutable lookup.
    pub fn get_mut(&mut self, position: ChunkPosition) -> Option<&mut ChunkData> {
        self.chunks.peek_mut(&ChunkKey::new(position))
    }

    pub fn contains(&self, position: ChunkPosition) -> bool {
        self.chunks.contains(&ChunkKey::new(position))
    }

    /// Block at a world voxel coordinate, if its chunk is resident.
    pub fn block_at(&self, world: Point3<i32>) -> Option<BlockType> {
        let chunk = world_to_chunk(world);
        self.get(chunk)?.block_at(world_to_local(world, chunk))
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Drops least recently used chunks until the residency cap is met.
    ///
    /// Chunks in `protected` are never dropped, even if that leaves the
    /// world above its cap. Does nothing when no cap is configured.
    ///
    /// # Returns
    /// The number of chunks dropped.
    pub fn trim(&mut self, protected: &HashSet<ChunkKey>) -> usize {
        let Some(cap) = self.max_resident else {
            return 0;
        };
        let excess = self.chunks.len().saturating_sub(cap.get());
        if excess == 0 {
            return 0;
        }

        let victims: Vec<ChunkKey> = self
            .chunks
            .iter()
            .rev()
            .map(|(key, _)| *key)
            .filter(|key| !protected.contains(key))
            .take(excess)
            .collect();

        for key in &victims {
            self.chunks.pop(key);
        }
        debug!(
            "Dropped {} chunks over the residency cap of {}",
            victims.len(),
            cap
        );
        victims.len()
    }
}
