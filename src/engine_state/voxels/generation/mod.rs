//! # Terrain Generation
//!
//! Fills freshly allocated chunk data with layered terrain and trees.
//!
//! Generation runs in two passes over the chunk's columns:
//!
//! 1. **Heightmap**: the terrain noise gives every world column a surface
//!    height. Voxels above it are air, the surface voxel is grass, the next
//!    three are dirt and everything deeper is stone. This pass depends only on
//!    world coordinates and the seed, so neighbouring chunks agree at their
//!    borders and regenerating a chunk reproduces it exactly.
//! 2. **Vegetation**: columns whose grass surface lies inside this chunk may
//!    grow a tree when the vegetation noise is high enough and no other tree
//!    was planted nearby. Trunk heights come from a random generator, which
//!    is unseeded unless `deterministic_trees` is enabled.

use cgmath::Point3;
use log::trace;

use crate::config::WorldConfig;

use super::{
    block::BlockType,
    chunk::{ChunkData, CHUNK_HEIGHT, CHUNK_SIZE},
    coords::{chunk_origin, ChunkPosition},
};

mod noise_source;
mod trees;

pub use noise_source::NoiseSource;
pub use trees::{place_tree, TreeExclusionSet, CANOPY_LAYERS, CANOPY_RADIUS, TRUNK_HEIGHTS};

/// Number of dirt layers between the grass and the stone.
pub const DIRT_DEPTH: i32 = 3;

/// Terrain generation parameters, extracted from [`WorldConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    pub seed: u32,
    pub base_level: i32,
    pub amplitude: f64,
    pub terrain_scale: f64,
    pub vegetation_scale: f64,
    pub tree_threshold: f64,
    pub tree_spacing: i32,
    pub deterministic_trees: bool,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self::from(&WorldConfig::default())
    }
}

impl From<&WorldConfig> for TerrainParams {
    fn from(config: &WorldConfig) -> Self {
        Self {
            seed: config.seed,
            base_level: config.base_level,
            amplitude: config.amplitude,
            terrain_scale: config.terrain_scale,
            vegetation_scale: config.vegetation_scale,
            tree_threshold: config.tree_threshold,
            tree_spacing: config.tree_spacing,
            deterministic_trees: config.deterministic_trees,
        }
    }
}

/// The block a column with surface height `surface` has at height `wy`.
pub fn layer_at(wy: i32, surface: i32) -> BlockType {
    if wy > surface {
        BlockType::AIR
    } else if wy == surface {
        BlockType::GRASS
    } else if wy >= surface - DIRT_DEPTH {
        BlockType::DIRT
    } else {
        BlockType::STONE
    }
}

/// Generates chunk contents from the seeded noise field.
///
/// Owns the tree exclusion set, which is shared by every chunk this
/// generator fills.
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: NoiseSource,
    trees: TreeExclusionSet,
    rng: fastrand::Rng,
}

impl TerrainGenerator {
    pub fn new(params: TerrainParams) -> Self {
        Self {
            noise: NoiseSource::new(params.seed),
            trees: TreeExclusionSet::new(params.tree_spacing),
            rng: fastrand::Rng::new(),
            params,
        }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn tree_exclusion_set(&self) -> &TreeExclusionSet {
        &self.trees
    }

    /// World height of the grass voxel in column `(wx, wz)`.
    ///
    /// Every chunk uses this one formula, which keeps the surface continuous
    /// across chunk borders.
    pub fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        let sample = self.noise.sample_2d(
            wx as f64 / self.params.terrain_scale,
            wz as f64 / self.params.terrain_scale,
        );
        (self.params.base_level as f64 + self.params.amplitude * sample).floor() as i32
    }

    /// Vegetation density at column `(wx, wz)`, in `[-1, 1]`.
    pub fn vegetation_density(&self, wx: i32, wz: i32) -> f64 {
        self.noise.sample_2d(
            wx as f64 / self.params.vegetation_scale,
            wz as f64 / self.params.vegetation_scale,
        )
    }

    /// Fills zero-initialized `data` for the chunk at `position`.
    ///
    /// # Returns
    /// The number of trees planted in this chunk.
    pub fn generate(&mut self, position: ChunkPosition, data: &mut ChunkData) -> usize {
        let origin = chunk_origin(position);
        let heights = self.heightmap(origin);

        self.fill_layers(origin, &heights, data);
        let planted = self.plant_trees(position, origin, &heights, data);

        trace!(
            "Generated chunk {:?}: {} solid voxels, {} trees",
            position,
            data.solid_count(),
            planted
        );
        planted
    }

    fn heightmap(&self, origin: Point3<i32>) -> [i32; (CHUNK_SIZE * CHUNK_SIZE) as usize] {
        let mut heights = [0; (CHUNK_SIZE * CHUNK_SIZE) as usize];
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                heights[(x * CHUNK_SIZE + z) as usize] =
                    self.surface_height(origin.x + x, origin.z + z);
            }
        }
        heights
    }

    fn fill_layers(&self, origin: Point3<i32>, heights: &[i32], data: &mut ChunkData) {
        for x in 0..CHUNK_SIZE as usize {
            for z in 0..CHUNK_SIZE as usize {
                let surface = heights[x * CHUNK_SIZE as usize + z];
                for y in 0..CHUNK_HEIGHT as usize {
                    let block = layer_at(origin.y + y as i32, surface);
                    if block.is_solid() {
                        data.set(x, y, z, block.voxel());
                    }
                }
            }
        }
    }

    fn plant_trees(
        &mut self,
        position: ChunkPosition,
        origin: Point3<i32>,
        heights: &[i32],
        data: &mut ChunkData,
    ) -> usize {
        let mut planted = 0;

        for x in 0..CHUNK_SIZE as usize {
            for z in 0..CHUNK_SIZE as usize {
                let surface = heights[x * CHUNK_SIZE as usize + z];
                if surface.div_euclid(CHUNK_HEIGHT) != position.y {
                    continue;
                }

                let local_surface = surface - origin.y;
                if data.block_at(Point3::new(x as i32, local_surface, z as i32))
                    != Some(BlockType::GRASS)
                {
                    continue;
                }

                let wx = origin.x + x as i32;
                let wz = origin.z + z as i32;
                if self.vegetation_density(wx, wz) <= self.params.tree_threshold {
                    continue;
                }
                // A claimed column can only belong to this chunk, so it is
                // being regenerated after its data was dropped.
                if !self.trees.contains(wx, wz) {
                    if !self.trees.can_place(wx, wz) {
                        continue;
                    }
                    self.trees.claim(wx, wz);
                }

                let trunk_height = self.trunk_height(wx, wz);
                if place_tree(data, x, z, local_surface, trunk_height) {
                    planted += 1;
                } else {
                    trace!("Tree at ({}, {}) does not fit in chunk {:?}", wx, wz, position);
                }
            }
        }

        planted
    }

    fn trunk_height(&mut self, wx: i32, wz: i32) -> i32 {
        if self.params.deterministic_trees {
            let column = ((wx as u32 as u64) << 32) | wz as u32 as u64;
            let seed = (self.params.seed as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ column;
            fastrand::Rng::with_seed(seed).i32(TRUNK_HEIGHTS)
        } else {
            self.rng.i32(TRUNK_HEIGHTS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(deterministic_trees: bool) -> TerrainGenerator {
        TerrainGenerator::new(TerrainParams {
            deterministic_trees,
            ..TerrainParams::default()
        })
    }

    fn is_terrain(voxel: u8) -> bool {
        voxel <= BlockType::STONE.voxel()
    }

    #[test]
    fn layers_follow_depth_below_surface() {
        assert_eq!(layer_at(41, 40), BlockType::AIR);
        assert_eq!(layer_at(40, 40), BlockType::GRASS);
        assert_eq!(layer_at(39, 40), BlockType::DIRT);
        assert_eq!(layer_at(37, 40), BlockType::DIRT);
        assert_eq!(layer_at(36, 40), BlockType::STONE);
        assert_eq!(layer_at(-500, 40), BlockType::STONE);
    }

    #[test]
    fn surface_stays_within_amplitude() {
        let generator = generator(false);
        for wx in (-200..200).step_by(7) {
            for wz in (-200..200).step_by(11) {
                let h = generator.surface_height(wx, wz);
                assert!((24..=40).contains(&h), "height {} at ({}, {})", h, wx, wz);
            }
        }
    }

    #[test]
    fn surface_column_matches_layers() {
        let mut generator = generator(true);
        let surface = generator.surface_height(0, 0);
        let chunk = Point3::new(0, surface.div_euclid(CHUNK_HEIGHT), 0);
        let mut data = ChunkData::empty();
        generator.generate(chunk, &mut data);

        let local_surface = surface - chunk.y * CHUNK_HEIGHT;
        for y in 0..CHUNK_HEIGHT {
            let block = data.block_at(Point3::new(0, y, 0));
            let expected = if y > local_surface {
                // Trees may only add wood or leaves above the surface.
                assert!(matches!(
                    block,
                    Some(BlockType::AIR) | Some(BlockType::WOOD) | Some(BlockType::LEAVES)
                ));
                continue;
            } else if y == local_surface {
                BlockType::GRASS
            } else if y >= local_surface - DIRT_DEPTH {
                BlockType::DIRT
            } else {
                BlockType::STONE
            };
            assert_eq!(block, Some(expected), "local y {}", y);
        }
    }

    #[test]
    fn terrain_layers_are_identical_across_fresh_generators() {
        let chunks = [
            Point3::new(0, 1, 0),
            Point3::new(-3, 2, 5),
            Point3::new(7, 0, -2),
            Point3::new(1, 3, 1),
        ];
        for chunk in chunks {
            let mut a = ChunkData::empty();
            let mut b = ChunkData::empty();
            generator(false).generate(chunk, &mut a);
            generator(false).generate(chunk, &mut b);

            for (va, vb) in a.voxels().iter().zip(b.voxels()) {
                if is_terrain(*va) && is_terrain(*vb) {
                    assert_eq!(va, vb);
                }
            }
        }
    }

    #[test]
    fn deterministic_trees_reproduce_whole_chunks() {
        for cx in -2..2 {
            for cz in -2..2 {
                let chunk = Point3::new(cx, 2, cz);
                let mut a = ChunkData::empty();
                let mut b = ChunkData::empty();
                generator(true).generate(chunk, &mut a);
                generator(true).generate(chunk, &mut b);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn chunks_far_above_the_surface_are_empty() {
        let mut data = ChunkData::empty();
        assert_eq!(generator(false).generate(Point3::new(0, 4, 0), &mut data), 0);
        assert_eq!(data.solid_count(), 0);
    }

    #[test]
    fn chunks_far_below_the_surface_are_solid_stone() {
        let mut data = ChunkData::empty();
        generator(false).generate(Point3::new(3, -2, -9), &mut data);
        assert!(data
            .voxels()
            .iter()
            .all(|&v| v == BlockType::STONE.voxel()));
    }

    #[test]
    fn planted_trees_are_claimed_and_spaced() {
        let mut generator = generator(false);
        for cx in -4..4 {
            for cz in -4..4 {
                for cy in 1..=2 {
                    let mut data = ChunkData::empty();
                    generator.generate(Point3::new(cx, cy, cz), &mut data);
                }
            }
        }

        let set = generator.tree_exclusion_set();
        for wx in -64..64 {
            for wz in -64..64 {
                if set.contains(wx, wz) {
                    assert!(generator.vegetation_density(wx, wz) > 0.35);
                    for dx in -4..=4 {
                        for dz in -4..=4 {
                            if (dx, dz) != (0, 0) {
                                assert!(!set.contains(wx + dx, wz + dz));
                            }
                        }
                    }
                }
            }
        }
    }
}
