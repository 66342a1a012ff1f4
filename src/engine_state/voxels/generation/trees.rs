//! Tree placement and the cross-chunk exclusion set that keeps trees apart.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use crate::engine_state::voxels::{
    block::{BlockType, AIR},
    chunk::{ChunkData, CHUNK_HEIGHT, CHUNK_SIZE},
};

/// Possible trunk heights, in blocks above the surface voxel.
pub const TRUNK_HEIGHTS: RangeInclusive<i32> = 4..=5;
/// Horizontal half-width of the canopy box.
pub const CANOPY_RADIUS: i32 = 2;
/// Number of canopy layers, starting at the trunk top.
pub const CANOPY_LAYERS: i32 = 3;

/// World `(x, z)` columns already claimed by a tree.
///
/// Append-only for the session. It only gates generation, so it is never
/// pruned, not even when chunk data is dropped; a regenerated chunk finds
/// its own claims here and replants them.
#[derive(Debug, Default)]
pub struct TreeExclusionSet {
    centers: HashSet<(i32, i32)>,
    spacing: i32,
}

impl TreeExclusionSet {
    pub fn new(spacing: i32) -> Self {
        Self {
            centers: HashSet::new(),
            spacing,
        }
    }

    /// Whether no claimed column lies within the spacing square around
    /// `(wx, wz)`.
    pub fn can_place(&self, wx: i32, wz: i32) -> bool {
        let r = self.spacing;
        for dx in -r..=r {
            for dz in -r..=r {
                if self.centers.contains(&(wx.wrapping_add(dx), wz.wrapping_add(dz))) {
                    return false;
                }
            }
        }
        true
    }

    pub fn claim(&mut self, wx: i32, wz: i32) {
        self.centers.insert((wx, wz));
    }

    pub fn contains(&self, wx: i32, wz: i32) -> bool {
        self.centers.contains(&(wx, wz))
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// Writes a tree rooted on the surface voxel at local `(x, surface_y, z)`.
///
/// The trunk is wood from `surface_y + 1` up to `surface_y + trunk_height`;
/// the canopy is a leaf box starting at the trunk top that only fills air.
/// Anything that would land outside this chunk is clipped.
///
/// # Returns
/// `false` if the tree does not fit vertically, in which case nothing is
/// written.
pub fn place_tree(
    data: &mut ChunkData,
    x: usize,
    z: usize,
    surface_y: i32,
    trunk_height: i32,
) -> bool {
    if surface_y + trunk_height + CANOPY_LAYERS - 1 >= CHUNK_HEIGHT {
        return false;
    }
    let top_y = surface_y + trunk_height;

    for y in (surface_y + 1)..=top_y {
        if (0..CHUNK_HEIGHT).contains(&y) {
            data.set(x, y as usize, z, BlockType::WOOD.voxel());
        }
    }

    for dx in -CANOPY_RADIUS..=CANOPY_RADIUS {
        for dz in -CANOPY_RADIUS..=CANOPY_RADIUS {
            for dy in 0..CANOPY_LAYERS {
                let lx = x as i32 + dx;
                let lz = z as i32 + dz;
                let ly = top_y + dy;

                if !(0..CHUNK_SIZE).contains(&lx)
                    || !(0..CHUNK_SIZE).contains(&lz)
                    || !(0..CHUNK_HEIGHT).contains(&ly)
                {
                    continue;
                }

                let (lx, ly, lz) = (lx as usize, ly as usize, lz as usize);
                if data.get(lx, ly, lz) == AIR {
                    data.set(lx, ly, lz, BlockType::LEAVES.voxel());
                }
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    #[test]
    fn spacing_blocks_nearby_columns_only() {
        let mut set = TreeExclusionSet::new(4);
        assert!(set.can_place(10, 10));
        set.claim(10, 10);
        assert!(set.contains(10, 10));
        assert!(!set.can_place(14, 6));
        assert!(!set.can_place(10, 10));
        assert!(set.can_place(15, 10));
        assert!(set.can_place(10, 5));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn tree_has_trunk_and_canopy() {
        let mut data = ChunkData::empty();
        data.set(8, 2, 8, BlockType::GRASS.voxel());
        assert!(place_tree(&mut data, 8, 8, 2, 4));

        for y in 3..=6 {
            assert_eq!(data.block_at(Point3::new(8, y, 8)), Some(BlockType::WOOD));
        }
        assert_eq!(data.block_at(Point3::new(8, 7, 8)), Some(BlockType::LEAVES));
        assert_eq!(data.block_at(Point3::new(6, 6, 10)), Some(BlockType::LEAVES));
        assert_eq!(data.block_at(Point3::new(10, 8, 6)), Some(BlockType::LEAVES));
        assert_eq!(data.block_at(Point3::new(8, 9, 8)), Some(BlockType::AIR));
        assert_eq!(data.block_at(Point3::new(5, 6, 8)), Some(BlockType::AIR));
        assert_eq!(data.block_at(Point3::new(8, 2, 8)), Some(BlockType::GRASS));
    }

    #[test]
    fn canopy_never_overwrites_solid_voxels() {
        let mut data = ChunkData::empty();
        data.set(9, 7, 8, BlockType::STONE.voxel());
        assert!(place_tree(&mut data, 8, 8, 2, 5));
        assert_eq!(data.block_at(Point3::new(9, 7, 8)), Some(BlockType::STONE));
    }

    #[test]
    fn canopy_is_clipped_at_chunk_edges() {
        let mut data = ChunkData::empty();
        assert!(place_tree(&mut data, 0, 15, 0, 4));
        assert_eq!(data.block_at(Point3::new(0, 4, 15)), Some(BlockType::WOOD));
        assert_eq!(data.block_at(Point3::new(2, 5, 13)), Some(BlockType::LEAVES));
        // 3 columns in x by 3 in z by 3 layers, minus the trunk top.
        assert_eq!(data.solid_count(), 4 + 3 * 3 * 3 - 1);
    }

    #[test]
    fn trees_that_do_not_fit_are_abandoned_whole() {
        let mut data = ChunkData::empty();
        // 10 + 4 + 2 == 16 reaches past the top layer.
        assert!(!place_tree(&mut data, 8, 8, 10, 4));
        assert_eq!(data.solid_count(), 0);
        assert!(place_tree(&mut data, 8, 8, 9, 4));
    }
}
