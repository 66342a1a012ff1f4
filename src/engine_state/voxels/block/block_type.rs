//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides block type identification, conversion from the compact voxel
//! representation, and the placeable block palette.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are the voxel ids stored in chunk data, so `AIR` must
/// stay `0`. The `FromPrimitive` derive allows conversion back from the
/// stored integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never meshed, never placed.
    AIR = 0,

    /// Top layer of every terrain column.
    GRASS = 1,

    /// The three layers directly below the grass.
    DIRT = 2,

    /// Everything deeper than the dirt layers.
    STONE = 3,

    /// Tree trunks.
    WOOD = 4,

    /// Tree canopies.
    LEAVES = 5,
}

/// Static description of a solid block type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// The block this descriptor belongs to.
    pub block_type: BlockType,
    /// Human readable name, used in logs and by inventory widgets.
    pub name: &'static str,
    /// Texture the render surface should bind for this block.
    pub texture: &'static str,
}

/// Descriptors for every solid block, indexed by `voxel id - 1`.
pub static BLOCK_DESCRIPTORS: [BlockDescriptor; 5] = [
    BlockDescriptor {
        block_type: BlockType::GRASS,
        name: "grass",
        texture: "textures/grass.png",
    },
    BlockDescriptor {
        block_type: BlockType::DIRT,
        name: "dirt",
        texture: "textures/dirt.png",
    },
    BlockDescriptor {
        block_type: BlockType::STONE,
        name: "stone",
        texture: "textures/stone.png",
    },
    BlockDescriptor {
        block_type: BlockType::WOOD,
        name: "wood",
        texture: "textures/wood.png",
    },
    BlockDescriptor {
        block_type: BlockType::LEAVES,
        name: "leaves",
        texture: "textures/leaves.png",
    },
];

impl BlockType {
    /// Every solid block type, in palette order.
    ///
    /// This doubles as the placeable palette: an externally owned selection
    /// index points into this array.
    pub const PALETTE: [BlockType; 5] = [
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::WOOD,
        BlockType::LEAVES,
    ];

    /// Converts a stored voxel id to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a known block type.
    pub fn from_voxel(voxel: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(voxel)
    }

    /// The voxel id written into chunk data for this block type.
    pub fn voxel(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether this block occupies its cell.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// Looks up the palette entry at `index`.
    pub fn from_palette_index(index: usize) -> Option<Self> {
        Self::PALETTE.get(index).copied()
    }

    /// Moves a palette selection by `step` slots, wrapping at both ends.
    ///
    /// This is the scroll-wheel behaviour: stepping past the last slot lands
    /// on the first one and vice versa.
    pub fn cycle_palette(index: usize, step: isize) -> usize {
        let len = Self::PALETTE.len() as isize;
        (index as isize + step).rem_euclid(len) as usize
    }

    /// The static descriptor for a solid block, `None` for air.
    pub fn descriptor(self) -> Option<&'static BlockDescriptor> {
        match self {
            BlockType::AIR => None,
            solid => BLOCK_DESCRIPTORS.get(solid as usize - 1),
        }
    }
}
