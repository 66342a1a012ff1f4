//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine:
//! the compact voxel representation stored in chunks and the block type
//! definitions that give those integers meaning.

pub mod block_type;

pub use block_type::{BlockDescriptor, BlockType, BLOCK_DESCRIPTORS};

/// The underlying integer type used to represent block types in memory.
///
/// A chunk stores one of these per cell. `0` is air; there is no separate
/// existence flag.
pub type BlockTypeSize = u8;

/// Voxel id of an empty cell.
pub const AIR: BlockTypeSize = BlockType::AIR as BlockTypeSize;
