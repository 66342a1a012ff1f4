//! # Voxel World
//!
//! This module contains the voxel data side of the engine: what a block is,
//! how chunks store them, how world coordinates map onto chunks, how chunks
//! are generated and where they are kept.
//!
//! ## Architecture
//!
//! * **Block**: block type identifiers and the placeable palette
//! * **Chunk**: fixed-size dense arrays of voxels
//! * **Coords**: pure world/chunk/local conversions and the chunk key
//! * **Generation**: seeded terrain and vegetation
//! * **World**: the sparse chunk store that ties generation to storage
//!
//! ## Data Flow
//!
//! 1. The world receives a request for a chunk
//! 2. Missing chunks are allocated as air and filled by the generator
//! 3. The chunk data is returned and kept for the rest of the session
//! 4. Edits mutate the stored data in place

pub mod block;
pub mod chunk;
pub mod coords;
pub mod generation;
pub mod world;
