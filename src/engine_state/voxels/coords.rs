//! # Coordinate Mapping
//!
//! Pure conversions between world-space voxel coordinates, chunk coordinates
//! and chunk-local coordinates, plus the canonical [`ChunkKey`].
//!
//! The chunk grid is not uniformly cubic: X and Z are divided by
//! [`CHUNK_SIZE`], Y by [`CHUNK_HEIGHT`]. All divisions floor, so negative
//! world coordinates land in negative chunks with non-negative local offsets.

use std::fmt;

use cgmath::Point3;

use super::chunk::{CHUNK_HEIGHT, CHUNK_SIZE};

/// Position of a chunk in the chunk grid (not in blocks).
pub type ChunkPosition = Point3<i32>;

/// Returns the chunk containing the world voxel `world`.
pub fn world_to_chunk(world: Point3<i32>) -> ChunkPosition {
    Point3::new(
        world.x.div_euclid(CHUNK_SIZE),
        world.y.div_euclid(CHUNK_HEIGHT),
        world.z.div_euclid(CHUNK_SIZE),
    )
}

/// Returns `world` relative to the origin of `chunk`.
///
/// The result is in `[0, size)` on every axis when `chunk` was derived from
/// the same world coordinate; otherwise it is simply the signed residual.
pub fn world_to_local(world: Point3<i32>, chunk: ChunkPosition) -> Point3<i32> {
    let origin = chunk_origin(chunk);
    Point3::new(world.x - origin.x, world.y - origin.y, world.z - origin.z)
}

/// The world coordinate of the voxel at local `(0, 0, 0)` of `chunk`.
pub fn chunk_origin(chunk: ChunkPosition) -> Point3<i32> {
    Point3::new(
        chunk.x * CHUNK_SIZE,
        chunk.y * CHUNK_HEIGHT,
        chunk.z * CHUNK_SIZE,
    )
}

/// Inverse of [`world_to_local`].
pub fn local_to_world(chunk: ChunkPosition, local: Point3<i32>) -> Point3<i32> {
    let origin = chunk_origin(chunk);
    Point3::new(origin.x + local.x, origin.y + local.y, origin.z + local.z)
}

/// Returns the chunk containing a continuous world position, such as the
/// observer's eye.
pub fn chunk_containing(position: Point3<f32>) -> ChunkPosition {
    Point3::new(
        (position.x / CHUNK_SIZE as f32).floor() as i32,
        (position.y / CHUNK_HEIGHT as f32).floor() as i32,
        (position.z / CHUNK_SIZE as f32).floor() as i32,
    )
}

/// World-space center of a chunk's bounding box.
pub fn chunk_center(chunk: ChunkPosition) -> Point3<f32> {
    let origin = chunk_origin(chunk);
    Point3::new(
        origin.x as f32 + CHUNK_SIZE as f32 / 2.0,
        origin.y as f32 + CHUNK_HEIGHT as f32 / 2.0,
        origin.z as f32 + CHUNK_SIZE as f32 / 2.0,
    )
}

/// Largest chunk coordinate on X and Z whose voxels all have `i32` world
/// coordinates.
pub const MAX_CHUNK_XZ: i32 = i32::MAX / CHUNK_SIZE;
/// Smallest such chunk coordinate on X and Z.
pub const MIN_CHUNK_XZ: i32 = i32::MIN / CHUNK_SIZE;
/// Largest such chunk coordinate on Y.
pub const MAX_CHUNK_Y: i32 = i32::MAX / CHUNK_HEIGHT;
/// Smallest such chunk coordinate on Y.
pub const MIN_CHUNK_Y: i32 = i32::MIN / CHUNK_HEIGHT;

/// Pulls `chunk` inward so that every chunk within `margin` of it on each
/// axis has representable world coordinates.
///
/// `margin` is capped at a quarter of the grid, far beyond any view radius.
pub fn clamp_chunk(chunk: ChunkPosition, margin: i32) -> ChunkPosition {
    let margin = margin.clamp(0, MAX_CHUNK_Y / 4);
    Point3::new(
        chunk.x.clamp(MIN_CHUNK_XZ + margin, MAX_CHUNK_XZ - margin),
        chunk.y.clamp(MIN_CHUNK_Y + margin, MAX_CHUNK_Y - margin),
        chunk.z.clamp(MIN_CHUNK_XZ + margin, MAX_CHUNK_XZ - margin),
    )
}

/// Canonical lookup key for a chunk.
///
/// The three 32-bit components are packed into one `u128`, which makes the
/// mapping injective and reversible. The key is shared by the chunk store
/// and the geometry table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey(u128);

impl ChunkKey {
    /// Builds the key for `chunk`.
    pub fn new(chunk: ChunkPosition) -> Self {
        let x = chunk.x as u32 as u128;
        let y = chunk.y as u32 as u128;
        let z = chunk.z as u32 as u128;
        ChunkKey((x << 64) | (y << 32) | z)
    }

    /// Recovers the chunk position this key was built from.
    pub fn position(self) -> ChunkPosition {
        Point3::new(
            (self.0 >> 64) as u32 as i32,
            (self.0 >> 32) as u32 as i32,
            self.0 as u32 as i32,
        )
    }
}

impl From<ChunkPosition> for ChunkKey {
    fn from(chunk: ChunkPosition) -> Self {
        ChunkKey::new(chunk)
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position();
        write!(f, "{},{},{}", p.x, p.y, p.z)
    }
}

/// Shorthand for [`ChunkKey::new`].
pub fn chunk_key(chunk: ChunkPosition) -> ChunkKey {
    ChunkKey::new(chunk)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const SAMPLES: [i32; 11] = [-1000, -33, -17, -16, -15, -1, 0, 1, 15, 16, 517];

    #[test]
    fn local_coordinates_stay_in_range_and_round_trip() {
        for &wx in &SAMPLES {
            for &wy in &SAMPLES {
                for &wz in &SAMPLES {
                    let world = Point3::new(wx, wy, wz);
                    let chunk = world_to_chunk(world);
                    let local = world_to_local(world, chunk);
                    assert!((0..CHUNK_SIZE).contains(&local.x), "{:?}", world);
                    assert!((0..CHUNK_HEIGHT).contains(&local.y), "{:?}", world);
                    assert!((0..CHUNK_SIZE).contains(&local.z), "{:?}", world);
                    assert_eq!(local_to_world(chunk, local), world);
                }
            }
        }
    }

    #[test]
    fn negative_coordinates_floor() {
        assert_eq!(world_to_chunk(Point3::new(-1, -1, -1)), Point3::new(-1, -1, -1));
        assert_eq!(world_to_chunk(Point3::new(-16, 0, 15)), Point3::new(-1, 0, 0));
        assert_eq!(world_to_chunk(Point3::new(-17, 16, 16)), Point3::new(-2, 1, 1));
        assert_eq!(chunk_containing(Point3::new(-0.25, 15.9, 16.0)), Point3::new(-1, 0, 1));
    }

    #[test]
    fn keys_are_injective_and_reversible() {
        let mut seen = HashSet::new();
        for x in -3..=3 {
            for y in -3..=3 {
                for z in -3..=3 {
                    let chunk = Point3::new(x, y, z);
                    let key = chunk_key(chunk);
                    assert_eq!(key, chunk_key(chunk));
                    assert_eq!(key.position(), chunk);
                    assert!(seen.insert(key));
                }
            }
        }
        let extremes = Point3::new(i32::MIN, i32::MAX, -1);
        assert_eq!(ChunkKey::new(extremes).position(), extremes);
        assert_ne!(chunk_key(Point3::new(0, 0, -1)), chunk_key(Point3::new(0, -1, 0)));
    }

    #[test]
    fn clamped_chunks_keep_their_neighbourhood_representable() {
        let far = chunk_containing(Point3::new(3.0e9, -3.0e9, 12.0));
        let clamped = clamp_chunk(far, 2);
        assert_eq!(clamped, Point3::new(MAX_CHUNK_XZ - 2, MIN_CHUNK_Y + 2, 0));

        for offset in [-2, 2] {
            let edge = Point3::new(clamped.x + offset, clamped.y + offset, clamped.z);
            let origin = chunk_origin(edge);
            let last = local_to_world(edge, Point3::new(CHUNK_SIZE - 1, CHUNK_HEIGHT - 1, 0));
            assert!(origin.x <= last.x && origin.y <= last.y);
        }

        let near = Point3::new(5, -3, 7);
        assert_eq!(clamp_chunk(near, 4), near);
    }

    #[test]
    fn key_display_matches_coordinates() {
        assert_eq!(chunk_key(Point3::new(-2, 0, 7)).to_string(), "-2,0,7");
    }
}
