//! # Voxel Editing
//!
//! Resolves hit points reported by the renderer into voxel coordinates and
//! applies single-voxel removals and placements to the world.
//!
//! A hit lies on a cube face, exactly between two voxels. Stepping half a
//! unit along the face normal before snapping picks one of them: inward for
//! the solid voxel that was struck, outward for the empty neighbour a new
//! block goes into.
//!
//! Every rejected edit leaves the world untouched. The gateway does not
//! rebuild geometry; that is left to the caller, which owns the geometry
//! table.

use cgmath::{MetricSpace, Point3, Vector3};
use thiserror::Error;

use super::voxels::{
    block::BlockType,
    chunk::ChunkData,
    coords::{world_to_chunk, world_to_local, ChunkPosition},
    world::World,
};

/// Distance a hit point is moved along the face normal before snapping.
const FACE_OFFSET: f32 = 0.5;

/// Why an edit was not applied.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum EditError {
    #[error("hit is {distance:.2} away, beyond the interaction range of {range:.2}")]
    OutOfRange { distance: f32, range: f32 },

    #[error("voxel {0:?} resolved outside its chunk")]
    OutOfChunkBounds(Point3<i32>),

    #[error("voxel {0:?} is already air")]
    AlreadyAir(Point3<i32>),

    #[error("voxel {0:?} is occupied")]
    Occupied(Point3<i32>),

    #[error("air cannot be placed")]
    AirPlacement,

    #[error("hit point or normal is not finite")]
    NonFiniteHit,
}

/// A ray hit against rendered geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    /// Hit position in world space, on the surface of a cube
    pub point: Point3<f32>,
    /// Unit normal of the face that was hit
    pub normal: Vector3<f32>,
}

impl HitResult {
    pub fn new(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        HitResult { point, normal }
    }

    fn is_finite(&self) -> bool {
        self.point.x.is_finite()
            && self.point.y.is_finite()
            && self.point.z.is_finite()
            && self.normal.x.is_finite()
            && self.normal.y.is_finite()
            && self.normal.z.is_finite()
    }
}

/// A voxel an edit resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelTarget {
    /// World voxel coordinate
    pub world: Point3<i32>,
    /// Chunk holding the voxel
    pub chunk: ChunkPosition,
    /// Coordinate within that chunk
    pub local: Point3<i32>,
}

impl VoxelTarget {
    fn index(&self) -> (usize, usize, usize) {
        (
            self.local.x as usize,
            self.local.y as usize,
            self.local.z as usize,
        )
    }
}

/// Snaps a hit to a voxel coordinate.
///
/// `inward` selects the voxel behind the struck face, otherwise the one in
/// front of it.
pub fn resolve_hit(hit: &HitResult, inward: bool) -> Point3<i32> {
    let offset = if inward { -FACE_OFFSET } else { FACE_OFFSET };
    let p = hit.point + hit.normal * offset;
    Point3::new(
        (p.x + 0.5).floor() as i32,
        (p.y + 0.5).floor() as i32,
        (p.z + 0.5).floor() as i32,
    )
}

/// Validates and applies edits within reach of an observer.
#[derive(Clone, Copy, Debug)]
pub struct EditGateway {
    interaction_range: f32,
}

impl EditGateway {
    pub fn new(interaction_range: f32) -> Self {
        EditGateway { interaction_range }
    }

    pub fn interaction_range(&self) -> f32 {
        self.interaction_range
    }

    /// Resolves `hit` to a voxel, checking reach and chunk bounds.
    ///
    /// # Arguments
    /// * `observer` - Eye position the reach is measured from
    /// * `hit` - The hit to resolve
    /// * `inward` - Whether to pick the struck voxel or its outer neighbour
    pub fn target(
        &self,
        observer: Point3<f32>,
        hit: &HitResult,
        inward: bool,
    ) -> Result<VoxelTarget, EditError> {
        if !hit.is_finite() {
            return Err(EditError::NonFiniteHit);
        }
        let distance = observer.distance(hit.point);
        if distance > self.interaction_range {
            return Err(EditError::OutOfRange {
                distance,
                range: self.interaction_range,
            });
        }

        let world = resolve_hit(hit, inward);
        let chunk = world_to_chunk(world);
        let local = world_to_local(world, chunk);
        if !ChunkData::contains(local) {
            return Err(EditError::OutOfChunkBounds(world));
        }
        Ok(VoxelTarget {
            world,
            chunk,
            local,
        })
    }

    /// Turns the struck voxel into air.
    ///
    /// # Returns
    /// The voxel that was cleared
    pub fn remove(
        &self,
        observer: Point3<f32>,
        hit: &HitResult,
        world: &mut World,
    ) -> Result<VoxelTarget, EditError> {
        let target = self.target(observer, hit, true)?;
        let data = world.ensure(target.chunk);
        let (x, y, z) = target.index();
        if data.get(x, y, z) == BlockType::AIR.voxel() {
            return Err(EditError::AlreadyAir(target.world));
        }
        data.set(x, y, z, BlockType::AIR.voxel());
        Ok(target)
    }

    /// Puts `block` into the empty voxel in front of the struck face.
    ///
    /// # Returns
    /// The voxel that was filled
    pub fn place(
        &self,
        observer: Point3<f32>,
        hit: &HitResult,
        block: BlockType,
        world: &mut World,
    ) -> Result<VoxelTarget, EditError> {
        if !block.is_solid() {
            return Err(EditError::AirPlacement);
        }
        let target = self.target(observer, hit, false)?;
        let data = world.ensure(target.chunk);
        let (x, y, z) = target.index();
        if data.get(x, y, z) != BlockType::AIR.voxel() {
            return Err(EditError::Occupied(target.world));
        }
        data.set(x, y, z, block.voxel());
        Ok(target)
    }
}
