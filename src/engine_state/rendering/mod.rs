//! Rendering system for the voxel engine.
//!
//! This module turns chunk voxel data into instanced cube geometry and hands
//! it to a [`RenderSurface`]. The surface owns whatever GPU (or other)
//! resources back the geometry and returns an opaque handle; the engine only
//! ever stores handles and gives them back when geometry is retired.

use log::trace;

use super::voxels::coords::ChunkKey;

mod instance;
pub mod meshing;

// Re-export commonly used types
pub use instance::BlockInstance;
pub use meshing::{build_chunk_geometry, ChunkGeometry, InstanceBatch};

/// Destination for chunk geometry.
///
/// Implementations upload or otherwise retain the geometry they are given.
/// Every handle returned by [`RenderSurface::attach`] is passed to
/// [`RenderSurface::detach`] exactly once when the chunk leaves the view or
/// its geometry is rebuilt.
pub trait RenderSurface {
    /// Opaque handle for one attached chunk geometry
    type Handle;

    /// Takes ownership of `geometry` for the chunk identified by `key`.
    ///
    /// # Returns
    /// A handle the caller keeps until the geometry is retired
    fn attach(&mut self, key: ChunkKey, geometry: ChunkGeometry) -> Self::Handle;

    /// Releases the resources behind `handle`.
    fn detach(&mut self, handle: Self::Handle);
}

/// Handle issued by [`HeadlessSurface`].
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessHandle {
    key: ChunkKey,
    instances: usize,
}

impl HeadlessHandle {
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    pub fn instance_count(&self) -> usize {
        self.instances
    }
}

/// A surface that draws nothing and only keeps totals.
///
/// Used by the demo binary and anywhere geometry needs to flow without a
/// graphics device.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    attached: usize,
    instances: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of geometries currently attached.
    pub fn attached(&self) -> usize {
        self.attached
    }

    /// Number of cube instances across all attached geometries.
    pub fn instance_count(&self) -> usize {
        self.instances
    }
}

impl RenderSurface for HeadlessSurface {
    type Handle = HeadlessHandle;

    fn attach(&mut self, key: ChunkKey, geometry: ChunkGeometry) -> HeadlessHandle {
        let instances = geometry.instance_count();
        self.attached += 1;
        self.instances += instances;
        trace!("Attached chunk {} ({} instances)", key, instances);
        HeadlessHandle { key, instances }
    }

    fn detach(&mut self, handle: HeadlessHandle) {
        self.attached = self.attached.saturating_sub(1);
        self.instances = self.instances.saturating_sub(handle.instances);
        trace!("Detached chunk {}", handle.key);
    }
}

/// Something that happened to a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    Attached(ChunkKey, ChunkGeometry),
    Detached(ChunkKey),
}

/// A surface that remembers every call made on it.
///
/// Handles are the chunk keys themselves, which makes attach/detach pairing
/// easy to check.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys attached and not yet detached, in attach order.
    pub fn live_keys(&self) -> Vec<ChunkKey> {
        let mut live: Vec<ChunkKey> = Vec::new();
        for event in &self.events {
            match event {
                SurfaceEvent::Attached(key, _) => live.push(*key),
                SurfaceEvent::Detached(key) => {
                    if let Some(index) = live.iter().position(|k| k == key) {
                        live.remove(index);
                    }
                }
            }
        }
        live
    }

    /// The most recent geometry attached for `key`.
    pub fn latest_geometry(&self, key: ChunkKey) -> Option<&ChunkGeometry> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::Attached(k, geometry) if *k == key => Some(geometry),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RenderSurface for RecordingSurface {
    type Handle = ChunkKey;

    fn attach(&mut self, key: ChunkKey, geometry: ChunkGeometry) -> ChunkKey {
        self.events.push(SurfaceEvent::Attached(key, geometry));
        key
    }

    fn detach(&mut self, handle: ChunkKey) {
        self.events.push(SurfaceEvent::Detached(handle));
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::{block::BlockType, chunk::ChunkData};

    fn geometry_with(count: usize) -> ChunkGeometry {
        let mut data = ChunkData::empty();
        for y in 0..count {
            data.set(0, y, 0, BlockType::DIRT.voxel());
        }
        build_chunk_geometry(Point3::new(0, 0, 0), &data)
    }

    #[test]
    fn headless_surface_tracks_totals() {
        let mut surface = HeadlessSurface::new();
        let a = surface.attach(ChunkKey::new(Point3::new(0, 0, 0)), geometry_with(3));
        let b = surface.attach(ChunkKey::new(Point3::new(1, 0, 0)), geometry_with(5));
        assert_eq!(surface.attached(), 2);
        assert_eq!(surface.instance_count(), 8);

        assert_eq!(a.instance_count(), 3);
        surface.detach(a);
        assert_eq!(surface.attached(), 1);
        assert_eq!(surface.instance_count(), 5);
        surface.detach(b);
        assert_eq!(surface.instance_count(), 0);
    }

    #[test]
    fn recording_surface_pairs_attach_and_detach() {
        let mut surface = RecordingSurface::new();
        let first = ChunkKey::new(Point3::new(0, 0, 0));
        let second = ChunkKey::new(Point3::new(0, 1, 0));

        let handle = surface.attach(first, geometry_with(1));
        surface.attach(second, geometry_with(2));
        surface.detach(handle);

        assert_eq!(surface.live_keys(), vec![second]);
        assert_eq!(
            surface.latest_geometry(second).map(ChunkGeometry::instance_count),
            Some(2)
        );
        assert!(surface.latest_geometry(ChunkKey::new(Point3::new(9, 9, 9))).is_none());
    }
}
