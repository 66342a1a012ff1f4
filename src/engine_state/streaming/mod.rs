//! # Chunk Streaming
//!
//! Decides which chunks have live geometry on the render surface.
//!
//! Each pass looks at every chunk in a cube of `radius` chunks around the
//! observer, keeps the ones that are close enough and intersect the view
//! volume, and builds geometry for those that lack it. Geometry for chunks
//! that fell out of the needed set is detached. Chunk data is never dropped
//! here; the world keeps it so that re-entering a region only rebuilds
//! geometry. The only exception is an explicitly configured residency cap,
//! which is applied to chunks without geometry after the pass.
//!
//! Passes are throttled to at most one per `interval` of wall-clock time.

use std::collections::{HashMap, HashSet};
use std::fmt;

use cgmath::{MetricSpace, Point3};
use log::debug;
use web_time::{Duration, Instant};

use super::{
    camera_state::ViewVolume,
    rendering::{build_chunk_geometry, ChunkGeometry, RenderSurface},
    voxels::{
        chunk::{CHUNK_HEIGHT, CHUNK_SIZE},
        coords::{chunk_center, chunk_containing, clamp_chunk, ChunkKey, ChunkPosition},
        world::World,
    },
};

/// Outcome of one streaming pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunks that passed the distance and visibility tests
    pub needed: usize,
    /// Geometry handles created this pass
    pub loaded: usize,
    /// Geometry handles detached this pass
    pub evicted: usize,
    /// Chunk data dropped by the residency cap
    pub dropped: usize,
    /// Live geometry handles after the pass
    pub resident: usize,
}

impl fmt::Display for StreamingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "needed {}, loaded {}, evicted {}, dropped {}, resident {}",
            self.needed, self.loaded, self.evicted, self.dropped, self.resident
        )
    }
}

/// Largest accepted view radius, in chunks.
pub const MAX_VIEW_RADIUS: i32 = 1024;

/// Bounding sphere radius used for the visibility test of a chunk.
pub fn chunk_bounding_radius() -> f32 {
    let size = CHUNK_SIZE as f32;
    let height = CHUNK_HEIGHT as f32;
    (size * size + height * height).sqrt() / 2.0
}

/// Owns the chunk key to geometry handle table.
pub struct StreamingManager<H> {
    /// View radius in chunks
    radius: i32,
    /// Minimum time between two passes
    interval: Duration,
    /// When the last pass ran, `None` before the first one
    last_pass: Option<Instant>,
    /// Live geometry handles
    geometry: HashMap<ChunkKey, H>,
}

impl<H> StreamingManager<H> {
    /// Creates a manager with no live geometry.
    ///
    /// # Arguments
    /// * `radius` - View radius in chunks, clamped to `0..=MAX_VIEW_RADIUS`
    /// * `interval` - Minimum time between passes
    pub fn new(radius: i32, interval: Duration) -> Self {
        StreamingManager {
            radius: radius.clamp(0, MAX_VIEW_RADIUS),
            interval,
            last_pass: None,
            geometry: HashMap::new(),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Changes the view radius. Takes effect on the next pass.
    pub fn set_radius(&mut self, radius: i32) {
        self.radius = radius.clamp(0, MAX_VIEW_RADIUS);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a pass would run at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_pass {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        }
    }

    /// Forgets when the last pass ran so the next update runs immediately.
    pub fn force_next_pass(&mut self) {
        self.last_pass = None;
    }

    /// Runs a streaming pass if one is due.
    ///
    /// # Returns
    /// The pass report, or `None` when the call was throttled
    pub fn update<V, S>(
        &mut self,
        now: Instant,
        observer: Point3<f32>,
        view: &V,
        world: &mut World,
        surface: &mut S,
    ) -> Option<StreamingReport>
    where
        V: ViewVolume + ?Sized,
        S: RenderSurface<Handle = H>,
    {
        if !self.is_due(now) {
            return None;
        }
        self.last_pass = Some(now);
        Some(self.stream(observer, view, world, surface))
    }

    /// Chunks around `observer` that should have geometry.
    pub fn needed_chunks<V>(&self, observer: Point3<f32>, view: &V) -> Vec<ChunkPosition>
    where
        V: ViewVolume + ?Sized,
    {
        // Far out the cube slides inward; the distance test then rejects it.
        let center = clamp_chunk(chunk_containing(observer), self.radius);
        let max_distance = (self.radius + 1) as f32 * CHUNK_SIZE as f32;
        let max_distance_sq = max_distance * max_distance;
        let bounding_radius = chunk_bounding_radius();

        let mut needed = Vec::new();
        for dx in -self.radius..=self.radius {
            for dz in -self.radius..=self.radius {
                for dy in -self.radius..=self.radius {
                    let position = Point3::new(center.x + dx, center.y + dy, center.z + dz);
                    let chunk_middle = chunk_center(position);
                    if chunk_middle.distance2(observer) > max_distance_sq {
                        continue;
                    }
                    if !view.intersects_sphere(chunk_middle, bounding_radius) {
                        continue;
                    }
                    needed.push(position);
                }
            }
        }
        needed
    }

    /// Runs one streaming pass unconditionally.
    ///
    /// Afterwards the set of chunks with geometry equals the needed set.
    pub fn stream<V, S>(
        &mut self,
        observer: Point3<f32>,
        view: &V,
        world: &mut World,
        surface: &mut S,
    ) -> StreamingReport
    where
        V: ViewVolume + ?Sized,
        S: RenderSurface<Handle = H>,
    {
        let needed = self.needed_chunks(observer, view);
        let needed_keys: HashSet<ChunkKey> = needed.iter().map(|&p| ChunkKey::new(p)).collect();

        let mut report = StreamingReport {
            needed: needed.len(),
            ..StreamingReport::default()
        };

        for position in needed {
            let key = ChunkKey::new(position);
            if self.geometry.contains_key(&key) {
                continue;
            }
            let data = world.ensure(position);
            let geometry = build_chunk_geometry(position, data);
            self.geometry.insert(key, surface.attach(key, geometry));
            report.loaded += 1;
        }

        let stale: Vec<ChunkKey> = self
            .geometry
            .keys()
            .filter(|key| !needed_keys.contains(key))
            .copied()
            .collect();
        for key in stale {
            if let Some(handle) = self.geometry.remove(&key) {
                surface.detach(handle);
                report.evicted += 1;
            }
        }

        report.dropped = world.trim(&needed_keys);
        report.resident = self.geometry.len();
        debug!("Streaming pass: {}", report);
        report
    }

    /// Installs freshly built geometry for `key`, detaching any handle it
    /// replaces.
    pub fn replace_geometry<S>(&mut self, key: ChunkKey, geometry: ChunkGeometry, surface: &mut S)
    where
        S: RenderSurface<Handle = H>,
    {
        if let Some(old) = self.geometry.remove(&key) {
            surface.detach(old);
        }
        self.geometry.insert(key, surface.attach(key, geometry));
    }

    /// Detaches every live handle.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: RenderSurface<Handle = H>,
    {
        for (_, handle) in self.geometry.drain() {
            surface.detach(handle);
        }
    }

    pub fn has_geometry(&self, position: ChunkPosition) -> bool {
        self.geometry.contains_key(&ChunkKey::new(position))
    }

    pub fn geometry_count(&self) -> usize {
        self.geometry.len()
    }

    /// Keys of all chunks with live geometry, in no particular order.
    pub fn resident_keys(&self) -> impl Iterator<Item = &ChunkKey> + '_ {
        self.geometry.keys()
    }
}
