//! # Engine State Module
//!
//! The core engine module that manages the state and functionality of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Camera, projection and the per-tick observer pose
//! * `edit` - Hit resolution and single-voxel edits
//! * `rendering` - Chunk geometry and the render surface seam
//! * `streaming` - Visibility-driven geometry loading and eviction
//! * `voxels` - Handles voxel data, chunks, and world generation
//!
//! ## Architecture
//!
//! Every subsystem owns one piece of state and `EngineState` owns all of
//! them. There are no globals, so several independent worlds can live in one
//! process. Work happens synchronously on the caller's thread: a tick runs a
//! streaming pass when one is due, and an edit validates, mutates and
//! rebuilds its chunk before returning.

use cgmath::Point3;
use log::{debug, info};
use web_time::{Duration, Instant};

use crate::config::WorldConfig;

use camera_state::ViewVolume;
use edit::{EditError, EditGateway, HitResult, VoxelTarget};
use rendering::{build_chunk_geometry, RenderSurface};
use streaming::{StreamingManager, StreamingReport};
use voxels::{
    block::BlockType,
    coords::{ChunkKey, ChunkPosition},
    generation::TerrainParams,
    world::World,
};

pub mod camera_state;
pub mod edit;
pub mod rendering;
pub mod streaming;
pub mod voxels;

/// The main state container for the voxel engine
///
/// Owns the chunk store, the geometry table and the render surface the
/// geometry is attached to.
///
/// # Examples
///
/// ```
/// use block_world::{
///     config::WorldConfig,
///     engine_state::{camera_state::AllVisible, rendering::HeadlessSurface, EngineState},
/// };
/// use cgmath::Point3;
/// use web_time::Instant;
///
/// let config = WorldConfig {
///     view_radius: 1,
///     ..WorldConfig::default()
/// };
/// let mut engine = EngineState::new(config, HeadlessSurface::new());
///
/// let report = engine.tick(Instant::now(), Point3::new(8.0, 40.0, 8.0), &AllVisible);
/// assert_eq!(report.map(|r| r.resident), Some(27));
/// ```
pub struct EngineState<S: RenderSurface> {
    /// Configuration the engine was created with
    config: WorldConfig,
    /// The voxel world containing all chunk data
    world: World,
    /// Geometry handles and the streaming throttle
    streaming: StreamingManager<S::Handle>,
    /// Edit validation
    edits: EditGateway,
    /// Where chunk geometry goes
    surface: S,
}

impl<S: RenderSurface> EngineState<S> {
    /// Creates a new engine state with an empty world
    ///
    /// # Arguments
    ///
    /// * `config` - World parameters, expected to have passed [`WorldConfig::validate`]
    /// * `surface` - The render surface chunk geometry is attached to
    pub fn new(config: WorldConfig, surface: S) -> Self {
        let world = World::new(TerrainParams::from(&config), config.max_resident_chunks);
        let streaming = StreamingManager::new(
            config.view_radius,
            Duration::from_millis(config.streaming_interval_ms),
        );
        let edits = EditGateway::new(config.interaction_range);
        info!(
            "Engine state created (seed {}, view radius {})",
            config.seed, config.view_radius
        );

        Self {
            config,
            world,
            streaming,
            edits,
            surface,
        }
    }

    /// Advances the engine by one frame
    ///
    /// Runs a streaming pass around `position` if the streaming interval has
    /// elapsed since the last one.
    ///
    /// # Arguments
    ///
    /// * `now` - Current time
    /// * `position` - Observer eye position in world space
    /// * `view` - The observer's view volume
    ///
    /// # Returns
    ///
    /// The pass report, or `None` if no pass was due
    pub fn tick<V>(&mut self, now: Instant, position: Point3<f32>, view: &V) -> Option<StreamingReport>
    where
        V: ViewVolume + ?Sized,
    {
        self.streaming
            .update(now, position, view, &mut self.world, &mut self.surface)
    }

    /// Clears the voxel struck by `hit`
    ///
    /// # Returns
    ///
    /// Whether a voxel was changed
    pub fn remove_voxel(&mut self, observer: Point3<f32>, hit: &HitResult) -> bool {
        match self.try_remove_voxel(observer, hit) {
            Ok(_) => true,
            Err(err) => {
                debug!("Removal ignored: {}", err);
                false
            }
        }
    }

    /// Like [`EngineState::remove_voxel`], reporting why nothing happened
    pub fn try_remove_voxel(
        &mut self,
        observer: Point3<f32>,
        hit: &HitResult,
    ) -> Result<VoxelTarget, EditError> {
        let target = self.edits.remove(observer, hit, &mut self.world)?;
        self.rebuild_chunk(target.chunk);
        Ok(target)
    }

    /// Places `block` against the face struck by `hit`
    ///
    /// # Returns
    ///
    /// Whether a voxel was changed
    pub fn place_voxel(&mut self, observer: Point3<f32>, hit: &HitResult, block: BlockType) -> bool {
        match self.try_place_voxel(observer, hit, block) {
            Ok(_) => true,
            Err(err) => {
                debug!("Placement ignored: {}", err);
                false
            }
        }
    }

    /// Like [`EngineState::place_voxel`], reporting why nothing happened
    pub fn try_place_voxel(
        &mut self,
        observer: Point3<f32>,
        hit: &HitResult,
        block: BlockType,
    ) -> Result<VoxelTarget, EditError> {
        let target = self.edits.place(observer, hit, block, &mut self.world)?;
        self.rebuild_chunk(target.chunk);
        Ok(target)
    }

    /// The solid voxel a removal through `hit` would clear, if any
    ///
    /// Useful for drawing a selection outline. Never generates chunks.
    pub fn target_voxel(&self, observer: Point3<f32>, hit: &HitResult) -> Option<Point3<i32>> {
        let target = self.edits.target(observer, hit, true).ok()?;
        self.world
            .block_at(target.world)
            .filter(|block| block.is_solid())
            .map(|_| target.world)
    }

    /// Rebuilds the geometry of one chunk and swaps it in
    ///
    /// The new geometry is attached even if the chunk is currently outside
    /// the needed set; the next streaming pass evicts it in that case.
    pub fn rebuild_chunk(&mut self, position: ChunkPosition) {
        let data = self.world.ensure(position);
        let geometry = build_chunk_geometry(position, data);
        self.streaming
            .replace_geometry(ChunkKey::new(position), geometry, &mut self.surface);
    }

    /// Block at a world voxel coordinate, if its chunk is resident
    pub fn block_at(&self, world: Point3<i32>) -> Option<BlockType> {
        self.world.block_at(world)
    }

    /// Changes the streaming radius
    ///
    /// The next tick runs a pass right away so the change is visible
    /// without waiting for the throttle.
    pub fn set_view_radius(&mut self, radius: i32) {
        self.streaming.set_radius(radius);
        self.streaming.force_next_pass();
        self.config.view_radius = self.streaming.radius();
        info!("View radius set to {}", self.config.view_radius);
    }

    pub fn view_radius(&self) -> i32 {
        self.streaming.radius()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn streaming(&self) -> &StreamingManager<S::Handle> {
        &self.streaming
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Detaches all geometry and returns the surface
    pub fn into_surface(mut self) -> S {
        self.streaming.clear(&mut self.surface);
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::engine_state::{
        camera_state::AllVisible,
        rendering::{RecordingSurface, SurfaceEvent},
        voxels::coords::{chunk_center, world_to_chunk},
    };

    fn engine(view_radius: i32) -> EngineState<RecordingSurface> {
        let config = WorldConfig {
            view_radius,
            ..WorldConfig::default()
        };
        EngineState::new(config, RecordingSurface::new())
    }

    #[test]
    fn edits_replace_the_chunk_geometry() {
        let mut engine = engine(0);
        let surface_y = engine.world().generator().surface_height(5, 5);
        let grass = Point3::new(5, surface_y, 5);
        let chunk = world_to_chunk(grass);

        engine.tick(Instant::now(), chunk_center(chunk), &AllVisible);
        assert_eq!(engine.block_at(grass), Some(BlockType::GRASS));
        engine.surface_mut().clear();

        let eye = Point3::new(5.0, surface_y as f32 + 2.0, 5.0);
        let hit = HitResult::new(
            Point3::new(5.0, surface_y as f32 + 0.5, 5.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(engine.target_voxel(eye, &hit), Some(grass));
        assert!(engine.remove_voxel(eye, &hit));
        assert_eq!(engine.block_at(grass), Some(BlockType::AIR));

        let key = ChunkKey::new(chunk);
        assert_eq!(
            engine.surface().events[0],
            SurfaceEvent::Detached(key),
            "old geometry is detached before the rebuild is attached"
        );
        assert_eq!(engine.surface().live_keys(), vec![key]);
        assert_eq!(engine.target_voxel(eye, &hit), None);
    }

    #[test]
    fn rejected_edits_do_not_rebuild() {
        let mut engine = engine(0);
        // Terrain and trees never reach this high.
        let eye = Point3::new(0.0, 62.0, 0.0);
        let hit = HitResult::new(Point3::new(0.0, 60.5, 0.0), Vector3::new(0.0, 1.0, 0.0));

        assert!(!engine.remove_voxel(eye, &hit));
        assert!(engine.surface().events.is_empty());
    }

    #[test]
    fn view_radius_changes_force_a_pass() {
        let mut engine = engine(0);
        let start = Instant::now();
        let eye = Point3::new(8.0, 40.0, 8.0);

        assert_eq!(engine.tick(start, eye, &AllVisible).map(|r| r.resident), Some(1));
        engine.set_view_radius(1);
        let report = engine.tick(start + Duration::from_millis(1), eye, &AllVisible);
        assert_eq!(report.map(|r| r.resident), Some(27));
        assert_eq!(engine.config().view_radius, 1);

        let surface = engine.into_surface();
        assert!(surface.live_keys().is_empty());
    }
}
