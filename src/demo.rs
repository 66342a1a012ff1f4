//! Headless fly-over used by the binary.
//!
//! Flies a camera across the terrain for a number of simulated frames,
//! streaming chunks around it, then breaks the ground voxel under the
//! observer and puts a block back in its place.

use cgmath::{Deg, Point3, Vector3};
use log::{debug, info};
use web_time::{Duration, Instant};

use crate::{
    config::WorldConfig,
    engine_state::{
        camera_state::{
            camera::{Camera, Projection},
            Observer,
        },
        edit::HitResult,
        rendering::HeadlessSurface,
        voxels::block::BlockType,
        EngineState,
    },
};

/// Simulated frame time
const FRAME_TIME: Duration = Duration::from_millis(16);
/// Horizontal flight speed in blocks per second
const FLY_SPEED: f32 = 8.0;
/// Eye height above the ground voxel
const EYE_HEIGHT: f32 = 2.0;

/// What a fly-over did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DemoSummary {
    pub frames: u32,
    pub streaming_passes: u32,
    pub resident_geometry: usize,
    pub resident_chunks: usize,
    pub instances: usize,
    pub removed: bool,
    pub placed: bool,
}

/// Runs the fly-over for `frames` simulated frames.
pub fn fly_over(config: WorldConfig, frames: u32) -> DemoSummary {
    let mut engine = EngineState::new(config, HeadlessSurface::new());
    let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0);

    let ground = |engine: &EngineState<HeadlessSurface>, x: f32, z: f32| {
        engine
            .world()
            .generator()
            .surface_height(x.floor() as i32, z.floor() as i32)
    };

    let spawn_y = ground(&engine, 8.5, 8.5) as f32 + EYE_HEIGHT;
    let mut camera = Camera::new(Point3::new(8.5, spawn_y, 8.5), Deg(0.0), Deg(-15.0));

    let start = Instant::now();
    let mut summary = DemoSummary {
        frames,
        ..DemoSummary::default()
    };

    for frame in 0..frames {
        let now = start + FRAME_TIME * frame;
        camera.fly(FLY_SPEED, 0.0, 0.0, FRAME_TIME);
        camera.rotate(Deg(0.25), Deg(0.0));
        camera.position.y = ground(&engine, camera.position.x, camera.position.z) as f32 + EYE_HEIGHT;

        let observer = Observer::from_camera(&camera, &projection);
        if let Some(report) = engine.tick(now, observer.position, &observer) {
            summary.streaming_passes += 1;
            debug!("Frame {}: {}", frame, report);
        }
    }

    let eye = camera.position;
    let column = Point3::new(eye.x.floor(), 0.0, eye.z.floor());
    let ground_y = ground(&engine, eye.x, eye.z) as f32;
    let up = Vector3::new(0.0, 1.0, 0.0);

    let ground_hit = HitResult::new(Point3::new(column.x, ground_y + 0.5, column.z), up);
    summary.removed = engine.remove_voxel(eye, &ground_hit);

    let below_hit = HitResult::new(Point3::new(column.x, ground_y - 0.5, column.z), up);
    let selected = BlockType::from_palette_index(BlockType::cycle_palette(0, 2))
        .unwrap_or(BlockType::STONE);
    summary.placed = engine.place_voxel(eye, &below_hit, selected);
    info!(
        "Edits at ({}, {}, {}): removed {}, placed {:?} {}",
        column.x, ground_y, column.z, summary.removed, selected, summary.placed
    );

    summary.resident_geometry = engine.streaming().geometry_count();
    summary.resident_chunks = engine.world().len();
    summary.instances = engine.surface().instance_count();

    let surface = engine.into_surface();
    debug!("{} geometries still attached after shutdown", surface.attached());
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fly_over_streams_and_edits() {
        let config = WorldConfig {
            view_radius: 1,
            ..WorldConfig::default()
        };
        let summary = fly_over(config, 20);

        assert_eq!(summary.frames, 20);
        // Passes run at 0, 112 and 224 ms of the 304 ms flight.
        assert_eq!(summary.streaming_passes, 3);
        assert!(summary.resident_geometry > 0);
        assert!(summary.resident_chunks >= summary.resident_geometry);
        assert!(summary.instances > 0);
        assert!(summary.removed);
        assert!(summary.placed);
    }
}
