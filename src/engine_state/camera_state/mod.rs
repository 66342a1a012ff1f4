//! # Camera State Management
//!
//! This module handles the observer's view of the world:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - Frustum extraction for chunk visibility determination
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages the camera's projection matrix
//! - `Frustum`: Six clip planes used to cull chunks outside the view
//! - `Observer`: The per-tick pose consumed by streaming and editing

use cgmath::Point3;

use super::voxels::coords::{chunk_containing, ChunkPosition};

pub mod camera;
mod frustum;

pub use frustum::{AllVisible, Frustum, Plane, ViewVolume};

/// The observer's pose for one tick.
///
/// Streaming reads the position and the frustum; the edit gateway reads the
/// position for its range check.
#[derive(Clone, Copy, Debug)]
pub struct Observer {
    /// Eye position in world space
    pub position: Point3<f32>,
    /// View volume derived from the camera and projection
    pub frustum: Frustum,
}

impl Observer {
    /// Builds the observer pose from the current camera and projection.
    pub fn from_camera(camera: &camera::Camera, projection: &camera::Projection) -> Self {
        let view_projection = projection.calc_matrix() * camera.calc_matrix();
        Observer {
            position: camera.position,
            frustum: Frustum::from_view_projection(&view_projection),
        }
    }

    /// The chunk the observer currently stands in.
    pub fn chunk_position(&self) -> ChunkPosition {
        chunk_containing(self.position)
    }
}

impl ViewVolume for Observer {
    fn intersects_sphere(&self, center: Point3<f32>, radius: f32) -> bool {
        self.frustum.intersects_sphere(center, radius)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use super::*;

    #[test]
    fn observer_tracks_camera_chunk() {
        let camera = camera::Camera::new(Point3::new(-0.5, 33.0, 17.0), Deg(0.0), Deg(0.0));
        let projection = camera::Projection::new(800, 600, Deg(70.0), 0.1, 1000.0);
        let observer = Observer::from_camera(&camera, &projection);
        assert_eq!(observer.chunk_position(), Point3::new(-1, 2, 1));
        assert!(observer.intersects_sphere(Point3::new(10.0, 33.0, 17.0), 1.0));
        assert!(!observer.intersects_sphere(Point3::new(-20.0, 33.0, 17.0), 1.0));
    }
}
