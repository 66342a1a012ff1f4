//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Camera representation and transformations
//! - Projection matrix handling
//!
//! ## Key Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages perspective projection settings

use cgmath::*;
use std::f32::consts::FRAC_PI_2;
use web_time::Duration;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// NDC range from -1 to 1 in X and Y, and 0 to 1 in Z.
///
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Represents a first-person camera in 3D space.
///
/// A yaw of zero looks down +X; positive yaw turns toward +Z.
#[derive(Clone, Debug)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space
    /// * `yaw` - Initial yaw (horizontal rotation around Y axis)
    /// * `pitch` - Initial pitch (vertical rotation around X axis), clamped short of straight up/down
    ///
    /// # Example
    /// ```rust
    /// use block_world::engine_state::camera_state::camera::Camera;
    /// use cgmath::{Deg, Point3};
    ///
    /// let camera = Camera::new(Point3::new(0.0, 40.0, 0.0), Deg(0.0), Deg(-20.0));
    /// assert!(camera.forward().y < 0.0);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// Gets the camera's normalized forward direction vector.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /// Moves the camera along its horizontal axes and world up.
    ///
    /// # Arguments
    /// * `forward` - Units per second along the facing direction projected onto XZ
    /// * `right` - Units per second to the camera's right
    /// * `up` - Units per second along world +Y
    /// * `dt` - Time elapsed since the last update
    pub fn fly(&mut self, forward: f32, right: f32, up: f32, dt: Duration) {
        let dt = dt.as_secs_f32();
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward_vec = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right_vec = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        self.position += forward_vec * forward * dt;
        self.position += right_vec * right * dt;
        self.position.y += up * dt;
    }

    /// Turns the camera by the given angles.
    pub fn rotate<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(&mut self, yaw: Y, pitch: P) {
        self.yaw += yaw.into();
        self.pitch += pitch.into();
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// Represents a camera's projection matrix and related parameters.
///
/// This handles the perspective projection used to render the 3D scene.
/// It manages the aspect ratio, field of view, and near/far clipping planes.
#[derive(Clone, Debug)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        let aspect = width as f32 / height.max(1) as f32;
        let fovy: Rad<f32> = fovy.into();
        Self {
            aspect,
            fovy,
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Calculates the projection matrix.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}
