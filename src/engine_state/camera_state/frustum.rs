//! View frustum for culling

use cgmath::{EuclideanSpace, InnerSpace, Matrix, Matrix4, Point3, Vector3, Vector4};

/// Anything that can answer "is this sphere possibly visible".
///
/// The streaming pass only needs this one query, so the frustum, a
/// permissive test volume and any renderer-provided culling structure can
/// all stand in for each other.
pub trait ViewVolume {
    /// Whether a sphere at `center` with `radius` intersects the volume.
    fn intersects_sphere(&self, center: Point3<f32>, radius: f32) -> bool;
}

/// A view volume that accepts everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllVisible;

impl ViewVolume for AllVisible {
    fn intersects_sphere(&self, _center: Point3<f32>, _radius: f32) -> bool {
        true
    }
}

/// A plane defined by normal and distance from origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vector3<f32>, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(point.to_vec()) + self.distance
    }

    fn normalized(plane: Vector4<f32>) -> Self {
        let normal = plane.truncate();
        let len = normal.magnitude();
        if len > 0.0 {
            Plane::new(normal / len, plane.w / len)
        } else {
            Plane::new(normal, plane.w)
        }
    }
}

/// View frustum with 6 planes (left, right, bottom, top, near, far).
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Expects clip-space depth in `[0, 1]`, which is what
    /// [`Projection::calc_matrix`](super::camera::Projection::calc_matrix)
    /// produces.
    pub fn from_view_projection(vp: &Matrix4<f32>) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let left = Plane::normalized(rows[3] + rows[0]);
        let right = Plane::normalized(rows[3] - rows[0]);
        let bottom = Plane::normalized(rows[3] + rows[1]);
        let top = Plane::normalized(rows[3] - rows[1]);
        // z >= 0 in clip space
        let near = Plane::normalized(rows[2]);
        let far = Plane::normalized(rows[3] - rows[2]);

        Self {
            planes: [left, right, bottom, top, near, far],
        }
    }

    /// Check if point is inside frustum
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }
}

impl ViewVolume for Frustum {
    fn intersects_sphere(&self, center: Point3<f32>, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use super::*;
    use crate::engine_state::camera_state::camera::{Camera, Projection};

    fn looking_down_x() -> Frustum {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let projection = Projection::new(800, 600, Deg(60.0), 0.1, 500.0);
        Frustum::from_view_projection(&(projection.calc_matrix() * camera.calc_matrix()))
    }

    #[test]
    fn plane_distance() {
        let plane = Plane::new(Vector3::unit_y(), 0.0);
        assert_eq!(plane.distance_to_point(Point3::new(0.0, 5.0, 0.0)), 5.0);
        assert_eq!(plane.distance_to_point(Point3::new(0.0, -3.0, 0.0)), -3.0);
    }

    #[test]
    fn contains_points_ahead_only() {
        let frustum = looking_down_x();
        assert!(frustum.contains_point(Point3::new(20.0, 0.0, 0.0)));
        assert!(!frustum.contains_point(Point3::new(-20.0, 0.0, 0.0)));
        assert!(!frustum.contains_point(Point3::new(600.0, 0.0, 0.0)));
    }

    #[test]
    fn sphere_test_is_conservative() {
        let frustum = looking_down_x();
        assert!(frustum.intersects_sphere(Point3::new(20.0, 0.0, 0.0), 1.0));
        assert!(!frustum.intersects_sphere(Point3::new(-20.0, 0.0, 0.0), 1.0));
        // Center behind the eye, but the sphere reaches into view.
        assert!(frustum.intersects_sphere(Point3::new(-1.0, 0.0, 0.0), 4.0));
        // Off to the side, just outside the horizontal field of view.
        assert!(!frustum.intersects_sphere(Point3::new(10.0, 0.0, 30.0), 1.0));
        assert!(frustum.intersects_sphere(Point3::new(10.0, 0.0, 30.0), 30.0));
    }

    #[test]
    fn all_visible_accepts_anything() {
        assert!(AllVisible.intersects_sphere(Point3::new(1.0e6, -1.0e6, 0.0), 0.0));
    }
}
