//! Perspective camera that can blend into a matching orthographic projection

use crate::orientation::CameraOrientation;
use footview_core::{Matrix4, Point2f, Point3f, Ray, UnitQuaternion, Vector3f};
use nalgebra::{Isometry3, Translation3};
use serde::{Deserialize, Serialize};

/// A sub-rectangle of a larger virtual viewport, for tiled rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewOffset {
    pub full_width: f32,
    pub full_height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Frustum extents on a plane in front of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Off-axis perspective matrix (OpenGL clip conventions)
pub fn make_perspective(bounds: &ViewBounds, near: f32, far: f32) -> Matrix4<f32> {
    let ViewBounds { left, right, top, bottom } = *bounds;
    let x = 2.0 * near / (right - left);
    let y = 2.0 * near / (top - bottom);
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = -(far + near) / (far - near);
    let d = -2.0 * far * near / (far - near);

    Matrix4::new(
        x, 0.0, a, 0.0, //
        0.0, y, b, 0.0, //
        0.0, 0.0, c, d, //
        0.0, 0.0, -1.0, 0.0,
    )
}

/// Orthographic matrix (OpenGL clip conventions)
pub fn make_orthographic(bounds: &ViewBounds, near: f32, far: f32) -> Matrix4<f32> {
    let ViewBounds { left, right, top, bottom } = *bounds;
    let w = 1.0 / (right - left);
    let h = 1.0 / (top - bottom);
    let p = 1.0 / (far - near);

    Matrix4::new(
        2.0 * w, 0.0, 0.0, -(right + left) * w, //
        0.0, 2.0 * h, 0.0, -(top + bottom) * h, //
        0.0, 0.0, -2.0 * p, -(far + near) * p, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// A perspective camera whose projection can be blended towards an
/// orthographic one that covers the same extent at the target distance.
#[derive(Debug, Clone)]
pub struct ProjectionCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
    /// Film width in millimetres, used with `film_offset` for lens shift
    pub film_gauge: f32,
    pub film_offset: f32,
    pub view: Option<ViewOffset>,
    /// 0 is fully perspective, 1 fully orthographic
    pub orthographic_blend: f32,
    pub position: Point3f,
    pub orientation: UnitQuaternion<f32>,
    pub up: Vector3f,
    target: Option<Point3f>,
    projection: Matrix4<f32>,
    projection_inverse: Matrix4<f32>,
}

impl ProjectionCamera {
    /// Create a camera at the origin looking down -Z at the origin target
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            zoom: 1.0,
            film_gauge: 35.0,
            film_offset: 0.0,
            view: None,
            orthographic_blend: 0.0,
            position: Point3f::origin(),
            orientation: UnitQuaternion::identity(),
            up: Vector3f::y(),
            target: Some(Point3f::origin()),
            projection: Matrix4::identity(),
            projection_inverse: Matrix4::identity(),
        };
        camera.update_projection();
        camera
    }

    pub fn target(&self) -> Option<Point3f> {
        self.target
    }

    /// Set the point the orthographic extent is matched at
    pub fn set_target(&mut self, target: Option<Point3f>) {
        self.target = target;
    }

    /// Distance from the camera to its target, if it has one
    pub fn distance_to_target(&self) -> Option<f32> {
        self.target.map(|target| (self.position - target).norm())
    }

    /// Width of the film back, narrowed for portrait aspect ratios
    pub fn film_width(&self) -> f32 {
        self.film_gauge * self.aspect.min(1.0)
    }

    /// Perspective extents on a plane `plane_distance` in front of the camera
    pub fn view_bounds(&self, plane_distance: f32) -> ViewBounds {
        let mut top = plane_distance * (0.5 * self.fov).to_radians().tan() / self.zoom;
        let mut height = 2.0 * top;
        let mut width = self.aspect * height;
        let mut left = -0.5 * width;

        if let Some(view) = &self.view {
            left += view.offset_x * width / view.full_width;
            top -= view.offset_y * height / view.full_height;
            width *= view.width / view.full_width;
            height *= view.height / view.full_height;
        }

        if self.film_offset != 0.0 {
            left += self.near * self.film_offset / self.film_width();
        }

        ViewBounds {
            left,
            right: left + width,
            top,
            bottom: top - height,
        }
    }

    /// Pure perspective projection for the current parameters
    pub fn perspective_matrix(&self) -> Matrix4<f32> {
        make_perspective(&self.view_bounds(self.near), self.near, self.far)
    }

    /// Orthographic projection spanning the perspective extent at the target
    pub fn orthographic_matrix(&self) -> Matrix4<f32> {
        let distance = self.distance_to_target().unwrap_or(self.near);
        make_orthographic(&self.view_bounds(distance), self.near, self.far)
    }

    /// Rebuild the projection as `(1 - blend) * perspective + blend * orthographic`.
    ///
    /// Does nothing while the camera has no target.
    pub fn update_projection(&mut self) {
        if self.target.is_none() {
            return;
        }
        let a = 1.0 - self.orthographic_blend;
        let b = self.orthographic_blend;
        self.projection = self.perspective_matrix() * a + self.orthographic_matrix() * b;
        self.projection_inverse = self
            .projection
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection
    }

    pub fn projection_matrix_inverse(&self) -> &Matrix4<f32> {
        &self.projection_inverse
    }

    /// Camera-to-world transform
    pub fn world_matrix(&self) -> Matrix4<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation)
            .to_homogeneous()
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation)
            .inverse()
            .to_homogeneous()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    pub fn set_view_offset(&mut self, view: ViewOffset) {
        self.view = Some(view);
        self.update_projection();
    }

    pub fn clear_view_offset(&mut self) {
        self.view = None;
        self.update_projection();
    }

    /// Orient the camera so that -Z points at `point`
    pub fn look_at(&mut self, point: &Point3f) {
        self.orientation = look_rotation(&(self.position - point), &self.up);
    }

    /// Place the camera according to a named orientation
    pub fn set_orientation(&mut self, orientation: &CameraOrientation) {
        self.position = orientation.position;
        self.up = orientation.up;
        self.target = Some(orientation.target);
        self.look_at(&orientation.target);
        self.update_projection();
    }

    /// World point to normalized device coordinates
    pub fn project(&self, point: &Point3f) -> Point3f {
        let clip = self.projection * self.view_matrix() * point.to_homogeneous();
        Point3f::from_homogeneous(clip).unwrap_or_else(Point3f::origin)
    }

    /// Normalized device coordinates to a world point
    pub fn unproject(&self, ndc: &Point3f) -> Point3f {
        let world = self.world_matrix() * self.projection_inverse * ndc.to_homogeneous();
        Point3f::from_homogeneous(world).unwrap_or(self.position)
    }

    /// Picking ray through a point given in normalized device coordinates
    pub fn get_ray(&self, ndc: &Point2f) -> Ray {
        let near = self.unproject(&Point3f::new(ndc.x, ndc.y, -1.0));
        let far = self.unproject(&Point3f::new(ndc.x, ndc.y, 1.0));
        let direction = (far - near).try_normalize(f32::EPSILON).unwrap_or_else(|| {
            -(self.orientation * Vector3f::z())
        });
        Ray::new(near, direction)
    }
}

impl Default for ProjectionCamera {
    fn default() -> Self {
        Self::new(60.0, 1.0, 0.05, 1.5)
    }
}

/// Rotation whose -Z axis points against `offset` (from the point looked at
/// towards the eye) with +Y as close to `up` as possible
pub fn look_rotation(offset: &Vector3f, up: &Vector3f) -> UnitQuaternion<f32> {
    if offset.norm_squared() == 0.0 {
        return UnitQuaternion::identity();
    }
    let mut rotation = UnitQuaternion::face_towards(offset, up);
    if rotation.coords.iter().any(|c| !c.is_finite()) {
        // `offset` is parallel to `up`
        rotation = UnitQuaternion::rotation_between(&Vector3f::z(), offset)
            .unwrap_or_else(UnitQuaternion::identity);
    }
    rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Orthographic3, Perspective3};

    fn camera_at(position: Point3f) -> ProjectionCamera {
        let mut camera = ProjectionCamera::new(60.0, 1.5, 0.05, 1.5);
        camera.position = position;
        camera.look_at(&Point3f::origin());
        camera.update_projection();
        camera
    }

    #[test]
    fn test_blend_zero_is_perspective() {
        let camera = camera_at(Point3f::new(0.0, 0.0, 0.5));
        let expected = Perspective3::new(1.5, 60f32.to_radians(), 0.05, 1.5).to_homogeneous();
        assert_relative_eq!(*camera.projection_matrix(), expected, epsilon = 1e-4);
    }

    #[test]
    fn test_blend_zero_with_zoom() {
        let mut camera = camera_at(Point3f::new(0.0, 0.0, 0.5));
        camera.zoom = 2.0;
        camera.update_projection();
        let fovy = 2.0 * ((30f32).to_radians().tan() / 2.0).atan();
        let expected = Perspective3::new(1.5, fovy, 0.05, 1.5).to_homogeneous();
        assert_relative_eq!(*camera.projection_matrix(), expected, epsilon = 1e-4);
    }

    #[test]
    fn test_blend_one_is_orthographic_at_target_distance() {
        let mut camera = camera_at(Point3f::new(0.0, 0.0, 0.5));
        camera.orthographic_blend = 1.0;
        camera.update_projection();

        let top = 0.5 * (30f32).to_radians().tan();
        let right = 1.5 * top;
        let expected = Orthographic3::new(-right, right, -top, top, 0.05, 1.5).to_homogeneous();
        assert_relative_eq!(*camera.projection_matrix(), expected, epsilon = 1e-4);
    }

    #[test]
    fn test_half_blend_is_elementwise_mix() {
        let mut camera = camera_at(Point3f::new(0.3, 0.2, 0.4));
        camera.orthographic_blend = 0.25;
        camera.update_projection();
        let expected = camera.perspective_matrix() * 0.75 + camera.orthographic_matrix() * 0.25;
        assert_relative_eq!(*camera.projection_matrix(), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_no_target_keeps_projection() {
        let mut camera = camera_at(Point3f::new(0.0, 0.0, 0.5));
        let before = *camera.projection_matrix();
        camera.set_target(None);
        camera.orthographic_blend = 1.0;
        camera.fov = 20.0;
        camera.update_projection();
        assert_eq!(*camera.projection_matrix(), before);
    }

    #[test]
    fn test_view_offset_halves_extent() {
        let mut camera = camera_at(Point3f::new(0.0, 0.0, 0.5));
        let full = camera.view_bounds(camera.near);
        camera.set_view_offset(ViewOffset {
            full_width: 200.0,
            full_height: 100.0,
            offset_x: 100.0,
            offset_y: 0.0,
            width: 100.0,
            height: 100.0,
        });
        let right_half = camera.view_bounds(camera.near);
        assert_relative_eq!(right_half.left, 0.0, epsilon = 1e-6);
        assert_relative_eq!(right_half.right, full.right, epsilon = 1e-6);
        assert_relative_eq!(right_half.top, full.top, epsilon = 1e-6);

        camera.clear_view_offset();
        assert!(camera.view.is_none());
    }

    #[test]
    fn test_project_unproject() {
        let camera = camera_at(Point3f::new(0.1, -0.2, 0.4));
        let point = Point3f::new(0.02, 0.01, -0.03);
        let ndc = camera.project(&point);
        assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
        let back = camera.unproject(&ndc);
        assert_relative_eq!(back, point, epsilon = 1e-4);

        let center = camera.project(&Point3f::origin());
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = camera_at(Point3f::new(0.0, 0.3, 0.4));
        let ray = camera.get_ray(&Point2f::new(0.0, 0.0));
        let expected = (Point3f::origin() - camera.position).normalize();
        assert_relative_eq!(ray.direction, expected, epsilon = 1e-4);
        assert_relative_eq!((ray.origin - camera.position).norm(), 0.05, epsilon = 1e-3);
    }
}
