//! Affine transforms for scene nodes

use crate::point::*;
use nalgebra::{Matrix4, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// A 4x4 affine transform attached to a scene node or foot root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(offset: Vector3f) -> Self {
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// Create a rotation transformation from a quaternion
    pub fn rotation(rotation: UnitQuaternion<f32>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Build a transform from sixteen values listed row by row,
    /// the layout used by `scene.json`.
    pub fn from_row_major(values: &[f32; 16]) -> Self {
        Self {
            matrix: Matrix4::from_row_slice(values),
        }
    }

    /// The translation part of the transform
    pub fn translation_part(&self) -> Vector3f {
        Vector3f::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Replace the translation part, keeping the linear part intact
    pub fn set_translation(&mut self, offset: &Vector3f) {
        self.matrix[(0, 3)] = offset.x;
        self.matrix[(1, 3)] = offset.y;
        self.matrix[(2, 3)] = offset.z;
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3f::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Apply the linear part of the transformation to a vector
    pub fn transform_vector(&self, vector: &Vector3f) -> Vector3f {
        self.matrix.fixed_view::<3, 3>(0, 0) * vector
    }

    /// `self` applied after `other`
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Get the inverse transformation
    pub fn inverse(self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Matrix4<f32>> for Transform3D {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_row_major_translation() {
        let transform = Transform3D::from_row_major(&[
            1.0, 0.0, 0.0, 0.06, //
            0.0, 1.0, 0.0, -0.2, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        assert_relative_eq!(transform.translation_part(), Vector3f::new(0.06, -0.2, 0.0));
        let moved = transform.transform_point(&Point3f::origin());
        assert_relative_eq!(moved, Point3f::new(0.06, -0.2, 0.0));
    }

    #[test]
    fn test_compose_and_inverse() {
        let rotate = Transform3D::rotation(UnitQuaternion::from_axis_angle(
            &Vector3f::z_axis(),
            std::f32::consts::FRAC_PI_2,
        ));
        let shift = Transform3D::translation(Vector3f::new(1.0, 0.0, 0.0));
        let combined = shift * rotate;

        let point = combined.transform_point(&Point3f::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point, Point3f::new(1.0, 1.0, 0.0), epsilon = 1e-6);

        let back = combined.inverse().unwrap().transform_point(&point);
        assert_relative_eq!(back, Point3f::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        let direction = combined.transform_vector(&Vector3f::x());
        assert_relative_eq!(direction, Vector3f::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_set_translation() {
        let mut transform = Transform3D::identity();
        transform.set_translation(&Vector3f::new(0.0, 0.0, -0.02));
        assert_relative_eq!(
            transform.transform_point(&Point3f::new(1.0, 1.0, 1.0)),
            Point3f::new(1.0, 1.0, 0.98)
        );
    }
}
