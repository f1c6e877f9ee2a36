//! Planes in Hessian normal form

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A plane `normal · p + constant = 0` with a unit-length normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3f,
    pub constant: f32,
}

impl Plane {
    /// Create a plane, normalizing the equation so the normal has unit length
    pub fn new(normal: Vector3f, constant: f32) -> Self {
        let length = normal.norm();
        if length > f32::EPSILON {
            Self {
                normal: normal / length,
                constant: constant / length,
            }
        } else {
            Self { normal, constant }
        }
    }

    /// The ground plane `z = 0`
    pub fn ground() -> Self {
        Self::new(Vector3f::z(), 0.0)
    }

    /// Create a plane from `[a, b, c, d]` with `a·x + b·y + c·z + d = 0`
    pub fn from_components(components: [f32; 4]) -> Self {
        Self::new(
            Vector3f::new(components[0], components[1], components[2]),
            components[3],
        )
    }

    /// Create the plane through `point` with the given normal
    pub fn from_normal_and_coplanar_point(normal: &Vector3f, point: &Point3f) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            constant: -point.coords.dot(&normal),
        }
    }

    /// Signed distance from the plane to `point`
    pub fn distance_to_point(&self, point: &Point3f) -> f32 {
        self.normal.dot(&point.coords) + self.constant
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project_point(&self, point: &Point3f) -> Point3f {
        point - self.normal * self.distance_to_point(point)
    }

    /// The plane as an `[a, b, c, d]` vector, the layout shaders expect
    pub fn to_vector4(&self) -> Vector4f {
        Vector4f::new(self.normal.x, self.normal.y, self.normal.z, self.constant)
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::ground()
    }
}
