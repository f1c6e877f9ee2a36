//! Point and vector aliases

use nalgebra::{Point2, Point3, Vector2, Vector3, Vector4};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 2D point with floating point coordinates
pub type Point2f = Point2<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 2D vector with floating point components
pub type Vector2f = Vector2<f32>;

/// A 4D vector, used for planes and RGBA colors
pub type Vector4f = Vector4<f32>;

/// Build a point from a `[x, y, z]` triple as found in JSON descriptions.
pub fn point_from_array(values: [f32; 3]) -> Point3f {
    Point3f::new(values[0], values[1], values[2])
}

/// Build a vector from a `[x, y, z]` triple as found in JSON descriptions.
pub fn vector_from_array(values: [f32; 3]) -> Vector3f {
    Vector3f::new(values[0], values[1], values[2])
}

/// Convert a `0xRRGGBB` color to an rgb vector in `[0, 1]`
pub fn rgb_from_hex(hex: u32) -> Vector3f {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Vector3f::new(channel(16), channel(8), channel(0))
}
