//! Core data structures and traits for footview
//!
//! This crate provides the fundamental geometry types (bounds, planes, rays,
//! transforms), the decoded mesh representation and the foot-scan data model
//! shared by the camera, overlay and render crates.

pub mod point;
pub mod bounds;
pub mod plane;
pub mod ray;
pub mod mesh;
pub mod traits;
pub mod transform;
pub mod foot;
pub mod measurement;
pub mod clock;
pub mod error;

pub use point::*;
pub use bounds::*;
pub use plane::*;
pub use ray::*;
pub use mesh::*;
pub use traits::*;
pub use transform::*;
pub use foot::*;
pub use measurement::*;
pub use clock::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Point3, Vector2, Vector3, Vector4, Matrix4, UnitQuaternion};

/// Clamp `value` into `[min, max]`, preferring the bounds on ties.
///
/// Unlike `f32::clamp` this never panics when `min > max`; the lower bound
/// wins in that case.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value <= min {
        return min;
    }
    if max <= value {
        return max;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_prefers_bounds() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(0.5, 1.0, 0.0), 1.0);
    }
}
