//! Rays for picking and silhouette probing

use crate::bounds::Aabb;
use crate::point::*;

/// A half-line starting at `origin` and extending along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

impl Ray {
    /// Create a ray; the direction is used as given
    pub fn new(origin: Point3f, direction: Vector3f) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }

    /// First point where the ray meets the box, using the slab method.
    ///
    /// When the origin is inside the box the exit point is returned.
    /// Returns `None` if the ray misses or the box is empty.
    pub fn intersect_box(&self, bounds: &Aabb) -> Option<Point3f> {
        if bounds.is_empty() {
            return None;
        }

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

            if direction.abs() <= f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let (mut near, mut far) = ((lo - origin) * inv, (hi - origin) * inv);
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }
            t_min = t_min.max(near);
            t_max = t_max.min(far);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }

        Some(self.at(if t_min >= 0.0 { t_min } else { t_max }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_hits_near_face() {
        let ray = Ray::new(Point3f::new(5.0, 0.0, 0.0), -Vector3f::x());
        let hit = ray.intersect_box(&unit_box()).unwrap();
        assert_relative_eq!(hit, Point3f::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_inside_returns_exit() {
        let ray = Ray::new(Point3f::origin(), Vector3f::y());
        let hit = ray.intersect_box(&unit_box()).unwrap();
        assert_relative_eq!(hit, Point3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_misses() {
        let ray = Ray::new(Point3f::new(5.0, 5.0, 0.0), -Vector3f::x());
        assert!(ray.intersect_box(&unit_box()).is_none());

        let behind = Ray::new(Point3f::new(5.0, 0.0, 0.0), Vector3f::x());
        assert!(behind.intersect_box(&unit_box()).is_none());

        assert!(ray.intersect_box(&Aabb::empty()).is_none());
    }
}
