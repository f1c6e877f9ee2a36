//! Core traits for footview

use crate::{bounds::Aabb, mesh::MeshGroup, point::*};

/// Objects with a spatial extent
pub trait Bounded {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> Aabb;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        self.bounding_box().center()
    }
}

impl Bounded for MeshGroup {
    fn bounding_box(&self) -> Aabb {
        MeshGroup::bounding_box(self)
    }
}

impl Bounded for [MeshGroup] {
    fn bounding_box(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for group in self {
            bounds.union(&group.bounding_box());
        }
        bounds
    }
}

impl Bounded for Vec<MeshGroup> {
    fn bounding_box(&self) -> Aabb {
        self.as_slice().bounding_box()
    }
}
