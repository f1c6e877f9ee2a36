//! Decoded mesh groups

use crate::bounds::Aabb;
use crate::point::*;
use serde::{Deserialize, Serialize};

/// One material group of a decoded mesh.
///
/// All attribute buffers are unindexed: every triangle contributes three
/// consecutive vertices, so `vertices.len() == 9 * triangle_count()`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshGroup {
    /// Packed xyz positions, three per triangle corner
    pub vertices: Vec<f32>,
    /// Packed xyz normals, same cardinality as `vertices`
    pub normals: Option<Vec<f32>>,
    /// Packed uv pairs, one per triangle corner
    pub uvs: Option<Vec<f32>>,
    /// Packed rgb colors, same cardinality as `vertices`
    pub colors: Option<Vec<f32>>,
    /// Material name, empty when the group declared none
    pub material_name: String,
}

impl MeshGroup {
    /// Create a group from packed positions
    pub fn new(vertices: Vec<f32>, material_name: impl Into<String>) -> Self {
        Self {
            vertices,
            material_name: material_name.into(),
            ..Default::default()
        }
    }

    /// Number of triangle corners
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 9
    }

    /// Check if the group holds no triangles
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Position of the `index`-th triangle corner
    pub fn vertex(&self, index: usize) -> Option<Point3f> {
        let slice = self.vertices.get(index * 3..index * 3 + 3)?;
        Some(Point3f::new(slice[0], slice[1], slice[2]))
    }

    /// Iterate over corner positions
    pub fn positions(&self) -> impl Iterator<Item = Point3f> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|c| Point3f::new(c[0], c[1], c[2]))
    }

    /// Bounding box of all positions
    pub fn bounding_box(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for point in self.positions() {
            bounds.expand_by_point(&point);
        }
        bounds
    }

    /// Fill in flat per-triangle normals when the group carries none
    pub fn compute_normals_if_missing(&mut self) {
        if self.normals.is_some() {
            return;
        }

        let mut normals = Vec::with_capacity(self.vertices.len());
        for triangle in self.vertices.chunks_exact(9) {
            let v0 = Point3f::new(triangle[0], triangle[1], triangle[2]);
            let v1 = Point3f::new(triangle[3], triangle[4], triangle[5]);
            let v2 = Point3f::new(triangle[6], triangle[7], triangle[8]);
            let normal = (v1 - v0).cross(&(v2 - v0));
            let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::z);
            for _ in 0..3 {
                normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
            }
        }
        self.normals = Some(normals);
    }

    /// Edge list for wireframe rendering, two endpoints per segment
    pub fn wireframe_segments(&self) -> Vec<[Point3f; 2]> {
        let mut segments = Vec::with_capacity(self.triangle_count() * 3);
        let corners: Vec<Point3f> = self.positions().collect();
        for triangle in corners.chunks_exact(3) {
            segments.push([triangle[0], triangle[1]]);
            segments.push([triangle[1], triangle[2]]);
            segments.push([triangle[2], triangle[0]]);
        }
        segments
    }

    /// Raw bytes of the position buffer, ready for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the normal buffer, if any
    pub fn normal_bytes(&self) -> Option<&[u8]> {
        self.normals.as_deref().map(bytemuck::cast_slice)
    }
}
