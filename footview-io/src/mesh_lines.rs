//! `mesh_lines_{side}.json`: contour lines drawn over a foot

use crate::error::{IoError, Result};
use footview_core::{Aabb, Point3f};
use serde::{Deserialize, Serialize};

/// Indexed line segments in foot coordinates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshLines {
    pub vertices: Vec<[f32; 3]>,
    pub edges: Vec<[u32; 2]>,
}

impl MeshLines {
    /// Parse a document and check that every edge references a vertex
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let lines: MeshLines = serde_json::from_slice(bytes)?;
        lines.validate()?;
        Ok(lines)
    }

    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        if let Some(edge) = self
            .edges
            .iter()
            .find(|edge| edge.iter().any(|&i| i as usize >= count))
        {
            return Err(IoError::Invalid(format!(
                "mesh line edge {:?} out of range for {} vertices",
                edge, count
            )));
        }
        Ok(())
    }

    /// Packed xyz positions
    pub fn positions(&self) -> Vec<f32> {
        self.vertices.iter().flatten().copied().collect()
    }

    /// Flattened index buffer, two entries per edge
    pub fn indices(&self) -> Vec<u32> {
        self.edges.iter().flatten().copied().collect()
    }

    pub fn segment_count(&self) -> usize {
        self.edges.len()
    }

    pub fn bounding_box(&self) -> Aabb {
        let points: Vec<Point3f> = self
            .vertices
            .iter()
            .map(|v| Point3f::new(v[0], v[1], v[2]))
            .collect();
        Aabb::from_points(points.iter())
    }
}
