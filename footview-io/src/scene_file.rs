//! `scene.json`: placement of both feet and the ground plate

use crate::error::Result;
use footview_core::{FootPair, Transform3D};
use serde::{Deserialize, Serialize};

/// A 4x4 matrix as nested rows
pub type RowMajorMatrix = [[f32; 4]; 4];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RawSceneFile {
    world_from_foot: FootPair<RowMajorMatrix>,
    world_from_ground: RowMajorMatrix,
}

/// World placement of the scanned feet and the ground plate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFile {
    pub world_from_foot: FootPair<Transform3D>,
    pub world_from_ground: Transform3D,
}

fn to_transform(rows: &RowMajorMatrix) -> Transform3D {
    let mut values = [0.0; 16];
    for (row, chunk) in rows.iter().zip(values.chunks_exact_mut(4)) {
        chunk.copy_from_slice(row);
    }
    Transform3D::from_row_major(&values)
}

impl SceneFile {
    /// Parse a `scene.json` document
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let raw: RawSceneFile = serde_json::from_slice(bytes)?;
        Ok(Self {
            world_from_foot: raw.world_from_foot.map(|_, rows| to_transform(rows)),
            world_from_ground: to_transform(&raw.world_from_ground),
        })
    }

    /// Apply `pre` before every placement, e.g. to shift the whole scene
    pub fn premultiplied(&self, pre: &Transform3D) -> Self {
        Self {
            world_from_foot: self.world_from_foot.map(|_, t| *pre * *t),
            world_from_ground: *pre * self.world_from_ground,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use footview_core::{Point3f, Vector3f};

    const SCENE: &str = r#"{
        "world_from_foot": {
            "left":  [[1,0,0,-0.05],[0,1,0,0.1],[0,0,1,0],[0,0,0,1]],
            "right": [[-1,0,0,0.05],[0,-1,0,0.1],[0,0,1,0],[0,0,0,1]]
        },
        "world_from_ground": [[1,0,0,0],[0,1,0,0],[0,0,1,-0.01],[0,0,0,1]]
    }"#;

    #[test]
    fn test_parse_row_major() {
        let scene = SceneFile::from_json(SCENE.as_bytes()).unwrap();
        assert_relative_eq!(
            scene.world_from_foot.left.translation_part(),
            Vector3f::new(-0.05, 0.1, 0.0)
        );
        let p = scene
            .world_from_foot
            .right
            .transform_point(&Point3f::new(0.01, 0.0, 0.0));
        assert_relative_eq!(p, Point3f::new(0.04, 0.1, 0.0));
        assert_relative_eq!(scene.world_from_ground.translation_part().z, -0.01);
    }

    #[test]
    fn test_premultiplied_shift() {
        let scene = SceneFile::from_json(SCENE.as_bytes()).unwrap();
        let shifted = scene.premultiplied(&Transform3D::translation(Vector3f::new(0.2, 0.1, 0.0)));
        assert_relative_eq!(
            shifted.world_from_foot.left.translation_part(),
            Vector3f::new(0.15, 0.2, 0.0)
        );
    }

    #[test]
    fn test_missing_key_is_json_error() {
        let result = SceneFile::from_json(br#"{"world_from_foot": {}}"#);
        assert!(matches!(result, Err(crate::IoError::Json(_))));
    }
}
