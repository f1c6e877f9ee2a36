//! Where scan assets come from

use crate::bmf::BmfDecoder;
use crate::error::{IoError, Result};
use crate::mesh_lines::MeshLines;
use crate::scene_file::SceneFile;
use footview_core::{FootSide, MeshGroup};
use std::collections::HashMap;
use std::path::PathBuf;

/// Fetches named assets of one scan.
///
/// `Ok(None)` means the asset does not exist; errors are reserved for
/// failures while reading one that does.
pub trait AssetSource {
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

/// Assets stored as files in one directory
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FileSystemSource {
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }
}

/// Assets held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(name.into(), bytes);
    }

    pub fn with(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.assets.get(name).cloned())
    }
}

/// File names used by a reconstructed scan
pub struct ScanAssets;

impl ScanAssets {
    pub const SCENE: &'static str = "scene.json";
    pub const GROUND: &'static str = "ground.png";

    pub fn mesh(side: FootSide) -> String {
        format!("{}.bmf", side.as_str())
    }

    pub fn mesh_lines(side: FootSide) -> String {
        format!("mesh_lines_{}.json", side.as_str())
    }

    /// Fetch and decode the mesh of one foot; a missing mesh is an error
    pub fn load_mesh(source: &dyn AssetSource, side: FootSide) -> Result<Vec<MeshGroup>> {
        let name = Self::mesh(side);
        let bytes = source
            .fetch(&name)?
            .ok_or(IoError::FileNotFound { path: name })?;
        Ok(BmfDecoder::decode(&bytes)?)
    }

    /// Fetch the contour lines of one foot, if the scan has them
    pub fn load_mesh_lines(source: &dyn AssetSource, side: FootSide) -> Result<Option<MeshLines>> {
        let name = Self::mesh_lines(side);
        match source.fetch(&name)? {
            Some(bytes) => Ok(Some(MeshLines::from_json(&bytes)?)),
            None => {
                log::debug!("No {} for this scan", name);
                Ok(None)
            }
        }
    }

    /// Fetch the scene placement, if the scan has one
    pub fn load_scene_file(source: &dyn AssetSource) -> Result<Option<SceneFile>> {
        match source.fetch(Self::SCENE)? {
            Some(bytes) => Ok(Some(SceneFile::from_json(&bytes)?)),
            None => {
                log::debug!("No {} for this scan", Self::SCENE);
                Ok(None)
            }
        }
    }

    /// Fetch the raw ground texture, if the scan has one
    pub fn load_ground(source: &dyn AssetSource) -> Result<Option<Vec<u8>>> {
        source.fetch(Self::GROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_names() {
        assert_eq!(ScanAssets::mesh(FootSide::Left), "left.bmf");
        assert_eq!(ScanAssets::mesh_lines(FootSide::Right), "mesh_lines_right.json");
    }

    #[test]
    fn test_missing_optional_assets() {
        let source = MemorySource::new();
        assert!(ScanAssets::load_scene_file(&source).unwrap().is_none());
        assert!(ScanAssets::load_mesh_lines(&source, FootSide::Left).unwrap().is_none());
        assert!(ScanAssets::load_ground(&source).unwrap().is_none());
        assert!(matches!(
            ScanAssets::load_mesh(&source, FootSide::Left),
            Err(IoError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_file_system_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scene.json"), b"{}").unwrap();

        let source = FileSystemSource::new(dir.path());
        assert_eq!(source.fetch("scene.json").unwrap(), Some(b"{}".to_vec()));
        assert_eq!(source.fetch("left.bmf").unwrap(), None);
        assert!(matches!(
            ScanAssets::load_scene_file(&source),
            Err(IoError::Json(_))
        ));
    }
}
