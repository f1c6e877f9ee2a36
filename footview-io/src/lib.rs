//! Asset decoding for footview
//!
//! This crate reads the files a foot scan consists of: the per-foot BMF
//! meshes, the optional `mesh_lines_*.json` contour files and the optional
//! `scene.json` placement file.

pub mod bmf;
pub mod error;
pub mod mesh_lines;
pub mod scene_file;
pub mod source;

#[cfg(test)]
mod tests;

pub use bmf::{BmfDecoder, BmfDocument, BmfGroup, BmfReader, BmfWriter};
pub use error::*;
pub use mesh_lines::MeshLines;
pub use scene_file::SceneFile;
pub use source::{AssetSource, FileSystemSource, MemorySource, ScanAssets};

use footview_core::MeshGroup;
use std::path::Path;

/// Trait for reading mesh groups from files
pub trait MeshGroupReader {
    fn read_mesh_groups<P: AsRef<Path>>(path: P) -> Result<Vec<MeshGroup>>;
}

/// Auto-detect format and read mesh groups
pub fn read_mesh_groups<P: AsRef<Path>>(path: P) -> Result<Vec<MeshGroup>> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("bmf") => BmfReader::read_mesh_groups(path),
        _ => Err(IoError::Invalid(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}
