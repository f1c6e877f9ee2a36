//! The seam between the engine and a graphics API
//!
//! The engine never talks to a GPU directly. It hands geometry, materials
//! and render targets to a [`RenderBackend`] and keeps the returned handles
//! in its scene graph, so every handle it creates can be released again.

use crate::materials::Material;
use crate::scene::SceneGraph;
use bytemuck::{Pod, Zeroable};
use footview_camera::ProjectionCamera;
use footview_core::{Aabb, MeshGroup, Point3f};
use footview_io::MeshLines;
use footview_overlays::LineSegments;

/// Geometry uploaded to a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u64);

/// Material (shader program plus uniforms) created on a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u64);

/// Offscreen color and depth buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderTargetHandle(pub u64);

/// How vertices are assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primitive {
    #[default]
    Triangles,
    /// Every two vertices (or indices) form an unconnected segment
    LineSegments,
}

/// Vertex layout of dashed lines
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub line_distance: f32,
}

/// CPU-side geometry handed to [`RenderBackend::create_geometry`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryData {
    pub primitive: Primitive,
    /// Flat `xyz` positions
    pub positions: Vec<f32>,
    pub normals: Option<Vec<f32>>,
    pub colors: Option<Vec<f32>>,
    pub uvs: Option<Vec<f32>>,
    pub indices: Option<Vec<u32>>,
    pub line_distances: Option<Vec<f32>>,
}

impl GeometryData {
    /// Non-indexed triangles of a decoded mesh group
    pub fn from_mesh_group(group: &MeshGroup) -> Self {
        Self {
            primitive: Primitive::Triangles,
            positions: group.vertices.clone(),
            normals: group.normals.clone(),
            colors: group.colors.clone(),
            uvs: group.uvs.clone(),
            indices: None,
            line_distances: None,
        }
    }

    /// Overlay lines, with distances for dashing
    pub fn from_line_segments(lines: &LineSegments) -> Self {
        Self {
            primitive: Primitive::LineSegments,
            positions: lines.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
            line_distances: Some(lines.line_distances.clone()),
            ..Self::default()
        }
    }

    /// Indexed contour lines of a foot
    pub fn from_mesh_lines(lines: &MeshLines) -> Self {
        Self {
            primitive: Primitive::LineSegments,
            positions: lines.positions(),
            indices: Some(lines.indices()),
            ..Self::default()
        }
    }

    /// Wireframe edges of a mesh group
    pub fn wireframe(group: &MeshGroup) -> Self {
        let points: Vec<Point3f> = group
            .wireframe_segments()
            .into_iter()
            .flat_map(|[a, b]| [a, b])
            .collect();
        Self::from_line_segments(&LineSegments::from_points(points))
    }

    /// A square of edge `size` in the xy plane facing +Z, centered on the origin
    pub fn quad(size: f32) -> Self {
        let h = 0.5 * size;
        Self {
            primitive: Primitive::Triangles,
            positions: vec![-h, -h, 0.0, h, -h, 0.0, h, h, 0.0, -h, h, 0.0],
            normals: Some([0.0f32, 0.0, 1.0].repeat(4)),
            uvs: Some(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]),
            indices: Some(vec![0, 1, 2, 0, 2, 3]),
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Point3f> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|c| Point3f::new(c[0], c[1], c[2]))
    }

    pub fn bounding_box(&self) -> Aabb {
        let points: Vec<Point3f> = self.points().collect();
        Aabb::from_points(points.iter())
    }

    /// Raw bytes of the position buffer
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Interleaved position and line distance, for dashed-line pipelines
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        let distances = self.line_distances.as_deref().unwrap_or(&[]);
        self.positions
            .chunks_exact(3)
            .enumerate()
            .map(|(i, c)| LineVertex {
                position: [c[0], c[1], c[2]],
                line_distance: distances.get(i).copied().unwrap_or(0.0),
            })
            .collect()
    }
}

/// What a backend needs to draw one frame
pub struct FrameInput<'a> {
    pub scene: &'a SceneGraph,
    pub camera: &'a ProjectionCamera,
}

/// A graphics API the engine renders through.
///
/// Every `create_*` call returns a handle the engine later passes to the
/// matching `release_*` call exactly once.
pub trait RenderBackend {
    fn create_geometry(&mut self, data: &GeometryData) -> GeometryHandle;
    fn release_geometry(&mut self, handle: GeometryHandle);

    fn create_material(&mut self, material: &Material) -> MaterialHandle;
    fn release_material(&mut self, handle: MaterialHandle);

    /// Offscreen target of `width` x `height` device pixels
    fn create_render_target(&mut self, width: u32, height: u32) -> RenderTargetHandle;
    fn release_render_target(&mut self, handle: RenderTargetHandle);

    /// Size of the visible surface in CSS pixels
    fn set_size(&mut self, width: u32, height: u32, pixel_ratio: f32);

    /// Draw the scene into `target`, or straight to the surface when `None`
    fn render(&mut self, frame: &FrameInput<'_>, target: Option<RenderTargetHandle>);

    /// Resolve an offscreen target onto the visible surface
    fn copy_to_screen(&mut self, source: RenderTargetHandle);

    /// Drop the device; no other call follows
    fn dispose(&mut self);
}
