//! A backend without a GPU
//!
//! Keeps a ledger of every live handle and what each frame would have
//! drawn. Used by tests, by the command line tools and anywhere a view has
//! to run without a window.

use crate::backend::{
    FrameInput, GeometryData, GeometryHandle, MaterialHandle, RenderBackend, RenderTargetHandle,
};
use crate::materials::{Material, MaterialKind};
use nalgebra::Matrix4;
use std::collections::BTreeMap;

/// Live resource counts of a [`HeadlessBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    pub geometries: usize,
    pub materials: usize,
    pub render_targets: usize,
}

impl ResourceCounts {
    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.render_targets
    }
}

/// What the last frame contained
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameRecord {
    pub draw_count: usize,
    pub vertex_count: usize,
    /// Material kinds in draw order
    pub kinds: Vec<MaterialKind>,
    pub view_projection: Matrix4<f32>,
    pub offscreen: bool,
}

/// In-memory [`RenderBackend`]
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    geometries: BTreeMap<GeometryHandle, usize>,
    materials: BTreeMap<MaterialHandle, MaterialKind>,
    render_targets: BTreeMap<RenderTargetHandle, (u32, u32)>,
    size: (u32, u32),
    pixel_ratio: f32,
    frames_rendered: usize,
    offscreen_frames: usize,
    copies: usize,
    last_frame: Option<FrameRecord>,
    disposed: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            pixel_ratio: 1.0,
            ..Self::default()
        }
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn counts(&self) -> ResourceCounts {
        ResourceCounts {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
            render_targets: self.render_targets.len(),
        }
    }

    /// Surface size in CSS pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn render_target_size(&self, handle: RenderTargetHandle) -> Option<(u32, u32)> {
        self.render_targets.get(&handle).copied()
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    pub fn offscreen_frames(&self) -> usize {
        self.offscreen_frames
    }

    pub fn copies(&self) -> usize {
        self.copies
    }

    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.last_frame.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_geometry(&mut self, data: &GeometryData) -> GeometryHandle {
        let handle = GeometryHandle(self.next());
        self.geometries.insert(handle, data.vertex_count());
        handle
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        if self.geometries.remove(&handle).is_none() {
            log::warn!("released unknown geometry {:?}", handle);
        }
    }

    fn create_material(&mut self, material: &Material) -> MaterialHandle {
        let handle = MaterialHandle(self.next());
        self.materials.insert(handle, material.kind);
        handle
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        if self.materials.remove(&handle).is_none() {
            log::warn!("released unknown material {:?}", handle);
        }
    }

    fn create_render_target(&mut self, width: u32, height: u32) -> RenderTargetHandle {
        let handle = RenderTargetHandle(self.next());
        self.render_targets.insert(handle, (width, height));
        handle
    }

    fn release_render_target(&mut self, handle: RenderTargetHandle) {
        if self.render_targets.remove(&handle).is_none() {
            log::warn!("released unknown render target {:?}", handle);
        }
    }

    fn set_size(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.size = (width, height);
        self.pixel_ratio = pixel_ratio;
    }

    fn render(&mut self, frame: &FrameInput<'_>, target: Option<RenderTargetHandle>) {
        if self.disposed {
            log::warn!("render after dispose");
            return;
        }
        if let Some(target) = target {
            if !self.render_targets.contains_key(&target) {
                log::warn!("render into unknown target {:?}", target);
                return;
            }
        }

        let items = frame.scene.draw_list();
        let vertex_count = items
            .iter()
            .map(|item| self.geometries.get(&item.drawable.geometry).copied().unwrap_or(0))
            .sum();
        self.last_frame = Some(FrameRecord {
            draw_count: items.len(),
            vertex_count,
            kinds: items.iter().map(|item| item.material.kind).collect(),
            view_projection: frame.camera.projection_matrix() * frame.camera.view_matrix(),
            offscreen: target.is_some(),
        });
        self.frames_rendered += 1;
        if target.is_some() {
            self.offscreen_frames += 1;
        }
    }

    fn copy_to_screen(&mut self, source: RenderTargetHandle) {
        if self.render_targets.contains_key(&source) {
            self.copies += 1;
        } else {
            log::warn!("copy from unknown target {:?}", source);
        }
    }

    fn dispose(&mut self) {
        if !self.geometries.is_empty() || !self.materials.is_empty() {
            log::warn!("backend disposed with live resources: {:?}", self.counts());
        }
        self.disposed = true;
    }
}
