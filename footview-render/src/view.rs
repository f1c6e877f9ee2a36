//! The foot viewer engine
//!
//! [`FootView`] owns the scene graph, the orbit controller and the render
//! backend. The host feeds it input events, asset loads and frame callbacks;
//! everything runs on one thread and one frame at a time.
//!
//! Scene layout:
//!
//! ```text
//! scene
//! └── root                  (offset from the world origin)
//!     ├── left / right      (foot roots, placed by scene.json)
//!     │   ├── foot          (one per mesh group)
//!     │   ├── meshlines
//!     │   ├── descriptions  (rulers and girth outlines)
//!     │   ├── notes         (measurement info points)
//!     │   └── fit_zones     (fit-zone markers)
//!     └── base_plate
//!         └── ground
//! ```

use crate::backend::{FrameInput, GeometryData, MaterialHandle, RenderBackend, RenderTargetHandle};
use crate::config::{ColorMode, ViewConfig};
use crate::container::{SurfaceSize, ViewContainer};
use crate::error::{RenderError, Result};
use crate::frames::{CancelToken, FrameScheduler};
use crate::materials::{uniforms, Material, DASHED_LINE_WIDTH, SOLID_LINE_WIDTH};
use crate::resize::{render_target_size, supersampling_factor, Debouncer};
use crate::scene::{NodeId, NodeTag, SceneGraph};
use crate::variant::ViewVariant;
use footview_camera::{
    CameraView, ControlEvent, InputEvent, InputSurface, ListenerHandle, OrbitController,
    ProjectionCamera,
};
use footview_core::{
    Aabb, Clock, FitZoneClassifications, FootPair, FootSide, MeasurementDescriptions,
    MeasurementType, MeshGroup, Point2f, Point3f, Ray, Transform3D,
};
use footview_io::{AssetSource, MeshLines, ScanAssets, SceneFile};
use footview_overlays::{
    compute_anchors, info_point_color, measurement_highlight, measurement_info_points,
    project_info_points, FitZoneAnnotator, FitZoneCanvasPositions, InfoPoint,
    InfoPointCanvasPositions, MeasurementGeometry, MeasurementGeometryBuilder, Viewport,
    FIT_ZONE_MARKER_SIZE, INFO_POINT_SIZE,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Duration factor of the first camera move after the feet load
const FEET_LOADED_DURATION_FACTOR: f32 = 2.5;

/// What a view needs from its host
pub struct ViewHost {
    pub container: Box<dyn ViewContainer>,
    /// Element pointer and touch input arrives on
    pub surface: Box<dyn InputSurface>,
    pub clock: Rc<dyn Clock>,
}

/// Cleared when the view is disposed.
///
/// Asynchronous loaders hold a clone and check it before handing results
/// back to the view.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    fn revoke(&self) {
        self.0.set(false);
    }
}

#[derive(Debug, Clone, Copy)]
struct ViewRoots {
    base_plate: NodeId,
    feet: FootPair<NodeId>,
    descriptions: FootPair<NodeId>,
    notes: FootPair<NodeId>,
    fit_zones: FootPair<NodeId>,
}

/// Materials shared by many nodes, alive until dispose
#[derive(Debug, Clone, Copy)]
struct SharedMaterials {
    detailed: FootPair<MaterialHandle>,
    mesh_lines: MaterialHandle,
    ground: MaterialHandle,
    solid_line: MaterialHandle,
    dashed_line: MaterialHandle,
}

/// Read by camera listeners to turn world points into canvas pixels
#[derive(Debug, Clone)]
struct CanvasContext {
    viewport: Viewport,
    world_from_foot: FootPair<Transform3D>,
}

/// Interactive view of a pair of scanned feet
pub struct FootView<B: RenderBackend, F: FrameScheduler> {
    config: ViewConfig,
    variant: ViewVariant,
    backend: B,
    frames: F,
    container: Box<dyn ViewContainer>,
    clock: Rc<dyn Clock>,
    controls: OrbitController,
    scene: SceneGraph,
    roots: ViewRoots,
    materials: SharedMaterials,
    builder: MeasurementGeometryBuilder,
    annotator: FitZoneAnnotator,
    info_points: FootPair<Vec<InfoPoint>>,
    canvas: Rc<RefCell<CanvasContext>>,
    color_mode: ColorMode,
    cached_size: Option<SurfaceSize>,
    resize: Debouncer,
    render_target: Option<(RenderTargetHandle, (u32, u32))>,
    feet_loaded_at: Option<f64>,
    fit_zones_started_at: Option<f64>,
    pending_frame: Option<CancelToken>,
    gesture_ended: Rc<Cell<bool>>,
    notes_listener: Option<ListenerHandle>,
    fit_zones_listener: Option<ListenerHandle>,
    liveness: Liveness,
}

impl<B: RenderBackend, F: FrameScheduler> FootView<B, F> {
    /// Build the scene skeleton, size the renderer and request the first
    /// frame. The camera starts at the pre-initial pose.
    pub fn new(config: ViewConfig, variant: ViewVariant, mut backend: B, frames: F, host: ViewHost) -> Self {
        let size = host.container.size();
        let mut camera = ProjectionCamera::new(config.fov, size.aspect(), config.near, config.far);
        camera.set_orientation(&CameraView::PreInitial.orientation());
        let mut controls = OrbitController::with_settings(
            camera,
            host.surface,
            host.clock.clone(),
            config.orbit.clone(),
        );

        let gesture_ended = Rc::new(Cell::new(false));
        {
            let flag = gesture_ended.clone();
            controls.subscribe(ControlEvent::End, move |_| flag.set(true));
        }

        let mut scene = SceneGraph::new();
        let root = scene.add_group(scene.root(), "root");
        if let Some(node) = scene.node_mut(root) {
            node.transform = Transform3D::translation(config.root_offset);
        }
        let feet = FootPair::from_fn(|side| {
            let foot = scene.add_group(root, side.as_str());
            if let Some(node) = scene.node_mut(foot) {
                node.transform = Transform3D::translation(*config.foot_positions.get(side));
                node.tag = NodeTag::Foot(side);
            }
            foot
        });
        let descriptions = feet.map(|_, foot| scene.add_group(*foot, "descriptions"));
        let notes = feet.map(|_, foot| scene.add_group(*foot, "notes"));
        let fit_zones = feet.map(|_, foot| scene.add_group(*foot, "fit_zones"));
        let base_plate = scene.add_group(root, "base_plate");

        let materials = SharedMaterials {
            detailed: FootPair::from_fn(|_| {
                scene.register_material(&mut backend, Material::detailed_foot(), true)
            }),
            mesh_lines: scene.register_material(&mut backend, Material::mesh_lines(), true),
            ground: scene.register_material(&mut backend, Material::ground(), true),
            solid_line: scene.register_material(&mut backend, Material::solid_line(), true),
            dashed_line: scene.register_material(&mut backend, Material::dashed_line(), true),
        };

        let canvas = Rc::new(RefCell::new(CanvasContext {
            viewport: Viewport::new(size.width as f32, size.height as f32),
            world_from_foot: feet.map(|_, foot| scene.world_transform(*foot)),
        }));

        let mut view = Self {
            resize: Debouncer::new(config.resize_debounce_ms, config.resize_max_wait_ms),
            color_mode: config.color_mode,
            config,
            variant,
            backend,
            frames,
            container: host.container,
            clock: host.clock,
            controls,
            scene,
            roots: ViewRoots {
                base_plate,
                feet,
                descriptions,
                notes,
                fit_zones,
            },
            materials,
            builder: MeasurementGeometryBuilder::new(),
            annotator: FitZoneAnnotator::new(),
            info_points: FootPair::default(),
            canvas,
            cached_size: None,
            render_target: None,
            feet_loaded_at: None,
            fit_zones_started_at: None,
            pending_frame: None,
            gesture_ended,
            notes_listener: None,
            fit_zones_listener: None,
            liveness: Liveness::new(),
        };

        view.update_renderer_size();
        view.update_materials();
        view.warp_to(CameraView::PreInitial);
        view.pending_frame = Some(view.frames.schedule_next_frame());
        log::debug!("Created {} foot view", view.variant.name);
        view
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn variant(&self) -> &ViewVariant {
        &self.variant
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    /// The host drives frames through this, e.g. to run a pending request
    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn controls(&self) -> &OrbitController {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitController {
        &mut self.controls
    }

    pub fn camera(&self) -> &ProjectionCamera {
        self.controls.camera()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn annotator(&self) -> &FitZoneAnnotator {
        &self.annotator
    }

    pub fn foot_root(&self, side: FootSide) -> NodeId {
        *self.roots.feet.get(side)
    }

    pub fn detailed_material(&self, side: FootSide) -> MaterialHandle {
        *self.materials.detailed.get(side)
    }

    pub fn mesh_lines_material(&self) -> MaterialHandle {
        self.materials.mesh_lines
    }

    pub fn ground_material(&self) -> MaterialHandle {
        self.materials.ground
    }

    pub fn solid_line_material(&self) -> MaterialHandle {
        self.materials.solid_line
    }

    pub fn dashed_line_material(&self) -> MaterialHandle {
        self.materials.dashed_line
    }

    pub fn render_target(&self) -> Option<RenderTargetHandle> {
        self.render_target.map(|(handle, _)| handle)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// A handle loaders can keep to find out whether the view still exists
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn is_disposed(&self) -> bool {
        !self.liveness.is_alive()
    }

    fn accepting(&self, what: &str) -> bool {
        if self.liveness.is_alive() {
            return true;
        }
        log::debug!("Ignoring {what} after dispose");
        false
    }

    fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    fn seconds_since(start: Option<f64>, now_ms: f64) -> f32 {
        start.map(|start| ((now_ms - start) / 1000.0) as f32).unwrap_or(0.0)
    }

    fn pixel_ratio(&self) -> f32 {
        self.cached_size.map(|size| size.pixel_ratio).unwrap_or(1.0)
    }

    /// Current supersampling factor, 1 when supersampling is off
    pub fn supersampling(&self) -> f32 {
        if self.config.supersampling {
            supersampling_factor(self.pixel_ratio())
        } else {
            1.0
        }
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        self.update_materials();
    }

    // ---- sizing --------------------------------------------------------

    /// Whether the container no longer matches the size last applied
    pub fn has_renderer_size_changed(&self) -> bool {
        self.cached_size != Some(self.container.size())
    }

    /// Apply the container size to the camera, the backend and the
    /// offscreen target. A zero-sized container is skipped.
    pub fn update_renderer_size(&mut self) -> bool {
        let size = self.container.size();
        if size.is_empty() {
            log::warn!("Skipping renderer resize to {}x{}", size.width, size.height);
            return false;
        }

        self.cached_size = Some(size);
        self.resize.cancel();
        self.controls.camera_mut().set_aspect(size.aspect());
        self.backend.set_size(size.width, size.height, size.pixel_ratio);
        self.canvas.borrow_mut().viewport = Viewport::new(size.width as f32, size.height as f32);

        let factor = self.supersampling();
        if factor > 1.0 {
            let wanted = render_target_size(size.width, size.height, size.pixel_ratio, factor);
            if self.render_target.map(|(_, current)| current) != Some(wanted) {
                if let Some((old, _)) = self.render_target.take() {
                    self.backend.release_render_target(old);
                }
                let handle = self.backend.create_render_target(wanted.0, wanted.1);
                self.render_target = Some((handle, wanted));
            }
        } else if let Some((old, _)) = self.render_target.take() {
            self.backend.release_render_target(old);
        }

        log::info!(
            "Renderer sized to {}x{} at pixel ratio {}, supersampling {:.3}",
            size.width,
            size.height,
            size.pixel_ratio,
            factor
        );
        true
    }

    /// Push colors and line widths that depend on the color mode and the
    /// output resolution into the shared materials
    pub fn update_materials(&mut self) {
        let palette = &self.config.palette;
        let arch = self.color_mode == ColorMode::ArchType;
        let supersampling = self.supersampling();
        let line_scale = self.pixel_ratio() * supersampling;

        let base_ground = if arch { palette.arch_type } else { palette.ground_pattern };
        let mut accent = base_ground;
        accent.w = 1.0;
        let ground = if self.color_mode == ColorMode::FitZones {
            palette.fit_zones_ground
        } else {
            base_ground
        };
        let mut lines = if arch { palette.arch_type } else { palette.mesh_lines };
        lines.w = palette.mesh_lines.w * supersampling;
        let measurement_line = palette.measurement_line;

        if let Some(material) = self.scene.material_mut(self.materials.ground) {
            material.set_vec4(uniforms::PATTERN_COLOR, ground);
        }
        if let Some(material) = self.scene.material_mut(self.materials.mesh_lines) {
            material.set_vec4(uniforms::COLOR, lines);
            material.set_vec4(uniforms::ACCENT_COLOR, accent);
        }
        for side in FootSide::ALL {
            if let Some(material) = self.scene.material_mut(*self.materials.detailed.get(side)) {
                material.set_vec4(uniforms::ACCENT_COLOR, accent);
                material.set_vec4(uniforms::MEASUREMENT_LINE_COLOR, measurement_line);
            }
        }
        if let Some(material) = self.scene.material_mut(self.materials.solid_line) {
            material.line_width = SOLID_LINE_WIDTH * line_scale;
        }
        if let Some(material) = self.scene.material_mut(self.materials.dashed_line) {
            material.line_width = DASHED_LINE_WIDTH * line_scale;
        }
    }

    // ---- frames --------------------------------------------------------

    /// Draw one frame and request the next.
    ///
    /// Safe to call with partially loaded feet; a disposed view does
    /// nothing.
    pub fn paint(&mut self) {
        if !self.liveness.is_alive() {
            return;
        }
        self.pending_frame = None;
        let now = self.now_ms();

        if self.has_renderer_size_changed() {
            self.resize.call(now);
        }
        if self.resize.poll(now) && self.update_renderer_size() {
            self.update_materials();
        }

        self.controls.update();
        self.apply_time_uniforms(now);

        let camera = self.controls.camera();
        let (eye, up) = (camera.position, camera.up);
        for side in FootSide::ALL {
            self.scene.billboard_children(*self.roots.fit_zones.get(side), &eye, &up);
            self.scene.billboard_children(*self.roots.notes.get(side), &eye, &up);
        }

        let frame = FrameInput {
            scene: &self.scene,
            camera: self.controls.camera(),
        };
        match self.render_target {
            Some((target, _)) => {
                self.backend.render(&frame, Some(target));
                self.backend.copy_to_screen(target);
            }
            None => self.backend.render(&frame, None),
        }

        self.pending_frame = Some(self.frames.schedule_next_frame());
    }

    fn apply_time_uniforms(&mut self, now: f64) {
        let seconds = Self::seconds_since(self.feet_loaded_at, now);
        let fit_zone_seconds = Self::seconds_since(self.fit_zones_started_at, now);
        let visible = self
            .roots
            .feet
            .map(|_, foot| self.scene.node(*foot).is_some_and(|node| node.visible));
        let params = self.variant.timing.parameters(seconds, &visible);

        for side in FootSide::ALL {
            if let Some(material) = self.scene.material_mut(*self.materials.detailed.get(side)) {
                material.set_float(uniforms::ERROR_VIS, 0.0);
                material.set_float(uniforms::CUTOFF_HEIGHT, params.foot_cutoff_height);
                material.set_float(uniforms::TIME_FIT_ZONES, fit_zone_seconds);
            }
        }
        if let Some(material) = self.scene.material_mut(self.materials.mesh_lines) {
            material.set_float(uniforms::CUTOFF_HEIGHT, params.line_cutoff_height);
            material.set_float(uniforms::TIME, params.line_time);
        }
        if let Some(material) = self.scene.material_mut(self.materials.ground) {
            material.set_float(uniforms::LEFT, params.shadow.left);
            material.set_float(uniforms::RIGHT, params.shadow.right);
        }
    }

    // ---- camera --------------------------------------------------------

    /// Average position of the visible feet across the x axis
    pub fn visible_center(&self) -> Point3f {
        let xs: Vec<f32> = FootSide::ALL
            .iter()
            .filter_map(|side| self.scene.node(*self.roots.feet.get(*side)))
            .filter(|node| node.visible)
            .map(|node| node.transform.translation_part().x)
            .collect();
        if xs.is_empty() {
            return Point3f::origin();
        }
        Point3f::new(xs.iter().sum::<f32>() / xs.len() as f32, 0.0, 0.0)
    }

    fn orbit_target(&self) -> Point3f {
        (self.variant.orbit_target)(self.visible_center())
    }

    /// Jump to a preset pose around the visible feet
    pub fn warp_to(&mut self, view: CameraView) {
        let orientation = view.orientation();
        let target = self.orbit_target();
        self.controls
            .jump_to_pose(&orientation.relative_position(), &target, orientation.zoom);
    }

    /// Animate to a preset pose around the visible feet
    pub fn animate_to(&mut self, view: CameraView, duration_factor: Option<f32>) {
        let orientation = view.orientation();
        let target = self.orbit_target();
        self.controls.animate_to_pose(
            &orientation.relative_position(),
            &target,
            orientation.zoom,
            duration_factor,
        );
    }

    /// [`animate_to`](Self::animate_to) by preset name, e.g. `"top_view"`
    pub fn animate_to_named(&mut self, name: &str) -> Result<()> {
        let view = CameraView::from_name(name).ok_or_else(|| RenderError::UnknownView(name.to_string()))?;
        self.animate_to(view, None);
        Ok(())
    }

    /// Re-center the orbit on the visible feet
    pub fn update_animation_target(&mut self) {
        let target = self.orbit_target();
        self.controls.update_target(&target);
    }

    /// Feed pointer or touch input to the orbit controller.
    ///
    /// The orbit re-centers on the visible feet whenever a gesture ends.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.liveness.is_alive() {
            return false;
        }
        let handled = self.controls.handle_input(event);
        if self.gesture_ended.replace(false) {
            self.update_animation_target();
        }
        handled
    }

    /// Picking ray through a point in normalized device coordinates
    pub fn pick_ray(&self, ndc: &Point2f) -> Ray {
        self.controls.camera().get_ray(ndc)
    }

    pub fn set_foot_visible(&mut self, side: FootSide, visible: bool) {
        if let Some(node) = self.scene.node_mut(*self.roots.feet.get(side)) {
            node.visible = visible;
        }
        self.update_animation_target();
    }

    // ---- loading -------------------------------------------------------

    fn remove_named_children(&mut self, parent: NodeId, name: &str) {
        while let Some(child) = self.scene.find_child(parent, name) {
            self.scene.remove_subtree(&mut self.backend, child);
        }
    }

    fn refresh_canvas_context(&mut self) {
        let world_from_foot = self.roots.feet.map(|_, foot| self.scene.world_transform(*foot));
        self.canvas.borrow_mut().world_from_foot = world_from_foot;
    }

    /// Attach the decoded mesh groups of one foot, replacing an earlier mesh
    pub fn load_foot_mesh(&mut self, side: FootSide, groups: Vec<MeshGroup>) {
        if !self.accepting("foot mesh") {
            return;
        }
        let foot = *self.roots.feet.get(side);
        self.remove_named_children(foot, "foot");

        let style = self.config.style;
        let group_count = groups.len();
        let mut bounds = Aabb::empty();
        for mut group in groups {
            group.compute_normals_if_missing();
            bounds.union(&group.bounding_box());
            let data = GeometryData::from_mesh_group(&group);
            let mesh = if style.wireframe {
                let mesh = self.scene.add_drawable(&mut self.backend, foot, "foot", &data, Material::matte(&style));
                self.scene.add_drawable(
                    &mut self.backend,
                    mesh,
                    "wireframe",
                    &GeometryData::wireframe(&group),
                    Material::wireframe(self.config.palette.wireframe),
                );
                mesh
            } else {
                let material = *self.materials.detailed.get(side);
                self.scene.add_drawable_shared(&mut self.backend, foot, "foot", &data, material)
            };
            if let Some(node) = self.scene.node_mut(mesh) {
                node.tag = NodeTag::Foot(side);
            }
        }

        // without a scene file, center each foot along its length
        if !style.is_detailed && !bounds.is_empty() {
            if let Some(node) = self.scene.node_mut(foot) {
                let mut offset = node.transform.translation_part();
                offset.y = -0.5 * (bounds.min.y + bounds.max.y);
                node.transform.set_translation(&offset);
            }
        }

        self.refresh_canvas_context();
        self.update_renderer_size();
        log::debug!("Loaded {side} foot with {group_count} mesh groups");
    }

    /// Attach the contour lines of one foot; `None` leaves the foot without
    pub fn load_mesh_lines(&mut self, side: FootSide, lines: Option<MeshLines>) {
        if !self.accepting("mesh lines") {
            return;
        }
        let Some(lines) = lines else {
            log::info!("No mesh lines for the {side} foot");
            return;
        };
        let foot = *self.roots.feet.get(side);
        self.remove_named_children(foot, "meshlines");
        self.scene.add_drawable_shared(
            &mut self.backend,
            foot,
            "meshlines",
            &GeometryData::from_mesh_lines(&lines),
            self.materials.mesh_lines,
        );
    }

    /// Place the feet and the ground plate; `None` keeps the default layout
    pub fn load_scene_file(&mut self, scene_file: Option<SceneFile>) {
        if !self.accepting("scene file") {
            return;
        }
        let Some(scene_file) = scene_file else {
            log::info!("No scene file, keeping the default foot placement");
            return;
        };
        let scene_file = (self.variant.interpret_scene)(&scene_file);
        for side in FootSide::ALL {
            if let Some(node) = self.scene.node_mut(*self.roots.feet.get(side)) {
                node.transform = *scene_file.world_from_foot.get(side);
            }
        }
        if let Some(node) = self.scene.node_mut(self.roots.base_plate) {
            node.transform = scene_file.world_from_ground;
        }
        self.refresh_canvas_context();
    }

    /// Attach the ground plate with an encoded texture image
    pub fn load_ground(&mut self, texture: Option<Vec<u8>>) {
        if !self.accepting("ground texture") {
            return;
        }
        let Some(texture) = texture else {
            log::warn!("No ground texture, drawing without a ground plate");
            return;
        };
        if let Some(material) = self.scene.material_mut(self.materials.ground) {
            material.texture = Some(Rc::from(texture));
        }
        self.remove_named_children(self.roots.base_plate, "ground");
        let ground = self.scene.add_drawable_shared(
            &mut self.backend,
            self.roots.base_plate,
            "ground",
            &GeometryData::quad(1.0),
            self.materials.ground,
        );
        if let Some(node) = self.scene.node_mut(ground) {
            node.render_order = -10;
        }
    }

    /// Fetch and attach everything the configured style needs, then start
    /// the reveal.
    ///
    /// Mesh decode failures are returned before anything is attached. The
    /// scene file, contour lines and ground texture are optional: a missing
    /// or broken one is logged and skipped.
    pub fn load_from_source(&mut self, source: &dyn AssetSource) -> Result<()> {
        let left = ScanAssets::load_mesh(source, FootSide::Left)?;
        let right = ScanAssets::load_mesh(source, FootSide::Right)?;
        self.load_foot_mesh(FootSide::Left, left);
        self.load_foot_mesh(FootSide::Right, right);

        if self.config.style.is_detailed {
            let scene_file = ScanAssets::load_scene_file(source).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable {}: {err}", ScanAssets::SCENE);
                None
            });
            self.load_scene_file(scene_file);
            match ScanAssets::load_ground(source) {
                Ok(texture) => self.load_ground(texture),
                Err(err) => log::warn!("Ground texture failed to load: {err}"),
            }
            for side in FootSide::ALL {
                let lines = ScanAssets::load_mesh_lines(source, side).unwrap_or_else(|err| {
                    log::warn!("Ignoring unreadable {}: {err}", ScanAssets::mesh_lines(side));
                    None
                });
                self.load_mesh_lines(side, lines);
            }
        }
        self.on_feet_loaded();
        Ok(())
    }

    /// Start the reveal clock and move to the variant's initial pose
    pub fn on_feet_loaded(&mut self) {
        if !self.accepting("feet loaded notification") {
            return;
        }
        self.feet_loaded_at = Some(self.now_ms());
        self.animate_to(self.variant.initial_view, Some(FEET_LOADED_DURATION_FACTOR));
    }

    // ---- measurements --------------------------------------------------

    /// Draw the ruler or girth outline of one measurement on one foot.
    ///
    /// Measurements without a visualization are logged and skipped.
    pub fn show_description(&mut self, side: FootSide, measurement_id: &str, descriptions: &MeasurementDescriptions) {
        if !self.accepting("measurement") {
            return;
        }
        let bounds = self.scene.bounds_of_named(*self.roots.feet.get(side), "foot");
        let Some(geometry) = self.builder.build_for(side, measurement_id, descriptions, &bounds) else {
            return;
        };
        let root = *self.roots.descriptions.get(side);
        let detailed = *self.materials.detailed.get(side);

        match geometry {
            MeasurementGeometry::Ruler(ruler) => {
                let group = self.scene.add_group(root, "ruler");
                self.scene.add_drawable_shared(
                    &mut self.backend,
                    group,
                    "arrow",
                    &GeometryData::from_line_segments(&ruler.arrow),
                    self.materials.solid_line,
                );
                self.scene.add_drawable_shared(
                    &mut self.backend,
                    group,
                    "stoplines",
                    &GeometryData::from_line_segments(&ruler.stoplines),
                    self.materials.dashed_line,
                );
                if let Some(material) = self.scene.material_mut(detailed) {
                    material.set_stoplines(&ruler.stopline_endpoints());
                }
            }
            MeasurementGeometry::Girth { plane, rectangle } => {
                if let Some(material) = self.scene.material_mut(detailed) {
                    material.set_girth_plane(&plane);
                }
                if let Some(rectangle) = rectangle {
                    self.scene.add_drawable_shared(
                        &mut self.backend,
                        root,
                        "plane",
                        &GeometryData::from_line_segments(&rectangle.outline),
                        self.materials.dashed_line,
                    );
                }
            }
        }
    }

    /// Add info points for the markers of one measurement and highlight the
    /// related fit zone.
    ///
    /// `on_change` receives the canvas positions of the info points now and
    /// after every camera change, once both feet have info points.
    pub fn show_description_notes<C>(
        &mut self,
        side: FootSide,
        measurement_id: &str,
        descriptions: &MeasurementDescriptions,
        mut on_change: C,
    ) where
        C: FnMut(&InfoPointCanvasPositions) + 'static,
    {
        if !self.accepting("measurement notes") {
            return;
        }
        let Some(measurement_type) = MeasurementType::from_id(measurement_id) else {
            log::warn!("No notes for unsupported measurement {measurement_id}");
            return;
        };
        let description = match descriptions.get(side, measurement_id) {
            Ok(description) => description,
            Err(err) => {
                log::warn!("No notes for {side} {measurement_id}: {err}");
                return;
            }
        };

        let points = measurement_info_points(measurement_type, description);
        let notes = *self.roots.notes.get(side);
        for point in &points {
            let node = self.scene.add_drawable(
                &mut self.backend,
                notes,
                &point.marker,
                &GeometryData::quad(INFO_POINT_SIZE),
                Material::info_point(info_point_color()),
            );
            if let Some(node) = self.scene.node_mut(node) {
                node.transform = Transform3D::translation(point.position.coords);
                node.tag = NodeTag::InfoPoint {
                    side,
                    marker: point.marker.clone(),
                    measurement_type,
                };
            }
        }
        self.info_points.get_mut(side).extend(points);

        if measurement_type.fit_zone().is_some() {
            match compute_anchors(descriptions) {
                Ok(anchors) => {
                    if let Some(highlight) = measurement_highlight(measurement_type, &anchors) {
                        for side in FootSide::ALL {
                            let handle = *self.materials.detailed.get(side);
                            if let Some(material) = self.scene.material_mut(handle) {
                                material.set_zone_color(highlight.zone, highlight.color);
                                material.set_zone_marker(highlight.zone, highlight.anchors.get(side));
                            }
                        }
                    }
                }
                Err(err) => log::warn!("No zone highlight for {measurement_id}: {err}"),
            }
        }
        self.fit_zones_started_at = Some(self.now_ms());
        self.update_materials();

        let points = self.info_points.clone();
        {
            let context = self.canvas.borrow();
            if let Some(positions) = project_info_points(
                &points,
                &context.world_from_foot,
                self.controls.camera(),
                &context.viewport,
            ) {
                on_change(&positions);
            }
        }
        let canvas = self.canvas.clone();
        let listener = move |camera: &ProjectionCamera| {
            let context = canvas.borrow();
            if let Some(positions) =
                project_info_points(&points, &context.world_from_foot, camera, &context.viewport)
            {
                on_change(&positions);
            }
        };
        if let Some(previous) = self.notes_listener.take() {
            self.controls.unsubscribe(previous);
        }
        self.notes_listener = Some(self.controls.subscribe(ControlEvent::Change, listener));
    }

    /// Remove every ruler, outline and info point and reset the overlay
    /// uniforms
    pub fn remove_descriptions(&mut self) {
        if !self.accepting("measurement removal") {
            return;
        }
        for side in FootSide::ALL {
            self.scene.clear_children(&mut self.backend, *self.roots.descriptions.get(side));
            self.scene.clear_children(&mut self.backend, *self.roots.notes.get(side));
            if let Some(material) = self.scene.material_mut(*self.materials.detailed.get(side)) {
                material.clear_stoplines();
                material.clear_girth_plane();
                material.clear_fit_zones();
            }
        }
        self.info_points = FootPair::default();
        self.fit_zones_started_at = None;
        self.update_materials();
        if let Some(listener) = self.notes_listener.take() {
            self.controls.unsubscribe(listener);
        }
    }

    // ---- fit zones -----------------------------------------------------

    /// Tint the fit zones and place a marker on every zone anchor.
    ///
    /// Markers are created on the first call and only recolored after
    /// that. `on_change` receives their canvas positions now and after
    /// every camera change until [`remove_fit_zones`](Self::remove_fit_zones).
    pub fn show_fit_zones<C>(
        &mut self,
        classifications: &FitZoneClassifications,
        descriptions: &MeasurementDescriptions,
        mut on_change: C,
    ) -> Result<()>
    where
        C: FnMut(&FitZoneCanvasPositions) + 'static,
    {
        if !self.accepting("fit zones") {
            return Ok(());
        }
        let created = self.annotator.create_or_update(classifications, descriptions)?;
        self.color_mode = ColorMode::FitZones;
        self.fit_zones_started_at = Some(self.now_ms());

        if created {
            self.create_fit_zone_markers();
        } else {
            self.recolor_fit_zone_markers();
        }

        let paint = FitZoneAnnotator::zone_paint(classifications);
        for side in FootSide::ALL {
            let anchors = self.annotator.anchors().map(|anchors| *anchors.get(side));
            if let Some(material) = self.scene.material_mut(*self.materials.detailed.get(side)) {
                material.set_zone_colors(&paint);
                for (zone, position) in anchors.iter().flat_map(|zones| zones.iter()) {
                    material.set_zone_marker(zone, position);
                }
            }
        }
        self.update_materials();

        let annotator = self.annotator.clone();
        {
            let context = self.canvas.borrow();
            if let Some(positions) =
                annotator.project_to_canvas(self.controls.camera(), &context.viewport, &context.world_from_foot)
            {
                on_change(&positions);
            }
        }
        let canvas = self.canvas.clone();
        let listener = move |camera: &ProjectionCamera| {
            let context = canvas.borrow();
            if let Some(positions) =
                annotator.project_to_canvas(camera, &context.viewport, &context.world_from_foot)
            {
                on_change(&positions);
            }
        };
        if let Some(previous) = self.fit_zones_listener.take() {
            self.controls.unsubscribe(previous);
        }
        self.fit_zones_listener = Some(self.controls.subscribe(ControlEvent::Change, listener));
        Ok(())
    }

    fn create_fit_zone_markers(&mut self) {
        for side in FootSide::ALL {
            let root = *self.roots.fit_zones.get(side);
            self.scene.clear_children(&mut self.backend, root);
            let markers = self.annotator.markers(side).to_vec();
            for marker in markers {
                let node = self.scene.add_drawable(
                    &mut self.backend,
                    root,
                    marker.zone.as_str(),
                    &GeometryData::quad(FIT_ZONE_MARKER_SIZE),
                    Material::fit_zone_marker(marker.color),
                );
                if let Some(node) = self.scene.node_mut(node) {
                    node.transform = Transform3D::translation(marker.position.coords);
                    node.tag = NodeTag::FitZone {
                        side,
                        zone: marker.zone,
                        classification: marker.classification,
                    };
                }
            }
        }
    }

    fn recolor_fit_zone_markers(&mut self) {
        for side in FootSide::ALL {
            let children = self.scene.children(*self.roots.fit_zones.get(side)).to_vec();
            for child in children {
                let Some(node) = self.scene.node_mut(child) else { continue };
                let NodeTag::FitZone { zone, classification, .. } = &mut node.tag else {
                    continue;
                };
                let Some(marker) = self.annotator.markers(side).iter().find(|m| m.zone == *zone) else {
                    continue;
                };
                *classification = marker.classification;
                let color = marker.color;
                let Some(material) = node.drawable.map(|drawable| drawable.material) else {
                    continue;
                };
                if let Some(material) = self.scene.material_mut(material) {
                    material.set_vec3(uniforms::INNER_COLOR, color);
                }
            }
        }
    }

    /// Hide fit zones and go back to the default color mode
    pub fn remove_fit_zones(&mut self) {
        if !self.accepting("fit zone removal") {
            return;
        }
        for side in FootSide::ALL {
            if let Some(material) = self.scene.material_mut(*self.materials.detailed.get(side)) {
                material.clear_fit_zones();
            }
            self.scene.clear_children(&mut self.backend, *self.roots.fit_zones.get(side));
        }
        self.annotator.clear();
        if let Some(listener) = self.fit_zones_listener.take() {
            self.controls.unsubscribe(listener);
        }
        self.color_mode = ColorMode::Default;
        self.fit_zones_started_at = None;
        self.update_materials();
    }

    // ---- teardown ------------------------------------------------------

    /// Cancel the pending frame and release every backend resource.
    ///
    /// Idempotent. Loads completing afterwards are ignored.
    pub fn dispose(&mut self) {
        if !self.liveness.is_alive() {
            return;
        }
        self.liveness.revoke();
        if let Some(token) = self.pending_frame.take() {
            self.frames.cancel(token);
        }
        self.controls.dispose();
        self.notes_listener = None;
        self.fit_zones_listener = None;
        self.scene.dispose_all(&mut self.backend);
        if let Some((target, _)) = self.render_target.take() {
            self.backend.release_render_target(target);
        }
        self.backend.dispose();
        log::debug!("Disposed {} foot view", self.variant.name);
    }
}
