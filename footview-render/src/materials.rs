//! Materials and their shader uniforms
//!
//! Uniform names match the shader programs a backend compiles for each
//! [`MaterialKind`]. The detailed foot material carries the measurement and
//! fit-zone overlays: stop lines, the girth plane and per-zone tints.

use crate::config::Style;
use footview_core::{FitZone, Plane, Point3f, Vector3f, Vector4f, ZoneMap};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Width of solid overlay lines, in device pixels at 1x
pub const SOLID_LINE_WIDTH: f32 = 1.5;

/// Width of dashed overlay lines, in device pixels at 1x
pub const DASHED_LINE_WIDTH: f32 = 1.0;

/// Dash and gap length of dashed overlay lines, in metres
pub const DASH_SIZE: f32 = 0.003;
pub const GAP_SIZE: f32 = 0.002;

/// Names of shader uniforms
pub mod uniforms {
    pub const ACCENT_COLOR: &str = "u_accent_color";
    pub const COLOR: &str = "u_color";
    pub const CUTOFF_HEIGHT: &str = "u_cutoff_height";
    pub const ERROR_VIS: &str = "u_error_vis";
    pub const GIRTH_PLANE: &str = "u_girth_plane";
    pub const MEASUREMENT_LINE_COLOR: &str = "u_measurement_line_color";
    pub const MEASUREMENT_LINE_WIDTH: &str = "u_measurement_line_width";
    pub const STOPLINE1_P1: &str = "u_stopline1_p1";
    pub const STOPLINE1_P2: &str = "u_stopline1_p2";
    pub const STOPLINE2_P1: &str = "u_stopline2_p1";
    pub const STOPLINE2_P2: &str = "u_stopline2_p2";
    pub const TIME: &str = "u_time";
    pub const TIME_FIT_ZONES: &str = "u_time_fit_zones";
    pub const PATTERN_COLOR: &str = "u_pattern_color";
    pub const LEFT: &str = "u_left";
    pub const RIGHT: &str = "u_right";
    pub const INNER_COLOR: &str = "u_inner_color";
    pub const STROKE_COLOR: &str = "u_stroke_color";
    pub const RADIUS: &str = "u_radius";

    pub const STOPLINES: [[&str; 2]; 2] = [[STOPLINE1_P1, STOPLINE1_P2], [STOPLINE2_P1, STOPLINE2_P2]];
}

/// Stop-line endpoint that hides a stop line below the floor
pub fn hidden_stopline_point() -> Point3f {
    Point3f::new(0.0, 0.0, -1.0)
}

/// Girth plane far away from any foot
pub fn hidden_girth_plane() -> Vector4f {
    Vector4f::new(0.0, 0.0, 1.0, 1.0)
}

/// Name of the tint uniform of a fit zone
pub fn zone_color_uniform(zone: FitZone) -> String {
    format!("u_{}_color", zone.as_str())
}

/// Name of the anchor uniform of a fit zone
pub fn zone_marker_uniform(zone: FitZone) -> String {
    format!("u_{}_marker", zone.as_str())
}

/// A shader parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Float(f32),
    Vec3(Vector3f),
    Vec4(Vector4f),
}

/// Which shader program draws a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Lit foot surface with measurement and fit-zone overlays
    DetailedFoot,
    /// Flat translucent foot surface of the default style
    Matte,
    Wireframe,
    /// Animated contour lines
    MeshLines,
    /// Ground plate with the foot shadows
    Ground,
    SolidLine,
    DashedLine,
    /// Round measurement info marker
    InfoPoint,
    /// Round fit-zone marker with a white stroke
    FitZoneMarker,
}

/// Render state plus uniforms of one material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Base rgba color for the fixed-function kinds
    pub color: Vector4f,
    pub opacity: f32,
    pub transparent: bool,
    pub double_sided: bool,
    pub depth_test: bool,
    pub depth_write: bool,
    pub line_width: f32,
    /// Dash and gap length for dashed lines
    pub dash: Option<(f32, f32)>,
    /// Encoded image bytes bound as the main texture
    pub texture: Option<Rc<[u8]>>,
    uniforms: BTreeMap<String, Uniform>,
}

impl Material {
    fn base(kind: MaterialKind) -> Self {
        Self {
            kind,
            color: Vector4f::new(1.0, 1.0, 1.0, 1.0),
            opacity: 1.0,
            transparent: false,
            double_sided: false,
            depth_test: true,
            depth_write: true,
            line_width: 1.0,
            dash: None,
            texture: None,
            uniforms: BTreeMap::new(),
        }
    }

    /// Foot surface of the detailed style with every overlay hidden
    pub fn detailed_foot() -> Self {
        let mut material = Self::base(MaterialKind::DetailedFoot);
        material.set_vec4(uniforms::ACCENT_COLOR, Vector4f::new(1.0, 1.0, 1.0, 1.0));
        material.set_float(uniforms::CUTOFF_HEIGHT, 0.0);
        material.set_float(uniforms::ERROR_VIS, 0.0);
        material.set_vec4(uniforms::MEASUREMENT_LINE_COLOR, Vector4f::new(0.0, 0.0, 0.0, 1.0));
        material.set_float(uniforms::MEASUREMENT_LINE_WIDTH, 0.0025);
        material.set_float(uniforms::TIME_FIT_ZONES, 0.0);
        material.clear_stoplines();
        material.set_vec4(uniforms::GIRTH_PLANE, hidden_girth_plane());
        material.clear_fit_zones();
        material
    }

    /// Foot surface of the wireframe style
    pub fn matte(style: &Style) -> Self {
        let mut material = Self::base(MaterialKind::Matte);
        material.color = Vector4f::new(0.937, 0.937, 0.937, 1.0);
        material.double_sided = true;
        if style.opacity < 1.0 {
            material.opacity = style.opacity;
            material.transparent = true;
        }
        material
    }

    pub fn wireframe(color: Vector3f) -> Self {
        let mut material = Self::base(MaterialKind::Wireframe);
        material.color = color.push(1.0);
        material
    }

    pub fn mesh_lines() -> Self {
        let mut material = Self::base(MaterialKind::MeshLines);
        material.transparent = true;
        material.set_vec4(uniforms::ACCENT_COLOR, Vector4f::new(1.0, 0.0, 0.0, 1.0));
        material.set_vec4(uniforms::COLOR, Vector4f::new(0.0, 0.0, 0.0, 1.0));
        material.set_float(uniforms::TIME, 0.0);
        material.set_float(uniforms::CUTOFF_HEIGHT, 0.0);
        material
    }

    pub fn ground() -> Self {
        let mut material = Self::base(MaterialKind::Ground);
        material.transparent = true;
        material.depth_write = false;
        material.set_float(uniforms::RIGHT, 1.0);
        material.set_float(uniforms::LEFT, 1.0);
        material.set_vec4(uniforms::PATTERN_COLOR, Vector4f::new(1.0, 1.0, 1.0, 1.0));
        material
    }

    pub fn solid_line() -> Self {
        let mut material = Self::base(MaterialKind::SolidLine);
        material.color = Vector4f::new(0.0, 0.0, 0.0, 1.0);
        material.opacity = 0.8;
        material.transparent = true;
        material.line_width = SOLID_LINE_WIDTH;
        material
    }

    pub fn dashed_line() -> Self {
        let mut material = Self::base(MaterialKind::DashedLine);
        material.color = Vector4f::new(0.0, 0.0, 0.0, 1.0);
        material.opacity = 0.8;
        material.transparent = true;
        material.line_width = DASHED_LINE_WIDTH;
        material.dash = Some((DASH_SIZE, GAP_SIZE));
        material
    }

    pub fn info_point(color: Vector3f) -> Self {
        let mut material = Self::base(MaterialKind::InfoPoint);
        material.color = color.push(1.0);
        material.transparent = true;
        material.depth_test = false;
        material
    }

    pub fn fit_zone_marker(color: Vector3f) -> Self {
        let mut material = Self::base(MaterialKind::FitZoneMarker);
        material.transparent = true;
        material.depth_test = false;
        material.depth_write = false;
        material.set_vec3(uniforms::INNER_COLOR, color);
        material.set_vec3(uniforms::STROKE_COLOR, Vector3f::new(1.0, 1.0, 1.0));
        material.set_float(uniforms::RADIUS, 0.4);
        material
    }

    pub fn uniform(&self, name: &str) -> Option<Uniform> {
        self.uniforms.get(name).copied()
    }

    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &Uniform)> {
        self.uniforms.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.uniform(name)? {
            Uniform::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<Vector3f> {
        match self.uniform(name)? {
            Uniform::Vec3(value) => Some(value),
            _ => None,
        }
    }

    pub fn vec4(&self, name: &str) -> Option<Vector4f> {
        match self.uniform(name)? {
            Uniform::Vec4(value) => Some(value),
            _ => None,
        }
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.uniforms.insert(name.to_string(), Uniform::Float(value));
    }

    pub fn set_vec3(&mut self, name: &str, value: Vector3f) {
        self.uniforms.insert(name.to_string(), Uniform::Vec3(value));
    }

    pub fn set_vec4(&mut self, name: &str, value: Vector4f) {
        self.uniforms.insert(name.to_string(), Uniform::Vec4(value));
    }

    /// Draw two stop lines across the foot surface
    pub fn set_stoplines(&mut self, stoplines: &[[Point3f; 2]; 2]) {
        for (names, endpoints) in uniforms::STOPLINES.iter().zip(stoplines) {
            for (name, point) in names.iter().zip(endpoints) {
                self.set_vec3(name, point.coords);
            }
        }
    }

    pub fn clear_stoplines(&mut self) {
        let hidden = hidden_stopline_point();
        self.set_stoplines(&[[hidden; 2]; 2]);
    }

    pub fn set_girth_plane(&mut self, plane: &Plane) {
        self.set_vec4(uniforms::GIRTH_PLANE, plane.to_vector4());
    }

    pub fn clear_girth_plane(&mut self) {
        self.set_vec4(uniforms::GIRTH_PLANE, hidden_girth_plane());
    }

    pub fn set_zone_colors(&mut self, colors: &ZoneMap<Vector3f>) {
        for (zone, color) in colors.iter() {
            self.set_vec3(&zone_color_uniform(zone), *color);
        }
    }

    pub fn set_zone_color(&mut self, zone: FitZone, color: Vector3f) {
        self.set_vec3(&zone_color_uniform(zone), color);
    }

    pub fn set_zone_marker(&mut self, zone: FitZone, position: &Point3f) {
        self.set_vec3(&zone_marker_uniform(zone), position.coords);
    }

    /// Remove every fit-zone tint and anchor
    pub fn clear_fit_zones(&mut self) {
        self.set_zone_colors(&ZoneMap::from_fn(|_| Vector3f::new(1.0, 1.0, 1.0)));
        for zone in FitZone::ALL {
            self.set_vec3(&zone_marker_uniform(zone), Vector3f::zeros());
        }
    }
}
