//! View configuration
//!
//! Colors that a host would otherwise pick from its stylesheet live in
//! [`ColorPalette`]; everything can be loaded from JSON with missing fields
//! falling back to the defaults.

use crate::error::Result;
use footview_camera::OrbitSettings;
use footview_core::{FootPair, Vector3f, Vector4f};
use serde::{Deserialize, Serialize};

/// How the feet are drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub opacity: f32,
    pub wireframe: bool,
    /// Detailed scans come with a scene file, a ground plate and mesh lines
    pub is_detailed: bool,
}

impl Style {
    /// Translucent matte feet with a wireframe
    pub fn default_style() -> Self {
        Self {
            opacity: 0.7,
            wireframe: true,
            is_detailed: false,
        }
    }

    /// Shaded feet with every overlay
    pub fn detailed() -> Self {
        Self {
            opacity: 1.0,
            wireframe: false,
            is_detailed: true,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::default_style()
    }
}

/// What the foot colors encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Default,
    ArchType,
    FitZones,
    Measurement,
}

/// Colors as rgba in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub ground_pattern: Vector4f,
    pub arch_type: Vector4f,
    /// Mesh-line color; alpha is the opacity before supersampling
    pub mesh_lines: Vector4f,
    pub wireframe: Vector3f,
    pub measurement_line: Vector4f,
    /// Ground pattern while fit zones are shown
    pub fit_zones_ground: Vector4f,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            ground_pattern: Vector4f::new(0.78, 0.8, 0.82, 1.0),
            arch_type: Vector4f::new(0.11, 0.71, 0.82, 1.0),
            mesh_lines: Vector4f::new(0.2, 0.2, 0.2, 0.25),
            wireframe: Vector3f::new(0.8, 0.8, 0.8),
            measurement_line: Vector4f::new(0.0, 0.0, 0.0, 0.8),
            fit_zones_ground: Vector4f::new(0.0, 0.0, 0.0, 0.07),
        }
    }
}

/// Everything tunable about a [`FootView`](crate::FootView)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub style: Style,
    pub palette: ColorPalette,
    pub color_mode: ColorMode,
    pub orbit: OrbitSettings,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Offset of the whole scene from the world origin
    pub root_offset: Vector3f,
    /// Foot placement used until a scene file says otherwise
    pub foot_positions: FootPair<Vector3f>,
    /// Render through a larger offscreen target
    pub supersampling: bool,
    pub resize_debounce_ms: f64,
    pub resize_max_wait_ms: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            style: Style::default_style(),
            palette: ColorPalette::default(),
            color_mode: ColorMode::Default,
            orbit: OrbitSettings::scan_viewer(),
            fov: 60.0,
            near: 0.05,
            far: 1.5,
            root_offset: Vector3f::new(0.0, 0.0, -0.02),
            foot_positions: FootPair::new(Vector3f::new(-0.06, -0.2, 0.0), Vector3f::new(0.06, -0.2, 0.0)),
            supersampling: true,
            resize_debounce_ms: 400.0,
            resize_max_wait_ms: 400.0,
        }
    }
}

impl ViewConfig {
    /// Configuration for the detailed style
    pub fn detailed() -> Self {
        Self {
            style: Style::detailed(),
            ..Self::default()
        }
    }

    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let config = ViewConfig::from_json(
            r#"{"style": {"wireframe": false}, "color_mode": "fit_zones", "fov": 45.0}"#,
        )
        .unwrap();
        assert!(!config.style.wireframe);
        assert_eq!(config.style.opacity, 0.7);
        assert_eq!(config.color_mode, ColorMode::FitZones);
        assert_eq!(config.fov, 45.0);
        assert_eq!(config.orbit.max_zoom, 5.0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ViewConfig::from_json(r#"{"color_mode": "sepia"}"#).is_err());
    }

    #[test]
    fn test_style_presets() {
        assert!(Style::detailed().is_detailed);
        assert_eq!(Style::default(), Style::default_style());
    }
}
