//! Projection of scene points into canvas pixels

use footview_camera::{look_rotation, ProjectionCamera};
use footview_core::{Point3f, UnitQuaternion, Vector3f};
use serde::{Deserialize, Serialize};

/// Size of the drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A position in canvas pixels, origin at the top left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

/// Map normalized device coordinates to canvas pixels with y pointing down
pub fn ndc_to_canvas(ndc: &Point3f, viewport: &Viewport) -> CanvasPoint {
    let finite = |value: f32| if value.is_finite() { value } else { 0.0 };
    CanvasPoint {
        x: (finite(ndc.x) + 1.0) * 0.5 * viewport.width,
        y: (1.0 - finite(ndc.y)) * 0.5 * viewport.height,
    }
}

/// Canvas position of a world-space point
pub fn world_to_canvas(camera: &ProjectionCamera, point: &Point3f, viewport: &Viewport) -> CanvasPoint {
    ndc_to_canvas(&camera.project(point), viewport)
}

/// Rotation turning a flat marker at `position` to face `eye`
pub fn billboard_rotation(position: &Point3f, eye: &Point3f, up: &Vector3f) -> UnitQuaternion<f32> {
    look_rotation(&(eye - position), up)
}
