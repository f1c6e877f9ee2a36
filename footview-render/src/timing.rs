//! Reveal animation of a freshly loaded scan
//!
//! After the feet load, the wireframe contour lines sweep up first, then the
//! shaded surface follows and the shadows fade in on the ground plate.

use footview_core::{clamp, FootPair};
use serde::{Deserialize, Serialize};

/// Delays in seconds and speeds in metres (or shadow opacity) per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintTiming {
    pub wire_delay: f32,
    pub mesh_delay: f32,
    pub cutoff_speed: f32,
    pub shadow_speed: f32,
    /// Time before the contour lines start their idle animation
    pub initial_animation: f32,
}

impl PaintTiming {
    /// Slow reveal for the scan result page
    pub fn scan() -> Self {
        Self {
            wire_delay: 0.0,
            mesh_delay: 1.0,
            cutoff_speed: 0.04,
            shadow_speed: 1.5,
            initial_animation: 3.0,
        }
    }

    /// Quick reveal for the onboarding screens
    pub fn onboarding() -> Self {
        Self {
            wire_delay: 0.1,
            mesh_delay: 0.1,
            cutoff_speed: 0.3,
            shadow_speed: 0.1,
            initial_animation: 0.1,
        }
    }

    /// Uniform values `seconds` after the feet loaded
    pub fn parameters(&self, seconds: f32, visible: &FootPair<bool>) -> PaintParameters {
        let shadow = clamp(self.shadow_speed * (seconds - self.mesh_delay), 0.0, 1.0);
        PaintParameters {
            foot_cutoff_height: self.cutoff_speed * (seconds - self.mesh_delay),
            line_cutoff_height: self.cutoff_speed * (seconds - self.wire_delay),
            shadow: visible.map(|_, shown| if *shown { shadow } else { 0.0 }),
            line_time: if seconds < self.initial_animation {
                0.0
            } else {
                seconds - self.initial_animation
            },
        }
    }
}

impl Default for PaintTiming {
    fn default() -> Self {
        Self::scan()
    }
}

/// Time-dependent uniforms of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintParameters {
    /// Height up to which the foot surface is drawn
    pub foot_cutoff_height: f32,
    pub line_cutoff_height: f32,
    /// Shadow strength under each foot
    pub shadow: FootPair<f32>,
    pub line_time: f32,
}
