//! Timed transitions between camera poses

use crate::spherical::{ease_in_ease_out, signed_remainder, Spherical, EPS};
use footview_core::{clamp, Point3f, Vector3f};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Shortest transition, in milliseconds
pub const MIN_DURATION_MS: f64 = 1.0;

/// How fast each part of a pose may change during an animated transition.
///
/// Rotation is in radians per second, radius and target in scene units per
/// second, and zoom in factors of `zoom` per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSpeeds {
    pub rotation: f32,
    pub radius: f32,
    pub target: f32,
    pub zoom: f32,
}

impl Default for AnimationSpeeds {
    fn default() -> Self {
        Self {
            rotation: 2.0,
            radius: 2.0,
            target: 2.0,
            zoom: 2.0,
        }
    }
}

/// One interpolated frame of an [`AnimationSegment`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSample {
    pub spherical: Spherical,
    pub target: Point3f,
    pub zoom: f32,
    pub finished: bool,
}

/// A transition from one pose to another.
///
/// Angular deltas are wrapped so the camera always takes the shorter way
/// around, and the duration is set by whichever part of the pose needs the
/// longest at its configured speed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSegment {
    start_spherical: Spherical,
    end_spherical: Spherical,
    delta: Spherical,
    start_target: Point3f,
    end_target: Point3f,
    target_delta: Vector3f,
    start_zoom: f32,
    end_zoom: f32,
    zoom_factor: f32,
    start_ms: f64,
    duration_ms: f64,
}

impl AnimationSegment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_spherical: Spherical,
        end_spherical: Spherical,
        start_target: Point3f,
        end_target: Point3f,
        start_zoom: f32,
        end_zoom: f32,
        speeds: &AnimationSpeeds,
        now_ms: f64,
        duration_factor: Option<f32>,
    ) -> Self {
        let two_pi = 2.0 * PI;
        let delta = Spherical {
            radius: end_spherical.radius - start_spherical.radius,
            phi: signed_remainder(end_spherical.phi - start_spherical.phi, two_pi),
            theta: signed_remainder(end_spherical.theta - start_spherical.theta, two_pi),
        };
        let target_delta = end_target - start_target;
        let zoom_factor = if start_zoom.abs() > EPS {
            end_zoom / start_zoom
        } else {
            1.0
        };

        let rotation_magnitude = (delta.phi * delta.phi + delta.theta * delta.theta).sqrt();
        let zoom_log = speeds.zoom.ln().abs().max(EPS);
        let seconds = (rotation_magnitude / speeds.rotation.max(EPS))
            .max(delta.radius.abs() / speeds.radius.max(EPS))
            .max(target_delta.norm() / speeds.target.max(EPS))
            .max((zoom_factor.max(EPS).ln() / zoom_log).abs())
            .max(0.001);

        let mut duration_ms = 1000.0 * seconds as f64;
        if let Some(factor) = duration_factor {
            duration_ms *= factor as f64;
        }

        Self {
            start_spherical,
            end_spherical,
            delta,
            start_target,
            end_target,
            target_delta,
            start_zoom,
            end_zoom,
            zoom_factor,
            start_ms: now_ms,
            duration_ms: duration_ms.max(MIN_DURATION_MS),
        }
    }

    /// Restart towards `end_target` from the given current pose, keeping
    /// the orientation and zoom this segment was heading for
    pub fn retargeted(
        &self,
        current_spherical: Spherical,
        current_target: Point3f,
        current_zoom: f32,
        end_target: Point3f,
        speeds: &AnimationSpeeds,
        now_ms: f64,
    ) -> Self {
        Self::new(
            current_spherical,
            self.end_spherical,
            current_target,
            end_target,
            current_zoom,
            self.end_zoom,
            speeds,
            now_ms,
            None,
        )
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn end_spherical(&self) -> Spherical {
        self.end_spherical
    }

    pub fn end_target(&self) -> Point3f {
        self.end_target
    }

    pub fn end_zoom(&self) -> f32 {
        self.end_zoom
    }

    /// Angular and radial change over the whole segment
    pub fn delta(&self) -> Spherical {
        self.delta
    }

    /// Linear progress in `[0, 1]` at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f32 {
        clamp(((now_ms - self.start_ms) / self.duration_ms) as f32, 0.0, 1.0)
    }

    /// Eased pose at `now_ms`
    pub fn sample(&self, now_ms: f64) -> AnimationSample {
        let progress = self.progress(now_ms);
        let t = ease_in_ease_out(progress);
        AnimationSample {
            spherical: Spherical {
                radius: self.start_spherical.radius + self.delta.radius * t,
                phi: self.start_spherical.phi + self.delta.phi * t,
                theta: self.start_spherical.theta + self.delta.theta * t,
            },
            target: self.start_target + self.target_delta * t,
            zoom: self.start_zoom * self.zoom_factor.powf(t),
            finished: progress >= 1.0,
        }
    }
}
