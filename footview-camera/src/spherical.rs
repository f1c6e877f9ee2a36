//! Spherical coordinates and angle helpers

use footview_core::{UnitQuaternion, Vector3f};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Threshold used to keep the polar angle off the poles and to detect
/// camera movement
pub const EPS: f32 = 1e-6;

/// A point around the orbit target.
///
/// `phi` is the polar angle measured from +Y, `theta` the azimuth measured
/// from +Z towards +X.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Spherical coordinates of a Cartesian offset
    pub fn from_vector(v: &Vector3f) -> Self {
        let radius = v.norm();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Cartesian offset of these coordinates
    pub fn to_vector(&self) -> Vector3f {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3f::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Nudge `phi` off the poles so the orbit axis is never degenerate
    pub fn make_safe(&mut self) -> &mut Self {
        self.phi = self.phi.max(EPS).min(PI - EPS);
        self
    }

    /// Copy with `phi` nudged off the poles
    pub fn safe(mut self) -> Self {
        self.make_safe();
        self
    }
}

/// `num mod denom` remapped into `[-denom/2, denom/2]`, so that an angle
/// difference always names the shorter way around
pub fn signed_remainder(num: f32, denom: f32) -> f32 {
    let remain = num % denom;
    if remain > 0.5 * denom {
        remain - denom
    } else if remain < -0.5 * denom {
        remain + denom
    } else {
        remain
    }
}

/// Cubic ease curve `3t² − 2t³`
pub fn ease_in_ease_out(t: f32) -> f32 {
    3.0 * t * t - 2.0 * t * t * t
}

/// Rotation taking `up` onto +Y, the axis spherical coordinates orbit around
pub fn orbit_frame(up: &Vector3f) -> UnitQuaternion<f32> {
    UnitQuaternion::rotation_between(up, &Vector3f::y()).unwrap_or_else(|| {
        // `up` points straight down
        UnitQuaternion::from_axis_angle(&Vector3f::x_axis(), PI)
    })
}

/// World-space offset of `spherical` for an orbit around `up`
pub fn position_from_spherical(spherical: &Spherical, up: &Vector3f) -> Vector3f {
    orbit_frame(up).inverse() * spherical.to_vector()
}

/// Spherical coordinates of a world-space offset for an orbit around `up`
pub fn spherical_from_position(position: &Vector3f, up: &Vector3f) -> Spherical {
    Spherical::from_vector(&(orbit_frame(up) * position))
}
