//! Named camera poses around the feet

use crate::spherical::{position_from_spherical, Spherical};
use footview_core::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Orbit radius every preset is placed at; a preset's own radius is
/// expressed through zoom instead so the perspective stays constant
pub const LEGACY_RADIUS: f32 = 0.4426;

/// A camera pose: where to stand, what to look at, and how far to zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraOrientation {
    pub position: Point3f,
    pub target: Point3f,
    pub up: Vector3f,
    pub zoom: f32,
    pub phi: f32,
    pub theta: f32,
}

impl CameraOrientation {
    /// Build a Z-up pose from a radius and angles given in multiples of π
    pub fn new(radius: f32, phi: f32, theta: f32) -> Self {
        let phi = phi * PI;
        let theta = theta * PI;
        let up = Vector3f::z();
        let spherical = Spherical::new(LEGACY_RADIUS, phi, theta).safe();
        Self {
            position: Point3f::from(position_from_spherical(&spherical, &up)),
            target: Point3f::origin(),
            up,
            zoom: LEGACY_RADIUS / radius,
            phi,
            theta,
        }
    }

    /// Camera position relative to the target
    pub fn relative_position(&self) -> Vector3f {
        self.position - self.target
    }
}

/// The preset views of the scan viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraView {
    FrontRight,
    FrontLeft,
    FrontView,
    HighFrontView,
    Initial,
    InsideView,
    PreInitial,
    RearSideView,
    RearView,
    SideView,
    TopSideView,
    TopView,
    Visir,
    ToeLeft,
    BallLeft,
    InstepLeft,
    HeelLeft,
    InitialBeta,
    InitialSplash,
}

impl CameraView {
    pub const ALL: [CameraView; 19] = [
        CameraView::FrontRight,
        CameraView::FrontLeft,
        CameraView::FrontView,
        CameraView::HighFrontView,
        CameraView::Initial,
        CameraView::InsideView,
        CameraView::PreInitial,
        CameraView::RearSideView,
        CameraView::RearView,
        CameraView::SideView,
        CameraView::TopSideView,
        CameraView::TopView,
        CameraView::Visir,
        CameraView::ToeLeft,
        CameraView::BallLeft,
        CameraView::InstepLeft,
        CameraView::HeelLeft,
        CameraView::InitialBeta,
        CameraView::InitialSplash,
    ];

    /// `(radius, phi / π, theta / π)` of the preset
    fn parameters(&self) -> (f32, f32, f32) {
        match self {
            CameraView::FrontRight => (0.40, 0.4, 0.8),
            CameraView::FrontLeft => (0.40, 0.4, -0.8),
            CameraView::FrontView => (0.40, 0.37, 1.0),
            CameraView::HighFrontView => (0.40, 0.15, 1.0),
            CameraView::Initial => (0.4426, 0.3, 0.723),
            CameraView::InsideView => (0.30, 0.37, 0.71),
            CameraView::PreInitial => (0.36, 0.5, -0.2),
            CameraView::RearSideView => (0.40, 0.37, 0.25),
            CameraView::RearView => (0.40, 0.37, 0.0),
            CameraView::SideView => (0.48, 0.5, 0.5),
            CameraView::TopSideView => (0.432, 0.0, 0.5),
            CameraView::TopView => (0.432, 0.0, 0.0),
            CameraView::Visir => (0.67, 0.28, 0.73),
            CameraView::ToeLeft => (0.42, 0.48, -0.92),
            CameraView::BallLeft => (0.38, 0.5, -0.7),
            CameraView::InstepLeft => (0.42, 0.3, -0.5),
            CameraView::HeelLeft => (0.37, 0.5, -0.1),
            CameraView::InitialBeta => (0.62, 0.3, 0.723),
            CameraView::InitialSplash => (1.00, 0.1, 1.12),
        }
    }

    pub fn orientation(&self) -> CameraOrientation {
        let (radius, phi, theta) = self.parameters();
        CameraOrientation::new(radius, phi, theta)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CameraView::FrontRight => "front_right",
            CameraView::FrontLeft => "front_left",
            CameraView::FrontView => "front_view",
            CameraView::HighFrontView => "high_front_view",
            CameraView::Initial => "initial",
            CameraView::InsideView => "inside_view",
            CameraView::PreInitial => "pre_initial",
            CameraView::RearSideView => "rear_side_view",
            CameraView::RearView => "rear_view",
            CameraView::SideView => "side_view",
            CameraView::TopSideView => "top_side_view",
            CameraView::TopView => "top_view",
            CameraView::Visir => "visir",
            CameraView::ToeLeft => "toe_left",
            CameraView::BallLeft => "ball_left",
            CameraView::InstepLeft => "instep_left",
            CameraView::HeelLeft => "heel_left",
            CameraView::InitialBeta => "initial_beta",
            CameraView::InitialSplash => "initial_splash",
        }
    }

    pub fn from_name(name: &str) -> Option<CameraView> {
        CameraView::ALL.iter().copied().find(|view| view.name() == name)
    }
}

impl std::fmt::Display for CameraView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
