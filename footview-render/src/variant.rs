//! Variants of the foot view
//!
//! The result page and the onboarding screens share one engine and differ
//! only in reveal timing, where the scene sits and which pose the camera
//! settles on once the feet are loaded.

use crate::timing::PaintTiming;
use footview_camera::CameraView;
use footview_core::{Point3f, Transform3D, Vector3f};
use footview_io::SceneFile;

/// Shift of the onboarding scene, leaving room for text beside the feet
const ONBOARDING_OFFSET: [f32; 3] = [0.2, 0.1, 0.0];

/// Behavior that differs between view variants
#[derive(Debug, Clone, Copy)]
pub struct ViewVariant {
    pub name: &'static str,
    pub timing: PaintTiming,
    /// Applied to a loaded `scene.json` before it places anything
    pub interpret_scene: fn(&SceneFile) -> SceneFile,
    /// Maps the visible center of the feet to the orbit target
    pub orbit_target: fn(Point3f) -> Point3f,
    /// Pose animated to once both feet are loaded
    pub initial_view: CameraView,
}

impl ViewVariant {
    /// The scan result page
    pub fn scan() -> Self {
        Self {
            name: "scan",
            timing: PaintTiming::scan(),
            interpret_scene: |scene| *scene,
            orbit_target: |center| center,
            initial_view: CameraView::Initial,
        }
    }

    /// The onboarding screens
    pub fn onboarding() -> Self {
        Self {
            name: "onboarding",
            timing: PaintTiming::onboarding(),
            interpret_scene: |scene| {
                let [x, y, z] = ONBOARDING_OFFSET;
                scene.premultiplied(&Transform3D::translation(Vector3f::new(x, y, z)))
            },
            orbit_target: |center| center + Vector3f::new(ONBOARDING_OFFSET[0], 0.0, 0.0),
            initial_view: CameraView::InitialSplash,
        }
    }
}

impl Default for ViewVariant {
    fn default() -> Self {
        Self::scan()
    }
}
