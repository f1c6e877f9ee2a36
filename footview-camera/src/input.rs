//! Input events and the surface the controller binds to

use footview_core::Point2f;
use serde::{Deserialize, Serialize};

/// Mouse buttons the controller can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Usually the left button
    Primary,
    /// Usually the middle button or wheel press
    Auxiliary,
    /// Usually the right button
    Secondary,
}

/// Pointer and touch input in surface pixels
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { button: PointerButton, x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { button: PointerButton },
    /// Positive `delta_y` scrolls towards the user and zooms out
    Wheel { delta_y: f32 },
    TouchStart { touches: Vec<Point2f> },
    TouchMove { touches: Vec<Point2f> },
    TouchEnd { touches: Vec<Point2f> },
}

/// The element input arrives on.
///
/// Drag gestures capture the pointer so moves outside the element keep
/// reaching the controller until the button is released.
pub trait InputSurface {
    /// Width and height in the same pixels as the input events
    fn client_size(&self) -> (f32, f32);

    /// Start or stop routing pointer moves to the controller
    fn set_pointer_capture(&mut self, captured: bool);

    fn pointer_captured(&self) -> bool;
}

/// A surface of fixed size with no window behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSurface {
    pub width: f32,
    pub height: f32,
    captured: bool,
}

impl FixedSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            captured: false,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

impl InputSurface for FixedSurface {
    fn client_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn set_pointer_capture(&mut self, captured: bool) {
        self.captured = captured;
    }

    fn pointer_captured(&self) -> bool {
        self.captured
    }
}

/// Distance between the first two touches, or zero with fewer than two
pub fn touch_distance(touches: &[Point2f]) -> f32 {
    match touches {
        [a, b, ..] => (a - b).norm(),
        _ => 0.0,
    }
}
