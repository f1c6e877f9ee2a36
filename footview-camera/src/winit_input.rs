//! Translation of winit window events into controller input

use crate::input::{InputEvent, PointerButton};
use footview_core::Point2f;
use std::collections::BTreeMap;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

/// Pixels of precise scrolling that count as one wheel notch
const PIXELS_PER_LINE: f64 = 100.0;

/// Turns winit events into [`InputEvent`]s.
///
/// winit reports buttons without a position and touches one finger at a
/// time, so the adapter remembers the cursor and the active touches.
#[derive(Debug, Default)]
pub struct WinitInputAdapter {
    cursor: Point2f,
    touches: BTreeMap<u64, Point2f>,
}

impl WinitInputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn active_touches(&self) -> Vec<Point2f> {
        self.touches.values().copied().collect()
    }

    /// Translate one event; returns `None` for events the controller ignores
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point2f::new(position.x as f32, position.y as f32);
                Some(InputEvent::PointerMove {
                    x: self.cursor.x,
                    y: self.cursor.y,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Middle => PointerButton::Auxiliary,
                    MouseButton::Right => PointerButton::Secondary,
                    _ => return None,
                };
                Some(match state {
                    ElementState::Pressed => InputEvent::PointerDown {
                        button,
                        x: self.cursor.x,
                        y: self.cursor.y,
                    },
                    ElementState::Released => InputEvent::PointerUp { button },
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scrolling away from the user as positive
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y,
                    MouseScrollDelta::PixelDelta(pos) => -(pos.y / PIXELS_PER_LINE) as f32,
                };
                Some(InputEvent::Wheel { delta_y })
            }
            WindowEvent::Touch(touch) => {
                let location = Point2f::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        self.touches.insert(touch.id, location);
                        Some(InputEvent::TouchStart {
                            touches: self.active_touches(),
                        })
                    }
                    TouchPhase::Moved => {
                        self.touches.insert(touch.id, location);
                        Some(InputEvent::TouchMove {
                            touches: self.active_touches(),
                        })
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.touches.remove(&touch.id);
                        Some(InputEvent::TouchEnd {
                            touches: self.active_touches(),
                        })
                    }
                }
            }
            _ => None,
        }
    }
}
