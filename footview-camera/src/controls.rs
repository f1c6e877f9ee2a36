//! Orbit controller: gestures and animated pose transitions
//!
//! The controller keeps the camera on a sphere around a target. Gestures
//! accumulate angular deltas or change zoom; animations interpolate the
//! spherical coordinates, target and zoom along the shortest angular path.
//! Every call to [`OrbitController::update`] clamps the pose into the
//! configured limits, places the camera and notifies listeners when it
//! actually moved.

use crate::animation::{AnimationSegment, AnimationSpeeds};
use crate::events::{ControlEvent, ControlListeners, ListenerHandle};
use crate::input::{touch_distance, InputEvent, InputSurface, PointerButton};
use crate::projection::ProjectionCamera;
use crate::spherical::{position_from_spherical, spherical_from_position, Spherical, EPS};
use footview_core::{clamp, Clock, Point2f, Point3f, UnitQuaternion, Vector3f};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::rc::Rc;

/// Limits and tuning of an [`OrbitController`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    /// Disables all input handling when false
    pub enabled: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Polar limits in radians, within `[0, π]`
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Azimuth limits in radians
    pub min_azimuth_angle: f32,
    pub max_azimuth_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub enable_rotate: bool,
    pub rotate_speed: f32,
    pub orbit_button: PointerButton,
    pub zoom_button: PointerButton,
    pub animation: AnimationSpeeds,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_zoom: 0.0,
            max_zoom: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: 0.5 * PI,
            min_azimuth_angle: f32::NEG_INFINITY,
            max_azimuth_angle: f32::INFINITY,
            enable_damping: false,
            damping_factor: 0.25,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_rotate: true,
            rotate_speed: 1.0,
            orbit_button: PointerButton::Primary,
            zoom_button: PointerButton::Auxiliary,
            animation: AnimationSpeeds::default(),
        }
    }
}

impl OrbitSettings {
    /// Tuning used by the foot scan viewer
    pub fn scan_viewer() -> Self {
        Self {
            min_distance: 0.2,
            max_distance: 1.5,
            min_zoom: 0.2,
            max_zoom: 5.0,
            rotate_speed: 0.75,
            animation: AnimationSpeeds {
                radius: 0.25,
                target: 0.25,
                zoom: 2.0,
                ..AnimationSpeeds::default()
            },
            ..Self::default()
        }
    }
}

/// What the current gesture is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    None,
    Rotate,
    Dolly,
    TouchRotate,
    TouchDolly,
}

#[derive(Debug, Clone)]
struct OrbitState {
    spherical: Spherical,
    spherical_delta: Spherical,
    gesture: GestureState,
    rotate_start: Point2f,
    dolly_start: Point2f,
    zoom_changed: bool,
    last_position: Point3f,
    last_orientation: UnitQuaternion<f32>,
    animation: Option<AnimationSegment>,
}

/// Keeps a [`ProjectionCamera`] orbiting a target
pub struct OrbitController {
    pub settings: OrbitSettings,
    camera: ProjectionCamera,
    target: Point3f,
    state: OrbitState,
    clock: Rc<dyn Clock>,
    surface: Box<dyn InputSurface>,
    listeners: ControlListeners,
    disposed: bool,
}

impl OrbitController {
    pub fn new(
        camera: ProjectionCamera,
        surface: Box<dyn InputSurface>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self::with_settings(camera, surface, clock, OrbitSettings::default())
    }

    pub fn with_settings(
        camera: ProjectionCamera,
        surface: Box<dyn InputSurface>,
        clock: Rc<dyn Clock>,
        settings: OrbitSettings,
    ) -> Self {
        let target = camera.target().unwrap_or_else(Point3f::origin);
        let spherical = spherical_from_position(&(camera.position - target), &camera.up);
        let mut controller = Self {
            settings,
            camera,
            target,
            state: OrbitState {
                spherical,
                spherical_delta: Spherical::default(),
                gesture: GestureState::None,
                rotate_start: Point2f::origin(),
                dolly_start: Point2f::origin(),
                zoom_changed: false,
                last_position: Point3f::origin(),
                last_orientation: UnitQuaternion::identity(),
                animation: None,
            },
            clock,
            surface,
            listeners: ControlListeners::new(),
            disposed: false,
        };
        controller.update();
        controller
    }

    pub fn camera(&self) -> &ProjectionCamera {
        &self.camera
    }

    /// Mutable camera access for aspect and viewport changes
    pub fn camera_mut(&mut self) -> &mut ProjectionCamera {
        &mut self.camera
    }

    pub fn target(&self) -> Point3f {
        self.target
    }

    pub fn spherical(&self) -> Spherical {
        self.state.spherical
    }

    pub fn polar_angle(&self) -> f32 {
        self.state.spherical.phi
    }

    pub fn azimuthal_angle(&self) -> f32 {
        self.state.spherical.theta
    }

    pub fn gesture(&self) -> GestureState {
        self.state.gesture
    }

    pub fn is_animating(&self) -> bool {
        self.state.animation.is_some()
    }

    pub fn animation(&self) -> Option<&AnimationSegment> {
        self.state.animation.as_ref()
    }

    pub fn surface(&self) -> &dyn InputSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn InputSurface {
        self.surface.as_mut()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn subscribe<F>(&mut self, event: ControlEvent, callback: F) -> ListenerHandle
    where
        F: FnMut(&ProjectionCamera) + 'static,
    {
        self.listeners.subscribe(event, callback)
    }

    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.unsubscribe(handle)
    }

    pub fn listener_count(&self, event: ControlEvent) -> usize {
        self.listeners.count(event)
    }

    /// Advance the animation or apply gesture deltas, then place the camera.
    ///
    /// Returns true and emits [`ControlEvent::Change`] when the camera moved
    /// or zoomed since the last change.
    pub fn update(&mut self) -> bool {
        let now = self.clock.now_ms();
        let state = &mut self.state;

        let sample = match (&state.animation, state.gesture) {
            (Some(animation), GestureState::None) => Some(animation.sample(now)),
            _ => None,
        };
        match sample {
            Some(sample) => {
                state.spherical = sample.spherical;
                self.target = sample.target;
                self.camera.zoom = sample.zoom;
                state.zoom_changed = true;
                if sample.finished {
                    state.animation = None;
                }
            }
            None => {
                state.animation = None;
                state.spherical.theta += state.spherical_delta.theta;
                state.spherical.phi += state.spherical_delta.phi;
            }
        }

        let settings = &self.settings;
        let spherical = &mut state.spherical;
        spherical.theta = settings
            .min_azimuth_angle
            .max(settings.max_azimuth_angle.min(spherical.theta));
        spherical.phi = settings
            .min_polar_angle
            .max(settings.max_polar_angle.min(spherical.phi));
        spherical.make_safe();
        spherical.radius = settings
            .min_distance
            .max(settings.max_distance.min(spherical.radius));

        // Orient while orbiting the origin so the up vector stays stable,
        // then move onto the target
        let offset = position_from_spherical(spherical, &self.camera.up);
        self.camera.position = Point3f::from(offset);
        self.camera.look_at(&Point3f::origin());
        self.camera.position += self.target.coords;
        self.camera.set_target(Some(self.target));

        if settings.enable_damping {
            state.spherical_delta.theta *= 1.0 - settings.damping_factor;
            state.spherical_delta.phi *= 1.0 - settings.damping_factor;
        } else {
            state.spherical_delta = Spherical::default();
        }

        self.camera.orthographic_blend = (1.0 - spherical.phi.sin()).powi(2);
        self.camera.update_projection();

        let moved = (state.last_position - self.camera.position).norm_squared() > EPS;
        let rotated = 8.0
            * (1.0 - state.last_orientation.coords.dot(&self.camera.orientation.coords))
            > EPS;
        if state.zoom_changed || moved || rotated {
            state.last_position = self.camera.position;
            state.last_orientation = self.camera.orientation;
            state.zoom_changed = false;
            self.listeners.emit(ControlEvent::Change, &self.camera);
            return true;
        }
        false
    }

    /// Animate to a pose given as camera offset from `target`.
    ///
    /// `duration_factor` scales the speed-derived duration.
    pub fn animate_to_pose(
        &mut self,
        relative_position: &Vector3f,
        target: &Point3f,
        zoom: f32,
        duration_factor: Option<f32>,
    ) {
        let end = spherical_from_position(relative_position, &self.camera.up);
        let animation = AnimationSegment::new(
            self.state.spherical,
            end,
            self.target,
            *target,
            self.camera.zoom,
            zoom,
            &self.settings.animation,
            self.clock.now_ms(),
            duration_factor,
        );
        log::debug!(
            "Animating camera to {:?} over {:.0} ms",
            target,
            animation.duration_ms()
        );
        self.state.animation = Some(animation);
        self.update();
    }

    /// Move to a pose immediately
    pub fn jump_to_pose(&mut self, relative_position: &Vector3f, target: &Point3f, zoom: f32) {
        self.state.animation = None;
        self.camera.position = target + relative_position;
        self.target = *target;
        self.camera.zoom = zoom;
        self.state.spherical = spherical_from_position(relative_position, &self.camera.up);
        self.update();
    }

    /// Move the orbit target, blending into any animation in flight
    pub fn update_target(&mut self, target: &Point3f) {
        match self.state.animation.take() {
            Some(animation) => {
                let retargeted = animation.retargeted(
                    self.state.spherical,
                    self.target,
                    self.camera.zoom,
                    *target,
                    &self.settings.animation,
                    self.clock.now_ms(),
                );
                self.state.animation = Some(retargeted);
            }
            None => {
                let relative = self.camera.position - self.target;
                let zoom = self.camera.zoom;
                self.animate_to_pose(&relative, target, zoom, None);
            }
        }
    }

    /// Stop handling input and drop all listeners
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.surface.set_pointer_capture(false);
        self.state.gesture = GestureState::None;
        self.state.animation = None;
        self.listeners.clear();
        self.disposed = true;
        log::debug!("Orbit controller disposed");
    }

    /// Feed one input event; returns true when the controller acted on it
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if self.disposed || !self.settings.enabled {
            return false;
        }
        match event {
            InputEvent::PointerDown { button, x, y } => self.pointer_down(*button, *x, *y),
            InputEvent::PointerMove { x, y } => self.pointer_move(*x, *y),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Wheel { delta_y } => self.wheel(*delta_y),
            InputEvent::TouchStart { touches } => self.touch_start(touches),
            InputEvent::TouchMove { touches } => self.touch_move(touches),
            InputEvent::TouchEnd { .. } => self.touch_end(),
        }
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.settings.zoom_speed)
    }

    fn set_zoom(&mut self, zoom: f32) {
        self.camera.zoom = clamp(zoom, self.settings.min_zoom, self.settings.max_zoom);
        self.camera.update_projection();
        self.state.zoom_changed = true;
    }

    fn dolly_in(&mut self) {
        let zoom = self.camera.zoom * self.zoom_scale();
        self.set_zoom(zoom);
    }

    fn dolly_out(&mut self) {
        let zoom = self.camera.zoom / self.zoom_scale();
        self.set_zoom(zoom);
    }

    fn rotate_to(&mut self, end: Point2f) {
        let delta = end - self.state.rotate_start;
        let (width, height) = self.surface.client_size();
        let speed = self.settings.rotate_speed;
        // a drag across the whole surface is a full turn
        self.state.spherical_delta.theta -= 2.0 * PI * delta.x / width.max(1.0) * speed;
        self.state.spherical_delta.phi -= 2.0 * PI * delta.y / height.max(1.0) * speed;
        self.state.rotate_start = end;
        self.update();
    }

    fn pointer_down(&mut self, button: PointerButton, x: f32, y: f32) -> bool {
        if self.state.gesture != GestureState::None {
            return false;
        }
        if button == self.settings.orbit_button {
            if !self.settings.enable_rotate {
                return false;
            }
            self.state.rotate_start = Point2f::new(x, y);
            self.state.gesture = GestureState::Rotate;
        } else if button == self.settings.zoom_button {
            if !self.settings.enable_zoom {
                return false;
            }
            self.state.dolly_start = Point2f::new(x, y);
            self.state.gesture = GestureState::Dolly;
        } else {
            return false;
        }

        self.surface.set_pointer_capture(true);
        self.listeners.emit(ControlEvent::Start, &self.camera);
        true
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !self.surface.pointer_captured() {
            return false;
        }
        match self.state.gesture {
            GestureState::Rotate if self.settings.enable_rotate => {
                self.rotate_to(Point2f::new(x, y));
                true
            }
            GestureState::Dolly if self.settings.enable_zoom => {
                let delta_y = y - self.state.dolly_start.y;
                if delta_y > 0.0 {
                    self.dolly_in();
                } else if delta_y < 0.0 {
                    self.dolly_out();
                }
                self.state.dolly_start = Point2f::new(x, y);
                self.update();
                true
            }
            _ => false,
        }
    }

    fn pointer_up(&mut self) -> bool {
        if !self.surface.pointer_captured() {
            return false;
        }
        self.surface.set_pointer_capture(false);
        self.state.gesture = GestureState::None;
        self.listeners.emit(ControlEvent::End, &self.camera);
        true
    }

    fn wheel(&mut self, delta_y: f32) -> bool {
        if !self.settings.enable_zoom
            || !matches!(self.state.gesture, GestureState::None | GestureState::Rotate)
        {
            return false;
        }
        if delta_y < 0.0 {
            self.dolly_out();
        } else if delta_y > 0.0 {
            self.dolly_in();
        }
        self.update();
        self.listeners.emit(ControlEvent::Start, &self.camera);
        self.listeners.emit(ControlEvent::End, &self.camera);
        true
    }

    fn touch_start(&mut self, touches: &[Point2f]) -> bool {
        match touches {
            [first] => {
                if !self.settings.enable_rotate {
                    return false;
                }
                self.state.rotate_start = *first;
                self.state.gesture = GestureState::TouchRotate;
            }
            [_, _] => {
                if !self.settings.enable_zoom {
                    return false;
                }
                self.state.dolly_start = Point2f::new(0.0, touch_distance(touches));
                self.state.gesture = GestureState::TouchDolly;
            }
            _ => {
                self.state.gesture = GestureState::None;
                return false;
            }
        }
        self.listeners.emit(ControlEvent::Start, &self.camera);
        true
    }

    fn touch_move(&mut self, touches: &[Point2f]) -> bool {
        match (touches, self.state.gesture) {
            ([first], GestureState::TouchRotate) if self.settings.enable_rotate => {
                self.rotate_to(*first);
                true
            }
            ([_, _], GestureState::TouchDolly) if self.settings.enable_zoom => {
                let distance = touch_distance(touches);
                let delta = distance - self.state.dolly_start.y;
                // spreading the fingers zooms in
                if delta > 0.0 {
                    self.dolly_out();
                } else if delta < 0.0 {
                    self.dolly_in();
                }
                self.state.dolly_start = Point2f::new(0.0, distance);
                self.update();
                true
            }
            ([_] | [_, _], _) => false,
            _ => {
                self.state.gesture = GestureState::None;
                false
            }
        }
    }

    fn touch_end(&mut self) -> bool {
        let was_active = self.state.gesture != GestureState::None;
        self.state.gesture = GestureState::None;
        if was_active {
            self.listeners.emit(ControlEvent::End, &self.camera);
        }
        was_active
    }
}

impl std::fmt::Debug for OrbitController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitController")
            .field("settings", &self.settings)
            .field("target", &self.target)
            .field("state", &self.state)
            .field("listeners", &self.listeners)
            .field("disposed", &self.disposed)
            .finish()
    }
}
