//! Gesture and animation scenarios for the orbit controller

use approx::assert_relative_eq;
use footview_camera::*;
use footview_core::{ManualClock, Point2f, Point3f, Vector3f};
use std::cell::Cell;
use std::f32::consts::PI;
use std::rc::Rc;

/// Small deterministic generator for gesture sequences
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / ((1u64 << 24) as f32)
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

fn scan_controller(settings: OrbitSettings) -> (OrbitController, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(1_000.0));
    let orientation = CameraView::Initial.orientation();
    let mut camera = ProjectionCamera::new(60.0, 1.6, 0.05, 1.5);
    camera.set_orientation(&orientation);
    camera.zoom = orientation.zoom;
    let controller = OrbitController::with_settings(
        camera,
        Box::new(FixedSurface::new(640.0, 400.0)),
        clock.clone(),
        settings,
    );
    (controller, clock)
}

#[test]
fn test_angles_stay_within_limits_for_any_drag() {
    let settings = OrbitSettings {
        min_azimuth_angle: -0.5 * PI,
        max_azimuth_angle: 0.75 * PI,
        min_polar_angle: 0.1,
        max_polar_angle: 0.45 * PI,
        enable_damping: true,
        ..OrbitSettings::scan_viewer()
    };
    let (mut controller, clock) = scan_controller(settings.clone());
    let mut rng = Lcg(7);

    for _ in 0..40 {
        controller.handle_input(&InputEvent::PointerDown {
            button: PointerButton::Primary,
            x: rng.range(0.0, 640.0),
            y: rng.range(0.0, 400.0),
        });
        for _ in 0..10 {
            controller.handle_input(&InputEvent::PointerMove {
                x: rng.range(-2000.0, 2000.0),
                y: rng.range(-2000.0, 2000.0),
            });
            let s = controller.spherical();
            assert!(s.theta >= settings.min_azimuth_angle && s.theta <= settings.max_azimuth_angle);
            assert!(s.phi >= settings.min_polar_angle && s.phi <= settings.max_polar_angle);
            assert!(s.phi != 0.0 && s.phi != PI);
            assert!(s.radius >= settings.min_distance && s.radius <= settings.max_distance);
        }
        controller.handle_input(&InputEvent::PointerUp {
            button: PointerButton::Primary,
        });
        for _ in 0..5 {
            clock.advance(16.0);
            controller.update();
            let s = controller.spherical();
            assert!(s.theta >= settings.min_azimuth_angle && s.theta <= settings.max_azimuth_angle);
            assert!(s.phi >= settings.min_polar_angle && s.phi <= settings.max_polar_angle);
        }
    }
}

#[test]
fn test_polar_angle_never_hits_pole() {
    let settings = OrbitSettings {
        max_polar_angle: PI,
        ..OrbitSettings::default()
    };
    let (mut controller, _) = scan_controller(settings);
    controller.handle_input(&InputEvent::PointerDown {
        button: PointerButton::Primary,
        x: 0.0,
        y: 0.0,
    });
    controller.handle_input(&InputEvent::PointerMove { x: 0.0, y: 5000.0 });
    assert!(controller.polar_angle() > 0.0);
    controller.handle_input(&InputEvent::PointerMove { x: 0.0, y: -5000.0 });
    assert!(controller.polar_angle() < PI);
}

#[test]
fn test_long_way_around_request_takes_short_path() {
    let (mut controller, clock) = scan_controller(OrbitSettings::scan_viewer());
    let start = controller.spherical();
    let end = Spherical::new(start.radius, start.phi, start.theta + 1.9 * PI);
    let relative = position_from_spherical(&end, &Vector3f::z());

    let zoom = controller.camera().zoom;
    controller.animate_to_pose(&relative, &Point3f::origin(), zoom, None);
    let delta = controller.animation().map(|a| a.delta()).unwrap();
    assert_relative_eq!(delta.theta, -0.1 * PI, epsilon = 1e-4);

    // halfway the camera has turned by -0.05π, never through +0.95π
    let duration = controller.animation().map(|a| a.duration_ms()).unwrap();
    clock.advance(duration * 0.5);
    controller.update();
    assert_relative_eq!(controller.azimuthal_angle(), start.theta - 0.05 * PI, epsilon = 1e-4);

    clock.advance(duration);
    controller.update();
    assert_relative_eq!(
        signed_remainder(controller.azimuthal_angle() - end.theta, 2.0 * PI),
        0.0,
        epsilon = 1e-4
    );
    assert_relative_eq!(controller.camera().position.coords, relative, epsilon = 1e-4);
}

#[test]
fn test_duration_never_below_floor() {
    let (mut controller, _) = scan_controller(OrbitSettings::scan_viewer());
    let relative = controller.camera().position - controller.target();
    let zoom = controller.camera().zoom;
    let target = controller.target();

    controller.animate_to_pose(&relative, &target, zoom, Some(0.0));
    let duration = controller.animation().map(|a| a.duration_ms());
    // a zero-length animation may already have finished during the first update
    assert!(duration.map_or(true, |d| d >= MIN_DURATION_MS));

    for view in CameraView::ALL {
        let orientation = view.orientation();
        controller.animate_to_pose(
            &orientation.relative_position(),
            &orientation.target,
            orientation.zoom,
            Some(2.5),
        );
        if let Some(animation) = controller.animation() {
            assert!(animation.duration_ms() >= MIN_DURATION_MS);
        }
    }
}

#[test]
fn test_capture_is_released_symmetrically() {
    let (mut controller, _) = scan_controller(OrbitSettings::scan_viewer());
    let starts = Rc::new(Cell::new(0));
    let ends = Rc::new(Cell::new(0));
    let s = starts.clone();
    controller.subscribe(ControlEvent::Start, move |_| s.set(s.get() + 1));
    let e = ends.clone();
    controller.subscribe(ControlEvent::End, move |_| e.set(e.get() + 1));

    for button in [PointerButton::Primary, PointerButton::Auxiliary] {
        controller.handle_input(&InputEvent::PointerDown { button, x: 10.0, y: 10.0 });
        // a second press during the drag does not capture twice
        controller.handle_input(&InputEvent::PointerDown { button, x: 10.0, y: 10.0 });
        assert!(controller.surface().pointer_captured());
        controller.handle_input(&InputEvent::PointerUp { button });
        assert!(!controller.surface().pointer_captured());
        // a stray release is ignored
        assert!(!controller.handle_input(&InputEvent::PointerUp { button }));
    }
    assert_eq!(starts.get(), 2);
    assert_eq!(ends.get(), 2);

    controller.handle_input(&InputEvent::TouchStart {
        touches: vec![Point2f::new(5.0, 5.0)],
    });
    controller.handle_input(&InputEvent::TouchEnd { touches: vec![] });
    controller.handle_input(&InputEvent::TouchEnd { touches: vec![] });
    assert_eq!(starts.get(), 3);
    assert_eq!(ends.get(), 3);
}

#[test]
fn test_change_listener_sees_camera_and_can_unsubscribe() {
    let (mut controller, _) = scan_controller(OrbitSettings::scan_viewer());
    let seen_zoom = Rc::new(Cell::new(0.0f32));
    let z = seen_zoom.clone();
    let handle = controller.subscribe(ControlEvent::Change, move |camera| z.set(camera.zoom));

    controller.handle_input(&InputEvent::Wheel { delta_y: -1.0 });
    assert_relative_eq!(seen_zoom.get(), controller.camera().zoom);

    assert!(controller.unsubscribe(handle));
    controller.handle_input(&InputEvent::Wheel { delta_y: -1.0 });
    assert!(seen_zoom.get() < controller.camera().zoom);
}

#[test]
fn test_picking_ray_from_controller_camera() {
    let (controller, _) = scan_controller(OrbitSettings::scan_viewer());
    let camera = controller.camera();
    let ray = camera.get_ray(&Point2f::new(0.0, 0.0));
    // the view centre passes close to the orbit target
    let to_target = controller.target() - ray.origin;
    let along = to_target.dot(&ray.direction);
    let closest = ray.at(along);
    assert!((closest - controller.target()).norm() < 1e-3);
}

/// Drag a quarter of the surface width to the right and release
fn flick(controller: &mut OrbitController) {
    controller.handle_input(&InputEvent::PointerDown {
        button: PointerButton::Primary,
        x: 320.0,
        y: 200.0,
    });
    controller.handle_input(&InputEvent::PointerMove { x: 480.0, y: 200.0 });
    controller.handle_input(&InputEvent::PointerUp {
        button: PointerButton::Primary,
    });
}

#[test]
fn test_damping_decays_released_drag() {
    let settings = OrbitSettings {
        enable_damping: true,
        damping_factor: 0.25,
        ..OrbitSettings::scan_viewer()
    };
    let (mut controller, clock) = scan_controller(settings);
    let before = controller.spherical().theta;
    flick(&mut controller);

    // the move itself applies the full delta before the first decay
    let delta = -2.0 * PI * 160.0 / 640.0 * 0.75;
    assert_relative_eq!(controller.spherical().theta - before, delta, epsilon = 1e-5);

    let mut theta = controller.spherical().theta;
    for n in 1..=6 {
        clock.advance(16.0);
        controller.update();
        let now = controller.spherical().theta;
        assert_relative_eq!(now - theta, delta * 0.75f32.powi(n), epsilon = 1e-5);
        theta = now;
    }
}

#[test]
fn test_released_drag_stops_without_damping() {
    let (mut controller, clock) = scan_controller(OrbitSettings::scan_viewer());
    let before = controller.spherical().theta;
    flick(&mut controller);

    let theta = controller.spherical().theta;
    assert_relative_eq!(theta - before, -2.0 * PI * 160.0 / 640.0 * 0.75, epsilon = 1e-5);
    for _ in 0..6 {
        clock.advance(16.0);
        controller.update();
        assert_eq!(controller.spherical().theta, theta);
    }
}
