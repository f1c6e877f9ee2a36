//! End-to-end behavior of the foot view on the headless backend

use approx::assert_relative_eq;
use footview_camera::{CameraView, ControlEvent, FixedSurface, InputEvent};
use footview_core::*;
use footview_io::{BmfDocument, BmfGroup, BmfWriter, MemorySource, ScanAssets};
use footview_render::*;
use std::cell::RefCell;
use std::rc::Rc;

type TestView = FootView<HeadlessBackend, ManualFrames>;

fn foot_bmf() -> Vec<u8> {
    let document = BmfDocument {
        positions: vec![
            [-0.04, -0.12, 0.0],
            [0.04, -0.12, 0.0],
            [0.04, 0.14, 0.0],
            [-0.04, 0.14, 0.0],
            [0.0, 0.0, 0.07],
        ],
        colors: None,
        groups: vec![BmfGroup {
            material_name: Some("skin".to_string()),
            faces: vec![[0, 2, 1], [0, 3, 2], [0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
            uvs: None,
            normals: None,
        }],
    };
    BmfWriter::encode(&document).unwrap()
}

const SCENE_JSON: &str = r#"{
    "world_from_foot": {
        "left":  [[1,0,0,-0.07],[0,1,0,-0.2],[0,0,1,0],[0,0,0,1]],
        "right": [[1,0,0,0.07],[0,1,0,-0.2],[0,0,1,0],[0,0,0,1]]
    },
    "world_from_ground": [[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]]
}"#;

const MESH_LINES_JSON: &str = r#"{
    "vertices": [[0, -0.1, 0.01], [0, 0.1, 0.01], [0.02, 0.0, 0.03]],
    "edges": [[0, 1], [1, 2]]
}"#;

fn scan_source() -> MemorySource {
    MemorySource::new()
        .with(&ScanAssets::mesh(FootSide::Left), foot_bmf())
        .with(&ScanAssets::mesh(FootSide::Right), foot_bmf())
        .with(ScanAssets::SCENE, SCENE_JSON.as_bytes().to_vec())
        .with(ScanAssets::GROUND, vec![0x89, b'P', b'N', b'G'])
        .with(&ScanAssets::mesh_lines(FootSide::Left), MESH_LINES_JSON.as_bytes().to_vec())
}

fn descriptions() -> MeasurementDescriptions {
    let mut json = String::from("{");
    for (i, side) in ["left", "right"].iter().enumerate() {
        let sign = if i == 0 { 1.0 } else { -1.0 };
        if i > 0 {
            json.push(',');
        }
        json.push_str(&format!(
            r#""{side}_length": {{"axis": [0,1,0], "from": [0,-0.12,0], "to": [0,0.14,0],
                "markers": {{"toe": [0, 0.14, 0.02], "heel": [0, -0.12, 0.03]}}}},
            "{side}_width": {{"axis": [1,0,0], "from": [-0.04,0.07,0], "to": [0.04,0.09,0],
                "markers": {{"width_lateral": [{lat}, 0.08, 0], "width_medial": [{med}, 0.06, 0]}}}},
            "{side}_instep_height": {{"axis": [0,0,1], "from": [0,0,0], "to": [0,0,0.07],
                "markers": {{"maxz": [0, 0.0, 0.07]}}}},
            "{side}_forefoot_height": {{"axis": [0,0,1], "from": [0,0.07,0], "to": [0,0.07,0.045],
                "markers": {{"maxz": [0, 0.07, 0.045]}}}},
            "{side}_ball_girth": {{"axis": [1,0,0], "from": [0,0.07,0], "to": [0,0.07,0],
                "plane": [0, 2, 0, -0.14],
                "cross_section_bounds": {{"tangent": [1,0,0], "cotangent": [0,0,1],
                    "tangent_min": -0.04, "tangent_max": 0.04,
                    "cotangent_min": 0.0, "cotangent_max": 0.05}}}}"#,
            lat = -0.05 * sign,
            med = 0.045 * sign,
        ));
    }
    json.push('}');
    serde_json::from_str(&json).unwrap()
}

fn classifications(json: &str) -> FitZoneClassifications {
    serde_json::from_str(json).unwrap()
}

struct Harness {
    view: TestView,
    clock: Rc<ManualClock>,
    container: SharedContainer,
}

fn harness(config: ViewConfig, variant: ViewVariant, size: SurfaceSize) -> Harness {
    let clock = Rc::new(ManualClock::new(1_000.0));
    let container = SharedContainer::new(size);
    let host = ViewHost {
        container: Box::new(container.clone()),
        surface: Box::new(FixedSurface::new(size.width as f32, size.height as f32)),
        clock: clock.clone(),
    };
    let view = FootView::new(config, variant, HeadlessBackend::new(), ManualFrames::new(), host);
    Harness { view, clock, container }
}

fn loaded_harness() -> Harness {
    let mut harness = harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    harness.view.load_from_source(&scan_source()).unwrap();
    harness
}

/// Run the pending frame request the way a display loop would
fn run_frame(harness: &mut Harness) {
    assert!(harness.view.frames_mut().take_pending());
    harness.view.paint();
}

/// Paint ten seconds of frames, long enough for any camera animation
fn settle(harness: &mut Harness) {
    for _ in 0..200 {
        harness.clock.advance(50.0);
        run_frame(harness);
    }
}

#[test]
fn test_full_session_releases_every_resource() {
    let mut harness = loaded_harness();
    let descriptions = descriptions();

    for _ in 0..3 {
        harness.clock.advance(16.0);
        run_frame(&mut harness);
    }
    harness.view.show_description(FootSide::Left, "length", &descriptions);
    harness.view.show_description(FootSide::Right, "ball_girth", &descriptions);
    harness.view.show_description_notes(FootSide::Left, "width", &descriptions, |_| {});
    harness
        .view
        .show_fit_zones(&FitZoneClassifications::default(), &descriptions, |_| {})
        .unwrap();
    run_frame(&mut harness);

    let before = harness.view.backend().counts();
    assert!(before.geometries > 0);
    assert_eq!(before.render_targets, 1);

    harness.view.dispose();
    assert!(harness.view.is_disposed());
    assert!(harness.view.backend().is_disposed());
    assert_eq!(harness.view.backend().counts().total(), 0);
    assert!(!harness.view.frames().has_pending());
    assert_eq!(harness.view.frames().cancelled_count(), 1);
    assert_eq!(harness.view.controls().listener_count(ControlEvent::Change), 0);

    // a second dispose is a no-op
    harness.view.dispose();
    assert_eq!(harness.view.frames().cancelled_count(), 1);
}

#[test]
fn test_loads_after_dispose_are_ignored() {
    let mut harness = harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    let liveness = harness.view.liveness();
    assert!(liveness.is_alive());

    harness.view.dispose();
    assert!(!liveness.is_alive());

    let groups = footview_io::BmfDecoder::decode(&foot_bmf()).unwrap();
    let nodes = harness.view.scene().node_count();
    harness.view.load_foot_mesh(FootSide::Left, groups);
    harness.view.load_ground(Some(vec![1, 2, 3]));
    harness.view.on_feet_loaded();
    harness.view.paint();

    assert_eq!(harness.view.scene().node_count(), nodes);
    assert_eq!(harness.view.backend().counts().total(), 0);
    assert_eq!(harness.view.backend().frames_rendered(), 0);
}

#[test]
fn test_missing_mesh_is_an_error() {
    let mut harness = harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    let source = MemorySource::new().with(&ScanAssets::mesh(FootSide::Left), foot_bmf());
    assert!(matches!(
        harness.view.load_from_source(&source),
        Err(RenderError::Asset(_))
    ));
}

#[test]
fn test_optional_assets_may_be_missing() {
    let mut harness = harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    let source = MemorySource::new()
        .with(&ScanAssets::mesh(FootSide::Left), foot_bmf())
        .with(&ScanAssets::mesh(FootSide::Right), foot_bmf());
    harness.view.load_from_source(&source).unwrap();

    let scene = harness.view.scene();
    for side in FootSide::ALL {
        let foot = harness.view.foot_root(side);
        assert!(scene.find_child(foot, "foot").is_some());
        assert!(scene.find_child(foot, "meshlines").is_none());
        // default placement kept
        assert_relative_eq!(
            scene.node(foot).unwrap().transform.translation_part(),
            *harness.view.config().foot_positions.get(side)
        );
    }
}

#[test]
fn test_broken_side_files_do_not_block_reveal() {
    let mut harness = harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    let source = MemorySource::new()
        .with(&ScanAssets::mesh(FootSide::Left), foot_bmf())
        .with(&ScanAssets::mesh(FootSide::Right), foot_bmf())
        .with(ScanAssets::SCENE, b"{ not json".to_vec())
        .with(&ScanAssets::mesh_lines(FootSide::Left), b"[1, 2".to_vec());
    harness.view.load_from_source(&source).unwrap();

    assert!(harness.view.controls().animation().is_some());
    let scene = harness.view.scene();
    for side in FootSide::ALL {
        let foot = harness.view.foot_root(side);
        assert!(scene.find_child(foot, "foot").is_some());
        assert!(scene.find_child(foot, "meshlines").is_none());
        assert_relative_eq!(
            scene.node(foot).unwrap().transform.translation_part(),
            *harness.view.config().foot_positions.get(side)
        );
    }
}

#[test]
fn test_mesh_failure_leaves_scene_untouched() {
    let mut harness = harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    let source = MemorySource::new()
        .with(&ScanAssets::mesh(FootSide::Left), foot_bmf())
        .with(&ScanAssets::mesh(FootSide::Right), vec![0u8; 7]);
    assert!(matches!(
        harness.view.load_from_source(&source),
        Err(RenderError::Asset(_))
    ));

    let scene = harness.view.scene();
    for side in FootSide::ALL {
        assert!(scene.find_child(harness.view.foot_root(side), "foot").is_none());
    }
    assert!(harness.view.controls().animation().is_none());
}

#[test]
fn test_scene_file_places_feet_and_ground() {
    let harness = loaded_harness();
    let scene = harness.view.scene();

    let left = scene.node(harness.view.foot_root(FootSide::Left)).unwrap();
    assert_relative_eq!(left.transform.translation_part(), Vector3f::new(-0.07, -0.2, 0.0));

    let right = harness.view.foot_root(FootSide::Right);
    assert!(scene.find_child(harness.view.foot_root(FootSide::Left), "meshlines").is_some());
    assert!(scene.find_child(right, "meshlines").is_none());

    let ground = scene.descendants(scene.root()).into_iter().find(|id| {
        scene.node(*id).is_some_and(|node| node.name == "ground")
    });
    let ground = scene.node(ground.unwrap()).unwrap();
    assert_eq!(ground.render_order, -10);
    let material = scene.material(harness.view.ground_material()).unwrap();
    assert_eq!(material.texture.as_deref(), Some(&[0x89, b'P', b'N', b'G'][..]));
}

#[test]
fn test_zero_sized_container_skips_resize() {
    let mut harness = harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(0, 0, 1.0));
    assert_eq!(harness.view.backend().size(), (0, 0));
    assert!(harness.view.render_target().is_none());
    assert!(!harness.view.update_renderer_size());

    harness.container.set(SurfaceSize::new(320, 240, 1.0));
    assert!(harness.view.has_renderer_size_changed());
    assert!(harness.view.update_renderer_size());
    assert_eq!(harness.view.backend().size(), (320, 240));
    assert!(!harness.view.has_renderer_size_changed());
}

#[test]
fn test_supersampled_render_target() {
    let harness = harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    let view = &harness.view;
    assert_relative_eq!(view.supersampling(), 2.0);
    let target = view.render_target().unwrap();
    assert_eq!(view.backend().render_target_size(target), Some((1200, 800)));

    let retina = self::harness(ViewConfig::detailed(), ViewVariant::scan(), SurfaceSize::new(600, 400, 2.0));
    let target = retina.view.render_target().unwrap();
    // 600 * 2 * sqrt(2) = 1697.05
    assert_eq!(retina.view.backend().render_target_size(target), Some((1697, 1131)));

    let mut config = ViewConfig::detailed();
    config.supersampling = false;
    let plain = self::harness(config, ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    assert!(plain.view.render_target().is_none());
    assert_eq!(plain.view.supersampling(), 1.0);
}

#[test]
fn test_paint_renders_offscreen_and_reschedules() {
    let mut harness = loaded_harness();
    let scheduled = harness.view.frames().scheduled_count();
    run_frame(&mut harness);

    let backend = harness.view.backend();
    assert_eq!(backend.frames_rendered(), 1);
    assert_eq!(backend.offscreen_frames(), 1);
    assert_eq!(backend.copies(), 1);
    assert!(backend.last_frame().unwrap().draw_count > 0);
    assert!(harness.view.frames().has_pending());
    assert_eq!(harness.view.frames().scheduled_count(), scheduled + 1);
}

#[test]
fn test_resize_is_debounced() {
    let mut harness = loaded_harness();
    run_frame(&mut harness);
    let target = harness.view.render_target().unwrap();

    harness.container.set(SurfaceSize::new(800, 500, 1.0));
    harness.clock.advance(100.0);
    run_frame(&mut harness);
    assert_eq!(harness.view.backend().size(), (600, 400));

    harness.clock.advance(200.0);
    run_frame(&mut harness);
    assert_eq!(harness.view.backend().size(), (600, 400));

    harness.clock.advance(250.0);
    run_frame(&mut harness);
    assert_eq!(harness.view.backend().size(), (800, 500));
    assert_relative_eq!(harness.view.camera().aspect, 1.6);

    let resized = harness.view.render_target().unwrap();
    assert_ne!(resized, target);
    assert_eq!(harness.view.backend().render_target_size(resized), Some((1600, 1000)));
    assert_eq!(harness.view.backend().counts().render_targets, 1);
}

#[test]
fn test_reveal_uniforms_follow_clock() {
    let mut harness = loaded_harness();
    run_frame(&mut harness);

    let detailed = harness.view.detailed_material(FootSide::Left);
    let cutoff = |view: &TestView| view.scene().material(detailed).unwrap().float(uniforms::CUTOFF_HEIGHT).unwrap();
    assert_relative_eq!(cutoff(&harness.view), -0.04);

    harness.clock.advance(1_500.0);
    run_frame(&mut harness);
    assert_relative_eq!(cutoff(&harness.view), 0.02, epsilon = 1e-6);

    let ground = harness.view.scene().material(harness.view.ground_material()).unwrap();
    assert_relative_eq!(ground.float(uniforms::LEFT).unwrap(), 0.75, epsilon = 1e-6);

    harness.view.set_foot_visible(FootSide::Right, false);
    run_frame(&mut harness);
    let ground = harness.view.scene().material(harness.view.ground_material()).unwrap();
    assert_eq!(ground.float(uniforms::RIGHT), Some(0.0));
}

#[test]
fn test_ruler_and_girth_uniforms() {
    let mut harness = loaded_harness();
    let descriptions = descriptions();
    let left = harness.view.detailed_material(FootSide::Left);
    let right = harness.view.detailed_material(FootSide::Right);

    harness.view.show_description(FootSide::Left, "length", &descriptions);
    harness.view.show_description(FootSide::Right, "ball_girth", &descriptions);

    let scene = harness.view.scene();
    let left_material = scene.material(left).unwrap();
    assert_ne!(left_material.vec3(uniforms::STOPLINE1_P1), Some(hidden_stopline_point().coords));
    assert_eq!(left_material.vec4(uniforms::GIRTH_PLANE), Some(hidden_girth_plane()));

    // the plane is normalized before it reaches the shader
    let right_material = scene.material(right).unwrap();
    assert_relative_eq!(
        right_material.vec4(uniforms::GIRTH_PLANE).unwrap(),
        Vector4f::new(0.0, 1.0, 0.0, -0.07),
        epsilon = 1e-6
    );
    assert_eq!(right_material.vec3(uniforms::STOPLINE1_P1), Some(hidden_stopline_point().coords));

    // unsupported ids are skipped
    let nodes = scene.node_count();
    harness.view.show_description(FootSide::Left, "toe_angle", &descriptions);
    assert_eq!(harness.view.scene().node_count(), nodes);

    harness.view.remove_descriptions();
    let scene = harness.view.scene();
    for handle in [left, right] {
        let material = scene.material(handle).unwrap();
        for name in uniforms::STOPLINES.iter().flatten() {
            assert_eq!(material.vec3(name), Some(hidden_stopline_point().coords));
        }
        assert_eq!(material.vec4(uniforms::GIRTH_PLANE), Some(hidden_girth_plane()));
    }
    let descriptions_root = scene.find_child(harness.view.foot_root(FootSide::Left), "descriptions").unwrap();
    assert!(scene.children(descriptions_root).is_empty());
}

#[test]
fn test_notes_highlight_zone_and_report_positions() {
    let mut harness = loaded_harness();
    let descriptions = descriptions();
    let reports: Rc<RefCell<Vec<InfoPointCanvasPositionsSnapshot>>> = Rc::default();

    let sink = reports.clone();
    harness.view.show_description_notes(FootSide::Left, "width", &descriptions, move |positions| {
        sink.borrow_mut().push(snapshot(positions));
    });
    // one foot only, nothing to report yet
    assert!(reports.borrow().is_empty());

    let sink = reports.clone();
    harness.view.show_description_notes(FootSide::Right, "width", &descriptions, move |positions| {
        sink.borrow_mut().push(snapshot(positions));
    });
    assert_eq!(reports.borrow().len(), 1);
    assert_eq!(reports.borrow()[0].left, vec!["width_lateral", "width_medial"]);
    assert_eq!(harness.view.controls().listener_count(ControlEvent::Change), 1);

    let material = harness.view.scene().material(harness.view.detailed_material(FootSide::Left)).unwrap();
    assert_eq!(
        material.vec3(&zone_color_uniform(FitZone::Ball)),
        Some(footview_overlays::highlight_color())
    );

    // a camera move reports again
    harness.view.handle_input(&InputEvent::Wheel { delta_y: 100.0 });
    run_frame(&mut harness);
    assert!(reports.borrow().len() >= 2);

    harness.view.remove_descriptions();
    assert_eq!(harness.view.controls().listener_count(ControlEvent::Change), 0);
    let material = harness.view.scene().material(harness.view.detailed_material(FootSide::Left)).unwrap();
    assert_eq!(material.vec3(&zone_color_uniform(FitZone::Ball)), Some(Vector3f::new(1.0, 1.0, 1.0)));
}

#[derive(Debug, Clone, PartialEq)]
struct InfoPointCanvasPositionsSnapshot {
    left: Vec<String>,
    right: Vec<String>,
}

fn snapshot(positions: &footview_overlays::InfoPointCanvasPositions) -> InfoPointCanvasPositionsSnapshot {
    InfoPointCanvasPositionsSnapshot {
        left: positions.left.keys().cloned().collect(),
        right: positions.right.keys().cloned().collect(),
    }
}

#[test]
fn test_fit_zone_listener_lifecycle() {
    let mut harness = loaded_harness();
    let descriptions = descriptions();
    let calls = Rc::new(RefCell::new(0usize));
    let count_change = |view: &TestView| view.controls().listener_count(ControlEvent::Change);
    assert_eq!(count_change(&harness.view), 0);

    let sink = calls.clone();
    harness
        .view
        .show_fit_zones(&classifications(r#"{"toe": "tight", "ball": "great", "instep": "great", "heel": "great"}"#), &descriptions, move |_| {
            *sink.borrow_mut() += 1;
        })
        .unwrap();
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(count_change(&harness.view), 1);
    assert_eq!(harness.view.color_mode(), ColorMode::FitZones);

    let marker_nodes = |view: &TestView| {
        FootSide::ALL
            .iter()
            .map(|side| {
                let fit_zones = view.scene().find_child(view.foot_root(*side), "fit_zones").unwrap();
                view.scene().children(fit_zones).len()
            })
            .sum::<usize>()
    };
    assert_eq!(marker_nodes(&harness.view), 8);
    let materials = harness.view.scene().material_count();

    let sink = calls.clone();
    harness
        .view
        .show_fit_zones(&classifications(r#"{"toe": "loose", "ball": "great", "instep": "roomy", "heel": "snug"}"#), &descriptions, move |_| {
            *sink.borrow_mut() += 1;
        })
        .unwrap();
    assert_eq!(*calls.borrow(), 2);
    assert_eq!(count_change(&harness.view), 1);
    assert_eq!(marker_nodes(&harness.view), 8);
    assert_eq!(harness.view.scene().material_count(), materials);

    let toe = *harness
        .view
        .annotator()
        .markers(FootSide::Left)
        .iter()
        .find(|marker| marker.zone == FitZone::Toe)
        .unwrap();
    assert_eq!(toe.classification, FitClassification::Loose);

    harness.view.remove_fit_zones();
    assert_eq!(count_change(&harness.view), 0);
    assert_eq!(marker_nodes(&harness.view), 0);
    assert_eq!(harness.view.color_mode(), ColorMode::Default);
    assert!(!harness.view.annotator().has_markers());
}

#[test]
fn test_fit_zones_need_anchor_markers() {
    let mut harness = loaded_harness();
    let empty: MeasurementDescriptions = serde_json::from_str("{}").unwrap();
    let result = harness
        .view
        .show_fit_zones(&FitZoneClassifications::default(), &empty, |_| {});
    assert!(result.is_err());
    assert_eq!(harness.view.controls().listener_count(ControlEvent::Change), 0);
}

#[test]
fn test_camera_settles_on_initial_view() {
    let mut harness = loaded_harness();
    let expected = CameraView::Initial.orientation().zoom;
    settle(&mut harness);
    assert_relative_eq!(harness.view.camera().zoom, expected, epsilon = 1e-4);

    assert!(matches!(
        harness.view.animate_to_named("sideways"),
        Err(RenderError::UnknownView(_))
    ));
    harness.view.animate_to_named("top_view").unwrap();
}

#[test]
fn test_orbit_target_follows_visible_feet() {
    let mut harness = loaded_harness();
    settle(&mut harness);
    assert_relative_eq!(harness.view.visible_center(), Point3f::origin());
    assert_relative_eq!(harness.view.controls().target(), Point3f::origin(), epsilon = 1e-5);

    harness.view.set_foot_visible(FootSide::Left, false);
    assert_relative_eq!(harness.view.visible_center(), Point3f::new(0.07, 0.0, 0.0));
    settle(&mut harness);
    assert_relative_eq!(harness.view.controls().target(), Point3f::new(0.07, 0.0, 0.0), epsilon = 1e-5);

    harness.view.set_foot_visible(FootSide::Right, false);
    assert_relative_eq!(harness.view.visible_center(), Point3f::origin());
}

#[test]
fn test_onboarding_variant_shifts_scene() {
    let mut harness = harness(ViewConfig::detailed(), ViewVariant::onboarding(), SurfaceSize::new(600, 400, 1.0));
    harness.view.load_from_source(&scan_source()).unwrap();
    settle(&mut harness);

    let left = harness.view.scene().node(harness.view.foot_root(FootSide::Left)).unwrap();
    assert_relative_eq!(left.transform.translation_part(), Vector3f::new(0.13, -0.1, 0.0), epsilon = 1e-6);
    // scene center 0.2 plus the extra onboarding target shift
    assert_relative_eq!(harness.view.controls().target(), Point3f::new(0.4, 0.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_wireframe_style_builds_own_materials() {
    let config = ViewConfig::default();
    assert!(config.style.wireframe);
    let mut harness = harness(config, ViewVariant::scan(), SurfaceSize::new(600, 400, 1.0));
    let retained = harness.view.scene().material_count();
    harness.view.load_from_source(&scan_source()).unwrap();

    let scene = harness.view.scene();
    let foot = scene.find_child(harness.view.foot_root(FootSide::Left), "foot").unwrap();
    assert!(scene.find_child(foot, "wireframe").is_some());
    // matte plus wireframe per foot; no scene file or mesh lines without detail
    assert_eq!(scene.material_count(), retained + 4);
    assert!(scene.find_child(harness.view.foot_root(FootSide::Left), "meshlines").is_none());

    // feet are centered along their length
    let left = scene.node(harness.view.foot_root(FootSide::Left)).unwrap();
    assert_relative_eq!(left.transform.translation_part().y, -0.01, epsilon = 1e-6);

    harness.view.dispose();
    assert_eq!(harness.view.backend().counts().total(), 0);
}
