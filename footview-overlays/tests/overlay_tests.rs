//! Side policies of the measurement builder and fit-zone marker stability

use approx::assert_relative_eq;
use footview_core::*;
use footview_overlays::*;

fn foot_bounds() -> Aabb {
    Aabb::new(Point3f::new(-0.05, -0.12, 0.0), Point3f::new(0.05, 0.14, 0.08))
}

fn ruler_description(axis: [f32; 3], from: [f32; 3], to: [f32; 3], plane: Option<[f32; 4]>) -> MeasurementDescription {
    MeasurementDescription {
        axis,
        from,
        to,
        plane,
        markers: Default::default(),
        cross_section_bounds: None,
    }
}

#[test]
fn test_width_ruler_side_ignores_foot() {
    let builder = MeasurementGeometryBuilder::default();
    let width = ruler_description([1.0, 0.0, 0.0], [-0.045, 0.07, 0.0], [0.05, 0.09, 0.0], None);

    let left = builder
        .build_axis_ruler(FootSide::Left, DistanceType::Width, &width, &foot_bounds())
        .unwrap();
    let right = builder
        .build_axis_ruler(FootSide::Right, DistanceType::Width, &width, &foot_bounds())
        .unwrap();

    assert_relative_eq!(left.tangent, right.tangent);
    // x × z = -y, flipped towards the toes
    assert_relative_eq!(left.tangent, Vector3f::y());
    assert!(left.arrow.points.iter().all(|p| p.y > 0.14));
}

#[test]
fn test_half_width_side_follows_axis() {
    let builder = MeasurementGeometryBuilder::default();
    let plane = Some([0.0, 1.0, 0.0, -0.06]);

    for (axis_x, side) in [(1.0, FootSide::Left), (-1.0, FootSide::Left), (1.0, FootSide::Right), (-1.0, FootSide::Right)] {
        let half = ruler_description(
            [axis_x, 0.0, 0.0],
            [0.0, 0.06, 0.03],
            [0.045 * axis_x, 0.06, 0.02],
            plane,
        );
        let ruler = builder
            .build_axis_ruler(side, DistanceType::HalfWidth, &half, &foot_bounds())
            .unwrap();

        // axis × +y is +z for either axis sign once the flip is applied
        assert_relative_eq!(ruler.tangent, Vector3f::z(), epsilon = 1e-6);
        let flip = ruler.tangent.dot(&Vector3f::new(axis_x, 0.0, 0.0).cross(&Vector3f::y()));
        assert_eq!(flip.signum(), axis_x.signum());

        // drawn over the lowered box, all in the measurement plane
        for point in &ruler.arrow.points {
            assert_relative_eq!(point.y, 0.06, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_ruler_stoplines_are_perpendicular_to_arrow() {
    let builder = MeasurementGeometryBuilder::default();
    let length = ruler_description([0.0, 1.0, 0.0], [0.0, -0.12, 0.0], [0.0, 0.14, 0.0], None);
    let ruler = builder
        .build_axis_ruler(FootSide::Right, DistanceType::Length, &length, &foot_bounds())
        .unwrap();
    for [start, end] in ruler.stopline_endpoints() {
        assert_relative_eq!((end - start).normalize().dot(&ruler.cotangent), 0.0, epsilon = 1e-6);
    }
}

fn zone_descriptions() -> MeasurementDescriptions {
    let json = r#"{
        "left_length": {"axis": [0,1,0], "from": [0,0,0], "to": [0,0,0],
            "markers": {"toe": [0, 0.14, 0.02], "heel": [0, -0.12, 0.03]}},
        "left_instep_height": {"axis": [0,0,1], "from": [0,0,0], "to": [0,0,0],
            "markers": {"maxz": [0, 0.0, 0.07]}},
        "left_width": {"axis": [1,0,0], "from": [0,0,0], "to": [0,0,0],
            "markers": {"width_lateral": [-0.05, 0.08, 0], "width_medial": [0.045, 0.06, 0]}},
        "left_forefoot_height": {"axis": [0,0,1], "from": [0,0,0], "to": [0,0,0],
            "markers": {"maxz": [0, 0.07, 0.045]}},
        "right_length": {"axis": [0,1,0], "from": [0,0,0], "to": [0,0,0],
            "markers": {"toe": [0, 0.14, 0.02], "heel": [0, -0.12, 0.03]}},
        "right_instep_height": {"axis": [0,0,1], "from": [0,0,0], "to": [0,0,0],
            "markers": {"maxz": [0, 0.0, 0.07]}},
        "right_width": {"axis": [1,0,0], "from": [0,0,0], "to": [0,0,0],
            "markers": {"width_lateral": [0.05, 0.08, 0], "width_medial": [-0.045, 0.06, 0]}},
        "right_forefoot_height": {"axis": [0,0,1], "from": [0,0,0], "to": [0,0,0],
            "markers": {"maxz": [0, 0.07, 0.045]}}
    }"#;
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_marker_count_stable_across_updates() {
    let descriptions = zone_descriptions();
    let mut annotator = FitZoneAnnotator::new();

    let sequence: Vec<FitZoneClassifications> = vec![
        serde_json::from_str(r#"{"toe": "great", "ball": "great", "instep": "great", "heel": "great"}"#).unwrap(),
        serde_json::from_str(r#"{"toe": "tight", "ball": "snug", "instep": "roomy", "heel": "loose"}"#).unwrap(),
        serde_json::from_str(r#"{"toe": "unknown", "ball": "tight", "instep": "great", "heel": "snug"}"#).unwrap(),
    ];

    let mut positions = Vec::new();
    for (i, classifications) in sequence.iter().enumerate() {
        let created = annotator.create_or_update(classifications, &descriptions).unwrap();
        assert_eq!(created, i == 0);
        assert_eq!(annotator.marker_count(), 8);
        for side in FootSide::ALL {
            for marker in annotator.markers(side) {
                assert_eq!(marker.classification, *classifications.get(marker.zone));
                assert_eq!(marker.side, side);
            }
        }
        positions.push(annotator.markers(FootSide::Right).iter().map(|m| m.position).collect::<Vec<_>>());
    }
    assert!(positions.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_zone_canvas_positions_follow_camera() {
    let descriptions = zone_descriptions();
    let mut annotator = FitZoneAnnotator::new();
    annotator
        .create_or_update(&FitZoneClassifications::default(), &descriptions)
        .unwrap();

    let mut camera = footview_camera::ProjectionCamera::new(60.0, 1.5, 0.05, 1.5);
    camera.up = Vector3f::z();
    camera.position = Point3f::new(0.0, -0.5, 0.3);
    camera.look_at(&Point3f::origin());

    let feet = FootPair::new(
        Transform3D::translation(Vector3f::new(-0.06, -0.2, 0.0)),
        Transform3D::translation(Vector3f::new(0.06, -0.2, 0.0)),
    );
    let viewport = Viewport::new(600.0, 400.0);
    let positions = annotator.project_to_canvas(&camera, &viewport, &feet).unwrap();

    // seen from behind the heels, the toes are further up the screen
    assert!(positions.left.toe.y < positions.left.heel.y);
    assert!(positions.left.toe.x < positions.right.toe.x);
}
