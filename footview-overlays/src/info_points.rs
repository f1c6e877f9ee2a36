//! Clickable markers at the named points of a measurement

use crate::canvas::{world_to_canvas, CanvasPoint, Viewport};
use footview_camera::ProjectionCamera;
use footview_core::{
    rgb_from_hex, FootPair, MeasurementDescription, MeasurementType, Point3f, Transform3D, Vector3f,
};
use std::collections::BTreeMap;

/// Edge length of an info point quad, in metres
pub const INFO_POINT_SIZE: f32 = 0.01;

/// Fill color of info points
pub fn info_point_color() -> Vector3f {
    rgb_from_hex(0x1cb5d1)
}

/// A marker placed on one foot, in foot coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPoint {
    pub measurement_type: MeasurementType,
    pub marker: String,
    pub position: Point3f,
}

/// One info point per named marker of `description`, in marker-name order
pub fn measurement_info_points(
    measurement_type: MeasurementType,
    description: &MeasurementDescription,
) -> Vec<InfoPoint> {
    description
        .markers
        .iter()
        .map(|(name, position)| InfoPoint {
            measurement_type,
            marker: name.clone(),
            position: Point3f::new(position[0], position[1], position[2]),
        })
        .collect()
}

/// Canvas positions of info points, keyed by marker name
pub type InfoPointCanvasPositions = FootPair<BTreeMap<String, CanvasPoint>>;

/// Project the info points of both feet into canvas pixels.
///
/// `world_from_side` maps each foot's coordinates into the world. Returns
/// `None` while either foot has no info points.
pub fn project_info_points(
    points: &FootPair<Vec<InfoPoint>>,
    world_from_side: &FootPair<Transform3D>,
    camera: &ProjectionCamera,
    viewport: &Viewport,
) -> Option<InfoPointCanvasPositions> {
    if points.left.is_empty() || points.right.is_empty() {
        log::debug!("info points requested before both feet have markers");
        return None;
    }

    Some(points.map(|side, side_points| {
        let world_from_foot = world_from_side.get(side);
        side_points
            .iter()
            .map(|point| {
                let world = world_from_foot.transform_point(&point.position);
                (point.marker.clone(), world_to_canvas(camera, &world, viewport))
            })
            .collect()
    }))
}
