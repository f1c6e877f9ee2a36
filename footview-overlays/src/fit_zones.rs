//! Fit-zone anchors and the markers shown on them
//!
//! Each foot has four anchors (toe, ball, instep, heel) derived from the
//! measurement descriptions. The annotator owns one marker per anchor and
//! keeps them stable across classification updates, so the render engine
//! only recolors existing markers once they are in the scene.

use crate::canvas::{world_to_canvas, CanvasPoint, Viewport};
use footview_camera::ProjectionCamera;
use footview_core::{
    rgb_from_hex, FitClassification, FitZone, FitZoneClassifications, FootPair, FootSide,
    MeasurementDescriptions, MeasurementType, Point3f, Result, Transform3D, Vector3f, ZoneMap,
};

/// Anchor position of every zone of both feet, in foot coordinates
pub type FitZoneAnchors = FootPair<ZoneMap<Point3f>>;

/// Canvas positions of every zone of both feet
pub type FitZoneCanvasPositions = FootPair<ZoneMap<CanvasPoint>>;

/// Edge length of a fit-zone marker, in metres
pub const FIT_ZONE_MARKER_SIZE: f32 = 0.01;

/// Tint of the zone belonging to the selected measurement
pub fn highlight_color() -> Vector3f {
    rgb_from_hex(0xb9dbe5)
}

/// Zone tint used when no fit information is shown
pub fn neutral_zone_color() -> Vector3f {
    Vector3f::new(1.0, 1.0, 1.0)
}

fn side_anchors(descriptions: &MeasurementDescriptions, side: FootSide) -> Result<ZoneMap<Point3f>> {
    let toe = descriptions.marker(side, "length", "toe")?;
    let heel = descriptions.marker(side, "length", "heel")?;
    let instep = descriptions.marker(side, "instep_height", "maxz")?;

    let lateral = descriptions.marker(side, "width", "width_lateral")?;
    let medial = descriptions.marker(side, "width", "width_medial")?;
    let forefoot_top = descriptions.marker(side, "forefoot_height", "maxz")?;
    let ball = nalgebra::center(&lateral, &medial) + Vector3f::new(0.0, 0.0, forefoot_top.z);

    Ok(ZoneMap {
        toe,
        ball,
        instep,
        heel,
    })
}

/// Derive the zone anchors of both feet.
///
/// Toe and heel come from the length markers and the instep from the top of
/// the instep height. The ball sits between the two width markers, raised to
/// the top of the forefoot.
pub fn compute_anchors(descriptions: &MeasurementDescriptions) -> Result<FitZoneAnchors> {
    Ok(FootPair::new(
        side_anchors(descriptions, FootSide::Left)?,
        side_anchors(descriptions, FootSide::Right)?,
    ))
}

/// Highlight of the zone related to a selected measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneHighlight {
    pub zone: FitZone,
    pub color: Vector3f,
    pub anchors: FootPair<Point3f>,
}

/// The zone to tint while `measurement_type` is selected, if it has one
pub fn measurement_highlight(
    measurement_type: MeasurementType,
    anchors: &FitZoneAnchors,
) -> Option<ZoneHighlight> {
    let zone = measurement_type.fit_zone()?;
    Some(ZoneHighlight {
        zone,
        color: highlight_color(),
        anchors: anchors.map(|_, zones| *zones.get(zone)),
    })
}

/// A small marker sitting on one zone anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitZoneMarker {
    pub side: FootSide,
    pub zone: FitZone,
    pub classification: FitClassification,
    pub position: Point3f,
    pub color: Vector3f,
}

/// Keeps the fit-zone markers of both feet in sync with classifications
#[derive(Debug, Clone, Default)]
pub struct FitZoneAnnotator {
    anchors: Option<FitZoneAnchors>,
    markers: FootPair<Vec<FitZoneMarker>>,
}

impl FitZoneAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors from the last successful update
    pub fn anchors(&self) -> Option<&FitZoneAnchors> {
        self.anchors.as_ref()
    }

    pub fn markers(&self, side: FootSide) -> &[FitZoneMarker] {
        self.markers.get(side)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.left.len() + self.markers.right.len()
    }

    pub fn has_markers(&self) -> bool {
        !self.markers.left.is_empty() && !self.markers.right.is_empty()
    }

    /// Create the markers, or recolor them if they already exist.
    ///
    /// Returns `true` when markers were created. Existing markers keep their
    /// position and only take the new classification and color.
    pub fn create_or_update(
        &mut self,
        classifications: &FitZoneClassifications,
        descriptions: &MeasurementDescriptions,
    ) -> Result<bool> {
        let anchors = compute_anchors(descriptions)?;
        let create = !self.has_markers();

        if create {
            self.markers = anchors.map(|side, zones| {
                zones
                    .iter()
                    .map(|(zone, position)| {
                        let classification = *classifications.get(zone);
                        FitZoneMarker {
                            side,
                            zone,
                            classification,
                            position: *position,
                            color: classification.color(),
                        }
                    })
                    .collect()
            });
        } else {
            for side in FootSide::ALL {
                for marker in self.markers.get_mut(side) {
                    marker.classification = *classifications.get(marker.zone);
                    marker.color = marker.classification.color();
                }
            }
        }

        self.anchors = Some(anchors);
        Ok(create)
    }

    /// Zone tints for the foot material
    pub fn zone_paint(classifications: &FitZoneClassifications) -> ZoneMap<Vector3f> {
        ZoneMap::from_fn(|zone| classifications.get(zone).paint_color())
    }

    /// Zone tints with fit information hidden
    pub fn cleared_paint() -> ZoneMap<Vector3f> {
        ZoneMap::from_fn(|_| neutral_zone_color())
    }

    /// Remove every marker
    pub fn clear(&mut self) {
        self.anchors = None;
        self.markers = FootPair::default();
    }

    /// Canvas positions of the markers of both feet.
    ///
    /// Returns `None` while either foot has no markers.
    pub fn project_to_canvas(
        &self,
        camera: &ProjectionCamera,
        viewport: &Viewport,
        world_from_side: &FootPair<Transform3D>,
    ) -> Option<FitZoneCanvasPositions> {
        if !self.has_markers() {
            log::warn!("fit zone positions requested before markers exist");
            return None;
        }

        Some(self.markers.map(|side, markers| {
            let world_from_foot = world_from_side.get(side);
            let mut positions = ZoneMap::from_fn(|_| CanvasPoint { x: 0.0, y: 0.0 });
            for marker in markers {
                let world = world_from_foot.transform_point(&marker.position);
                *positions.get_mut(marker.zone) = world_to_canvas(camera, &world, viewport);
            }
            positions
        }))
    }
}
