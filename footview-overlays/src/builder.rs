//! Measurement geometry for the selected measurement of a foot

use crate::plane_rect::{plane_rectangle, PlaneRectangle, PLANE_PADDING};
use crate::ruler::{axis_ruler, RulerGeometry, RulerPadding};
use footview_core::{
    Aabb, DistanceType, Error, FootSide, GirthType, MeasurementDescription, MeasurementDescriptions,
    MeasurementType, Plane, Point3f, Result,
};
use serde::{Deserialize, Serialize};

/// What a measurement is drawn as
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementGeometry {
    Ruler(RulerGeometry),
    Girth {
        plane: Plane,
        /// Outline around the cross-section, when its bounds are known
        rectangle: Option<PlaneRectangle>,
    },
}

impl MeasurementGeometry {
    pub fn ruler(&self) -> Option<&RulerGeometry> {
        match self {
            MeasurementGeometry::Ruler(ruler) => Some(ruler),
            MeasurementGeometry::Girth { .. } => None,
        }
    }

    pub fn girth_plane(&self) -> Option<&Plane> {
        match self {
            MeasurementGeometry::Girth { plane, .. } => Some(plane),
            MeasurementGeometry::Ruler(_) => None,
        }
    }
}

/// Builds rulers and girth outlines from measurement descriptions.
///
/// Building is pure: the caller owns the result and replaces it when the
/// selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementGeometryBuilder {
    pub padding: RulerPadding,
    pub plane_padding: f32,
}

impl Default for MeasurementGeometryBuilder {
    fn default() -> Self {
        Self {
            padding: RulerPadding::default(),
            plane_padding: PLANE_PADDING,
        }
    }
}

impl MeasurementGeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the ruler of a distance measurement.
    ///
    /// `bounds` is the foot's bounding box in foot coordinates. Lengths and
    /// heights sit on the outer side of each foot, widths always on the toe
    /// side and heel widths always on the heel side. Half widths are drawn
    /// over the foot on the side their axis points to.
    pub fn build_axis_ruler(
        &self,
        side: FootSide,
        distance: DistanceType,
        description: &MeasurementDescription,
        bounds: &Aabb,
    ) -> Result<RulerGeometry> {
        let axis = description.axis_vector();
        let mut from = description.from_point();
        let to = description.to_point();
        let mut plane = description.reference_plane().unwrap_or_else(Plane::ground);
        let mut bounds = *bounds;
        let mut padding = self.padding;

        let side_flip = match distance {
            DistanceType::Length => side.sign(),
            DistanceType::Width => -1.0,
            DistanceType::HalfWidth => {
                bounds = half_width_bounds(&bounds, description);
                padding = padding.half_width();
                if description.axis[0] > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            DistanceType::HeelWidth => {
                plane = Plane::ground();
                1.0
            }
            DistanceType::Height => {
                // The floor point of a height is unstable
                from = Point3f::new(to.x, to.y, 0.0);
                side.sign()
            }
        };

        axis_ruler(&axis, &from, &to, &plane, &bounds, side_flip, &padding)
    }

    /// Build the cutting plane of a girth measurement and, when the
    /// description carries cross-section bounds, the outline around it.
    pub fn build_plane_rectangle(
        &self,
        side: FootSide,
        girth: GirthType,
        description: &MeasurementDescription,
    ) -> Result<MeasurementGeometry> {
        let plane = description.reference_plane().ok_or_else(|| {
            Error::InvalidData(format!("{side} {girth:?} description has no plane"))
        })?;
        let rectangle = description
            .cross_section_bounds
            .map(|bounds| plane_rectangle(&plane, &bounds, self.plane_padding));
        Ok(MeasurementGeometry::Girth { plane, rectangle })
    }

    /// Build whatever `measurement_id` is drawn as
    pub fn build(
        &self,
        side: FootSide,
        measurement_id: &str,
        description: &MeasurementDescription,
        bounds: &Aabb,
    ) -> Result<MeasurementGeometry> {
        match MeasurementType::from_id(measurement_id) {
            Some(MeasurementType::Distance(distance)) => self
                .build_axis_ruler(side, distance, description, bounds)
                .map(MeasurementGeometry::Ruler),
            Some(MeasurementType::Girth(girth)) => self.build_plane_rectangle(side, girth, description),
            None => Err(Error::UnsupportedMeasurement(measurement_id.to_string())),
        }
    }

    /// Look up and build a measurement, logging and skipping anything that
    /// cannot be drawn
    pub fn build_for(
        &self,
        side: FootSide,
        measurement_id: &str,
        descriptions: &MeasurementDescriptions,
        bounds: &Aabb,
    ) -> Option<MeasurementGeometry> {
        let built = descriptions
            .get(side, measurement_id)
            .and_then(|description| self.build(side, measurement_id, description, bounds));
        match built {
            Ok(geometry) => Some(geometry),
            Err(err) => {
                log::warn!("Skipping {side} {measurement_id}: {err}");
                None
            }
        }
    }
}

/// Lower the box so a half-width ruler hugs the top of the foot.
///
/// The drop scales with the declared plane constant as written, before the
/// plane is normalized.
fn half_width_bounds(bounds: &Aabb, description: &MeasurementDescription) -> Aabb {
    let mut lowered = *bounds;
    let constant = description.plane.map_or(0.0, |plane| plane[3]);
    let size = bounds.size();
    if size.y > 0.0 {
        lowered.max.z -= size.z * constant.abs() / size.y;
    }
    lowered
}
