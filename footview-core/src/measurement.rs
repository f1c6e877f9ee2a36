//! Semantic foot measurements as supplied by the scan service

use crate::error::{Error, Result};
use crate::foot::{FitZone, FootSide};
use crate::plane::Plane;
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extent of a girth cross-section in the (tangent, cotangent) frame of its plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionBounds {
    pub tangent: [f32; 3],
    pub cotangent: [f32; 3],
    pub tangent_min: f32,
    pub tangent_max: f32,
    pub cotangent_min: f32,
    pub cotangent_max: f32,
}

/// Geometric description of one measurement, in foot coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementDescription {
    pub axis: [f32; 3],
    pub from: [f32; 3],
    pub to: [f32; 3],
    /// Reference plane as `[a, b, c, d]`; the floor when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane: Option<[f32; 4]>,
    #[serde(default)]
    pub markers: BTreeMap<String, [f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_section_bounds: Option<CrossSectionBounds>,
}

impl MeasurementDescription {
    pub fn axis_vector(&self) -> Vector3f {
        vector_from_array(self.axis)
    }

    pub fn from_point(&self) -> Point3f {
        point_from_array(self.from)
    }

    pub fn to_point(&self) -> Point3f {
        point_from_array(self.to)
    }

    /// The declared reference plane, if any
    pub fn reference_plane(&self) -> Option<Plane> {
        self.plane.map(Plane::from_components)
    }

    /// Position of a named marker
    pub fn marker(&self, name: &str) -> Option<Point3f> {
        self.markers.get(name).copied().map(point_from_array)
    }
}

/// Every description of a scan, keyed by `"{side}_{measurement id}"`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementDescriptions {
    entries: BTreeMap<String, MeasurementDescription>,
}

impl MeasurementDescriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key under which a side's description is stored
    pub fn key(side: FootSide, id: &str) -> String {
        format!("{}_{}", side.as_str(), id)
    }

    pub fn insert(&mut self, side: FootSide, id: &str, description: MeasurementDescription) {
        self.entries.insert(Self::key(side, id), description);
    }

    pub fn get(&self, side: FootSide, id: &str) -> Result<&MeasurementDescription> {
        let key = Self::key(side, id);
        self.entries
            .get(&key)
            .ok_or(Error::MissingDescription { key })
    }

    /// Position of `marker` in the description `id` of `side`
    pub fn marker(&self, side: FootSide, id: &str, marker: &str) -> Result<Point3f> {
        self.get(side, id)?
            .marker(marker)
            .ok_or_else(|| Error::MissingMarker {
                key: Self::key(side, id),
                marker: marker.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MeasurementDescription)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, MeasurementDescription)> for MeasurementDescriptions {
    fn from_iter<I: IntoIterator<Item = (String, MeasurementDescription)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Straight-line measurements drawn as rulers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceType {
    Length,
    Width,
    HalfWidth,
    HeelWidth,
    Height,
}

/// Circumference measurements drawn as cutting-plane rectangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GirthType {
    AnkleWrap,
    BallGirth,
    InstepGirth,
    ShortHeelGirth,
    WaistGirth,
}

/// How a measurement id is visualized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    Distance(DistanceType),
    Girth(GirthType),
}

impl MeasurementType {
    /// Classify a measurement id.
    ///
    /// Ids ending in `_half_width` are half widths and ids ending in
    /// `_height` are heights. Returns `None` for ids with no visualization.
    pub fn from_id(id: &str) -> Option<MeasurementType> {
        use DistanceType::*;
        use GirthType::*;

        let kind = match id {
            "length" => MeasurementType::Distance(Length),
            "width" => MeasurementType::Distance(Width),
            "heel_width" => MeasurementType::Distance(HeelWidth),
            "half_width" => MeasurementType::Distance(HalfWidth),
            "height" => MeasurementType::Distance(Height),
            "ankle_wrap" => MeasurementType::Girth(AnkleWrap),
            "ball_girth" => MeasurementType::Girth(BallGirth),
            "instep_girth" => MeasurementType::Girth(InstepGirth),
            "short_heel_girth" => MeasurementType::Girth(ShortHeelGirth),
            "waist_girth" => MeasurementType::Girth(WaistGirth),
            other if other.ends_with("_half_width") => MeasurementType::Distance(HalfWidth),
            other if other.ends_with("_height") => MeasurementType::Distance(Height),
            _ => return None,
        };
        Some(kind)
    }

    /// Fit zone highlighted while this measurement is selected
    pub fn fit_zone(&self) -> Option<FitZone> {
        match self {
            MeasurementType::Distance(DistanceType::Length) => Some(FitZone::Toe),
            MeasurementType::Distance(DistanceType::Width) => Some(FitZone::Ball),
            MeasurementType::Distance(DistanceType::Height) => Some(FitZone::Instep),
            MeasurementType::Distance(DistanceType::HeelWidth) => Some(FitZone::Heel),
            _ => None,
        }
    }
}
