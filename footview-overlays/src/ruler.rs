//! Axis rulers: an arrow beside the foot with stop lines back to the
//! measured points
//!
//! ```text
//!  inner           ruler    outer
//!  padding         padding  padding
//! |<---->|        |<----->|<----->|
//! ------------------------x--------   stop line at `b`
//!     .####.             /|\
//!    ########             |
//!    ########             |          arrow
//!     ######              |
//!      ####              \|/
//! ------------------------x--------   stop line at `a`
//! ```

use crate::lines::LineSegments;
use footview_core::{Aabb, Error, Plane, Point3f, Ray, Result, Vector3f};
use serde::{Deserialize, Serialize};

/// Arrows shorter than this get their heads flipped outwards
pub const SHORT_ARROW_LENGTH: f32 = 0.015;

/// Half width of an arrowhead
pub const ARROWHEAD_WIDTH: f32 = 0.0025;

/// Length of an arrowhead along the arrow
pub const ARROWHEAD_LENGTH: f32 = 0.005;

/// Distances in metres around a ruler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerPadding {
    /// Gap between the foot bounds and the arrow
    pub ruler: f32,
    /// How far stop lines reach past the measured point into the foot
    pub inner: f32,
    /// How far stop lines reach past the arrow
    pub outer: f32,
}

impl Default for RulerPadding {
    fn default() -> Self {
        Self {
            ruler: 0.01,
            inner: 0.025,
            outer: 0.02,
        }
    }
}

impl RulerPadding {
    /// Padding for half widths, drawn over the top of the foot
    pub fn half_width(&self) -> Self {
        Self {
            ruler: 0.025,
            inner: 0.0,
            ..*self
        }
    }
}

/// Geometry of one ruler
#[derive(Debug, Clone, PartialEq)]
pub struct RulerGeometry {
    /// Shaft and arrowheads
    pub arrow: LineSegments,
    /// Two stop lines, one through each measured point
    pub stoplines: LineSegments,
    /// Unit direction from the measured points towards the arrow
    pub tangent: Vector3f,
    /// Unit direction of the arrow, from `a` to `b`
    pub cotangent: Vector3f,
    pub short_arrow: bool,
}

impl RulerGeometry {
    /// Stop lines as `[start, end]` pairs, for the `a` side then the `b` side
    pub fn stopline_endpoints(&self) -> [[Point3f; 2]; 2] {
        let p = &self.stoplines.points;
        [[p[0], p[1]], [p[2], p[3]]]
    }
}

/// Unit vector perpendicular to `axis` lying in `plane`
pub fn tangent_to_axis(axis: &Vector3f, plane: &Plane) -> Option<Vector3f> {
    axis.cross(&plane.normal).try_normalize(f32::EPSILON)
}

fn translate_and_project(point: &Point3f, direction: &Vector3f, distance: f32, plane: &Plane) -> Point3f {
    plane.project_point(&(point + direction * distance))
}

/// Build a ruler measuring from `a` to `b` along `axis`.
///
/// The arrow is placed outside `bounds` on the side `side_flip` selects and
/// lies in `plane`.
pub fn axis_ruler(
    axis: &Vector3f,
    a: &Point3f,
    b: &Point3f,
    plane: &Plane,
    bounds: &Aabb,
    side_flip: f32,
    padding: &RulerPadding,
) -> Result<RulerGeometry> {
    let tangent = tangent_to_axis(axis, plane)
        .ok_or_else(|| Error::Degenerate("ruler axis is parallel to the plane normal".into()))?
        * side_flip;
    let mid = nalgebra::center(a, b);

    // Walk back from outside the bounds to find where the silhouette starts
    let ray = Ray::new(mid + tangent, -tangent);
    let mid_on_bounds = ray
        .intersect_box(bounds)
        .ok_or_else(|| Error::Degenerate("ruler does not meet the foot bounds".into()))?;

    let plane_a = Plane::from_normal_and_coplanar_point(axis, a);
    let plane_b = Plane::from_normal_and_coplanar_point(axis, b);
    let a_on_axis = plane_a.project_point(&mid_on_bounds);
    let b_on_axis = plane_b.project_point(&mid_on_bounds);

    // Follows the axis, but always points from a to b
    let cotangent = (b_on_axis - a_on_axis)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3f::zeros);

    let residual = (a_on_axis - a).norm().max((b_on_axis - b).norm());
    let stopline_start = -(padding.inner + residual);
    let stopline_stop = padding.ruler + padding.outer;

    let arrow_a = translate_and_project(&a_on_axis, &tangent, padding.ruler, plane);
    let arrow_b = translate_and_project(&b_on_axis, &tangent, padding.ruler, plane);

    // Short arrows point their heads inwards from outside the stop lines
    let short_arrow = (arrow_a - arrow_b).norm() < SHORT_ARROW_LENGTH;
    let dx = ARROWHEAD_WIDTH;
    let dy = if short_arrow { -ARROWHEAD_LENGTH } else { ARROWHEAD_LENGTH };

    let mut arrow = vec![
        arrow_a,
        arrow_b,
        arrow_a,
        arrow_a - tangent * dx + cotangent * dy,
        arrow_a,
        arrow_a + tangent * dx + cotangent * dy,
        arrow_b,
        arrow_b - tangent * dx - cotangent * dy,
        arrow_b,
        arrow_b + tangent * dx - cotangent * dy,
    ];
    if short_arrow {
        arrow.extend([
            arrow_a,
            arrow_a + cotangent * (2.0 * dy),
            arrow_b,
            arrow_b - cotangent * (2.0 * dy),
        ]);
    }

    let stoplines = vec![
        translate_and_project(&a_on_axis, &tangent, stopline_start, plane),
        translate_and_project(&a_on_axis, &tangent, stopline_stop, plane),
        translate_and_project(&b_on_axis, &tangent, stopline_start, plane),
        translate_and_project(&b_on_axis, &tangent, stopline_stop, plane),
    ];

    Ok(RulerGeometry {
        arrow: LineSegments::from_points(arrow),
        stoplines: LineSegments::from_points(stoplines),
        tangent,
        cotangent,
        short_arrow,
    })
}
