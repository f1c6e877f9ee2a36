//! Outlines of girth cutting planes

use crate::lines::LineSegments;
use footview_core::{vector_from_array, CrossSectionBounds, Plane, Point3f, Vector3f};

/// Margin around the cross-section, in metres
pub const PLANE_PADDING: f32 = 0.01;

/// Corners of a padded cross-section rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleCorners {
    pub lower_left: Point3f,
    pub lower_right: Point3f,
    pub upper_left: Point3f,
    pub upper_right: Point3f,
}

/// A dashed rectangle around a girth cross-section
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneRectangle {
    pub corners: RectangleCorners,
    /// Top, left, right and bottom edges
    pub outline: LineSegments,
}

/// Map `(u, v)` in the tangent frame to a point on `plane`, slid up to the
/// floor along whichever frame axis climbs fastest if it would be below it
pub fn project_uv_above_ground(
    tangent: &Vector3f,
    cotangent: &Vector3f,
    u: f32,
    v: f32,
    plane: &Plane,
) -> Point3f {
    let mut point = plane.project_point(&Point3f::from(tangent * u + cotangent * v));

    if point.z < 0.0 {
        let correction = if tangent.z.abs() > cotangent.z.abs() {
            tangent
        } else {
            cotangent
        };
        if correction.z != 0.0 {
            point += correction * (-point.z / correction.z);
        }
    }

    point
}

/// Build the padded outline of a cross-section lying in `plane`
pub fn plane_rectangle(plane: &Plane, bounds: &CrossSectionBounds, padding: f32) -> PlaneRectangle {
    let tangent = vector_from_array(bounds.tangent);
    let cotangent = vector_from_array(bounds.cotangent);
    let u_min = bounds.tangent_min - padding;
    let u_max = bounds.tangent_max + padding;
    let v_min = bounds.cotangent_min - padding;
    let v_max = bounds.cotangent_max + padding;

    let corner = |u, v| project_uv_above_ground(&tangent, &cotangent, u, v, plane);
    let corners = RectangleCorners {
        lower_left: corner(u_min, v_min),
        lower_right: corner(u_max, v_min),
        upper_left: corner(u_min, v_max),
        upper_right: corner(u_max, v_max),
    };

    let outline = LineSegments::from_points(vec![
        corners.upper_left,
        corners.upper_right,
        corners.lower_left,
        corners.upper_left,
        corners.lower_right,
        corners.upper_right,
        corners.lower_left,
        corners.lower_right,
    ]);

    PlaneRectangle { corners, outline }
}
