//! Line-segment geometry shared by the overlay builders

use footview_core::{Aabb, Point3f};

/// Unconnected line segments: points `2i` and `2i + 1` form segment `i`.
///
/// `line_distances` holds the cumulative length along the segments at each
/// point, which dashed-line materials use to place their dashes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineSegments {
    pub points: Vec<Point3f>,
    pub line_distances: Vec<f32>,
}

impl LineSegments {
    /// Create segments from point pairs; a trailing unpaired point is dropped
    pub fn from_points(mut points: Vec<Point3f>) -> Self {
        points.truncate(points.len() & !1);
        let line_distances = line_distances(&points);
        Self {
            points,
            line_distances,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = [Point3f; 2]> + '_ {
        self.points.chunks_exact(2).map(|pair| [pair[0], pair[1]])
    }

    /// Sum of all segment lengths
    pub fn total_length(&self) -> f32 {
        self.line_distances.last().copied().unwrap_or(0.0)
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.points.iter())
    }
}

/// Cumulative distances for a segment list, continuing across segments
fn line_distances(points: &[Point3f]) -> Vec<f32> {
    let mut distances = Vec::with_capacity(points.len());
    let mut travelled = 0.0;
    for pair in points.chunks_exact(2) {
        distances.push(travelled);
        travelled += (pair[1] - pair[0]).norm();
        distances.push(travelled);
    }
    distances
}
