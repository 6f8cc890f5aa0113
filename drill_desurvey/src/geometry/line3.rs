//! Basic 3D line types used throughout the crate.

use super::{distance3, format_number, Point3};

/// Representation of a 3D line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    /// Creates a new line segment.
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Returns the length of the line segment.
    pub fn length(&self) -> f64 {
        distance3(self.start, self.end)
    }

    /// Point at `ratio` of the way from `start` to `end`.
    pub fn point_at(&self, ratio: f64) -> Point3 {
        self.start.lerp(self.end, ratio)
    }
}

/// Representation of a series of connected 3D segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline3 {
    pub vertices: Vec<Point3>,
}

impl Polyline3 {
    /// Creates a new polyline from a list of vertices.
    pub fn new(vertices: Vec<Point3>) -> Self {
        Self { vertices }
    }

    /// Returns the total length of all segments in the polyline.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| distance3(pair[0], pair[1]))
            .sum()
    }

    /// Formats the vertices as a WKT `LINESTRING Z`.
    pub fn to_wkt(&self) -> String {
        let coords: Vec<String> = self
            .vertices
            .iter()
            .map(|p| {
                format!(
                    "{} {} {}",
                    format_number(p.x),
                    format_number(p.y),
                    format_number(p.z)
                )
            })
            .collect();
        format!("LINESTRING Z ({})", coords.join(", "))
    }
}
