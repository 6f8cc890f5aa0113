//! Drill hole records: collars, survey stations and downhole intervals.

use crate::error::DesurveyError;
use crate::geometry::Point3;

/// Surface location and extent of a drill hole.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Collar {
    pub id: String,
    pub east: f64,
    pub north: f64,
    pub elev: f64,
    /// Total (end of hole) depth.
    pub depth: f64,
    /// Azimuth and dip at the collar, when the source supplies them.
    pub azimuth: Option<f64>,
    pub dip: Option<f64>,
}

impl Collar {
    /// Creates a collar. The identifier is trimmed and must not be empty.
    pub fn new(
        id: &str,
        east: f64,
        north: f64,
        elev: f64,
        depth: f64,
    ) -> Result<Self, DesurveyError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DesurveyError::invalid_hole(id, "empty collar identifier"));
        }
        Ok(Self {
            id: id.to_string(),
            east,
            north,
            elev,
            depth,
            azimuth: None,
            dip: None,
        })
    }

    /// Attaches the collar's own azimuth and dip.
    pub fn with_orientation(mut self, azimuth: f64, dip: f64) -> Self {
        self.azimuth = Some(azimuth);
        self.dip = Some(dip);
        self
    }

    pub fn position(&self) -> Point3 {
        Point3::new(self.east, self.north, self.elev)
    }
}

/// Directional measurement at a depth down a hole.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurveyStation {
    pub depth: f64,
    pub azimuth: f64,
    pub dip: f64,
}

impl SurveyStation {
    pub fn new(depth: f64, azimuth: f64, dip: f64) -> Self {
        Self { depth, azimuth, dip }
    }

    /// Same orientation at a different depth.
    pub fn at_depth(&self, depth: f64) -> Self {
        Self { depth, ..*self }
    }
}

/// A survey station tagged with the hole it belongs to.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Survey {
    pub hole_id: String,
    pub station: SurveyStation,
}

impl Survey {
    pub fn new(hole_id: &str, depth: f64, azimuth: f64, dip: f64) -> Self {
        Self {
            hole_id: hole_id.trim().to_string(),
            station: SurveyStation::new(depth, azimuth, dip),
        }
    }
}

/// Downhole data between two depths, with attribute values carried through
/// projection unchanged.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    pub hole_id: String,
    pub from: f64,
    pub to: f64,
    pub attributes: Vec<String>,
    /// Source row, used when reporting a skipped interval.
    pub row: usize,
}

impl Interval {
    pub fn new(hole_id: &str, from: f64, to: f64) -> Self {
        Self {
            hole_id: hole_id.trim().to_string(),
            from,
            to,
            attributes: Vec::new(),
            row: 0,
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = row;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collar_id_trimmed() {
        let c = Collar::new("  DH001 ", 1.0, 2.0, 3.0, 50.0).unwrap();
        assert_eq!(c.id, "DH001");
        assert_eq!(c.position(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn empty_collar_id_rejected() {
        assert!(Collar::new("   ", 0.0, 0.0, 0.0, 10.0).is_err());
    }
}
