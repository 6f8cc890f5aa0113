//! Places from-to intervals onto a desurveyed trace.

use crate::error::{DesurveyError, Endpoint};
use crate::geometry::{Line3, Point3, Polyline3};
use crate::hole::Interval;
use crate::trajectory::Trajectory;

/// Depths this far past the end of hole still resolve to the last vertex.
const DEPTH_TOLERANCE: f64 = 1e-9;

/// A depth resolved onto a trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub point: Point3,
    /// Position along the trace in vertex units: the integer part is the
    /// segment, the fraction how far along it.
    pub index: f64,
}

/// Interval with its 3D geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedInterval {
    pub interval: Interval,
    pub from: Location,
    pub to: Location,
    /// From point, every trace vertex strictly inside the interval, to point.
    pub path: Polyline3,
}

impl ProjectedInterval {
    pub fn from_point(&self) -> Point3 {
        self.from.point
    }

    pub fn to_point(&self) -> Point3 {
        self.to.point
    }
}

/// Interpolates the point at `depth` along `trajectory`.
///
/// Returns `None` when the depth is not finite or falls outside the trace.
/// The final segment is measured with its own length, which may be shorter
/// than the trajectory's segment length.
pub fn locate(depth: f64, trajectory: &Trajectory) -> Option<Location> {
    let points = &trajectory.points;
    let segments = trajectory.segment_count();
    if segments == 0 || !depth.is_finite() || trajectory.segment_length <= 0.0 {
        return None;
    }
    if depth < 0.0 || depth > trajectory.total_depth + DEPTH_TOLERANCE {
        return None;
    }
    let depth = depth.min(trajectory.total_depth);

    let mut i = depth / trajectory.segment_length;
    // 0.3 / 0.1 is 2.9999999999999996, which would land just short of a vertex
    if (i - i.round()).abs() < 1e-9 {
        i = i.round();
    }
    let mut index = i.floor() as usize;
    let mut ratio = i - index as f64;
    if index >= segments - 1 {
        index = segments - 1;
        let span = trajectory.segment_span(index);
        ratio = if span > 0.0 {
            ((depth - trajectory.segment_start(index)) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    let point = if ratio == 0.0 {
        points[index]
    } else if ratio >= 1.0 {
        points[index + 1]
    } else {
        Line3::new(points[index], points[index + 1]).point_at(ratio)
    };
    Some(Location {
        point,
        index: index as f64 + ratio,
    })
}

/// Trace vertices lying strictly between two locations, in trace order.
pub fn spanned_vertices(from: &Location, to: &Location, trajectory: &Trajectory) -> Vec<Point3> {
    if to.index <= from.index {
        return Vec::new();
    }
    let first = from.index.ceil() as usize;
    let last = (to.index.floor() as usize).min(trajectory.points.len().saturating_sub(1));
    (first..=last)
        .filter(|&k| (k as f64) > from.index && (k as f64) < to.index)
        .map(|k| trajectory.points[k])
        .collect()
}

fn check_depth(interval: &Interval, field: &str, depth: f64) -> Result<(), DesurveyError> {
    if depth.is_finite() {
        Ok(())
    } else {
        Err(DesurveyError::malformed(
            "interval",
            interval.row,
            field,
            format!("is not a finite number ({depth})"),
        ))
    }
}

fn out_of_range(interval: &Interval, endpoint: Endpoint, depth: f64, trajectory: &Trajectory) -> DesurveyError {
    DesurveyError::GeometryOutOfRange {
        hole: interval.hole_id.clone(),
        endpoint,
        depth,
        max_depth: trajectory.total_depth,
        row: interval.row,
    }
}

/// Projects one interval onto its hole's trace.
pub fn project(interval: &Interval, trajectory: &Trajectory) -> Result<ProjectedInterval, DesurveyError> {
    check_depth(interval, "from", interval.from)?;
    check_depth(interval, "to", interval.to)?;
    if interval.from > interval.to {
        return Err(DesurveyError::malformed(
            "interval",
            interval.row,
            "to",
            format!("{} is above from depth {}", interval.to, interval.from),
        ));
    }

    let from = locate(interval.from, trajectory)
        .ok_or_else(|| out_of_range(interval, Endpoint::From, interval.from, trajectory))?;
    let to = locate(interval.to, trajectory)
        .ok_or_else(|| out_of_range(interval, Endpoint::To, interval.to, trajectory))?;

    let mut vertices = Vec::with_capacity(2);
    vertices.push(from.point);
    vertices.extend(spanned_vertices(&from, &to, trajectory));
    vertices.push(to.point);

    Ok(ProjectedInterval {
        interval: interval.clone(),
        from,
        to,
        path: Polyline3::new(vertices),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(n: usize, seg: f64, total: f64) -> Trajectory {
        let mut points: Vec<Point3> = (0..n - 1)
            .map(|k| Point3::new(0.0, 0.0, -(k as f64) * seg))
            .collect();
        points.push(Point3::new(0.0, 0.0, -total));
        Trajectory {
            hole_id: "DH1".into(),
            points,
            segment_length: seg,
            total_depth: total,
            straight: false,
        }
    }

    #[test]
    fn locate_on_vertex_and_between() {
        let t = vertical(5, 25.0, 100.0);
        let loc = locate(50.0, &t).unwrap();
        assert_eq!(loc.index, 2.0);
        assert_eq!(loc.point, t.points[2]);
        let loc = locate(10.0, &t).unwrap();
        assert!((loc.index - 0.4).abs() < 1e-12);
        assert!((loc.point.z + 10.0).abs() < 1e-9);
        let end = locate(100.0, &t).unwrap();
        assert_eq!(end.point, t.points[4]);
        assert!((end.index - 4.0).abs() < 1e-12);
    }

    #[test]
    fn locate_in_short_last_segment() {
        let t = vertical(5, 25.0, 90.0);
        let loc = locate(82.5, &t).unwrap();
        assert!((loc.index - 3.5).abs() < 1e-12);
        assert!((loc.point.z + 82.5).abs() < 1e-9);
        let end = locate(90.0, &t).unwrap();
        assert_eq!(end.point, t.points[4]);
        assert!(locate(95.0, &t).is_none());
    }

    #[test]
    fn locate_snaps_to_vertex_under_rounding() {
        let t = vertical(6, 0.1, 0.5);
        let loc = locate(0.3, &t).unwrap();
        assert_eq!(loc.index, 3.0);
        assert_eq!(loc.point, t.points[3]);

        let p = project(&Interval::new("DH1", 0.3, 0.45), &t).unwrap();
        assert_eq!(p.from.index, 3.0);
        assert_eq!(p.path.vertices, vec![t.points[3], t.points[4], p.to.point]);

        let p = project(&Interval::new("DH1", 0.15, 0.3), &t).unwrap();
        assert_eq!(p.path.vertices, vec![p.from.point, t.points[2], t.points[3]]);
    }

    #[test]
    fn locate_rejects_outside() {
        let t = vertical(5, 25.0, 100.0);
        assert!(locate(-0.1, &t).is_none());
        assert!(locate(100.5, &t).is_none());
        assert!(locate(f64::NAN, &t).is_none());
    }

    #[test]
    fn project_inserts_spanned_vertices() {
        let t = vertical(5, 25.0, 100.0);
        let p = project(&Interval::new("DH1", 10.0, 30.0), &t).unwrap();
        assert!((p.from.index - 0.4).abs() < 1e-12);
        assert!((p.to.index - 1.2).abs() < 1e-12);
        assert_eq!(p.path.vertices.len(), 3);
        assert_eq!(p.path.vertices[1], t.points[1]);

        let p = project(&Interval::new("DH1", 25.0, 75.0), &t).unwrap();
        assert_eq!(p.path.vertices, vec![t.points[1], t.points[2], t.points[3]]);
    }

    #[test]
    fn project_reports_endpoint() {
        let t = vertical(5, 25.0, 100.0);
        let err = project(&Interval::new("DH1", 90.0, 120.0).with_row(7), &t).unwrap_err();
        match err {
            DesurveyError::GeometryOutOfRange { endpoint, row, .. } => {
                assert_eq!(endpoint, Endpoint::To);
                assert_eq!(row, 7);
            }
            other => panic!("unexpected error {other:?}"),
        }
        let err = project(&Interval::new("DH1", 30.0, 10.0), &t).unwrap_err();
        assert!(matches!(err, DesurveyError::MalformedInput { .. }));
    }
}
