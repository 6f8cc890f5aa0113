//! Builds the 3D trace of a hole from its collar and survey stations.
//!
//! Orientation is interpolated between stations with [`slerp`] and the trace
//! is integrated forward one sampling step at a time, so every segment but
//! the last has the configured desurvey length.

use crate::config::DesurveyConfig;
use crate::error::DesurveyError;
use crate::geometry::{Point3, Polyline3};
use crate::hole::{Collar, SurveyStation};
use crate::orientation::{enforce_continuity, orientation_for, slerp, Orientation};

/// Desurveyed trace of a hole.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub hole_id: String,
    /// Trace vertices; the first is the collar.
    pub points: Vec<Point3>,
    /// Spacing of all segments except possibly the last, which may be
    /// shorter so the trace ends exactly at `total_depth`.
    pub segment_length: f64,
    pub total_depth: f64,
    /// Built from a single station.
    pub straight: bool,
}

impl Trajectory {
    pub fn polyline(&self) -> Polyline3 {
        Polyline3::new(self.points.clone())
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Along-hole depth at which segment `index` starts.
    pub fn segment_start(&self, index: usize) -> f64 {
        index as f64 * self.segment_length
    }

    /// Along-hole length of segment `index`, accounting for a short final one.
    pub fn segment_span(&self, index: usize) -> f64 {
        if index + 1 >= self.segment_count() {
            self.total_depth - self.segment_start(index)
        } else {
            self.segment_length
        }
    }

    pub fn end(&self) -> Option<Point3> {
        self.points.last().copied()
    }
}

/// Survey stations of one hole after normalization, with their
/// continuity-corrected orientations.
#[derive(Debug, Clone)]
pub struct StationSet {
    stations: Vec<SurveyStation>,
    orientations: Vec<Orientation>,
}

impl StationSet {
    pub fn stations(&self) -> &[SurveyStation] {
        &self.stations
    }

    pub fn orientations(&self) -> &[Orientation] {
        &self.orientations
    }

    /// A hole with a single effective station goes in a straight line.
    pub fn is_straight(&self) -> bool {
        self.stations.len() == 1
    }

    /// Orientation at `depth`. `cursor` is the index of the last bracketing
    /// station and only moves forward, so depths must be queried in
    /// increasing order.
    pub fn orientation_at(&self, depth: f64, cursor: &mut usize) -> Option<Orientation> {
        if self.is_straight() {
            return self.orientations.first().copied();
        }
        for j in *cursor..self.stations.len() {
            let here = &self.stations[j];
            if here.depth == depth {
                *cursor = j;
                return Some(self.orientations[j]);
            }
            let Some(next) = self.stations.get(j + 1) else {
                break;
            };
            if here.depth < depth && next.depth >= depth {
                *cursor = j;
                let ratio = (depth - here.depth) / (next.depth - here.depth);
                return Some(slerp(&self.orientations[j], &self.orientations[j + 1], ratio));
            }
        }
        None
    }
}

fn check_collar(collar: &Collar) -> Result<(), DesurveyError> {
    if !collar.position().is_finite() {
        return Err(DesurveyError::invalid_hole(
            &collar.id,
            "collar coordinates are not finite",
        ));
    }
    if !collar.depth.is_finite() || collar.depth <= 0.0 {
        return Err(DesurveyError::invalid_hole(
            &collar.id,
            format!("total depth must be positive, got {}", collar.depth),
        ));
    }
    Ok(())
}

fn check_station(collar: &Collar, s: &SurveyStation) -> Result<(), DesurveyError> {
    if !s.depth.is_finite() || !s.azimuth.is_finite() || !s.dip.is_finite() {
        return Err(DesurveyError::invalid_hole(
            &collar.id,
            format!(
                "survey station values must be finite (depth {}, azimuth {}, dip {})",
                s.depth, s.azimuth, s.dip
            ),
        ));
    }
    if s.depth < 0.0 {
        return Err(DesurveyError::invalid_hole(
            &collar.id,
            format!("negative survey depth {}", s.depth),
        ));
    }
    Ok(())
}

/// Applies the station rules to the raw stations of one hole: collar or
/// vertical fallback when there are none, then sorting and padding to the
/// collar and to the end of hole when there are several.
pub fn normalize_stations(
    collar: &Collar,
    raw: &[SurveyStation],
    config: &DesurveyConfig,
) -> Result<Vec<SurveyStation>, DesurveyError> {
    check_collar(collar)?;
    for s in raw {
        check_station(collar, s)?;
    }

    let mut stations: Vec<SurveyStation> = raw.to_vec();
    if stations.is_empty() && config.use_collar_orientation {
        if let (Some(az), Some(dip)) = (collar.azimuth, collar.dip) {
            let s = SurveyStation::new(0.0, az, dip);
            check_station(collar, &s)?;
            stations.push(s);
        }
    }
    if stations.is_empty() {
        stations.push(SurveyStation::new(0.0, 0.0, config.vertical_dip()));
    }
    if stations.len() == 1 {
        return Ok(stations);
    }

    stations.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    let mut deduped: Vec<SurveyStation> = Vec::with_capacity(stations.len() + 2);
    for s in stations {
        match deduped.last() {
            Some(prev) if prev.depth == s.depth => {
                if prev.azimuth != s.azimuth || prev.dip != s.dip {
                    return Err(DesurveyError::invalid_hole(
                        &collar.id,
                        format!("conflicting surveys at depth {}", s.depth),
                    ));
                }
            }
            _ => deduped.push(s),
        }
    }
    if deduped.len() == 1 {
        return Ok(deduped);
    }

    if deduped[0].depth != 0.0 {
        let top = deduped[0].at_depth(0.0);
        deduped.insert(0, top);
    }
    if let Some(last) = deduped.last().copied() {
        if last.depth < collar.depth {
            deduped.push(last.at_depth(collar.depth));
        }
    }
    Ok(deduped)
}

/// Normalizes the stations and computes their continuity-corrected
/// orientations.
pub fn prepare_stations(
    collar: &Collar,
    raw: &[SurveyStation],
    config: &DesurveyConfig,
) -> Result<StationSet, DesurveyError> {
    let stations = normalize_stations(collar, raw, config)?;
    let mut orientations: Vec<Orientation> = stations
        .iter()
        .map(|s| orientation_for(s.azimuth, s.dip, config.down_dip_negative))
        .collect();
    enforce_continuity(&mut orientations);
    Ok(StationSet {
        stations,
        orientations,
    })
}

/// Depths at which the trace is sampled: `0, step, 2 * step, ...` ending
/// exactly at `total_depth`.
pub fn sample_depths(total_depth: f64, step: f64) -> Vec<f64> {
    let count = (total_depth / step).floor() as usize;
    let mut depths: Vec<f64> = (0..=count).map(|k| k as f64 * step).collect();
    if let Some(last) = depths.last_mut() {
        if *last > total_depth {
            *last = total_depth;
        }
    }
    if depths.last().map_or(true, |&d| d < total_depth) {
        depths.push(total_depth);
    }
    depths
}

/// Desurveys one hole.
pub fn build_trajectory(
    collar: &Collar,
    raw: &[SurveyStation],
    config: &DesurveyConfig,
) -> Result<Trajectory, DesurveyError> {
    config.validate()?;
    let set = prepare_stations(collar, raw, config)?;
    let straight = set.is_straight();
    let start = collar.position();

    if straight && !config.densify_straight_holes {
        let direction = set.orientations[0].direction();
        log::debug!("hole {} is straight, single segment", collar.id);
        return Ok(Trajectory {
            hole_id: collar.id.clone(),
            points: vec![start, start.offset(&direction, collar.depth)],
            segment_length: collar.depth,
            total_depth: collar.depth,
            straight,
        });
    }

    let depths = sample_depths(collar.depth, config.desurvey_length);
    let mut points = Vec::with_capacity(depths.len());
    points.push(start);
    let mut cursor = 0;
    let mut last = start;
    for pair in depths.windows(2) {
        let (above, depth) = (pair[0], pair[1]);
        let q = set.orientation_at(depth, &mut cursor).ok_or_else(|| {
            DesurveyError::invalid_hole(&collar.id, format!("no survey covers depth {}", depth))
        })?;
        last = last.offset(&q.direction(), depth - above);
        points.push(last);
    }
    log::debug!(
        "hole {} desurveyed: {} stations, {} vertices",
        collar.id,
        set.stations.len(),
        points.len()
    );
    Ok(Trajectory {
        hole_id: collar.id.clone(),
        points,
        segment_length: config.desurvey_length,
        total_depth: collar.depth,
        straight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(step: f64) -> DesurveyConfig {
        DesurveyConfig {
            desurvey_length: step,
            ..DesurveyConfig::default()
        }
    }

    fn collar(depth: f64) -> Collar {
        Collar::new("DH1", 0.0, 0.0, 0.0, depth).unwrap()
    }

    #[test]
    fn sample_depths_cover_hole() {
        assert_eq!(sample_depths(100.0, 25.0), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(sample_depths(90.0, 25.0), vec![0.0, 25.0, 50.0, 75.0, 90.0]);
        assert_eq!(sample_depths(10.0, 25.0), vec![0.0, 10.0]);
        let d = sample_depths(0.7, 0.1);
        assert_eq!(d[0], 0.0);
        assert_eq!(*d.last().unwrap(), 0.7);
        assert!(d.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn no_stations_is_vertical() {
        let stations = normalize_stations(&collar(50.0), &[], &cfg(10.0)).unwrap();
        assert_eq!(stations, vec![SurveyStation::new(0.0, 0.0, -90.0)]);
        let positive = DesurveyConfig {
            down_dip_negative: false,
            ..cfg(10.0)
        };
        let stations = normalize_stations(&collar(50.0), &[], &positive).unwrap();
        assert_eq!(stations[0].dip, 90.0);
    }

    #[test]
    fn collar_orientation_used_only_without_surveys() {
        let c = collar(50.0).with_orientation(45.0, -60.0);
        let stations = normalize_stations(&c, &[], &cfg(10.0)).unwrap();
        assert_eq!(stations, vec![SurveyStation::new(0.0, 45.0, -60.0)]);

        let raw = [SurveyStation::new(20.0, 90.0, -70.0)];
        let stations = normalize_stations(&c, &raw, &cfg(10.0)).unwrap();
        assert_eq!(stations, raw.to_vec());

        let ignore = DesurveyConfig {
            use_collar_orientation: false,
            ..cfg(10.0)
        };
        let stations = normalize_stations(&c, &[], &ignore).unwrap();
        assert_eq!(stations, vec![SurveyStation::new(0.0, 0.0, -90.0)]);
    }

    #[test]
    fn stations_sorted_and_padded() {
        let raw = [
            SurveyStation::new(60.0, 20.0, -50.0),
            SurveyStation::new(30.0, 10.0, -60.0),
        ];
        let stations = normalize_stations(&collar(100.0), &raw, &cfg(10.0)).unwrap();
        assert_eq!(
            stations,
            vec![
                SurveyStation::new(0.0, 10.0, -60.0),
                SurveyStation::new(30.0, 10.0, -60.0),
                SurveyStation::new(60.0, 20.0, -50.0),
                SurveyStation::new(100.0, 20.0, -50.0),
            ]
        );
    }

    #[test]
    fn conflicting_duplicate_depths_rejected() {
        let raw = [
            SurveyStation::new(30.0, 10.0, -60.0),
            SurveyStation::new(30.0, 15.0, -60.0),
        ];
        let err = normalize_stations(&collar(100.0), &raw, &cfg(10.0)).unwrap_err();
        assert!(matches!(err, DesurveyError::InvalidHoleDefinition { .. }));

        let same = [
            SurveyStation::new(30.0, 10.0, -60.0),
            SurveyStation::new(30.0, 10.0, -60.0),
        ];
        let stations = normalize_stations(&collar(100.0), &same, &cfg(10.0)).unwrap();
        assert_eq!(stations.len(), 1);
    }

    #[test]
    fn bad_holes_rejected() {
        assert!(build_trajectory(&collar(0.0), &[], &cfg(10.0)).is_err());
        assert!(build_trajectory(&collar(-5.0), &[], &cfg(10.0)).is_err());
        let raw = [
            SurveyStation::new(f64::NAN, 0.0, -90.0),
            SurveyStation::new(10.0, 0.0, -90.0),
        ];
        assert!(build_trajectory(&collar(50.0), &raw, &cfg(10.0)).is_err());
        let raw = [SurveyStation::new(-1.0, 0.0, -90.0)];
        assert!(build_trajectory(&collar(50.0), &raw, &cfg(10.0)).is_err());
    }

    #[test]
    fn straight_hole_two_points() {
        let c = Collar::new("DH1", 1000.0, 2000.0, 500.0, 100.0).unwrap();
        let t = build_trajectory(&c, &[SurveyStation::new(0.0, 0.0, -90.0)], &cfg(25.0)).unwrap();
        assert!(t.straight);
        assert_eq!(t.points.len(), 2);
        assert_eq!(t.segment_length, 100.0);
        let end = t.end().unwrap();
        assert!((end.x - 1000.0).abs() < 1e-9);
        assert!((end.y - 2000.0).abs() < 1e-9);
        assert!((end.z - 400.0).abs() < 1e-9);
    }

    #[test]
    fn station_depth_reproduces_station_orientation() {
        let raw = [
            SurveyStation::new(0.0, 0.0, -60.0),
            SurveyStation::new(40.0, 30.0, -55.0),
            SurveyStation::new(80.0, 60.0, -50.0),
        ];
        let set = prepare_stations(&collar(80.0), &raw, &cfg(10.0)).unwrap();
        let mut cursor = 0;
        let q = set.orientation_at(40.0, &mut cursor).unwrap();
        assert_eq!(q, set.orientations()[1]);
        let q = set.orientation_at(80.0, &mut cursor).unwrap();
        assert_eq!(q, set.orientations()[2]);
    }

    #[test]
    fn short_last_segment_lands_on_total_depth() {
        let raw = [
            SurveyStation::new(0.0, 90.0, 0.0),
            SurveyStation::new(90.0, 90.0, 0.0),
        ];
        let t = build_trajectory(&collar(90.0), &raw, &cfg(25.0)).unwrap();
        assert_eq!(t.points.len(), 5);
        assert_eq!(t.segment_length, 25.0);
        assert!((t.polyline().length() - 90.0).abs() < 1e-9);
        assert!((t.segment_span(3) - 15.0).abs() < 1e-9);
        assert!((t.segment_span(1) - 25.0).abs() < 1e-9);
        let end = t.end().unwrap();
        assert!((end.x - 90.0).abs() < 1e-9);
    }
}
