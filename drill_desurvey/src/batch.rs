//! Desurveys many holes and projects their intervals in one pass.
//!
//! Holes are independent, so they are processed in parallel with rayon;
//! intervals are projected in parallel once every trace exists. A bad
//! record, hole or interval is skipped and recorded in a [`SkipReport`].

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::config::DesurveyConfig;
use crate::error::DesurveyError;
use crate::hole::{Collar, Interval, Survey, SurveyStation};
use crate::projection::{project, ProjectedInterval};
use crate::trajectory::{build_trajectory, Trajectory};

/// Everything skipped during a batch, in the order it was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkipReport {
    pub entries: Vec<DesurveyError>,
}

impl SkipReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: DesurveyError) {
        log::warn!("skipped: {}", err);
        self.entries.push(err);
    }

    pub fn extend(&mut self, other: SkipReport) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn holes(&self) -> usize {
        self.count(|e| matches!(e, DesurveyError::InvalidHoleDefinition { .. }))
    }

    pub fn malformed(&self) -> usize {
        self.count(|e| matches!(e, DesurveyError::MalformedInput { .. }))
    }

    pub fn out_of_range(&self) -> usize {
        self.count(|e| matches!(e, DesurveyError::GeometryOutOfRange { .. }))
    }

    fn count(&self, f: impl Fn(&DesurveyError) -> bool) -> usize {
        self.entries.iter().filter(|e| f(e)).count()
    }
}

/// Traces keyed by hole identifier.
#[derive(Debug, Clone, Default)]
pub struct TraceIndex {
    traces: HashMap<String, Trajectory>,
}

impl TraceIndex {
    pub fn get(&self, hole_id: &str) -> Option<&Trajectory> {
        self.traces.get(hole_id.trim())
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}

impl FromIterator<Trajectory> for TraceIndex {
    fn from_iter<I: IntoIterator<Item = Trajectory>>(iter: I) -> Self {
        Self {
            traces: iter.into_iter().map(|t| (t.hole_id.clone(), t)).collect(),
        }
    }
}

/// Result of desurveying a set of collars.
#[derive(Debug, Clone, Default)]
pub struct DesurveyRun {
    /// Traces in collar input order.
    pub trajectories: Vec<Trajectory>,
    pub skipped: SkipReport,
}

impl DesurveyRun {
    pub fn index(&self) -> TraceIndex {
        self.trajectories.iter().cloned().collect()
    }
}

/// Groups survey stations by hole identifier.
pub fn group_surveys(surveys: &[Survey]) -> HashMap<&str, Vec<SurveyStation>> {
    let mut by_hole: HashMap<&str, Vec<SurveyStation>> = HashMap::new();
    for s in surveys {
        by_hole.entry(s.hole_id.as_str()).or_default().push(s.station);
    }
    by_hole
}

/// Desurveys every collar. Only an unusable configuration fails the call;
/// holes that cannot be desurveyed are reported in the run's skip report.
pub fn desurvey_all(
    collars: &[Collar],
    surveys: &[Survey],
    config: &DesurveyConfig,
) -> Result<DesurveyRun, DesurveyError> {
    config.validate()?;
    let by_hole = group_surveys(surveys);

    let mut seen = HashSet::new();
    let mut skipped = SkipReport::new();
    let mut unique: Vec<&Collar> = Vec::with_capacity(collars.len());
    for c in collars {
        if seen.insert(c.id.as_str()) {
            unique.push(c);
        } else {
            skipped.push(DesurveyError::invalid_hole(&c.id, "duplicate collar identifier"));
        }
    }

    let results: Vec<Result<Trajectory, DesurveyError>> = unique
        .par_iter()
        .map(|c| {
            let stations = by_hole.get(c.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            build_trajectory(c, stations, config)
        })
        .collect();

    let mut trajectories = Vec::with_capacity(results.len());
    for r in results {
        match r {
            Ok(t) => trajectories.push(t),
            Err(e) => skipped.push(e),
        }
    }
    log::info!(
        "desurveyed {} of {} holes ({} skipped)",
        trajectories.len(),
        collars.len(),
        skipped.holes()
    );
    Ok(DesurveyRun {
        trajectories,
        skipped,
    })
}

/// Projects intervals onto their holes' traces, keeping input order.
pub fn project_all(intervals: &[Interval], traces: &TraceIndex) -> (Vec<ProjectedInterval>, SkipReport) {
    let results: Vec<Result<ProjectedInterval, DesurveyError>> = intervals
        .par_iter()
        .map(|iv| match traces.get(&iv.hole_id) {
            Some(t) => project(iv, t),
            None => Err(DesurveyError::malformed(
                "interval",
                iv.row,
                "hole_id",
                format!("no desurveyed trace for hole {}", iv.hole_id),
            )),
        })
        .collect();

    let mut projected = Vec::with_capacity(results.len());
    let mut skipped = SkipReport::new();
    for r in results {
        match r {
            Ok(p) => projected.push(p),
            Err(e) => skipped.push(e),
        }
    }
    log::info!(
        "projected {} of {} intervals ({} skipped)",
        projected.len(),
        intervals.len(),
        skipped.len()
    );
    (projected, skipped)
}
