//! Comma separated collar, survey and interval files.
//!
//! Readers skip rows with missing or unparseable required fields and record
//! them in a [`SkipReport`]; only I/O failures abort a read. A first line
//! whose numeric columns do not parse is taken as a header.

use std::io::{self, Write};

use crate::batch::SkipReport;
use crate::config::DesurveyConfig;
use crate::error::DesurveyError;
use crate::geometry::format_number;
use crate::hole::{Collar, Interval, Survey};
use crate::projection::ProjectedInterval;
use crate::trajectory::Trajectory;

fn split(line: &str) -> Vec<&str> {
    line.split(',').map(|f| f.trim().trim_matches('"').trim()).collect()
}

fn required(
    fields: &[&str],
    idx: usize,
    name: &str,
    record: &'static str,
    row: usize,
) -> Result<f64, DesurveyError> {
    let raw = fields.get(idx).copied().unwrap_or("");
    if raw.is_empty() {
        return Err(DesurveyError::malformed(record, row, name, "is missing"));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| DesurveyError::malformed(record, row, name, format!("`{raw}` is not a number")))?;
    if !value.is_finite() {
        return Err(DesurveyError::malformed(record, row, name, "is not finite"));
    }
    Ok(value)
}

fn optional(
    fields: &[&str],
    idx: usize,
    name: &str,
    record: &'static str,
    row: usize,
) -> Result<Option<f64>, DesurveyError> {
    match fields.get(idx) {
        Some(raw) if !raw.is_empty() => required(fields, idx, name, record, row).map(Some),
        _ => Ok(None),
    }
}

fn identifier<'a>(fields: &[&'a str], record: &'static str, row: usize) -> Result<&'a str, DesurveyError> {
    match fields.first() {
        Some(id) if !id.is_empty() => Ok(*id),
        _ => Err(DesurveyError::malformed(record, row, "id", "is missing")),
    }
}

fn is_header(fields: &[&str], numeric: usize) -> bool {
    fields
        .get(numeric)
        .map_or(false, |f| !f.is_empty() && f.parse::<f64>().is_err())
}

fn parse_rows<T>(
    text: &str,
    numeric: usize,
    skipped: &mut SkipReport,
    mut row_fn: impl FnMut(&[&str], usize) -> Result<T, DesurveyError>,
) -> Vec<T> {
    let mut out = Vec::new();
    let mut seen_first = false;
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split(line);
        let first = !seen_first;
        seen_first = true;
        if first && is_header(&fields, numeric) {
            continue;
        }
        match row_fn(&fields, idx + 1) {
            Ok(v) => out.push(v),
            Err(e) => skipped.push(e),
        }
    }
    out
}

/// Parses `id,east,north,elev,depth[,azimuth,dip]` rows.
///
/// When the azimuth/dip columns are present a blank azimuth reads as 0 and a
/// blank dip as vertical under the configured dip convention.
pub fn parse_collars(text: &str, config: &DesurveyConfig) -> (Vec<Collar>, SkipReport) {
    let mut skipped = SkipReport::new();
    let collars = parse_rows(text, 1, &mut skipped, |f, row| {
        let id = identifier(f, "collar", row)?;
        let east = required(f, 1, "east", "collar", row)?;
        let north = required(f, 2, "north", "collar", row)?;
        let elev = required(f, 3, "elev", "collar", row)?;
        let depth = required(f, 4, "depth", "collar", row)?;
        let mut collar = Collar::new(id, east, north, elev, depth)?;
        if f.len() > 5 {
            let az = optional(f, 5, "azimuth", "collar", row)?.unwrap_or(0.0);
            let dip = optional(f, 6, "dip", "collar", row)?.unwrap_or_else(|| config.vertical_dip());
            collar = collar.with_orientation(az, dip);
        }
        Ok(collar)
    });
    (collars, skipped)
}

/// Parses `id,depth,azimuth,dip` rows.
pub fn parse_surveys(text: &str) -> (Vec<Survey>, SkipReport) {
    let mut skipped = SkipReport::new();
    let surveys = parse_rows(text, 1, &mut skipped, |f, row| {
        let id = identifier(f, "survey", row)?;
        let depth = required(f, 1, "depth", "survey", row)?;
        let az = required(f, 2, "azimuth", "survey", row)?;
        let dip = required(f, 3, "dip", "survey", row)?;
        Ok(Survey::new(id, depth, az, dip))
    });
    (surveys, skipped)
}

/// Intervals read from a file along with the names of their attribute
/// columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalTable {
    pub attribute_names: Vec<String>,
    pub intervals: Vec<Interval>,
}

/// Parses `id,from,to[,attributes...]` rows. Attribute names come from the
/// header when there is one and default to `attr1`, `attr2`, ... otherwise.
pub fn parse_intervals(text: &str) -> (IntervalTable, SkipReport) {
    let mut attribute_names: Vec<String> = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(split)
        .filter(|f| is_header(f, 1))
        .map(|f| f.iter().skip(3).map(|s| s.to_string()).collect())
        .unwrap_or_default();

    let mut skipped = SkipReport::new();
    let intervals = parse_rows(text, 1, &mut skipped, |f, row| {
        let id = identifier(f, "interval", row)?;
        let from = required(f, 1, "from", "interval", row)?;
        let to = required(f, 2, "to", "interval", row)?;
        let attributes = f.iter().skip(3).map(|s| s.to_string()).collect();
        Ok(Interval::new(id, from, to)
            .with_attributes(attributes)
            .with_row(row))
    });

    let width = intervals.iter().map(|iv| iv.attributes.len()).max().unwrap_or(0);
    while attribute_names.len() < width {
        attribute_names.push(format!("attr{}", attribute_names.len() + 1));
    }
    (
        IntervalTable {
            attribute_names,
            intervals,
        },
        skipped,
    )
}

pub fn read_collars_csv(path: &str, config: &DesurveyConfig) -> io::Result<(Vec<Collar>, SkipReport)> {
    let text = super::read_to_string(path)?;
    Ok(parse_collars(&text, config))
}

pub fn read_surveys_csv(path: &str) -> io::Result<(Vec<Survey>, SkipReport)> {
    let text = super::read_to_string(path)?;
    Ok(parse_surveys(&text))
}

pub fn read_intervals_csv(path: &str) -> io::Result<(IntervalTable, SkipReport)> {
    let text = super::read_to_string(path)?;
    Ok(parse_intervals(&text))
}

/// Writes one row per trace vertex: `hole_id,vertex,x,y,z`.
pub fn write_traces_csv(path: &str, traces: &[Trajectory]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "hole_id,vertex,x,y,z")?;
    for t in traces {
        for (i, p) in t.points.iter().enumerate() {
            writeln!(
                file,
                "{},{},{},{},{}",
                t.hole_id,
                i,
                format_number(p.x),
                format_number(p.y),
                format_number(p.z)
            )?;
        }
    }
    Ok(())
}

/// Writes one row per trace: `hole_id,segment_length,total_depth,vertex_count`.
pub fn write_trace_summary_csv(path: &str, traces: &[Trajectory]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "hole_id,segment_length,total_depth,vertex_count")?;
    for t in traces {
        writeln!(
            file,
            "{},{},{},{}",
            t.hole_id,
            format_number(t.segment_length),
            format_number(t.total_depth),
            t.points.len()
        )?;
    }
    Ok(())
}

/// Writes projected intervals: hole, depths, the original attributes, the
/// from and to coordinates and the interval path as WKT.
pub fn write_intervals_csv(
    path: &str,
    attribute_names: &[String],
    intervals: &[ProjectedInterval],
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    let mut header = vec!["hole_id".to_string(), "from".into(), "to".into()];
    header.extend(attribute_names.iter().cloned());
    header.extend(
        ["from_x", "from_y", "from_z", "to_x", "to_y", "to_z", "geometry"]
            .iter()
            .map(|s| s.to_string()),
    );
    writeln!(file, "{}", header.join(","))?;
    for p in intervals {
        let iv = &p.interval;
        let mut row = vec![
            iv.hole_id.clone(),
            format_number(iv.from),
            format_number(iv.to),
        ];
        row.extend(iv.attributes.iter().cloned());
        // pad short rows so the coordinate columns line up with the header
        while row.len() < 3 + attribute_names.len() {
            row.push(String::new());
        }
        let (a, b) = (p.from_point(), p.to_point());
        row.extend([a.x, a.y, a.z, b.x, b.y, b.z].iter().map(|v| format_number(*v)));
        row.push(format!("\"{}\"", p.path.to_wkt()));
        writeln!(file, "{}", row.join(","))?;
    }
    Ok(())
}
