//! Basic 3D geometry primitives for drill traces.

mod line3;
mod point3;

pub use line3::{Line3, Polyline3};
pub use point3::Point3;

/// Formats a coordinate or depth for text output, rounded to six decimals
/// with trailing zeros removed.
pub fn format_number(v: f64) -> String {
    let s = format!("{:.6}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Calculates the Euclidean distance between two 3D points.
pub fn distance3(a: Point3, b: Point3) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2) + (b.z - a.z).powi(2)).sqrt()
}
