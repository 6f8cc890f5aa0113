//! Core library for desurveying drill holes.
//!
//! A hole's collar and its survey stations are turned into a 3D trace
//! ([`Trajectory`]) by interpolating orientation quaternions between stations,
//! and from-to intervals are then placed onto that trace.

pub mod batch;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hole;
pub mod io;
pub mod orientation;
pub mod projection;
pub mod trajectory;

pub use batch::{desurvey_all, project_all, DesurveyRun, SkipReport, TraceIndex};
pub use config::DesurveyConfig;
pub use error::{DesurveyError, Endpoint};
pub use hole::{Collar, Interval, Survey, SurveyStation};
pub use orientation::{enforce_continuity, orientation_for, slerp, Orientation};
pub use projection::{locate, project, Location, ProjectedInterval};
pub use trajectory::{build_trajectory, sample_depths, Trajectory};
