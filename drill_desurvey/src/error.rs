//! Error types for desurveying and interval projection.

use thiserror::Error;

/// Which end of an interval a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::From => write!(f, "From"),
            Endpoint::To => write!(f, "To"),
        }
    }
}

/// Errors raised while desurveying holes or projecting intervals.
///
/// None of these abort a batch: the offending record, endpoint or hole is
/// skipped and the error is kept in the batch's [`SkipReport`](crate::SkipReport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesurveyError {
    /// A required field is missing or not a finite number.
    #[error("malformed {record} record at row {row}: field `{field}` {reason}")]
    MalformedInput {
        record: &'static str,
        row: usize,
        field: String,
        reason: String,
    },

    /// A depth resolves outside the span covered by a trajectory.
    #[error("hole {hole}: {endpoint} depth {depth} outside trajectory (0 to {max_depth}) in row {row}")]
    GeometryOutOfRange {
        hole: String,
        endpoint: Endpoint,
        depth: f64,
        max_depth: f64,
        row: usize,
    },

    /// The hole cannot be desurveyed at all.
    #[error("hole {hole}: {reason}")]
    InvalidHoleDefinition { hole: String, reason: String },

    /// The run configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DesurveyError {
    pub fn malformed(
        record: &'static str,
        row: usize,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedInput {
            record,
            row,
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_hole(hole: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHoleDefinition {
            hole: hole.into(),
            reason: reason.into(),
        }
    }
}

impl From<DesurveyError> for std::io::Error {
    fn from(e: DesurveyError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    }
}
