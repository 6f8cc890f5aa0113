//! Run configuration for a desurvey batch.

use crate::error::DesurveyError;

/// Settings consumed by the trajectory builder and the batch runner.
///
/// The values are passed explicitly into every operation; nothing is read
/// from process-wide state.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DesurveyConfig {
    /// Sampling step along the hole, in the collar's linear unit.
    pub desurvey_length: f64,
    /// Down-hole dips are negative (e.g. -60) when set, positive otherwise.
    pub down_dip_negative: bool,
    /// Use a collar's own azimuth/dip when the hole has no survey stations.
    pub use_collar_orientation: bool,
    /// Sample single-station holes every `desurvey_length` instead of
    /// emitting a single segment.
    pub densify_straight_holes: bool,
    /// Suffix appended to the trace file name for projected interval output.
    pub data_suffix: String,
}

impl Default for DesurveyConfig {
    fn default() -> Self {
        Self {
            desurvey_length: 1.0,
            down_dip_negative: true,
            use_collar_orientation: true,
            densify_straight_holes: false,
            data_suffix: "trace".to_string(),
        }
    }
}

impl DesurveyConfig {
    /// Checks that the sampling step is usable.
    pub fn validate(&self) -> Result<(), DesurveyError> {
        if !self.desurvey_length.is_finite() || self.desurvey_length <= 0.0 {
            return Err(DesurveyError::InvalidConfig(format!(
                "desurvey length must be a positive number, got {}",
                self.desurvey_length
            )));
        }
        Ok(())
    }

    /// Dip of a vertical, downward hole under this configuration.
    pub fn vertical_dip(&self) -> f64 {
        crate::orientation::vertical_dip(self.down_dip_negative)
    }

    /// Saves this configuration to a JSON file.
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        crate::io::write_string(path, &json)
    }

    /// Loads a configuration from a JSON file. Missing fields keep their
    /// default values.
    pub fn load(path: &str) -> std::io::Result<Self> {
        let data = crate::io::read_to_string(path)?;
        let config: DesurveyConfig = serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        config.validate()?;
        Ok(config)
    }
}
