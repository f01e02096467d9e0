//! Soft position limits in full steps.

use serde::Deserialize;

use crate::error::ConfigError;

/// Software travel limits, checked before a move is planned.
///
/// Unlike the limit switches these are pure bookkeeping: a target outside
/// the window is rejected with an explicit error and no motion starts.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SoftLimits {
    /// Most negative allowed position in full steps.
    pub min: f32,
    /// Most positive allowed position in full steps.
    pub max: f32,
}

impl SoftLimits {
    /// Whether a target position lies inside the window.
    #[inline]
    pub fn contains(&self, target: f32) -> bool {
        self.min <= target && target <= self.max
    }

    /// Check the window is well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min < self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidSoftLimits {
                min: self.min,
                max: self.max,
            })
        }
    }
}
