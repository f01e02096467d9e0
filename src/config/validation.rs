//! Configuration validation.

use super::engine::EngineConfig;
use crate::error::ConfigError;

/// Validate an engine configuration.
///
/// Zero ramp rates and speeds are rejected here rather than deferred to the
/// planner: a zero would otherwise reach the division that derives the
/// timer period inside the step-event handler.
pub fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.timer_clock_hz == 0 {
        return Err(ConfigError::InvalidTimerClock(config.timer_clock_hz));
    }
    if config.timer_prescaler == 0 {
        return Err(ConfigError::InvalidTimerPrescaler(config.timer_prescaler));
    }
    if config.speed_limit == 0 {
        return Err(ConfigError::InvalidSpeedLimit(config.speed_limit));
    }
    if config.acceleration == 0 {
        return Err(ConfigError::InvalidAcceleration(config.acceleration));
    }
    if config.deceleration == 0 {
        return Err(ConfigError::InvalidDeceleration(config.deceleration));
    }
    if let Some(limits) = &config.soft_limits {
        limits.validate()?;
    }
    Ok(())
}
