//! Engine configuration from TOML.

use serde::Deserialize;

use super::limits::SoftLimits;
use crate::motor::MicrostepResolution;

/// Complete motion engine configuration.
///
/// All fields have defaults matching the reference controller (16 MHz timer
/// clock behind a 1024 prescaler, 200 full-steps/s speed limit, symmetric
/// ramps of 100), so an empty TOML document is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Step timer input clock in Hz.
    #[serde(default = "default_timer_clock_hz")]
    pub timer_clock_hz: u32,

    /// Fixed prescaler between the clock and the timer tick.
    #[serde(default = "default_timer_prescaler")]
    pub timer_prescaler: u32,

    /// Speed limit in full steps per second.
    #[serde(default = "default_speed_limit")]
    pub speed_limit: u16,

    /// Acceleration in full-steps/s gained per step traveled.
    #[serde(default = "default_ramp_rate")]
    pub acceleration: u16,

    /// Deceleration in full-steps/s shed per step traveled.
    #[serde(default = "default_ramp_rate")]
    pub deceleration: u16,

    /// Initial microstepping resolution.
    #[serde(default)]
    pub microsteps: MicrostepResolution,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Optional soft travel limits in full steps.
    #[serde(default)]
    pub soft_limits: Option<SoftLimits>,
}

fn default_timer_clock_hz() -> u32 {
    16_000_000
}

fn default_timer_prescaler() -> u32 {
    1024
}

fn default_speed_limit() -> u16 {
    200
}

fn default_ramp_rate() -> u16 {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timer_clock_hz: default_timer_clock_hz(),
            timer_prescaler: default_timer_prescaler(),
            speed_limit: default_speed_limit(),
            acceleration: default_ramp_rate(),
            deceleration: default_ramp_rate(),
            microsteps: MicrostepResolution::default(),
            invert_direction: false,
            soft_limits: None,
        }
    }
}
