//! Error types for the a4988-motion library.
//!
//! Provides unified error handling across configuration and motor control.
//! Rejected motion commands (busy motor, asserted limit) are deliberately
//! *not* errors: they are silent no-ops observable through the state
//! getters, so only configuration and hardware failures surface here.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all a4988-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor operation error
    Motor(MotorError),
}

/// Configuration-related errors.
///
/// Degenerate ramp parameters are rejected here, at the setter/config
/// boundary, so the step-event handler never has to guard against a
/// division by zero when deriving a timer period.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Speed limit must be greater than zero (full steps/s)
    InvalidSpeedLimit(u16),
    /// Acceleration must be greater than zero (full steps/s per step)
    InvalidAcceleration(u16),
    /// Deceleration must be greater than zero (full steps/s per step)
    InvalidDeceleration(u16),
    /// Invalid microstep value (must be 1, 2, 4, 8 or 16)
    InvalidMicrosteps(u16),
    /// Timer clock frequency must be greater than zero
    InvalidTimerClock(u32),
    /// Timer prescaler must be greater than zero
    InvalidTimerPrescaler(u32),
    /// Invalid soft limits (min must be < max)
    InvalidSoftLimits {
        /// Negative limit in full steps
        min: f32,
        /// Positive limit in full steps
        max: f32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// Requested target lies outside the configured soft limits
    SoftLimitExceeded {
        /// Requested target position in full steps
        target: f32,
        /// Negative soft limit in full steps
        min: f32,
        /// Positive soft limit in full steps
        max: f32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidSpeedLimit(v) => {
                write!(f, "Invalid speed limit: {}. Must be > 0", v)
            }
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidDeceleration(v) => {
                write!(f, "Invalid deceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16", v)
            }
            ConfigError::InvalidTimerClock(v) => {
                write!(f, "Invalid timer clock: {} Hz. Must be > 0", v)
            }
            ConfigError::InvalidTimerPrescaler(v) => {
                write!(f, "Invalid timer prescaler: {}. Must be > 0", v)
            }
            ConfigError::InvalidSoftLimits { min, max } => {
                write!(f, "Invalid soft limits: min ({}) must be < max ({})", min, max)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::SoftLimitExceeded { target, min, max } => {
                write!(f, "Target {} outside soft limits [{}, {}]", target, min, max)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}
