//! # a4988-motion
//!
//! Interrupt-driven trapezoidal motion engine for A4988-class stepper
//! drivers with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Trapezoidal profiles**: accelerate / cruise / decelerate plans with
//!   independent acceleration and deceleration rates, degrading to a
//!   triangle when the travel distance is too short for top speed
//! - **Interrupt-rate scheduling**: one step and one timer-period
//!   recomputation per timer expiry, no allocation, no blocking
//! - **Limit-switch supervision**: debounce-friendly polled re-evaluation
//!   with hard-stop authority over any move in progress
//! - **Position tracking**: absolute position in fixed 1/16-full-step
//!   units, independent of the active microstepping mode
//! - **embedded-hal 1.0**: `OutputPin`/`InputPin` for the driver pins, a
//!   small timer trait for the step clock
//! - **no_std compatible**: the engine runs without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use a4988_motion::{A4988Hardware, EngineConfig, MotionEngine, MotionState};
//!
//! let config = a4988_motion::load_config("motion.toml")?;
//! let hw = A4988Hardware::new(
//!     step, dir, ms1, ms2, ms3, indicator, sw_neg, sw_pos, timer,
//!     config.invert_direction,
//! );
//! let mut engine = MotionEngine::new(hw, &config)?;
//!
//! // From the command loop:
//! engine.move_relative(250.0)?;
//!
//! // From the step timer interrupt, once per expiry:
//! engine.on_step_event()?;
//!
//! // Completion is observed by polling:
//! while engine.motion_state() == MotionState::Moving { /* ... */ }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod error;
pub mod hal;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use config::{validate_config, EngineConfig, SoftLimits};
pub use error::{Error, Result};
pub use hal::{A4988Hardware, LimitLevels, MotionHardware, StepTimer};
pub use motion::{RampPhase, RampPlan};
pub use motor::{
    Direction, MicrostepResolution, MotionEngine, MotionState, PositionAccumulator, SharedEngine,
    SwitchState, SwitchTrigger,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;
