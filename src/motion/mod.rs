//! Motion module for a4988-motion.
//!
//! Provides ramp planning and per-step phase classification.

mod ramp;

pub use ramp::{RampPhase, RampPlan};
