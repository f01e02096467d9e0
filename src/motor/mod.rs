//! Motor module for a4988-motion.
//!
//! Provides the motion engine aggregate, position tracking, state enums and
//! the microstep configurator.

mod engine;
mod microstep;
mod position;
mod shared;
mod state;

pub use engine::MotionEngine;
pub use microstep::{MicrostepResolution, ModeLevels};
pub use position::PositionAccumulator;
pub use shared::{SharedEngine, SwitchTrigger};
pub use state::{Direction, MotionState, SwitchState};
