//! Absolute position tracking in fixed 1/16-full-step units.

use super::microstep::MicrostepResolution;
use super::state::Direction;

/// Cumulative motor position counter.
///
/// The counter unit is 1/16 of a full step — the finest resolution the
/// A4988 supports — regardless of which microstepping mode is active. Every
/// emitted pulse adds or subtracts `16 / resolution` units, so positions
/// reached under different microstepping modes stay directly comparable.
///
/// Only the step-event handler mutates this counter during a move; all
/// other components read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionAccumulator {
    sixteenths: i32,
}

/// Accumulator units per full step.
const UNITS_PER_FULL_STEP: f32 = 16.0;

impl PositionAccumulator {
    /// Create a new accumulator at the origin.
    #[inline]
    pub const fn new() -> Self {
        Self { sixteenths: 0 }
    }

    /// Account for one emitted pulse.
    #[inline]
    pub fn advance(&mut self, direction: Direction, resolution: MicrostepResolution) {
        self.sixteenths += direction.sign() * resolution.sixteenths_per_pulse();
    }

    /// Current position in full steps.
    #[inline]
    pub fn full_steps(&self) -> f32 {
        self.sixteenths as f32 / UNITS_PER_FULL_STEP
    }

    /// Force-overwrite the position without moving.
    #[inline]
    pub fn set_full_steps(&mut self, full_steps: f32) {
        self.sixteenths = (UNITS_PER_FULL_STEP * full_steps) as i32;
    }

    /// Raw counter value in 1/16-full-step units.
    #[inline]
    pub fn raw(&self) -> i32 {
        self.sixteenths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_by_resolution() {
        let mut position = PositionAccumulator::new();

        position.advance(Direction::Cw, MicrostepResolution::Quarter);
        assert_eq!(position.raw(), 4);

        position.advance(Direction::Cw, MicrostepResolution::Sixteenth);
        assert_eq!(position.raw(), 5);

        position.advance(Direction::Ccw, MicrostepResolution::Full);
        assert_eq!(position.raw(), -11);
    }

    #[test]
    fn test_full_step_conversion() {
        let mut position = PositionAccumulator::new();
        for _ in 0..32 {
            position.advance(Direction::Cw, MicrostepResolution::Half);
        }
        // 32 half-step pulses = 16 full steps
        assert!((position.full_steps() - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_set_full_steps() {
        let mut position = PositionAccumulator::new();
        position.set_full_steps(-2.5);
        assert_eq!(position.raw(), -40);
        assert!((position.full_steps() + 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unit_independent_of_mode_changes() {
        // A pulse counted under one mode keeps its weight after the mode
        // changes; only new pulses use the new increment.
        let mut position = PositionAccumulator::new();
        position.advance(Direction::Cw, MicrostepResolution::Full);
        position.advance(Direction::Cw, MicrostepResolution::Eighth);
        assert_eq!(position.raw(), 18);
    }
}
