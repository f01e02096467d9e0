//! The motion engine aggregate.
//!
//! [`MotionEngine`] owns every piece of motor state — ramp plan, position,
//! motion and switch state, tunable limits — and exposes the three entry
//! points the surrounding system calls into:
//!
//! - [`on_step_event`](MotionEngine::on_step_event) from the step timer's
//!   expiry event: emits one pulse and schedules the next,
//! - [`poll_switch_update`](MotionEngine::poll_switch_update) from the
//!   polling loop after the debounce delay of a switch-change trigger,
//! - the command surface (`move_relative`, `soft_stop`, setters, getters)
//!   from the command-dispatch loop.
//!
//! Sharing the engine between those contexts is the job of
//! [`SharedEngine`](super::SharedEngine).

use libm::fabsf;

use crate::config::{validate_config, EngineConfig, SoftLimits};
use crate::error::{ConfigError, Error, MotorError, Result};
use crate::hal::MotionHardware;
use crate::motion::{RampPhase, RampPlan};

use super::microstep::MicrostepResolution;
use super::position::PositionAccumulator;
use super::state::{Direction, MotionState, SwitchState};

/// Step rate of the first pulse after arming the timer, in steps/s.
///
/// The timer is preloaded so the first step of any move lands a fixed,
/// slow interval after `move_relative` arms it; the acceleration ramp takes
/// over from the second expiry on.
const INITIAL_STEP_RATE: f32 = 10.0;

/// Trapezoidal point-to-point motion engine for an A4988-class driver.
pub struct MotionEngine<HW: MotionHardware> {
    hw: HW,

    // Tunable limits (polling-context writers only).
    speed_limit: u16,
    acceleration: u16,
    deceleration: u16,
    microstepping: MicrostepResolution,
    soft_limits: Option<SoftLimits>,

    // Timer scaling, fixed at construction.
    timer_clock_hz: u32,
    timer_prescaler: u32,

    // Per-move state.
    plan: RampPlan,
    direction: Direction,
    motion_state: MotionState,
    switch_state: SwitchState,
    position: PositionAccumulator,

    /// Absolute target parked while a soft stop finishes.
    pending_target: Option<f32>,
}

impl<HW: MotionHardware> MotionEngine<HW> {
    /// Create an engine over the given hardware.
    ///
    /// Validates the configuration, applies the microstepping mode pins and
    /// samples the limit switches once so the initial [`SwitchState`]
    /// reflects reality before the first command arrives.
    pub fn new(hw: HW, config: &EngineConfig) -> Result<Self> {
        validate_config(config)?;

        let mut engine = Self {
            hw,
            speed_limit: config.speed_limit,
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            microstepping: config.microsteps,
            soft_limits: config.soft_limits,
            timer_clock_hz: config.timer_clock_hz,
            timer_prescaler: config.timer_prescaler,
            plan: RampPlan::idle(),
            direction: Direction::Cw,
            motion_state: MotionState::Stopped,
            switch_state: SwitchState::Free,
            position: PositionAccumulator::new(),
            pending_target: None,
        };

        engine.hw.apply_microstep_mode(engine.microstepping)?;
        engine.poll_switch_update()?;

        Ok(engine)
    }

    /// Handle one step timer expiry.
    ///
    /// Emits exactly one step pulse, reprograms the delay to the next one
    /// according to the ramp phase, and advances the plan and the position
    /// accumulator. On the final step of the plan the timer is disarmed and
    /// the state returns to `Stopped`.
    ///
    /// A spurious expiry delivered after a stop is ignored without touching
    /// any state.
    pub fn on_step_event(&mut self) -> Result<()> {
        if self.motion_state != MotionState::Moving {
            return Ok(());
        }

        self.hw.step_high()?;

        match self.plan.phase() {
            RampPhase::Accelerating => {
                let speed = self.plan.accelerating_speed(self.acceleration, self.microstepping);
                self.plan.current_speed = speed;
                let period = self.period_for_speed(speed);
                self.hw.set_step_period(period);
            }
            // The last acceleration step already converged the period to
            // the configured top speed; cruise pulses reuse it unchanged.
            RampPhase::Cruising => {}
            RampPhase::Decelerating => {
                let speed = self.plan.decelerating_speed(self.deceleration, self.microstepping);
                self.plan.current_speed = speed;
                let period = self.period_for_speed(speed);
                self.hw.set_step_period(period);
            }
            RampPhase::FinalStep => {
                self.hw.disarm_step_timer();
                self.motion_state = MotionState::Stopped;
            }
        }

        self.plan.advance();
        self.position.advance(self.direction, self.microstepping);

        self.hw.step_low()?;

        // A soft-stopped absolute move resumes from the settled position.
        if self.motion_state == MotionState::Stopped {
            if let Some(target) = self.pending_target.take() {
                self.move_absolute(target)?;
            }
        }

        Ok(())
    }

    /// Move relative to the current position, in full steps.
    ///
    /// Silently ignored while a move is in progress, while both switches
    /// report a fault, or while the limit matching the requested direction
    /// is asserted; callers wanting diagnostics check
    /// [`motion_state`](Self::motion_state) and
    /// [`switch_state`](Self::switch_state). A target outside the soft
    /// limits is an explicit error.
    pub fn move_relative(&mut self, distance: f32) -> Result<()> {
        if self.motion_state == MotionState::Moving {
            return Ok(());
        }

        let direction = Direction::from_distance(distance);
        if self.switch_state.blocks(direction) {
            return Ok(());
        }

        if let Some(limits) = self.soft_limits {
            let target = self.position.full_steps() + distance;
            if !limits.contains(target) {
                return Err(Error::Motor(MotorError::SoftLimitExceeded {
                    target,
                    min: limits.min,
                    max: limits.max,
                }));
            }
        }

        let microsteps = (fabsf(distance) * self.microstepping.value() as f32) as u32;
        if microsteps == 0 {
            return Ok(());
        }

        self.hw.set_direction(direction)?;
        self.direction = direction;
        self.plan = RampPlan::plan(
            microsteps,
            self.speed_limit,
            self.acceleration,
            self.deceleration,
            self.microstepping,
        );

        self.hw.arm_step_timer(self.initial_period());
        self.motion_state = MotionState::Moving;
        Ok(())
    }

    /// Move to an absolute position, in full steps.
    ///
    /// If a move is in progress the engine soft-stops first and replays the
    /// absolute target once the stop ramp completes, computing the relative
    /// distance from the position actually settled at.
    pub fn move_absolute(&mut self, target: f32) -> Result<()> {
        if self.motion_state == MotionState::Moving {
            self.pending_target = Some(target);
            self.soft_stop();
            return Ok(());
        }

        let distance = target - self.position.full_steps();
        self.move_relative(distance)
    }

    /// Stop the current move without exceeding the configured deceleration.
    ///
    /// Rewrites the plan into a deceleration-only ramp from the current
    /// speed; the step handler drives it to standstill. No-op while
    /// stopped.
    pub fn soft_stop(&mut self) {
        if self.motion_state == MotionState::Moving {
            self.plan.replan_stop(self.deceleration);
        }
    }

    /// Re-evaluate the limit switches.
    ///
    /// Called by the surrounding loop after its debounce delay whenever the
    /// switch-change trigger fired. Any classification other than `Free`
    /// hard-stops the motor — the timer is disarmed immediately, the
    /// remaining plan is discarded and the deceleration limit is *not*
    /// honored, since the motor is assumed to sit at a mechanical boundary
    /// — and raises the indicator output.
    pub fn poll_switch_update(&mut self) -> Result<()> {
        let levels = self.hw.read_limit_inputs()?;
        let state = SwitchState::classify(levels.neg_active, levels.pos_active);
        self.switch_state = state;

        if state == SwitchState::Free {
            self.hw.set_indicator(false)?;
        } else {
            self.hard_stop();
            self.hw.set_indicator(true)?;
        }
        Ok(())
    }

    fn hard_stop(&mut self) {
        self.hw.disarm_step_timer();
        self.motion_state = MotionState::Stopped;
        self.plan = RampPlan::idle();
        self.pending_target = None;
    }

    /// Set the speed limit in full steps per second.
    pub fn set_max_speed(&mut self, speed: u16) -> Result<()> {
        if speed == 0 {
            return Err(ConfigError::InvalidSpeedLimit(speed).into());
        }
        self.speed_limit = speed;
        Ok(())
    }

    /// Set the acceleration in full-steps/s per step traveled.
    pub fn set_acceleration(&mut self, acceleration: u16) -> Result<()> {
        if acceleration == 0 {
            return Err(ConfigError::InvalidAcceleration(acceleration).into());
        }
        self.acceleration = acceleration;
        Ok(())
    }

    /// Set the deceleration in full-steps/s per step traveled.
    pub fn set_deceleration(&mut self, deceleration: u16) -> Result<()> {
        if deceleration == 0 {
            return Err(ConfigError::InvalidDeceleration(deceleration).into());
        }
        self.deceleration = deceleration;
        Ok(())
    }

    /// Force-overwrite the position accumulator without moving.
    pub fn set_position(&mut self, full_steps: f32) {
        self.position.set_full_steps(full_steps);
    }

    /// Select a microstepping resolution and drive the mode pins.
    ///
    /// Takes effect for the next planned move; an in-flight ramp keeps the
    /// resolution it was planned with.
    pub fn set_microstepping(&mut self, resolution: MicrostepResolution) -> Result<()> {
        self.hw.apply_microstep_mode(resolution)?;
        self.microstepping = resolution;
        Ok(())
    }

    /// Replace the soft travel limits.
    pub fn set_soft_limits(&mut self, limits: Option<SoftLimits>) -> Result<()> {
        if let Some(l) = &limits {
            l.validate()?;
        }
        self.soft_limits = limits;
        Ok(())
    }

    /// Current position in full steps.
    pub fn position(&self) -> f32 {
        self.position.full_steps()
    }

    /// Speed limit in full steps per second.
    pub fn speed_limit(&self) -> u16 {
        self.speed_limit
    }

    /// Acceleration in full-steps/s per step traveled.
    pub fn acceleration(&self) -> u16 {
        self.acceleration
    }

    /// Deceleration in full-steps/s per step traveled.
    pub fn deceleration(&self) -> u16 {
        self.deceleration
    }

    /// Whether the motor is currently moving.
    pub fn motion_state(&self) -> MotionState {
        self.motion_state
    }

    /// Classified limit-switch state from the last evaluation.
    pub fn switch_state(&self) -> SwitchState {
        self.switch_state
    }

    /// Direction of the current or last move.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Active microstepping resolution.
    pub fn microstepping(&self) -> MicrostepResolution {
        self.microstepping
    }

    /// Configured soft travel limits.
    pub fn soft_limits(&self) -> Option<SoftLimits> {
        self.soft_limits
    }

    /// The active ramp plan.
    pub fn plan(&self) -> &RampPlan {
        &self.plan
    }

    /// Borrow the underlying hardware.
    pub fn hardware(&self) -> &HW {
        &self.hw
    }

    /// Mutably borrow the underlying hardware.
    pub fn hardware_mut(&mut self) -> &mut HW {
        &mut self.hw
    }

    /// Timer period in ticks for a step rate.
    ///
    /// `speed` is strictly positive in every phase that reprograms the
    /// timer (the planner's inputs are validated non-zero and the phase
    /// ranges keep the step factors >= 1), so the division is safe.
    fn period_for_speed(&self, speed: f32) -> u32 {
        let ticks =
            self.timer_clock_hz as f32 / (self.timer_prescaler as f32 * speed) - 1.0;
        if ticks < 1.0 {
            1
        } else if ticks >= u32::MAX as f32 {
            u32::MAX
        } else {
            ticks as u32
        }
    }

    fn initial_period(&self) -> u32 {
        self.period_for_speed(INITIAL_STEP_RATE)
    }
}
