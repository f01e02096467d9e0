//! Trapezoidal ramp planning and per-step speed recomputation.
//!
//! A plan splits a requested travel distance into accelerate / cruise /
//! decelerate segments measured in microsteps. Acceleration and
//! deceleration are spatial rates (full steps/s gained per step traveled,
//! not a time derivative): the ramp length in steps is what must fit inside
//! the requested distance, so bounding it in steps keeps the arithmetic
//! exact.

use libm::sqrtf;

use crate::motor::MicrostepResolution;

/// Ramp phase of a single step index within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampPhase {
    /// Speed rises toward the limit; the timer period shrinks every step.
    Accelerating,
    /// Constant top speed; the period stays at the value the last
    /// acceleration step converged to.
    Cruising,
    /// Speed falls toward zero; the period grows every step.
    Decelerating,
    /// Last step of the plan; the timer is stopped instead of reprogrammed.
    FinalStep,
}

/// The active move's schedule.
///
/// Owned by the planner / step-event handler pair. `current_step` advances
/// monotonically through the plan; `current_speed` carries the step rate
/// between invocations so a stop replan can start from the speed actually
/// in effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampPlan {
    /// Total microsteps in the plan.
    pub total_steps: u32,
    /// Microsteps spent accelerating.
    pub steps_to_accelerate: u32,
    /// Microsteps spent at constant top speed.
    pub steps_to_cruise: u32,
    /// Microsteps spent decelerating.
    pub steps_to_decelerate: u32,
    /// Index of the next step to execute, 0-based.
    pub current_step: u32,
    /// Instantaneous step rate in full-steps/s equivalent.
    pub current_speed: f32,
}

impl RampPlan {
    /// An empty plan with no steps scheduled.
    pub const fn idle() -> Self {
        Self {
            total_steps: 0,
            steps_to_accelerate: 0,
            steps_to_cruise: 0,
            steps_to_decelerate: 0,
            current_step: 0,
            current_speed: 0.0,
        }
    }

    /// Plan a move of `requested_steps` microsteps.
    ///
    /// If the full acceleration and deceleration ramps fit inside the
    /// requested distance the profile is a trapezoid that reaches
    /// `speed_limit`; otherwise the distance is split between the two ramps
    /// in proportion to the acceleration:deceleration ratio and top speed
    /// is never reached (triangle).
    ///
    /// Callers must reject zero `speed_limit`/`acceleration`/`deceleration`
    /// before planning; see [`crate::config::validate_config`].
    pub fn plan(
        requested_steps: u32,
        speed_limit: u16,
        acceleration: u16,
        deceleration: u16,
        resolution: MicrostepResolution,
    ) -> Self {
        let v = speed_limit as f32;
        let acc = acceleration as f32;
        let dec = deceleration as f32;
        let microsteps = resolution.value() as f32;

        // The float-to-int casts saturate at u32::MAX for extreme limits,
        // so the sum must saturate too; a saturated sum always exceeds the
        // requested distance and selects the triangle branch.
        let acc_steps = (v * v * microsteps / (2.0 * acc)) as u32;
        let dec_steps = (v * v * microsteps / (2.0 * dec)) as u32;
        let ramp_steps = acc_steps.saturating_add(dec_steps);

        let (steps_to_accelerate, steps_to_cruise, steps_to_decelerate) =
            if ramp_steps <= requested_steps {
                (acc_steps, requested_steps - ramp_steps, dec_steps)
            } else {
                let accelerate = (requested_steps as f32 / (1.0 + acc / dec)) as u32;
                (accelerate, 0, requested_steps - accelerate)
            };

        Self {
            total_steps: requested_steps,
            steps_to_accelerate,
            steps_to_cruise,
            steps_to_decelerate,
            current_step: 0,
            current_speed: 0.0,
        }
    }

    /// Rewrite this plan in place into a deceleration-only ramp from the
    /// current speed.
    ///
    /// With no accelerate or cruise segment the very next step classifies
    /// as decelerating (or as the final step for a near-standstill speed),
    /// so the stop never exceeds `deceleration` no matter how far into the
    /// original plan the abort happened. `current_speed` is left untouched:
    /// the next decelerating step computes from it, which keeps the speed
    /// curve continuous across the replan.
    pub fn replan_stop(&mut self, deceleration: u16) {
        let dec = deceleration as f32;
        let stopping_steps = (self.current_speed * self.current_speed / (2.0 * dec)) as u32;

        self.steps_to_accelerate = 0;
        self.steps_to_cruise = 0;
        self.steps_to_decelerate = stopping_steps;
        self.total_steps = stopping_steps;
        self.current_step = 0;
    }

    /// Classify the current step index.
    ///
    /// The final-step range overlaps the cruise range for very short plans;
    /// the final step wins so a degenerate plan always halts the timer.
    pub fn phase(&self) -> RampPhase {
        if self.current_step >= self.total_steps.saturating_sub(1) {
            RampPhase::FinalStep
        } else if self.current_step < self.steps_to_accelerate {
            RampPhase::Accelerating
        } else if self.current_step <= self.steps_to_accelerate + self.steps_to_cruise {
            RampPhase::Cruising
        } else {
            RampPhase::Decelerating
        }
    }

    /// Speed for the current step while accelerating.
    ///
    /// The operator grouping (`acceleration * microsteps`) reproduces the
    /// controller's established unit behavior; keep it.
    #[inline]
    pub fn accelerating_speed(&self, acceleration: u16, resolution: MicrostepResolution) -> f32 {
        let n = (self.current_step + 1) as f32;
        sqrtf(2.0 * n * acceleration as f32 * resolution.value() as f32)
    }

    /// Speed for the current step while decelerating.
    #[inline]
    pub fn decelerating_speed(&self, deceleration: u16, resolution: MicrostepResolution) -> f32 {
        let remaining = (self.total_steps - self.current_step - 1) as f32;
        sqrtf(2.0 * remaining * deceleration as f32 * resolution.value() as f32)
    }

    /// Advance to the next step index.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step += 1;
    }

    /// Steps not yet executed.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.total_steps.saturating_sub(self.current_step)
    }
}

impl Default for RampPlan {
    fn default() -> Self {
        Self::idle()
    }
}
