//! Integration tests for the motion engine.
//!
//! A scripted [`MotionHardware`] recorder stands in for the timer and GPIO
//! so complete moves can be replayed on the host, one step event at a time,
//! exactly as the timer interrupt would drive them.

use a4988_motion::{
    Direction, EngineConfig, Error, LimitLevels, MicrostepResolution, MotionEngine,
    MotionHardware, MotionState, RampPhase, Result, SoftLimits, SwitchState,
};

// =============================================================================
// Mock hardware
// =============================================================================

#[derive(Debug, Default)]
struct MockHardware {
    /// Step pulses emitted (each high/low edge pair counts once).
    pulses: u32,
    /// Level currently on the step output.
    step_level: bool,
    direction: Option<Direction>,
    mode: Option<MicrostepResolution>,
    indicator: bool,
    /// Levels the next limit read returns.
    limit_levels: LimitLevels,
    timer_armed: bool,
    arm_count: u32,
    last_period: Option<u32>,
}

impl MotionHardware for MockHardware {
    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        self.direction = Some(direction);
        Ok(())
    }

    fn step_high(&mut self) -> Result<()> {
        assert!(!self.step_level, "step pulse nested");
        self.step_level = true;
        Ok(())
    }

    fn step_low(&mut self) -> Result<()> {
        assert!(self.step_level, "falling edge without rising edge");
        self.step_level = false;
        self.pulses += 1;
        Ok(())
    }

    fn apply_microstep_mode(&mut self, resolution: MicrostepResolution) -> Result<()> {
        self.mode = Some(resolution);
        Ok(())
    }

    fn read_limit_inputs(&mut self) -> Result<LimitLevels> {
        Ok(self.limit_levels)
    }

    fn set_indicator(&mut self, active: bool) -> Result<()> {
        self.indicator = active;
        Ok(())
    }

    fn arm_step_timer(&mut self, period_ticks: u32) {
        self.timer_armed = true;
        self.arm_count += 1;
        self.last_period = Some(period_ticks);
    }

    fn set_step_period(&mut self, period_ticks: u32) {
        assert!(period_ticks > 0, "zero timer period");
        self.last_period = Some(period_ticks);
    }

    fn disarm_step_timer(&mut self) {
        self.timer_armed = false;
    }
}

fn quarter_step_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.microsteps = MicrostepResolution::Quarter;
    config
}

fn engine_with(config: &EngineConfig) -> MotionEngine<MockHardware> {
    MotionEngine::new(MockHardware::default(), config).unwrap()
}

/// Deliver step events until the motor stops, as the timer interrupt would.
fn run_to_stop(engine: &mut MotionEngine<MockHardware>, max_events: u32) {
    for _ in 0..max_events {
        if engine.motion_state() == MotionState::Stopped {
            return;
        }
        engine.on_step_event().unwrap();
    }
    panic!("move did not complete within {} events", max_events);
}

// =============================================================================
// Completed moves
// =============================================================================

#[test]
fn test_relative_move_completes_at_target() {
    let mut engine = engine_with(&quarter_step_config());

    engine.move_relative(250.0).unwrap();
    assert_eq!(engine.motion_state(), MotionState::Moving);
    assert_eq!(engine.plan().total_steps, 1000);
    assert!(engine.hardware().timer_armed);

    run_to_stop(&mut engine, 1100);

    assert_eq!(engine.hardware().pulses, 1000);
    assert!((engine.position() - 250.0).abs() < f32::EPSILON);
    assert!(!engine.hardware().timer_armed);
    assert_eq!(engine.hardware().direction, Some(Direction::Cw));
}

#[test]
fn test_negative_move_counts_down() {
    let mut engine = engine_with(&quarter_step_config());

    engine.move_relative(-250.0).unwrap();
    run_to_stop(&mut engine, 1100);

    assert_eq!(engine.hardware().pulses, 1000);
    assert!((engine.position() + 250.0).abs() < f32::EPSILON);
    assert_eq!(engine.hardware().direction, Some(Direction::Ccw));
}

#[test]
fn test_position_unit_survives_mode_change_after_move() {
    let mut engine = engine_with(&quarter_step_config());

    engine.move_relative(10.0).unwrap();
    run_to_stop(&mut engine, 200);
    assert!((engine.position() - 10.0).abs() < f32::EPSILON);

    // Switching resolution afterwards must not rescale the accumulator.
    engine.set_microstepping(MicrostepResolution::Sixteenth).unwrap();
    assert!((engine.position() - 10.0).abs() < f32::EPSILON);
    assert_eq!(engine.hardware().mode, Some(MicrostepResolution::Sixteenth));
}

#[test]
fn test_absolute_move_from_standstill() {
    let mut engine = engine_with(&quarter_step_config());
    engine.set_position(100.0);

    engine.move_absolute(75.0).unwrap();
    run_to_stop(&mut engine, 200);

    assert!((engine.position() - 75.0).abs() < f32::EPSILON);
    assert_eq!(engine.hardware().direction, Some(Direction::Ccw));
}

// =============================================================================
// Rejected commands
// =============================================================================

#[test]
fn test_move_while_moving_changes_nothing() {
    let mut engine = engine_with(&quarter_step_config());

    engine.move_relative(100.0).unwrap();
    for _ in 0..3 {
        engine.on_step_event().unwrap();
    }

    let plan_before = *engine.plan();
    let position_before = engine.position();

    engine.move_relative(50.0).unwrap();

    assert_eq!(*engine.plan(), plan_before);
    assert!((engine.position() - position_before).abs() < f32::EPSILON);
    assert_eq!(engine.motion_state(), MotionState::Moving);
}

#[test]
fn test_limit_blocks_matching_direction_only() {
    let mut engine = engine_with(&quarter_step_config());

    engine.hardware_mut().limit_levels = LimitLevels {
        neg_active: true,
        pos_active: false,
    };
    engine.poll_switch_update().unwrap();
    assert_eq!(engine.switch_state(), SwitchState::LimitPos);
    assert!(engine.hardware().indicator);

    // Positive travel is blocked...
    engine.move_relative(10.0).unwrap();
    assert_eq!(engine.motion_state(), MotionState::Stopped);

    // ...but backing away from the switch is allowed.
    engine.move_relative(-10.0).unwrap();
    assert_eq!(engine.motion_state(), MotionState::Moving);
}

#[test]
fn test_fault_blocks_both_directions() {
    let mut engine = engine_with(&quarter_step_config());

    engine.hardware_mut().limit_levels = LimitLevels {
        neg_active: true,
        pos_active: true,
    };
    engine.poll_switch_update().unwrap();
    assert_eq!(engine.switch_state(), SwitchState::Fault);

    engine.move_relative(10.0).unwrap();
    assert_eq!(engine.motion_state(), MotionState::Stopped);
    engine.move_relative(-10.0).unwrap();
    assert_eq!(engine.motion_state(), MotionState::Stopped);
}

#[test]
fn test_free_classification_clears_indicator() {
    let mut engine = engine_with(&quarter_step_config());

    engine.hardware_mut().limit_levels = LimitLevels {
        neg_active: false,
        pos_active: true,
    };
    engine.poll_switch_update().unwrap();
    assert_eq!(engine.switch_state(), SwitchState::LimitNeg);
    assert!(engine.hardware().indicator);

    engine.hardware_mut().limit_levels = LimitLevels::default();
    engine.poll_switch_update().unwrap();
    assert_eq!(engine.switch_state(), SwitchState::Free);
    assert!(!engine.hardware().indicator);
}

#[test]
fn test_soft_limit_rejected_with_error() {
    let mut config = quarter_step_config();
    config.soft_limits = Some(SoftLimits { min: -10.0, max: 10.0 });
    let mut engine = engine_with(&config);

    let result = engine.move_relative(50.0);
    assert!(matches!(result, Err(Error::Motor(_))));
    assert_eq!(engine.motion_state(), MotionState::Stopped);

    let result = engine.move_absolute(-20.0);
    assert!(matches!(result, Err(Error::Motor(_))));

    // Within the window the move is accepted.
    engine.move_relative(5.0).unwrap();
    assert_eq!(engine.motion_state(), MotionState::Moving);
}

// =============================================================================
// Stops
// =============================================================================

#[test]
fn test_hard_stop_freezes_position() {
    let mut engine = engine_with(&quarter_step_config());

    engine.move_relative(250.0).unwrap();
    for _ in 0..100 {
        engine.on_step_event().unwrap();
    }
    let position_before = engine.position();

    engine.hardware_mut().limit_levels = LimitLevels {
        neg_active: true,
        pos_active: false,
    };
    engine.poll_switch_update().unwrap();

    assert_eq!(engine.motion_state(), MotionState::Stopped);
    assert!(!engine.hardware().timer_armed);
    assert!((engine.position() - position_before).abs() < f32::EPSILON);

    // A timer expiry that raced the stop must not emit another pulse.
    engine.on_step_event().unwrap();
    assert_eq!(engine.hardware().pulses, 100);
    assert!((engine.position() - position_before).abs() < f32::EPSILON);
}

#[test]
fn test_soft_stop_plan_matches_current_speed() {
    let mut engine = engine_with(&quarter_step_config());

    // 4000-microstep trapezoid: 800 accelerate, 2400 cruise, 800 decelerate.
    engine.move_relative(1000.0).unwrap();
    for _ in 0..1500 {
        engine.on_step_event().unwrap();
    }
    assert_eq!(engine.plan().phase(), RampPhase::Cruising);

    // Cruise step rate is 200 full-steps/s · 4 microsteps = 800.
    let speed = engine.plan().current_speed;
    assert!((speed - 800.0).abs() < 1.0);

    engine.soft_stop();

    let expected_steps = (speed * speed / (2.0 * 100.0)) as u32;
    assert_eq!(engine.plan().steps_to_decelerate, expected_steps);
    assert_eq!(engine.plan().steps_to_accelerate, 0);
    assert_eq!(engine.plan().steps_to_cruise, 0);
    assert_eq!(engine.plan().total_steps, expected_steps);

    let pulses_before = engine.hardware().pulses;
    run_to_stop(&mut engine, expected_steps + 10);
    assert_eq!(engine.hardware().pulses - pulses_before, expected_steps);
    assert_eq!(engine.motion_state(), MotionState::Stopped);
}

#[test]
fn test_soft_stop_while_stopped_is_noop() {
    let mut engine = engine_with(&quarter_step_config());
    engine.soft_stop();
    assert_eq!(engine.motion_state(), MotionState::Stopped);
    assert_eq!(engine.plan().total_steps, 0);
}

#[test]
fn test_absolute_move_while_moving_defers_target() {
    let mut engine = engine_with(&quarter_step_config());

    engine.move_relative(100.0).unwrap();
    for _ in 0..50 {
        engine.on_step_event().unwrap();
    }

    // Soft-stops now, re-issues the move toward 0.0 once settled.
    engine.move_absolute(0.0).unwrap();
    assert_eq!(engine.motion_state(), MotionState::Moving);
    assert_eq!(engine.plan().steps_to_accelerate, 0);

    run_to_stop(&mut engine, 5000);

    assert!((engine.position() - 0.0).abs() < f32::EPSILON);
    assert_eq!(engine.hardware().direction, Some(Direction::Ccw));
}

// =============================================================================
// Timer programming
// =============================================================================

#[test]
fn test_periods_shrink_while_accelerating() {
    let mut engine = engine_with(&quarter_step_config());

    engine.move_relative(1000.0).unwrap();

    let mut last = u32::MAX;
    while engine.plan().phase() == RampPhase::Accelerating {
        engine.on_step_event().unwrap();
        let period = engine.hardware().last_period.unwrap();
        assert!(period <= last, "period grew during acceleration");
        last = period;
    }
    // 16 MHz / (1024 · 800) − 1 = 18 ticks at the cruise step rate.
    assert_eq!(last, 18);
}

#[test]
fn test_cruise_keeps_converged_period() {
    let mut engine = engine_with(&quarter_step_config());

    engine.move_relative(1000.0).unwrap();
    for _ in 0..800 {
        engine.on_step_event().unwrap();
    }
    let converged = engine.hardware().last_period;

    for _ in 0..1000 {
        engine.on_step_event().unwrap();
    }
    assert_eq!(engine.hardware().last_period, converged);
}
