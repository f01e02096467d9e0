//! Hardware capability interface.
//!
//! The motion engine never touches registers directly: everything it needs
//! from the platform — step/direction outputs, the mode pins, the limit
//! inputs, the indicator and the variable-period step timer — goes through
//! [`MotionHardware`]. This keeps the engine logic unit-testable on a host
//! and leaves scheduling (who delivers timer events, at what priority) to
//! the platform layer.
//!
//! [`A4988Hardware`] is the ready-made adapter over embedded-hal 1.0 pins
//! plus a platform [`StepTimer`].

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::{MotorError, Result};
use crate::motor::{Direction, MicrostepResolution};

/// Sampled logic levels of the two limit-switch inputs.
///
/// Levels are reported as read; which physical level counts as "asserted"
/// is decided by the board's wiring, not by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LimitLevels {
    /// Negative-travel switch input level.
    pub neg_active: bool,
    /// Positive-travel switch input level.
    pub pos_active: bool,
}

/// A periodic hardware timer with a reprogrammable period.
///
/// One event must be delivered per expiry while armed; the period set with
/// [`set_period`](StepTimer::set_period) takes effect for the next expiry.
/// Periods are in timer ticks (timer clock divided by prescaler).
pub trait StepTimer {
    /// Start periodic expiries with the given initial period.
    fn arm(&mut self, period_ticks: u32);

    /// Reprogram the period for the next expiry.
    fn set_period(&mut self, period_ticks: u32);

    /// Stop delivering expiries immediately.
    fn disarm(&mut self);
}

/// Everything the motion engine needs from the platform.
pub trait MotionHardware {
    /// Drive the direction output for the given rotation direction.
    fn set_direction(&mut self, direction: Direction) -> Result<()>;

    /// Rising edge of the step pulse.
    fn step_high(&mut self) -> Result<()>;

    /// Falling edge of the step pulse.
    ///
    /// The time between the two edges is the work done inside the step
    /// handler, which comfortably exceeds the A4988's minimum pulse width.
    fn step_low(&mut self) -> Result<()>;

    /// Apply the MS1/MS2/MS3 levels for a microstepping resolution.
    fn apply_microstep_mode(&mut self, resolution: MicrostepResolution) -> Result<()>;

    /// Sample both limit-switch inputs.
    fn read_limit_inputs(&mut self) -> Result<LimitLevels>;

    /// Drive the limit/fault indicator output.
    fn set_indicator(&mut self, active: bool) -> Result<()>;

    /// Start the periodic step timer.
    fn arm_step_timer(&mut self, period_ticks: u32);

    /// Reprogram the step timer period for the next expiry.
    fn set_step_period(&mut self, period_ticks: u32);

    /// Stop the periodic step timer.
    fn disarm_step_timer(&mut self);
}

/// [`MotionHardware`] adapter for an A4988 wired to embedded-hal pins.
pub struct A4988Hardware<STEP, DIR, MS1, MS2, MS3, IND, NEG, POS, TIM>
where
    STEP: OutputPin,
    DIR: OutputPin,
    MS1: OutputPin,
    MS2: OutputPin,
    MS3: OutputPin,
    IND: OutputPin,
    NEG: InputPin,
    POS: InputPin,
    TIM: StepTimer,
{
    step_pin: STEP,
    dir_pin: DIR,
    ms1_pin: MS1,
    ms2_pin: MS2,
    ms3_pin: MS3,
    indicator_pin: IND,
    sw_neg: NEG,
    sw_pos: POS,
    timer: TIM,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,
}

impl<STEP, DIR, MS1, MS2, MS3, IND, NEG, POS, TIM>
    A4988Hardware<STEP, DIR, MS1, MS2, MS3, IND, NEG, POS, TIM>
where
    STEP: OutputPin,
    DIR: OutputPin,
    MS1: OutputPin,
    MS2: OutputPin,
    MS3: OutputPin,
    IND: OutputPin,
    NEG: InputPin,
    POS: InputPin,
    TIM: StepTimer,
{
    /// Bundle the driver pins, the switch inputs and the step timer.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        step_pin: STEP,
        dir_pin: DIR,
        ms1_pin: MS1,
        ms2_pin: MS2,
        ms3_pin: MS3,
        indicator_pin: IND,
        sw_neg: NEG,
        sw_pos: POS,
        timer: TIM,
        invert_direction: bool,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            ms1_pin,
            ms2_pin,
            ms3_pin,
            indicator_pin,
            sw_neg,
            sw_pos,
            timer,
            invert_direction,
        }
    }

    /// Release the bundled pins and timer.
    #[allow(clippy::type_complexity)]
    pub fn release(self) -> (STEP, DIR, MS1, MS2, MS3, IND, NEG, POS, TIM) {
        (
            self.step_pin,
            self.dir_pin,
            self.ms1_pin,
            self.ms2_pin,
            self.ms3_pin,
            self.indicator_pin,
            self.sw_neg,
            self.sw_pos,
            self.timer,
        )
    }
}

fn write_level<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| MotorError::PinError.into())
}

impl<STEP, DIR, MS1, MS2, MS3, IND, NEG, POS, TIM> MotionHardware
    for A4988Hardware<STEP, DIR, MS1, MS2, MS3, IND, NEG, POS, TIM>
where
    STEP: OutputPin,
    DIR: OutputPin,
    MS1: OutputPin,
    MS2: OutputPin,
    MS3: OutputPin,
    IND: OutputPin,
    NEG: InputPin,
    POS: InputPin,
    TIM: StepTimer,
{
    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let high = match direction {
            Direction::Cw => !self.invert_direction,
            Direction::Ccw => self.invert_direction,
        };
        write_level(&mut self.dir_pin, high)
    }

    fn step_high(&mut self) -> Result<()> {
        write_level(&mut self.step_pin, true)
    }

    fn step_low(&mut self) -> Result<()> {
        write_level(&mut self.step_pin, false)
    }

    fn apply_microstep_mode(&mut self, resolution: MicrostepResolution) -> Result<()> {
        let levels = resolution.mode_levels();
        write_level(&mut self.ms1_pin, levels.ms1)?;
        write_level(&mut self.ms2_pin, levels.ms2)?;
        write_level(&mut self.ms3_pin, levels.ms3)?;
        Ok(())
    }

    fn read_limit_inputs(&mut self) -> Result<LimitLevels> {
        let neg_active = self.sw_neg.is_high().map_err(|_| MotorError::PinError)?;
        let pos_active = self.sw_pos.is_high().map_err(|_| MotorError::PinError)?;
        Ok(LimitLevels {
            neg_active,
            pos_active,
        })
    }

    fn set_indicator(&mut self, active: bool) -> Result<()> {
        write_level(&mut self.indicator_pin, active)
    }

    fn arm_step_timer(&mut self, period_ticks: u32) {
        self.timer.arm(period_ticks);
    }

    fn set_step_period(&mut self, period_ticks: u32) {
        self.timer.set_period(period_ticks);
    }

    fn disarm_step_timer(&mut self) {
        self.timer.disarm();
    }
}
