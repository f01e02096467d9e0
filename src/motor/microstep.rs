//! Microstep resolution selection and A4988 mode-pin mapping.

use serde::Deserialize;

use crate::error::ConfigError;

/// Microstepping resolution of the A4988 driver.
///
/// The discriminant is the number of microsteps per full step. A change of
/// resolution never rescales a ramp that is already executing; the value is
/// read once when a new move is planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MicrostepResolution {
    /// Full steps (no microstepping).
    Full = 1,
    /// Half steps.
    Half = 2,
    /// Quarter steps.
    Quarter = 4,
    /// Eighth steps.
    Eighth = 8,
    /// Sixteenth steps (maximum A4988 resolution).
    Sixteenth = 16,
}

/// Logic levels for the A4988 MS1/MS2/MS3 mode pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeLevels {
    /// MS1 pin level.
    pub ms1: bool,
    /// MS2 pin level.
    pub ms2: bool,
    /// MS3 pin level.
    pub ms3: bool,
}

impl MicrostepResolution {
    /// Microsteps per full step.
    #[inline]
    pub const fn value(self) -> u16 {
        self as u16
    }

    /// Position accumulator increment per pulse, in 1/16-full-step units.
    #[inline]
    pub const fn sixteenths_per_pulse(self) -> i32 {
        16 / self as i32
    }

    /// MS1/MS2/MS3 levels per the A4988 datasheet truth table.
    pub const fn mode_levels(self) -> ModeLevels {
        match self {
            MicrostepResolution::Full => ModeLevels { ms1: false, ms2: false, ms3: false },
            MicrostepResolution::Half => ModeLevels { ms1: true, ms2: false, ms3: false },
            MicrostepResolution::Quarter => ModeLevels { ms1: false, ms2: true, ms3: false },
            MicrostepResolution::Eighth => ModeLevels { ms1: true, ms2: true, ms3: false },
            MicrostepResolution::Sixteenth => ModeLevels { ms1: true, ms2: true, ms3: true },
        }
    }

    /// Create from a raw microstep count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` for anything the A4988
    /// cannot be configured to.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        match value {
            1 => Ok(MicrostepResolution::Full),
            2 => Ok(MicrostepResolution::Half),
            4 => Ok(MicrostepResolution::Quarter),
            8 => Ok(MicrostepResolution::Eighth),
            16 => Ok(MicrostepResolution::Sixteenth),
            other => Err(ConfigError::InvalidMicrosteps(other)),
        }
    }
}

impl Default for MicrostepResolution {
    fn default() -> Self {
        MicrostepResolution::Half
    }
}

impl TryFrom<u16> for MicrostepResolution {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for MicrostepResolution {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = u16::deserialize(deserializer)?;
        MicrostepResolution::new(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}
