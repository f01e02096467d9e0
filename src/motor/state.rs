//! Motor, switch and direction state enums.

/// Whether the motor is executing a move.
///
/// `Moving` holds exactly while the step timer is armed; the step-event
/// handler returns the state to `Stopped` on the final step of a plan, and
/// a hard stop forces it there immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// No move in progress; the only state that accepts a new move.
    #[default]
    Stopped,
    /// A pulse train is being emitted.
    Moving,
}

/// Direction of motor rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (positive position change).
    #[default]
    Cw,
    /// Counter-clockwise (negative position change).
    Ccw,
}

impl Direction {
    /// Get direction from a signed move distance.
    #[inline]
    pub fn from_distance(distance: f32) -> Self {
        if distance >= 0.0 {
            Direction::Cw
        } else {
            Direction::Ccw
        }
    }

    /// Sign applied to position updates.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Cw => 1,
            Direction::Ccw => -1,
        }
    }
}

/// Classified state of the two limit-switch inputs.
///
/// Derived purely from the current input levels on every evaluation, never
/// latched, and independent of [`MotionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    /// Neither input asserted.
    #[default]
    Free,
    /// Both inputs asserted at once.
    Fault,
    /// Negative travel limit reached; negative moves are blocked.
    LimitNeg,
    /// Positive travel limit reached; positive moves are blocked.
    LimitPos,
}

impl SwitchState {
    /// Classify the raw input levels.
    ///
    /// The neg/pos-to-LimitPos/LimitNeg mapping follows the controller's
    /// wiring polarity; confirm against the actual switch wiring before
    /// changing it.
    pub fn classify(neg_active: bool, pos_active: bool) -> Self {
        match (neg_active, pos_active) {
            (true, false) => SwitchState::LimitPos,
            (false, true) => SwitchState::LimitNeg,
            (true, true) => SwitchState::Fault,
            (false, false) => SwitchState::Free,
        }
    }

    /// Whether a move in `direction` must be rejected in this state.
    pub fn blocks(self, direction: Direction) -> bool {
        match self {
            SwitchState::Free => false,
            SwitchState::Fault => true,
            SwitchState::LimitPos => direction == Direction::Cw,
            SwitchState::LimitNeg => direction == Direction::Ccw,
        }
    }
}
