//! Fixed stimulus schedule and the enable-freezing monitor.
//!
//! The schedule is a set of named constants rather than a configurable
//! program: the harness runs exactly one scenario. [`reset_for_cycle`] is the
//! reset half of the clock/reset driver; [`Sequencer`] is the two-state
//! machine that decides `en` from the cycle index and the observed count.

/// Number of full clock cycles simulated.
pub const CYCLES: u32 = 300;

/// Reset is held for cycles `0..INITIAL_RESET_CYCLES`.
pub const INITIAL_RESET_CYCLES: u32 = 2;

/// A second, isolated reset pulse is asserted on this cycle.
pub const RESET_PULSE_CYCLE: u32 = 15;

/// Enable stays low while the cycle index is at most this value.
pub const SETTLE_CYCLES: u32 = 4;

/// Count value that starts a freeze.
pub const COUNT_THRESHOLD: u64 = 9;

/// Number of cycles spent in [`SequencerState::Freezing`].
pub const FREEZE_CYCLES: u32 = 3;

/// Reset level to drive after cycle `cycle` has been clocked.
pub fn reset_for_cycle(cycle: u32) -> bool {
    cycle < INITIAL_RESET_CYCLES || cycle == RESET_PULSE_CYCLE
}

/// Enable level the settle-delay rule alone would drive after `cycle`.
pub fn settled(cycle: u32) -> bool {
    cycle > SETTLE_CYCLES
}

/// State of the enable monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequencerState {
    /// Enable follows the settle-delay rule.
    Counting,
    /// Enable is forced low until the freeze counter runs out.
    Freezing,
}

/// What happened to the sequencer on one update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// No state change.
    None,
    /// Counting → Freezing, the count reached the threshold.
    FreezeStarted,
    /// Freezing → Counting, the freeze window ran out.
    FreezeEnded,
}

/// The enable monitor.
///
/// Starts in [`SequencerState::Counting`] with a zero freeze counter, and is
/// never reinitialised by the device reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequencer {
    state: SequencerState,
    freeze_counter: u32,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// Creates a monitor in its initial state.
    pub fn new() -> Self {
        Self {
            state: SequencerState::Counting,
            freeze_counter: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Remaining freeze cycles; only meaningful while freezing.
    pub fn freeze_counter(&self) -> u32 {
        self.freeze_counter
    }

    /// Advances the monitor after `cycle` has been clocked and returns the
    /// enable level for the next cycle along with the transition taken.
    ///
    /// The threshold check runs before the enable level is fixed. The update
    /// that enters `Freezing` keeps the settle-delay level; the following
    /// [`FREEZE_CYCLES`] updates drive enable low.
    pub fn update(&mut self, cycle: u32, count: u64) -> (bool, Transition) {
        let mut en = settled(cycle);

        let transition = match self.state {
            SequencerState::Counting => {
                if count == COUNT_THRESHOLD {
                    self.state = SequencerState::Freezing;
                    self.freeze_counter = FREEZE_CYCLES;
                    Transition::FreezeStarted
                } else {
                    Transition::None
                }
            }
            SequencerState::Freezing => {
                en = false;
                self.freeze_counter = self.freeze_counter.saturating_sub(1);
                if self.freeze_counter == 0 {
                    self.state = SequencerState::Counting;
                    Transition::FreezeEnded
                } else {
                    Transition::None
                }
            }
        };

        (en, transition)
    }
}
