//! Trace time derived from the cycle index and clock phase.
//!
//! The harness advances time in half-cycle steps. A [`TraceTime`] is the
//! absolute timestamp `2 * cycle + phase` written into the waveform, and
//! [`ClockPhase`] names which half of a cycle a step belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of trace ticks per full clock cycle.
pub const TICKS_PER_CYCLE: u64 = 2;

/// Which half of a clock cycle a step belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClockPhase {
    /// The first half-cycle step (clock falls from its idle-high level).
    First = 0,
    /// The second half-cycle step (clock rises, registers update).
    Second = 1,
}

impl ClockPhase {
    /// Both phases in the order they are stepped within a cycle.
    pub const ALL: [ClockPhase; 2] = [ClockPhase::First, ClockPhase::Second];

    /// Returns the tick offset of this phase within its cycle.
    pub fn offset(self) -> u64 {
        self as u64
    }
}

/// An absolute trace timestamp in half-cycle ticks.
///
/// Ordering is plain numeric ordering; the trace recorder requires every dump
/// to use a strictly greater time than the one before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TraceTime(u64);

impl TraceTime {
    /// Time zero, the first dump of every run.
    pub const ZERO: TraceTime = TraceTime(0);

    /// Builds the timestamp of a half-cycle step.
    pub fn at(cycle: u32, phase: ClockPhase) -> Self {
        Self(u64::from(cycle) * TICKS_PER_CYCLE + phase.offset())
    }

    /// Wraps a raw tick count.
    pub fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the raw tick count.
    pub fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the cycle index this timestamp falls in.
    pub fn cycle(self) -> u64 {
        self.0 / TICKS_PER_CYCLE
    }

    /// Returns the clock phase this timestamp falls in.
    pub fn phase(self) -> ClockPhase {
        if self.0 % TICKS_PER_CYCLE == 0 {
            ClockPhase::First
        } else {
            ClockPhase::Second
        }
    }
}

impl fmt::Display for TraceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_is_zero() {
        assert_eq!(TraceTime::at(0, ClockPhase::First), TraceTime::ZERO);
    }

    #[test]
    fn two_ticks_per_cycle() {
        assert_eq!(TraceTime::at(0, ClockPhase::Second).ticks(), 1);
        assert_eq!(TraceTime::at(1, ClockPhase::First).ticks(), 2);
        assert_eq!(TraceTime::at(299, ClockPhase::Second).ticks(), 599);
    }

    #[test]
    fn cycle_and_phase_recovered() {
        let t = TraceTime::at(15, ClockPhase::Second);
        assert_eq!(t.cycle(), 15);
        assert_eq!(t.phase(), ClockPhase::Second);
        let t = TraceTime::from_ticks(30);
        assert_eq!(t.cycle(), 15);
        assert_eq!(t.phase(), ClockPhase::First);
    }

    #[test]
    fn steps_are_strictly_increasing() {
        let mut last: Option<TraceTime> = None;
        for cycle in 0..300 {
            for phase in ClockPhase::ALL {
                let t = TraceTime::at(cycle, phase);
                if let Some(prev) = last {
                    assert!(t > prev);
                }
                last = Some(t);
            }
        }
        assert_eq!(last, Some(TraceTime::from_ticks(599)));
    }

    #[test]
    fn display_uses_vcd_marker() {
        assert_eq!(TraceTime::from_ticks(42).to_string(), "#42");
    }

    #[test]
    fn serde_roundtrip() {
        let t = TraceTime::at(12, ClockPhase::Second);
        let json = serde_json::to_string(&t).unwrap();
        let back: TraceTime = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
