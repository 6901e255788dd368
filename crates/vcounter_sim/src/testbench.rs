//! The stimulus and observation loop.
//!
//! [`Testbench`] owns a device handle and runs the fixed scenario: for each
//! of [`CYCLES`] cycles it takes two half-cycle steps (dump, toggle clock,
//! evaluate), then updates reset and enable for the next cycle from the
//! schedule and the observed count, then polls the engine's finish flag.

use crate::device::Device;
use crate::error::SimError;
use crate::sequencer::{reset_for_cycle, Sequencer, SequencerState, Transition, CYCLES};
use crate::time::{ClockPhase, TraceTime};
use crate::trace::TraceRecorder;

/// How a run ended. Both outcomes are successful.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// All cycles ran and the trace was closed.
    Completed,
    /// The engine reported finish at the end of `cycle`; the trace was not
    /// finalized, only released.
    Finished {
        /// Cycle after which the finish was observed.
        cycle: u32,
    },
}

/// Signal state at the end of one cycle, after the stimulus update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleRecord {
    /// Cycle index.
    pub cycle: u32,
    /// Count observed after the cycle's rising edge.
    pub count: u64,
    /// Reset level driven for the next cycle.
    pub rst: bool,
    /// Enable level driven for the next cycle.
    pub en: bool,
    /// Sequencer state after the update.
    pub state: SequencerState,
    /// Transition taken by the sequencer on this update.
    pub transition: Transition,
}

/// Summary of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Number of cycles fully executed.
    pub cycles_run: u32,
    /// Timestamp of the last dump, if a trace was attached.
    pub last_dump: Option<TraceTime>,
    /// Number of Counting → Freezing transitions.
    pub freezes: u32,
    /// Per-cycle stimulus history.
    pub history: Vec<CycleRecord>,
}

/// Drives one [`Device`] through the fixed scenario.
pub struct Testbench<D: Device> {
    device: D,
    sequencer: Sequencer,
}

impl<D: Device> Testbench<D> {
    /// Takes ownership of the device and drives its initial input levels:
    /// clock high, reset asserted, enable low.
    pub fn new(mut device: D) -> Self {
        device.set_clk(true);
        device.set_rst(true);
        device.set_en(false);
        Self {
            device,
            sequencer: Sequencer::new(),
        }
    }

    /// The device under test.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The enable monitor.
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Runs the scenario, dumping every half-cycle step into `trace` if given.
    ///
    /// On normal completion the trace is closed. On early finish the trace is
    /// left unclosed and is released when the caller drops it.
    pub fn run(&mut self, mut trace: Option<&mut TraceRecorder>) -> Result<RunSummary, SimError> {
        let mut history = Vec::with_capacity(CYCLES as usize);
        let mut freezes = 0;
        log::info!("driving {} for {CYCLES} cycles", self.device.name());

        for cycle in 0..CYCLES {
            for phase in ClockPhase::ALL {
                self.half_step(TraceTime::at(cycle, phase), trace.as_deref_mut())?;
            }

            let record = self.update_stimulus(cycle);
            if record.transition == Transition::FreezeStarted {
                freezes += 1;
            }
            history.push(record);

            if self.device.finished() {
                log::info!("engine finished after cycle {cycle}");
                return Ok(RunSummary {
                    outcome: RunOutcome::Finished { cycle },
                    cycles_run: cycle + 1,
                    last_dump: trace.and_then(|t| t.last_time()),
                    freezes,
                    history,
                });
            }
        }

        let last_dump = match trace {
            Some(t) => {
                t.close()?;
                t.last_time()
            }
            None => None,
        };
        log::info!("completed {CYCLES} cycles, {freezes} freeze(s)");
        Ok(RunSummary {
            outcome: RunOutcome::Completed,
            cycles_run: CYCLES,
            last_dump,
            freezes,
            history,
        })
    }

    /// One half-cycle step: dump, invert the clock, evaluate.
    fn half_step(
        &mut self,
        time: TraceTime,
        trace: Option<&mut TraceRecorder>,
    ) -> Result<(), SimError> {
        if let Some(trace) = trace {
            trace.dump(time, &self.device)?;
        }
        let clk = self.device.clk();
        self.device.set_clk(!clk);
        self.device.eval();
        Ok(())
    }

    /// Sets reset and enable for the cycle after `cycle`.
    fn update_stimulus(&mut self, cycle: u32) -> CycleRecord {
        let rst = reset_for_cycle(cycle);
        self.device.set_rst(rst);

        let count = self.device.count();
        let (en, transition) = self.sequencer.update(cycle, count);
        self.device.set_en(en);

        match transition {
            Transition::FreezeStarted => {
                log::debug!("cycle {cycle}: count reached {count}, freezing enable")
            }
            Transition::FreezeEnded => log::debug!("cycle {cycle}: freeze window over"),
            Transition::None => {}
        }
        log::trace!("cycle {cycle}: count={count} rst={rst} en={en}");

        CycleRecord {
            cycle,
            count,
            rst,
            en,
            state: self.sequencer.state(),
            transition,
        }
    }
}
