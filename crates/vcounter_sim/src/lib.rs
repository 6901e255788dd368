//! Cycle-accurate testbench for a synchronous counter module.
//!
//! This crate drives a counter's `clk`, `rst` and `en` inputs through a fixed
//! stimulus schedule, watches its `count` output to freeze enable for a
//! bounded window, and records every half-cycle step to a VCD waveform.
//!
//! # Usage
//!
//! ```ignore
//! use vcounter_sim::{simulate, SimConfig};
//!
//! let config = SimConfig::default();
//! let summary = simulate(&config)?;
//! println!("{:?} after {} cycles", summary.outcome, summary.cycles_run);
//! ```
//!
//! # Modules
//!
//! - `error` — Harness error types
//! - `time` — Half-cycle trace timestamps
//! - `value` — Signal ids, declarations and sampled values
//! - `device` — The module-under-test boundary
//! - `counter` — Behavioural counter model
//! - `plusargs` — Arguments forwarded to the engine
//! - `sequencer` — Fixed schedule and the enable monitor
//! - `waveform` — Waveform recording (VCD format)
//! - `trace` — Scoped open/dump/close trace capture
//! - `testbench` — The stimulus and observation loop
//! - `vcd_loader` — Reading recorded traces back

#![warn(missing_docs)]

pub mod counter;
pub mod device;
pub mod error;
pub mod plusargs;
pub mod sequencer;
pub mod testbench;
pub mod time;
pub mod trace;
pub mod value;
pub mod vcd_loader;
pub mod waveform;

use std::path::PathBuf;

pub use counter::{CounterModel, DEFAULT_WIDTH, MAX_WIDTH};
pub use device::Device;
pub use error::SimError;
pub use plusargs::PlusArgs;
pub use sequencer::{Sequencer, SequencerState, Transition};
pub use testbench::{CycleRecord, RunOutcome, RunSummary, Testbench};
pub use time::{ClockPhase, TraceTime};
pub use trace::TraceRecorder;
pub use value::{SignalDecl, SignalDir, SignalId, SignalValue};
pub use vcd_loader::{load_vcd, load_vcd_file, LoadedWaveform, VcdLoadError};
pub use waveform::{VcdRecorder, WaveformRecorder};

/// Default waveform file name.
pub const DEFAULT_TRACE_PATH: &str = "counter.vcd";

/// Configuration for a testbench run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Counter width in bits.
    pub width: u32,
    /// Internal stop condition of the counter model.
    pub finish_at: Option<u64>,
    /// Waveform output path; `None` disables tracing.
    pub trace_path: Option<PathBuf>,
    /// Arguments forwarded to the engine. Plusargs override `finish_at`.
    pub plusargs: PlusArgs,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            finish_at: None,
            trace_path: Some(PathBuf::from(DEFAULT_TRACE_PATH)),
            plusargs: PlusArgs::default(),
        }
    }
}

/// High-level entry point: builds the counter model, opens the trace, and
/// runs the scenario.
///
/// The trace is closed on completion. On early finish it is released without
/// being closed when it goes out of scope here.
pub fn simulate(config: &SimConfig) -> Result<RunSummary, SimError> {
    let device = CounterModel::new(config.width)?
        .with_finish_at(config.finish_at)
        .apply_plusargs(&config.plusargs)?;
    for arg in config.plusargs.unrecognized() {
        log::debug!("ignoring engine argument '{arg}'");
    }

    let mut trace = match &config.trace_path {
        Some(path) => {
            log::debug!("opening trace {}", path.display());
            Some(TraceRecorder::open(path, &device)?)
        }
        None => None,
    };

    let mut bench = Testbench::new(device);
    bench.run(trace.as_mut())
}
