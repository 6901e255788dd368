//! Error types for the counter testbench harness.
//!
//! All errors that can occur while driving the device or writing its trace
//! are represented as variants of [`SimError`].

use std::io;

use crate::time::TraceTime;

/// Errors that can occur during testbench setup or execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),

    /// A signal reference could not be resolved.
    #[error("invalid signal reference: {reason}")]
    InvalidSignalRef {
        /// Description of why the signal reference is invalid.
        reason: String,
    },

    /// A dump was requested at a time that does not advance the trace.
    #[error("trace time must increase: dump at {requested} after {previous}")]
    TimeRegression {
        /// The last timestamp that was dumped.
        previous: TraceTime,
        /// The rejected timestamp.
        requested: TraceTime,
    },

    /// A dump was requested after the trace was closed.
    #[error("trace is already closed")]
    TraceClosed,

    /// The requested counter width cannot be modelled.
    #[error("counter width must be 1..=64, got {width}")]
    InvalidWidth {
        /// The rejected width.
        width: u32,
    },

    /// A plusarg forwarded to the engine had a malformed value.
    #[error("invalid plusarg '{arg}': {reason}")]
    InvalidPlusarg {
        /// The offending argument as given on the command line.
        arg: String,
        /// Description of what is wrong with it.
        reason: String,
    },
}
