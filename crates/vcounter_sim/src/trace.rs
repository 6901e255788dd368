//! Scoped waveform capture for a [`Device`].
//!
//! [`TraceRecorder`] wraps a [`WaveformRecorder`] with the open/dump/close
//! contract the testbench uses: signals are registered once on open, every
//! dump samples the device and writes the values that changed, and close
//! finalizes the output. Dropping a recorder that was never closed still
//! flushes and releases the writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::device::Device;
use crate::error::SimError;
use crate::time::TraceTime;
use crate::value::{SignalId, SignalValue};
use crate::waveform::{VcdRecorder, WaveformRecorder};

/// An open waveform trace bound to one device's signal set.
pub struct TraceRecorder {
    recorder: Box<dyn WaveformRecorder>,
    /// Value written for each signal by the previous dump.
    last_values: Vec<Option<SignalValue>>,
    last_time: Option<TraceTime>,
    dumps: u64,
    closed: bool,
}

impl TraceRecorder {
    /// Creates `path` and opens a VCD trace of `device`'s signals in it.
    ///
    /// Failing to create the file is fatal to the run and is returned as
    /// [`SimError::WaveformIo`].
    pub fn open(path: &Path, device: &dyn Device) -> Result<Self, SimError> {
        let file = File::create(path)?;
        Self::with_writer(BufWriter::new(file), device)
    }

    /// Opens a VCD trace of `device`'s signals on an arbitrary writer.
    pub fn with_writer<W: Write + 'static>(
        writer: W,
        device: &dyn Device,
    ) -> Result<Self, SimError> {
        Self::with_recorder(Box::new(VcdRecorder::new(writer)), device)
    }

    /// Opens a trace on an existing recorder, registering `device`'s signals.
    pub fn with_recorder(
        mut recorder: Box<dyn WaveformRecorder>,
        device: &dyn Device,
    ) -> Result<Self, SimError> {
        let signals = device.signals();
        recorder.begin_scope(device.name())?;
        for (index, decl) in signals.iter().enumerate() {
            recorder.register_signal(SignalId::from_raw(index as u32), decl.name, decl.width)?;
        }
        recorder.end_scope()?;

        Ok(Self {
            recorder,
            last_values: vec![None; signals.len()],
            last_time: None,
            dumps: 0,
            closed: false,
        })
    }

    /// Records the device's current signal values at `time`.
    ///
    /// `time` must be strictly greater than the previous dump's time.
    pub fn dump(&mut self, time: TraceTime, device: &dyn Device) -> Result<(), SimError> {
        if self.closed {
            return Err(SimError::TraceClosed);
        }
        if let Some(previous) = self.last_time {
            if time <= previous {
                return Err(SimError::TimeRegression {
                    previous,
                    requested: time,
                });
            }
        }

        let ticks = time.ticks();
        self.recorder.mark_time(ticks)?;
        for (index, last) in self.last_values.iter_mut().enumerate() {
            let id = SignalId::from_raw(index as u32);
            let value = device.sample(id).ok_or_else(|| SimError::InvalidSignalRef {
                reason: format!("device does not provide signal {index}"),
            })?;
            if *last != Some(value) {
                self.recorder.record_change(ticks, id, &value)?;
                *last = Some(value);
            }
        }

        self.last_time = Some(time);
        self.dumps += 1;
        Ok(())
    }

    /// Finalizes the trace. Further dumps are rejected.
    pub fn close(&mut self) -> Result<(), SimError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.recorder.finalize()
    }

    /// Timestamp of the most recent dump.
    pub fn last_time(&self) -> Option<TraceTime> {
        self.last_time
    }

    /// Number of dumps taken so far.
    pub fn dumps(&self) -> u64 {
        self.dumps
    }

    /// Whether [`TraceRecorder::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for TraceRecorder {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.recorder.finalize() {
                log::warn!("failed to release waveform trace: {e}");
            }
        }
    }
}
