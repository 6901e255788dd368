//! The boundary between the testbench and the module under test.
//!
//! A [`Device`] is an explicit handle to the module's ports together with
//! the engine that evaluates it. The harness only writes the inputs
//! (`clk`, `rst`, `en`) and only reads the output (`count`).

use crate::value::{SignalDecl, SignalId, SignalValue};

/// A clocked counter module and the engine that evaluates it.
pub trait Device {
    /// Instance name, used as the waveform scope.
    fn name(&self) -> &str;

    /// Drives the clock input.
    fn set_clk(&mut self, value: bool);

    /// Drives the synchronous reset input.
    fn set_rst(&mut self, value: bool);

    /// Drives the count-enable input.
    fn set_en(&mut self, value: bool);

    /// Current clock input level.
    fn clk(&self) -> bool;

    /// Current reset input level.
    fn rst(&self) -> bool;

    /// Current enable input level.
    fn en(&self) -> bool;

    /// Current count output.
    fn count(&self) -> u64;

    /// Propagates the current inputs through the module's logic.
    fn eval(&mut self);

    /// Whether the engine has requested the end of simulation.
    fn finished(&self) -> bool;

    /// Traceable signals, in [`SignalId`] order.
    fn signals(&self) -> Vec<SignalDecl>;

    /// Samples the current value of a declared signal.
    ///
    /// Returns `None` if `id` is not one of [`Device::signals`].
    fn sample(&self, id: SignalId) -> Option<SignalValue>;
}
