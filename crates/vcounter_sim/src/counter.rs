//! Behavioural model of the synchronous counter under test.
//!
//! [`CounterModel`] reproduces the RTL
//!
//! ```text
//! always_ff @(posedge clk)
//!     if (rst) count <= '0;
//!     else     count <= count + {{WIDTH-1{1'b0}}, en};
//! ```
//!
//! evaluated edge-by-edge, plus an optional internal stop condition that
//! behaves like a `$finish` inside the module.

use crate::device::Device;
use crate::error::SimError;
use crate::plusargs::PlusArgs;
use crate::value::{width_mask, SignalDecl, SignalId, SignalValue};

/// Default counter width in bits.
pub const DEFAULT_WIDTH: u32 = 8;

/// Widest counter the two-state `u64` model can hold.
pub const MAX_WIDTH: u32 = 64;

const CLK: SignalId = SignalId::from_raw(0);
const RST: SignalId = SignalId::from_raw(1);
const EN: SignalId = SignalId::from_raw(2);
const COUNT: SignalId = SignalId::from_raw(3);

/// A `WIDTH`-bit synchronous up-counter with reset and enable.
#[derive(Clone, Debug)]
pub struct CounterModel {
    width: u32,
    clk: bool,
    rst: bool,
    en: bool,
    count: u64,
    /// Clock level seen by the last `eval`, for edge detection.
    last_clk: bool,
    finish_at: Option<u64>,
    finished: bool,
}

impl CounterModel {
    /// Creates a counter of the given width with all ports low.
    ///
    /// Returns [`SimError::InvalidWidth`] unless `width` is in `1..=64`.
    pub fn new(width: u32) -> Result<Self, SimError> {
        if !(1..=MAX_WIDTH).contains(&width) {
            return Err(SimError::InvalidWidth { width });
        }
        Ok(Self::with_width(width))
    }

    fn with_width(width: u32) -> Self {
        Self {
            width,
            clk: false,
            rst: false,
            en: false,
            count: 0,
            last_clk: false,
            finish_at: None,
            finished: false,
        }
    }

    /// Requests the end of simulation once `count` reaches `value`.
    pub fn with_finish_at(mut self, value: Option<u64>) -> Self {
        self.finish_at = value;
        self
    }

    /// Applies engine plusargs; `+finish_at=<N>` sets the stop condition.
    pub fn apply_plusargs(mut self, args: &PlusArgs) -> Result<Self, SimError> {
        if let Some(at) = args.value_u64("finish_at")? {
            if at > width_mask(self.width) {
                return Err(SimError::InvalidPlusarg {
                    arg: format!("+finish_at={at}"),
                    reason: format!("does not fit in a {}-bit counter", self.width),
                });
            }
            self.finish_at = Some(at);
        }
        Ok(self)
    }

    /// Counter width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The configured stop value, if any.
    pub fn finish_at(&self) -> Option<u64> {
        self.finish_at
    }
}

impl Default for CounterModel {
    fn default() -> Self {
        Self::with_width(DEFAULT_WIDTH)
    }
}

impl Device for CounterModel {
    fn name(&self) -> &str {
        "counter"
    }

    fn set_clk(&mut self, value: bool) {
        self.clk = value;
    }

    fn set_rst(&mut self, value: bool) {
        self.rst = value;
    }

    fn set_en(&mut self, value: bool) {
        self.en = value;
    }

    fn clk(&self) -> bool {
        self.clk
    }

    fn rst(&self) -> bool {
        self.rst
    }

    fn en(&self) -> bool {
        self.en
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn eval(&mut self) {
        let posedge = self.clk && !self.last_clk;
        self.last_clk = self.clk;
        if !posedge {
            return;
        }
        self.count = if self.rst {
            0
        } else {
            self.count.wrapping_add(u64::from(self.en)) & width_mask(self.width)
        };
        if self.finish_at == Some(self.count) {
            self.finished = true;
        }
    }

    fn finished(&self) -> bool {
        self.finished
    }

    fn signals(&self) -> Vec<SignalDecl> {
        vec![
            SignalDecl::input("clk"),
            SignalDecl::input("rst"),
            SignalDecl::input("en"),
            SignalDecl::output("count", self.width),
        ]
    }

    fn sample(&self, id: SignalId) -> Option<SignalValue> {
        match id {
            CLK => Some(SignalValue::Bit(self.clk)),
            RST => Some(SignalValue::Bit(self.rst)),
            EN => Some(SignalValue::Bit(self.en)),
            COUNT => Some(SignalValue::vector(self.count, self.width)),
            _ => None,
        }
    }
}
