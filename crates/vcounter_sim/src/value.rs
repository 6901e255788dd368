//! Signal identifiers, declarations, and two-state sampled values.
//!
//! A device declares its traceable signals as a list of [`SignalDecl`]s. The
//! position of a declaration in that list is its [`SignalId`], and sampling a
//! signal yields a [`SignalValue`].

use std::fmt;

/// Opaque ID for a device signal, its index in [`crate::Device::signals`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SignalId(u32);

impl SignalId {
    /// Creates a `SignalId` from a raw index.
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Who drives a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalDir {
    /// Written by the harness before each evaluation.
    Input,
    /// Written by the device during evaluation, read-only to the harness.
    Output,
}

/// Static description of one device signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalDecl {
    /// Port name as it appears in the waveform.
    pub name: &'static str,
    /// Bit width.
    pub width: u32,
    /// Direction relative to the device.
    pub dir: SignalDir,
}

impl SignalDecl {
    /// Declares a 1-bit input port.
    pub const fn input(name: &'static str) -> Self {
        Self {
            name,
            width: 1,
            dir: SignalDir::Input,
        }
    }

    /// Declares an output port of the given width.
    pub const fn output(name: &'static str, width: u32) -> Self {
        Self {
            name,
            width,
            dir: SignalDir::Output,
        }
    }
}

/// A sampled two-state signal value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalValue {
    /// A single bit.
    Bit(bool),
    /// A packed vector; bits above `width` are always zero.
    Vector {
        /// The packed bits, LSB at bit 0.
        bits: u64,
        /// Number of valid bits (1..=64).
        width: u32,
    },
}

impl SignalValue {
    /// Creates a vector value, masking `bits` to `width`.
    pub fn vector(bits: u64, width: u32) -> Self {
        Self::Vector {
            bits: bits & width_mask(width),
            width,
        }
    }

    /// Returns the bit width of the value.
    pub fn width(&self) -> u32 {
        match self {
            SignalValue::Bit(_) => 1,
            SignalValue::Vector { width, .. } => *width,
        }
    }

    /// Returns the value as an unsigned integer.
    pub fn to_u64(&self) -> u64 {
        match self {
            SignalValue::Bit(b) => u64::from(*b),
            SignalValue::Vector { bits, .. } => *bits,
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Bit(b) => write!(f, "{}", u8::from(*b)),
            SignalValue::Vector { bits, width } => {
                write!(f, "{width}'d{bits}")
            }
        }
    }
}

/// Returns a mask with the low `width` bits set.
pub fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_id_roundtrip() {
        assert_eq!(SignalId::from_raw(3).as_raw(), 3);
    }

    #[test]
    fn vector_is_masked() {
        let v = SignalValue::vector(0x1ff, 8);
        assert_eq!(v.to_u64(), 0xff);
        assert_eq!(v.width(), 8);
    }

    #[test]
    fn full_width_mask() {
        assert_eq!(width_mask(64), u64::MAX);
        assert_eq!(width_mask(1), 1);
        assert_eq!(width_mask(4), 0xf);
    }

    #[test]
    fn bit_value() {
        assert_eq!(SignalValue::Bit(true).to_u64(), 1);
        assert_eq!(SignalValue::Bit(false).width(), 1);
    }

    #[test]
    fn display_formats() {
        assert_eq!(SignalValue::Bit(true).to_string(), "1");
        assert_eq!(SignalValue::vector(9, 8).to_string(), "8'd9");
    }

    #[test]
    fn decl_constructors() {
        let clk = SignalDecl::input("clk");
        assert_eq!(clk.width, 1);
        assert_eq!(clk.dir, SignalDir::Input);
        let count = SignalDecl::output("count", 8);
        assert_eq!(count.width, 8);
        assert_eq!(count.dir, SignalDir::Output);
    }
}
