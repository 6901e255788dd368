//! Waveform recording for simulation output.
//!
//! The [`WaveformRecorder`] trait abstracts waveform output. [`VcdRecorder`]
//! implements the IEEE 1364 Value Change Dump (VCD) format, producing text
//! files that can be viewed in GTKWave, Surfer, or other waveform viewers.

use std::io::Write;

use crate::error::SimError;
use crate::value::{SignalId, SignalValue};

/// Trait for recording simulation waveforms.
///
/// Implementations write signal changes to a particular format.
pub trait WaveformRecorder {
    /// Registers a signal for recording under the current scope.
    fn register_signal(&mut self, id: SignalId, name: &str, width: u32) -> Result<(), SimError>;

    /// Opens a new scope (hierarchy level) in the waveform.
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError>;

    /// Closes the current scope.
    fn end_scope(&mut self) -> Result<(), SimError>;

    /// Records a value change at the given time (in trace ticks).
    fn record_change(&mut self, time: u64, id: SignalId, value: &SignalValue)
        -> Result<(), SimError>;

    /// Marks a timestamp even if no signal changed at it.
    fn mark_time(&mut self, time: u64) -> Result<(), SimError>;

    /// Finalizes the waveform output (flush, write trailer, etc.).
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// VCD (Value Change Dump) format recorder following IEEE 1364.
///
/// Produces human-readable text output with timestamps and signal value changes.
/// Signal identifiers use printable ASCII characters starting from `!` (0x21).
pub struct VcdRecorder<W: Write> {
    writer: W,
    id_map: Vec<(SignalId, String, u32)>, // (signal_id, id_code, width)
    next_id: u32,
    header_written: bool,
    current_time: Option<u64>,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a new VCD recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            id_map: Vec::new(),
            next_id: 0,
            header_written: false,
            current_time: None,
        }
    }

    /// Consumes the recorder and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes the VCD header section.
    fn write_header(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$version")?;
        writeln!(self.writer, "  vcounter testbench")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$timescale")?;
        writeln!(self.writer, "  1ps")?;
        writeln!(self.writer, "$end")?;
        Ok(())
    }

    fn ensure_header(&mut self) -> Result<(), SimError> {
        if !self.header_written {
            self.write_header()?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Emits `#time`, closing the definitions section on first use.
    fn advance_time(&mut self, time: u64) -> Result<(), SimError> {
        self.ensure_header()?;
        if self.current_time == Some(time) {
            return Ok(());
        }
        if self.current_time.is_none() {
            writeln!(self.writer, "$enddefinitions $end")?;
            writeln!(self.writer, "#{time}")?;
            writeln!(self.writer, "$dumpvars")?;
        } else {
            writeln!(self.writer, "#{time}")?;
        }
        self.current_time = Some(time);
        Ok(())
    }

    /// Generates a VCD identifier code from a sequential index.
    ///
    /// Uses printable ASCII characters starting from `!` (0x21).
    /// Multi-character codes are generated for indices >= 94.
    fn make_id_code(index: u32) -> String {
        let mut result = String::new();
        let mut idx = index;
        loop {
            let c = (b'!' + (idx % 94) as u8) as char;
            result.push(c);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        result
    }

    /// Formats a value as a VCD value string for a signal of `width` bits.
    fn format_value(value: &SignalValue, width: u32) -> String {
        let bits = value.to_u64();
        if width == 1 {
            String::from(if bits & 1 == 1 { "1" } else { "0" })
        } else {
            let mut s = String::with_capacity(width as usize + 1);
            s.push('b');
            for i in (0..width).rev() {
                s.push(if (bits >> i) & 1 == 1 { '1' } else { '0' });
            }
            s
        }
    }
}

impl<W: Write> WaveformRecorder for VcdRecorder<W> {
    fn register_signal(&mut self, id: SignalId, name: &str, width: u32) -> Result<(), SimError> {
        let id_code = Self::make_id_code(self.next_id);
        self.next_id += 1;

        if width == 1 {
            writeln!(self.writer, "$var wire 1 {id_code} {name} $end")?;
        } else {
            writeln!(
                self.writer,
                "$var wire {width} {id_code} {name} [{}:0] $end",
                width - 1
            )?;
        }

        self.id_map.push((id, id_code, width));
        Ok(())
    }

    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.ensure_header()?;
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn record_change(
        &mut self,
        time: u64,
        id: SignalId,
        value: &SignalValue,
    ) -> Result<(), SimError> {
        self.advance_time(time)?;

        let (_, id_code, width) = self
            .id_map
            .iter()
            .find(|(sid, _, _)| *sid == id)
            .ok_or_else(|| SimError::InvalidSignalRef {
                reason: format!("unregistered VCD signal {}", id.as_raw()),
            })?;

        let val_str = Self::format_value(value, *width);
        if *width == 1 {
            writeln!(self.writer, "{val_str}{id_code}")?;
        } else {
            writeln!(self.writer, "{val_str} {id_code}")?;
        }
        Ok(())
    }

    fn mark_time(&mut self, time: u64) -> Result<(), SimError> {
        self.advance_time(time)
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        if self.current_time.is_none() {
            self.ensure_header()?;
            writeln!(self.writer, "$enddefinitions $end")?;
            // Keeps a second finalize from repeating the section close.
            self.current_time = Some(0);
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_recorder() -> VcdRecorder<Vec<u8>> {
        VcdRecorder::new(Vec::new())
    }

    fn output(rec: VcdRecorder<Vec<u8>>) -> String {
        String::from_utf8(rec.into_inner()).unwrap()
    }

    #[test]
    fn id_code_first() {
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(0), "!");
    }

    #[test]
    fn id_code_sequential() {
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(1), "\"");
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(93), "~");
    }

    #[test]
    fn id_code_multi_char() {
        let code = VcdRecorder::<Vec<u8>>::make_id_code(94);
        assert_eq!(code.len(), 2);
    }

    #[test]
    fn register_signal_writes_var() {
        let mut rec = make_recorder();
        rec.begin_scope("counter").unwrap();
        rec.register_signal(SignalId::from_raw(0), "clk", 1).unwrap();
        rec.register_signal(SignalId::from_raw(1), "count", 8).unwrap();
        rec.end_scope().unwrap();

        let out = output(rec);
        assert!(out.contains("$scope module counter $end"));
        assert!(out.contains("$var wire 1 ! clk $end"));
        assert!(out.contains("$var wire 8 \" count [7:0] $end"));
        assert!(out.contains("$upscope $end"));
    }

    #[test]
    fn first_change_opens_dumpvars() {
        let mut rec = make_recorder();
        rec.begin_scope("counter").unwrap();
        rec.register_signal(SignalId::from_raw(0), "clk", 1).unwrap();
        rec.end_scope().unwrap();

        rec.record_change(0, SignalId::from_raw(0), &SignalValue::Bit(true))
            .unwrap();
        rec.record_change(1, SignalId::from_raw(0), &SignalValue::Bit(false))
            .unwrap();
        rec.finalize().unwrap();

        let out = output(rec);
        let defs = out.find("$enddefinitions $end").unwrap();
        let t0 = out.find("#0").unwrap();
        let dumpvars = out.find("$dumpvars").unwrap();
        assert!(defs < t0 && t0 < dumpvars);
        assert!(out.contains("1!"));
        assert!(out.contains("#1\n0!"));
    }

    #[test]
    fn record_multi_bit_change() {
        let mut rec = make_recorder();
        rec.begin_scope("counter").unwrap();
        rec.register_signal(SignalId::from_raw(0), "count", 4).unwrap();
        rec.end_scope().unwrap();

        rec.record_change(0, SignalId::from_raw(0), &SignalValue::vector(0b1010, 4))
            .unwrap();
        rec.finalize().unwrap();

        assert!(output(rec).contains("b1010 !"));
    }

    #[test]
    fn mark_time_without_changes() {
        let mut rec = make_recorder();
        rec.begin_scope("counter").unwrap();
        rec.register_signal(SignalId::from_raw(0), "clk", 1).unwrap();
        rec.end_scope().unwrap();

        rec.record_change(0, SignalId::from_raw(0), &SignalValue::Bit(false))
            .unwrap();
        rec.mark_time(5).unwrap();
        rec.mark_time(5).unwrap();
        rec.finalize().unwrap();

        let out = output(rec);
        assert_eq!(out.matches("#5").count(), 1);
    }

    #[test]
    fn unregistered_signal_is_rejected() {
        let mut rec = make_recorder();
        let err = rec
            .record_change(0, SignalId::from_raw(9), &SignalValue::Bit(true))
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidSignalRef { .. }));
    }

    #[test]
    fn format_value_single_bit() {
        assert_eq!(
            VcdRecorder::<Vec<u8>>::format_value(&SignalValue::Bit(false), 1),
            "0"
        );
        assert_eq!(
            VcdRecorder::<Vec<u8>>::format_value(&SignalValue::Bit(true), 1),
            "1"
        );
    }

    #[test]
    fn format_value_multi_bit() {
        let v = SignalValue::vector(9, 8);
        assert_eq!(VcdRecorder::<Vec<u8>>::format_value(&v, 8), "b00001001");
    }

    #[test]
    fn finalize_empty_recorder() {
        let mut rec = make_recorder();
        rec.finalize().unwrap();
        rec.finalize().unwrap();
        let out = output(rec);
        assert_eq!(out.matches("$enddefinitions $end").count(), 1);
    }

    #[test]
    fn vcd_header_contents() {
        let mut rec = make_recorder();
        rec.begin_scope("counter").unwrap();
        rec.end_scope().unwrap();
        rec.finalize().unwrap();

        let out = output(rec);
        assert!(out.contains("$version"));
        assert!(out.contains("vcounter testbench"));
        assert!(out.contains("$timescale"));
        assert!(out.contains("1ps"));
    }
}
