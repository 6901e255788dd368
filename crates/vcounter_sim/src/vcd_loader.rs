//! Reads recorded traces back for verification.
//!
//! Understands the subset of VCD that [`crate::VcdRecorder`] writes:
//! single-line `$var` declarations, `#time` markers, and scalar or `b`-vector
//! value changes. Everything else in the header is skipped.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading a VCD file.
#[derive(Debug, Error)]
pub enum VcdLoadError {
    /// An I/O error occurred while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A parse error at a specific line number.
    #[error("parse error at line {line}: {message}")]
    ParseError {
        /// The 1-based line number where the error occurred.
        line: usize,
        /// Description of the error.
        message: String,
    },
}

/// Timestamps and per-signal value histories of a trace.
#[derive(Clone, Debug, Default)]
pub struct LoadedWaveform {
    /// Every `#time` marker in file order.
    pub timestamps: Vec<u64>,
    /// Leaf signal names and their `(time, value)` changes, in declaration order.
    pub signals: Vec<(String, Vec<(u64, u64)>)>,
}

impl LoadedWaveform {
    /// Value-change history of the named signal.
    pub fn history(&self, name: &str) -> Option<&[(u64, u64)]> {
        self.signals
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h.as_slice())
    }

    /// Value of the named signal at `time`, holding the last change.
    pub fn value_at(&self, name: &str, time: u64) -> Option<u64> {
        self.history(name)?
            .iter()
            .take_while(|(t, _)| *t <= time)
            .last()
            .map(|(_, v)| *v)
    }
}

/// Loads a VCD waveform from a buffered reader.
pub fn load_vcd<R: BufRead>(reader: R) -> Result<LoadedWaveform, VcdLoadError> {
    let mut wave = LoadedWaveform::default();
    let mut id_to_idx: HashMap<String, usize> = HashMap::new();
    let mut current_time = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = index + 1;
        let parse_error = |message: String| VcdLoadError::ParseError {
            line: line_num,
            message,
        };
        let trimmed = line.trim();

        if let Some(body) = trimmed.strip_prefix("$var") {
            // "<type> <width> <id_code> <name> [range] $end"
            let parts: Vec<&str> = body.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(parse_error(format!("invalid $var: {trimmed}")));
            }
            id_to_idx.insert(parts[2].to_string(), wave.signals.len());
            wave.signals.push((parts[3].to_string(), Vec::new()));
        } else if let Some(time) = trimmed.strip_prefix('#') {
            current_time = time
                .parse()
                .map_err(|_| parse_error(format!("invalid timestamp: {trimmed}")))?;
            wave.timestamps.push(current_time);
        } else if let Some(rest) = trimmed.strip_prefix('b') {
            let (bits, id) = rest
                .split_once(' ')
                .ok_or_else(|| parse_error(format!("invalid vector change: {trimmed}")))?;
            let value = u64::from_str_radix(bits, 2)
                .map_err(|_| parse_error(format!("invalid vector value: {trimmed}")))?;
            push_change(&mut wave, &id_to_idx, id, current_time, value);
        } else if let Some(id) = trimmed.strip_prefix('0') {
            push_change(&mut wave, &id_to_idx, id, current_time, 0);
        } else if let Some(id) = trimmed.strip_prefix('1') {
            push_change(&mut wave, &id_to_idx, id, current_time, 1);
        }
    }

    Ok(wave)
}

/// Loads a VCD file from a filesystem path.
pub fn load_vcd_file(path: &Path) -> Result<LoadedWaveform, VcdLoadError> {
    let file = std::fs::File::open(path)?;
    load_vcd(std::io::BufReader::new(file))
}

fn push_change(
    wave: &mut LoadedWaveform,
    id_to_idx: &HashMap<String, usize>,
    id: &str,
    time: u64,
    value: u64,
) {
    if let Some(&idx) = id_to_idx.get(id) {
        wave.signals[idx].1.push((time, value));
    }
}
