//! Configuration types deserialized from `vcounter.toml`.

use serde::Deserialize;

/// Default counter width in bits.
pub const DEFAULT_WIDTH: u32 = 8;

/// Default waveform file name.
pub const DEFAULT_TRACE_PATH: &str = "counter.vcd";

/// The top-level harness configuration parsed from `vcounter.toml`.
///
/// Every section is optional; a missing file behaves like an empty one.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Waveform capture settings.
    #[serde(default)]
    pub trace: TraceConfig,
    /// Counter model settings.
    #[serde(default)]
    pub device: DeviceConfig,
}

/// Waveform capture settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// Whether to record a waveform at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Output path of the VCD file.
    #[serde(default = "default_trace_path")]
    pub path: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_trace_path(),
        }
    }
}

/// Counter model settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Counter width in bits (1..=64).
    #[serde(default = "default_width")]
    pub width: u32,
    /// Count value at which the model requests the end of simulation.
    #[serde(default)]
    pub finish_at: Option<u64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            finish_at: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_trace_path() -> String {
    DEFAULT_TRACE_PATH.to_string()
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}
