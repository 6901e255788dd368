//! Runtime arguments forwarded to the simulation engine.
//!
//! Arguments of the form `+name=value` or `+name` are plusargs; anything else
//! is kept as-is but never interpreted by the engine.

use crate::error::SimError;

/// The engine's view of the forwarded command-line arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlusArgs {
    args: Vec<String>,
}

impl PlusArgs {
    /// Captures the forwarded arguments.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns every forwarded argument in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns `true` if `+name` or `+name=...` was given.
    pub fn has(&self, name: &str) -> bool {
        self.args
            .iter()
            .filter_map(|a| a.strip_prefix('+'))
            .any(|rest| rest == name || rest.starts_with(&format!("{name}=")))
    }

    /// Returns the value of the last `+name=value`, if any.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .rev()
            .filter_map(|a| a.strip_prefix('+'))
            .find_map(|rest| {
                let (key, value) = rest.split_once('=')?;
                (key == name).then_some(value)
            })
    }

    /// Parses the value of `+name=<N>` as an unsigned integer.
    ///
    /// Accepts decimal and `0x`-prefixed hexadecimal.
    pub fn value_u64(&self, name: &str) -> Result<Option<u64>, SimError> {
        let Some(raw) = self.value(name) else {
            return Ok(None);
        };
        let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => raw.parse::<u64>(),
        };
        parsed.map(Some).map_err(|_| SimError::InvalidPlusarg {
            arg: format!("+{name}={raw}"),
            reason: "expected an unsigned integer".into(),
        })
    }

    /// Arguments that are not plusargs.
    pub fn unrecognized(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .map(String::as_str)
            .filter(|a| !a.starts_with('+'))
    }
}
