//! Log backend setup for the `log` records emitted by the harness crates.

use log::LevelFilter;

use crate::GlobalArgs;

/// Environment variable that overrides the level chosen from the flags.
pub const LOG_ENV: &str = "VCOUNTER_LOG";

/// Level implied by `--quiet` / `--verbose`.
pub fn level_for(global: &GlobalArgs) -> LevelFilter {
    if global.quiet {
        LevelFilter::Error
    } else if global.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs `env_logger` on stderr. Safe to call more than once.
pub fn init(global: &GlobalArgs) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for(global))
        .parse_env(LOG_ENV)
        .format_timestamp(None)
        .try_init();
}
