//! vcounter CLI — runs the counter testbench and writes its waveform.
//!
//! All trailing arguments are forwarded to the simulation engine as
//! plusargs (e.g. `+finish_at=40`).

#![warn(missing_docs)]

mod logging;
mod run;

use std::process;

use clap::Parser;

/// Drive the counter testbench and record `counter.vcd`.
#[derive(Parser, Debug)]
#[command(name = "vcounter", version, about = "Counter testbench harness")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a custom `vcounter.toml` configuration file.
    #[arg(long)]
    pub config: Option<String>,

    /// Output path for the waveform file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Disable waveform recording.
    #[arg(long)]
    pub no_trace: bool,

    /// Arguments forwarded to the simulation engine.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config.clone(),
    };
    logging::init(&global);

    match run::run(&cli, &global) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["vcounter"]);
        assert!(!cli.quiet);
        assert!(!cli.verbose);
        assert!(!cli.no_trace);
        assert!(cli.config.is_none());
        assert!(cli.output.is_none());
        assert!(cli.args.is_empty());
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::parse_from(["vcounter", "-q", "--no-trace", "-o", "run.vcd"]);
        assert!(cli.quiet);
        assert!(cli.no_trace);
        assert_eq!(cli.output.as_deref(), Some("run.vcd"));
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["vcounter", "--config", "bench/vcounter.toml"]);
        assert_eq!(cli.config.as_deref(), Some("bench/vcounter.toml"));
    }

    #[test]
    fn trailing_args_forwarded() {
        let cli = Cli::parse_from(["vcounter", "-v", "+finish_at=40", "+verbose"]);
        assert!(cli.verbose);
        assert_eq!(cli.args, vec!["+finish_at=40", "+verbose"]);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
