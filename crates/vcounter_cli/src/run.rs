//! Runs the testbench once: loads configuration, merges CLI overrides,
//! simulates, and prints a summary.

use std::path::{Path, PathBuf};

use vcounter_config::HarnessConfig;
use vcounter_sim::{PlusArgs, RunOutcome, RunSummary, SimConfig};

use crate::{Cli, GlobalArgs};

/// Runs the harness.
///
/// Returns exit code 0 both on normal completion and when the engine
/// finished early. Configuration and trace-file failures are returned as
/// errors.
pub fn run(cli: &Cli, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_harness_config(global)?;
    let sim_config = build_sim_config(&config, cli);

    if !global.quiet {
        eprintln!("   Simulating counter ({}-bit)", sim_config.width);
    }

    let summary = vcounter_sim::simulate(&sim_config)?;

    if !global.quiet {
        print_summary(&summary, sim_config.trace_path.as_deref());
    }
    Ok(0)
}

/// Loads the configuration from `--config`, or `./vcounter.toml` if present.
fn load_harness_config(global: &GlobalArgs) -> Result<HarnessConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => vcounter_config::load_config(Path::new(path))?,
        None => vcounter_config::load_config_or_default(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Merges the file configuration with CLI overrides.
///
/// `--no-trace` beats `[trace] enabled`, `--output` beats `[trace] path`, and
/// forwarded plusargs are applied by the engine on top of `[device]`.
fn build_sim_config(config: &HarnessConfig, cli: &Cli) -> SimConfig {
    let trace_enabled = config.trace.enabled && !cli.no_trace;
    let trace_path = trace_enabled.then(|| {
        cli.output
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&config.trace.path))
    });

    SimConfig {
        width: config.device.width,
        finish_at: config.device.finish_at,
        trace_path,
        plusargs: PlusArgs::new(cli.args.iter().cloned()),
    }
}

fn print_summary(summary: &RunSummary, trace_path: Option<&Path>) {
    match summary.outcome {
        RunOutcome::Completed => {
            eprintln!(
                "   Completed {} cycles ({} freeze window(s))",
                summary.cycles_run, summary.freezes
            );
        }
        RunOutcome::Finished { cycle } => {
            eprintln!("   Engine finished after cycle {cycle}");
        }
    }
    if let Some(path) = trace_path {
        match summary.last_dump {
            Some(t) => eprintln!("   Waveform: {} (last dump {t})", path.display()),
            None => eprintln!("   Waveform: {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
        }
    }

    #[test]
    fn defaults_trace_to_counter_vcd() {
        let cli = Cli::parse_from(["vcounter"]);
        let sim = build_sim_config(&HarnessConfig::default(), &cli);
        assert_eq!(sim.trace_path, Some(PathBuf::from("counter.vcd")));
        assert_eq!(sim.width, 8);
    }

    #[test]
    fn output_flag_overrides_config_path() {
        let cli = Cli::parse_from(["vcounter", "-o", "custom.vcd"]);
        let sim = build_sim_config(&HarnessConfig::default(), &cli);
        assert_eq!(sim.trace_path, Some(PathBuf::from("custom.vcd")));
    }

    #[test]
    fn no_trace_disables_waveform() {
        let cli = Cli::parse_from(["vcounter", "--no-trace", "-o", "ignored.vcd"]);
        let sim = build_sim_config(&HarnessConfig::default(), &cli);
        assert!(sim.trace_path.is_none());
    }

    #[test]
    fn plusargs_forwarded_to_engine() {
        let cli = Cli::parse_from(["vcounter", "+finish_at=7"]);
        let sim = build_sim_config(&HarnessConfig::default(), &cli);
        assert_eq!(sim.plusargs.value("finish_at"), Some("7"));
    }

    #[test]
    fn run_end_to_end_with_config_file() {
        let tmp = TempDir::new().unwrap();
        let trace = tmp.path().join("out.vcd");
        let config_path = tmp.path().join("vcounter.toml");
        fs::write(
            &config_path,
            format!(
                "[trace]\npath = {:?}\n\n[device]\nwidth = 8\n",
                trace.to_str().unwrap()
            ),
        )
        .unwrap();

        let cli = Cli::parse_from(["vcounter"]);
        let global = quiet_global(Some(config_path.to_str().unwrap().to_string()));
        let code = run(&cli, &global).unwrap();
        assert_eq!(code, 0);

        let wave = vcounter_sim::load_vcd_file(&trace).unwrap();
        assert_eq!(wave.timestamps.last(), Some(&599));
    }

    #[test]
    fn early_finish_still_exits_zero() {
        let tmp = TempDir::new().unwrap();
        let trace = tmp.path().join("early.vcd");
        let config_path = tmp.path().join("vcounter.toml");
        fs::write(&config_path, "").unwrap();

        let cli = Cli::parse_from([
            "vcounter",
            "-o",
            trace.to_str().unwrap(),
            "+finish_at=4",
        ]);
        let global = quiet_global(Some(config_path.to_str().unwrap().to_string()));
        assert_eq!(run(&cli, &global).unwrap(), 0);

        let wave = vcounter_sim::load_vcd_file(&trace).unwrap();
        assert_eq!(wave.timestamps.last(), Some(&19));
    }

    #[test]
    fn bad_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("vcounter.toml");
        fs::write(&config_path, "[device]\nwidth = 0\n").unwrap();

        let cli = Cli::parse_from(["vcounter", "--no-trace"]);
        let global = quiet_global(Some(config_path.to_str().unwrap().to_string()));
        let err = run(&cli, &global).unwrap_err();
        assert!(err.to_string().contains("device.width"));
    }
}
