#![deny(warnings)]

//! The Startup(TM): an idle business game for the terminal.
//!
//! Without flags this opens the interactive dashboard. `--headless` runs the
//! simulation with a fixed staff for a number of seconds and prints the
//! final ledger as JSON.

mod keymap;
mod term;
mod view;

use anyhow::{Context, Result};
use clap::Parser;
use sim_core::SimConfig;
use sim_runtime::{run_headless, App};
use std::{fs, path::PathBuf, sync::Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "startup",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")"),
    about = "Grow a startup from one user to a unicorn, or watch it collapse"
)]
struct Args {
    /// YAML file overriding the default rates and limits.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the particle animation.
    #[arg(long)]
    seed: Option<u64>,
    /// Write logs to this file. The interactive screen is never logged to.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Simulate without a terminal and print the result.
    #[arg(long)]
    headless: bool,
    /// Seconds to simulate in headless mode.
    #[arg(long, default_value_t = 60)]
    seconds: u32,
    #[arg(long, default_value_t = 0)]
    devs: i64,
    #[arg(long, default_value_t = 0)]
    qa: i64,
    #[arg(long, default_value_t = 0)]
    marketers: i64,
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt().with_env_filter(filter);
    match (&args.log, args.headless) {
        (Some(path), _) => {
            let file = fs::File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            fmt.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (None, true) => fmt.with_writer(std::io::stderr).init(),
        // raw mode owns the terminal
        (None, false) => fmt.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_yaml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.rng_seed = seed;
    }
    Ok(cfg)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let cfg = load_config(&args)?;
    info!(config = ?args.config, seed = cfg.rng_seed, headless = args.headless, "starting");

    let app = App::new(cfg);
    if args.headless {
        let snap = run_headless(&app, args.devs, args.qa, args.marketers, args.seconds);
        info!(seconds = snap.seconds, scene = ?snap.scene, "headless run finished");
        println!("{}", serde_json::to_string_pretty(&snap)?);
        return Ok(());
    }
    term::run(&app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headless_flags() {
        let args = Args::try_parse_from([
            "startup",
            "--headless",
            "--seconds",
            "90",
            "--devs",
            "3",
            "--seed",
            "7",
        ])
        .unwrap();
        assert!(args.headless);
        assert_eq!(args.seconds, 90);
        assert_eq!(args.devs, 3);
        assert_eq!(args.qa, 0);
        assert_eq!(load_config(&args).unwrap().rng_seed, 7);
    }

    #[test]
    fn defaults_without_config() {
        let args = Args::try_parse_from(["startup"]).unwrap();
        assert!(!args.headless);
        assert_eq!(load_config(&args).unwrap(), SimConfig::default());
    }

    #[test]
    fn reads_yaml_config_file() {
        let path = std::env::temp_dir().join(format!("startup-cfg-{}.yaml", std::process::id()));
        fs::write(&path, "cash_cap: 5000\nrng_seed: 9\n").unwrap();
        let args =
            Args::try_parse_from(["startup", "--config", path.to_str().unwrap()]).unwrap();
        let cfg = load_config(&args).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(cfg.cash_cap, 5000);
        assert_eq!(cfg.rng_seed, 9);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args =
            Args::try_parse_from(["startup", "--config", "/nonexistent/startup.yaml"]).unwrap();
        let err = load_config(&args).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Args::try_parse_from(["startup", "--turbo"]).is_err());
    }
}
