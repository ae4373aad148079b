use anyhow::{anyhow, Context, Result};
use clap::Parser;
use powerspin_simulator::{run, ChartRenderer, Config, SeriesFileRenderer, ValidatedConfig};
use std::path::PathBuf;
use tracing::Level;

/// Rounds played by the demo run when no round count is given.
const DEMO_ROUNDS: u64 = 100;
const DEMO_PREFIX: &str = "demo";

fn init_tracing(level: Level, json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Roulette simulation with power-up modifiers")]
struct Args {
    /// YAML configuration file (built-in defaults when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate N rounds (0 runs a short verbose demo).
    #[arg(short, long, default_value_t = 0)]
    simulate: u64,

    /// Log progress while the run is in flight.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Seed for the wheel and rule selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Output prefix for the round log and charts.
    #[arg(long)]
    prefix: Option<String>,

    /// Append to an existing round log instead of starting fresh.
    #[arg(long, default_value_t = false)]
    append: bool,

    /// Skip chart rendering.
    #[arg(long, default_value_t = false)]
    no_charts: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

fn build_config(args: &Args) -> Result<ValidatedConfig> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if args.simulate > 0 {
        config.rounds = args.simulate;
        if config.prefix.is_none() {
            config.prefix = Some(format!("sim_{}", chrono::Utc::now().timestamp()));
        }
    } else if args.config.is_none() {
        config.rounds = DEMO_ROUNDS;
        config.verbose = true;
        config.prefix = Some(DEMO_PREFIX.to_string());
    }

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(prefix) = &args.prefix {
        config.prefix = Some(prefix.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.verbose |= args.verbose;
    config.append |= args.append;
    config.render_charts &= !args.no_charts;

    Ok(config.validate()?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    init_tracing(config.log_level, args.log_json)?;

    let renderer = SeriesFileRenderer::default();
    let renderer = config
        .render_charts
        .then_some(&renderer as &dyn ChartRenderer);
    let output = run(&config, renderer)?;

    let summary = serde_json::to_string(&output.summary).context("encode summary")?;
    println!("SIM SUMMARY: {summary}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_when_no_rounds_given() {
        let args = Args::parse_from(["powerspin-simulator"]);
        let config = build_config(&args).expect("config should validate");
        assert_eq!(config.params.rounds, DEMO_ROUNDS);
        assert_eq!(config.prefix, DEMO_PREFIX);
        assert_eq!(config.params.progress_interval, Some(1_000));
    }

    #[test]
    fn simulate_sets_rounds_and_timestamped_prefix() {
        let args = Args::parse_from(["powerspin-simulator", "-s", "10000", "--seed", "7"]);
        let config = build_config(&args).expect("config should validate");
        assert_eq!(config.params.rounds, 10_000);
        assert_eq!(config.params.seed, 7);
        assert!(config.prefix.starts_with("sim_"), "{}", config.prefix);
        assert_eq!(config.params.progress_interval, None);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "powerspin-simulator",
            "--simulate",
            "50",
            "--prefix",
            "out",
            "--append",
            "--no-charts",
            "--verbose",
            "--log-level",
            "debug",
        ]);
        let config = build_config(&args).expect("config should validate");
        assert_eq!(config.prefix, "out");
        assert!(config.append);
        assert!(!config.render_charts);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.params.progress_interval, Some(1_000));
    }

    #[test]
    fn rejects_bad_log_level() {
        let args = Args::parse_from(["powerspin-simulator", "--log-level", "loud"]);
        let err = build_config(&args).unwrap_err();
        assert!(err.to_string().contains("loud"), "unexpected error: {err}");
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "rounds: 12\nseed: 9\nprefix: from_file\n").unwrap();
        let args = Args::parse_from([
            "powerspin-simulator",
            "--config",
            path.to_str().unwrap(),
        ]);
        let config = build_config(&args).expect("config should validate");
        assert_eq!(config.params.rounds, 12);
        assert_eq!(config.params.seed, 9);
        assert_eq!(config.prefix, "from_file");
    }
}
