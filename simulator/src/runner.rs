//! End-to-end run: simulate into the round log, then analyze it.

use crate::analytics::{self, Summary};
use crate::charts::ChartRenderer;
use crate::config::ValidatedConfig;
use crate::event_log::EventLog;
use anyhow::{Context, Result};
use powerspin_execution::{Simulation, SimulationReport};
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct RunOutput {
    pub report: SimulationReport,
    pub summary: Summary,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

pub fn run(config: &ValidatedConfig, renderer: Option<&dyn ChartRenderer>) -> Result<RunOutput> {
    let json_path = config.json_path();
    let csv_path = config.csv_path();
    let mut log = EventLog::open(&json_path, &csv_path, config.append)
        .with_context(|| format!("open round log {}", csv_path.display()))?;

    let mut simulation = Simulation::new(config.pipeline()?, config.params.clone());
    let report = simulation.run(&mut log)?;

    let summary = analytics::analyze(&csv_path, renderer, &config.prefix)
        .with_context(|| format!("analyze {}", csv_path.display()))?;
    info!(
        rounds = summary.rounds,
        avg_payout = summary.avg_payout,
        power_activation_pct = summary.power_activation_pct,
        json = %json_path.display(),
        csv = %csv_path.display(),
        "run analyzed"
    );

    Ok(RunOutput {
        report,
        summary,
        json_path,
        csv_path,
    })
}
