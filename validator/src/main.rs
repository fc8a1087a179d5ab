use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use roc_validator::analysis::chip_validation::run_validation;
use roc_validator::analysis::report::write_reports;
use roc_validator::config::{Cli, RunConfig};
use roc_validator::data_handling::tfpn_bed::ChipValidationExperiment;
use roc_validator::scoring::ScoreSynthesizer;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RunConfig::from(Cli::parse());
    info!("Starting ROC validation of {}", config.experiment.display());

    let mut synthesizer = ScoreSynthesizer::seeded(config.fdr_limit, config.seed)?
        .max_attempts(config.max_attempts);
    let experiment = ChipValidationExperiment::new(&config.experiment);

    let report = run_validation(&experiment, &mut synthesizer, config.grid_points)
        .with_context(|| format!("validating {}", config.experiment.display()))?;

    for target in &report.targets {
        println!("{} AUC: {:.5}", target.name, target.auc);
    }
    println!("Mean AUC: {:.5}", report.mean.auc);

    write_reports(&report, &config)?;
    Ok(())
}
