use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::analysis::mean_curve::DEFAULT_GRID_POINTS;
use crate::scoring::{DEFAULT_MAX_ATTEMPTS, DEFAULT_SEED};

#[derive(Parser, Debug)]
#[command(
    name = "roc_validator",
    about = "Produces per-target and mean ROC curves from ChIP-seq validation data",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    #[arg(short = 'e', long, help = "Experiment directory containing ChIP-validation/<target>/")]
    pub experiment: PathBuf,

    #[arg(short = 'f', long = "fdrlimit", allow_hyphen_values = true,
          help = "log10 p-value cutoff used by the footprint caller, e.g. -5")]
    pub fdr_limit: f64,

    #[arg(long, default_value_t = DEFAULT_GRID_POINTS, help = "Points on the mean ROC FPR grid")]
    pub grid_points: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS,
          help = "Rejection-sampling draws per synthetic score before giving up")]
    pub max_attempts: usize,

    #[arg(short, long, default_value = "./roc_validation_results")]
    pub output: PathBuf,

    #[arg(long, help = "Skip the mean ROC figure")]
    pub no_plot: bool,
}

/// Parameters of one run, echoed into the JSON summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub experiment: PathBuf,
    pub fdr_limit: f64,
    pub grid_points: usize,
    pub seed: u64,
    pub max_attempts: usize,
    pub output_dir: PathBuf,
    pub plot: bool,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        RunConfig {
            experiment: cli.experiment,
            fdr_limit: cli.fdr_limit,
            grid_points: cli.grid_points,
            seed: cli.seed,
            max_attempts: cli.max_attempts,
            output_dir: cli.output,
            plot: !cli.no_plot,
        }
    }
}
