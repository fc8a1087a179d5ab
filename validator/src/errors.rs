//! Error types shared by the scoring, ROC and aggregation stages.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    /// A target has no condition-positive or no condition-negative events.
    #[error("insufficient signal: {positives} positives, {negatives} negatives")]
    InsufficientSignal { positives: usize, negatives: usize },

    /// No target was folded into the mean curve.
    #[error("mean ROC curve undefined: no target qualified for aggregation")]
    DivisionUndefined,

    /// The rejection sampler gave up.
    #[error("no synthetic score above 10^{limit} after {attempts} draws; cutoff is out of range")]
    SamplingNonTermination { limit: f64, attempts: usize },

    #[error("invalid cutoff exponent {0}: must be finite and strictly negative")]
    InvalidCutoff(f64),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}, record {record}: {reason}", path.display())]
    MalformedRecord {
        path: PathBuf,
        record: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
