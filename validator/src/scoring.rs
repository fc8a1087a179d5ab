//! Confidence scores for validation events.
//!
//! Called events (TP/FP) carry a log10 p-value from the footprint caller and are
//! mapped onto [0, 1) by [`significance_to_confidence`]. FN and TN events were
//! never scored by any caller; they get a synthetic score drawn from a lognormal
//! truncated at the run's cutoff, i.e. they are treated as sitting just below
//! the significance threshold. This is an approximation of the model, not a
//! measurement, and the resulting ROC curves depend on it.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::LogNormal;
use tracing::debug;

use crate::errors::{Result, ValidationError};
use crate::models::{CategoryScores, ValidationTarget};

pub const DEFAULT_SEED: u64 = 10_000;
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// `1 - 10^(-|x|)`: large magnitudes map close to 1, zero maps to 0.
pub fn significance_to_confidence(log10_p: f64) -> f64 {
    1.0 - 10f64.powf(-log10_p.abs())
}

/// Rejection sampler over a standard lognormal, conditioned on `10^-v > 10^limit`.
pub struct ScoreSynthesizer<R = StdRng> {
    rng: R,
    distribution: LogNormal,
    limit: f64,
    floor: f64,
    max_attempts: usize,
}

impl ScoreSynthesizer<StdRng> {
    pub fn seeded(limit: f64, seed: u64) -> Result<Self> {
        Self::with_rng(limit, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ScoreSynthesizer<R> {
    /// `limit` is the log10 cutoff; it must be finite and strictly negative,
    /// otherwise no draw can ever be accepted.
    pub fn with_rng(limit: f64, rng: R) -> Result<Self> {
        if !limit.is_finite() || limit >= 0.0 {
            return Err(ValidationError::InvalidCutoff(limit));
        }
        let distribution = LogNormal::new(0.0, 1.0)
            .map_err(|e| ValidationError::InvalidInput(format!("lognormal parameters: {e}")))?;

        Ok(ScoreSynthesizer {
            rng,
            distribution,
            limit,
            floor: 10f64.powf(limit),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Draws until the candidate clears the cutoff, giving up after `max_attempts`.
    pub fn sample(&mut self) -> Result<f64> {
        for _ in 0..self.max_attempts {
            let v: f64 = self.distribution.sample(&mut self.rng);
            let p = 10f64.powf(-v);
            if p > self.floor {
                return Ok(p);
            }
        }
        Err(ValidationError::SamplingNonTermination {
            limit: self.limit,
            attempts: self.max_attempts,
        })
    }
}

/// Scores every event of `target`, native significance first, synthetic otherwise.
pub fn score_target<R: Rng>(
    target: &ValidationTarget,
    synthesizer: &mut ScoreSynthesizer<R>,
) -> Result<CategoryScores> {
    let mut scores = CategoryScores::default();
    for event in &target.events {
        let score = match event.significance {
            Some(log10_p) => significance_to_confidence(log10_p),
            None => synthesizer.sample()?,
        };
        scores.push(event.category, score);
    }
    debug!("Scored {} events for {}", target.events.len(), target.name);
    Ok(scores)
}
