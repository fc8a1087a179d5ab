//! Mean ROC curve over targets whose curves are sampled at unaligned FPRs.
//!
//! Every folded curve is resampled onto one fixed FPR grid and summed; the
//! mean is taken once at the end. Summation commutes, so the result does not
//! depend on fold order.

use ndarray::Array1;
use serde::Serialize;

use crate::analysis::roc::{interpolate_at, trapezoid_auc, RocCurve};
use crate::errors::{Result, ValidationError};

pub const DEFAULT_GRID_POINTS: usize = 100;

#[derive(Debug, Clone)]
pub struct MeanCurveAccumulator {
    grid: Array1<f64>,
    tpr_sum: Array1<f64>,
    folds: usize,
}

/// Finalized mean curve.
#[derive(Debug, Clone, Serialize)]
pub struct MeanRoc {
    pub fprs: Vec<f64>,
    pub tprs: Vec<f64>,
    pub auc: f64,
    pub targets: usize,
}

impl MeanCurveAccumulator {
    /// Grid of `grid_points` equally spaced FPRs over [0, 1], endpoints exact.
    pub fn new(grid_points: usize) -> Result<Self> {
        if grid_points < 2 {
            return Err(ValidationError::InvalidInput(format!(
                "FPR grid needs at least 2 points, got {grid_points}"
            )));
        }
        let last = (grid_points - 1) as f64;
        let grid = Array1::from_iter((0..grid_points).map(|i| i as f64 / last));

        Ok(MeanCurveAccumulator {
            tpr_sum: Array1::zeros(grid_points),
            grid,
            folds: 0,
        })
    }

    pub fn grid(&self) -> &Array1<f64> {
        &self.grid
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    /// Adds one target's curve to the running sums.
    pub fn fold(&mut self, curve: &RocCurve) {
        let resampled = self.grid.mapv(|x| interpolate_at(x, &curve.fprs, &curve.tprs));
        self.tpr_sum += &resampled;
        self.folds += 1;
        // The mean curve starts at TPR 0 whatever the curves do at FPR 0.
        self.tpr_sum[0] = 0.0;
    }

    /// Divides by the fold count, pins the end at TPR 1 and integrates.
    pub fn finalize(self) -> Result<MeanRoc> {
        if self.folds == 0 {
            return Err(ValidationError::DivisionUndefined);
        }
        let mut mean = self.tpr_sum / self.folds as f64;
        let last = mean.len() - 1;
        mean[last] = 1.0;

        let fprs = self.grid.to_vec();
        let tprs = mean.to_vec();
        let auc = trapezoid_auc(&fprs, &tprs);

        Ok(MeanRoc { fprs, tprs, auc, targets: self.folds })
    }
}
