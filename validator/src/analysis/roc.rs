use tracing::debug;

use crate::errors::{Result, ValidationError};

/// FPR/TPR pairs, thresholds, and the AUC for one ROC curve.
///
/// Points are ordered by decreasing threshold, so `fprs` is non-decreasing,
/// the first point is `(0, 0)` at threshold `+inf` and the last is `(1, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub fprs: Vec<f64>,
    pub tprs: Vec<f64>,
    pub thresholds: Vec<f64>,
    pub auc: f64,
}

/// Compute ROC curve points and AUC for `scores` against ground-truth `labels`.
///
/// 1) Pair each (score, label) and sort descending by score.
/// 2) Sweep distinct thresholds from high to low, counting everything scored
///    at or above the threshold.
/// 3) Integrate with the trapezoidal rule.
pub fn compute_roc(scores: &[f64], labels: &[bool]) -> Result<RocCurve> {
    if scores.len() != labels.len() {
        return Err(ValidationError::InvalidInput(format!(
            "scores length {} != labels length {}",
            scores.len(),
            labels.len()
        )));
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(ValidationError::InvalidInput("NaN score".into()));
    }

    let total_pos = labels.iter().filter(|&&l| l).count();
    let total_neg = labels.len() - total_pos;
    if total_pos == 0 || total_neg == 0 {
        return Err(ValidationError::InsufficientSignal {
            positives: total_pos,
            negatives: total_neg,
        });
    }

    let mut pairs: Vec<(f64, bool)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    pairs.sort_by(|(s1, _), (s2, _)| s2.total_cmp(s1));

    let p = total_pos as f64;
    let n = total_neg as f64;

    let mut fprs = vec![0.0];
    let mut tprs = vec![0.0];
    let mut thresholds = vec![f64::INFINITY];

    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < pairs.len() {
        // All samples tied at this score cross the threshold together.
        let threshold = pairs[i].0;
        while i < pairs.len() && pairs[i].0 == threshold {
            if pairs[i].1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        fprs.push(fp as f64 / n);
        tprs.push(tp as f64 / p);
        thresholds.push(threshold);
    }

    let auc = trapezoid_auc(&fprs, &tprs);
    debug!("ROC with {} points over {} samples, AUC {:.4}", fprs.len(), pairs.len(), auc);

    Ok(RocCurve { fprs, tprs, thresholds, auc })
}

/// Area under `y(x)` using the trapezoidal rule; `x` must be ordered.
pub fn trapezoid_auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) * 0.5)
        .sum()
}

/// Piecewise-linear interpolation of `(xp, fp)` at each point of `x`.
///
/// `xp` must be non-decreasing. Points left of `xp[0]` take `fp[0]`, points
/// right of the last `xp` take the last `fp`. Where `xp` repeats a value, a
/// query landing exactly on it takes the last of the repeated points.
pub fn interpolate(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    x.iter().map(|&xi| interpolate_at(xi, xp, fp)).collect()
}

pub fn interpolate_at(xi: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let len = xp.len().min(fp.len());
    if len == 0 || xi.is_nan() {
        return f64::NAN;
    }
    let last = len - 1;

    if xi < xp[0] {
        return fp[0];
    }
    if xi >= xp[last] {
        return fp[last];
    }
    // xp[0] <= xi < xp[last], so xp[j] <= xi < xp[j + 1]
    let j = xp[..=last].partition_point(|&v| v <= xi) - 1;
    let slope = (fp[j + 1] - fp[j]) / (xp[j + 1] - xp[j]);
    fp[j] + slope * (xi - xp[j])
}
