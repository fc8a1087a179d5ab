//! Per-target ROC analysis and the mean curve over a whole experiment.

use rand::Rng;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::analysis::mean_curve::{MeanCurveAccumulator, MeanRoc};
use crate::analysis::prediction_labels::craft_prediction_labels;
use crate::analysis::roc::{compute_roc, RocCurve};
use crate::errors::{Result, ValidationError};
use crate::models::{EventCounts, EventSource, ValidationTarget};
use crate::scoring::{score_target, ScoreSynthesizer};

#[derive(Debug, Clone, Serialize)]
pub struct TargetResult {
    pub name: String,
    pub counts: EventCounts,
    pub auc: f64,
    #[serde(skip)]
    pub curve: RocCurve,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedTarget {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub targets: Vec<TargetResult>,
    pub skipped: Vec<SkippedTarget>,
    pub mean: MeanRoc,
}

/// Scores one target and computes its ROC curve.
///
/// Targets without both ground-truth classes are rejected before any
/// synthetic scores are drawn.
pub fn evaluate_target<R: Rng>(
    target: &ValidationTarget,
    synthesizer: &mut ScoreSynthesizer<R>,
) -> Result<RocCurve> {
    let counts = target.counts();
    if !counts.has_signal() {
        return Err(ValidationError::InsufficientSignal {
            positives: counts.condition_positives(),
            negatives: counts.condition_negatives(),
        });
    }

    let scores = score_target(target, synthesizer)?;
    let pl = craft_prediction_labels(&scores);
    compute_roc(&pl.scores, &pl.labels)
}

/// Runs every target of `source` and folds the qualifying ones into the mean curve.
///
/// Load and per-target failures are logged and the target skipped; failing to
/// list targets, or ending with no qualifying target, aborts the run.
pub fn run_validation<S, R>(
    source: &S,
    synthesizer: &mut ScoreSynthesizer<R>,
    grid_points: usize,
) -> Result<ValidationReport>
where
    S: EventSource + ?Sized,
    R: Rng,
{
    let names = source.target_names()?;
    info!("Validating {} targets (cutoff 10^{})", names.len(), synthesizer.limit());

    let mut accumulator = MeanCurveAccumulator::new(grid_points)?;
    let mut targets = Vec::new();
    let mut skipped = Vec::new();

    for name in names {
        let outcome = source
            .load(&name)
            .and_then(|target| Ok((target.counts(), evaluate_target(&target, synthesizer)?)));

        match outcome {
            Ok((counts, curve)) => {
                info!("{} AUC: {:.4}", name, curve.auc);
                accumulator.fold(&curve);
                targets.push(TargetResult { name, counts, auc: curve.auc, curve });
            }
            Err(e @ ValidationError::InsufficientSignal { .. }) => {
                warn!("Skipping {}: {}", name, e);
                skipped.push(SkippedTarget { name, reason: e.to_string() });
            }
            Err(e) => {
                error!("Failed to evaluate {}: {}", name, e);
                skipped.push(SkippedTarget { name, reason: e.to_string() });
            }
        }
    }

    let mean = accumulator.finalize().map_err(|e| {
        error!("No mean ROC curve: {} of {} targets skipped", skipped.len(), skipped.len() + targets.len());
        e
    })?;
    info!("Mean AUC: {:.4} over {} targets", mean.auc, mean.targets);

    Ok(ValidationReport { targets, skipped, mean })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, EventCategory};
    use std::fs::{create_dir_all, write};

    struct InMemory(Vec<ValidationTarget>);

    impl EventSource for InMemory {
        fn target_names(&self) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|t| t.name.clone()).collect())
        }

        fn load(&self, name: &str) -> Result<ValidationTarget> {
            self.0
                .iter()
                .find(|t| t.name == name)
                .cloned()
                .ok_or_else(|| ValidationError::InvalidInput(format!("unknown target {name}")))
        }
    }

    fn target(name: &str, tp: &[f64], fp: &[f64], fn_: usize, tn: usize) -> ValidationTarget {
        let mut events: Vec<Event> = tp.iter().map(|&s| Event::scored(EventCategory::TruePositive, s)).collect();
        events.extend(fp.iter().map(|&s| Event::scored(EventCategory::FalsePositive, s)));
        events.extend(std::iter::repeat(Event::unscored(EventCategory::FalseNegative)).take(fn_));
        events.extend(std::iter::repeat(Event::unscored(EventCategory::TrueNegative)).take(tn));
        ValidationTarget::new(name, events)
    }

    #[test]
    fn strong_calls_beat_synthetic_negatives() {
        // Confidence of the calls rounds to ~1.0; synthetic scores need a draw
        // below 1e-15 to compete.
        let t = target("CTCF", &[-20.0, -15.0, -30.0], &[], 0, 50);
        let mut synth = ScoreSynthesizer::seeded(-5.0, 1).unwrap();
        let curve = evaluate_target(&t, &mut synth).unwrap();
        assert!(curve.auc > 0.9, "AUC {}", curve.auc);
    }

    #[test]
    fn all_true_negative_target_is_rejected_before_sampling() {
        let t = target("empty", &[], &[], 0, 10);
        let mut synth = ScoreSynthesizer::seeded(-5.0, 1).unwrap().max_attempts(1);
        assert!(matches!(
            evaluate_target(&t, &mut synth),
            Err(ValidationError::InsufficientSignal { positives: 0, negatives: 10 })
        ));
    }

    #[test]
    fn skips_targets_without_signal_and_keeps_going() {
        let source = InMemory(vec![
            target("A", &[-12.0, -9.0], &[-2.0], 1, 5),
            target("empty", &[], &[], 0, 4),
            target("only_positive", &[-3.0], &[], 2, 0),
            target("B", &[-7.0], &[-6.0, -1.0], 2, 3),
        ]);
        let mut synth = ScoreSynthesizer::seeded(-5.0, 10_000).unwrap();
        let report = run_validation(&source, &mut synth, 100).unwrap();

        let names: Vec<_> = report.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.mean.targets, 2);
        assert_eq!(report.mean.tprs.len(), 100);
        assert_eq!(report.mean.tprs[0], 0.0);
        assert_eq!(report.mean.tprs[99], 1.0);
        assert!(report.mean.auc > 0.0 && report.mean.auc <= 1.0);
    }

    #[test]
    fn no_qualifying_target_is_fatal() {
        let source = InMemory(vec![target("empty", &[], &[], 0, 4), target("tp_only", &[-4.0], &[], 0, 0)]);
        let mut synth = ScoreSynthesizer::seeded(-5.0, 1).unwrap();
        assert!(matches!(
            run_validation(&source, &mut synth, 100),
            Err(ValidationError::DivisionUndefined)
        ));
    }

    #[test]
    fn same_seed_reproduces_report() {
        let source = InMemory(vec![
            target("A", &[-12.0, -3.0], &[-2.0, -8.0], 4, 9),
            target("B", &[-7.0], &[-6.0, -1.0], 2, 3),
        ]);
        let run = || {
            let mut synth = ScoreSynthesizer::seeded(-5.0, 99).unwrap();
            run_validation(&source, &mut synth, 100).unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.mean.auc, b.mean.auc);
        assert_eq!(a.mean.tprs, b.mean.tprs);
    }

    #[test]
    fn end_to_end_from_bed_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(crate::data_handling::tfpn_bed::VALIDATION_DIR);

        let line = |p: f64| {
            let mut f: Vec<String> = (0..14).map(|i| format!("c{i}")).collect();
            f.push(p.to_string());
            f.join("\t")
        };
        let good = root.join("GOOD");
        create_dir_all(&good).unwrap();
        write(good.join("true_positives.bed"), format!("{}\n{}\n", line(-25.0), line(-18.0))).unwrap();
        write(good.join("false_positives.bed"), format!("{}\n", line(-0.01))).unwrap();
        write(good.join("false_negatives.bed"), "chr1\t1\t2\n").unwrap();
        write(good.join("true_negatives.bed"), "chr1\t5\t9\nchr1\t15\t19\nchr1\t25\t29\n").unwrap();

        let empty = root.join("NOPE");
        create_dir_all(&empty).unwrap();
        write(empty.join("true_positives.bed"), "").unwrap();
        write(empty.join("false_positives.bed"), "").unwrap();
        write(empty.join("true_negatives.bed"), "chr1\t5\t9\n").unwrap();

        let broken = root.join("BROKEN");
        create_dir_all(&broken).unwrap();
        write(broken.join("false_positives.bed"), "").unwrap();

        let experiment = crate::data_handling::tfpn_bed::ChipValidationExperiment::new(dir.path());
        let mut synth = ScoreSynthesizer::seeded(-5.0, 10_000).unwrap();
        let report = run_validation(&experiment, &mut synth, 100).unwrap();

        assert_eq!(report.targets.len(), 1);
        assert_eq!(report.targets[0].name, "GOOD");
        assert_eq!(report.targets[0].counts.total(), 7);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.mean.targets, 1);
    }
}
