use std::cmp::Ordering;
use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;
use polars::df;
use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::chip_validation::ValidationReport;
use crate::analysis::mean_curve::MeanRoc;
use crate::config::RunConfig;
use crate::helper_functions::{dataframe_to_csv, ensure_dir};

pub const AUC_FILE: &str = "auc_values.csv";
pub const MEAN_CURVE_FILE: &str = "mean_roc.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const PLOT_FILE: &str = "mean_roc.png";

#[derive(Serialize)]
struct Summary<'a> {
    config: &'a RunConfig,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

/// Per-target event counts and AUC, best AUC first.
pub fn auc_table(report: &ValidationReport) -> PolarsResult<DataFrame> {
    let mut rows: Vec<_> = report.targets.iter().collect();
    rows.sort_by(|a, b| b.auc.partial_cmp(&a.auc).unwrap_or(Ordering::Equal));

    let count = |f: fn(&crate::models::EventCounts) -> usize| -> Vec<u64> {
        rows.iter().map(|t| f(&t.counts) as u64).collect()
    };

    df!(
        "target" => rows.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        "true_positives" => count(|c| c.true_positives),
        "false_positives" => count(|c| c.false_positives),
        "false_negatives" => count(|c| c.false_negatives),
        "true_negatives" => count(|c| c.true_negatives),
        "auc" => rows.iter().map(|t| t.auc).collect::<Vec<_>>()
    )
}

pub fn mean_curve_table(mean: &MeanRoc) -> PolarsResult<DataFrame> {
    df!(
        "fpr" => mean.fprs.as_slice(),
        "mean_tpr" => mean.tprs.as_slice()
    )
}

/// Writes the AUC table, mean curve, JSON summary and (optionally) the figure.
pub fn write_reports(report: &ValidationReport, config: &RunConfig) -> Result<()> {
    let output_dir = config.output_dir.as_path();
    ensure_dir(output_dir)?;

    let auc_path = output_dir.join(AUC_FILE);
    dataframe_to_csv(&mut auc_table(report)?, &auc_path)?;
    info!("AUC values saved to: {}", auc_path.display());

    let curve_path = output_dir.join(MEAN_CURVE_FILE);
    dataframe_to_csv(&mut mean_curve_table(&report.mean)?, &curve_path)?;
    info!("Mean ROC curve saved to: {}", curve_path.display());

    let summary_path = output_dir.join(SUMMARY_FILE);
    let file = File::create(&summary_path).with_context(|| format!("creating {}", summary_path.display()))?;
    serde_json::to_writer_pretty(file, &Summary { config, report })
        .with_context(|| format!("writing {}", summary_path.display()))?;
    info!("Summary saved to: {}", summary_path.display());

    if config.plot {
        let plot_path = output_dir.join(PLOT_FILE);
        // The tables are already on disk; a missing font should not fail the run.
        match draw_mean_roc_plot(&plot_path, report) {
            Ok(()) => info!("Mean ROC plot saved to: {}", plot_path.display()),
            Err(e) => warn!("Could not draw {}: {:#}", plot_path.display(), e),
        }
    }
    Ok(())
}

fn plot_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> anyhow::Error {
    anyhow!("plotting failed: {e}")
}

/// Per-target curves in light colours, the mean curve on top, random baseline last.
pub fn draw_mean_roc_plot(output_path: &Path, report: &ValidationReport) -> Result<()> {
    let caption_font = ("sans-serif", 26);
    let axis_font = ("sans-serif", 22);
    let label_font = ("sans-serif", 18);

    let root = BitMapBackend::new(output_path, (900, 650)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Mean ROC over {} ChIP targets", report.mean.targets),
            caption_font,
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("False Positive Rate")
        .y_desc("True Positive Rate")
        .axis_desc_style(axis_font)
        .label_style(label_font)
        .draw()
        .map_err(plot_err)?;

    for (idx, target) in report.targets.iter().enumerate() {
        let colour = Palette99::pick(idx).mix(0.35);
        chart
            .draw_series(LineSeries::new(
                target.curve.fprs.iter().zip(&target.curve.tprs).map(|(&x, &y)| (x, y)),
                colour.stroke_width(1),
            ))
            .map_err(plot_err)?;
    }

    let mean = &report.mean;
    chart
        .draw_series(LineSeries::new(
            mean.fprs.iter().zip(&mean.tprs).map(|(&x, &y)| (x, y)),
            BLUE.stroke_width(3),
        ))
        .map_err(plot_err)?
        .label(format!("Mean ROC (AUC = {:.3})", mean.auc))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(3)));

    chart
        .draw_series(LineSeries::new(vec![(0.0, 0.0), (1.0, 1.0)], BLACK.mix(0.2).stroke_width(2)))
        .map_err(plot_err)?
        .label("Random (AUC = 0.50)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLACK.mix(0.2).stroke_width(3)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(label_font)
        .legend_area_size(25)
        .position(SeriesLabelPosition::LowerRight)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::chip_validation::{SkippedTarget, TargetResult};
    use crate::analysis::mean_curve::MeanCurveAccumulator;
    use crate::analysis::roc::compute_roc;
    use crate::models::EventCounts;
    use std::path::PathBuf;

    fn report() -> ValidationReport {
        let weak = compute_roc(&[0.9, 0.7, 0.5, 0.3], &[true, false, true, false]).unwrap();
        let strong = compute_roc(&[0.9, 0.8, 0.3, 0.1], &[true, true, false, false]).unwrap();
        let counts = EventCounts { true_positives: 2, false_positives: 2, false_negatives: 0, true_negatives: 0 };

        let mut acc = MeanCurveAccumulator::new(10).unwrap();
        acc.fold(&weak);
        acc.fold(&strong);

        ValidationReport {
            targets: vec![
                TargetResult { name: "weak".into(), counts, auc: weak.auc, curve: weak },
                TargetResult { name: "strong".into(), counts, auc: strong.auc, curve: strong },
            ],
            skipped: vec![SkippedTarget { name: "empty".into(), reason: "no positives".into() }],
            mean: acc.finalize().unwrap(),
        }
    }

    fn config(output_dir: PathBuf) -> RunConfig {
        RunConfig {
            experiment: PathBuf::from("exp"),
            fdr_limit: -5.0,
            grid_points: 10,
            seed: 1,
            max_attempts: 100,
            output_dir,
            plot: false,
        }
    }

    #[test]
    fn auc_table_is_sorted_best_first() {
        let df = auc_table(&report()).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.column("target").unwrap().str().unwrap().into_no_null_iter().collect();
        assert_eq!(names, vec!["strong", "weak"]);
        let aucs: Vec<f64> = df.column("auc").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert!((aucs[0] - 1.0).abs() < 1e-12);
        assert!((aucs[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn mean_curve_table_matches_grid() {
        let r = report();
        let df = mean_curve_table(&r.mean).unwrap();
        assert_eq!(df.height(), 10);
        assert_eq!(df.get_column_names().len(), 2);
    }

    #[test]
    fn writes_tables_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        write_reports(&report(), &config(out.clone())).unwrap();

        let auc = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(out.join(AUC_FILE)))
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(auc.height(), 2);
        assert!(out.join(MEAN_CURVE_FILE).exists());
        assert!(!out.join(PLOT_FILE).exists());

        let summary: serde_json::Value =
            serde_json::from_reader(File::open(out.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(summary["config"]["fdr_limit"], -5.0);
        assert_eq!(summary["targets"].as_array().unwrap().len(), 2);
        assert_eq!(summary["skipped"][0]["name"], "empty");
        assert_eq!(summary["mean"]["targets"], 2);
    }
}
