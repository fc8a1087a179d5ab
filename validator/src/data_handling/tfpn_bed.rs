use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::{Result, ValidationError};
use crate::models::{Event, EventCategory, EventSource, ValidationTarget};

/// Column holding the footprint caller's log10 p-value in TP/FP BED records.
pub const SIGNIFICANCE_COLUMN: usize = 14;

/// Sub-directory of an experiment that holds one folder per ChIP target.
pub const VALIDATION_DIR: &str = "ChIP-validation";

/// One target folder with `true_positives.bed`, `false_positives.bed`,
/// `false_negatives.bed` and `true_negatives.bed`.
pub struct TfpnDirectory {
    pub path: PathBuf,
}

impl TfpnDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TfpnDirectory { path: path.into() }
    }

    pub fn load(&self, name: &str) -> Result<ValidationTarget> {
        let mut events = Vec::new();
        for category in EventCategory::ALL {
            let bed = self.path.join(format!("{}.bed", category.file_stem()));
            if !bed.exists() {
                if category.has_native_score() {
                    return Err(ValidationError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("missing {}", bed.display()),
                    )));
                }
                // Uncalled categories only contribute counts; absence means none.
                warn!("{} not found, treating {} as empty", bed.display(), category);
                continue;
            }
            read_tfpn_bed(&bed, category, &mut events)?;
        }

        let target = ValidationTarget::new(name, events);
        let counts = target.counts();
        info!(
            "Loaded {}: TP={} FP={} FN={} TN={}",
            name, counts.true_positives, counts.false_positives, counts.false_negatives, counts.true_negatives
        );
        Ok(target)
    }
}

/// Appends one event per BED record of `path`.
fn read_tfpn_bed(path: &Path, category: EventCategory, events: &mut Vec<Event>) -> Result<()> {
    let load_err = |source| ValidationError::Load { path: path.to_path_buf(), source };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_path(path)
        .map_err(load_err)?;

    let before = events.len();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(load_err)?;
        if !category.has_native_score() {
            events.push(Event::unscored(category));
            continue;
        }

        let raw = record.get(SIGNIFICANCE_COLUMN).ok_or_else(|| ValidationError::MalformedRecord {
            path: path.to_path_buf(),
            record: idx + 1,
            reason: format!("{} fields, significance expected in column {}", record.len(), SIGNIFICANCE_COLUMN + 1),
        })?;
        let significance: f64 = raw.trim().parse().map_err(|e| ValidationError::MalformedRecord {
            path: path.to_path_buf(),
            record: idx + 1,
            reason: format!("significance {raw:?}: {e}"),
        })?;
        events.push(Event::scored(category, significance));
    }

    debug!("{}: {} {} events", path.display(), events.len() - before, category);
    Ok(())
}

/// An experiment output directory containing `ChIP-validation/<target>/`.
pub struct ChipValidationExperiment {
    pub root: PathBuf,
}

impl ChipValidationExperiment {
    pub fn new(experiment: impl AsRef<Path>) -> Self {
        ChipValidationExperiment { root: experiment.as_ref().join(VALIDATION_DIR) }
    }
}

impl EventSource for ChipValidationExperiment {
    /// Target folders in name order, so sampling is reproducible per seed.
    fn target_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<ValidationTarget> {
        TfpnDirectory::new(self.root.join(name)).load(name)
    }
}
