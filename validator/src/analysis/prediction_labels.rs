use crate::models::{CategoryScores, EventCategory};

/// Parallel score / ground-truth vectors for one target.
///
/// `labels[i]` is `true` when event `i` is condition positive (TP or FN), so a
/// false negative stays labelled positive even though it usually scores low.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionLabels {
    pub scores: Vec<f64>,
    pub labels: Vec<bool>,
}

impl PredictionLabels {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l).count()
    }

    pub fn negatives(&self) -> usize {
        self.labels.len() - self.positives()
    }

    /// Labels as 0/1.
    pub fn binary_labels(&self) -> Vec<u8> {
        self.labels.iter().map(|&l| u8::from(l)).collect()
    }
}

/// Appends category blocks in call order, labelling each by ground truth.
#[derive(Debug, Default)]
pub struct PredictionLabelBuilder {
    inner: PredictionLabels,
}

impl PredictionLabelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, category: EventCategory, scores: &[f64]) -> &mut Self {
        let label = category.is_condition_positive();
        self.inner.scores.extend_from_slice(scores);
        self.inner.labels.extend(std::iter::repeat(label).take(scores.len()));
        self
    }

    pub fn build(self) -> PredictionLabels {
        self.inner
    }
}

/// Concatenates TP, FP, FN, TN in that order.
pub fn craft_prediction_labels(scores: &CategoryScores) -> PredictionLabels {
    let mut builder = PredictionLabelBuilder::new();
    for category in EventCategory::ALL {
        builder.append(category, scores.get(category));
    }
    builder.build()
}
