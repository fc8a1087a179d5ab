use std::fmt;

use serde::Serialize;

use crate::errors::Result;

/// Ground-truth / call category of one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventCategory {
    TruePositive,
    FalsePositive,
    FalseNegative,
    TrueNegative,
}

impl EventCategory {
    /// Concatenation order used when assembling prediction/label vectors.
    pub const ALL: [EventCategory; 4] = [
        EventCategory::TruePositive,
        EventCategory::FalsePositive,
        EventCategory::FalseNegative,
        EventCategory::TrueNegative,
    ];

    /// True when the ground truth is positive, regardless of the call.
    pub fn is_condition_positive(self) -> bool {
        matches!(self, EventCategory::TruePositive | EventCategory::FalseNegative)
    }

    /// Only called events carry a significance from the footprint caller.
    pub fn has_native_score(self) -> bool {
        matches!(self, EventCategory::TruePositive | EventCategory::FalsePositive)
    }

    pub fn index(self) -> usize {
        match self {
            EventCategory::TruePositive => 0,
            EventCategory::FalsePositive => 1,
            EventCategory::FalseNegative => 2,
            EventCategory::TrueNegative => 3,
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            EventCategory::TruePositive => "true_positives",
            EventCategory::FalsePositive => "false_positives",
            EventCategory::FalseNegative => "false_negatives",
            EventCategory::TrueNegative => "true_negatives",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventCategory::TruePositive => "TP",
            EventCategory::FalsePositive => "FP",
            EventCategory::FalseNegative => "FN",
            EventCategory::TrueNegative => "TN",
        };
        f.write_str(name)
    }
}

/// One classified interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub category: EventCategory,
    /// Signed log10 p-value reported by the caller, if any.
    pub significance: Option<f64>,
}

impl Event {
    pub fn scored(category: EventCategory, significance: f64) -> Self {
        Event { category, significance: Some(significance) }
    }

    pub fn unscored(category: EventCategory) -> Self {
        Event { category, significance: None }
    }
}

/// Per-category event counts of a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl EventCounts {
    pub fn get(&self, category: EventCategory) -> usize {
        match category {
            EventCategory::TruePositive => self.true_positives,
            EventCategory::FalsePositive => self.false_positives,
            EventCategory::FalseNegative => self.false_negatives,
            EventCategory::TrueNegative => self.true_negatives,
        }
    }

    fn bump(&mut self, category: EventCategory) {
        match category {
            EventCategory::TruePositive => self.true_positives += 1,
            EventCategory::FalsePositive => self.false_positives += 1,
            EventCategory::FalseNegative => self.false_negatives += 1,
            EventCategory::TrueNegative => self.true_negatives += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    pub fn condition_positives(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    pub fn condition_negatives(&self) -> usize {
        self.false_positives + self.true_negatives
    }

    /// A ROC curve needs at least one event of each ground-truth class.
    pub fn has_signal(&self) -> bool {
        self.condition_positives() > 0 && self.condition_negatives() > 0
    }
}

/// One named unit of evaluation, e.g. a single ChIP-seq target.
#[derive(Debug, Clone)]
pub struct ValidationTarget {
    pub name: String,
    pub events: Vec<Event>,
}

impl ValidationTarget {
    pub fn new(name: impl Into<String>, events: Vec<Event>) -> Self {
        ValidationTarget { name: name.into(), events }
    }

    pub fn counts(&self) -> EventCounts {
        let mut counts = EventCounts::default();
        for event in &self.events {
            counts.bump(event.category);
        }
        counts
    }

    pub fn events_in(&self, category: EventCategory) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.category == category)
    }
}

/// Confidence scores of a target, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct CategoryScores {
    scores: [Vec<f64>; 4],
}

impl CategoryScores {
    pub fn push(&mut self, category: EventCategory, score: f64) {
        self.scores[category.index()].push(score);
    }

    pub fn get(&self, category: EventCategory) -> &[f64] {
        &self.scores[category.index()]
    }

    pub fn with(mut self, category: EventCategory, scores: Vec<f64>) -> Self {
        self.scores[category.index()] = scores;
        self
    }
}

/// Supplies validation targets to the engine.
pub trait EventSource {
    /// Names of the available targets, in processing order.
    fn target_names(&self) -> Result<Vec<String>>;

    fn load(&self, name: &str) -> Result<ValidationTarget>;
}
