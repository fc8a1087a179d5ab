pub mod chip_validation;
pub mod mean_curve;
pub mod prediction_labels;
pub mod report;
pub mod roc;
