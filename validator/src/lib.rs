//! ROC validation of footprint calls against ChIP-seq ground truth.
//!
//! Each ChIP target contributes TP/FP/FN/TN interval sets. Events are scored
//! ([`scoring`]), turned into prediction/label vectors and a ROC curve
//! ([`analysis::roc`]), and every qualifying target's curve is folded into a
//! mean ROC curve on a fixed FPR grid ([`analysis::mean_curve`]).

pub mod analysis;
pub mod config;
pub mod data_handling;
pub mod errors;
pub mod helper_functions;
pub mod models;
pub mod scoring;
