//! Risk Module - Statistical scoring path
//!
//! Indicator snapshot → anomaly score (isolation forest) + rule score
//! → final score, classification, confidence label, contributions.
//!
//! ## Structure
//! - `types`: IndicatorSnapshot, RiskScoreRecord, RiskClass, ConfidenceLevel
//! - `rules`: weights, thresholds, baseline ranges
//! - `strategy`: Calibration, ColdStart, RiskConfig
//! - `scaler`: min-max / standard scaler (ndarray)
//! - `forest`: isolation forest
//! - `scoring`: rule score, blend, classify
//! - `explain`: feature contributions
//! - `history`: append-only score history + summary
//! - `engine`: RiskEngine (train / retrain / score)

pub mod types;
pub mod rules;
pub mod strategy;
pub mod scaler;
pub mod forest;
pub mod scoring;
pub mod explain;
pub mod history;
pub mod engine;

#[cfg(test)]
mod tests;

pub use types::{
    ConfidenceLevel, FeatureContributions, IndicatorSnapshot, RiskClass, RiskScoreRecord,
};
pub use strategy::{Calibration, ColdStart, ForestParams, RiskConfig};
pub use scaler::{FittedScaler, ScalerKind};
pub use forest::IsolationForest;
pub use scoring::{blend, classify, confidence_level, rule_score};
pub use explain::contributions;
pub use history::{RiskSummary, ScoreHistory};
pub use engine::{synthetic_baseline, RiskEngine, TrainedModel};
