//! Risk Scoring Rules
//!
//! Weights, thresholds và synthetic baseline ranges.
//! KHÔNG chứa logic - chỉ constants.

// ============================================================================
// WEIGHTS
// ============================================================================

/// Rule score weight: vegetation loss (40%)
pub const NDVI_WEIGHT: f64 = 0.4;

/// Rule score weight: nightlight increase (30%)
pub const NIGHTLIGHT_WEIGHT: f64 = 0.3;

/// Rule score weight: acoustic anomaly (30%)
pub const ACOUSTIC_WEIGHT: f64 = 0.3;

/// Final score weight of the anomaly model (60%)
pub const ANOMALY_BLEND_WEIGHT: f64 = 0.6;

/// Final score weight of the rule score (40%)
pub const RULE_BLEND_WEIGHT: f64 = 0.4;

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Final score strictly above this = High
pub const HIGH_RISK_THRESHOLD: f64 = 0.75;

/// Final score at or above this = Medium (inclusive)
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.45;

/// Anomaly score strictly above this escalates to High (baseline calibration)
pub const ANOMALY_OVERRIDE_THRESHOLD: f64 = 0.75;

/// Both scores above this = High confidence
pub const AGREEMENT_HIGH: f64 = 0.6;

/// Both scores below this = High confidence
pub const AGREEMENT_LOW: f64 = 0.4;

/// Anomaly score used when no model is available
pub const NEUTRAL_ANOMALY_SCORE: f64 = 0.5;

/// Reported scores are rounded to this many decimals
pub const SCORE_DECIMALS: u32 = 4;

// ============================================================================
// EXPLANATION
// ============================================================================

/// "Normal" offsets subtracted before computing contributions
pub const NDVI_NORMAL_OFFSET: f64 = 0.15;
pub const NIGHTLIGHT_NORMAL_OFFSET: f64 = 0.15;
pub const ACOUSTIC_NORMAL_OFFSET: f64 = 0.10;

// ============================================================================
// SYNTHETIC BASELINE
// ============================================================================

pub const BASELINE_SAMPLES: usize = 150;
pub const BASELINE_SEED: u64 = 42;

/// Normal ranges (min, max) per indicator
pub const BASELINE_NDVI_RANGE: (f64, f64) = (0.05, 0.30);
pub const BASELINE_NIGHTLIGHT_RANGE: (f64, f64) = (0.05, 0.30);
pub const BASELINE_ACOUSTIC_RANGE: (f64, f64) = (0.05, 0.20);

// ============================================================================
// FOREST / BUFFER
// ============================================================================

pub const DEFAULT_TREES: usize = 100;
pub const DEFAULT_SAMPLE_SIZE: usize = 256;
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// Observation buffer cap (oldest half dropped on overflow)
pub const MAX_OBSERVATIONS: usize = 10_000;

/// Minimum population to fit a model
pub const MIN_TRAINING_SAMPLES: usize = 2;
