//! Risk Types
//!
//! Indicator snapshot (input) và RiskScoreRecord (output) của statistical path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::strategy::Calibration;

// ============================================================================
// INPUT
// ============================================================================

/// Current deviation indicators for one location
///
/// Conventionally in [0, 1], not clamped at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub location_id: String,
    pub ndvi_drop: f64,
    pub nightlight_inc: f64,
    pub acoustic_score: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl IndicatorSnapshot {
    pub fn new(location_id: &str, ndvi_drop: f64, nightlight_inc: f64, acoustic_score: f64) -> Self {
        Self {
            location_id: location_id.to_string(),
            ndvi_drop,
            nightlight_inc,
            acoustic_score,
            timestamp: None,
        }
    }

    /// Feature order used by the scaler and forest
    pub fn features(&self) -> [f64; 3] {
        [self.ndvi_drop, self.nightlight_inc, self.acoustic_score]
    }

    pub fn is_finite(&self) -> bool {
        self.features().iter().all(|v| v.is_finite())
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskClass {
    Low,
    Medium,
    High,
}

impl RiskClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskClass::Low => "Low",
            RiskClass::Medium => "Medium",
            RiskClass::High => "High",
        }
    }
}

impl std::fmt::Display for RiskClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Agreement between anomaly and rule score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Standard,
    High,
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Share of each indicator in the deviation from normal (sums to ~1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContributions {
    pub ndvi_decline: f64,
    pub nightlight_increase: f64,
    pub acoustic_anomaly: f64,
}

/// One scoring result. Append-only per location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScoreRecord {
    pub location_id: String,
    pub final_score: f64,
    /// Clipped to [0, 1]
    pub anomaly_score: f64,
    pub rule_score: f64,
    /// Normalized anomaly before clipping (equals `anomaly_score` when the
    /// calibration clips immediately or the model was untrained)
    pub anomaly_overflow: f64,
    pub classification: RiskClass,
    pub confidence: ConfidenceLevel,
    pub contributions: FeatureContributions,
    pub calibration: Calibration,
    /// False when the cold-start neutral score was used
    pub model_trained: bool,
    pub timestamp: DateTime<Utc>,
}
