//! Risk Strategy
//!
//! Hai calibration strategy được giữ riêng biệt, không gộp:
//! - Baseline: synthetic "normal" population, min-max scaler, anomaly override
//! - Population: observed snapshots, standard scaler, plain threshold
//!
//! Cold-start policy là một switch riêng.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rules::*;
use super::scaler::ScalerKind;
use crate::error::{EngineError, EngineResult};

// ============================================================================
// CALIBRATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calibration {
    Baseline,
    Population,
}

impl Calibration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Calibration::Baseline => "baseline",
            Calibration::Population => "population",
        }
    }

    pub fn scaler_kind(&self) -> ScalerKind {
        match self {
            Calibration::Baseline => ScalerKind::MinMax,
            Calibration::Population => ScalerKind::Standard,
        }
    }

    /// Anomaly score alone may escalate to High
    pub fn anomaly_override(&self) -> bool {
        matches!(self, Calibration::Baseline)
    }

    /// Keep the pre-clip normalized anomaly in the record
    pub fn keeps_overflow(&self) -> bool {
        matches!(self, Calibration::Baseline)
    }

    pub fn default_cold_start(&self) -> ColdStart {
        match self {
            Calibration::Baseline => ColdStart::AutoTrain,
            Calibration::Population => ColdStart::Neutral,
        }
    }
}

impl FromStr for Calibration {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Ok(Calibration::Baseline),
            "population" => Ok(Calibration::Population),
            other => Err(EngineError::InvalidInput(format!(
                "calibration must be baseline or population (got '{}')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Calibration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// COLD START
// ============================================================================

/// Behaviour when scoring before any model is trained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdStart {
    /// Train on demand, then score
    AutoTrain,
    /// Anomaly score 0.5; rule and final score still computed
    Neutral,
}

impl FromStr for ColdStart {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "auto_train" | "autotrain" | "auto" => Ok(ColdStart::AutoTrain),
            "neutral" => Ok(ColdStart::Neutral),
            other => Err(EngineError::InvalidInput(format!(
                "cold start must be auto_train or neutral (got '{}')",
                other
            ))),
        }
    }
}

// ============================================================================
// FOREST PARAMS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    /// Sub-sample per tree (capped at population size)
    pub sample_size: usize,
    /// Expected outlier share, sets the decision threshold
    pub contamination: f64,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            sample_size: DEFAULT_SAMPLE_SIZE,
            contamination: DEFAULT_CONTAMINATION,
            seed: BASELINE_SEED,
        }
    }
}

// ============================================================================
// RISK CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    pub calibration: Calibration,
    pub cold_start: ColdStart,
    pub forest: ForestParams,
    /// Synthetic population size (baseline calibration)
    pub baseline_samples: usize,
    /// Observation buffer cap (population calibration)
    pub max_observations: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self::for_calibration(Calibration::Baseline)
    }
}

impl RiskConfig {
    /// Config with the calibration's default cold-start policy
    pub fn for_calibration(calibration: Calibration) -> Self {
        Self {
            calibration,
            cold_start: calibration.default_cold_start(),
            forest: ForestParams::default(),
            baseline_samples: BASELINE_SAMPLES,
            max_observations: MAX_OBSERVATIONS,
        }
    }

    pub fn with_cold_start(mut self, cold_start: ColdStart) -> Self {
        self.cold_start = cold_start;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        let f = &self.forest;
        if f.n_trees == 0 {
            return Err(EngineError::InvalidInput("forest.n_trees must be > 0".into()));
        }
        if f.sample_size < MIN_TRAINING_SAMPLES {
            return Err(EngineError::InvalidInput(format!(
                "forest.sample_size must be >= {}",
                MIN_TRAINING_SAMPLES
            )));
        }
        if !(f.contamination > 0.0 && f.contamination <= 0.5) {
            return Err(EngineError::InvalidInput("forest.contamination must be in (0, 0.5]".into()));
        }
        if self.baseline_samples < MIN_TRAINING_SAMPLES {
            return Err(EngineError::InvalidInput("baseline_samples too small".into()));
        }
        if self.max_observations < MIN_TRAINING_SAMPLES {
            return Err(EngineError::InvalidInput("max_observations too small".into()));
        }
        Ok(())
    }
}
