//! Risk Engine
//!
//! State machine: untrained → trained. Model được build ngoài lock rồi swap
//! vào (copy-on-write), nên scoring không bao giờ đọc scaler/forest dở dang.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ndarray::{Array2, ArrayView1};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::explain::contributions;
use super::forest::IsolationForest;
use super::rules::*;
use super::scaler::FittedScaler;
use super::scoring::{blend, classify, confidence_level, rule_score};
use super::strategy::{Calibration, ColdStart, ForestParams, RiskConfig};
use super::types::{IndicatorSnapshot, RiskScoreRecord};
use crate::error::{EngineError, EngineResult};
use crate::logic::round_dp;

const FEATURES: usize = 3;

// ============================================================================
// TRAINED MODEL
// ============================================================================

/// Immutable once built; shared via Arc
#[derive(Debug)]
pub struct TrainedModel {
    pub calibration: Calibration,
    scaler: FittedScaler,
    forest: IsolationForest,
    /// Raw anomaly range over the training population
    raw_min: f64,
    raw_max: f64,
    pub samples: usize,
    pub trained_at: DateTime<Utc>,
}

impl TrainedModel {
    pub fn fit(
        calibration: Calibration,
        data: &Array2<f64>,
        params: &ForestParams,
    ) -> EngineResult<Self> {
        let scaler = FittedScaler::fit(calibration.scaler_kind(), data)?;
        let scaled = scaler.transform(data);
        let forest = IsolationForest::fit(&scaled, params)?;

        let (raw_min, raw_max) = scaled
            .rows()
            .into_iter()
            .map(|row| -forest.decision_function(row))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        Ok(Self {
            calibration,
            scaler,
            forest,
            raw_min,
            raw_max,
            samples: data.nrows(),
            trained_at: Utc::now(),
        })
    }

    /// Raw anomaly = -decision value (higher = more anomalous)
    pub fn raw_anomaly(&self, features: [f64; FEATURES]) -> f64 {
        let x = self.scaler.transform_row(ArrayView1::from(&features[..]));
        -self.forest.decision_function(x.view())
    }

    /// Min-max remap against the training range, NOT clipped
    pub fn normalized_anomaly(&self, features: [f64; FEATURES]) -> f64 {
        let span = self.raw_max - self.raw_min;
        if span <= f64::EPSILON {
            // Degenerate population, every point scores alike
            return NEUTRAL_ANOMALY_SCORE;
        }
        (self.raw_anomaly(features) - self.raw_min) / span
    }
}

/// Seeded "normal" population for baseline calibration
pub fn synthetic_baseline(samples: usize, seed: u64) -> Array2<f64> {
    let ranges = [BASELINE_NDVI_RANGE, BASELINE_NIGHTLIGHT_RANGE, BASELINE_ACOUSTIC_RANGE];
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((samples, FEATURES), |(_, j)| {
        let (lo, hi) = ranges[j];
        rng.gen_range(lo..hi)
    })
}

// ============================================================================
// RISK ENGINE
// ============================================================================

pub struct RiskEngine {
    config: RiskConfig,
    model: RwLock<Option<Arc<TrainedModel>>>,
    /// Observed indicator population (feeds Population calibration)
    observations: Mutex<Vec<[f64; FEATURES]>>,
    /// Serializes training; scoring never takes it unless auto-training
    train_lock: Mutex<()>,
    scored: AtomicU64,
    trainings: AtomicU64,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            model: RwLock::new(None),
            observations: Mutex::new(Vec::new()),
            train_lock: Mutex::new(()),
            scored: AtomicU64::new(0),
            trainings: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn calibration(&self) -> Calibration {
        self.config.calibration
    }

    pub fn is_trained(&self) -> bool {
        self.model.read().is_some()
    }

    /// Current model snapshot
    pub fn model(&self) -> Option<Arc<TrainedModel>> {
        self.model.read().clone()
    }

    pub fn observation_count(&self) -> usize {
        self.observations.lock().len()
    }

    pub fn scored_count(&self) -> u64 {
        self.scored.load(Ordering::Relaxed)
    }

    pub fn training_count(&self) -> u64 {
        self.trainings.load(Ordering::Relaxed)
    }

    /// Add snapshots to the observed population
    pub fn observe(&self, snapshots: &[IndicatorSnapshot]) -> EngineResult<()> {
        if let Some(bad) = snapshots.iter().find(|s| !s.is_finite()) {
            return Err(EngineError::InvalidInput(format!(
                "non-finite indicator for location '{}'",
                bad.location_id
            )));
        }

        let mut buf = self.observations.lock();
        for s in snapshots {
            buf.push(s.features());
            // Drop oldest half when full
            if buf.len() > self.config.max_observations {
                let half = self.config.max_observations / 2;
                buf.drain(0..half);
            }
        }
        Ok(())
    }

    /// Record `population` then fit on the calibration source
    pub fn train(&self, population: &[IndicatorSnapshot]) -> EngineResult<Arc<TrainedModel>> {
        self.observe(population)?;
        self.retrain()
    }

    /// Refit on the latest population and swap the model in
    pub fn retrain(&self) -> EngineResult<Arc<TrainedModel>> {
        let _guard = self.train_lock.lock();
        self.fit_and_swap()
    }

    fn fit_and_swap(&self) -> EngineResult<Arc<TrainedModel>> {
        let data = self.training_data()?;
        let model = Arc::new(TrainedModel::fit(
            self.config.calibration,
            &data,
            &self.config.forest,
        )?);

        *self.model.write() = Some(Arc::clone(&model));
        self.trainings.fetch_add(1, Ordering::Relaxed);

        log::info!(
            "Risk model trained: calibration={} samples={} trees={}",
            model.calibration,
            model.samples,
            self.config.forest.n_trees
        );
        Ok(model)
    }

    fn training_data(&self) -> EngineResult<Array2<f64>> {
        match self.config.calibration {
            Calibration::Baseline => Ok(synthetic_baseline(
                self.config.baseline_samples,
                self.config.forest.seed,
            )),
            Calibration::Population => {
                let buf = self.observations.lock();
                if buf.len() < MIN_TRAINING_SAMPLES {
                    return Err(EngineError::InsufficientData(format!(
                        "population calibration needs {} observations, have {}",
                        MIN_TRAINING_SAMPLES,
                        buf.len()
                    )));
                }
                let flat: Vec<f64> = buf.iter().flatten().copied().collect();
                Array2::from_shape_vec((buf.len(), FEATURES), flat)
                    .map_err(|e| EngineError::InvalidInput(e.to_string()))
            }
        }
    }

    /// Model to score with, applying the cold-start policy
    fn model_for_scoring(&self) -> Option<Arc<TrainedModel>> {
        if let Some(model) = self.model() {
            return Some(model);
        }

        match self.config.cold_start {
            ColdStart::Neutral => None,
            ColdStart::AutoTrain => {
                let _guard = self.train_lock.lock();
                // Another caller may have trained while we waited
                if let Some(model) = self.model() {
                    return Some(model);
                }
                match self.fit_and_swap() {
                    Ok(model) => Some(model),
                    Err(e) => {
                        log::debug!("Auto-train unavailable ({}), using neutral anomaly score", e);
                        None
                    }
                }
            }
        }
    }

    pub fn score(&self, snapshot: &IndicatorSnapshot) -> EngineResult<RiskScoreRecord> {
        self.score_at(snapshot, Utc::now())
    }

    /// Score a snapshot; `at` is used when the snapshot carries no timestamp
    pub fn score_at(
        &self,
        snapshot: &IndicatorSnapshot,
        at: DateTime<Utc>,
    ) -> EngineResult<RiskScoreRecord> {
        if !snapshot.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "non-finite indicator for location '{}'",
                snapshot.location_id
            )));
        }

        let calibration = self.config.calibration;
        let model = self.model_for_scoring();

        let (anomaly, overflow) = match &model {
            Some(m) => {
                let raw = m.normalized_anomaly(snapshot.features());
                let clipped = raw.clamp(0.0, 1.0);
                let overflow = if calibration.keeps_overflow() { raw } else { clipped };
                (clipped, overflow)
            }
            None => (NEUTRAL_ANOMALY_SCORE, NEUTRAL_ANOMALY_SCORE),
        };

        let rule = rule_score(snapshot);
        let final_score = round_dp(blend(anomaly, rule), SCORE_DECIMALS);
        let anomaly = round_dp(anomaly, SCORE_DECIMALS);
        let rule = round_dp(rule, SCORE_DECIMALS);

        let override_score = calibration.anomaly_override().then_some(anomaly);
        let classification = classify(final_score, override_score);

        self.observe(std::slice::from_ref(snapshot))?;
        self.scored.fetch_add(1, Ordering::Relaxed);

        Ok(RiskScoreRecord {
            location_id: snapshot.location_id.clone(),
            final_score,
            anomaly_score: anomaly,
            rule_score: rule,
            anomaly_overflow: round_dp(overflow, SCORE_DECIMALS),
            classification,
            confidence: confidence_level(anomaly, rule),
            contributions: contributions(snapshot),
            calibration,
            model_trained: model.is_some(),
            timestamp: snapshot.timestamp.unwrap_or(at),
        })
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}
