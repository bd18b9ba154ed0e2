use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};

use super::engine::{synthetic_baseline, RiskEngine};
use super::history::ScoreHistory;
use super::strategy::{Calibration, ColdStart, RiskConfig};
use super::types::{ConfidenceLevel, IndicatorSnapshot, RiskClass};

fn snapshot(id: &str, ndvi: f64, night: f64, acoustic: f64) -> IndicatorSnapshot {
    IndicatorSnapshot::new(id, ndvi, night, acoustic)
}

/// Observed population drawn from the normal ranges
fn observed_population(n: usize) -> Vec<IndicatorSnapshot> {
    let data = synthetic_baseline(n, 7);
    data.rows()
        .into_iter()
        .map(|r| snapshot("pop", r[0], r[1], r[2]))
        .collect()
}

#[test]
fn test_extreme_snapshot_baseline_is_high() {
    let engine = RiskEngine::new(RiskConfig::default());
    let record = engine.score(&snapshot("har_001", 0.85, 0.85, 0.75)).unwrap();

    assert!(record.model_trained);
    assert_eq!(record.classification, RiskClass::High);
    assert_eq!(record.confidence, ConfidenceLevel::High);
    assert!(record.anomaly_score > 0.6);
    assert!(record.rule_score > 0.6);
    assert_eq!(record.anomaly_score, 1.0);
    // Far outside the synthetic range: overflow survives in the audit field
    assert!(record.anomaly_overflow > 1.0);
}

#[test]
fn test_normal_snapshot_baseline_is_low() {
    let engine = RiskEngine::default();
    let record = engine.score(&snapshot("raj_004", 0.17, 0.17, 0.12)).unwrap();
    assert_eq!(record.classification, RiskClass::Low);
    assert!(record.anomaly_score < 0.6);
}

#[test]
fn test_final_score_blend_holds_on_records() {
    let engine = RiskEngine::default();
    for (a, b, c) in [(0.1, 0.2, 0.1), (0.5, 0.4, 0.3), (0.85, 0.85, 0.75), (0.3, 0.9, 0.05)] {
        let r = engine.score(&snapshot("x", a, b, c)).unwrap();
        let expected = 0.6 * r.anomaly_score + 0.4 * r.rule_score;
        assert!((r.final_score - expected).abs() < 2e-4, "{:?}", r);
    }
}

#[test]
fn test_population_neutral_before_training() {
    let engine = RiskEngine::new(RiskConfig::for_calibration(Calibration::Population));
    let record = engine.score(&snapshot("raj_001", 0.2, 0.2, 0.1)).unwrap();

    assert!(!engine.is_trained());
    assert!(!record.model_trained);
    assert_eq!(record.anomaly_score, 0.5);
    assert_eq!(record.anomaly_overflow, 0.5);
    // Rule score still computed: 0.08 + 0.06 + 0.03
    assert_eq!(record.rule_score, 0.17);
    assert_eq!(record.final_score, 0.368);
    assert_eq!(record.classification, RiskClass::Low);
}

#[test]
fn test_population_autotrain_without_observations_falls_back() {
    let config = RiskConfig::for_calibration(Calibration::Population)
        .with_cold_start(ColdStart::AutoTrain);
    let engine = RiskEngine::new(config);

    let record = engine.score(&snapshot("raj_001", 0.2, 0.2, 0.1)).unwrap();
    assert!(!record.model_trained);
    assert_eq!(record.anomaly_score, 0.5);

    // Needs two observations before auto-train can fit
    let record = engine.score(&snapshot("raj_001", 0.3, 0.1, 0.1)).unwrap();
    assert!(!record.model_trained);
    let record = engine.score(&snapshot("raj_001", 0.25, 0.15, 0.1)).unwrap();
    assert!(record.model_trained);
}

#[test]
fn test_population_training_clips_immediately() {
    let engine = RiskEngine::new(RiskConfig::for_calibration(Calibration::Population));
    let model = engine.train(&observed_population(200)).unwrap();
    assert_eq!(model.calibration, Calibration::Population);
    assert_eq!(model.samples, 200);

    let record = engine.score(&snapshot("har_001", 3.0, 3.0, 3.0)).unwrap();
    assert!(record.model_trained);
    assert!(record.anomaly_score > 0.75);
    assert!(record.anomaly_score <= 1.0);
    assert_eq!(record.anomaly_overflow, record.anomaly_score);
}

#[test]
fn test_population_has_no_anomaly_override() {
    let engine = RiskEngine::new(RiskConfig::for_calibration(Calibration::Population));
    engine.train(&observed_population(200)).unwrap();

    // Anomalous but zero rule score: final = 0.6 × anomaly stays Medium
    let record = engine.score(&snapshot("x", 0.0, 0.0, 0.0)).unwrap();
    assert!(record.anomaly_score > 0.75);
    assert_eq!(record.rule_score, 0.0);
    assert_eq!(record.classification, RiskClass::Medium);
}

#[test]
fn test_retrain_swaps_model() {
    let engine = RiskEngine::default();
    let first = engine.retrain().unwrap();
    let second = engine.retrain().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&second, &engine.model().unwrap()));
    assert_eq!(engine.training_count(), 2);
}

#[test]
fn test_seeded_training_is_reproducible() {
    let a = RiskEngine::default();
    let b = RiskEngine::default();
    let s = snapshot("x", 0.4, 0.35, 0.3);
    assert_eq!(a.score(&s).unwrap().final_score, b.score(&s).unwrap().final_score);

    let base = synthetic_baseline(150, 42);
    assert_eq!(base.nrows(), 150);
    assert!(base.column(2).iter().all(|v| (0.05..0.20).contains(v)));
}

#[test]
fn test_non_finite_rejected() {
    let engine = RiskEngine::default();
    assert!(engine.score(&snapshot("x", f64::NAN, 0.1, 0.1)).is_err());
    assert!(engine.observe(&[snapshot("x", 0.1, f64::INFINITY, 0.1)]).is_err());
}

#[test]
fn test_observation_buffer_drains_oldest_half() {
    let mut config = RiskConfig::for_calibration(Calibration::Population);
    config.max_observations = 10;
    let engine = RiskEngine::new(config);

    engine.observe(&observed_population(11)).unwrap();
    assert_eq!(engine.observation_count(), 6);
}

#[test]
fn test_concurrent_scoring_and_training() {
    let engine = Arc::new(RiskEngine::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                if i % 4 == 0 {
                    engine.retrain().unwrap();
                }
                for _ in 0..20 {
                    let r = engine.score(&snapshot("x", 0.5, 0.5, 0.5)).unwrap();
                    assert!(r.model_trained);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(engine.scored_count(), 160);
}

#[test]
fn test_history_concurrent_appends_and_summary() {
    let engine = Arc::new(RiskEngine::default());
    let history = Arc::new(ScoreHistory::new());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            let history = Arc::clone(&history);
            thread::spawn(move || {
                for _ in 0..25 {
                    let id = format!("loc_{}", t);
                    history.append(engine.score(&snapshot(&id, 0.1, 0.1, 0.1)).unwrap());
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(history.len(), 100);
    assert_eq!(history.for_location("loc_2", 10).len(), 10);
    assert!(history.for_location("loc_9", 10).is_empty());

    let summary = history.summary();
    assert_eq!(summary.total_locations, 4);
    let expected_health = ((100.0 - summary.average_score * 100.0) * 10.0).round() / 10.0;
    assert!((summary.health_index - expected_health).abs() <= 0.1);
}

#[test]
fn test_history_newest_first() {
    let engine = RiskEngine::default();
    let history = ScoreHistory::new();
    let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();

    history.append(engine.score_at(&snapshot("raj_001", 0.1, 0.1, 0.1), t0).unwrap());
    history.append(engine.score_at(&snapshot("raj_001", 0.9, 0.9, 0.9), t1).unwrap());

    let list = history.for_location("raj_001", 5);
    assert_eq!(list[0].timestamp, t1);
    assert_eq!(history.latest("raj_001").unwrap().timestamp, t1);
    assert_eq!(history.summary().high_risk_count, 1);
}
