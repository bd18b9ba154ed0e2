//! Monitoring Engine
//!
//! Facade cho hosting service: giữ config, location registry, analyzers,
//! risk engine, score history, alert manager và sink (optional).
//!
//! Input validation xảy ra ở đây, trước khi tới scoring logic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::constants::{DEFAULT_LOCATE_RADIUS_KM, TRACK_VICINITY_DEGREES};
use crate::error::{EngineError, EngineResult};
use crate::logic::alerts::{Alert, AlertDraft, AlertManager};
use crate::logic::analyzers::{AnalysisContext, AnalyzerSet};
use crate::logic::risk::{IndicatorSnapshot, RiskEngine, RiskScoreRecord, RiskSummary, ScoreHistory};
use crate::logic::severity::{aggregate, Severity, Verdict};
use crate::logic::signals::{tracks_near, Location, LocationRegistry, NearestLocation, SignalWindows};
use crate::logic::sink::{JsonlSink, RecordSink};

pub struct MonitoringEngine {
    config: EngineConfig,
    registry: LocationRegistry,
    analyzers: AnalyzerSet,
    risk: RiskEngine,
    history: ScoreHistory,
    alerts: AlertManager,
    sink: Option<Arc<dyn RecordSink>>,
}

impl MonitoringEngine {
    /// Engine without a sink
    pub fn new(config: EngineConfig, registry: LocationRegistry) -> EngineResult<Self> {
        config.validate()?;
        log::info!(
            "Monitoring engine ready: {} locations, calibration={}",
            registry.len(),
            config.risk.calibration
        );
        Ok(Self {
            analyzers: AnalyzerSet::from_config(&config),
            risk: RiskEngine::new(config.risk.clone()),
            history: ScoreHistory::new(),
            alerts: AlertManager::new(),
            sink: None,
            config,
            registry,
        })
    }

    /// Engine with the JSONL sink when `sink_dir` is configured
    pub fn from_config(config: EngineConfig, registry: LocationRegistry) -> EngineResult<Self> {
        let sink_dir = config.sink_dir.clone();
        let engine = Self::new(config, registry)?;
        match sink_dir {
            Some(dir) => Ok(engine.with_sink(Arc::new(JsonlSink::from_path(dir)?))),
            None => Ok(engine),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    pub fn risk_engine(&self) -> &RiskEngine {
        &self.risk
    }

    // ========================================================================
    // RULE AGGREGATION PATH
    // ========================================================================

    pub fn evaluate(&self, location_id: &str, windows: &SignalWindows) -> EngineResult<Verdict> {
        self.evaluate_at(location_id, windows, Utc::now())
    }

    /// Evaluate at a fixed instant
    pub fn evaluate_at(
        &self,
        location_id: &str,
        windows: &SignalWindows,
        at: DateTime<Utc>,
    ) -> EngineResult<Verdict> {
        let location = self.resolve(location_id)?;
        windows.validate()?;

        let mut windows = windows.clone().sorted();
        // GPS feed covers the whole region; keep tracks around this location
        if let Some(loc) = location {
            windows.tracks = tracks_near(loc, &windows.tracks, TRACK_VICINITY_DEGREES);
        }

        let ctx = AnalysisContext::new(location_id, at)
            .with_utc_offset(self.config.utc_offset_minutes);
        let findings = self.analyzers.run_all(&ctx, &windows);
        let verdict = aggregate(location_id, findings, at);

        self.persist(|sink| sink.write_verdict(&verdict));
        Ok(verdict)
    }

    /// Evaluate and raise an alert for HIGH/CRITICAL
    pub fn evaluate_and_alert(
        &self,
        location_id: &str,
        windows: &SignalWindows,
    ) -> EngineResult<(Verdict, Option<Alert>)> {
        self.evaluate_and_alert_at(location_id, windows, Utc::now())
    }

    pub fn evaluate_and_alert_at(
        &self,
        location_id: &str,
        windows: &SignalWindows,
        at: DateTime<Utc>,
    ) -> EngineResult<(Verdict, Option<Alert>)> {
        let verdict = self.evaluate_at(location_id, windows, at)?;
        let alert = self
            .alerts
            .create_from_verdict(&verdict, self.registry.get(location_id));
        if let Some(alert) = &alert {
            self.persist(|sink| sink.write_alert(alert));
        }
        Ok((verdict, alert))
    }

    // ========================================================================
    // STATISTICAL PATH
    // ========================================================================

    pub fn score(&self, location_id: &str, snapshot: &IndicatorSnapshot) -> EngineResult<RiskScoreRecord> {
        self.resolve(location_id)?;

        if !snapshot.location_id.is_empty() && snapshot.location_id != location_id {
            return Err(EngineError::InvalidInput(format!(
                "snapshot is for '{}', not '{}'",
                snapshot.location_id, location_id
            )));
        }
        if !snapshot.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "non-finite indicator for location '{}'",
                location_id
            )));
        }

        let mut snapshot = snapshot.clone();
        snapshot.location_id = location_id.to_string();

        let record = self.risk.score(&snapshot)?;
        self.history.append(record.clone());
        self.persist(|sink| sink.write_score(&record));
        Ok(record)
    }

    pub fn train(&self, population: &[IndicatorSnapshot]) -> EngineResult<()> {
        self.risk.train(population).map(|_| ())
    }

    pub fn retrain(&self) -> EngineResult<()> {
        self.risk.retrain().map(|_| ())
    }

    pub fn score_history(&self, location_id: &str, limit: usize) -> Vec<RiskScoreRecord> {
        self.history.for_location(location_id, limit)
    }

    pub fn risk_summary(&self) -> RiskSummary {
        self.history.summary()
    }

    // ========================================================================
    // ALERTS
    // ========================================================================

    pub fn create_alert(&self, mut draft: AlertDraft) -> EngineResult<Alert> {
        validate_id(&draft.location_id)?;
        if draft.location_name.is_none() {
            if let Some(loc) = self.registry.get(&draft.location_id) {
                draft.location_name = Some(loc.name.clone());
            }
        }
        let alert = self.alerts.create(draft);
        self.persist(|sink| sink.write_alert(&alert));
        Ok(alert)
    }

    pub fn inject_simulated_alert(
        &self,
        location_id: &str,
        detection_type: &str,
        severity: Severity,
        confidence: f64,
    ) -> EngineResult<Alert> {
        let location = self
            .registry
            .get(location_id)
            .ok_or_else(|| EngineError::UnknownLocation(location_id.to_string()))?;
        if detection_type.trim().is_empty() {
            return Err(EngineError::InvalidInput("detection type is empty".into()));
        }
        let alert = self
            .alerts
            .inject_simulated(location, detection_type, severity, confidence);
        self.persist(|sink| sink.write_alert(&alert));
        Ok(alert)
    }

    /// Newest first
    pub fn list_alerts(&self, limit: usize) -> Vec<Alert> {
        self.alerts.list_recent(limit)
    }

    /// Store for the remaining list operations
    pub fn alerts(&self) -> &AlertManager {
        &self.alerts
    }

    pub fn acknowledge_alert(&self, id: Uuid) -> bool {
        let ok = self.alerts.acknowledge(id);
        if ok {
            if let Some(alert) = self.alerts.get(id) {
                self.persist(|sink| sink.write_alert(&alert));
            }
        }
        ok
    }

    pub fn mark_alert_read(&self, id: Uuid) -> bool {
        self.alerts.mark_read(id)
    }

    // ========================================================================
    // LOCATIONS
    // ========================================================================

    /// Nearest monitored location within the default radius
    pub fn locate(&self, latitude: f64, longitude: f64) -> Option<NearestLocation> {
        if !(latitude.is_finite() && longitude.is_finite()) {
            return None;
        }
        self.registry.nearest(latitude, longitude, DEFAULT_LOCATE_RADIUS_KM)
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// Known location, or None when running without reference data
    fn resolve(&self, location_id: &str) -> EngineResult<Option<&Location>> {
        validate_id(location_id)?;
        match self.registry.get(location_id) {
            Some(loc) => Ok(Some(loc)),
            None if self.registry.is_empty() => Ok(None),
            None => Err(EngineError::UnknownLocation(location_id.to_string())),
        }
    }

    fn persist(&self, write: impl FnOnce(&dyn RecordSink) -> EngineResult<()>) {
        if let Some(sink) = &self.sink {
            if let Err(e) = write(sink.as_ref()) {
                log::warn!("Record sink write failed: {}", e);
            }
        }
    }
}

fn validate_id(location_id: &str) -> EngineResult<()> {
    if location_id.trim().is_empty() {
        return Err(EngineError::InvalidInput("location id is empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::analyzers::Modality;
    use crate::logic::risk::RiskClass;
    use crate::logic::signals::{
        AcousticRecord, NightlightRecord, RiskTier, TrackRecord, VegetationRecord,
    };
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    fn registry() -> LocationRegistry {
        LocationRegistry::new(vec![
            Location::new("raj_001", "Sariska Tiger Reserve - Alwar", 27.3217, 76.4378)
                .with_risk_tier(RiskTier::High),
            Location::new("raj_004", "Mount Abu", 24.5925, 72.7083),
        ])
    }

    fn engine() -> MonitoringEngine {
        MonitoringEngine::new(EngineConfig::default(), registry()).unwrap()
    }

    fn night() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 20, 23, 0, 0).unwrap()
    }

    /// Vegetation collapse + bright nights + night machinery
    fn mining_windows() -> SignalWindows {
        let t0 = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let mut vegetation: Vec<VegetationRecord> = (0..10)
            .map(|i| VegetationRecord { timestamp: t0 + Duration::days(10 * i), ndvi: 0.6 })
            .collect();
        vegetation.extend((10..15).map(|i| VegetationRecord {
            timestamp: t0 + Duration::days(10 * i),
            ndvi: 0.25,
        }));

        SignalWindows {
            vegetation,
            nightlight: [20.0, 24.0, 28.0]
                .iter()
                .enumerate()
                .map(|(i, v)| NightlightRecord {
                    timestamp: t0 + Duration::days(i as i64),
                    intensity: *v,
                })
                .collect(),
            acoustic: vec![AcousticRecord {
                timestamp: t0,
                detection_type: "excavator".into(),
                confidence: 0.9,
                is_night: true,
            }],
            ..Default::default()
        }
    }

    fn far_tracks() -> Vec<TrackRecord> {
        (0..6)
            .map(|i| TrackRecord {
                timestamp: Utc::now() + Duration::minutes(i),
                vehicle_id: "RJ-14-GA-1234".into(),
                latitude: 20.0,
                longitude: 80.0,
                speed_kmh: 40.0,
                near_checkpoint: false,
            })
            .collect()
    }

    #[test]
    fn test_critical_scenario_raises_alert() {
        let engine = engine();
        let (verdict, alert) = engine
            .evaluate_and_alert_at("raj_001", &mining_windows(), night())
            .unwrap();

        assert_eq!(verdict.severity, Severity::Critical);
        assert_eq!(
            verdict.triggered_modalities(),
            vec![
                Modality::VegetationLoss,
                Modality::NightActivity,
                Modality::AcousticDetection
            ]
        );
        let alert = alert.unwrap();
        assert_eq!(alert.location_name, "Sariska Tiger Reserve - Alwar");
        assert_eq!(engine.list_alerts(10).len(), 1);

        assert!(engine.acknowledge_alert(alert.id));
        assert!(engine.alerts().list_active().is_empty());
    }

    #[test]
    fn test_quiet_location_no_alert() {
        let engine = engine();
        let (verdict, alert) = engine
            .evaluate_and_alert("raj_004", &SignalWindows::new())
            .unwrap();
        assert_eq!(verdict.severity, Severity::Low);
        assert!(alert.is_none());
        assert!(engine.alerts().is_empty());
    }

    #[test]
    fn test_tracks_filtered_to_location_vicinity() {
        let windows = SignalWindows { tracks: far_tracks(), ..Default::default() };

        // Known location: far tracks dropped, no evasion finding
        let verdict = engine().evaluate("raj_001", &windows).unwrap();
        assert_eq!(verdict.alert_count, 0);

        // No reference data: tracks used as given
        let bare = MonitoringEngine::new(EngineConfig::default(), LocationRegistry::default()).unwrap();
        let verdict = bare.evaluate("anywhere", &windows).unwrap();
        assert!(verdict.has_modality(Modality::GpsTracking));
    }

    #[test]
    fn test_boundary_validation() {
        let engine = engine();
        assert!(matches!(
            engine.evaluate("  ", &SignalWindows::new()),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.evaluate("raj_999", &SignalWindows::new()),
            Err(EngineError::UnknownLocation(_))
        ));
        assert!(matches!(
            engine.score("raj_001", &IndicatorSnapshot::new("raj_001", f64::NAN, 0.1, 0.1)),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.score("raj_001", &IndicatorSnapshot::new("raj_004", 0.1, 0.1, 0.1)),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(engine
            .inject_simulated_alert("raj_999", "drill", Severity::High, 0.9)
            .is_err());
        assert!(engine.risk_engine().scored_count() == 0);
    }

    #[test]
    fn test_out_of_range_records_rejected() {
        let engine = engine();
        let windows = SignalWindows {
            acoustic: vec![AcousticRecord {
                timestamp: night(),
                detection_type: "excavator".into(),
                confidence: 7.5,
                is_night: true,
            }],
            ..Default::default()
        };
        assert!(matches!(
            engine.evaluate_and_alert_at("raj_001", &windows, night()),
            Err(EngineError::InvalidInput(_))
        ));

        let windows = SignalWindows {
            nightlight: vec![NightlightRecord { timestamp: night(), intensity: f64::NAN }],
            ..Default::default()
        };
        assert!(engine.evaluate("raj_001", &windows).is_err());
        assert!(engine.alerts().is_empty());
    }

    #[test]
    fn test_score_appends_history() {
        let engine = engine();
        engine
            .score("raj_001", &IndicatorSnapshot::new("", 0.1, 0.1, 0.1))
            .unwrap();
        let high = engine
            .score("raj_001", &IndicatorSnapshot::new("raj_001", 0.85, 0.85, 0.75))
            .unwrap();
        assert_eq!(high.classification, RiskClass::High);

        let history = engine.score_history("raj_001", 10);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].final_score, high.final_score);

        let summary = engine.risk_summary();
        assert_eq!(summary.total_locations, 1);
        assert_eq!(summary.high_risk_count, 1);
    }

    #[test]
    fn test_locate() {
        let engine = engine();
        assert_eq!(engine.locate(27.33, 76.44).unwrap().location.id, "raj_001");
        assert!(engine.locate(0.0, 0.0).is_none());
        assert!(engine.locate(f64::NAN, 76.0).is_none());
    }

    #[test]
    fn test_create_alert_resolves_name() {
        let engine = engine();
        let alert = engine
            .create_alert(AlertDraft::new("Patrol report", "Fresh pits", Severity::Medium, "raj_004"))
            .unwrap();
        assert_eq!(alert.location_name, "Mount Abu");
        assert!(engine.mark_alert_read(alert.id));
        assert!(engine
            .create_alert(AlertDraft::new("t", "m", Severity::Low, ""))
            .is_err());
    }

    #[test]
    fn test_sink_receives_records() {
        let dir = tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.sink_dir = Some(dir.path().to_path_buf());
        let engine = MonitoringEngine::from_config(config, registry()).unwrap();

        engine
            .evaluate_and_alert_at("raj_001", &mining_windows(), night())
            .unwrap();
        engine
            .score("raj_001", &IndicatorSnapshot::new("raj_001", 0.2, 0.2, 0.1))
            .unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert!(names.iter().any(|n| n.starts_with("verdicts-")));
        assert!(names.iter().any(|n| n.starts_with("alerts-")));
        assert!(names.iter().any(|n| n.starts_with("scores-")));
    }

    #[test]
    fn test_parallel_evaluation() {
        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let id = if i % 2 == 0 { "raj_001" } else { "raj_004" };
                    engine.evaluate_and_alert_at(id, &mining_windows(), night()).unwrap()
                })
            })
            .collect();
        for h in handles {
            let (verdict, alert) = h.join().unwrap();
            assert_eq!(verdict.severity, Severity::Critical);
            assert!(alert.is_some());
        }
        assert_eq!(engine.alerts().len(), 8);
    }
}
