//! Alert Manager
//!
//! Owned, lock-guarded store. Alerts chỉ được append và đổi flag
//! (read / acknowledged), không bao giờ bị xoá.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::types::{Alert, AlertDraft, AlertSource};
use crate::logic::round_dp;
use crate::logic::severity::{Severity, Verdict};
use crate::logic::signals::Location;

/// Default page size for `list_recent`
pub const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Debug, Default)]
pub struct AlertManager {
    alerts: RwLock<Vec<Alert>>,
}

impl AlertManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, draft: AlertDraft) -> Alert {
        self.create_at(draft, Utc::now())
    }

    pub fn create_at(&self, draft: AlertDraft, at: DateTime<Utc>) -> Alert {
        let alert = Alert {
            id: Uuid::new_v4(),
            title: draft.title,
            location_name: draft
                .location_name
                .unwrap_or_else(|| draft.location_id.clone()),
            location_id: draft.location_id,
            severity: draft.severity,
            message: draft.message,
            confidence: draft.confidence,
            created_at: at,
            read: false,
            acknowledged: false,
            acknowledged_at: None,
            source: draft.source,
            detection_type: draft.detection_type,
        };

        log::info!(
            "Alert {} created: {} at {} ({:?})",
            alert.id,
            alert.severity,
            alert.location_id,
            alert.source
        );

        self.alerts.write().push(alert.clone());
        alert
    }

    /// Alert for a HIGH/CRITICAL verdict, None otherwise
    pub fn create_from_verdict(&self, verdict: &Verdict, location: Option<&Location>) -> Option<Alert> {
        if !verdict.severity.requires_action() {
            return None;
        }

        let name = location.map(|l| l.name.as_str()).unwrap_or("Unknown");
        let mut draft = AlertDraft::new(
            &format!("{} mining risk at {}", verdict.severity, name),
            &verdict.recommendation,
            verdict.severity,
            &verdict.location_id,
        )
        .with_location_name(name)
        .with_confidence(round_dp(verdict.overall_confidence, 2))
        .with_source(AlertSource::Detection);

        // Strongest contributing modality
        if let Some(top) = verdict
            .findings
            .iter()
            .max_by(|a, b| a.confidence.partial_cmp(&b.confidence).unwrap_or(std::cmp::Ordering::Equal))
        {
            draft = draft.with_detection_type(top.modality.as_str());
        }

        Some(self.create_at(draft, verdict.evaluated_at))
    }

    /// Drill / demo alert, flagged as simulated
    pub fn inject_simulated(
        &self,
        location: &Location,
        detection_type: &str,
        severity: Severity,
        confidence: f64,
    ) -> Alert {
        let draft = AlertDraft::new(
            &format!("Simulated {} alert", detection_type),
            &format!("Simulated {} detected at {}", detection_type, location.name),
            severity,
            &location.id,
        )
        .with_location_name(&location.name)
        .with_confidence(round_dp(confidence.clamp(0.0, 1.0), 2))
        .with_source(AlertSource::Simulated)
        .with_detection_type(detection_type);

        self.create(draft)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn get(&self, id: Uuid) -> Option<Alert> {
        self.alerts.read().iter().find(|a| a.id == id).cloned()
    }

    /// Creation order
    pub fn list_unread(&self) -> Vec<Alert> {
        self.filtered(|a| !a.read)
    }

    /// Unacknowledged, creation order
    pub fn list_active(&self) -> Vec<Alert> {
        self.filtered(Alert::is_active)
    }

    pub fn list_by_severity(&self, severity: Severity) -> Vec<Alert> {
        self.filtered(|a| a.severity == severity)
    }

    /// Newest first
    pub fn list_recent(&self, limit: usize) -> Vec<Alert> {
        self.alerts.read().iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.read().is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.read().iter().filter(|a| !a.read).count()
    }

    fn filtered(&self, pred: impl Fn(&Alert) -> bool) -> Vec<Alert> {
        self.alerts.read().iter().filter(|a| pred(a)).cloned().collect()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// False for an unknown id
    pub fn mark_read(&self, id: Uuid) -> bool {
        match self.alerts.write().iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.read = true;
                true
            }
            None => false,
        }
    }

    /// Idempotent: repeat calls keep the first timestamp and return true.
    /// False for an unknown id.
    pub fn acknowledge(&self, id: Uuid) -> bool {
        let mut alerts = self.alerts.write();
        match alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                if !alert.acknowledged {
                    alert.acknowledged = true;
                    alert.acknowledged_at = Some(Utc::now());
                    log::info!("Alert {} acknowledged", id);
                }
                true
            }
            None => {
                log::debug!("Acknowledge for unknown alert {}", id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::analyzers::{AnalysisContext, Finding, FindingDetail, Modality};
    use crate::logic::severity::aggregate;
    use crate::logic::signals::RiskTier;

    fn sariska() -> Location {
        Location::new("raj_001", "Sariska Tiger Reserve - Alwar", 27.3217, 76.4378)
            .with_risk_tier(RiskTier::High)
    }

    fn verdict_with(modalities: &[(Modality, f64)]) -> Verdict {
        let findings = modalities
            .iter()
            .map(|(m, c)| Finding {
                modality: *m,
                alert: true,
                confidence: *c,
                message: String::new(),
                detail: FindingDetail::NoData,
                evaluated_at: Utc::now(),
            })
            .collect();
        aggregate("raj_001", findings, Utc::now())
    }

    #[test]
    fn test_create_defaults() {
        let mgr = AlertManager::new();
        let alert = mgr.create(AlertDraft::new("Test", "msg", Severity::Medium, "raj_002"));

        assert!(!alert.read);
        assert!(!alert.acknowledged);
        assert!(alert.acknowledged_at.is_none());
        assert_eq!(alert.source, AlertSource::Manual);
        assert_eq!(alert.location_name, "raj_002");
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn test_acknowledge_round_trip_and_idempotent() {
        let mgr = AlertManager::new();
        let alert = mgr.create(AlertDraft::new("Test", "msg", Severity::High, "raj_001"));

        assert!(mgr.acknowledge(alert.id));
        let first = mgr.get(alert.id).unwrap();
        assert!(first.acknowledged);
        assert!(first.acknowledged_at.is_some());

        assert!(mgr.acknowledge(alert.id));
        let second = mgr.get(alert.id).unwrap();
        assert_eq!(second.acknowledged_at, first.acknowledged_at);
        assert!(mgr.list_active().is_empty());
    }

    #[test]
    fn test_unknown_id_returns_false() {
        let mgr = AlertManager::new();
        assert!(!mgr.acknowledge(Uuid::new_v4()));
        assert!(!mgr.mark_read(Uuid::new_v4()));
        assert!(mgr.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_mark_read() {
        let mgr = AlertManager::new();
        let a = mgr.create(AlertDraft::new("A", "m", Severity::Low, "x"));
        let _b = mgr.create(AlertDraft::new("B", "m", Severity::Low, "x"));

        assert!(mgr.mark_read(a.id));
        assert_eq!(mgr.unread_count(), 1);
        assert_eq!(mgr.list_unread()[0].title, "B");
    }

    #[test]
    fn test_from_verdict_only_high_or_critical() {
        let mgr = AlertManager::new();
        let loc = sariska();

        let medium = verdict_with(&[(Modality::CameraDetection, 0.6), (Modality::GpsTracking, 0.7)]);
        assert!(mgr.create_from_verdict(&medium, Some(&loc)).is_none());

        let ctx = AnalysisContext::new("raj_001", Utc::now());
        let low = aggregate("raj_001", vec![Finding::no_data(Modality::GpsTracking, &ctx)], Utc::now());
        assert!(mgr.create_from_verdict(&low, Some(&loc)).is_none());

        let critical = verdict_with(&[
            (Modality::VegetationLoss, 0.47),
            (Modality::NightActivity, 0.8),
            (Modality::AcousticDetection, 0.85),
        ]);
        let alert = mgr.create_from_verdict(&critical, Some(&loc)).unwrap();
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.location_name, "Sariska Tiger Reserve - Alwar");
        assert_eq!(alert.source, AlertSource::Detection);
        assert_eq!(alert.detection_type.as_deref(), Some("acoustic_detection"));
        assert_eq!(alert.message, critical.recommendation);
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn test_simulated_injection() {
        let mgr = AlertManager::new();
        let alert = mgr.inject_simulated(&sariska(), "excavator", Severity::High, 0.912);

        assert_eq!(alert.source, AlertSource::Simulated);
        assert_eq!(alert.confidence, 0.91);
        assert_eq!(alert.message, "Simulated excavator detected at Sariska Tiger Reserve - Alwar");
    }

    #[test]
    fn test_list_recent_and_by_severity() {
        let mgr = AlertManager::new();
        for i in 0..5 {
            let sev = if i % 2 == 0 { Severity::High } else { Severity::Critical };
            mgr.create(AlertDraft::new(&format!("A{}", i), "m", sev, "x"));
        }

        let recent = mgr.list_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "A4");
        assert_eq!(mgr.list_by_severity(Severity::Critical).len(), 2);
        assert_eq!(mgr.list_by_severity(Severity::Medium).len(), 0);
    }

    #[test]
    fn test_ids_unique() {
        let mgr = AlertManager::new();
        let ids: std::collections::HashSet<Uuid> = (0..200)
            .map(|_| mgr.create(AlertDraft::new("t", "m", Severity::High, "x")).id)
            .collect();
        assert_eq!(ids.len(), 200);
    }
}
