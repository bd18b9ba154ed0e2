//! Severity Aggregator
//!
//! CHỈ chứa logic aggregate - Findings → Verdict.
//! Deterministic: cùng input luôn cho cùng output.

use chrono::{DateTime, Utc};

use super::rules::{recommendation, HIGH_FINDING_COUNT, MEDIUM_FINDING_COUNT};
use super::types::{Severity, Verdict};
use crate::logic::analyzers::{Finding, Modality};

/// Severity from the set of triggered modalities, first match wins
pub fn classify_severity(triggered: &[Modality]) -> Severity {
    let has = |m: Modality| triggered.contains(&m);

    if has(Modality::NightActivity)
        && has(Modality::VegetationLoss)
        && has(Modality::AcousticDetection)
    {
        Severity::Critical
    } else if triggered.len() >= HIGH_FINDING_COUNT || has(Modality::NightActivity) {
        Severity::High
    } else if triggered.len() >= MEDIUM_FINDING_COUNT {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Aggregate analyzer findings for one location
///
/// Non-triggered findings are dropped before anything is counted.
pub fn aggregate(location_id: &str, findings: Vec<Finding>, at: DateTime<Utc>) -> Verdict {
    let triggered: Vec<Finding> = findings.into_iter().filter(|f| f.alert).collect();

    let overall_confidence = if triggered.is_empty() {
        0.0
    } else {
        triggered.iter().map(|f| f.confidence).sum::<f64>() / triggered.len() as f64
    };

    let modalities: Vec<Modality> = triggered.iter().map(|f| f.modality).collect();
    let severity = classify_severity(&modalities);

    if severity.requires_action() {
        log::info!(
            "[{}] {} verdict from {} findings ({})",
            location_id,
            severity,
            triggered.len(),
            modalities
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Verdict {
        location_id: location_id.to_string(),
        alert_count: triggered.len(),
        findings: triggered,
        overall_confidence,
        severity,
        requires_action: severity.requires_action(),
        recommendation: recommendation(severity).to_string(),
        evaluated_at: at,
    }
}
