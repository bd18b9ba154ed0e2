//! Risk Scoring
//!
//! CHỈ chứa pure functions: rule score, blend, classify, confidence label.

use super::rules::*;
use super::types::{ConfidenceLevel, IndicatorSnapshot, RiskClass};

/// Weighted sum of raw indicators (un-clamped)
pub fn rule_score(snapshot: &IndicatorSnapshot) -> f64 {
    NDVI_WEIGHT * snapshot.ndvi_drop
        + NIGHTLIGHT_WEIGHT * snapshot.nightlight_inc
        + ACOUSTIC_WEIGHT * snapshot.acoustic_score
}

/// final = 0.6 × anomaly + 0.4 × rule
pub fn blend(anomaly: f64, rule: f64) -> f64 {
    ANOMALY_BLEND_WEIGHT * anomaly + RULE_BLEND_WEIGHT * rule
}

/// Step function on the final score
///
/// `anomaly_override` carries the anomaly score when the calibration lets it
/// escalate on its own.
pub fn classify(final_score: f64, anomaly_override: Option<f64>) -> RiskClass {
    let escalated = anomaly_override.map_or(false, |a| a > ANOMALY_OVERRIDE_THRESHOLD);
    if final_score > HIGH_RISK_THRESHOLD || escalated {
        RiskClass::High
    } else if final_score >= MEDIUM_RISK_THRESHOLD {
        RiskClass::Medium
    } else {
        RiskClass::Low
    }
}

/// High when both scores point the same way
pub fn confidence_level(anomaly: f64, rule: f64) -> ConfidenceLevel {
    let both_high = anomaly > AGREEMENT_HIGH && rule > AGREEMENT_HIGH;
    let both_low = anomaly < AGREEMENT_LOW && rule < AGREEMENT_LOW;
    if both_high || both_low {
        ConfidenceLevel::High
    } else {
        ConfidenceLevel::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.75, None), RiskClass::Medium);
        assert_eq!(classify(0.7501, None), RiskClass::High);
        assert_eq!(classify(0.45, None), RiskClass::Medium);
        assert_eq!(classify(0.4499, None), RiskClass::Low);
        assert_eq!(classify(0.0, None), RiskClass::Low);
    }

    #[test]
    fn test_anomaly_override() {
        assert_eq!(classify(0.3, Some(0.76)), RiskClass::High);
        assert_eq!(classify(0.75, Some(0.75)), RiskClass::Medium);
        assert_eq!(classify(0.5, Some(0.2)), RiskClass::Medium);
    }

    #[test]
    fn test_blend_exact() {
        for (a, r) in [(0.0, 0.0), (1.0, 0.0), (0.3, 0.9), (0.77, 0.123)] {
            assert_eq!(blend(a, r), 0.6 * a + 0.4 * r);
        }
    }

    #[test]
    fn test_rule_score_unclamped() {
        let s = IndicatorSnapshot::new("x", 0.85, 0.85, 0.75);
        assert!((rule_score(&s) - 0.82).abs() < 1e-12);

        let s = IndicatorSnapshot::new("x", 2.0, 0.0, 0.0);
        assert!((rule_score(&s) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_level() {
        assert_eq!(confidence_level(0.9, 0.7), ConfidenceLevel::High);
        assert_eq!(confidence_level(0.1, 0.3), ConfidenceLevel::High);
        assert_eq!(confidence_level(0.9, 0.3), ConfidenceLevel::Standard);
        assert_eq!(confidence_level(0.6, 0.6), ConfidenceLevel::Standard);
    }
}
