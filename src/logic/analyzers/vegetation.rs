//! Vegetation Analyzer
//!
//! So sánh NDVI gần đây với baseline window cũ hơn để phát hiện mất thảm thực vật.

use super::types::{AnalysisContext, Finding, FindingDetail, Modality};
use super::{mean, SignalAnalyzer};
use crate::config::{DetectionThresholds, WindowSizes};
use crate::constants::NDVI_DECLINE_TRIGGER;
use crate::logic::round_dp;
use crate::logic::signals::types::{head, tail, VegetationRecord};

/// Confidence floor when only the trend (not the absolute level) triggers
const TREND_CONFIDENCE: f64 = 0.3;

/// Months per year, years projected (loss projection)
const PROJECTION_FACTOR: f64 = 12.0 * 10.0;

#[derive(Debug, Clone)]
pub struct VegetationAnalyzer {
    ndvi_threshold: f64,
    change_sensitivity: f64,
    recent: usize,
    baseline: usize,
}

impl VegetationAnalyzer {
    pub fn new(thresholds: &DetectionThresholds, windows: &WindowSizes) -> Self {
        Self {
            ndvi_threshold: thresholds.ndvi_threshold,
            change_sensitivity: thresholds.change_detection_sensitivity,
            recent: windows.vegetation_recent,
            baseline: windows.vegetation_baseline,
        }
    }

    /// Relative decline of `current` against `historical` (0 when no baseline)
    pub fn decline_rate(historical: f64, current: f64) -> f64 {
        if historical > 0.0 {
            (historical - current) / historical
        } else {
            0.0
        }
    }
}

impl SignalAnalyzer for VegetationAnalyzer {
    type Record = VegetationRecord;

    fn modality(&self) -> Modality {
        Modality::VegetationLoss
    }

    fn analyze(&self, ctx: &AnalysisContext, window: &[VegetationRecord]) -> Finding {
        if window.is_empty() {
            return Finding::no_data(self.modality(), ctx);
        }

        let current = mean(tail(window, self.recent).iter().map(|r| r.ndvi));
        let historical = mean(head(window, self.baseline).iter().map(|r| r.ndvi));
        let decline = Self::decline_rate(historical, current);

        let below_threshold = current < self.ndvi_threshold;
        let alert = below_threshold || decline > NDVI_DECLINE_TRIGGER;

        let confidence = if below_threshold {
            ((self.ndvi_threshold - current) / self.ndvi_threshold + TREND_CONFIDENCE).min(1.0)
        } else {
            TREND_CONFIDENCE
        };

        log::debug!(
            "[{}] NDVI current={:.3} baseline={:.3} decline={:.1}% alert={}",
            ctx.location_id,
            current,
            historical,
            decline * 100.0,
            alert
        );

        Finding {
            modality: self.modality(),
            alert,
            confidence: round_dp(confidence, 2),
            message: format!("Vegetation loss detected: NDVI dropped to {:.2}", current),
            detail: FindingDetail::Vegetation {
                current_ndvi: round_dp(current, 2),
                baseline_ndvi: round_dp(historical, 2),
                change_rate_pct: round_dp(decline * 100.0, 1),
                significant_change: decline > self.change_sensitivity,
                projected_loss_pct: round_dp((decline * PROJECTION_FACTOR).min(100.0), 1),
            },
            evaluated_at: ctx.evaluated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(values: &[f64]) -> Vec<VegetationRecord> {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| VegetationRecord {
                timestamp: t0 + Duration::days(10 * i as i64),
                ndvi: *v,
            })
            .collect()
    }

    fn analyzer() -> VegetationAnalyzer {
        VegetationAnalyzer::new(&DetectionThresholds::default(), &WindowSizes::default())
    }

    fn ctx() -> AnalysisContext {
        AnalysisContext::new("raj_001", Utc::now())
    }

    #[test]
    fn test_empty_window() {
        let f = analyzer().analyze(&ctx(), &[]);
        assert!(!f.alert);
        assert_eq!(f.confidence, 0.0);
    }

    #[test]
    fn test_sharp_decline_below_threshold() {
        // Baseline mean 0.60, recent mean 0.25
        let mut values = vec![0.60; 10];
        values.extend(vec![0.25; 5]);
        let f = analyzer().analyze(&ctx(), &series(&values));

        assert!(f.alert);
        match f.detail {
            FindingDetail::Vegetation { current_ndvi, baseline_ndvi, change_rate_pct, significant_change, .. } => {
                assert_eq!(current_ndvi, 0.25);
                assert_eq!(baseline_ndvi, 0.6);
                assert_eq!(change_rate_pct, 58.3);
                assert!(significant_change);
            }
            other => panic!("unexpected detail {:?}", other),
        }
        // (0.30 - 0.25) / 0.30 + 0.3
        assert_eq!(f.confidence, 0.47);
    }

    #[test]
    fn test_trend_only_trigger_uses_floor_confidence() {
        // Above threshold but down 25%
        let mut values = vec![0.80; 10];
        values.extend(vec![0.60; 5]);
        let f = analyzer().analyze(&ctx(), &series(&values));
        assert!(f.alert);
        assert_eq!(f.confidence, 0.3);
    }

    #[test]
    fn test_healthy_vegetation_no_alert() {
        let f = analyzer().analyze(&ctx(), &series(&[0.62; 15]));
        assert!(!f.alert);
    }

    #[test]
    fn test_decline_rate_zero_baseline() {
        assert_eq!(VegetationAnalyzer::decline_rate(0.0, 0.2), 0.0);
        assert_eq!(VegetationAnalyzer::decline_rate(-0.1, 0.2), 0.0);
        assert!((VegetationAnalyzer::decline_rate(0.6, 0.25) - 0.58333).abs() < 1e-4);
    }

    #[test]
    fn test_projection_capped_but_growth_negative() {
        let mut values = vec![0.60; 10];
        values.extend(vec![0.25; 5]);
        match analyzer().analyze(&ctx(), &series(&values)).detail {
            FindingDetail::Vegetation { projected_loss_pct, .. } => assert_eq!(projected_loss_pct, 100.0),
            other => panic!("unexpected detail {:?}", other),
        }

        // NDVI 0.50 → 0.55: -10% decline, projected -12%
        let mut values = vec![0.50; 10];
        values.extend(vec![0.55; 5]);
        match analyzer().analyze(&ctx(), &series(&values)).detail {
            FindingDetail::Vegetation { projected_loss_pct, .. } => {
                assert!(projected_loss_pct < 0.0);
                assert!((projected_loss_pct + 12.0).abs() < 0.15);
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_confidence_capped() {
        let mut values = vec![0.6; 10];
        values.extend(vec![-0.2; 5]);
        let f = analyzer().analyze(&ctx(), &series(&values));
        assert_eq!(f.confidence, 1.0);
    }
}
