//! Nightlight Analyzer
//!
//! VIIRS radiance trung bình của các mẫu gần nhất vượt ngưỡng = hoạt động ban đêm.

use super::types::{AnalysisContext, Finding, FindingDetail, Modality};
use super::{mean, SignalAnalyzer};
use crate::config::{DetectionThresholds, WindowSizes};
use crate::logic::round_dp;
use crate::logic::signals::types::{tail, NightlightRecord};

/// Radiance at which confidence saturates
const SATURATION_INTENSITY: f64 = 30.0;

const QUIET_CONFIDENCE: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct NightlightAnalyzer {
    threshold: f64,
    night_hours: Vec<u8>,
    window: usize,
}

impl NightlightAnalyzer {
    pub fn new(thresholds: &DetectionThresholds, windows: &WindowSizes) -> Self {
        Self {
            threshold: thresholds.nightlight_threshold,
            night_hours: thresholds.night_hours.clone(),
            window: windows.nightlight,
        }
    }
}

impl SignalAnalyzer for NightlightAnalyzer {
    type Record = NightlightRecord;

    fn modality(&self) -> Modality {
        Modality::NightActivity
    }

    fn analyze(&self, ctx: &AnalysisContext, window: &[NightlightRecord]) -> Finding {
        if window.is_empty() {
            return Finding::no_data(self.modality(), ctx);
        }

        let intensity = mean(tail(window, self.window).iter().map(|r| r.intensity));
        let alert = intensity > self.threshold;
        let confidence = if alert {
            (intensity / SATURATION_INTENSITY).min(1.0)
        } else {
            QUIET_CONFIDENCE
        };

        // Informational only, does not gate the trigger
        let is_night = self.night_hours.contains(&ctx.local_hour());

        log::debug!(
            "[{}] nightlight mean={:.2} threshold={:.1} alert={}",
            ctx.location_id,
            intensity,
            self.threshold,
            alert
        );

        Finding {
            modality: self.modality(),
            alert,
            confidence: round_dp(confidence, 2),
            message: format!(
                "Unusual night activity detected: {:.1} nW/cm²/sr",
                intensity
            ),
            detail: FindingDetail::Nightlight {
                intensity: round_dp(intensity, 2),
                is_night,
            },
            evaluated_at: ctx.evaluated_at,
        }
    }
}
