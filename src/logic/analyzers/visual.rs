//! Visual Analyzer
//!
//! Camera frames: tổng số xe trong cửa sổ gần nhất vượt ngưỡng = đoàn xe vận chuyển.

use super::types::{AnalysisContext, Finding, FindingDetail, Modality};
use super::SignalAnalyzer;
use crate::config::{DetectionThresholds, WindowSizes};
use crate::logic::round_dp;
use crate::logic::signals::types::{tail, CameraRecord};

/// Vehicle count at which confidence saturates
const SATURATION_VEHICLES: f64 = 10.0;

const QUIET_CONFIDENCE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct VisualAnalyzer {
    vehicle_threshold: u32,
    window: usize,
}

impl VisualAnalyzer {
    pub fn new(thresholds: &DetectionThresholds, windows: &WindowSizes) -> Self {
        Self {
            vehicle_threshold: thresholds.camera_vehicle_threshold,
            window: windows.camera,
        }
    }
}

impl SignalAnalyzer for VisualAnalyzer {
    type Record = CameraRecord;

    fn modality(&self) -> Modality {
        Modality::CameraDetection
    }

    fn analyze(&self, ctx: &AnalysisContext, window: &[CameraRecord]) -> Finding {
        if window.is_empty() {
            return Finding::no_data(self.modality(), ctx);
        }

        let recent = tail(window, self.window);
        let vehicles = recent.iter().map(|r| r.vehicles_detected).fold(0u32, u32::saturating_add);
        let persons = recent.iter().map(|r| r.persons_detected).fold(0u32, u32::saturating_add);
        let has_gps = recent.iter().any(|r| r.has_gps);

        let alert = vehicles > self.vehicle_threshold;
        let confidence = if alert {
            (vehicles as f64 / SATURATION_VEHICLES).min(1.0)
        } else {
            QUIET_CONFIDENCE
        };

        Finding {
            modality: self.modality(),
            alert,
            confidence: round_dp(confidence, 2),
            message: format!("{} vehicles detected in recent footage", vehicles),
            detail: FindingDetail::Camera {
                vehicles_detected: vehicles,
                persons_detected: persons,
                has_gps,
            },
            evaluated_at: ctx.evaluated_at,
        }
    }
}
