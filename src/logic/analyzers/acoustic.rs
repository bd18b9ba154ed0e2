//! Acoustic Analyzer
//!
//! Lọc các detection máy móc có confidence vượt ngưỡng trong cửa sổ gần nhất.

use super::types::{AnalysisContext, Finding, FindingDetail, Modality};
use super::{mean, SignalAnalyzer};
use crate::config::{DetectionThresholds, WindowSizes};
use crate::logic::round_dp;
use crate::logic::signals::types::{tail, AcousticRecord};

/// Machinery types listed in the message
const MAX_LISTED_TYPES: usize = 3;

const QUIET_CONFIDENCE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct AcousticAnalyzer {
    confidence_threshold: f64,
    window: usize,
}

impl AcousticAnalyzer {
    pub fn new(thresholds: &DetectionThresholds, windows: &WindowSizes) -> Self {
        Self {
            confidence_threshold: thresholds.acoustic_confidence_threshold,
            window: windows.acoustic,
        }
    }
}

impl SignalAnalyzer for AcousticAnalyzer {
    type Record = AcousticRecord;

    fn modality(&self) -> Modality {
        Modality::AcousticDetection
    }

    fn analyze(&self, ctx: &AnalysisContext, window: &[AcousticRecord]) -> Finding {
        if window.is_empty() {
            return Finding::no_data(self.modality(), ctx);
        }

        let strong: Vec<&AcousticRecord> = tail(window, self.window)
            .iter()
            .filter(|r| r.confidence > self.confidence_threshold)
            .collect();

        if strong.is_empty() {
            return Finding {
                modality: self.modality(),
                alert: false,
                confidence: QUIET_CONFIDENCE,
                message: "No significant acoustic detections".to_string(),
                detail: FindingDetail::Acoustic {
                    detections: 0,
                    machinery: Vec::new(),
                    night_mining: false,
                },
                evaluated_at: ctx.evaluated_at,
            };
        }

        // Distinct types, first-seen order
        let mut machinery: Vec<String> = Vec::new();
        for r in &strong {
            if !machinery.contains(&r.detection_type) {
                machinery.push(r.detection_type.clone());
            }
        }
        let night_mining = strong.iter().any(|r| r.is_night);
        let confidence = mean(strong.iter().map(|r| r.confidence));

        let listed: Vec<&str> = machinery
            .iter()
            .take(MAX_LISTED_TYPES)
            .map(String::as_str)
            .collect();
        let mut message = format!("Machinery detected: {}", listed.join(", "));
        if night_mining {
            message.push_str(" (NIGHT MINING ALERT)");
        }

        log::debug!(
            "[{}] acoustic detections={} night={}",
            ctx.location_id,
            strong.len(),
            night_mining
        );

        Finding {
            modality: self.modality(),
            alert: true,
            confidence: round_dp(confidence, 2),
            message,
            detail: FindingDetail::Acoustic {
                detections: strong.len(),
                machinery,
                night_mining,
            },
            evaluated_at: ctx.evaluated_at,
        }
    }
}
