//! Track Analyzer
//!
//! GPS tracks của xe: chạy quá tốc độ hoặc né checkpoint.
//!
//! Checkpoint evasion chỉ tính khi sample đủ lớn, tránh false positive
//! khi mới có vài điểm GPS.

use super::types::{AnalysisContext, Finding, FindingDetail, Modality};
use super::SignalAnalyzer;
use crate::config::{DetectionThresholds, WindowSizes};
use crate::logic::signals::types::{tail, TrackRecord};

const SPEEDING_CONFIDENCE: f64 = 0.7;
const EVASION_CONFIDENCE: f64 = 0.4;
const QUIET_CONFIDENCE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct TrackAnalyzer {
    speed_threshold: f64,
    window: usize,
    min_samples: usize,
}

impl TrackAnalyzer {
    pub fn new(thresholds: &DetectionThresholds, windows: &WindowSizes) -> Self {
        Self {
            speed_threshold: thresholds.gps_speed_threshold,
            window: windows.track,
            min_samples: windows.track_min_samples,
        }
    }
}

impl SignalAnalyzer for TrackAnalyzer {
    type Record = TrackRecord;

    fn modality(&self) -> Modality {
        Modality::GpsTracking
    }

    fn analyze(&self, ctx: &AnalysisContext, window: &[TrackRecord]) -> Finding {
        if window.is_empty() {
            return Finding::no_data(self.modality(), ctx);
        }

        let recent = tail(window, self.window);
        let high_speed_count = recent
            .iter()
            .filter(|r| r.speed_kmh > self.speed_threshold)
            .count();
        let checkpoint_count = recent.iter().filter(|r| r.near_checkpoint).count();
        let checkpoint_evasion = checkpoint_count == 0 && recent.len() > self.min_samples;

        let alert = high_speed_count > 0 || checkpoint_evasion;
        let confidence = if high_speed_count > 0 {
            SPEEDING_CONFIDENCE
        } else if checkpoint_evasion {
            EVASION_CONFIDENCE
        } else {
            QUIET_CONFIDENCE
        };

        if checkpoint_evasion {
            log::debug!(
                "[{}] {} GPS samples without checkpoint contact",
                ctx.location_id,
                recent.len()
            );
        }

        Finding {
            modality: self.modality(),
            alert,
            confidence,
            message: format!(
                "GPS anomaly: {} vehicles exceeding speed limit",
                high_speed_count
            ),
            detail: FindingDetail::Track {
                samples: recent.len(),
                high_speed_count,
                checkpoint_count,
                checkpoint_evasion,
            },
            evaluated_at: ctx.evaluated_at,
        }
    }
}
