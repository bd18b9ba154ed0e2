//! Analyzer Types
//!
//! Finding = kết quả của một analyzer cho một location tại một thời điểm.
//! Ephemeral - recomputed on every evaluation, never persisted on its own.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// MODALITY
// ============================================================================

/// Data source type. Serialized names match the alert type tags used by
/// downstream dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    #[serde(rename = "vegetation_loss")]
    VegetationLoss,
    #[serde(rename = "night_mining")]
    NightActivity,
    #[serde(rename = "acoustic_detection")]
    AcousticDetection,
    #[serde(rename = "camera_detection")]
    CameraDetection,
    #[serde(rename = "gps_tracking")]
    GpsTracking,
}

impl Modality {
    pub const ALL: [Modality; 5] = [
        Modality::VegetationLoss,
        Modality::NightActivity,
        Modality::AcousticDetection,
        Modality::CameraDetection,
        Modality::GpsTracking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::VegetationLoss => "vegetation_loss",
            Modality::NightActivity => "night_mining",
            Modality::AcousticDetection => "acoustic_detection",
            Modality::CameraDetection => "camera_detection",
            Modality::GpsTracking => "gps_tracking",
        }
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            Modality::VegetationLoss => "vegetation",
            Modality::NightActivity => "nightlight",
            Modality::AcousticDetection => "acoustic",
            Modality::CameraDetection => "camera",
            Modality::GpsTracking => "GPS track",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ANALYSIS CONTEXT
// ============================================================================

/// Location and instant an evaluation runs for
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub location_id: String,
    pub evaluated_at: DateTime<Utc>,
    /// Offset applied before matching night hours
    pub utc_offset_minutes: i32,
}

impl AnalysisContext {
    pub fn new(location_id: &str, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            location_id: location_id.to_string(),
            evaluated_at,
            utc_offset_minutes: 0,
        }
    }

    pub fn with_utc_offset(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Hour of the evaluation instant in local time
    pub fn local_hour(&self) -> u8 {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or(Utc.fix());
        self.evaluated_at.with_timezone(&offset).hour() as u8
    }
}

// ============================================================================
// FINDING
// ============================================================================

/// Numeric readouts per modality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingDetail {
    /// Empty window
    NoData,
    Vegetation {
        current_ndvi: f64,
        baseline_ndvi: f64,
        /// Relative decline, percent
        change_rate_pct: f64,
        significant_change: bool,
        projected_loss_pct: f64,
    },
    Nightlight {
        intensity: f64,
        is_night: bool,
    },
    Acoustic {
        detections: usize,
        machinery: Vec<String>,
        night_mining: bool,
    },
    Camera {
        vehicles_detected: u32,
        persons_detected: u32,
        has_gps: bool,
    },
    Track {
        samples: usize,
        high_speed_count: usize,
        checkpoint_count: usize,
        checkpoint_evasion: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub modality: Modality,
    pub alert: bool,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub message: String,
    pub detail: FindingDetail,
    pub evaluated_at: DateTime<Utc>,
}

impl Finding {
    /// Non-triggering finding for an empty window
    pub fn no_data(modality: Modality, ctx: &AnalysisContext) -> Self {
        Self {
            modality,
            alert: false,
            confidence: 0.0,
            message: format!("No {} data available", modality.source_name()),
            detail: FindingDetail::NoData,
            evaluated_at: ctx.evaluated_at,
        }
    }

    pub fn has_data(&self) -> bool {
        self.detail != FindingDetail::NoData
    }
}
