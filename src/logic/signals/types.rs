//! Signal Types
//!
//! Typed records cho từng modality. KHÔNG chứa analysis logic - chỉ data
//! structures. Required fields are enforced by serde, value ranges by
//! `SignalWindows::validate` at the ingestion boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

// ============================================================================
// LOCATION
// ============================================================================

/// A priori risk tier of a monitored location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }
}

/// Known mining state of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningActivity {
    None,
    Historical,
    Suspicious,
    Active,
}

/// Monitored location (reference data, never mutated by the engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub risk_tier: RiskTier,
    pub mining_activity: MiningActivity,
}

impl Location {
    pub fn new(id: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            risk_tier: RiskTier::Low,
            mining_activity: MiningActivity::None,
        }
    }

    pub fn with_risk_tier(mut self, tier: RiskTier) -> Self {
        self.risk_tier = tier;
        self
    }

    pub fn with_mining_activity(mut self, activity: MiningActivity) -> Self {
        self.mining_activity = activity;
        self
    }

    pub fn is_high_risk(&self) -> bool {
        matches!(self.risk_tier, RiskTier::High | RiskTier::Critical)
    }
}

// ============================================================================
// SIGNAL RECORDS
// ============================================================================

/// Sentinel-2 NDVI sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationRecord {
    pub timestamp: DateTime<Utc>,
    pub ndvi: f64,
}

/// VIIRS nightlight sample (nW/cm²/sr)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightlightRecord {
    pub timestamp: DateTime<Utc>,
    pub intensity: f64,
}

/// Machinery detection from an acoustic sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcousticRecord {
    pub timestamp: DateTime<Utc>,
    /// e.g. "excavator", "drill", "truck"
    pub detection_type: String,
    pub confidence: f64,
    #[serde(default)]
    pub is_night: bool,
}

/// Camera frame summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub timestamp: DateTime<Utc>,
    pub vehicles_detected: u32,
    #[serde(default)]
    pub persons_detected: u32,
    /// Frame paired a vehicle with a positioning signal
    #[serde(default)]
    pub has_gps: bool,
}

/// GPS position of a tracked vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub timestamp: DateTime<Utc>,
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
    #[serde(default)]
    pub near_checkpoint: bool,
}

// ============================================================================
// WINDOWS
// ============================================================================

/// All signal records for one location, one vector per modality
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalWindows {
    #[serde(default)]
    pub vegetation: Vec<VegetationRecord>,
    #[serde(default)]
    pub nightlight: Vec<NightlightRecord>,
    #[serde(default)]
    pub acoustic: Vec<AcousticRecord>,
    #[serde(default)]
    pub camera: Vec<CameraRecord>,
    #[serde(default)]
    pub tracks: Vec<TrackRecord>,
}

impl SignalWindows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Order every modality by timestamp (analyzers read the tail)
    pub fn sorted(mut self) -> Self {
        self.vegetation.sort_by_key(|r| r.timestamp);
        self.nightlight.sort_by_key(|r| r.timestamp);
        self.acoustic.sort_by_key(|r| r.timestamp);
        self.camera.sort_by_key(|r| r.timestamp);
        self.tracks.sort_by_key(|r| r.timestamp);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vegetation.is_empty()
            && self.nightlight.is_empty()
            && self.acoustic.is_empty()
            && self.camera.is_empty()
            && self.tracks.is_empty()
    }

    /// Reject non-finite values and out-of-range confidences
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(r) = self.vegetation.iter().find(|r| !r.ndvi.is_finite()) {
            return Err(bad_record("vegetation", r.timestamp, "ndvi is not finite"));
        }
        if let Some(r) = self.nightlight.iter().find(|r| !r.intensity.is_finite()) {
            return Err(bad_record("nightlight", r.timestamp, "intensity is not finite"));
        }
        if let Some(r) = self
            .acoustic
            .iter()
            .find(|r| !(0.0..=1.0).contains(&r.confidence))
        {
            return Err(bad_record("acoustic", r.timestamp, "confidence must be in [0, 1]"));
        }
        if let Some(r) = self.tracks.iter().find(|r| {
            !(r.speed_kmh.is_finite() && r.latitude.is_finite() && r.longitude.is_finite())
        }) {
            return Err(bad_record("track", r.timestamp, "speed or coordinates not finite"));
        }
        Ok(())
    }

    /// Total record count across modalities
    pub fn len(&self) -> usize {
        self.vegetation.len()
            + self.nightlight.len()
            + self.acoustic.len()
            + self.camera.len()
            + self.tracks.len()
    }
}

fn bad_record(modality: &str, at: DateTime<Utc>, reason: &str) -> EngineError {
    EngineError::InvalidInput(format!("{} record at {}: {}", modality, at.to_rfc3339(), reason))
}

/// Last `n` records of an ordered window
pub fn tail<T>(records: &[T], n: usize) -> &[T] {
    let start = records.len().saturating_sub(n);
    &records[start..]
}

/// First `n` records of an ordered window
pub fn head<T>(records: &[T], n: usize) -> &[T] {
    &records[..n.min(records.len())]
}

// ============================================================================
// TESTS
// ============================================================================
