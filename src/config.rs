//! Configuration module
//!
//! All detection thresholds live here and are handed to the engine at
//! construction. Nothing inside the analyzers reads the environment.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::logic::risk::{Calibration, ColdStart, RiskConfig};
use crate::logic::sink::default_sink_dir;

// ============================================================================
// DETECTION THRESHOLDS
// ============================================================================

/// Per-modality trigger thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionThresholds {
    /// Recent NDVI below this = vegetation loss
    pub ndvi_threshold: f64,
    /// Mean radiance above this = night activity
    pub nightlight_threshold: f64,
    /// Acoustic detections must exceed this confidence
    pub acoustic_confidence_threshold: f64,
    /// Vehicle sum above this = convoy
    pub camera_vehicle_threshold: u32,
    /// Speed above this (km/h) = anomalous haulage
    pub gps_speed_threshold: f64,
    /// Hours (local) considered night
    pub night_hours: Vec<u8>,
    /// Vegetation decline considered a significant landscape change
    pub change_detection_sensitivity: f64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            ndvi_threshold: DEFAULT_NDVI_THRESHOLD,
            nightlight_threshold: DEFAULT_NIGHTLIGHT_THRESHOLD,
            acoustic_confidence_threshold: DEFAULT_ACOUSTIC_CONFIDENCE,
            camera_vehicle_threshold: DEFAULT_CAMERA_VEHICLE_THRESHOLD,
            gps_speed_threshold: DEFAULT_GPS_SPEED_THRESHOLD,
            night_hours: DEFAULT_NIGHT_HOURS.to_vec(),
            change_detection_sensitivity: DEFAULT_CHANGE_SENSITIVITY,
        }
    }
}

impl DetectionThresholds {
    /// High sensitivity - lower thresholds, more alerts
    pub fn high_sensitivity() -> Self {
        Self {
            ndvi_threshold: 0.35,
            nightlight_threshold: 10.0,
            acoustic_confidence_threshold: 0.6,
            camera_vehicle_threshold: 2,
            gps_speed_threshold: 60.0,
            ..Default::default()
        }
    }

    /// Low sensitivity - higher thresholds, fewer alerts
    pub fn low_sensitivity() -> Self {
        Self {
            ndvi_threshold: 0.25,
            nightlight_threshold: 20.0,
            acoustic_confidence_threshold: 0.85,
            camera_vehicle_threshold: 5,
            gps_speed_threshold: 100.0,
            ..Default::default()
        }
    }

    pub fn is_night_hour(&self, hour: u8) -> bool {
        self.night_hours.contains(&hour)
    }
}

// ============================================================================
// WINDOW SIZES
// ============================================================================

/// How many trailing records each analyzer looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSizes {
    pub vegetation_recent: usize,
    pub vegetation_baseline: usize,
    pub nightlight: usize,
    pub acoustic: usize,
    pub camera: usize,
    pub track: usize,
    /// Track sample size that must be exceeded for checkpoint evasion
    pub track_min_samples: usize,
}

impl Default for WindowSizes {
    fn default() -> Self {
        Self {
            vegetation_recent: DEFAULT_VEGETATION_RECENT,
            vegetation_baseline: DEFAULT_VEGETATION_BASELINE,
            nightlight: DEFAULT_NIGHTLIGHT_WINDOW,
            acoustic: DEFAULT_ACOUSTIC_WINDOW,
            camera: DEFAULT_CAMERA_WINDOW,
            track: DEFAULT_TRACK_WINDOW,
            track_min_samples: DEFAULT_TRACK_MIN_SAMPLES,
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub thresholds: DetectionThresholds,
    pub windows: WindowSizes,
    pub risk: RiskConfig,
    /// Offset applied to UTC evaluation time before night-hour checks
    pub utc_offset_minutes: i32,
    /// Directory for the JSONL record sink (None = no sink)
    pub sink_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> EngineResult<Self> {
        let mut config = Self::default();

        if let Ok(preset) = env::var(ENV_SENSITIVITY) {
            config.thresholds = match preset.to_lowercase().as_str() {
                "high" => DetectionThresholds::high_sensitivity(),
                "low" => DetectionThresholds::low_sensitivity(),
                "standard" | "default" => DetectionThresholds::default(),
                other => {
                    return Err(EngineError::InvalidInput(format!(
                        "{} must be high, standard or low (got '{}')",
                        ENV_SENSITIVITY, other
                    )))
                }
            };
        }

        let t = &mut config.thresholds;
        t.ndvi_threshold = parse_env(ENV_NDVI_THRESHOLD)?.unwrap_or(t.ndvi_threshold);
        t.nightlight_threshold =
            parse_env(ENV_NIGHTLIGHT_THRESHOLD)?.unwrap_or(t.nightlight_threshold);
        t.acoustic_confidence_threshold =
            parse_env(ENV_ACOUSTIC_CONFIDENCE)?.unwrap_or(t.acoustic_confidence_threshold);
        t.camera_vehicle_threshold =
            parse_env(ENV_CAMERA_VEHICLE_THRESHOLD)?.unwrap_or(t.camera_vehicle_threshold);
        t.gps_speed_threshold =
            parse_env(ENV_GPS_SPEED_THRESHOLD)?.unwrap_or(t.gps_speed_threshold);

        if let Ok(hours) = env::var(ENV_NIGHT_HOURS) {
            t.night_hours = parse_hours(&hours)?;
        }

        config.utc_offset_minutes =
            parse_env(ENV_UTC_OFFSET_MINUTES)?.unwrap_or(config.utc_offset_minutes);

        if let Ok(calibration) = env::var(ENV_CALIBRATION) {
            let calibration: Calibration = calibration.parse()?;
            config.risk = RiskConfig::for_calibration(calibration);
        }
        if let Ok(cold_start) = env::var(ENV_COLD_START) {
            config.risk.cold_start = cold_start.parse::<ColdStart>()?;
        }

        config.sink_dir = env::var(ENV_SINK_DIR).ok().and_then(|raw| resolve_sink_dir(&raw));

        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values before they reach scoring logic
    pub fn validate(&self) -> EngineResult<()> {
        let t = &self.thresholds;

        if !(t.ndvi_threshold > 0.0 && t.ndvi_threshold <= 1.0) {
            return Err(invalid("ndvi_threshold must be in (0, 1]"));
        }
        if !(t.nightlight_threshold.is_finite() && t.nightlight_threshold >= 0.0) {
            return Err(invalid("nightlight_threshold must be >= 0"));
        }
        if !(0.0..=1.0).contains(&t.acoustic_confidence_threshold) {
            return Err(invalid("acoustic_confidence_threshold must be in [0, 1]"));
        }
        if !(t.gps_speed_threshold.is_finite() && t.gps_speed_threshold > 0.0) {
            return Err(invalid("gps_speed_threshold must be > 0"));
        }
        if t.night_hours.iter().any(|h| *h > 23) {
            return Err(invalid("night_hours must be within 0..=23"));
        }
        if !(0.0..=1.0).contains(&t.change_detection_sensitivity) {
            return Err(invalid("change_detection_sensitivity must be in [0, 1]"));
        }

        let w = &self.windows;
        if w.vegetation_recent == 0
            || w.vegetation_baseline == 0
            || w.nightlight == 0
            || w.acoustic == 0
            || w.camera == 0
            || w.track == 0
        {
            return Err(invalid("window sizes must be > 0"));
        }

        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(invalid("utc_offset_minutes must be within one day"));
        }

        self.risk.validate()
    }
}

fn invalid(msg: &str) -> EngineError {
    EngineError::InvalidInput(msg.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> EngineResult<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EngineError::InvalidInput(format!("{} has invalid value '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

/// "default" → platform data dir, empty → no sink, otherwise a path
fn resolve_sink_dir(raw: &str) -> Option<PathBuf> {
    match raw.trim() {
        "" => None,
        s if s.eq_ignore_ascii_case(SINK_DIR_DEFAULT) => Some(default_sink_dir()),
        s => Some(PathBuf::from(s)),
    }
}

/// Parse "22,23,0,1" into hours
fn parse_hours(raw: &str) -> EngineResult<Vec<u8>> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .map_err(|_| EngineError::InvalidInput(format!("invalid night hour '{}'", s)))
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
