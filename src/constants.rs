//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Threshold values mirror the field rules used by the forest department.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Auralite";

/// Directory name under the platform data dir
pub const DATA_DIR_NAME: &str = "auralite";

// ============================================================================
// DETECTION THRESHOLDS
// ============================================================================

/// NDVI below this value = vegetation loss
pub const DEFAULT_NDVI_THRESHOLD: f64 = 0.3;

/// Relative NDVI decline (recent vs baseline) that triggers on its own
pub const NDVI_DECLINE_TRIGGER: f64 = 0.15;

/// Nightlight radiance (nW/cm²/sr) above this = unusual night activity
pub const DEFAULT_NIGHTLIGHT_THRESHOLD: f64 = 15.0;

/// Minimum classifier confidence for an acoustic detection to count
pub const DEFAULT_ACOUSTIC_CONFIDENCE: f64 = 0.75;

/// Vehicles over the camera window above this = convoy
pub const DEFAULT_CAMERA_VEHICLE_THRESHOLD: u32 = 3;

/// GPS speed (km/h) above this = anomalous haulage
pub const DEFAULT_GPS_SPEED_THRESHOLD: f64 = 80.0;

/// Vegetation decline above this is a significant landscape change
pub const DEFAULT_CHANGE_SENSITIVITY: f64 = 0.2;

/// Night mining hours (local time)
pub const DEFAULT_NIGHT_HOURS: [u8; 8] = [22, 23, 0, 1, 2, 3, 4, 5];

// ============================================================================
// WINDOWS
// ============================================================================

pub const DEFAULT_VEGETATION_RECENT: usize = 5;
pub const DEFAULT_VEGETATION_BASELINE: usize = 10;
pub const DEFAULT_NIGHTLIGHT_WINDOW: usize = 3;
pub const DEFAULT_ACOUSTIC_WINDOW: usize = 5;
pub const DEFAULT_CAMERA_WINDOW: usize = 3;
pub const DEFAULT_TRACK_WINDOW: usize = 10;

/// Track sample must be larger than this before checkpoint absence counts
pub const DEFAULT_TRACK_MIN_SAMPLES: usize = 5;

// ============================================================================
// LOCATIONS
// ============================================================================

/// Max distance (km) for a coordinate to resolve to a monitored location
pub const DEFAULT_LOCATE_RADIUS_KM: f64 = 20.0;

/// Vicinity box (degrees) for attaching GPS tracks to a location
pub const TRACK_VICINITY_DEGREES: f64 = 0.5;

/// Mean earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ============================================================================
// ENVIRONMENT VARIABLES
// ============================================================================

pub const ENV_NDVI_THRESHOLD: &str = "AURALITE_NDVI_THRESHOLD";
pub const ENV_NIGHTLIGHT_THRESHOLD: &str = "AURALITE_NIGHTLIGHT_THRESHOLD";
pub const ENV_ACOUSTIC_CONFIDENCE: &str = "AURALITE_ACOUSTIC_CONFIDENCE";
pub const ENV_CAMERA_VEHICLE_THRESHOLD: &str = "AURALITE_CAMERA_VEHICLE_THRESHOLD";
pub const ENV_GPS_SPEED_THRESHOLD: &str = "AURALITE_GPS_SPEED_THRESHOLD";
pub const ENV_NIGHT_HOURS: &str = "AURALITE_NIGHT_HOURS";
pub const ENV_UTC_OFFSET_MINUTES: &str = "AURALITE_UTC_OFFSET_MINUTES";
pub const ENV_CALIBRATION: &str = "AURALITE_CALIBRATION";
pub const ENV_COLD_START: &str = "AURALITE_COLD_START";
pub const ENV_SINK_DIR: &str = "AURALITE_SINK_DIR";

/// `AURALITE_SINK_DIR` value selecting the platform data dir
pub const SINK_DIR_DEFAULT: &str = "default";
pub const ENV_SENSITIVITY: &str = "AURALITE_SENSITIVITY";
