//! Signals Module
//!
//! Reference data (locations) and the typed per-modality records the
//! analyzers consume.
//!
//! ## Structure
//! - `types`: Location, signal records, SignalWindows
//! - `registry`: LocationRegistry, haversine, GPS vicinity filter

pub mod types;
pub mod registry;

pub use types::{
    AcousticRecord, CameraRecord, Location, MiningActivity, NightlightRecord, RiskTier,
    SignalWindows, TrackRecord, VegetationRecord,
};

pub use registry::{haversine_km, tracks_near, LocationRegistry, NearestLocation};
