//! Logic Module - Detection & Risk Engines
//!
//! Chứa các engines xử lý: signal analyzers, severity aggregation,
//! statistical risk scoring và alert lifecycle.
//!
//! ## Structure
//! - `signals/` - Locations, per-modality records, registry
//! - `analyzers/` - Five signal analyzers (vegetation, nightlight, acoustic, camera, GPS)
//! - `severity/` - Findings → Verdict
//! - `risk/` - Isolation forest + rule score
//! - `alerts/` - Alert store
//! - `sink` - Optional JSONL persistence
//! - `engine` - MonitoringEngine facade

pub mod signals;
pub mod analyzers;
pub mod severity;
pub mod risk;
pub mod alerts;
pub mod sink;
pub mod engine;

pub use engine::MonitoringEngine;

/// Round to a fixed number of decimals
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
