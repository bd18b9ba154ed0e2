//! Auralite Core - multi-signal illegal mining risk engine
//!
//! Satellite, acoustic, camera và GPS signals → per-location Verdict,
//! statistical risk score và alert lifecycle.
//!
//! ## Structure
//! - `constants` - Defaults, env-var names
//! - `config` - EngineConfig (thresholds, windows, risk strategy)
//! - `error` - EngineError / EngineResult
//! - `logic` - Analyzers, aggregator, risk engine, alerts, facade

pub mod constants;
pub mod config;
pub mod error;
pub mod logic;

pub use config::{DetectionThresholds, EngineConfig, WindowSizes};
pub use error::{EngineError, EngineResult};
pub use logic::alerts::{Alert, AlertDraft, AlertManager, AlertSource};
pub use logic::analyzers::{Finding, Modality};
pub use logic::risk::{
    Calibration, ColdStart, IndicatorSnapshot, RiskClass, RiskEngine, RiskScoreRecord, RiskSummary,
};
pub use logic::severity::{Severity, Verdict};
pub use logic::signals::{Location, LocationRegistry, SignalWindows};
pub use logic::sink::{JsonlSink, RecordSink};
pub use logic::MonitoringEngine;
