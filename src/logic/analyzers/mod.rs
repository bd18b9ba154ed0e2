//! Analyzers Module - Per-modality signal analysis
//!
//! Mỗi analyzer nhận một window record đã sort theo timestamp và trả về
//! đúng một Finding. Analyzers là pure functions - không giữ state.
//!
//! ## Structure
//! - `types`: Modality, AnalysisContext, Finding, FindingDetail
//! - `vegetation`: NDVI decline
//! - `nightlight`: VIIRS radiance
//! - `acoustic`: machinery detections
//! - `visual`: camera vehicle counts
//! - `track`: GPS speed / checkpoint evasion

pub mod types;
pub mod vegetation;
pub mod nightlight;
pub mod acoustic;
pub mod visual;
pub mod track;

pub use types::{AnalysisContext, Finding, FindingDetail, Modality};
pub use vegetation::VegetationAnalyzer;
pub use nightlight::NightlightAnalyzer;
pub use acoustic::AcousticAnalyzer;
pub use visual::VisualAnalyzer;
pub use track::TrackAnalyzer;

use crate::config::EngineConfig;
use crate::logic::signals::SignalWindows;

/// One modality's analysis over an ordered record window
pub trait SignalAnalyzer: Send + Sync {
    type Record;

    fn modality(&self) -> Modality;

    /// Empty window = non-triggering finding with confidence 0
    fn analyze(&self, ctx: &AnalysisContext, window: &[Self::Record]) -> Finding;
}

/// Arithmetic mean, 0 for an empty iterator
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

// ============================================================================
// ANALYZER SET
// ============================================================================

/// The five analyzers, built once from config
#[derive(Debug, Clone)]
pub struct AnalyzerSet {
    pub vegetation: VegetationAnalyzer,
    pub nightlight: NightlightAnalyzer,
    pub acoustic: AcousticAnalyzer,
    pub visual: VisualAnalyzer,
    pub track: TrackAnalyzer,
}

impl AnalyzerSet {
    pub fn from_config(config: &EngineConfig) -> Self {
        let t = &config.thresholds;
        let w = &config.windows;
        Self {
            vegetation: VegetationAnalyzer::new(t, w),
            nightlight: NightlightAnalyzer::new(t, w),
            acoustic: AcousticAnalyzer::new(t, w),
            visual: VisualAnalyzer::new(t, w),
            track: TrackAnalyzer::new(t, w),
        }
    }

    /// All five findings, in fixed modality order
    pub fn run_all(&self, ctx: &AnalysisContext, windows: &SignalWindows) -> Vec<Finding> {
        vec![
            self.vegetation.analyze(ctx, &windows.vegetation),
            self.nightlight.analyze(ctx, &windows.nightlight),
            self.acoustic.analyze(ctx, &windows.acoustic),
            self.visual.analyze(ctx, &windows.camera),
            self.track.analyze(ctx, &windows.tracks),
        ]
    }
}

impl Default for AnalyzerSet {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
