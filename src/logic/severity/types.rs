//! Severity Types
//!
//! Severity + Verdict. KHÔNG chứa logic - chỉ data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::analyzers::{Finding, Modality};

// ============================================================================
// SEVERITY
// ============================================================================

/// Ordinal: Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// High and Critical need field response
    pub fn requires_action(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = crate::error::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            other => Err(crate::error::EngineError::InvalidInput(format!(
                "unknown severity '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// VERDICT
// ============================================================================

/// Aggregated multi-modality conclusion for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub location_id: String,
    /// Triggered findings only, in analyzer order
    pub findings: Vec<Finding>,
    pub alert_count: usize,
    /// Mean of triggered confidences (0 when none)
    pub overall_confidence: f64,
    pub severity: Severity,
    pub requires_action: bool,
    pub recommendation: String,
    pub evaluated_at: DateTime<Utc>,
}

impl Verdict {
    pub fn has_modality(&self, modality: Modality) -> bool {
        self.findings.iter().any(|f| f.modality == modality)
    }

    /// Modalities that triggered, in analyzer order
    pub fn triggered_modalities(&self) -> Vec<Modality> {
        self.findings.iter().map(|f| f.modality).collect()
    }
}
