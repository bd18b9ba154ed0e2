use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::severity::Severity;

/// Where an alert came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSource {
    /// Created from a HIGH/CRITICAL verdict
    Detection,
    /// Injected drill / demo event
    Simulated,
    /// Created directly by an operator
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub title: String,
    pub location_id: String,
    pub location_name: String,
    pub severity: Severity,
    pub message: String,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub source: AlertSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_type: Option<String>,
}

impl Alert {
    pub fn is_active(&self) -> bool {
        !self.acknowledged
    }
}

/// Input for `AlertManager::create`
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub location_id: String,
    pub location_name: Option<String>,
    pub confidence: f64,
    pub source: AlertSource,
    pub detection_type: Option<String>,
}

impl AlertDraft {
    pub fn new(title: &str, message: &str, severity: Severity, location_id: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            severity,
            location_id: location_id.to_string(),
            location_name: None,
            confidence: 0.0,
            source: AlertSource::Manual,
            detection_type: None,
        }
    }

    pub fn with_location_name(mut self, name: &str) -> Self {
        self.location_name = Some(name.to_string());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_source(mut self, source: AlertSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_detection_type(mut self, detection_type: &str) -> Self {
        self.detection_type = Some(detection_type.to_string());
        self
    }
}
