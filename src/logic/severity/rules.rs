//! Severity Rules
//!
//! Ngưỡng đếm finding và recommendation text cho từng severity.
//! KHÔNG chứa logic aggregate - chỉ constants và lookup.

use super::types::Severity;

/// Triggered findings at or above this = High
pub const HIGH_FINDING_COUNT: usize = 3;

/// Triggered findings at or above this = Medium
pub const MEDIUM_FINDING_COUNT: usize = 2;

pub const RECOMMENDATION_CRITICAL: &str =
    "IMMEDIATE ACTION: Deploy forest department and police. Night mining in progress with heavy machinery.";

pub const RECOMMENDATION_HIGH: &str =
    "URGENT: Dispatch inspection team within 24 hours. Evidence of active mining detected.";

pub const RECOMMENDATION_MEDIUM: &str =
    "SCHEDULED: Aerial survey recommended within 48 hours to verify suspicious activity.";

pub const RECOMMENDATION_LOW: &str =
    "ROUTINE: Continue monitoring. No immediate action required.";

/// Response recommendation for a severity
pub fn recommendation(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => RECOMMENDATION_CRITICAL,
        Severity::High => RECOMMENDATION_HIGH,
        Severity::Medium => RECOMMENDATION_MEDIUM,
        Severity::Low => RECOMMENDATION_LOW,
    }
}
