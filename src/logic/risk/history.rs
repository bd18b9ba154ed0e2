//! Score History
//!
//! Append-only audit trail của RiskScoreRecord theo location.
//! Records are never overwritten; all appends go through one lock.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::types::{RiskClass, RiskScoreRecord};
use crate::logic::round_dp;

/// Dashboard roll-up over each location's latest score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_locations: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub average_score: f64,
    /// 100 - average × 100
    pub health_index: f64,
}

#[derive(Debug, Default)]
pub struct ScoreHistory {
    records: RwLock<HashMap<String, Vec<RiskScoreRecord>>>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: RiskScoreRecord) {
        self.records
            .write()
            .entry(record.location_id.clone())
            .or_default()
            .push(record);
    }

    /// Newest first
    pub fn for_location(&self, location_id: &str, limit: usize) -> Vec<RiskScoreRecord> {
        self.records
            .read()
            .get(location_id)
            .map(|list| list.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn latest(&self, location_id: &str) -> Option<RiskScoreRecord> {
        self.records
            .read()
            .get(location_id)
            .and_then(|list| list.last().cloned())
    }

    /// Total records across locations
    pub fn len(&self) -> usize {
        self.records.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> RiskSummary {
        let guard = self.records.read();
        let latest: Vec<&RiskScoreRecord> = guard.values().filter_map(|l| l.last()).collect();

        let total = latest.len();
        let high = latest.iter().filter(|r| r.classification == RiskClass::High).count();
        let medium = latest.iter().filter(|r| r.classification == RiskClass::Medium).count();
        let average = if total == 0 {
            0.0
        } else {
            latest.iter().map(|r| r.final_score).sum::<f64>() / total as f64
        };

        RiskSummary {
            total_locations: total,
            high_risk_count: high,
            medium_risk_count: medium,
            average_score: round_dp(average, 4),
            health_index: round_dp(100.0 - average * 100.0, 1),
        }
    }
}
