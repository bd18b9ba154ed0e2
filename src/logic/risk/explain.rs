//! Feature Contribution
//!
//! Indicator nào đóng góp nhiều nhất vào deviation so với mức "normal".

use super::rules::{ACOUSTIC_NORMAL_OFFSET, NDVI_NORMAL_OFFSET, NIGHTLIGHT_NORMAL_OFFSET};
use super::types::{FeatureContributions, IndicatorSnapshot};
use crate::logic::round_dp;

const EQUAL_SHARE: f64 = 0.33;

pub fn contributions(snapshot: &IndicatorSnapshot) -> FeatureContributions {
    let ndvi = (snapshot.ndvi_drop - NDVI_NORMAL_OFFSET).max(0.0);
    let night = (snapshot.nightlight_inc - NIGHTLIGHT_NORMAL_OFFSET).max(0.0);
    let acoustic = (snapshot.acoustic_score - ACOUSTIC_NORMAL_OFFSET).max(0.0);
    let total = ndvi + night + acoustic;

    // NaN-safe: total > 0 is false for NaN too
    if total > 0.0 {
        FeatureContributions {
            ndvi_decline: round_dp(ndvi / total, 2),
            nightlight_increase: round_dp(night / total, 2),
            acoustic_anomaly: round_dp(acoustic / total, 2),
        }
    } else {
        FeatureContributions {
            ndvi_decline: EQUAL_SHARE,
            nightlight_increase: EQUAL_SHARE,
            acoustic_anomaly: EQUAL_SHARE,
        }
    }
}

impl FeatureContributions {
    /// Name of the largest contributor
    pub fn dominant(&self) -> &'static str {
        let items = [
            ("ndvi_decline", self.ndvi_decline),
            ("nightlight_increase", self.nightlight_increase),
            ("acoustic_anomaly", self.acoustic_anomaly),
        ];
        items
            .iter()
            .fold(items[0], |best, cur| if cur.1 > best.1 { *cur } else { best })
            .0
    }
}
