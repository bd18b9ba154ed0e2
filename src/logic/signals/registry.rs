//! Location Registry
//!
//! Read-only reference data for monitored locations, plus proximity helpers.

use std::collections::HashMap;

use serde::Serialize;

use super::types::{Location, TrackRecord};
use crate::constants::EARTH_RADIUS_KM;

/// Result of a proximity lookup
#[derive(Debug, Clone, Serialize)]
pub struct NearestLocation {
    pub location: Location,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
}

impl LocationRegistry {
    pub fn new(locations: Vec<Location>) -> Self {
        let mut registry = Self::default();
        for loc in locations {
            registry.insert(loc);
        }
        registry
    }

    /// Later duplicates replace earlier entries with the same id
    fn insert(&mut self, location: Location) {
        if let Some(&idx) = self.index.get(&location.id) {
            log::warn!("Duplicate location id '{}' - keeping latest", location.id);
            self.locations[idx] = location;
        } else {
            self.index.insert(location.id.clone(), self.locations.len());
            self.locations.push(location);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.index.get(id).map(|&i| &self.locations[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Locations tiered high or critical
    pub fn high_risk(&self) -> Vec<&Location> {
        self.locations.iter().filter(|l| l.is_high_risk()).collect()
    }

    /// Nearest location within `max_km` of a coordinate
    pub fn nearest(&self, latitude: f64, longitude: f64, max_km: f64) -> Option<NearestLocation> {
        self.locations
            .iter()
            .map(|l| (l, haversine_km(latitude, longitude, l.latitude, l.longitude)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .filter(|(_, d)| *d <= max_km)
            .map(|(l, d)| NearestLocation {
                location: l.clone(),
                distance_km: (d * 100.0).round() / 100.0,
            })
    }
}

/// Great-circle distance between two coordinates (km)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// GPS tracks inside a ±`max_degrees` box around a location
pub fn tracks_near(location: &Location, tracks: &[TrackRecord], max_degrees: f64) -> Vec<TrackRecord> {
    tracks
        .iter()
        .filter(|t| {
            (t.latitude - location.latitude).abs() < max_degrees
                && (t.longitude - location.longitude).abs() < max_degrees
        })
        .cloned()
        .collect()
}
