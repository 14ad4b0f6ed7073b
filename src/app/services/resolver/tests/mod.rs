//! Tests for coordinate resolution

use crate::app::models::TankObservation;
use crate::app::services::zip_registry::ZipRegistry;
use chrono::{TimeZone, Utc};

mod resolver_tests;

/// Registry with a handful of Connecticut ZIP centroids
pub fn test_registry() -> ZipRegistry {
    ZipRegistry::from_entries([
        ("06426".to_string(), (41.35, -72.39)),
        ("06443".to_string(), (41.28, -72.6)),
    ])
}

/// Observation with the given coordinates and ZIP
pub fn observation(zip: &str, latitude: Option<f64>, longitude: Option<f64>) -> TankObservation {
    TankObservation {
        site_id: "100".to_string(),
        tank_no: "1".to_string(),
        city: "Essex".to_string(),
        zip: zip.to_string(),
        status: "Permanently Closed".to_string(),
        substance_stored: "Gasoline".to_string(),
        construction_type: "Steel".to_string(),
        closure_type: "Removed".to_string(),
        spill_protection: "unspecified".to_string(),
        overfill_protection: "unspecified".to_string(),
        estimated_total_capacity: 550,
        latitude,
        longitude,
        last_used: Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap(),
    }
}
