//! Data models for UST import processing
//!
//! This module contains the core data structures for representing tank
//! observations parsed from the Connecticut UST facility dataset, the
//! per-record drop taxonomy, and run statistics.

use crate::constants::{LATITUDE_RANGE, LONGITUDE_RANGE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// Tank Observation
// =============================================================================

/// A single tank observation, the canonical entity of the pipeline
///
/// Created by the normalizer from a raw CSV row, completed by the
/// coordinate resolver, ordered by the sorter, and serialized by the
/// line-protocol encoder. The timestamp is always set after
/// normalization; coordinates may remain unset until resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankObservation {
    /// UST site identifier (not unique across re-imports)
    pub site_id: String,

    /// Tank number within the site
    pub tank_no: String,

    /// Site city, folded to title case
    pub city: String,

    /// Site ZIP code as it appears in the source (used for centroid lookup)
    pub zip: String,

    /// Tank status (e.g. "Currently In Use", "Permanently Closed")
    pub status: String,

    /// Substance currently stored
    pub substance_stored: String,

    /// Piping construction type, as recorded by the source importer
    pub construction_type: String,

    /// Closure type
    pub closure_type: String,

    /// Spill protection classification
    pub spill_protection: String,

    /// Overfill protection classification
    pub overfill_protection: String,

    /// Estimated total capacity in gallons, always >= 0
    pub estimated_total_capacity: i64,

    /// Latitude in WGS84 decimal degrees, unset until resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude in WGS84 decimal degrees, unset until resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Last-used date; defaulted to the run date for active tanks
    pub last_used: DateTime<Utc>,
}

impl TankObservation {
    /// Whether both coordinates are present, finite, and within valid ranges
    pub fn has_valid_coordinates(&self) -> bool {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => coordinates_in_range(lat, lon),
            _ => false,
        }
    }

    /// Fill in coordinates from a ZIP centroid lookup
    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
    }
}

/// Check that a coordinate pair is finite and within valid ranges
pub fn coordinates_in_range(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&latitude)
        && (LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&longitude)
}

// =============================================================================
// Per-Record Drop Taxonomy
// =============================================================================

/// Reason a record was dropped from the batch
///
/// Drops are logged and counted but never abort the run; one bad row must
/// not abort the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Last-used date blank (or unparseable) and the tank is not in use
    MissingTimestamp { status: String },

    /// Capacity negative or non-numeric
    InvalidMeasure { value: String },

    /// No coordinates in the row and the ZIP is absent from the registry
    UnresolvableLocation { zip: String },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTimestamp { status } => {
                write!(f, "MissingTimestampError (status '{}')", status)
            }
            Self::InvalidMeasure { value } => {
                write!(f, "InvalidMeasureError (capacity '{}')", value)
            }
            Self::UnresolvableLocation { zip } => {
                write!(f, "UnresolvableLocation (zip '{}')", zip)
            }
        }
    }
}

// =============================================================================
// Run Statistics
// =============================================================================

/// Statistics accumulated over a single import run
#[derive(Debug, Clone, Default)]
pub struct ImportStats {
    /// Raw CSV rows read (header excluded)
    pub rows_read: usize,

    /// Observations that survived normalization and resolution
    pub observations_parsed: usize,

    /// Records dropped for a missing or unparseable timestamp
    pub dropped_missing_timestamp: usize,

    /// Records dropped for a negative or non-numeric capacity
    pub dropped_invalid_measure: usize,

    /// Records dropped because no location could be resolved
    pub dropped_unresolvable: usize,

    /// Encoded lines handed to the write client
    pub lines_written: usize,

    /// Batches acknowledged by the write client
    pub batches_written: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl ImportStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a dropped record under its reason
    pub fn record_drop(&mut self, reason: &DropReason) {
        match reason {
            DropReason::MissingTimestamp { .. } => self.dropped_missing_timestamp += 1,
            DropReason::InvalidMeasure { .. } => self.dropped_invalid_measure += 1,
            DropReason::UnresolvableLocation { .. } => self.dropped_unresolvable += 1,
        }
    }

    /// Total records dropped across all reasons
    pub fn total_dropped(&self) -> usize {
        self.dropped_missing_timestamp + self.dropped_invalid_measure + self.dropped_unresolvable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn observation() -> TankObservation {
        TankObservation {
            site_id: "12345".to_string(),
            tank_no: "1".to_string(),
            city: "Essex".to_string(),
            zip: "06426".to_string(),
            status: "Currently In Use".to_string(),
            substance_stored: "Gasoline".to_string(),
            construction_type: "Fiberglass".to_string(),
            closure_type: "unspecified".to_string(),
            spill_protection: "Spill Bucket".to_string(),
            overfill_protection: "Ball Float".to_string(),
            estimated_total_capacity: 1000,
            latitude: None,
            longitude: None,
            last_used: Utc.with_ymd_and_hms(2021, 5, 10, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn missing_coordinates_are_not_valid() {
        let obs = observation();
        assert!(!obs.has_valid_coordinates());
    }

    #[test]
    fn in_range_coordinates_are_valid() {
        let mut obs = observation();
        obs.set_coordinates(41.35, -72.39);
        assert!(obs.has_valid_coordinates());
    }

    #[test]
    fn out_of_range_coordinates_are_invalid() {
        let mut obs = observation();
        obs.set_coordinates(91.0, -72.39);
        assert!(!obs.has_valid_coordinates());

        obs.set_coordinates(41.35, -181.0);
        assert!(!obs.has_valid_coordinates());

        obs.set_coordinates(f64::NAN, -72.39);
        assert!(!obs.has_valid_coordinates());
    }

    #[test]
    fn drops_are_counted_per_reason() {
        let mut stats = ImportStats::new();
        stats.record_drop(&DropReason::MissingTimestamp {
            status: "Permanently Closed".to_string(),
        });
        stats.record_drop(&DropReason::InvalidMeasure {
            value: "-5".to_string(),
        });
        stats.record_drop(&DropReason::UnresolvableLocation {
            zip: "99999".to_string(),
        });

        assert_eq!(stats.dropped_missing_timestamp, 1);
        assert_eq!(stats.dropped_invalid_measure, 1);
        assert_eq!(stats.dropped_unresolvable, 1);
        assert_eq!(stats.total_dropped(), 3);
    }
}
