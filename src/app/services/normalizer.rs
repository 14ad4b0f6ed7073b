//! Per-record field normalization
//!
//! Pure transformation from a raw CSV row to a [`TankObservation`] with the
//! coordinates possibly still unresolved. Failures here are per-record
//! [`DropReason`]s, never fatal to the batch.
//!
//! Date heuristics follow the source dataset's conventions: a blank
//! last-used date on a tank whose status matches `In Use` means the tank is
//! still active, so the run date stands in for it. A blank date on any
//! other status leaves the record without a usable timestamp.

use crate::app::models::{DropReason, TankObservation};
use crate::app::services::csv_reader::{UstColumn, field};
use crate::constants::{IN_USE_PATTERN, SOURCE_DATE_FORMAT, UNSPECIFIED_TAG};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use csv::StringRecord;
use regex::Regex;

/// Normalizes raw rows into tank observations
///
/// The run date is fixed at construction so that every defaulted timestamp
/// within one run is identical and the output is deterministic for tests.
pub struct FieldNormalizer {
    run_date: DateTime<Utc>,
    in_use: Regex,
}

impl FieldNormalizer {
    /// Create a normalizer stamped with the current time
    pub fn new() -> Result<Self> {
        Self::with_run_date(Utc::now())
    }

    /// Create a normalizer with an explicit run date
    pub fn with_run_date(run_date: DateTime<Utc>) -> Result<Self> {
        let in_use = Regex::new(IN_USE_PATTERN)
            .map_err(|e| Error::configuration(format!("invalid status pattern: {}", e)))?;
        Ok(Self { run_date, in_use })
    }

    /// The timestamp substituted for blank dates on active tanks
    pub fn run_date(&self) -> DateTime<Utc> {
        self.run_date
    }

    /// Normalize one raw row into a tank observation
    ///
    /// Returns a [`DropReason`] when the record has no usable timestamp or
    /// an invalid capacity; the caller logs and counts the drop.
    pub fn normalize(
        &self,
        record: &StringRecord,
    ) -> std::result::Result<TankObservation, DropReason> {
        let status_raw = field(record, UstColumn::Status);
        let last_used = self.parse_last_used(field(record, UstColumn::LastUsedDate), status_raw)?;

        let capacity_raw = field(record, UstColumn::EstimatedTotalCapacity);
        let estimated_total_capacity = capacity_raw
            .parse::<i64>()
            .ok()
            .filter(|capacity| *capacity >= 0)
            .ok_or_else(|| DropReason::InvalidMeasure {
                value: capacity_raw.to_string(),
            })?;

        Ok(TankObservation {
            site_id: field(record, UstColumn::SiteId).to_string(),
            tank_no: field(record, UstColumn::TankNo).to_string(),
            city: title_case(field(record, UstColumn::City)),
            zip: field(record, UstColumn::Zip).to_string(),
            status: canonical_tag(status_raw),
            substance_stored: canonical_tag(field(record, UstColumn::SubstanceStored)),
            construction_type: canonical_tag(field(record, UstColumn::ConstructionTypePiping)),
            closure_type: canonical_tag(field(record, UstColumn::ClosureType)),
            spill_protection: canonical_tag(field(record, UstColumn::SpillProtection)),
            overfill_protection: canonical_tag(field(record, UstColumn::OverfillProtection)),
            estimated_total_capacity,
            latitude: parse_coordinate(field(record, UstColumn::Latitude)),
            longitude: parse_coordinate(field(record, UstColumn::Longitude)),
            last_used,
        })
    }

    fn parse_last_used(
        &self,
        raw: &str,
        status: &str,
    ) -> std::result::Result<DateTime<Utc>, DropReason> {
        if raw.is_empty() {
            if self.in_use.is_match(status) {
                return Ok(self.run_date);
            }
            return Err(DropReason::MissingTimestamp {
                status: status.to_string(),
            });
        }

        // e.g. 05/10/2021 -> 2021-05-10T00:00:00Z
        NaiveDate::parse_from_str(raw, SOURCE_DATE_FORMAT)
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            .map_err(|_| DropReason::MissingTimestamp {
                status: status.to_string(),
            })
    }
}

/// Trim a classification value; empty becomes the "unspecified" tag so
/// grouping queries stay well-defined downstream
fn canonical_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNSPECIFIED_TAG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Fold upper/lower case variations of a city name to title case
fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parse an optional coordinate; range validation happens in the resolver
fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok()
}
