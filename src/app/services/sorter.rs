//! Temporal ordering of tank observations
//!
//! The ingestion endpoint expects each per-series timestamp stream to
//! arrive in non-decreasing order; violating this degrades write
//! performance and is disallowed by contract. Global order depends on the
//! full set, so the sorter buffers everything before producing output.

use crate::app::models::TankObservation;
use tracing::debug;

/// Sort observations in non-decreasing order of last-used timestamp
///
/// The sort is stable: observations with equal timestamps keep their
/// original read order, which makes batch output deterministic.
pub fn sort_by_last_used(observations: &mut [TankObservation]) {
    observations.sort_by_key(|obs| obs.last_used);
    debug!("Sorted {} observations by last-used date", observations.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn observation(site_id: &str, year: i32) -> TankObservation {
        TankObservation {
            site_id: site_id.to_string(),
            tank_no: "1".to_string(),
            city: "Essex".to_string(),
            zip: "06426".to_string(),
            status: "Permanently Closed".to_string(),
            substance_stored: "Gasoline".to_string(),
            construction_type: "Steel".to_string(),
            closure_type: "Removed".to_string(),
            spill_protection: "unspecified".to_string(),
            overfill_protection: "unspecified".to_string(),
            estimated_total_capacity: 550,
            latitude: Some(41.35),
            longitude: Some(-72.39),
            last_used: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn timestamps_are_non_decreasing_after_sort() {
        let mut observations = vec![
            observation("a", 2015),
            observation("b", 1998),
            observation("c", 2021),
            observation("d", 2003),
        ];

        sort_by_last_used(&mut observations);

        for pair in observations.windows(2) {
            assert!(pair[0].last_used <= pair[1].last_used);
        }
    }

    #[test]
    fn equal_timestamps_preserve_read_order() {
        let mut observations = vec![
            observation("first", 2010),
            observation("second", 2010),
            observation("earlier", 2001),
            observation("third", 2010),
        ];

        sort_by_last_used(&mut observations);

        let order: Vec<&str> = observations.iter().map(|o| o.site_id.as_str()).collect();
        assert_eq!(order, vec!["earlier", "first", "second", "third"]);
    }

    #[test]
    fn empty_and_single_inputs_are_fine() {
        let mut empty: Vec<TankObservation> = Vec::new();
        sort_by_last_used(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![observation("only", 2020)];
        sort_by_last_used(&mut single);
        assert_eq!(single.len(), 1);
    }
}
