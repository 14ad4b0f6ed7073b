//! Resolution behavior tests

use super::{observation, test_registry};
use crate::app::models::DropReason;
use crate::app::services::resolver::CoordinateResolver;

#[test]
fn valid_coordinates_pass_through_unchanged() {
    let registry = test_registry();
    let resolver = CoordinateResolver::new(&registry);

    let mut obs = observation("06426", Some(41.123_456), Some(-72.987_654));
    resolver.resolve(&mut obs).unwrap();

    assert_eq!(obs.latitude, Some(41.123_456));
    assert_eq!(obs.longitude, Some(-72.987_654));
}

#[test]
fn missing_coordinates_are_filled_from_zip_centroid() {
    let registry = test_registry();
    let resolver = CoordinateResolver::new(&registry);

    let mut obs = observation("06426", None, None);
    resolver.resolve(&mut obs).unwrap();

    assert_eq!(obs.latitude, Some(41.35));
    assert_eq!(obs.longitude, Some(-72.39));
}

#[test]
fn partial_coordinates_fall_back_to_zip_centroid() {
    let registry = test_registry();
    let resolver = CoordinateResolver::new(&registry);

    let mut obs = observation("06443", Some(41.28), None);
    resolver.resolve(&mut obs).unwrap();

    assert_eq!(obs.latitude, Some(41.28));
    assert_eq!(obs.longitude, Some(-72.6));
}

#[test]
fn out_of_range_coordinates_fall_back_to_zip_centroid() {
    let registry = test_registry();
    let resolver = CoordinateResolver::new(&registry);

    let mut obs = observation("06426", Some(410.35), Some(-72.39));
    resolver.resolve(&mut obs).unwrap();

    assert_eq!(obs.latitude, Some(41.35));
    assert_eq!(obs.longitude, Some(-72.39));
}

#[test]
fn unknown_zip_drops_the_record() {
    let registry = test_registry();
    let resolver = CoordinateResolver::new(&registry);

    let mut obs = observation("99999", None, None);
    let result = resolver.resolve(&mut obs);

    assert_eq!(
        result,
        Err(DropReason::UnresolvableLocation {
            zip: "99999".to_string()
        })
    );
    // Never silently zeroed
    assert_eq!(obs.latitude, None);
    assert_eq!(obs.longitude, None);
}

#[test]
fn blank_zip_without_coordinates_drops_the_record() {
    let registry = test_registry();
    let resolver = CoordinateResolver::new(&registry);

    let mut obs = observation("", None, None);
    assert!(matches!(
        resolver.resolve(&mut obs),
        Err(DropReason::UnresolvableLocation { .. })
    ));
}
