//! InfluxDB line-protocol encoding
//!
//! Converts ordered tank observations into the text wire format:
//! `measurement,tag=value,... field=value,... timestamp`. Tag keys and
//! values escape space, comma, and equals with a preceding backslash.
//! The capacity field carries the integer-type suffix; latitude and
//! longitude are floats. Timestamps are epoch seconds, matching the
//! precision reported to the write endpoint.
//!
//! Encoding is deterministic: tags are emitted in a fixed lexicographic
//! order, so an identical observation always yields a byte-identical line.

use crate::app::models::TankObservation;
use crate::constants::MEASUREMENT;
use std::borrow::Cow;
use std::fmt::Write;

/// Escape space, comma, and equals in a tag key or value
pub fn escape_tag(value: &str) -> Cow<'_, str> {
    if !value.contains([',', '=', ' ']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if matches!(c, ',' | '=' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Escape space and comma in a measurement name
fn escape_measurement(name: &str) -> Cow<'_, str> {
    if !name.contains([',', ' ']) {
        return Cow::Borrowed(name);
    }

    let mut escaped = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if matches!(c, ',' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Encode one observation as a line-protocol line
///
/// Returns `None` when coordinates are still unresolved; by pipeline
/// contract every observation reaching the encoder has been resolved, so
/// callers treat `None` as a skipped record, not a panic.
pub fn encode_line(observation: &TankObservation) -> Option<String> {
    let (latitude, longitude) = match (observation.latitude, observation.longitude) {
        (Some(latitude), Some(longitude)) => (latitude, longitude),
        _ => return None,
    };

    let tags = [
        ("city", observation.city.as_str()),
        ("closure_type", observation.closure_type.as_str()),
        ("construction_type", observation.construction_type.as_str()),
        ("overfill_protection", observation.overfill_protection.as_str()),
        ("spill_protection", observation.spill_protection.as_str()),
        ("status", observation.status.as_str()),
        ("substance_stored", observation.substance_stored.as_str()),
    ];

    let mut line = String::with_capacity(192);
    line.push_str(&escape_measurement(MEASUREMENT));
    for (key, value) in tags {
        line.push(',');
        line.push_str(key);
        line.push('=');
        line.push_str(&escape_tag(value));
    }

    // Write! to a String cannot fail
    let _ = write!(
        line,
        " estimated_total_capacity={}i,lat={},lon={} {}",
        observation.estimated_total_capacity,
        latitude,
        longitude,
        observation.last_used.timestamp()
    );

    Some(line)
}

/// Split encoded lines into write batches of at most `batch_size` lines
pub fn batch_lines(lines: &[String], batch_size: usize) -> std::slice::Chunks<'_, String> {
    lines.chunks(batch_size.max(1))
}
