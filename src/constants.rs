//! Application constants for the UST importer
//!
//! This module contains the documented dataset column layout, default
//! values, and exit codes used throughout the importer.

// =============================================================================
// Source Dataset Layout
// =============================================================================

/// Number of columns in the published UST facility dataset
pub const EXPECTED_COLUMN_COUNT: usize = 27;

/// The documented 27-column header of the UST facility CSV, in order.
///
/// The reader validates the input header against this list; rows with a
/// different column count are a structural error, not a per-record drop.
pub const EXPECTED_HEADER: [&str; EXPECTED_COLUMN_COUNT] = [
    "UST Site ID Number",
    "Site Name",
    "Site Address",
    "Site City",
    "Site Zip",
    "Tank No.",
    "Status of Tank",
    "Compartment",
    "Estimated Total Capacity (gallons)",
    "Substance Currently Stored",
    "Last Used Date",
    "Closure Type",
    "Construction Type - Tank",
    "Tank Details",
    "Construction Type - Piping",
    "Piping Details",
    "Installation Date",
    "Spill Protection",
    "Overfill Protection",
    "Tank Latitude",
    "Tank Longitude",
    "Tank Collection Method",
    "Tank Reference Point Type",
    "UST Site Latitude",
    "UST Site Longitude",
    "Site Collection Method",
    "Site Reference Point Type",
];

/// Date format used by the source dataset (e.g. `05/10/2021`)
pub const SOURCE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Status substring marking a tank as still active (matched as a regex)
pub const IN_USE_PATTERN: &str = "In Use";

/// Tag value substituted for empty classification fields so that grouping
/// queries stay well-defined downstream
pub const UNSPECIFIED_TAG: &str = "unspecified";

// =============================================================================
// Target System Defaults
// =============================================================================

/// Measurement name all tank observations are written under
pub const MEASUREMENT: &str = "fuel_tanks";

/// Default InfluxDB bucket
pub const DEFAULT_BUCKET: &str = "usts";

/// Default InfluxDB organization
pub const DEFAULT_ORG: &str = "kodegeek";

/// Maximum number of lines per write request
pub const DEFAULT_BATCH_SIZE: usize = 5_000;

/// Per-batch write timeout in milliseconds
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 600_000;

/// Timestamp precision reported to the write endpoint
pub const WRITE_PRECISION: &str = "s";

/// Start of the deletion window used by `--truncate`
pub const START_OF_TIME: &str = "1970-01-01T00:00:00Z";

/// Environment variable holding the API token
pub const TOKEN_ENV_VAR: &str = "API_TOKEN";

// =============================================================================
// ZIP Centroid Registry
// =============================================================================

/// Default ZIP centroid table shipped with the repository
pub const DEFAULT_ZIP_TABLE: &str = "data/ct_zip_centroids.csv";

/// Expected header of the ZIP centroid table
pub const ZIP_TABLE_HEADER: [&str; 3] = ["zip", "lat", "lng"];

// =============================================================================
// Coordinate Bounds
// =============================================================================

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

// =============================================================================
// Exit Codes
// =============================================================================

/// Distinct process exit codes per failure class
///
/// Usage errors (missing URL or CSV argument) exit with clap's standard
/// code 2, so the classes below start at 3.
pub mod exit_codes {
    /// Unclassified failure
    pub const FAILURE: i32 = 1;
    /// Configuration invalid or unreadable
    pub const CONFIGURATION: i32 = 3;
    /// API token missing from the environment
    pub const MISSING_TOKEN: i32 = 4;
    /// Input CSV missing, unreadable, or malformed
    pub const BAD_INPUT: i32 = 5;
    /// Header staging (temp file) failure
    pub const STAGING: i32 = 6;
    /// ZIP centroid table missing or malformed
    pub const ZIP_TABLE: i32 = 7;
    /// Every record was dropped; nothing to import
    pub const EMPTY_IMPORT: i32 = 8;
    /// Write-time failure (auth, transport, or server rejection)
    pub const WRITE_FAILED: i32 = 9;
    /// Interrupted by the operator
    pub const INTERRUPTED: i32 = 130;
}
