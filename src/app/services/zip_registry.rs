//! ZIP centroid registry for O(1) coordinate lookups
//!
//! Loads the ZIP-to-centroid reference table once at pipeline start and
//! indexes it by ZIP code. The registry is read-only after load and is
//! passed by reference into the coordinate resolver.

use crate::app::models::coordinates_in_range;
use crate::constants::ZIP_TABLE_HEADER;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Immutable ZIP-to-centroid lookup table
///
/// The reference table is a plain CSV with a `zip,lat,lng` header. Rows
/// with unparseable or out-of-range coordinates are skipped with a warning
/// rather than aborting the load; a missing or structurally malformed file
/// is fatal.
#[derive(Debug, Clone)]
pub struct ZipRegistry {
    centroids: HashMap<String, (f64, f64)>,
    source: PathBuf,
}

impl ZipRegistry {
    /// Load the registry from a CSV reference table
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::zip_registry(format!("cannot open '{}': {}", path.display(), e))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| {
            Error::zip_registry(format!("cannot read header of '{}': {}", path.display(), e))
        })?;
        for (position, expected) in ZIP_TABLE_HEADER.iter().enumerate() {
            let found = headers.get(position).unwrap_or("").trim();
            if found != *expected {
                return Err(Error::zip_registry(format!(
                    "unexpected column {} in '{}': expected '{}', found '{}'",
                    position + 1,
                    path.display(),
                    expected,
                    found
                )));
            }
        }

        let mut centroids = HashMap::new();
        let mut skipped = 0usize;

        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                Error::zip_registry(format!("malformed row in '{}': {}", path.display(), e))
            })?;

            let zip = record.get(0).unwrap_or("").trim();
            let lat = record.get(1).unwrap_or("").trim().parse::<f64>();
            let lng = record.get(2).unwrap_or("").trim().parse::<f64>();

            match (lat, lng) {
                (Ok(lat), Ok(lng)) if !zip.is_empty() && coordinates_in_range(lat, lng) => {
                    centroids.insert(zip.to_string(), (lat, lng));
                }
                _ => {
                    warn!(
                        "Skipping ZIP table row {}: unusable entry '{}'",
                        row + 2,
                        zip
                    );
                    skipped += 1;
                }
            }
        }

        info!(
            "Loaded {} ZIP centroids from '{}' ({} skipped)",
            centroids.len(),
            path.display(),
            skipped
        );

        Ok(Self {
            centroids,
            source: path.to_path_buf(),
        })
    }

    /// Build a registry from in-memory entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, (f64, f64))>,
    {
        Self {
            centroids: entries.into_iter().collect(),
            source: PathBuf::new(),
        }
    }

    /// Centroid coordinates for a ZIP code (O(1) lookup)
    pub fn lookup(&self, zip: &str) -> Option<(f64, f64)> {
        let found = self.centroids.get(zip).copied();
        if found.is_none() {
            debug!("ZIP '{}' not found in registry", zip);
        }
        found
    }

    /// Number of ZIP entries loaded
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Path the registry was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn loads_and_looks_up_centroids() {
        let file = write_table("zip,lat,lng\n06426,41.35,-72.39\n06443,41.28,-72.6\n");
        let registry = ZipRegistry::load(file.path()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("06426"), Some((41.35, -72.39)));
        assert_eq!(registry.lookup("99999"), None);
    }

    #[test]
    fn unusable_rows_are_skipped_not_fatal() {
        let file = write_table("zip,lat,lng\n06426,41.35,-72.39\n06443,not-a-number,-72.6\n,41.0,-72.0\n06457,95.0,-72.0\n");
        let registry = ZipRegistry::load(file.path()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("06443"), None);
        assert_eq!(registry.lookup("06457"), None);
    }

    #[test]
    fn wrong_header_is_fatal() {
        let file = write_table("postcode,lat,lng\n06426,41.35,-72.39\n");
        let result = ZipRegistry::load(file.path());
        assert!(matches!(result, Err(Error::ZipRegistry { .. })));
    }

    #[test]
    fn missing_file_is_fatal() {
        let result = ZipRegistry::load(Path::new("/no/such/table.csv"));
        assert!(matches!(result, Err(Error::ZipRegistry { .. })));
    }
}
