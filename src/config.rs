//! Configuration management and validation.
//!
//! Provides the import configuration structure with layered loading:
//! built-in defaults, an optional JSON config file, then CLI overrides
//! applied by the command layer.

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_BUCKET, DEFAULT_ORG, DEFAULT_WRITE_TIMEOUT_MS, DEFAULT_ZIP_TABLE,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Import configuration for a single pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// InfluxDB organization name
    pub org: String,

    /// InfluxDB bucket name
    pub bucket: String,

    /// Maximum number of encoded lines per write request
    pub batch_size: usize,

    /// Per-batch write timeout in milliseconds
    pub write_timeout_ms: u64,

    /// Path to the ZIP centroid reference table
    pub zip_table: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            org: DEFAULT_ORG.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
            zip_table: PathBuf::from(DEFAULT_ZIP_TABLE),
        }
    }
}

impl ImportConfig {
    /// Default config file location (`<config dir>/ust-importer/config.json`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))?;
        Ok(config_dir.join("ust-importer").join("config.json"))
    }

    /// Load configuration with layered precedence: defaults, then an
    /// optional JSON config file. CLI overrides are applied by the caller.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = config_file {
            debug!("Loading config file: {}", path.display());
            let contents = fs::read_to_string(path).map_err(|e| {
                Error::configuration(format!(
                    "Cannot read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            config = serde_json::from_str(&contents).map_err(|e| {
                Error::configuration(format!(
                    "Invalid config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }

        Ok(config)
    }

    /// Validate the configuration before the pipeline starts
    pub fn validate(&self) -> Result<()> {
        if self.org.trim().is_empty() {
            return Err(Error::configuration("Organization name must not be empty"));
        }
        if self.bucket.trim().is_empty() {
            return Err(Error::configuration("Bucket name must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(Error::configuration("Batch size must be greater than zero"));
        }
        if self.write_timeout_ms == 0 {
            return Err(Error::configuration(
                "Write timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ImportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket, DEFAULT_BUCKET);
        assert_eq!(config.org, DEFAULT_ORG);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = ImportConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_bucket_is_rejected() {
        let config = ImportConfig {
            bucket: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"org": "ops", "bucket": "tanks", "batch_size": 100}}"#
        )
        .unwrap();

        let config = ImportConfig::load_layered(Some(file.path())).unwrap();
        assert_eq!(config.org, "ops");
        assert_eq!(config.bucket, "tanks");
        assert_eq!(config.batch_size, 100);
        // Unset keys fall back to defaults
        assert_eq!(config.write_timeout_ms, DEFAULT_WRITE_TIMEOUT_MS);
    }

    #[test]
    fn malformed_config_file_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = ImportConfig::load_layered(Some(file.path()));
        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }
}
