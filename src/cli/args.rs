//! Command-line argument definitions for the UST importer
//!
//! Defines the complete CLI interface using the clap derive API. The API
//! token is deliberately not an argument: it is read from the `API_TOKEN`
//! environment variable so it never appears in shell history or process
//! listings.

use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the UST importer
///
/// Imports the Connecticut Underground Storage Tanks facility dataset into
/// an InfluxDB v2 bucket as line protocol.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ust-importer",
    version,
    about = "Import the Connecticut Underground Storage Tanks CSV into InfluxDB",
    long_about = "A batch importer that parses the Connecticut 'Underground Storage Tanks \
                  (USTs) - Facility and Tank Details' public dataset, normalizes each tank \
                  record, resolves missing coordinates from ZIP centroids, and writes the \
                  result to an InfluxDB v2 bucket as line protocol."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import a UST facility CSV into InfluxDB (main command)
    Import(ImportArgs),
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// InfluxDB endpoint URL
    ///
    /// Base URL of the InfluxDB v2 instance, e.g. http://localhost:8086.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Path to the UST facility CSV download
    #[arg(value_name = "CSV_PATH")]
    pub csv_path: PathBuf,

    /// Print encoded lines instead of writing them
    ///
    /// Performs the full transformation but makes no network calls; the
    /// encoded batches are emitted to standard output for inspection.
    #[arg(long = "dry-run", help = "Print encoded line protocol instead of writing")]
    pub dry_run: bool,

    /// Delete previously imported data for the measurement before writing
    ///
    /// Re-imports then replace earlier runs instead of duplicating them.
    #[arg(long = "truncate", help = "Truncate the measurement before writing")]
    pub truncate: bool,

    /// Prepend the canonical header to a headerless download
    ///
    /// A temporary staging copy is created and removed on exit, including
    /// on interrupt.
    #[arg(long = "inject-header", help = "Stage the input with the canonical header prepended")]
    pub inject_header: bool,

    /// Path to the ZIP centroid reference table
    ///
    /// CSV with a zip,lat,lng header. Defaults to the table shipped with
    /// the repository.
    #[arg(long = "zip-table", value_name = "PATH", help = "ZIP centroid table path")]
    pub zip_table: Option<PathBuf>,

    /// Maximum lines per write request
    #[arg(long = "batch-size", value_name = "N", help = "Maximum lines per write request")]
    pub batch_size: Option<usize>,

    /// Path to a JSON configuration file
    ///
    /// Overrides defaults for org, bucket, batch size, write timeout, and
    /// ZIP table location. CLI flags override the file.
    #[arg(long = "config", value_name = "PATH", help = "Path to JSON configuration file")]
    pub config_file: Option<PathBuf>,

    /// Suppress progress bars and reduce logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ImportArgs {
    /// Validate argument combinations before the pipeline starts
    pub fn validate(&self) -> Result<()> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(Error::configuration(format!(
                "Endpoint URL must start with http:// or https://, got '{}'",
                self.url
            )));
        }

        if self.quiet && self.verbose {
            return Err(Error::configuration(
                "--quiet and --verbose are mutually exclusive",
            ));
        }

        if let Some(batch_size) = self.batch_size {
            if batch_size == 0 {
                return Err(Error::configuration("--batch-size must be greater than zero"));
            }
        }

        Ok(())
    }

    /// Log level derived from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Whether progress bars should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import_args(url: &str) -> ImportArgs {
        ImportArgs {
            url: url.to_string(),
            csv_path: PathBuf::from("tanks.csv"),
            dry_run: false,
            truncate: false,
            inject_header: false,
            zip_table: None,
            batch_size: None,
            config_file: None,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn http_and_https_urls_are_accepted() {
        assert!(import_args("http://localhost:8086").validate().is_ok());
        assert!(import_args("https://influx.example.com").validate().is_ok());
    }

    #[test]
    fn non_http_url_is_rejected() {
        assert!(import_args("localhost:8086").validate().is_err());
        assert!(import_args("ftp://localhost").validate().is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let mut args = import_args("http://localhost:8086");
        args.quiet = true;
        args.verbose = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut args = import_args("http://localhost:8086");
        args.batch_size = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn log_level_follows_verbosity() {
        let mut args = import_args("http://localhost:8086");
        assert_eq!(args.get_log_level(), "info");

        args.verbose = true;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "warn");
        assert!(!args.show_progress());
    }
}
