//! UST Importer Library
//!
//! A Rust library for importing the Connecticut "Underground Storage Tanks
//! (USTs) - Facility and Tank Details" public dataset into an InfluxDB v2
//! bucket as line protocol.
//!
//! This library provides tools for:
//! - Parsing the 27-column UST facility CSV with header validation
//! - Normalizing per-tank records (city casing, tag defaults, date heuristics)
//! - Resolving missing coordinates from a ZIP-code centroid registry
//! - Ordering observations by last-used date for monotonic ingestion
//! - Encoding observations as InfluxDB line protocol in bounded batches
//! - Writing batches over HTTP or printing them in dry-run mode
//! - Comprehensive error handling with per-failure-class exit codes

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_reader;
        pub mod line_protocol;
        pub mod normalizer;
        pub mod resolver;
        pub mod sorter;
        pub mod write_client;
        pub mod zip_registry;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{DropReason, ImportStats, TankObservation};
pub use config::ImportConfig;

/// Result type alias for the UST importer
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for UST import operations
///
/// Per-record problems (missing timestamp, bad capacity, unresolvable
/// location) are not errors: they are [`DropReason`]s, logged and counted,
/// and never abort the batch. Everything here is structural and fatal.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input file missing or unreadable
    #[error("Input error for '{path}': {message}")]
    Input { path: String, message: String },

    /// CSV parsing error (bad header or row/column-count mismatch)
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// API token missing from the environment
    #[error("API token not found: set the {var} environment variable")]
    MissingToken { var: String },

    /// ZIP centroid registry error
    #[error("ZIP registry error: {message}")]
    ZipRegistry { message: String },

    /// Header staging failure (temp file creation or copy)
    #[error("Header staging failed: {message}")]
    Staging {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Not a single observation survived normalization and resolution
    #[error("No importable rows in '{path}': every record was dropped")]
    EmptyImport { path: String },

    /// Endpoint rejected the authentication token
    #[error("Authentication rejected while writing {context} (HTTP {status})")]
    Auth { context: String, status: u16 },

    /// Network-level write failure (connect, timeout)
    #[error("Transport error while writing {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Endpoint reported a malformed batch
    #[error("Server rejected {context} (HTTP {status}): {diagnostic}")]
    ServerRejected {
        context: String,
        status: u16,
        diagnostic: String,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an input error with context
    pub fn input(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing-token error
    pub fn missing_token(var: impl Into<String>) -> Self {
        Self::MissingToken { var: var.into() }
    }

    /// Create a ZIP registry error
    pub fn zip_registry(message: impl Into<String>) -> Self {
        Self::ZipRegistry {
            message: message.into(),
        }
    }

    /// Create a header staging error
    pub fn staging(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Staging {
            message: message.into(),
            source,
        }
    }

    /// Create an empty-import error
    pub fn empty_import(path: impl Into<String>) -> Self {
        Self::EmptyImport { path: path.into() }
    }

    /// Create an authentication error
    pub fn auth(context: impl Into<String>, status: u16) -> Self {
        Self::Auth {
            context: context.into(),
            status,
        }
    }

    /// Create a transport error
    pub fn transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            context: context.into(),
            source,
        }
    }

    /// Create a server-rejection error carrying the server's diagnostic
    pub fn server_rejected(
        context: impl Into<String>,
        status: u16,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self::ServerRejected {
            context: context.into(),
            status,
            diagnostic: diagnostic.into(),
        }
    }

    /// Create a processing-interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    /// Process exit code for this failure class
    ///
    /// Each class gets a distinct code so operators can script around
    /// specific failures. Codes are defined in [`crate::constants`].
    pub fn exit_code(&self) -> i32 {
        use crate::constants::exit_codes;
        match self {
            Self::Io { .. } => exit_codes::FAILURE,
            Self::Input { .. } | Self::CsvParsing { .. } => exit_codes::BAD_INPUT,
            Self::Configuration { .. } => exit_codes::CONFIGURATION,
            Self::MissingToken { .. } => exit_codes::MISSING_TOKEN,
            Self::ZipRegistry { .. } => exit_codes::ZIP_TABLE,
            Self::Staging { .. } => exit_codes::STAGING,
            Self::EmptyImport { .. } => exit_codes::EMPTY_IMPORT,
            Self::Auth { .. } | Self::Transport { .. } | Self::ServerRejected { .. } => {
                exit_codes::WRITE_FAILED
            }
            Self::Interrupted { .. } => exit_codes::INTERRUPTED,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport {
            context: "request".to_string(),
            source: error,
        }
    }
}
