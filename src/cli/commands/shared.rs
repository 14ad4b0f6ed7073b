//! Shared helpers for command implementations
//!
//! Logging setup, layered configuration loading, progress bars, and the
//! end-of-run report.

use crate::app::models::ImportStats;
use crate::cli::args::ImportArgs;
use crate::config::ImportConfig;
use crate::Result;
use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use tracing::info;

/// Set up tracing with an environment-overridable filter
pub fn setup_logging(args: &ImportArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ust_importer={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with uptime timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

/// Load configuration with layered precedence: defaults, optional config
/// file, then CLI overrides
pub fn load_configuration(args: &ImportArgs) -> Result<ImportConfig> {
    info!("Loading configuration");

    let default_config_path = if args.config_file.is_none() {
        ImportConfig::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_ref()
            .filter(|path| path.exists())
            .map(|path| path.as_path()),
    };

    if let Some(path) = config_file {
        info!("Using config file: {}", path.display());
    } else {
        info!("No config file found, using defaults");
    }

    let mut config = ImportConfig::load_layered(config_file)?;

    // Apply CLI argument overrides
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(zip_table) = &args.zip_table {
        config.zip_table = zip_table.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Progress bar with the standard template
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Human-readable end-of-run report
pub fn generate_report(stats: &ImportStats, dry_run: bool) {
    let duration = HumanDuration(stats.elapsed);

    if dry_run {
        println!("\n{}", "DRY RUN - no data was written".yellow().bold());
    }

    println!("\n🎉 UST Import Complete!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Import Summary:");
    println!("   • Rows read: {}", stats.rows_read);
    println!("   • Observations imported: {}", stats.observations_parsed);
    println!("   • Batches written: {}", stats.batches_written);
    println!("   • Lines written: {}", stats.lines_written);
    println!("   • Processing time: {}", duration);

    if stats.total_dropped() > 0 {
        println!("⚠️  Records dropped: {}", stats.total_dropped());
        println!(
            "   • Missing timestamp: {}",
            stats.dropped_missing_timestamp
        );
        println!("   • Invalid capacity: {}", stats.dropped_invalid_measure);
        println!("   • Unresolvable location: {}", stats.dropped_unresolvable);
    }

    println!(
        "\n{} {} records, {} {} records",
        "Imported".green(),
        stats.observations_parsed,
        "ignored".red(),
        stats.total_dropped()
    );
}
