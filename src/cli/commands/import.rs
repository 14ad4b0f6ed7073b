//! Import command implementation
//!
//! Orchestrates the complete pipeline: configuration loading, optional
//! header staging, ZIP registry loading, parse/normalize/resolve, temporal
//! sort, line-protocol encoding, and sequential batch submission.

use super::shared::{create_progress_bar, generate_report, load_configuration, setup_logging};
use crate::app::services::csv_reader::{StagedInput, TankCsvReader, count_lines};
use crate::app::services::line_protocol::{batch_lines, encode_line};
use crate::app::services::normalizer::FieldNormalizer;
use crate::app::services::resolver::CoordinateResolver;
use crate::app::services::sorter::sort_by_last_used;
use crate::app::services::write_client::{DryRunSink, HttpLineSink, LineSink};
use crate::app::services::zip_registry::ZipRegistry;
use crate::app::models::ImportStats;
use crate::cli::args::ImportArgs;
use crate::config::ImportConfig;
use crate::constants::TOKEN_ENV_VAR;
use crate::{Error, Result};
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Import command runner
///
/// 1. Set up logging and layered configuration
/// 2. Validate inputs and stage the header if requested
/// 3. Load the ZIP centroid registry
/// 4. Run the pipeline against the selected sink
/// 5. Render the summary report
pub async fn run_import(
    args: &ImportArgs,
    cancellation_token: CancellationToken,
) -> Result<ImportStats> {
    setup_logging(args)?;

    info!("Starting UST importer");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(args)?;
    debug!("Loaded configuration: {:?}", config);

    if !args.csv_path.exists() {
        return Err(Error::input(
            args.csv_path.display().to_string(),
            "file does not exist",
        ));
    }

    // Staging copy lives until the end of the run; its temp file is
    // removed on drop, covering interrupt and error paths.
    let staged = if args.inject_header {
        Some(StagedInput::create(&args.csv_path)?)
    } else {
        None
    };
    let input_path = staged
        .as_ref()
        .map(|staged| staged.path())
        .unwrap_or(args.csv_path.as_path());

    let registry = ZipRegistry::load(&config.zip_table)?;
    if registry.is_empty() {
        warn!(
            "ZIP table '{}' contains no usable entries; records without coordinates will be dropped",
            config.zip_table.display()
        );
    }

    let stats = if args.dry_run {
        info!("Dry run: encoded lines will be printed, nothing written");
        let mut sink = DryRunSink::stdout();
        pipeline(
            &config,
            input_path,
            &registry,
            &mut sink,
            &cancellation_token,
            args.show_progress(),
        )
        .await?
    } else {
        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| Error::missing_token(TOKEN_ENV_VAR))?;

        let mut sink = HttpLineSink::new(&args.url, token, &config)?;
        if args.truncate {
            sink.truncate_measurement().await?;
        }
        pipeline(
            &config,
            input_path,
            &registry,
            &mut sink,
            &cancellation_token,
            args.show_progress(),
        )
        .await?
    };

    generate_report(&stats, args.dry_run);
    Ok(stats)
}

/// Run the batch pipeline against an arbitrary sink
///
/// Separated from [`run_import`] so integration tests can drive the full
/// transformation with an in-memory sink.
pub async fn pipeline<S: LineSink>(
    config: &ImportConfig,
    csv_path: &Path,
    registry: &ZipRegistry,
    sink: &mut S,
    cancellation_token: &CancellationToken,
    show_progress: bool,
) -> Result<ImportStats> {
    let start_time = Instant::now();
    let mut stats = ImportStats::new();

    let total_lines = count_lines(csv_path)?;
    info!("Tank details read: {} lines", total_lines);

    let normalizer = FieldNormalizer::new()?;
    let resolver = CoordinateResolver::new(registry);

    // Parse, normalize, and resolve in one pass
    let parse_bar = show_progress
        .then(|| create_progress_bar(total_lines.saturating_sub(1) as u64, "Parsing..."));

    let mut reader = TankCsvReader::open(csv_path)?;
    let mut observations = Vec::new();

    for result in reader.records() {
        if cancellation_token.is_cancelled() {
            return Err(Error::interrupted("import cancelled during parsing"));
        }

        let record = result?;
        stats.rows_read += 1;

        match normalizer.normalize(&record) {
            Ok(mut observation) => match resolver.resolve(&mut observation) {
                Ok(()) => observations.push(observation),
                Err(reason) => {
                    warn!("Dropping row {}: {}", stats.rows_read, reason);
                    stats.record_drop(&reason);
                }
            },
            Err(reason) => {
                warn!("Dropping row {}: {}", stats.rows_read, reason);
                stats.record_drop(&reason);
            }
        }

        if let Some(bar) = &parse_bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = parse_bar {
        bar.finish_with_message(format!("Parsed {} observations", observations.len()));
    }

    if observations.is_empty() {
        return Err(Error::empty_import(csv_path.display().to_string()));
    }

    // Order by last-used date; the endpoint requires monotonic arrival
    info!("Sorting {} observations by last-used date", observations.len());
    sort_by_last_used(&mut observations);
    stats.observations_parsed = observations.len();

    // Encode and submit batches strictly in sorted order
    let lines: Vec<String> = observations.iter().filter_map(encode_line).collect();
    let batch_count = lines.len().div_ceil(config.batch_size);

    let write_bar = show_progress.then(|| create_progress_bar(batch_count as u64, "Writing..."));

    for (batch_index, batch) in batch_lines(&lines, config.batch_size).enumerate() {
        if cancellation_token.is_cancelled() {
            return Err(Error::interrupted("import cancelled during write"));
        }

        sink.write_batch(batch_index, batch).await?;
        stats.batches_written += 1;
        stats.lines_written += batch.len();

        if let Some(bar) = &write_bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = write_bar {
        bar.finish_with_message(format!(
            "Wrote {} lines in {} batches",
            stats.lines_written, stats.batches_written
        ));
    }

    stats.elapsed = start_time.elapsed();
    Ok(stats)
}
