use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;
use ust_importer::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("ust-importer: failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(ust_importer::Error::interrupted(
                    "Import interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - the report has already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            // Distinct exit code per failure class, logged with a program
            // identifier so operators can script around failure classes
            eprintln!("ust-importer: error: {:#}", error);
            process::exit(error.exit_code());
        }
    }
}

/// Show help information when no subcommand is provided
fn show_help_and_commands() {
    println!("UST Importer - Connecticut Underground Storage Tanks to InfluxDB");
    println!("================================================================");
    println!();
    println!("Import the 'Underground Storage Tanks (USTs) - Facility and Tank");
    println!("Details' public CSV dataset into an InfluxDB v2 bucket as line protocol.");
    println!();
    println!("USAGE:");
    println!("    ust-importer <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import      Import a UST facility CSV into InfluxDB (main command)");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Import a downloaded dataset:");
    println!("    API_TOKEN=... ust-importer import http://localhost:8086 tanks.csv");
    println!();
    println!("    # Inspect the encoded output without writing:");
    println!("    ust-importer import http://localhost:8086 tanks.csv --dry-run");
    println!();
    println!("    # Replace a previous import:");
    println!("    API_TOKEN=... ust-importer import http://localhost:8086 tanks.csv --truncate");
    println!();
    println!("For detailed help, use:");
    println!("    ust-importer import --help");
}
