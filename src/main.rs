use cargo_lite::cli::Cli;
use cargo_lite::result::Result;
use clap::Parser;
use dirs::config_dir;
use env_logger::Builder;
use log::LevelFilter;
use std::fs::OpenOptions;

/** Main entry point for cargo-lite
 *
 * # Process Flow
 * 1. Initialize logging system with file output
 * 2. Parse command line arguments using Clap
 * 3. Execute the requested command
 * 4. Handle errors and exit with appropriate codes
 *
 * # Error Handling
 * - Logging failures are non-fatal (fallback to creation)
 * - Clap parsing errors are displayed and exit with proper codes
 * - Command execution errors are fatal: they propagate up and the
 *   process exits nonzero
 */
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging before any other operations
    init_logging().await;

    // Parse command line arguments with error handling
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Print clap error message to stderr
            e.print().expect("Failed to print clap error");
            std::process::exit(e.exit_code());
        }
    };

    // Execute the parsed command
    cli.execute().await
}

/** Initializes the logging system with file-based output
 *
 * # Configuration
 * - Log file location: platform-specific config directory
 * - Log level: Info and above
 * - Output: Append mode to preserve historical logs
 * - Fallback: Current directory if config directory unavailable
 */
async fn init_logging() {
    let log_file = get_log_file_path();

    // Ensure log directory exists
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).ok(); // Non-fatal if directory creation fails
    }

    // Configure and initialize the logger
    Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(
            OpenOptions::new()
                .create(true) // Create file if it doesn't exist
                .append(true) // Append to existing logs
                .open(&log_file)
                .unwrap_or_else(|_| {
                    // Fallback: create new file if open fails
                    std::fs::File::create(&log_file).expect("Failed to create log file")
                }),
        )))
        .filter_level(LevelFilter::Info) // Log info level and above
        .init();

    log::info!("cargo-lite started");
}

/** Determines the appropriate log file path based on platform
 *
 * # Returns
 * - Platform-specific config directory path when available
 * - Current working directory as fallback
 * - Direct filename as last resort
 */
fn get_log_file_path() -> std::path::PathBuf {
    if let Some(config_dir) = config_dir() {
        // Use platform-specific config directory
        config_dir.join("cargo-lite").join("cargo-lite.log")
    } else {
        // Fallback to current directory
        std::env::current_dir()
            .map(|p| p.join("cargo-lite.log"))
            .unwrap_or_else(|_| "cargo-lite.log".into())
    }
}
