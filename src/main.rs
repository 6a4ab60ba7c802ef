// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
// Suppress clippy warnings about unknown/renamed dylint lint names
#![allow(unknown_lints, renamed_and_removed_lints, max_lines_per_file)]
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

use bubble_vote::app::{self, Args};
use bubble_vote::config::load_config;
use bubble_vote::logging::{self, init_logging, parse_rotation, LogConfig, LOG_FILENAME};
use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;

#[allow(unknown_lints, max_lines_per_function)]
#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    // Configure and initialize logging
    let defaults = LogConfig::default();
    let log_dir = args.log_dir.unwrap_or(defaults.log_dir);

    let log_file = log_dir.join(LOG_FILENAME);
    logging::set_log_file_path(log_file.to_string_lossy().to_string());

    let log_config = LogConfig {
        log_dir,
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        // Client commands draw on stdout; keep their logs in the file.
        stdout: args.command.is_server(),
        ..defaults
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!();
        eprintln!("Note: Logging could not be set up.");
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    let config = load_config(args.config.as_deref())?;
    info!(version = env!("CARGO_PKG_VERSION"), "bubble-vote starting");

    app::run(args.command, config).await
}
