//! cmp-tree - Parallel Directory Tree Comparison
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use cmp_tree::config::{CliArgs, CompareConfig};
use cmp_tree::report::{print_header, print_warnings, write_report};
use cmp_tree::scheduler::TreeComparator;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Every entry matched
const EXIT_MATCH: u8 = 0;
/// At least one mismatch
const EXIT_MISMATCH: u8 = 1;
/// Invalid input, I/O failure, or an interrupted run
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<u8> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = CompareConfig::from_args(args).context("Invalid configuration")?;

    if config.show_header {
        print_header(&config);
    }

    let comparator = TreeComparator::new(config.clone());

    // Setup signal handler for graceful shutdown
    let shutdown_flag = comparator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let result = comparator.run().context("Comparison failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let totals = write_report(&mut out, &result, &config).context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    print_warnings(&result);

    info!(
        files = totals.file_total,
        directories = totals.dir_total,
        mismatches = result.mismatches(),
        "Report written"
    );

    if !result.completed {
        info!("Comparison was interrupted before completion");
        return Ok(EXIT_ERROR);
    }

    Ok(if result.all_match() {
        EXIT_MATCH
    } else {
        EXIT_MISMATCH
    })
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("cmp_tree=debug,warn")
    } else {
        EnvFilter::new("cmp_tree=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(verbose)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
