// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

/**
 * Fortress Console
 * Terminal operations console for the Fortress scanning platform
 *
 * @copyright 2025 Fortress Labs
 * @license Proprietary
 */

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use fortress_console::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    // Create async runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("fortress-console")
        .enable_all()
        .build()?;

    runtime.block_on(cli::run(cli))
}
