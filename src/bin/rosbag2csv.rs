// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # rosbag2csv CLI
//!
//! ## Usage
//!
//! ```sh
//! # Export the default topic table next to the current directory
//! rosbag2csv export /data/7_test/7_test_0.db3
//!
//! # Export chosen topics into a directory
//! rosbag2csv export bag_dir -o csv -t /imu -t /gps/fix=gps.csv
//!
//! # Export using a config file
//! rosbag2csv export -c export.toml
//!
//! # List topics
//! rosbag2csv topics bag_dir
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ExportCmd, TopicsCmd};
use common::{init_logging, Result, Verbosity};
use rosbag2csv::ExportError;

/// rosbag2csv - ROS2 bag to CSV exporter
///
/// Decodes CDR messages from ROS2 sqlite3 bags and writes one CSV per topic,
/// with nested fields flattened into columns.
#[derive(Parser, Clone)]
#[command(name = "rosbag2csv")]
#[command(about = "Export ROS2 sqlite3 bag topics to CSV", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log warnings and errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Export topics to CSV files
    Export(ExportCmd),

    /// List the topics of a bag
    Topics(TopicsCmd),
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Export(cmd) => cmd.run(),
        Commands::Topics(cmd) => cmd.run(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Err(e) = run(cli) {
        if let Some(err) = e.downcast_ref::<ExportError>() {
            let fields = err
                .log_fields()
                .into_iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            tracing::debug!(fields = %fields, "fatal error details");
        }
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
