// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::IsTerminal as _;

use rosbag2csv::{ExportProgress, TopicOutcome};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    fn filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
pub fn init_logging(verbosity: Verbosity) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| verbosity.filter().to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}

/// Per-topic progress bar, drawn only when stderr is a terminal.
pub struct ProgressBar {
    enabled: bool,
    inner: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a progress reporter; `enabled = false` never draws.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: enabled && std::io::stderr().is_terminal(),
            inner: None,
        }
    }

    fn style() -> indicatif::ProgressStyle {
        indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl ExportProgress for ProgressBar {
    fn topic_started(&mut self, topic: &str, rows: usize) {
        if !self.enabled {
            return;
        }
        let pb = indicatif::ProgressBar::new(rows as u64);
        pb.set_style(Self::style());
        pb.set_prefix(topic.to_string());
        self.inner = Some(pb);
    }

    fn row_processed(&mut self) {
        if let Some(pb) = &self.inner {
            pb.inc(1);
        }
    }

    fn topic_finished(&mut self, _topic: &str, outcome: &TopicOutcome) {
        if let Some(pb) = self.inner.take() {
            pb.finish_with_message(outcome.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::Quiet.filter(), "warn");
        assert_eq!(Verbosity::Verbose.filter(), "debug");
    }

    #[test]
    fn test_disabled_progress_is_silent() {
        let mut progress = ProgressBar::new(false);
        progress.topic_started("/imu", 3);
        progress.row_processed();
        progress.topic_finished("/imu", &TopicOutcome::NotFound);
        assert!(progress.inner.is_none());
    }
}
