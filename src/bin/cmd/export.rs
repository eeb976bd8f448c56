// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Export command - write configured topics to CSV.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use tracing::info;

use crate::common::{ProgressBar, Result};
use rosbag2csv::{
    Bag, DecodeErrorPolicy, ExportConfig, Exporter, MessageRegistry, MsgSearchPath,
    TimestampFormat, TopicConfig, TopicOutcome,
};

/// Export topics to CSV files.
#[derive(Args, Clone, Debug)]
pub struct ExportCmd {
    /// Bag file (.db3) or bag directory; overrides `bag` in the config
    #[arg(value_name = "BAG")]
    bag: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory relative output paths resolve against
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Topic to export, optionally with its output file (repeatable)
    #[arg(short = 't', long = "topic", value_name = "TOPIC[=FILE]")]
    topics: Vec<String>,

    /// What to do with rows that fail to decode
    #[arg(long, value_name = "fail-fast|skip-row")]
    on_decode_error: Option<DecodeErrorPolicy>,

    /// Timestamp column format
    #[arg(long, value_name = "nanos|rfc3339")]
    timestamp_format: Option<TimestampFormat>,

    /// Extra root searched for .msg files (repeatable)
    #[arg(long = "msg-path", value_name = "DIR")]
    msg_paths: Vec<PathBuf>,

    /// Never draw progress bars
    #[arg(long)]
    no_progress: bool,
}

impl ExportCmd {
    pub fn run(self) -> Result<()> {
        let no_progress = self.no_progress;
        let config = self.into_config()?;

        let bag_path = config
            .bag
            .clone()
            .context("no bag given: pass BAG or set `bag` in the config file")?;
        let bag = Bag::open(&bag_path)
            .with_context(|| format!("failed to open bag {}", bag_path.display()))?;

        let embedded = bag
            .message_definitions()
            .context("failed to read message definitions")?;
        let search_path = MsgSearchPath::new(config.msg_paths.clone()).with_ament_prefix_path();
        let registry = MessageRegistry::new(embedded, search_path);

        let mut exporter = Exporter::new(bag, registry)
            .with_policy(config.on_decode_error)
            .with_timestamp_format(config.timestamp_format);
        let mut progress = ProgressBar::new(!no_progress);

        let jobs = config.jobs();
        info!(
            bag = %bag_path.display(),
            topics = jobs.len(),
            policy = %config.on_decode_error,
            "starting export"
        );

        for job in &jobs {
            let outcome = exporter
                .export_topic(job, &mut progress)
                .with_context(|| format!("failed to export topic {}", job.topic))?;
            match outcome {
                TopicOutcome::NotFound => println!("{}: not found", job.topic),
                TopicOutcome::Exported { .. } => {
                    println!("{}: {} -> {}", job.topic, outcome, job.destination.display())
                }
            }
        }

        Ok(())
    }

    /// Merge the config file (if any) with command line overrides.
    fn into_config(self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ExportConfig::default(),
        };

        if let Some(bag) = self.bag {
            config.bag = Some(bag);
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if !self.topics.is_empty() {
            config.topics = self
                .topics
                .iter()
                .map(|spec| TopicConfig::from_spec(spec))
                .collect::<rosbag2csv::Result<Vec<_>>>()?;
        }
        if let Some(policy) = self.on_decode_error {
            config.on_decode_error = policy;
        }
        if let Some(format) = self.timestamp_format {
            config.timestamp_format = format;
        }
        config.msg_paths.extend(self.msg_paths);

        Ok(config)
    }
}
