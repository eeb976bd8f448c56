// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Topics command - list the topic catalog of a bag.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use crate::common::Result;
use rosbag2csv::Bag;

/// List topics with their types and message counts.
#[derive(Args, Clone, Debug)]
pub struct TopicsCmd {
    /// Bag file (.db3) or bag directory
    #[arg(value_name = "BAG")]
    bag: PathBuf,
}

impl TopicsCmd {
    pub fn run(self) -> Result<()> {
        let bag = Bag::open(&self.bag)
            .with_context(|| format!("failed to open bag {}", self.bag.display()))?;
        let topics = bag.topics().context("failed to read topic catalog")?;

        let layout = bag.layout();
        println!(
            "=== {} ({} storage file{}) ===",
            self.bag.display(),
            layout.files.len(),
            if layout.files.len() == 1 { "" } else { "s" }
        );

        if topics.is_empty() {
            println!("No topics");
            return Ok(());
        }

        let width = topics.iter().map(|t| t.name.len()).max().unwrap_or(0);
        for topic in &topics {
            println!(
                "{:<width$}  {}  [{}]  {} messages",
                topic.name, topic.type_name, topic.serialization_format, topic.message_count
            );
        }
        let total: u64 = topics.iter().map(|t| t.message_count).sum();
        println!("{} topics, {} messages", topics.len(), total);

        Ok(())
    }
}
