// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Topic export driver.
//!
//! For each [`ExportJob`] the [`Exporter`] reads the topic's rows from the
//! bag, decodes every payload against the resolved schema, flattens it and
//! writes the collected table as CSV. Topics run one after another.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bag::Bag;
use crate::core::Result;
use crate::encoding::CdrDecoder;
use crate::flatten::flatten;
use crate::schema::MessageRegistry;
use crate::table::{ExportTable, TimestampFormat};

/// One topic to export and where its CSV goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    /// Exact topic name
    pub topic: String,
    /// Output CSV path
    pub destination: PathBuf,
}

impl ExportJob {
    /// Create a job.
    pub fn new(topic: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            topic: topic.into(),
            destination: destination.into(),
        }
    }
}

/// What to do when a payload fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodeErrorPolicy {
    /// Abort the run
    #[default]
    FailFast,
    /// Log the row, leave it out and continue
    SkipRow,
}

impl fmt::Display for DecodeErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DecodeErrorPolicy::FailFast => "fail-fast",
            DecodeErrorPolicy::SkipRow => "skip-row",
        })
    }
}

impl FromStr for DecodeErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fail-fast" => Ok(DecodeErrorPolicy::FailFast),
            "skip-row" => Ok(DecodeErrorPolicy::SkipRow),
            other => Err(format!(
                "unknown decode error policy '{other}' (expected fail-fast or skip-row)"
            )),
        }
    }
}

/// Result of exporting one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicOutcome {
    /// CSV written
    Exported {
        /// Rows written
        rows: usize,
        /// Rows left out under [`DecodeErrorPolicy::SkipRow`]
        skipped: usize,
    },
    /// Topic absent from the bag; nothing written
    NotFound,
}

impl fmt::Display for TopicOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicOutcome::Exported { rows, skipped: 0 } => write!(f, "{rows} rows"),
            TopicOutcome::Exported { rows, skipped } => {
                write!(f, "{rows} rows, {skipped} skipped")
            }
            TopicOutcome::NotFound => f.write_str("not found"),
        }
    }
}

/// Outcomes of a whole run, in job order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// One entry per job
    pub outcomes: Vec<(ExportJob, TopicOutcome)>,
}

impl ExportReport {
    /// Total rows written over all topics.
    pub fn total_rows(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                TopicOutcome::Exported { rows, .. } => *rows,
                TopicOutcome::NotFound => 0,
            })
            .sum()
    }

    /// Total rows skipped over all topics.
    pub fn total_skipped(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                TopicOutcome::Exported { skipped, .. } => *skipped,
                TopicOutcome::NotFound => 0,
            })
            .sum()
    }

    /// Topics that were not in the bag.
    pub fn missing_topics(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == TopicOutcome::NotFound)
            .map(|(job, _)| job.topic.as_str())
    }
}

/// Observer for export progress. All methods default to no-ops.
pub trait ExportProgress {
    /// A topic's rows were read; `rows` payloads will be decoded.
    fn topic_started(&mut self, _topic: &str, _rows: usize) {}

    /// One row was processed (written or skipped).
    fn row_processed(&mut self) {}

    /// A topic is done.
    fn topic_finished(&mut self, _topic: &str, _outcome: &TopicOutcome) {}
}

/// Progress observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ExportProgress for NoProgress {}

/// Exports topics of one bag.
pub struct Exporter {
    bag: Bag,
    registry: MessageRegistry,
    decoder: CdrDecoder,
    policy: DecodeErrorPolicy,
    timestamp_format: TimestampFormat,
}

impl Exporter {
    /// Create an exporter with the default policy and timestamp format.
    pub fn new(bag: Bag, registry: MessageRegistry) -> Self {
        Self {
            bag,
            registry,
            decoder: CdrDecoder::new(),
            policy: DecodeErrorPolicy::default(),
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Set the decode error policy.
    pub fn with_policy(mut self, policy: DecodeErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set how timestamps are rendered.
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// The bag being exported.
    pub fn bag(&self) -> &Bag {
        &self.bag
    }

    /// Export one topic.
    ///
    /// A topic missing from the bag is logged and reported as
    /// [`TopicOutcome::NotFound`]; no file is created for it. Every other
    /// failure is returned.
    pub fn export_topic(
        &mut self,
        job: &ExportJob,
        progress: &mut dyn ExportProgress,
    ) -> Result<TopicOutcome> {
        info!(
            context = "export",
            topic = %job.topic,
            destination = %job.destination.display(),
            "extracting topic"
        );

        let data = match self.bag.read_topic(&job.topic) {
            Ok(data) => data,
            Err(e) if e.is_topic_not_found() => {
                warn!(context = "export", topic = %job.topic, "topic not found, skipping");
                let outcome = TopicOutcome::NotFound;
                progress.topic_finished(&job.topic, &outcome);
                return Ok(outcome);
            }
            Err(e) => return Err(e),
        };

        let schema = self.registry.resolve(&data.topic.type_name)?;
        progress.topic_started(&job.topic, data.rows.len());

        let mut table = ExportTable::new();
        let mut skipped = 0;
        for (index, row) in data.rows.iter().enumerate() {
            match self.decoder.decode(&schema, &row.payload) {
                Ok(message) => table.push(row.timestamp, flatten(&message)),
                Err(e) if e.is_decode_error() && self.policy == DecodeErrorPolicy::SkipRow => {
                    warn!(
                        context = "export",
                        topic = %job.topic,
                        row = index,
                        timestamp = row.timestamp,
                        error = %e,
                        "skipping undecodable row"
                    );
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
            progress.row_processed();
        }

        table.write_csv(&job.destination, self.timestamp_format)?;

        let outcome = TopicOutcome::Exported {
            rows: table.len(),
            skipped,
        };
        info!(
            context = "export",
            topic = %job.topic,
            rows = table.len(),
            skipped,
            columns = table.columns().len() + 1,
            destination = %job.destination.display(),
            "topic saved"
        );
        progress.topic_finished(&job.topic, &outcome);
        Ok(outcome)
    }

    /// Export every job in order, stopping at the first fatal error.
    pub fn run(
        &mut self,
        jobs: &[ExportJob],
        progress: &mut dyn ExportProgress,
    ) -> Result<ExportReport> {
        let mut report = ExportReport::default();
        for job in jobs {
            let outcome = self.export_topic(job, progress)?;
            report.outcomes.push((job.clone(), outcome));
        }
        Ok(report)
    }
}
