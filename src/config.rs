// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Export configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! bag = "/data/7_test/7_test_0.db3"
//! output_dir = "/data/extracted/7_test"
//! on_decode_error = "skip-row"
//! timestamp_format = "rfc3339"
//! msg_paths = ["/opt/ros/humble"]
//!
//! [[topics]]
//! name = "/odometry"
//! output = "odometry.csv"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{ExportError, Result};
use crate::export::{DecodeErrorPolicy, ExportJob};
use crate::table::TimestampFormat;

/// Topics exported when none are configured, with their file names.
pub const DEFAULT_TOPICS: &[(&str, &str)] = &[
    ("/odometry", "odometry.csv"),
    ("/gps/fix", "gps_fix.csv"),
    ("/gps/navpvt", "gps_navpvt.csv"),
    ("/odometry/global", "odometry_global.csv"),
    ("/odometry/gps", "odometry_gps.csv"),
    ("/odometry/local", "odometry_local.csv"),
    ("/plan", "planned_path.csv"),
    ("/imu", "imu.csv"),
    ("/imu/calib_status", "imu_calib.csv"),
    ("/cmd_vel", "cmd_vel.csv"),
];

/// One configured topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicConfig {
    /// Exact topic name
    pub name: String,
    /// Output file; relative paths resolve against `output_dir`.
    /// Derived from the topic name when omitted.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl TopicConfig {
    /// Create a topic entry.
    pub fn new(name: impl Into<String>, output: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            output,
        }
    }

    /// Parse a command line entry of the form `TOPIC` or `TOPIC=FILE`.
    pub fn from_spec(spec: &str) -> Result<Self> {
        let (name, output) = match spec.split_once('=') {
            Some((name, output)) => (name.trim(), Some(PathBuf::from(output.trim()))),
            None => (spec.trim(), None),
        };
        if name.is_empty() {
            return Err(ExportError::parse(
                "topic argument",
                format!("'{spec}' has no topic name"),
            ));
        }
        if output.as_ref().is_some_and(|o| o.as_os_str().is_empty()) {
            return Err(ExportError::parse(
                "topic argument",
                format!("'{spec}' has an empty file name"),
            ));
        }
        Ok(Self::new(name, output))
    }

    /// Output path, before resolving against the output directory.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_file_name(&self.name)))
    }
}

/// Complete export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// `.db3` file or bag directory
    pub bag: Option<PathBuf>,
    /// Base directory for relative outputs
    pub output_dir: PathBuf,
    /// Decode failure handling
    pub on_decode_error: DecodeErrorPolicy,
    /// Timestamp column rendering
    pub timestamp_format: TimestampFormat,
    /// Extra roots searched for `.msg` files
    pub msg_paths: Vec<PathBuf>,
    /// Topics to export; the default topic table when empty
    pub topics: Vec<TopicConfig>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            bag: None,
            output_dir: PathBuf::from("."),
            on_decode_error: DecodeErrorPolicy::default(),
            timestamp_format: TimestampFormat::default(),
            msg_paths: Vec::new(),
            topics: Vec::new(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ExportError::io(format!("read {}", path.display()), e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ExportError::parse("config", e.to_string()))
    }

    /// Configured topics, or the default topic table when none are set.
    pub fn effective_topics(&self) -> Vec<TopicConfig> {
        if self.topics.is_empty() {
            default_topics()
        } else {
            self.topics.clone()
        }
    }

    /// Export jobs with destinations resolved against `output_dir`.
    pub fn jobs(&self) -> Vec<ExportJob> {
        self.effective_topics()
            .into_iter()
            .map(|topic| {
                let destination = self.output_dir.join(topic.output_path());
                ExportJob::new(topic.name, destination)
            })
            .collect()
    }
}

/// The default topic table.
pub fn default_topics() -> Vec<TopicConfig> {
    DEFAULT_TOPICS
        .iter()
        .map(|(name, file)| TopicConfig::new(*name, Some(PathBuf::from(file))))
        .collect()
}

/// File name derived from a topic: leading slash dropped, other slashes
/// replaced by underscores, `.csv` appended (`/gps/fix` -> `gps_fix.csv`).
pub fn default_file_name(topic: &str) -> String {
    let stem = topic.trim_start_matches('/').replace('/', "_");
    if stem.is_empty() {
        "topic.csv".to_string()
    } else {
        format!("{stem}.csv")
    }
}
