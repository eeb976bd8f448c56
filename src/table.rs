// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sparse export table and CSV writer.
//!
//! The table holds `(timestamp, FlatRow)` pairs. Its columns are
//! `timestamp` followed by the union of all row keys in first-seen order;
//! a row without a column gets an empty cell.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat};
use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ExportError, Result};
use crate::flatten::FlatRow;

/// Name of the column holding receive timestamps.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// How the `timestamp` column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    /// Integer nanoseconds since the Unix epoch, as stored in the bag
    #[default]
    Nanos,
    /// RFC 3339 UTC with nanosecond precision
    Rfc3339,
}

impl TimestampFormat {
    /// Render one timestamp.
    pub fn render(self, nanos: i64) -> String {
        match self {
            TimestampFormat::Nanos => nanos.to_string(),
            TimestampFormat::Rfc3339 => DateTime::from_timestamp_nanos(nanos)
                .to_rfc3339_opts(SecondsFormat::Nanos, true),
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimestampFormat::Nanos => "nanos",
            TimestampFormat::Rfc3339 => "rfc3339",
        })
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nanos" => Ok(TimestampFormat::Nanos),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            other => Err(format!(
                "unknown timestamp format '{other}' (expected nanos or rfc3339)"
            )),
        }
    }
}

/// Rows of one topic, ready to be written as CSV.
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    rows: Vec<(i64, FlatRow)>,
    columns: Vec<String>,
    seen: HashSet<String>,
}

impl ExportTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push(&mut self, timestamp: i64, row: FlatRow) {
        for key in row.keys() {
            if !self.seen.contains(key) {
                self.seen.insert(key.to_string());
                self.columns.push(key.to_string());
            }
        }
        self.rows.push((timestamp, row));
    }

    /// Flattened columns in first-seen order, without `timestamp`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[(i64, FlatRow)] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table to `path`, replacing any existing file.
    ///
    /// Missing parent directories are created.
    pub fn write_csv(&self, path: &Path, timestamps: TimestampFormat) -> Result<()> {
        if self.seen.contains(TIMESTAMP_COLUMN) {
            return Err(ExportError::ColumnConflict {
                column: TIMESTAMP_COLUMN.to_string(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ExportError::io(format!("create {}", parent.display()), e.to_string())
            })?;
        }

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .from_path(path)?;

        writer.write_record(
            std::iter::once(TIMESTAMP_COLUMN).chain(self.columns.iter().map(String::as_str)),
        )?;

        let mut record = Vec::with_capacity(self.columns.len() + 1);
        for (timestamp, row) in &self.rows {
            record.clear();
            record.push(timestamps.render(*timestamp));
            record.extend(self.columns.iter().map(|column| {
                row.get(column)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            }));
            writer.write_record(&record)?;
        }
        writer.flush()?;

        debug!(
            context = "table",
            path = %path.display(),
            rows = self.rows.len(),
            columns = self.columns.len() + 1,
            "wrote csv"
        );
        Ok(())
    }
}
