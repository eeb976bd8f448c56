// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Read-only access to one rosbag2 sqlite3 storage file.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use crate::core::{ExportError, Result};

/// A row of the `topics` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
    /// Row id, referenced by `messages.topic_id`
    pub id: i64,
    /// Topic name (e.g., "/odometry")
    pub name: String,
    /// Message type (e.g., "nav_msgs/msg/Odometry")
    pub type_name: String,
    /// Payload serialization format (always "cdr" for ROS2)
    pub serialization_format: String,
}

/// A row of the `messages` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessageRow {
    /// Receive time in nanoseconds since the Unix epoch
    pub timestamp: i64,
    /// Serialized payload
    pub payload: Vec<u8>,
}

/// A row of the `message_definitions` table (rosbag2 Jazzy and later).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinitionRecord {
    /// Message type the definition describes
    pub topic_type: String,
    /// Definition encoding (`ros2msg`, `ros2idl`)
    pub encoding: String,
    /// Definition text, dependencies concatenated
    pub encoded_message_definition: String,
}

/// An open storage file.
///
/// The connection is opened read-only and closed when the value is dropped.
pub struct StorageFile {
    path: PathBuf,
    conn: Connection,
}

impl StorageFile {
    /// Open a `.db3` file read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| ExportError::storage(format!("open {}", path.display()), e.to_string()))?;

        debug!(context = "storage", path = %path.display(), "opened storage file");
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All topics in the catalog, ordered by id.
    pub fn topics(&self) -> Result<Vec<TopicRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, type, serialization_format FROM topics ORDER BY id")?;
        let rows = stmt.query_map([], topic_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Look up a topic by exact name.
    pub fn find_topic(&self, name: &str) -> Result<Option<TopicRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name, type, serialization_format FROM topics WHERE name = ?1",
                params![name],
                topic_from_row,
            )
            .optional()?;
        debug!(
            context = "storage",
            topic = name,
            found = record.is_some(),
            "topic lookup"
        );
        Ok(record)
    }

    /// All messages of a topic, in storage order.
    pub fn messages(&self, topic_id: i64) -> Result<Vec<RawMessageRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT timestamp, data FROM messages WHERE topic_id = ?1")?;
        let rows = stmt.query_map(params![topic_id], |row| {
            Ok(RawMessageRow {
                timestamp: row.get(0)?,
                payload: row.get(1)?,
            })
        })?;
        let rows = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(
            context = "storage",
            topic_id,
            rows = rows.len(),
            path = %self.path.display(),
            "fetched messages"
        );
        Ok(rows)
    }

    /// Number of messages recorded for a topic.
    pub fn message_count(&self, topic_id: i64) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE topic_id = ?1",
            params![topic_id],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Embedded message definitions, empty when the table does not exist.
    pub fn message_definitions(&self) -> Result<Vec<MessageDefinitionRecord>> {
        if !self.has_table("message_definitions")? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "SELECT topic_type, encoding, encoded_message_definition FROM message_definitions",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(MessageDefinitionRecord {
                topic_type: row.get(0)?,
                encoding: row.get(1)?,
                encoded_message_definition: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn has_table(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn topic_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TopicRecord> {
    Ok(TopicRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        type_name: row.get(2)?,
        serialization_format: row.get(3)?,
    })
}
