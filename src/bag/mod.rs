// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS2 sqlite3 bag reader.
//!
//! [`Bag`] reads topic catalogs and raw message rows from a bag made of one
//! or more `.db3` storage files. Each call opens its own read-only
//! connections and releases them before returning.

pub mod layout;
pub mod storage;

use std::path::Path;

use tracing::{debug, warn};

use crate::core::{ExportError, Result};
use crate::encoding::CDR_SERIALIZATION_FORMAT;
use crate::schema::EmbeddedDefinitions;

pub use layout::{BagLayout, BagMetadata, Compression, METADATA_FILE};
pub use storage::{MessageDefinitionRecord, RawMessageRow, StorageFile, TopicRecord};

/// Definition encoding the `.msg` parser understands.
pub const ROS2MSG_ENCODING: &str = "ros2msg";

/// Catalog entry and rows of one topic.
#[derive(Debug, Clone)]
pub struct TopicData {
    /// The topic as recorded in the first storage file that has it
    pub topic: TopicRecord,
    /// Rows in storage order, split files concatenated in layout order
    pub rows: Vec<RawMessageRow>,
}

/// A topic with its total message count over all storage files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    /// Topic name
    pub name: String,
    /// Message type
    pub type_name: String,
    /// Payload serialization format
    pub serialization_format: String,
    /// Messages over all storage files
    pub message_count: u64,
}

/// A ROS2 sqlite3 bag.
#[derive(Debug, Clone)]
pub struct Bag {
    layout: BagLayout,
}

impl Bag {
    /// Open a bag from a `.db3` file or a bag directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            layout: BagLayout::resolve(path)?,
        })
    }

    /// The resolved on-disk layout.
    pub fn layout(&self) -> &BagLayout {
        &self.layout
    }

    /// Read every row of a topic.
    ///
    /// Fails with [`ExportError::TopicNotFound`] when no storage file lists
    /// the topic.
    pub fn read_topic(&self, name: &str) -> Result<TopicData> {
        let mut found: Option<TopicRecord> = None;
        let mut rows = Vec::new();

        for path in &self.layout.files {
            let storage = StorageFile::open(path)?;
            let Some(record) = storage.find_topic(name)? else {
                continue;
            };

            if let Some(first) = &found {
                if first.type_name != record.type_name {
                    return Err(ExportError::invalid_bag(
                        path.display().to_string(),
                        format!(
                            "topic {name} has type {} here but {} in an earlier file",
                            record.type_name, first.type_name
                        ),
                    ));
                }
            }

            let mut file_rows = storage.messages(record.id)?;
            if self.layout.compression == Compression::ZstdMessage {
                for row in &mut file_rows {
                    row.payload = decompress(&row.payload, path)?;
                }
            }
            rows.append(&mut file_rows);
            found.get_or_insert(record);
        }

        let topic = found.ok_or_else(|| ExportError::topic_not_found(name))?;
        if topic.serialization_format != CDR_SERIALIZATION_FORMAT {
            return Err(ExportError::unsupported(format!(
                "serialization format '{}' on topic {name}",
                topic.serialization_format
            )));
        }

        debug!(
            context = "bag",
            topic = name,
            message_type = %topic.type_name,
            rows = rows.len(),
            "read topic"
        );
        Ok(TopicData { topic, rows })
    }

    /// All topics over all storage files, in first-seen order.
    pub fn topics(&self) -> Result<Vec<TopicSummary>> {
        let mut summaries: Vec<TopicSummary> = Vec::new();

        for path in &self.layout.files {
            let storage = StorageFile::open(path)?;
            for record in storage.topics()? {
                let count = storage.message_count(record.id)?;
                match summaries.iter_mut().find(|s| s.name == record.name) {
                    Some(summary) => summary.message_count += count,
                    None => summaries.push(TopicSummary {
                        name: record.name,
                        type_name: record.type_name,
                        serialization_format: record.serialization_format,
                        message_count: count,
                    }),
                }
            }
        }

        Ok(summaries)
    }

    /// Message definitions recorded in the bag.
    ///
    /// Only `ros2msg` definitions are kept. A definition that fails to parse
    /// is logged and left out so other sources can supply the type.
    pub fn message_definitions(&self) -> Result<EmbeddedDefinitions> {
        let mut definitions = EmbeddedDefinitions::new();

        for path in &self.layout.files {
            let storage = StorageFile::open(path)?;
            for record in storage.message_definitions()? {
                if record.encoding != ROS2MSG_ENCODING
                    || record.encoded_message_definition.trim().is_empty()
                {
                    continue;
                }
                if let Err(e) =
                    definitions.add(&record.topic_type, &record.encoded_message_definition)
                {
                    warn!(
                        context = "bag",
                        message_type = %record.topic_type,
                        error = %e,
                        "ignoring unparsable embedded definition"
                    );
                }
            }
        }

        debug!(
            context = "bag",
            types = definitions.len(),
            "loaded embedded definitions"
        );
        Ok(definitions)
    }
}

fn decompress(data: &[u8], path: &Path) -> Result<Vec<u8>> {
    zstd::stream::decode_all(data).map_err(|e| {
        ExportError::storage(format!("zstd payload in {}", path.display()), e.to_string())
    })
}
