// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bag location and layout.
//!
//! A bag is either a single `.db3` file or a directory holding one or more
//! `.db3` files. When the directory carries a rosbag2 `metadata.yaml`, the
//! file list, storage plugin and compression settings come from it;
//! otherwise every `*.db3` in the directory is read in name order.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::{ExportError, Result};

/// File name of the rosbag2 metadata document.
pub const METADATA_FILE: &str = "metadata.yaml";

/// Storage plugin this crate can read.
pub const SQLITE3_STORAGE: &str = "sqlite3";

/// Top level of `metadata.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataDocument {
    /// The bag description
    pub rosbag2_bagfile_information: BagMetadata,
}

/// Fields of `rosbag2_bagfile_information` used for reading.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BagMetadata {
    /// Metadata format version
    pub version: u32,
    /// Storage plugin (`sqlite3`, `mcap`)
    pub storage_identifier: String,
    /// Storage files relative to the bag directory, in recording order
    pub relative_file_paths: Vec<String>,
    /// Total message count over all topics
    pub message_count: u64,
    /// Compression format (`zstd` or empty)
    pub compression_format: String,
    /// Compression mode (`FILE`, `MESSAGE` or empty)
    pub compression_mode: String,
}

impl BagMetadata {
    /// Parse the contents of a `metadata.yaml` file.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let document: MetadataDocument = serde_yaml::from_str(text)
            .map_err(|e| ExportError::parse(METADATA_FILE, e.to_string()))?;
        Ok(document.rosbag2_bagfile_information)
    }

    /// Load `metadata.yaml` from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ExportError::io(format!("read {}", path.display()), e.to_string()))?;
        Self::from_yaml(&text)
    }

    /// Payload compression declared by the metadata.
    pub fn compression(&self) -> Result<Compression> {
        let format = self.compression_format.trim();
        let mode = self.compression_mode.trim();
        if format.is_empty() || mode.is_empty() || mode.eq_ignore_ascii_case("none") {
            return Ok(Compression::None);
        }

        if !format.eq_ignore_ascii_case("zstd") {
            return Err(ExportError::unsupported(format!(
                "compression format '{format}'"
            )));
        }
        if mode.eq_ignore_ascii_case("message") {
            Ok(Compression::ZstdMessage)
        } else {
            Err(ExportError::unsupported(format!(
                "compression mode '{mode}'"
            )))
        }
    }
}

/// How message payloads are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Payloads are raw CDR
    #[default]
    None,
    /// Every payload is an individual zstd frame
    ZstdMessage,
}

/// Resolved on-disk layout of a bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagLayout {
    /// Path the bag was opened from
    pub root: PathBuf,
    /// Storage files, read in this order
    pub files: Vec<PathBuf>,
    /// Payload compression
    pub compression: Compression,
}

impl BagLayout {
    /// Work out which storage files make up the bag at `path`.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bag_display = path.display().to_string();

        if path.is_file() {
            return Self::from_file(path);
        }
        if !path.is_dir() {
            return Err(ExportError::invalid_bag(bag_display, "no such file or directory"));
        }

        let metadata_path = path.join(METADATA_FILE);
        let layout = if metadata_path.is_file() {
            Self::from_metadata(path, &BagMetadata::load(&metadata_path)?)?
        } else {
            Self::from_directory(path)?
        };

        if layout.files.is_empty() {
            return Err(ExportError::invalid_bag(bag_display, "no .db3 storage files"));
        }
        for file in &layout.files {
            if !file.is_file() {
                return Err(ExportError::invalid_bag(
                    bag_display,
                    format!("missing storage file {}", file.display()),
                ));
            }
        }

        debug!(
            context = "bag_layout",
            bag = %bag_display,
            files = layout.files.len(),
            compression = ?layout.compression,
            "resolved bag layout"
        );
        Ok(layout)
    }

    /// A single storage file. Compression comes from a `metadata.yaml` next
    /// to it, if there is one.
    fn from_file(path: &Path) -> Result<Self> {
        let sibling = path
            .parent()
            .map(|dir| dir.join(METADATA_FILE))
            .filter(|metadata| metadata.is_file());
        let compression = match sibling {
            Some(metadata_path) => BagMetadata::load(&metadata_path)?.compression()?,
            None => Compression::None,
        };

        Ok(Self {
            root: path.to_path_buf(),
            files: vec![path.to_path_buf()],
            compression,
        })
    }

    fn from_metadata(dir: &Path, metadata: &BagMetadata) -> Result<Self> {
        if !metadata.storage_identifier.is_empty()
            && metadata.storage_identifier != SQLITE3_STORAGE
        {
            return Err(ExportError::unsupported(format!(
                "storage plugin '{}'",
                metadata.storage_identifier
            )));
        }

        Ok(Self {
            root: dir.to_path_buf(),
            files: metadata
                .relative_file_paths
                .iter()
                .map(|relative| dir.join(relative))
                .collect(),
            compression: metadata.compression()?,
        })
    }

    fn from_directory(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "db3") {
                files.push(path);
            }
        }
        files.sort();

        Ok(Self {
            root: dir.to_path_buf(),
            files,
            compression: Compression::None,
        })
    }

    /// Whether the bag is split over several storage files.
    pub fn is_split(&self) -> bool {
        self.files.len() > 1
    }
}
