// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # rosbag2csv
//!
//! Export topics of ROS2 sqlite3 bags to CSV.
//!
//! Each topic's CDR payloads are decoded against its message definition,
//! flattened into `parent.child` / `parent[i]` columns and written as one CSV
//! file with a leading `timestamp` column.
//!
//! ## Architecture
//!
//! - `bag/` - Bag layout (`.db3`, split bags, `metadata.yaml`) and sqlite access
//! - `schema/` - `.msg` parsing and message type resolution
//! - `encoding/` - CDR decoding into [`DecodedMessage`] trees
//! - `flatten` - Message trees to [`FlatRow`]s
//! - `table` - Sparse tables and the CSV writer
//! - `export` - The per-topic export driver
//! - `config` - TOML configuration and the default topic table
//!
//! ## Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use rosbag2csv::{Bag, ExportJob, Exporter, MessageRegistry, MsgSearchPath, NoProgress};
//!
//! let bag = Bag::open("/data/7_test/7_test_0.db3")?;
//! let registry = MessageRegistry::new(
//!     bag.message_definitions()?,
//!     MsgSearchPath::default().with_ament_prefix_path(),
//! );
//! let mut exporter = Exporter::new(bag, registry);
//! let report = exporter.run(&[ExportJob::new("/odometry", "odometry.csv")], &mut NoProgress)?;
//! println!("{} rows", report.total_rows());
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{DecodedMessage, ExportError, FieldValue, Result, Scalar};

// Bag access
pub mod bag;

pub use bag::{Bag, BagLayout, RawMessageRow, TopicData, TopicRecord, TopicSummary};

// Message definitions
pub mod schema;

pub use schema::{EmbeddedDefinitions, MessageRegistry, MessageSchema, MsgSearchPath};

// Payload decoding
pub mod encoding;

pub use encoding::CdrDecoder;

// Flattening and output
pub mod flatten;
pub mod table;

pub use flatten::{flatten, FlatRow};
pub use table::{ExportTable, TimestampFormat};

// Export driver and configuration
pub mod config;
pub mod export;

pub use config::{ExportConfig, TopicConfig};
pub use export::{
    DecodeErrorPolicy, ExportJob, ExportProgress, ExportReport, Exporter, NoProgress,
    TopicOutcome,
};
