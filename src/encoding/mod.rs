// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message payload decoding.
//!
//! ROS2 sqlite3 bags store payloads in the `cdr` serialization format; other
//! formats are rejected when a topic is opened.

pub mod cdr;

pub use cdr::CdrDecoder;

/// Serialization format every ROS2 sqlite3 bag uses for its payloads.
pub const CDR_SERIALIZATION_FORMAT: &str = "cdr";
