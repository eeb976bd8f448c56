// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR (Common Data Representation) decoding for ROS2 payloads.

pub mod cursor;
pub mod decoder;

#[cfg(test)]
pub(crate) mod test_writer;

pub use cursor::{CdrCursor, CDR_HEADER_SIZE};
pub use decoder::{CdrDecoder, MAX_SEQUENCE_LENGTH};
