// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema parser implementations.

pub mod msg_parser;

pub use msg_parser::parse as parse_msg;

use crate::core::Result;
use crate::schema::MessageSchema;

/// Parse a schema from a string.
///
/// # Arguments
///
/// * `name` - Message type name (`pkg/msg/Type` or `pkg/Type`)
/// * `definition` - .msg definition, optionally with dependency blocks
///
/// # Returns
///
/// Parsed `MessageSchema`
pub fn parse_schema(name: &str, definition: &str) -> Result<MessageSchema> {
    msg_parser::parse(name, definition)
}
