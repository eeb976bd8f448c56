// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for rosbag2csv.
//!
//! One error enum covers every stage of an export:
//! - Bag storage and layout
//! - Schema parsing and type resolution
//! - CDR decoding
//! - CSV output

use std::fmt;

/// Errors that can occur while exporting a bag.
#[derive(Debug, Clone)]
pub enum ExportError {
    /// Topic is not declared in the bag's topic catalog
    TopicNotFound {
        /// Topic name that was looked up
        topic: String,
    },

    /// Message type could not be resolved to a definition
    TypeNotFound {
        /// Fully qualified type name
        type_name: String,
    },

    /// Parse error in a schema definition or a config file
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// The bag path or its metadata is not usable
    InvalidBag {
        /// Bag path as given
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// SQLite storage error
    Storage {
        /// Query or operation that failed
        context: String,
        /// Error message
        message: String,
    },

    /// Buffer too short for requested read
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        cursor_pos: u64,
    },

    /// Sequence or string length exceeded data bounds
    LengthExceeded {
        /// Length that was read
        length: usize,
        /// Position in buffer
        position: usize,
        /// Buffer length
        buffer_len: usize,
    },

    /// Field decode error with context
    FieldDecodeError {
        /// Field path
        field_name: String,
        /// Field type
        field_type: String,
        /// Cursor position when error occurred
        cursor_pos: u64,
        /// Underlying error
        cause: String,
    },

    /// Unsupported type or feature
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// A flattened column collides with the inserted `timestamp` column
    ColumnConflict {
        /// Column name
        column: String,
    },

    /// Filesystem or CSV output error
    Io {
        /// Operation context
        context: String,
        /// Error message
        message: String,
    },

    /// Other error
    Other(String),
}

impl ExportError {
    /// Create a "topic not found" error.
    pub fn topic_not_found(topic: impl Into<String>) -> Self {
        ExportError::TopicNotFound {
            topic: topic.into(),
        }
    }

    /// Create a "type not found" error.
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        ExportError::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an invalid bag error.
    pub fn invalid_bag(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ExportError::InvalidBag {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage error.
    pub fn storage(context: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::Storage {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, cursor_pos: u64) -> Self {
        ExportError::BufferTooShort {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Create a length exceeded error.
    pub fn length_exceeded(length: usize, position: usize, buffer_len: usize) -> Self {
        ExportError::LengthExceeded {
            length,
            position,
            buffer_len,
        }
    }

    /// Create a field decode error.
    pub fn field_decode(
        field_name: impl Into<String>,
        field_type: impl Into<String>,
        cursor_pos: u64,
        cause: impl Into<String>,
    ) -> Self {
        ExportError::FieldDecodeError {
            field_name: field_name.into(),
            field_type: field_type.into(),
            cursor_pos,
            cause: cause.into(),
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        ExportError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::Io {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the topic is absent and can be skipped.
    pub fn is_topic_not_found(&self) -> bool {
        matches!(self, ExportError::TopicNotFound { .. })
    }

    /// Whether this error was raised while decoding a payload.
    ///
    /// These are the errors a `skip-row` policy is allowed to swallow.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ExportError::BufferTooShort { .. }
                | ExportError::LengthExceeded { .. }
                | ExportError::FieldDecodeError { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            ExportError::TopicNotFound { topic } => vec![("topic", topic.clone())],
            ExportError::TypeNotFound { type_name } => vec![("type", type_name.clone())],
            ExportError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            ExportError::InvalidBag { path, reason } => {
                vec![("path", path.clone()), ("reason", reason.clone())]
            }
            ExportError::Storage { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            ExportError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            ExportError::LengthExceeded {
                length,
                position,
                buffer_len,
            } => vec![
                ("length", length.to_string()),
                ("position", position.to_string()),
                ("buffer_len", buffer_len.to_string()),
            ],
            ExportError::FieldDecodeError {
                field_name,
                field_type,
                cursor_pos,
                cause,
            } => vec![
                ("field", field_name.clone()),
                ("type", field_type.clone()),
                ("cursor", cursor_pos.to_string()),
                ("cause", cause.clone()),
            ],
            ExportError::Unsupported { feature } => vec![("feature", feature.clone())],
            ExportError::ColumnConflict { column } => vec![("column", column.clone())],
            ExportError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            ExportError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::TopicNotFound { topic } => write!(f, "Topic {topic} not found"),
            ExportError::TypeNotFound { type_name } => {
                write!(f, "Type not found: '{type_name}'")
            }
            ExportError::ParseError { context, message } => {
                write!(f, "Parse error in {context}: {message}")
            }
            ExportError::InvalidBag { path, reason } => {
                write!(f, "Invalid bag '{path}': {reason}")
            }
            ExportError::Storage { context, message } => {
                write!(f, "Storage error ({context}): {message}")
            }
            ExportError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available"
            ),
            ExportError::LengthExceeded {
                length,
                position,
                buffer_len,
            } => write!(
                f,
                "Length {length} exceeds buffer at position {position} (buffer length: {buffer_len})"
            ),
            ExportError::FieldDecodeError {
                field_name,
                field_type,
                cursor_pos,
                cause,
            } => write!(
                f,
                "Failed to decode field '{field_name}' (type: '{field_type}', cursor_pos: {cursor_pos}): {cause}"
            ),
            ExportError::Unsupported { feature } => {
                write!(f, "Unsupported feature: '{feature}'")
            }
            ExportError::ColumnConflict { column } => write!(
                f,
                "Column '{column}' already exists and cannot be used for the bag timestamp"
            ),
            ExportError::Io { context, message } => write!(f, "I/O error ({context}): {message}"),
            ExportError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::io("filesystem", err.to_string())
    }
}

impl From<rusqlite::Error> for ExportError {
    fn from(err: rusqlite::Error) -> Self {
        ExportError::storage("sqlite", err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::io("csv", err.to_string())
    }
}

/// Result type for rosbag2csv operations.
pub type Result<T> = std::result::Result<T, ExportError>;
