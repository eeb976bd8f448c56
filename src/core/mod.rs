// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout rosbag2csv.
//!
//! This module provides the foundational types for the library:
//! - [`ExportError`] - Error handling for every export stage
//! - [`FieldValue`] / [`Scalar`] - Decoded message value tree
//! - [`DecodedMessage`] - One decoded message with ordered fields

pub mod error;
pub mod value;

pub use error::{ExportError, Result};
pub use value::{DecodedMessage, FieldValue, Scalar};
