// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Flattening decoded messages into column/value rows.
//!
//! Struct fields become dotted paths (`pose.pose.position.x`) and sequence
//! elements become indexed paths (`pose.covariance[3]`).

use std::collections::HashMap;

use crate::core::{DecodedMessage, FieldValue, Scalar};

/// One flattened message: leaf paths mapped to scalar values.
///
/// Keys keep the order they were first inserted in. Inserting an existing
/// key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    entries: Vec<(String, Scalar)>,
    index: HashMap<String, usize>,
}

impl FlatRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`; the last write for a key wins.
    pub fn insert(&mut self, key: impl Into<String>, value: Scalar) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the row is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for FlatRow {
    fn from_iter<I: IntoIterator<Item = (K, Scalar)>>(iter: I) -> Self {
        let mut row = FlatRow::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

/// Flatten a decoded message depth-first.
pub fn flatten(message: &DecodedMessage) -> FlatRow {
    let mut row = FlatRow::new();
    flatten_struct(message, "", &mut row);
    row
}

fn flatten_struct(message: &DecodedMessage, prefix: &str, row: &mut FlatRow) {
    for (name, value) in &message.fields {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        flatten_value(value, path, row);
    }
}

fn flatten_value(value: &FieldValue, path: String, row: &mut FlatRow) {
    match value {
        FieldValue::Scalar(scalar) => row.insert(path, scalar.clone()),
        FieldValue::Struct(message) => flatten_struct(message, &path, row),
        FieldValue::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_value(item, format!("{path}[{i}]"), row);
            }
        }
    }
}
