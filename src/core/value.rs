// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoded message value tree.
//!
//! A decoded ROS2 message is a tagged tree: every field holds either a
//! [`Scalar`], a nested [`DecodedMessage`], or a sequence of values. Field
//! order follows the message definition, which is also the column order of
//! the exported CSV.

use std::fmt;

/// Leaf value of a decoded message.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    // Boolean
    Bool(bool),

    // Signed integers
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),

    // Unsigned integers (byte and char decode as UInt8)
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),

    // Floating point
    Float32(f32),
    Float64(f64),

    // String (UTF-8)
    String(String),
}

impl Scalar {
    /// Get the type name of this value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int8(_) => "int8",
            Scalar::Int16(_) => "int16",
            Scalar::Int32(_) => "int32",
            Scalar::Int64(_) => "int64",
            Scalar::UInt8(_) => "uint8",
            Scalar::UInt16(_) => "uint16",
            Scalar::UInt32(_) => "uint32",
            Scalar::UInt64(_) => "uint64",
            Scalar::Float32(_) => "float32",
            Scalar::Float64(_) => "float64",
            Scalar::String(_) => "string",
        }
    }

    /// Try to convert this value to f64 (numeric values only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int8(v) => Some(*v as f64),
            Scalar::Int16(v) => Some(*v as f64),
            Scalar::Int32(v) => Some(*v as f64),
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::UInt8(v) => Some(*v as f64),
            Scalar::UInt16(v) => Some(*v as f64),
            Scalar::UInt32(v) => Some(*v as f64),
            Scalar::UInt64(v) => Some(*v as f64),
            Scalar::Float32(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the inner string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value as it appears in a CSV cell.
///
/// Floats use the shortest representation that round-trips (`1.0`, `0.1`,
/// `1e-7`), so no precision is lost and integral floats stay recognisable.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int8(v) => write!(f, "{v}"),
            Scalar::Int16(v) => write!(f, "{v}"),
            Scalar::Int32(v) => write!(f, "{v}"),
            Scalar::Int64(v) => write!(f, "{v}"),
            Scalar::UInt8(v) => write!(f, "{v}"),
            Scalar::UInt16(v) => write!(f, "{v}"),
            Scalar::UInt32(v) => write!(f, "{v}"),
            Scalar::UInt64(v) => write!(f, "{v}"),
            Scalar::Float32(v) => write!(f, "{v:?}"),
            Scalar::Float64(v) => write!(f, "{v:?}"),
            Scalar::String(v) => f.write_str(v),
        }
    }
}

/// Value held by a message field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Primitive leaf
    Scalar(Scalar),
    /// Nested message
    Struct(DecodedMessage),
    /// Fixed array, bounded or unbounded sequence
    Sequence(Vec<FieldValue>),
}

impl FieldValue {
    /// Try to get the inner scalar.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the inner nested message.
    pub fn as_struct(&self) -> Option<&DecodedMessage> {
        match self {
            FieldValue::Struct(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get the inner sequence.
    pub fn as_sequence(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<DecodedMessage> for FieldValue {
    fn from(value: DecodedMessage) -> Self {
        FieldValue::Struct(value)
    }
}

/// A decoded message: its type name and fields in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedMessage {
    /// Fully qualified type name (e.g. `geometry_msgs/msg/Twist`)
    pub type_name: String,
    /// Fields in declaration order
    pub fields: Vec<(String, FieldValue)>,
}

impl DecodedMessage {
    /// Create an empty message of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Look up a value by dotted path (`pose.pose.position.x`).
    ///
    /// Sequence elements are addressed by numeric segments (`poses.0.pose`).
    pub fn get_path(&self, path: &str) -> Option<&FieldValue> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                FieldValue::Struct(msg) => msg.get(segment)?,
                FieldValue::Sequence(items) => items.get(segment.parse::<usize>().ok()?)?,
                FieldValue::Scalar(_) => return None,
            };
        }
        Some(current)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the message has no fields (e.g. `std_msgs/msg/Empty`).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twist() -> DecodedMessage {
        let vector = |x: f64| {
            DecodedMessage::new("geometry_msgs/msg/Vector3")
                .with("x", Scalar::Float64(x))
                .with("y", Scalar::Float64(0.0))
                .with("z", Scalar::Float64(0.0))
        };
        DecodedMessage::new("geometry_msgs/msg/Twist")
            .with("linear", vector(0.5))
            .with("angular", vector(-0.25))
    }

    #[test]
    fn test_field_order_is_preserved() {
        let msg = twist();
        let names: Vec<&str> = msg.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["linear", "angular"]);
    }

    #[test]
    fn test_get_path() {
        let msg = twist();
        assert_eq!(
            msg.get_path("angular.x").and_then(FieldValue::as_scalar),
            Some(&Scalar::Float64(-0.25))
        );
        assert!(msg.get_path("angular.w").is_none());
        assert!(msg.get_path("linear.x.y").is_none());
    }

    #[test]
    fn test_get_path_through_sequence() {
        let msg = DecodedMessage::new("test/msg/Seq").with(
            "values",
            FieldValue::Sequence(vec![Scalar::Int32(7).into(), Scalar::Int32(9).into()]),
        );
        assert_eq!(
            msg.get_path("values.1").and_then(FieldValue::as_scalar),
            Some(&Scalar::Int32(9))
        );
        assert!(msg.get_path("values.2").is_none());
    }

    #[test]
    fn test_display_floats_round_trip() {
        assert_eq!(Scalar::Float64(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float64(0.1).to_string(), "0.1");
        assert_eq!(Scalar::Float32(0.1).to_string(), "0.1");
        assert_eq!(Scalar::Float64(-2.5).to_string(), "-2.5");
        assert_eq!(Scalar::Float64(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_display_other_scalars() {
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Int8(-3).to_string(), "-3");
        assert_eq!(Scalar::UInt64(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(Scalar::String("base_link".into()).to_string(), "base_link");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Scalar::UInt8(0).type_name(), "uint8");
        assert_eq!(Scalar::Float32(0.0).type_name(), "float32");
        assert_eq!(Scalar::String(String::new()).type_name(), "string");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Scalar::Int32(42).as_f64(), Some(42.0));
        assert_eq!(Scalar::Float32(2.5).as_f64(), Some(2.5));
        assert_eq!(Scalar::Bool(true).as_f64(), None);
        assert_eq!(Scalar::String("x".into()).as_str(), Some("x"));
    }

    #[test]
    fn test_empty_message() {
        let msg = DecodedMessage::new("std_msgs/msg/Empty");
        assert!(msg.is_empty());
        assert_eq!(msg.len(), 0);
    }
}
