// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! AST types for parsed ROS2 .msg schemas.

use std::collections::HashMap;
use std::fmt;

/// A resolved message schema: the root type plus every type it references.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSchema {
    /// Root type name (e.g., "nav_msgs/msg/Odometry")
    pub name: String,
    /// Package name (e.g., "nav_msgs")
    pub package: Option<String>,
    /// All types defined in this schema (root type + nested types)
    pub types: HashMap<String, MessageType>,
}

/// A message type definition with its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageType {
    /// Fully qualified type name
    pub name: String,
    /// Ordered list of fields
    pub fields: Vec<Field>,
}

/// A field in a message type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub type_name: FieldType,
}

/// Field type: primitive, array, or nested message.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Primitive type
    Primitive(PrimitiveType),
    /// Array or sequence type
    Array {
        /// Element type
        base_type: Box<FieldType>,
        /// Fixed, bounded or unbounded
        size: ArraySize,
    },
    /// Nested message type (fully qualified)
    Nested(String),
}

/// Length kind of an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySize {
    /// `T[N]`: exactly N elements, no length prefix on the wire
    Fixed(usize),
    /// `T[<=N]`: at most N elements, length-prefixed
    Bounded(usize),
    /// `T[]`: any number of elements, length-prefixed
    Unbounded,
}

impl ArraySize {
    /// Whether the wire format carries a `u32` length prefix.
    pub fn is_length_prefixed(self) -> bool {
        !matches!(self, ArraySize::Fixed(_))
    }
}

/// Primitive ROS2 types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Boolean
    Bool,
    /// Octet
    Byte,
    /// Char (uint8 in ROS2)
    Char,
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
    /// String (bounded or unbounded)
    String,
    /// Wide string
    WString,
}

impl PrimitiveType {
    /// Get the size in bytes for this primitive type, if fixed.
    pub fn size(self) -> Option<usize> {
        match self {
            PrimitiveType::Bool
            | PrimitiveType::Byte
            | PrimitiveType::Char
            | PrimitiveType::Int8
            | PrimitiveType::UInt8 => Some(1),
            PrimitiveType::Int16 | PrimitiveType::UInt16 => Some(2),
            PrimitiveType::Int32 | PrimitiveType::UInt32 | PrimitiveType::Float32 => Some(4),
            PrimitiveType::Int64 | PrimitiveType::UInt64 | PrimitiveType::Float64 => Some(8),
            PrimitiveType::String | PrimitiveType::WString => None,
        }
    }

    /// Parse a primitive type from its .msg spelling.
    pub fn try_from_str(s: &str) -> Option<Self> {
        match s {
            "bool" => Some(PrimitiveType::Bool),
            "byte" => Some(PrimitiveType::Byte),
            "char" => Some(PrimitiveType::Char),
            "int8" => Some(PrimitiveType::Int8),
            "int16" => Some(PrimitiveType::Int16),
            "int32" => Some(PrimitiveType::Int32),
            "int64" => Some(PrimitiveType::Int64),
            "uint8" => Some(PrimitiveType::UInt8),
            "uint16" => Some(PrimitiveType::UInt16),
            "uint32" => Some(PrimitiveType::UInt32),
            "uint64" => Some(PrimitiveType::UInt64),
            "float32" => Some(PrimitiveType::Float32),
            "float64" => Some(PrimitiveType::Float64),
            "string" => Some(PrimitiveType::String),
            "wstring" => Some(PrimitiveType::WString),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Int8 => "int8",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::UInt8 => "uint8",
            PrimitiveType::UInt16 => "uint16",
            PrimitiveType::UInt32 => "uint32",
            PrimitiveType::UInt64 => "uint64",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::String => "string",
            PrimitiveType::WString => "wstring",
        };
        f.write_str(name)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Primitive(p) => write!(f, "{p}"),
            FieldType::Nested(name) => f.write_str(name),
            FieldType::Array { base_type, size } => match size {
                ArraySize::Fixed(n) => write!(f, "{base_type}[{n}]"),
                ArraySize::Bounded(n) => write!(f, "{base_type}[<={n}]"),
                ArraySize::Unbounded => write!(f, "{base_type}[]"),
            },
        }
    }
}

impl FieldType {
    /// Names of the nested types this field refers to, if any.
    pub fn nested_type(&self) -> Option<&str> {
        match self {
            FieldType::Nested(name) => Some(name),
            FieldType::Array { base_type, .. } => base_type.nested_type(),
            FieldType::Primitive(_) => None,
        }
    }
}

impl MessageSchema {
    /// Create an empty schema.
    pub fn new(name: String) -> Self {
        Self {
            package: package_of(&name).map(str::to_string),
            name,
            types: HashMap::new(),
        }
    }

    /// Register a type in this schema.
    pub fn add_type(&mut self, msg_type: MessageType) {
        self.types.insert(msg_type.name.clone(), msg_type);
    }

    /// Look up a type by name.
    pub fn get_type(&self, name: &str) -> Option<&MessageType> {
        self.types.get(name)
    }

    /// The root message type.
    pub fn root(&self) -> Option<&MessageType> {
        self.types.get(&self.name)
    }
}

impl MessageType {
    /// Create a new message type.
    pub fn new(name: String) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Add a field to this message type.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }
}

/// Package part of a qualified type name (`nav_msgs/msg/Odometry` -> `nav_msgs`).
pub fn package_of(name: &str) -> Option<&str> {
    let (package, rest) = name.split_once('/')?;
    (!package.is_empty() && !rest.is_empty()).then_some(package)
}

/// Normalize a type reference to the `pkg/msg/Type` form.
///
/// - `pkg/Type` gains the `msg` namespace
/// - `pkg::msg::Type` (IDL spelling) is accepted
/// - a bare `Header` means `std_msgs/msg/Header`
/// - any other bare name belongs to `package`, the package of the
///   definition that mentions it
pub fn qualify_type_name(reference: &str, package: Option<&str>) -> String {
    let reference = reference.trim().replace("::", "/");
    let parts: Vec<&str> = reference.split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [package, namespace, name] => format!("{package}/{namespace}/{name}"),
        [package, name] => format!("{package}/msg/{name}"),
        ["Header"] => "std_msgs/msg/Header".to_string(),
        [name] => match package {
            Some(package) => format!("{package}/msg/{name}"),
            None => (*name).to_string(),
        },
        _ => reference.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_type_from_str() {
        assert_eq!(
            PrimitiveType::try_from_str("int32"),
            Some(PrimitiveType::Int32)
        );
        assert_eq!(
            PrimitiveType::try_from_str("float64"),
            Some(PrimitiveType::Float64)
        );
        assert_eq!(PrimitiveType::try_from_str("time"), None);
        assert_eq!(PrimitiveType::try_from_str("unknown"), None);
    }

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveType::Bool.size(), Some(1));
        assert_eq!(PrimitiveType::UInt16.size(), Some(2));
        assert_eq!(PrimitiveType::Float32.size(), Some(4));
        assert_eq!(PrimitiveType::Int64.size(), Some(8));
        assert_eq!(PrimitiveType::String.size(), None);
    }

    #[test]
    fn test_qualify_type_name() {
        assert_eq!(
            qualify_type_name("geometry_msgs/Pose", None),
            "geometry_msgs/msg/Pose"
        );
        assert_eq!(
            qualify_type_name("geometry_msgs/msg/Pose", None),
            "geometry_msgs/msg/Pose"
        );
        assert_eq!(
            qualify_type_name("geometry_msgs::msg::Pose", None),
            "geometry_msgs/msg/Pose"
        );
        assert_eq!(
            qualify_type_name("NavSatStatus", Some("sensor_msgs")),
            "sensor_msgs/msg/NavSatStatus"
        );
        assert_eq!(
            qualify_type_name("Header", Some("sensor_msgs")),
            "std_msgs/msg/Header"
        );
    }

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("nav_msgs/msg/Odometry"), Some("nav_msgs"));
        assert_eq!(package_of("Odometry"), None);
    }

    #[test]
    fn test_field_type_display() {
        let covariance = FieldType::Array {
            base_type: Box::new(FieldType::Primitive(PrimitiveType::Float64)),
            size: ArraySize::Fixed(36),
        };
        assert_eq!(covariance.to_string(), "float64[36]");

        let poses = FieldType::Array {
            base_type: Box::new(FieldType::Nested(
                "geometry_msgs/msg/PoseStamped".to_string(),
            )),
            size: ArraySize::Unbounded,
        };
        assert_eq!(poses.to_string(), "geometry_msgs/msg/PoseStamped[]");
        assert_eq!(poses.nested_type(), Some("geometry_msgs/msg/PoseStamped"));
    }

    #[test]
    fn test_array_size_prefix() {
        assert!(!ArraySize::Fixed(9).is_length_prefixed());
        assert!(ArraySize::Bounded(3).is_length_prefixed());
        assert!(ArraySize::Unbounded.is_length_prefixed());
    }
}
