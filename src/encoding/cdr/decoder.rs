// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR (Common Data Representation) decoder implementation.
//!
//! Decodes ROS2 CDR payloads by walking a resolved [`MessageSchema`].

use crate::core::{DecodedMessage, ExportError, FieldValue, Result, Scalar};
use crate::schema::{ArraySize, FieldType, MessageSchema, MessageType, PrimitiveType};

use super::cursor::CdrCursor;

/// Maximum allowed sequence or string length.
pub const MAX_SEQUENCE_LENGTH: usize = 10_000_000;

/// Schema-driven decoder for ROS2 CDR payloads.
///
/// Nested structs add no padding of their own; every primitive aligns to its
/// own size relative to the end of the encapsulation header.
#[derive(Debug, Default, Clone, Copy)]
pub struct CdrDecoder;

impl CdrDecoder {
    /// Create a new CDR decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode one payload (including its 4-byte header) as the schema's
    /// root type.
    ///
    /// Trailing bytes after the last field are ignored.
    pub fn decode(&self, schema: &MessageSchema, data: &[u8]) -> Result<DecodedMessage> {
        let mut cursor = CdrCursor::new(data)?;
        self.decode_struct(&mut cursor, schema, &schema.name, "")
    }

    fn decode_struct(
        &self,
        cursor: &mut CdrCursor,
        schema: &MessageSchema,
        type_name: &str,
        path: &str,
    ) -> Result<DecodedMessage> {
        let msg_type = lookup(schema, type_name)?;
        let mut message = DecodedMessage::new(msg_type.name.clone());

        if msg_type.fields.is_empty() {
            // Empty structs serialize a single placeholder byte. Only a root
            // message may omit it.
            if !path.is_empty() || cursor.remaining() > 0 {
                cursor.skip(1)?;
            }
            return Ok(message);
        }

        for field in &msg_type.fields {
            let field_path = join_path(path, &field.name);
            let value = self.decode_field(cursor, schema, &field.type_name, &field_path)?;
            message.push(field.name.clone(), value);
        }

        Ok(message)
    }

    fn decode_field(
        &self,
        cursor: &mut CdrCursor,
        schema: &MessageSchema,
        field_type: &FieldType,
        path: &str,
    ) -> Result<FieldValue> {
        match field_type {
            FieldType::Primitive(prim) => self
                .read_primitive(cursor, *prim)
                .map(FieldValue::Scalar)
                .map_err(|e| field_error(e, path, field_type, cursor)),
            FieldType::Nested(type_name) => self
                .decode_struct(cursor, schema, type_name, path)
                .map(FieldValue::Struct),
            FieldType::Array { base_type, size } => {
                let count = match size {
                    ArraySize::Fixed(n) => *n,
                    ArraySize::Bounded(_) | ArraySize::Unbounded => cursor
                        .read_u32()
                        .map_err(|e| field_error(e, path, field_type, cursor))?
                        as usize,
                };
                check_length(cursor, count, min_wire_size(schema, base_type))?;

                let mut elements = Vec::with_capacity(count);
                for index in 0..count {
                    let element_path = format!("{path}[{index}]");
                    elements.push(self.decode_field(cursor, schema, base_type, &element_path)?);
                }
                Ok(FieldValue::Sequence(elements))
            }
        }
    }

    /// Read a primitive value.
    fn read_primitive(&self, cursor: &mut CdrCursor, prim: PrimitiveType) -> Result<Scalar> {
        Ok(match prim {
            PrimitiveType::Bool => Scalar::Bool(cursor.read_u8()? != 0),
            PrimitiveType::Byte | PrimitiveType::Char | PrimitiveType::UInt8 => {
                Scalar::UInt8(cursor.read_u8()?)
            }
            PrimitiveType::Int8 => Scalar::Int8(cursor.read_i8()?),
            PrimitiveType::Int16 => Scalar::Int16(cursor.read_i16()?),
            PrimitiveType::Int32 => Scalar::Int32(cursor.read_i32()?),
            PrimitiveType::Int64 => Scalar::Int64(cursor.read_i64()?),
            PrimitiveType::UInt16 => Scalar::UInt16(cursor.read_u16()?),
            PrimitiveType::UInt32 => Scalar::UInt32(cursor.read_u32()?),
            PrimitiveType::UInt64 => Scalar::UInt64(cursor.read_u64()?),
            PrimitiveType::Float32 => Scalar::Float32(cursor.read_f32()?),
            PrimitiveType::Float64 => Scalar::Float64(cursor.read_f64()?),
            PrimitiveType::String => Scalar::String(self.read_string(cursor)?),
            PrimitiveType::WString => return Err(ExportError::unsupported("wstring fields")),
        })
    }

    /// Read a string: u32 length including the NUL terminator, bytes, NUL.
    fn read_string(&self, cursor: &mut CdrCursor) -> Result<String> {
        let len = cursor.read_u32()? as usize;
        check_length(cursor, len, 1)?;

        if len <= 1 {
            cursor.skip(len)?;
            return Ok(String::new());
        }

        let bytes = cursor.read_bytes(len - 1)?;
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExportError::parse("string utf8", format!("{e}")))?
            .to_string();
        cursor.skip(1)?;

        Ok(text)
    }
}

fn lookup<'s>(schema: &'s MessageSchema, type_name: &str) -> Result<&'s MessageType> {
    schema
        .get_type(type_name)
        .ok_or_else(|| ExportError::type_not_found(type_name))
}

fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}

/// Wrap a low-level read failure with the field it happened in.
fn field_error(
    err: ExportError,
    path: &str,
    field_type: &FieldType,
    cursor: &CdrCursor,
) -> ExportError {
    match err {
        ExportError::BufferTooShort { .. } | ExportError::ParseError { .. } => {
            ExportError::field_decode(
                path,
                field_type.to_string(),
                cursor.position() as u64,
                err.to_string(),
            )
        }
        other => other,
    }
}

/// Reject a length prefix that cannot fit in what is left of the payload.
fn check_length(cursor: &CdrCursor, count: usize, min_element_size: usize) -> Result<()> {
    let needed = count.saturating_mul(min_element_size);
    if count > MAX_SEQUENCE_LENGTH || needed > cursor.remaining() {
        return Err(ExportError::length_exceeded(
            count,
            cursor.position(),
            cursor.len(),
        ));
    }
    Ok(())
}

/// Smallest number of bytes one value of `field_type` can occupy.
fn min_wire_size(schema: &MessageSchema, field_type: &FieldType) -> usize {
    match field_type {
        FieldType::Primitive(PrimitiveType::String | PrimitiveType::WString) => 4,
        FieldType::Primitive(prim) => prim.size().unwrap_or(1),
        FieldType::Array { base_type, size } => match size {
            ArraySize::Fixed(n) => n.saturating_mul(min_wire_size(schema, base_type)),
            _ => 4,
        },
        // An empty struct still carries its placeholder byte
        FieldType::Nested(name) => schema
            .get_type(name)
            .map(|t| {
                t.fields
                    .iter()
                    .map(|f| min_wire_size(schema, &f.type_name))
                    .sum::<usize>()
                    .max(1)
            })
            .unwrap_or(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::cdr::test_writer::CdrWriter;
    use crate::schema::{EmbeddedDefinitions, MessageRegistry};

    fn resolve(type_name: &str) -> MessageSchema {
        MessageRegistry::builtin().resolve(type_name).unwrap()
    }

    fn float(message: &DecodedMessage, path: &str) -> f64 {
        message
            .get_path(path)
            .and_then(FieldValue::as_scalar)
            .and_then(Scalar::as_f64)
            .unwrap_or_else(|| panic!("no numeric value at {path}"))
    }

    #[test]
    fn test_decode_twist() {
        let schema = resolve("geometry_msgs/msg/Twist");
        let mut w = CdrWriter::new();
        for v in [1.0, 2.0, 3.0, 0.1, 0.2, 0.3] {
            w.f64(v);
        }

        let message = CdrDecoder::new().decode(&schema, &w.finish()).unwrap();
        assert_eq!(message.type_name, "geometry_msgs/msg/Twist");
        assert_eq!(float(&message, "linear.x"), 1.0);
        assert_eq!(float(&message, "linear.z"), 3.0);
        assert_eq!(float(&message, "angular.y"), 0.2);
    }

    #[test]
    fn test_decode_odometry() {
        let schema = resolve("nav_msgs/msg/Odometry");
        let mut w = CdrWriter::new();
        w.header(100, 500, "odom").string("base_link");
        // pose.pose: position, orientation
        for v in [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0] {
            w.f64(v);
        }
        for i in 0..36 {
            w.f64(i as f64);
        }
        // twist.twist: linear, angular
        for v in [0.5, 0.0, 0.0, 0.0, 0.0, 0.25] {
            w.f64(v);
        }
        for _ in 0..36 {
            w.f64(0.0);
        }

        let message = CdrDecoder::new().decode(&schema, &w.finish()).unwrap();

        let frame = message.get_path("header.frame_id").and_then(FieldValue::as_scalar);
        assert_eq!(frame, Some(&Scalar::String("odom".to_string())));
        let stamp = message.get_path("header.stamp.sec").and_then(FieldValue::as_scalar);
        assert_eq!(stamp, Some(&Scalar::Int32(100)));
        assert_eq!(
            message.get_path("child_frame_id").and_then(FieldValue::as_scalar),
            Some(&Scalar::String("base_link".to_string()))
        );
        assert_eq!(float(&message, "pose.pose.position.y"), 2.0);
        assert_eq!(float(&message, "pose.pose.orientation.w"), 1.0);
        assert_eq!(float(&message, "pose.covariance.35"), 35.0);
        assert_eq!(float(&message, "twist.twist.angular.z"), 0.25);

        let covariance = message
            .get_path("pose.covariance")
            .and_then(FieldValue::as_sequence)
            .unwrap();
        assert_eq!(covariance.len(), 36);
    }

    #[test]
    fn test_decode_nav_sat_fix() {
        let schema = resolve("sensor_msgs/msg/NavSatFix");
        let mut w = CdrWriter::new();
        w.header(1, 2, "gps")
            .i8(0)
            .u16(1)
            .f64(48.1)
            .f64(11.5)
            .f64(520.25);
        for i in 0..9 {
            w.f64(i as f64 * 0.5);
        }
        w.u8(2);

        let message = CdrDecoder::new().decode(&schema, &w.finish()).unwrap();
        assert_eq!(
            message.get_path("status.status").and_then(FieldValue::as_scalar),
            Some(&Scalar::Int8(0))
        );
        assert_eq!(
            message.get_path("status.service").and_then(FieldValue::as_scalar),
            Some(&Scalar::UInt16(1))
        );
        assert_eq!(float(&message, "latitude"), 48.1);
        assert_eq!(float(&message, "altitude"), 520.25);
        assert_eq!(float(&message, "position_covariance.8"), 4.0);
        assert_eq!(
            message
                .get_path("position_covariance_type")
                .and_then(FieldValue::as_scalar),
            Some(&Scalar::UInt8(2))
        );
    }

    #[test]
    fn test_decode_path_sequence_of_structs() {
        let schema = resolve("nav_msgs/msg/Path");
        let mut w = CdrWriter::new();
        w.header(5, 0, "map").u32(2);
        for i in 0..2 {
            w.header(5, i, "map");
            for v in [i as f64, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0] {
                w.f64(v);
            }
        }

        let message = CdrDecoder::new().decode(&schema, &w.finish()).unwrap();
        let poses = message
            .get_path("poses")
            .and_then(FieldValue::as_sequence)
            .unwrap();
        assert_eq!(poses.len(), 2);
        assert_eq!(float(&message, "poses.1.pose.position.x"), 1.0);
        assert_eq!(float(&message, "poses.1.header.stamp.nanosec"), 1.0);
    }

    #[test]
    fn test_decode_empty_sequence() {
        let schema = resolve("nav_msgs/msg/Path");
        let mut w = CdrWriter::new();
        w.header(0, 0, "").u32(0);

        let message = CdrDecoder::new().decode(&schema, &w.finish()).unwrap();
        let poses = message
            .get_path("poses")
            .and_then(FieldValue::as_sequence)
            .unwrap();
        assert!(poses.is_empty());
        assert_eq!(
            message.get_path("header.frame_id").and_then(FieldValue::as_scalar),
            Some(&Scalar::String(String::new()))
        );
    }

    #[test]
    fn test_decode_float32_keeps_precision() {
        let schema = resolve("std_msgs/msg/Float32");
        let mut w = CdrWriter::new();
        w.f32(0.1);

        let message = CdrDecoder::new().decode(&schema, &w.finish()).unwrap();
        let value = message.get("data").and_then(FieldValue::as_scalar).unwrap();
        assert_eq!(value, &Scalar::Float32(0.1));
        assert_eq!(value.to_string(), "0.1");
    }

    #[test]
    fn test_decode_big_endian() {
        let schema = resolve("std_msgs/msg/Int32");
        let mut data = vec![0x00, 0x00, 0x00, 0x00];
        data.extend_from_slice(&(-7i32).to_be_bytes());

        let message = CdrDecoder::new().decode(&schema, &data).unwrap();
        assert_eq!(
            message.get("data").and_then(FieldValue::as_scalar),
            Some(&Scalar::Int32(-7))
        );
    }

    #[test]
    fn test_decode_empty_message() {
        let schema = resolve("std_msgs/msg/Empty");
        let message = CdrDecoder::new()
            .decode(&schema, &[0x00, 0x01, 0x00, 0x00, 0x00])
            .unwrap();
        assert!(message.is_empty());
    }

    #[test]
    fn test_trailing_padding_is_ignored() {
        let schema = resolve("std_msgs/msg/Bool");
        let data = [0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        let message = CdrDecoder::new().decode(&schema, &data).unwrap();
        assert_eq!(
            message.get("data").and_then(FieldValue::as_scalar),
            Some(&Scalar::Bool(true))
        );
    }

    #[test]
    fn test_truncated_payload_names_field() {
        let schema = resolve("geometry_msgs/msg/Twist");
        let mut w = CdrWriter::new();
        w.f64(1.0).f64(2.0);

        let err = CdrDecoder::new().decode(&schema, &w.finish()).unwrap_err();
        assert!(err.is_decode_error());
        match err {
            ExportError::FieldDecodeError {
                field_name,
                field_type,
                ..
            } => {
                assert_eq!(field_name, "linear.z");
                assert_eq!(field_type, "float64");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sequence_length_exceeding_buffer() {
        let schema = resolve("nav_msgs/msg/Path");
        let mut w = CdrWriter::new();
        w.header(0, 0, "map").u32(1_000_000);

        let err = CdrDecoder::new().decode(&schema, &w.finish()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::LengthExceeded {
                length: 1_000_000,
                ..
            }
        ));
    }

    #[test]
    fn test_string_length_exceeding_buffer() {
        let schema = resolve("std_msgs/msg/String");
        let mut w = CdrWriter::new();
        w.u32(64).u8(b'a');

        let err = CdrDecoder::new().decode(&schema, &w.finish()).unwrap_err();
        assert!(matches!(err, ExportError::LengthExceeded { length: 64, .. }));
    }

    #[test]
    fn test_invalid_utf8_string() {
        let schema = resolve("std_msgs/msg/String");
        let mut w = CdrWriter::new();
        w.u32(3).u8(0xC3).u8(0x28).u8(0);

        let err = CdrDecoder::new().decode(&schema, &w.finish()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::FieldDecodeError { ref field_name, .. } if field_name == "data"
        ));
    }

    #[test]
    fn test_wstring_unsupported() {
        let schema =
            crate::schema::parse_schema("test_msgs/msg/Wide", "wstring text\n").unwrap();
        let mut w = CdrWriter::new();
        w.u32(0);

        let err = CdrDecoder::new().decode(&schema, &w.finish()).unwrap_err();
        assert!(matches!(err, ExportError::Unsupported { .. }));
    }

    #[test]
    fn test_missing_header() {
        let schema = resolve("std_msgs/msg/Bool");
        let err = CdrDecoder::new().decode(&schema, &[0x00]).unwrap_err();
        assert!(err.is_decode_error());
    }

    fn resolve_with(type_name: &str, definition: &str) -> MessageSchema {
        let mut embedded = EmbeddedDefinitions::new();
        embedded.add(type_name, definition).unwrap();
        let mut registry = MessageRegistry::builtin();
        registry.add_source(embedded);
        registry.resolve(type_name).unwrap()
    }

    #[test]
    fn test_sequence_of_empty_structs_needs_placeholders() {
        let schema = resolve_with("test_msgs/msg/Markers", "std_msgs/Empty[] markers\n");
        let mut w = CdrWriter::new();
        w.u32(9_000_000);

        let err = CdrDecoder::new().decode(&schema, &w.finish()).unwrap_err();
        assert!(err.is_decode_error());
        assert!(matches!(
            err,
            ExportError::LengthExceeded {
                length: 9_000_000,
                ..
            }
        ));
    }

    #[test]
    fn test_sequence_of_empty_structs() {
        let schema = resolve_with("test_msgs/msg/Markers", "std_msgs/Empty[] markers\n");
        let mut w = CdrWriter::new();
        w.u32(2).u8(0).u8(0);

        let message = CdrDecoder::new().decode(&schema, &w.finish()).unwrap();
        let markers = message.get("markers").and_then(FieldValue::as_sequence);
        assert_eq!(markers.map(<[FieldValue]>::len), Some(2));
    }

    #[test]
    fn test_nested_empty_struct_requires_placeholder() {
        let schema = resolve_with("test_msgs/msg/Pair", "std_msgs/Empty[2] markers\n");
        let mut w = CdrWriter::new();
        w.u8(0);

        let err = CdrDecoder::new().decode(&schema, &w.finish()).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_min_wire_size() {
        let schema = resolve("geometry_msgs/msg/PoseStamped");
        let pose = FieldType::Nested("geometry_msgs/msg/Pose".to_string());
        assert_eq!(min_wire_size(&schema, &pose), 56);
        let header = FieldType::Nested("std_msgs/msg/Header".to_string());
        assert_eq!(min_wire_size(&schema, &header), 12);

        let schema = resolve("std_msgs/msg/Empty");
        let empty = FieldType::Nested("std_msgs/msg/Empty".to_string());
        assert_eq!(min_wire_size(&schema, &empty), 1);
    }
}
