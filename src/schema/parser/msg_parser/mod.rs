// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MSG format parser using Pest.
//!
//! This module handles parsing of ROS2 .msg definitions.
//!
//! The format supports:
//! - Simple field lists (root message)
//! - Dependency blocks with "MSG: TypeName" headers, as found in
//!   concatenated definitions stored inside bags
//! - Array types: `T[]` (unbounded), `T[N]` (fixed), `T[<=N]` (bounded)
//! - Bounded strings: `string<=N`
//! - Default values and constants (constants are dropped)
//! - Comments (# style)
//!
//! Every nested type reference is normalized to `pkg/msg/Type` using the
//! package of the definition it appears in.

use crate::core::{ExportError, Result};
use crate::schema::ast::{
    package_of, qualify_type_name, ArraySize, Field, FieldType, MessageSchema, MessageType,
    PrimitiveType,
};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

/// Pest parser for ROS2 .msg definitions.
#[derive(Parser)]
#[grammar = "schema/parser/msg_parser/msg.pest"] // Path relative to src/ directory
pub struct MsgParser;

/// Parse a .msg definition for the type `name`.
///
/// The returned schema contains the root type and every type defined in
/// dependency blocks. Types that are only referenced are not resolved here.
pub fn parse(name: &str, definition: &str) -> Result<MessageSchema> {
    let name = qualify_type_name(name, None);

    // The grammar is line-oriented and wants a terminating newline
    let mut text = definition.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }

    let mut pairs = MsgParser::parse(Rule::schema, &text)
        .map_err(|e| ExportError::parse(format!("msg schema {name}"), format!("{e}")))?;

    let mut schema = MessageSchema::new(name.clone());
    let Some(root) = pairs.next() else {
        return Ok(schema);
    };

    for item in root.into_inner() {
        match item.as_rule() {
            Rule::root_msg => {
                let msg_type = parse_body(&name, item.into_inner())?;
                schema.add_type(msg_type);
            }
            Rule::dependency_msg => {
                let mut inner = item.into_inner();
                let Some(header) = inner.next() else {
                    continue;
                };
                let dep_name = qualify_type_name(header.as_str(), package_of(&name));
                let msg_type = parse_body(&dep_name, inner)?;
                schema.add_type(msg_type);
            }
            _ => {}
        }
    }

    Ok(schema)
}

/// Parse the field lines of one message block.
fn parse_body<'a>(
    type_name: &str,
    items: impl Iterator<Item = Pair<'a, Rule>>,
) -> Result<MessageType> {
    let package = package_of(type_name);
    let mut msg_type = MessageType::new(type_name.to_string());

    for item in items {
        if item.as_rule() != Rule::field {
            // Constants carry no per-message data
            continue;
        }
        let mut inner = item.into_inner();
        let (Some(type_pair), Some(name_pair)) = (inner.next(), inner.next()) else {
            return Err(ExportError::parse(
                format!("msg schema {type_name}"),
                "field without type or name",
            ));
        };
        msg_type.add_field(Field {
            name: name_pair.as_str().to_string(),
            type_name: parse_field_type(type_pair, package)?,
        });
    }

    Ok(msg_type)
}

/// Build a FieldType from a `field_type` pair.
fn parse_field_type(pair: Pair<Rule>, package: Option<&str>) -> Result<FieldType> {
    let mut base: Option<FieldType> = None;
    let mut array: Option<ArraySize> = None;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::type_ref => {
                let raw = part.as_str();
                base = Some(match PrimitiveType::try_from_str(raw) {
                    Some(prim) => FieldType::Primitive(prim),
                    None => FieldType::Nested(qualify_type_name(raw, package)),
                });
            }
            // string<=N decodes exactly like string
            Rule::string_bound => {}
            Rule::array_spec => {
                array = Some(parse_array_spec(part)?);
            }
            _ => {}
        }
    }

    let base = base.ok_or_else(|| ExportError::parse("msg schema", "missing field type"))?;
    Ok(match array {
        Some(size) => FieldType::Array {
            base_type: Box::new(base),
            size,
        },
        None => base,
    })
}

fn parse_array_spec(pair: Pair<Rule>) -> Result<ArraySize> {
    let Some(bound) = pair.into_inner().next() else {
        return Ok(ArraySize::Unbounded);
    };
    match bound.as_rule() {
        Rule::upper_bound => {
            let digits = bound
                .into_inner()
                .next()
                .map(|number| number.as_str())
                .unwrap_or_default();
            Ok(ArraySize::Bounded(parse_number(digits)?))
        }
        _ => Ok(ArraySize::Fixed(parse_number(bound.as_str())?)),
    }
}

fn parse_number(digits: &str) -> Result<usize> {
    digits
        .parse()
        .map_err(|e| ExportError::parse("msg schema array bound", format!("{digits}: {e}")))
}
