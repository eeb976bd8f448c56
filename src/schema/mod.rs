// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS2 message schemas.
//!
//! - [`ast`]: the parsed type model
//! - [`parser`]: the `.msg` parser
//! - [`builtin_types`]: standard definitions compiled into the crate
//! - [`registry`]: name resolution across bag, filesystem and builtins

pub mod ast;
pub mod builtin_types;
pub mod parser;
pub mod registry;

pub use ast::{
    qualify_type_name, ArraySize, Field, FieldType, MessageSchema, MessageType, PrimitiveType,
};
pub use parser::parse_schema;
pub use registry::{
    BuiltinDefinitions, DefinitionSource, EmbeddedDefinitions, MessageRegistry, MsgSearchPath,
};
