// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message type registry.
//!
//! Maps a fully qualified type name to a [`MessageSchema`] holding the type
//! and every type it references. Definitions come from a chain of
//! [`DefinitionSource`]s queried in order:
//!
//! 1. definitions recorded inside the bag
//! 2. `.msg` files under search roots (config, CLI, `AMENT_PREFIX_PATH`)
//! 3. the builtin definitions shipped with the crate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{ExportError, Result};
use crate::schema::ast::{qualify_type_name, MessageSchema, MessageType};
use crate::schema::builtin_types;
use crate::schema::parser::parse_schema;

/// Environment variable listing ROS install prefixes.
pub const AMENT_PREFIX_PATH: &str = "AMENT_PREFIX_PATH";

/// A place message definitions can be loaded from.
pub trait DefinitionSource {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Load the definition of `type_name` (`pkg/msg/Type`).
    ///
    /// May return more than one type when the definition embeds its
    /// dependencies. Returns `Ok(None)` when this source does not know the
    /// type.
    fn lookup(&self, type_name: &str) -> Result<Option<Vec<MessageType>>>;
}

/// Definitions recorded in the bag's `message_definitions` table.
#[derive(Debug, Default)]
pub struct EmbeddedDefinitions {
    types: HashMap<String, MessageType>,
}

impl EmbeddedDefinitions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add one concatenated `ros2msg` definition.
    pub fn add(&mut self, type_name: &str, definition: &str) -> Result<()> {
        let schema = parse_schema(type_name, definition)?;
        for (name, msg_type) in schema.types {
            // First definition wins; later topics repeat the same dependencies
            self.types.entry(name).or_insert(msg_type);
        }
        Ok(())
    }

    /// Number of known types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no definitions were added.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl DefinitionSource for EmbeddedDefinitions {
    fn name(&self) -> &str {
        "bag"
    }

    fn lookup(&self, type_name: &str) -> Result<Option<Vec<MessageType>>> {
        Ok(self.types.get(type_name).map(|t| vec![t.clone()]))
    }
}

/// `.msg` files under a list of search roots.
///
/// For `pkg/msg/Type` each root is probed for `share/pkg/msg/Type.msg`
/// (an install prefix) and `pkg/msg/Type.msg` (a source tree).
#[derive(Debug, Default, Clone)]
pub struct MsgSearchPath {
    roots: Vec<PathBuf>,
}

impl MsgSearchPath {
    /// Create a search path from explicit roots.
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// Append the prefixes listed in `AMENT_PREFIX_PATH`, if set.
    pub fn with_ament_prefix_path(mut self) -> Self {
        if let Some(value) = std::env::var_os(AMENT_PREFIX_PATH) {
            self.roots.extend(std::env::split_paths(&value));
        }
        self
    }

    /// Configured roots, in probe order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn candidates(&self, type_name: &str) -> Vec<PathBuf> {
        let parts: Vec<&str> = type_name.split('/').collect();
        let [package, namespace, name] = parts.as_slice() else {
            return Vec::new();
        };
        let file = format!("{name}.msg");
        self.roots
            .iter()
            .flat_map(|root| {
                [
                    root.join("share").join(package).join(namespace).join(&file),
                    root.join(package).join(namespace).join(&file),
                ]
            })
            .collect()
    }
}

impl DefinitionSource for MsgSearchPath {
    fn name(&self) -> &str {
        "msg path"
    }

    fn lookup(&self, type_name: &str) -> Result<Option<Vec<MessageType>>> {
        for candidate in self.candidates(type_name) {
            if !candidate.is_file() {
                continue;
            }
            let text = read_definition(&candidate)?;
            let schema = parse_schema(type_name, &text)?;
            return Ok(Some(schema.types.into_values().collect()));
        }
        Ok(None)
    }
}

fn read_definition(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ExportError::io(format!("read {}", path.display()), e.to_string()))
}

/// Definitions compiled into the crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinDefinitions;

impl DefinitionSource for BuiltinDefinitions {
    fn name(&self) -> &str {
        "builtin"
    }

    fn lookup(&self, type_name: &str) -> Result<Option<Vec<MessageType>>> {
        let Some(text) = builtin_types::definition(type_name) else {
            return Ok(None);
        };
        let schema = parse_schema(type_name, text)?;
        Ok(Some(schema.types.into_values().collect()))
    }
}

/// Resolves type names to complete schemas, caching every loaded type.
pub struct MessageRegistry {
    sources: Vec<Box<dyn DefinitionSource>>,
    types: HashMap<String, MessageType>,
}

impl MessageRegistry {
    /// Create a registry with no sources.
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
            types: HashMap::new(),
        }
    }

    /// Create a registry with the standard chain: bag definitions, search
    /// path, builtins.
    pub fn new(embedded: EmbeddedDefinitions, search_path: MsgSearchPath) -> Self {
        let mut registry = Self::empty();
        if !embedded.is_empty() {
            registry.add_source(embedded);
        }
        if !search_path.roots().is_empty() {
            registry.add_source(search_path);
        }
        registry.add_source(BuiltinDefinitions);
        registry
    }

    /// Registry that only knows the builtin definitions.
    pub fn builtin() -> Self {
        Self::new(EmbeddedDefinitions::new(), MsgSearchPath::default())
    }

    /// Append a source to the end of the lookup chain.
    pub fn add_source(&mut self, source: impl DefinitionSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Resolve a type and all types it references.
    ///
    /// Fails with [`ExportError::TypeNotFound`] naming the first type no
    /// source could provide.
    pub fn resolve(&mut self, type_name: &str) -> Result<MessageSchema> {
        let root = qualify_type_name(type_name, None);
        let mut schema = MessageSchema::new(root.clone());
        let mut pending = vec![root];

        while let Some(name) = pending.pop() {
            if schema.types.contains_key(&name) {
                continue;
            }
            let msg_type = self.load(&name)?;
            for field in &msg_type.fields {
                if let Some(nested) = field.type_name.nested_type() {
                    if !schema.types.contains_key(nested) {
                        pending.push(nested.to_string());
                    }
                }
            }
            schema.add_type(msg_type);
        }

        Ok(schema)
    }

    /// Load one type from the cache or the first source that has it.
    fn load(&mut self, type_name: &str) -> Result<MessageType> {
        if let Some(msg_type) = self.types.get(type_name) {
            return Ok(msg_type.clone());
        }

        for source in &self.sources {
            let Some(loaded) = source.lookup(type_name)? else {
                continue;
            };
            debug!(
                context = "registry",
                type_name,
                source = source.name(),
                types = loaded.len(),
                "loaded message definition"
            );
            for msg_type in loaded {
                self.types.entry(msg_type.name.clone()).or_insert(msg_type);
            }
            if let Some(msg_type) = self.types.get(type_name) {
                return Ok(msg_type.clone());
            }
        }

        Err(ExportError::type_not_found(type_name))
    }

    /// Number of types loaded so far.
    pub fn cached_types(&self) -> usize {
        self.types.len()
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
