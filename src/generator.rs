//! Schema Generation
//!
//! Walks a registered type (and, when available, a live instance of it) and
//! builds a JSON-Schema-shaped document:
//!
//! ```text
//! { "title", "description"?, "type": "object", "properties": {...}, "required": [...] }
//! ```
//!
//! Each member becomes a property node carrying its JSON `type`, its
//! documentation, the constraints of its declared type, nested schemas for
//! objects and arrays, and a `default` taken from the instance for leaves.
//!
//! Generation never fails. Unreadable members, types without a default
//! constructor and a missing documentation export only make the output
//! less detailed.
//!
//! ## Repeated types
//!
//! Within one call, the first occurrence of a type is expanded and every later
//! occurrence (including ones in unrelated sibling branches, not only cycles)
//! becomes a stub `{"type": "object", "title": <name>}`.

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::classify::{TypeCategory, TypeClassifier};
use crate::config::{GeneratorConfig, OutputFormat};
use crate::docs::{DocKind, DocumentationIndex};
use crate::error::SchemaError;
use crate::reflect::{Describe, MemberDescriptor, MemberValue, TypeDescriptor};

/// Key never copied from a nested schema into its parent
pub const RESERVED_MARKER_KEY: &str = "$schema";

/// A generic JSON tree node
pub type SchemaNode = Value;

/// Types already expanded in one generation call
#[derive(Debug, Clone, Default)]
pub struct VisitedTypes {
    seen: HashSet<TypeId>,
}

impl VisitedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ty`; returns false if it was already recorded
    pub fn insert(&mut self, ty: &TypeDescriptor) -> bool {
        self.seen.insert(ty.type_id())
    }

    pub fn contains(&self, ty: &TypeDescriptor) -> bool {
        self.seen.contains(&ty.type_id())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Builds schemas for registered types.
///
/// The generator keeps no per-call state, so one instance can serve any number
/// of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    docs: Arc<DocumentationIndex>,
}

impl SchemaGenerator {
    pub fn new(docs: Arc<DocumentationIndex>) -> Self {
        Self { docs }
    }

    /// A generator that emits no descriptions
    pub fn without_docs() -> Self {
        Self::default()
    }

    /// Load the documentation export at `path` (inert if unavailable)
    pub fn with_docs_path(path: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(DocumentationIndex::load(path)))
    }

    /// Build a generator from configuration
    pub fn from_config(config: &GeneratorConfig) -> Self {
        match &config.docs.path {
            Some(path) => Self::with_docs_path(path),
            None => Self::without_docs(),
        }
    }

    pub fn docs(&self) -> &DocumentationIndex {
        &self.docs
    }

    /// Generate the schema for `T` as pretty-printed JSON.
    ///
    /// Without an instance, a default instance is constructed when `T` has a
    /// default constructor; otherwise no `default` values are emitted.
    pub fn generate<T: Describe>(&self, instance: Option<&T>) -> String {
        Self::render(&self.generate_value(instance), OutputFormat::Pretty)
    }

    /// Generate the schema for `T` as a JSON tree
    pub fn generate_value<T: Describe>(&self, instance: Option<&T>) -> SchemaNode {
        let instance = instance.map(|value| value as &dyn Any);
        self.generate_descriptor(&T::describe(), instance)
    }

    /// Generate the schema for a type-erased instance of `ty`.
    ///
    /// Wrapped instances (`Arc<T>`, `Box<T>`, `Option<T>`) are seen through;
    /// an empty `Option` falls back to a default-constructed `T`.
    pub fn generate_descriptor(&self, ty: &TypeDescriptor, instance: Option<&dyn Any>) -> SchemaNode {
        let mut visited = VisitedTypes::new();
        let instance = instance.and_then(|value| ty.project(value));
        let ty = ty.underlying();

        let constructed;
        let instance = match instance {
            Some(instance) => Some(instance),
            None => match ty.construct_default() {
                Ok(value) => {
                    constructed = value;
                    Some(&*constructed)
                }
                Err(err) => {
                    let err = SchemaError::TopLevelFailure {
                        type_name: ty.full_name().to_string(),
                        reason: err.to_string(),
                    };
                    tracing::warn!(error = %err, "Generating schema without instance data");
                    None
                }
            },
        };

        Value::Object(self.generate_for_type(&ty, instance, &mut visited))
    }

    /// Serialize a generated schema
    pub fn render(schema: &SchemaNode, format: OutputFormat) -> String {
        let rendered = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(schema),
            OutputFormat::Compact => serde_json::to_string(schema),
        };
        rendered.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Failed to serialize schema");
            "{}".to_string()
        })
    }

    /// Build the object schema for `ty`, threading the visited set through
    /// every nested call.
    ///
    /// Every member whose declared type is not `Option<_>` is listed in
    /// `required`, including strings, sequences and nested structs.
    pub fn generate_for_type(
        &self,
        ty: &TypeDescriptor,
        instance: Option<&dyn Any>,
        visited: &mut VisitedTypes,
    ) -> Map<String, Value> {
        if !visited.insert(ty) {
            return stub(ty);
        }

        let mut schema = Map::new();
        schema.insert("title".to_string(), Value::from(ty.name()));
        if let Some(description) = self.docs.lookup(DocKind::Type, ty.full_name(), None) {
            schema.insert("description".to_string(), Value::from(description));
        }
        schema.insert("type".to_string(), Value::from(TypeCategory::Object.as_str()));

        let members = ty.members();
        let mut properties = Map::new();
        for member in &members {
            let node = self.member_schema(ty, member, instance, visited);
            properties.insert(member.name().to_string(), Value::Object(node));
        }
        schema.insert("properties".to_string(), Value::Object(properties));

        let required = members
            .iter()
            .filter(|member| !member.declared_type().is_nullable())
            .map(|member| Value::from(member.name()))
            .collect();
        schema.insert("required".to_string(), Value::Array(required));

        schema
    }

    fn member_schema(
        &self,
        owner: &TypeDescriptor,
        member: &MemberDescriptor,
        instance: Option<&dyn Any>,
        visited: &mut VisitedTypes,
    ) -> Map<String, Value> {
        let declared = member.declared_type();
        let value = instance.and_then(|instance| read_member(owner, member, instance));
        let value = value
            .as_ref()
            .and_then(|value| declared.project(value.as_any()));

        let category = TypeClassifier::classify(&declared);
        let mut node = Map::new();
        node.insert("type".to_string(), Value::from(category.as_str()));

        let kind = DocKind::from(member.kind());
        if let Some(description) = self.docs.lookup(kind, owner.full_name(), Some(member.name())) {
            node.insert("description".to_string(), Value::from(description));
        }

        TypeClassifier::constraints(&declared).apply_to(&mut node);

        let is_leaf = TypeClassifier::is_primitive_leaf(&declared);
        match category {
            TypeCategory::Object if !is_leaf => match value {
                Some(value) => {
                    let nested = self.generate_for_type(&declared.underlying(), Some(value), visited);
                    for (key, nested_value) in nested {
                        if key != RESERVED_MARKER_KEY {
                            node.insert(key, nested_value);
                        }
                    }
                }
                None => {
                    node.insert("properties".to_string(), Value::Object(Map::new()));
                }
            },
            TypeCategory::Array => {
                if let Some(items) = self.items_schema(&declared, visited) {
                    node.insert("items".to_string(), Value::Object(items));
                }
            }
            _ => {}
        }

        if is_leaf {
            if let Some(default) = value.and_then(|value| declared.render_default(value)) {
                node.insert("default".to_string(), default);
            }
        }

        node
    }

    fn items_schema(&self, declared: &TypeDescriptor, visited: &mut VisitedTypes) -> Option<Map<String, Value>> {
        let element = TypeClassifier::element_type(declared)?;
        let mut items = Map::new();

        if TypeClassifier::is_primitive_leaf(&element) {
            items.insert(
                "type".to_string(),
                Value::from(TypeClassifier::classify(&element).as_str()),
            );
            TypeClassifier::constraints(&element).apply_to(&mut items);
            return Some(items);
        }

        items.insert("type".to_string(), Value::from(TypeCategory::Object.as_str()));
        let element = element.underlying();
        match element.construct_default() {
            Ok(instance) => {
                let nested = self.generate_for_type(&element, Some(&*instance), visited);
                for (key, value) in nested {
                    if key != RESERVED_MARKER_KEY && key != "title" {
                        items.insert(key, value);
                    }
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "Using a bare object schema for array items");
            }
        }
        Some(items)
    }
}

fn stub(ty: &TypeDescriptor) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::from(TypeCategory::Object.as_str()));
    schema.insert("title".to_string(), Value::from(ty.name()));
    schema
}

fn read_member<'a>(
    owner: &TypeDescriptor,
    member: &MemberDescriptor,
    instance: &'a dyn Any,
) -> Option<MemberValue<'a>> {
    match member.read(instance) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(
                owner = owner.full_name(),
                member = member.name(),
                error = %err,
                "Omitting member value"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Position {
        x: f32,
        y: f32,
    }

    crate::describe_struct!(Position as "World.Position" with Position::default {
        field x: f32,
        field y: f32,
    });

    #[derive(Debug, Default)]
    struct Checkpoint {
        name: String,
        position: Position,
        fallback: Option<Position>,
    }

    crate::describe_struct!(Checkpoint as "World.Checkpoint" with Checkpoint::default {
        property name: String,
        property position: Position,
        property fallback: Option<Position>,
    });

    #[test]
    fn test_visited_types() {
        let mut visited = VisitedTypes::new();
        assert!(visited.insert(&Position::describe()));
        assert!(!visited.insert(&Position::describe()));
        assert!(visited.contains(&Position::describe()));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_repeated_type_is_stubbed_in_sibling_branch() {
        let checkpoint = Checkpoint {
            name: "spawn".to_string(),
            position: Position { x: 1.0, y: 2.0 },
            fallback: Some(Position::default()),
        };
        let schema = SchemaGenerator::without_docs().generate_value(Some(&checkpoint));

        let position = &schema["properties"]["position"];
        assert_eq!(position["title"], json!("Position"));
        assert_eq!(position["properties"]["x"]["default"], json!(1.0));

        assert_eq!(schema["properties"]["fallback"], json!({"type": "object", "title": "Position"}));
    }

    #[test]
    fn test_absent_nested_value_gets_placeholder() {
        let schema = SchemaGenerator::without_docs().generate_value(Some(&Checkpoint::default()));
        assert_eq!(schema["properties"]["fallback"], json!({"type": "object", "properties": {}}));
        assert_eq!(schema["required"], json!(["name", "position"]));
    }

    #[test]
    fn test_nested_merge_keeps_type_first() {
        let schema = SchemaGenerator::without_docs().generate_value::<Checkpoint>(None);
        let keys: Vec<_> = schema["properties"]["position"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["type", "title", "properties", "required"]);
    }

    #[test]
    fn test_render_formats() {
        let schema = json!({"title": "A", "type": "object"});
        assert_eq!(
            SchemaGenerator::render(&schema, OutputFormat::Compact),
            r#"{"title":"A","type":"object"}"#
        );
        assert!(SchemaGenerator::render(&schema, OutputFormat::Pretty).contains("\n  \"title\": \"A\""));
    }
}
