//! Type Classification
//!
//! Maps a [`TypeDescriptor`] to the JSON type it is described as, plus the
//! constraints that type implies. Pure functions over descriptors; no state.
//!
//! | Kind                              | Category  | Constraints             |
//! |-----------------------------------|-----------|-------------------------|
//! | text, character, uuid             | `string`  |                         |
//! | 8/16/32/64-bit integers           | `integer` | `minimum`/`maximum`     |
//! | float, double, decimal            | `number`  |                         |
//! | boolean                           | `boolean` |                         |
//! | timestamp                         | `string`  | `format: "date-time"`   |
//! | enumeration                       | `string`  | `enum: [names...]`      |
//! | array or sequence                 | `array`   |                         |
//! | anything else                     | `object`  |                         |
//!
//! Nullable wrappers are removed before any of the above applies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::reflect::{TypeDescriptor, TypeKind};

/// JSON type category of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl TypeCategory {
    /// The JSON Schema `type` keyword value
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::String => "string",
            TypeCategory::Integer => "integer",
            TypeCategory::Number => "number",
            TypeCategory::Boolean => "boolean",
            TypeCategory::Array => "array",
            TypeCategory::Object => "object",
        }
    }
}

/// Constraints implied by a type, independent of any value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub format: Option<&'static str>,
    pub enum_values: Option<Vec<&'static str>>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none()
            && self.maximum.is_none()
            && self.format.is_none()
            && self.enum_values.is_none()
    }

    /// Write the constraint keywords into a schema node
    pub fn apply_to(&self, node: &mut Map<String, Value>) {
        if let Some(minimum) = &self.minimum {
            node.insert("minimum".to_string(), Value::Number(minimum.clone()));
        }
        if let Some(maximum) = &self.maximum {
            node.insert("maximum".to_string(), Value::Number(maximum.clone()));
        }
        if let Some(format) = self.format {
            node.insert("format".to_string(), Value::from(format));
        }
        if let Some(values) = &self.enum_values {
            node.insert(
                "enum".to_string(),
                Value::Array(values.iter().map(|v| Value::from(*v)).collect()),
            );
        }
    }
}

/// Classifies type descriptors
pub struct TypeClassifier;

impl TypeClassifier {
    /// JSON type category of `ty`
    pub fn classify(ty: &TypeDescriptor) -> TypeCategory {
        let ty = ty.underlying();
        match ty.kind() {
            TypeKind::Text | TypeKind::Character | TypeKind::Uuid => TypeCategory::String,
            TypeKind::Integer(_) => TypeCategory::Integer,
            TypeKind::Float | TypeKind::Double | TypeKind::Decimal => TypeCategory::Number,
            TypeKind::Boolean => TypeCategory::Boolean,
            TypeKind::Timestamp => TypeCategory::String,
            TypeKind::Composite if ty.is_array() || ty.is_sequence() => TypeCategory::Array,
            TypeKind::Enumeration(_) => TypeCategory::String,
            TypeKind::Duration | TypeKind::Composite | TypeKind::Nullable(_) => {
                TypeCategory::Object
            }
        }
    }

    /// Numeric bounds, format and enum names implied by `ty`
    pub fn constraints(ty: &TypeDescriptor) -> Constraints {
        let ty = ty.underlying();
        match ty.kind() {
            TypeKind::Integer(width) => {
                let (minimum, maximum) = width.range();
                Constraints {
                    minimum: Some(minimum),
                    maximum: Some(maximum),
                    ..Constraints::default()
                }
            }
            TypeKind::Timestamp => Constraints {
                format: Some("date-time"),
                ..Constraints::default()
            },
            TypeKind::Enumeration(info) => Constraints {
                enum_values: Some(info.variants.to_vec()),
                ..Constraints::default()
            },
            _ => Constraints::default(),
        }
    }

    /// Element type of a sequence.
    ///
    /// Resolution order: explicit array element, first generic argument,
    /// item type of an implemented sequence.
    pub fn element_type(ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        let ty = ty.underlying();
        ty.array_element()
            .or_else(|| ty.generic_args().into_iter().next())
            .or_else(|| ty.sequence_item())
    }

    /// Whether `ty` terminates recursion instead of being expanded as an object
    pub fn is_primitive_leaf(ty: &TypeDescriptor) -> bool {
        match ty.kind() {
            TypeKind::Nullable(inner) => Self::is_primitive_leaf(&inner()),
            TypeKind::Composite => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Describe, MemberDescriptor};
    use chrono::{DateTime, Utc};
    use std::time::Duration;

    #[derive(Debug, Clone, Copy)]
    enum Weather {
        Clear,
        Rain,
        Snow,
    }

    crate::describe_enum!(Weather as "World.Weather" { Clear, Rain, Snow });

    struct Tags;

    impl Describe for Tags {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::sequence::<Tags>("World.Tags", String::describe)
        }
    }

    struct Spawn;

    impl Describe for Spawn {
        fn describe() -> TypeDescriptor {
            fn members() -> Vec<MemberDescriptor> {
                Vec::new()
            }
            TypeDescriptor::object::<Spawn>("World.Spawn", members)
        }
    }

    #[test]
    fn test_i32_range() {
        let ty = i32::describe();
        assert_eq!(TypeClassifier::classify(&ty), TypeCategory::Integer);

        let constraints = TypeClassifier::constraints(&ty);
        assert_eq!(constraints.minimum, Some(Number::from(i32::MIN)));
        assert_eq!(constraints.maximum, Some(Number::from(i32::MAX)));
    }

    #[test]
    fn test_u8_range() {
        let constraints = TypeClassifier::constraints(&u8::describe());
        assert_eq!(constraints.minimum, Some(Number::from(0)));
        assert_eq!(constraints.maximum, Some(Number::from(255)));
    }

    #[test]
    fn test_u64_range_is_exact() {
        let constraints = TypeClassifier::constraints(&u64::describe());
        assert_eq!(constraints.maximum.unwrap().as_u64(), Some(u64::MAX));
    }

    #[test]
    fn test_scalar_categories() {
        assert_eq!(TypeClassifier::classify(&String::describe()), TypeCategory::String);
        assert_eq!(TypeClassifier::classify(&char::describe()), TypeCategory::String);
        assert_eq!(TypeClassifier::classify(&uuid::Uuid::describe()), TypeCategory::String);
        assert_eq!(TypeClassifier::classify(&f32::describe()), TypeCategory::Number);
        assert_eq!(
            TypeClassifier::classify(&rust_decimal::Decimal::describe()),
            TypeCategory::Number
        );
        assert_eq!(TypeClassifier::classify(&bool::describe()), TypeCategory::Boolean);
        assert!(TypeClassifier::constraints(&f64::describe()).is_empty());
    }

    #[test]
    fn test_timestamp_format() {
        let ty = DateTime::<Utc>::describe();
        assert_eq!(TypeClassifier::classify(&ty), TypeCategory::String);
        assert_eq!(TypeClassifier::constraints(&ty).format, Some("date-time"));
    }

    #[test]
    fn test_enum_names() {
        let ty = Weather::describe();
        assert_eq!(TypeClassifier::classify(&ty), TypeCategory::String);
        assert_eq!(
            TypeClassifier::constraints(&ty).enum_values,
            Some(vec!["Clear", "Rain", "Snow"])
        );
        assert!(TypeClassifier::is_primitive_leaf(&ty));
    }

    #[test]
    fn test_nullable_is_unwrapped() {
        let ty = Option::<u16>::describe();
        assert_eq!(TypeClassifier::classify(&ty), TypeCategory::Integer);
        assert_eq!(TypeClassifier::constraints(&ty).maximum, Some(Number::from(u16::MAX)));
        assert!(TypeClassifier::is_primitive_leaf(&ty));
        assert!(TypeClassifier::is_primitive_leaf(&Option::<Weather>::describe()));
    }

    #[test]
    fn test_duration_is_leaf_object() {
        let ty = Duration::describe();
        assert_eq!(TypeClassifier::classify(&ty), TypeCategory::Object);
        assert!(TypeClassifier::is_primitive_leaf(&ty));
    }

    #[test]
    fn test_composites_are_not_leaves() {
        assert!(!TypeClassifier::is_primitive_leaf(&Spawn::describe()));
        assert!(!TypeClassifier::is_primitive_leaf(&Vec::<u8>::describe()));
        assert!(!TypeClassifier::is_primitive_leaf(&Option::<Spawn>::describe()));
        assert_eq!(TypeClassifier::classify(&Spawn::describe()), TypeCategory::Object);
    }

    #[test]
    fn test_element_type_resolution() {
        let from_array = TypeClassifier::element_type(&<[i16; 3]>::describe()).unwrap();
        assert_eq!(from_array.full_name(), "i16");

        let from_generic = TypeClassifier::element_type(&Vec::<Spawn>::describe()).unwrap();
        assert_eq!(from_generic.full_name(), "World.Spawn");

        let from_sequence = TypeClassifier::element_type(&Tags::describe()).unwrap();
        assert_eq!(from_sequence.full_name(), "String");
        assert_eq!(TypeClassifier::classify(&Tags::describe()), TypeCategory::Array);

        let through_nullable =
            TypeClassifier::element_type(&Option::<Vec<bool>>::describe()).unwrap();
        assert_eq!(through_nullable.full_name(), "bool");

        assert!(TypeClassifier::element_type(&Spawn::describe()).is_none());
    }

    #[test]
    fn test_apply_constraints() {
        let mut node = Map::new();
        TypeClassifier::constraints(&Weather::describe()).apply_to(&mut node);
        assert_eq!(node.get("enum"), Some(&serde_json::json!(["Clear", "Rain", "Snow"])));
        assert!(node.get("minimum").is_none());
    }
}
