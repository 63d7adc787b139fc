//! Type Registration
//!
//! Rust has no runtime reflection, so every model that should be described
//! registers itself through the [`Describe`] trait. A [`TypeDescriptor`] is the
//! runtime view the generator walks:
//! - identity (`TypeId`) for cycle detection
//! - full and short names for documentation lookups and titles
//! - a [`TypeKind`] the classifier maps to a JSON type
//! - members, element types and an optional default constructor
//!
//! Descriptors refer to other types through [`TypeFn`] pointers, so a model
//! that contains itself never recurses while its descriptor is built.
//!
//! User models are usually registered with [`describe_struct!`](crate::describe_struct)
//! and [`describe_enum!`](crate::describe_enum).

mod impls;
mod macros;

use std::any::{Any, TypeId};
use std::fmt;

use serde_json::Value;

use crate::error::{Result, SchemaError};

pub use impls::format_duration;

/// Lazily resolves the descriptor of a referenced type
pub type TypeFn = fn() -> TypeDescriptor;

/// Reads one member from an instance of its owner type
pub type ReadFn = for<'a> fn(&'a dyn Any) -> Result<MemberValue<'a>>;

/// Builds a default instance of a type
pub type ConstructFn = fn() -> Result<Box<dyn Any>>;

/// Renders a leaf value as a JSON literal
pub type RenderFn = fn(&dyn Any) -> Option<Value>;

/// Borrows the value the generator should see for a stored value
pub type ProjectFn = fn(&dyn Any) -> Option<&dyn Any>;

/// Returns the symbolic name of an enumeration value
pub type NameOfFn = fn(&dyn Any) -> Option<&'static str>;

/// Returns the members of an object type, in enumeration order
pub type MembersFn = fn() -> Vec<MemberDescriptor>;

// =============================================================================
// Describe
// =============================================================================

/// A type that can be described by the schema generator
pub trait Describe: Any + Sized {
    /// Runtime descriptor for this type
    fn describe() -> TypeDescriptor;

    /// The value schema generation sees for `self`.
    ///
    /// Wrappers override this: `Option<T>` yields its payload (or nothing) and
    /// smart pointers yield their target.
    fn reflect(&self) -> Option<&dyn Any> {
        Some(self as &dyn Any)
    }
}

/// Projects a type-erased `T` through [`Describe::reflect`]
pub(crate) fn project_value<T: Describe>(value: &dyn Any) -> Option<&dyn Any> {
    value.downcast_ref::<T>().and_then(T::reflect)
}

/// Default constructor for any `T: Default`
pub fn construct_default<T: Default + Any>() -> Result<Box<dyn Any>> {
    let boxed: Box<dyn Any> = Box::new(T::default());
    Ok(boxed)
}

// =============================================================================
// Type Kind
// =============================================================================

/// Width of an integer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerWidth {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl IntegerWidth {
    /// Exact representable range as JSON numbers
    pub fn range(&self) -> (serde_json::Number, serde_json::Number) {
        use serde_json::Number;
        match self {
            IntegerWidth::I8 => (Number::from(i8::MIN), Number::from(i8::MAX)),
            IntegerWidth::U8 => (Number::from(u8::MIN), Number::from(u8::MAX)),
            IntegerWidth::I16 => (Number::from(i16::MIN), Number::from(i16::MAX)),
            IntegerWidth::U16 => (Number::from(u16::MIN), Number::from(u16::MAX)),
            IntegerWidth::I32 => (Number::from(i32::MIN), Number::from(i32::MAX)),
            IntegerWidth::U32 => (Number::from(u32::MIN), Number::from(u32::MAX)),
            IntegerWidth::I64 => (Number::from(i64::MIN), Number::from(i64::MAX)),
            IntegerWidth::U64 => (Number::from(u64::MIN), Number::from(u64::MAX)),
        }
    }
}

/// Symbolic names of an enumeration, in declaration order
#[derive(Clone, Copy)]
pub struct EnumInfo {
    pub variants: &'static [&'static str],
    pub name_of: NameOfFn,
}

impl fmt::Debug for EnumInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumInfo")
            .field("variants", &self.variants)
            .finish()
    }
}

/// What kind of runtime type a descriptor stands for
#[derive(Clone)]
pub enum TypeKind {
    Text,
    Character,
    Uuid,
    Integer(IntegerWidth),
    Float,
    Double,
    Decimal,
    Boolean,
    /// Date or date-time
    Timestamp,
    Duration,
    Enumeration(EnumInfo),
    /// `Option<T>`: the wrapped type is resolved lazily
    Nullable(TypeFn),
    /// Structs, sequences and everything else with members or elements
    Composite,
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Text => f.write_str("Text"),
            TypeKind::Character => f.write_str("Character"),
            TypeKind::Uuid => f.write_str("Uuid"),
            TypeKind::Integer(width) => f.debug_tuple("Integer").field(width).finish(),
            TypeKind::Float => f.write_str("Float"),
            TypeKind::Double => f.write_str("Double"),
            TypeKind::Decimal => f.write_str("Decimal"),
            TypeKind::Boolean => f.write_str("Boolean"),
            TypeKind::Timestamp => f.write_str("Timestamp"),
            TypeKind::Duration => f.write_str("Duration"),
            TypeKind::Enumeration(info) => f.debug_tuple("Enumeration").field(info).finish(),
            TypeKind::Nullable(inner) => f.debug_tuple("Nullable").field(&inner().full_name()).finish(),
            TypeKind::Composite => f.write_str("Composite"),
        }
    }
}

// =============================================================================
// Type Descriptor
// =============================================================================

/// Runtime description of a registered type
#[derive(Clone)]
pub struct TypeDescriptor {
    type_id: TypeId,
    full_name: &'static str,
    kind: TypeKind,
    project: ProjectFn,
    render: Option<RenderFn>,
    construct: Option<ConstructFn>,
    array_element: Option<TypeFn>,
    generic_args: Vec<TypeFn>,
    sequence_item: Option<TypeFn>,
    members: Option<MembersFn>,
}

impl TypeDescriptor {
    fn base<T: Describe>(full_name: &'static str, kind: TypeKind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            full_name,
            kind,
            project: project_value::<T>,
            render: None,
            construct: None,
            array_element: None,
            generic_args: Vec::new(),
            sequence_item: None,
            members: None,
        }
    }

    /// A scalar leaf (numbers, text, timestamps, durations)
    pub fn leaf<T: Describe>(full_name: &'static str, kind: TypeKind, render: RenderFn) -> Self {
        Self {
            render: Some(render),
            ..Self::base::<T>(full_name, kind)
        }
    }

    /// An enumeration rendered by symbolic name
    pub fn enumeration<T: Describe>(
        full_name: &'static str,
        variants: &'static [&'static str],
        name_of: NameOfFn,
    ) -> Self {
        Self::base::<T>(full_name, TypeKind::Enumeration(EnumInfo { variants, name_of }))
    }

    /// A nullable wrapper around `inner`
    pub fn nullable<T: Describe>(full_name: &'static str, inner: TypeFn) -> Self {
        Self::base::<T>(full_name, TypeKind::Nullable(inner))
    }

    /// An object with named members
    pub fn object<T: Describe>(full_name: &'static str, members: MembersFn) -> Self {
        Self {
            members: Some(members),
            ..Self::base::<T>(full_name, TypeKind::Composite)
        }
    }

    /// A fixed array with an explicit element type
    pub fn array<T: Describe>(full_name: &'static str, element: TypeFn) -> Self {
        Self {
            array_element: Some(element),
            ..Self::base::<T>(full_name, TypeKind::Composite)
        }
    }

    /// A type that yields `item`s when iterated
    pub fn sequence<T: Describe>(full_name: &'static str, item: TypeFn) -> Self {
        Self {
            sequence_item: Some(item),
            ..Self::base::<T>(full_name, TypeKind::Composite)
        }
    }

    /// Record the type's generic arguments, in declaration order
    pub fn with_generic_args(mut self, args: Vec<TypeFn>) -> Self {
        self.generic_args = args;
        self
    }

    /// Attach a default constructor
    pub fn constructible(mut self, construct: ConstructFn) -> Self {
        self.construct = Some(construct);
        self
    }

    /// Reuse this descriptor for a transparent wrapper `W` (e.g. `Box<T>`).
    ///
    /// Identity and shape stay those of the wrapped type; only the value
    /// projection changes so stored `W` values are seen through.
    pub fn seen_through<W: Describe>(mut self) -> Self {
        self.project = project_value::<W>;
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Dotted name used in documentation identifiers (e.g. `Ns.Config`)
    pub fn full_name(&self) -> &'static str {
        self.full_name
    }

    /// Short name used as a schema `title`
    pub fn name(&self) -> &'static str {
        self.full_name.rsplit('.').next().unwrap_or(self.full_name)
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, TypeKind::Nullable(_))
    }

    /// The descriptor with every nullable wrapper removed
    pub fn underlying(&self) -> TypeDescriptor {
        match self.kind {
            TypeKind::Nullable(inner) => inner().underlying(),
            _ => self.clone(),
        }
    }

    pub fn array_element(&self) -> Option<TypeDescriptor> {
        self.array_element.map(|element| element())
    }

    pub fn generic_args(&self) -> Vec<TypeDescriptor> {
        self.generic_args.iter().map(|arg| arg()).collect()
    }

    pub fn sequence_item(&self) -> Option<TypeDescriptor> {
        self.sequence_item.map(|item| item())
    }

    pub fn is_array(&self) -> bool {
        self.array_element.is_some()
    }

    pub fn is_sequence(&self) -> bool {
        self.sequence_item.is_some()
    }

    /// Members in enumeration order, without indexed members
    pub fn members(&self) -> Vec<MemberDescriptor> {
        self.members
            .map(|members| {
                members()
                    .into_iter()
                    .filter(|member| !member.is_indexed())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Borrow the value the generator should see for a stored value of this type
    pub fn project<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.project)(value)
    }

    /// Build a default instance
    pub fn construct_default(&self) -> Result<Box<dyn Any>> {
        match self.construct {
            Some(construct) => construct(),
            None => Err(SchemaError::NonConstructibleType {
                type_name: self.full_name.to_string(),
            }),
        }
    }

    /// Render a projected value of this type as a `default` literal
    pub fn render_default(&self, value: &dyn Any) -> Option<Value> {
        match &self.kind {
            TypeKind::Enumeration(info) => (info.name_of)(value).map(Value::from),
            TypeKind::Nullable(inner) => inner().render_default(value),
            _ => self.render.and_then(|render| render(value)),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("full_name", &self.full_name)
            .field("kind", &self.kind)
            .field("constructible", &self.construct.is_some())
            .finish()
    }
}

// =============================================================================
// Members
// =============================================================================

/// Whether a member is exposed as a property or a plain field.
///
/// Only affects the documentation identifier prefix (`P:` or `F:`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Field,
}

/// A value read from a member
pub enum MemberValue<'a> {
    /// Borrowed from the owning instance
    Borrowed(&'a dyn Any),
    /// Computed by the accessor
    Owned(Box<dyn Any>),
}

impl MemberValue<'_> {
    pub fn as_any(&self) -> &dyn Any {
        match self {
            MemberValue::Borrowed(value) => *value,
            MemberValue::Owned(value) => &**value,
        }
    }
}

/// Uniform view over a property- or field-style member
#[derive(Clone)]
pub struct MemberDescriptor {
    name: &'static str,
    kind: MemberKind,
    declared_type: TypeFn,
    read: ReadFn,
    index_parameters: usize,
}

impl MemberDescriptor {
    pub fn new(name: &'static str, kind: MemberKind, declared_type: TypeFn, read: ReadFn) -> Self {
        Self {
            name,
            kind,
            declared_type,
            read,
            index_parameters: 0,
        }
    }

    /// Mark the member as taking index parameters (a subscript accessor)
    pub fn with_index_parameters(mut self, count: usize) -> Self {
        self.index_parameters = count;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn declared_type(&self) -> TypeDescriptor {
        (self.declared_type)()
    }

    pub fn is_indexed(&self) -> bool {
        self.index_parameters > 0
    }

    /// Read the member's value from an instance of its owner
    pub fn read<'a>(&self, instance: &'a dyn Any) -> Result<MemberValue<'a>> {
        (self.read)(instance)
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("index_parameters", &self.index_parameters)
            .finish()
    }
}
