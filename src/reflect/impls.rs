//! `Describe` implementations for std, chrono, uuid and rust_decimal types

use std::any::Any;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::{construct_default, Describe, IntegerWidth, TypeDescriptor, TypeKind};

// =============================================================================
// Renderers
// =============================================================================

fn render_literal<T: Serialize + Any>(value: &dyn Any) -> Option<Value> {
    let value = value.downcast_ref::<T>()?;
    match serde_json::to_value(value).ok()? {
        Value::Null => None,
        literal => Some(literal),
    }
}

fn render_float<T: Into<f64> + Copy + Any>(value: &dyn Any) -> Option<Value> {
    let value: f64 = (*value.downcast_ref::<T>()?).into();
    serde_json::Number::from_f64(value).map(Value::Number)
}

fn render_decimal(value: &dyn Any) -> Option<Value> {
    let value = value.downcast_ref::<Decimal>()?;
    value
        .normalize()
        .to_string()
        .parse::<serde_json::Number>()
        .ok()
        .map(Value::Number)
}

fn render_utc(value: &dyn Any) -> Option<Value> {
    let value = value.downcast_ref::<DateTime<Utc>>()?;
    Some(Value::from(value.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
}

fn render_fixed_offset(value: &dyn Any) -> Option<Value> {
    let value = value.downcast_ref::<DateTime<FixedOffset>>()?;
    Some(Value::from(value.to_rfc3339_opts(SecondsFormat::AutoSi, false)))
}

fn render_naive(value: &dyn Any) -> Option<Value> {
    let value = value.downcast_ref::<NaiveDateTime>()?;
    Some(Value::from(value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))
}

fn render_duration(value: &dyn Any) -> Option<Value> {
    value
        .downcast_ref::<Duration>()
        .map(|duration| Value::from(format_duration(*duration)))
}

/// Formats a duration as `[d.]hh:mm:ss[.fffffff]`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    // 100ns ticks
    let ticks = duration.subsec_nanos() / 100;

    let mut formatted = String::new();
    if days > 0 {
        formatted.push_str(&format!("{}.", days));
    }
    formatted.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if ticks > 0 {
        formatted.push_str(&format!(".{:07}", ticks));
    }
    formatted
}

// =============================================================================
// Scalars
// =============================================================================

macro_rules! describe_scalar {
    ($($ty:ty => $name:literal, $kind:expr, $render:expr;)*) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::leaf::<$ty>($name, $kind, $render)
                        .constructible(construct_default::<$ty>)
                }
            }
        )*
    };
}

describe_scalar! {
    String => "String", TypeKind::Text, render_literal::<String>;
    char => "char", TypeKind::Character, render_literal::<char>;
    Uuid => "Uuid", TypeKind::Uuid, render_literal::<Uuid>;
    bool => "bool", TypeKind::Boolean, render_literal::<bool>;
    i8 => "i8", TypeKind::Integer(IntegerWidth::I8), render_literal::<i8>;
    u8 => "u8", TypeKind::Integer(IntegerWidth::U8), render_literal::<u8>;
    i16 => "i16", TypeKind::Integer(IntegerWidth::I16), render_literal::<i16>;
    u16 => "u16", TypeKind::Integer(IntegerWidth::U16), render_literal::<u16>;
    i32 => "i32", TypeKind::Integer(IntegerWidth::I32), render_literal::<i32>;
    u32 => "u32", TypeKind::Integer(IntegerWidth::U32), render_literal::<u32>;
    i64 => "i64", TypeKind::Integer(IntegerWidth::I64), render_literal::<i64>;
    u64 => "u64", TypeKind::Integer(IntegerWidth::U64), render_literal::<u64>;
    isize => "isize", TypeKind::Integer(IntegerWidth::I64), render_literal::<isize>;
    usize => "usize", TypeKind::Integer(IntegerWidth::U64), render_literal::<usize>;
    f32 => "f32", TypeKind::Float, render_float::<f32>;
    f64 => "f64", TypeKind::Double, render_float::<f64>;
    Decimal => "Decimal", TypeKind::Decimal, render_decimal;
    DateTime<Utc> => "DateTime", TypeKind::Timestamp, render_utc;
    DateTime<FixedOffset> => "DateTime", TypeKind::Timestamp, render_fixed_offset;
    NaiveDateTime => "NaiveDateTime", TypeKind::Timestamp, render_naive;
    Duration => "Duration", TypeKind::Duration, render_duration;
}

// =============================================================================
// Wrappers
// =============================================================================

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::nullable::<Option<T>>("Option", T::describe)
            .with_generic_args(vec![T::describe])
            .constructible(construct_default::<Option<T>>)
    }

    fn reflect(&self) -> Option<&dyn Any> {
        self.as_ref().and_then(T::reflect)
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe().seen_through::<Box<T>>()
    }

    fn reflect(&self) -> Option<&dyn Any> {
        T::reflect(self)
    }
}

impl<T: Describe> Describe for Arc<T> {
    fn describe() -> TypeDescriptor {
        T::describe().seen_through::<Arc<T>>()
    }

    fn reflect(&self) -> Option<&dyn Any> {
        T::reflect(self)
    }
}

// =============================================================================
// Sequences
// =============================================================================

macro_rules! describe_sequence {
    ($($seq:ident => $name:literal;)*) => {
        $(
            impl<T: Describe> Describe for $seq<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::sequence::<$seq<T>>($name, T::describe)
                        .with_generic_args(vec![T::describe])
                        .constructible(construct_default::<$seq<T>>)
                }
            }
        )*
    };
}

describe_sequence! {
    Vec => "Vec";
    VecDeque => "VecDeque";
    HashSet => "HashSet";
    BTreeSet => "BTreeSet";
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array::<[T; N]>("Array", T::describe)
    }
}
