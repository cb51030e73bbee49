//! Typed values and value types for option and argument conversion.
//!
//! [`ValueType`] describes what an option accepts; [`Value`] is the converted
//! result. The narrowing relation ([`ValueType::narrows`]) backs the
//! override resolver: a derived declaration may shrink the set of accepted
//! values but never grow it.

use serde::{Deserialize, Serialize};

/// Signed integer widths supported by [`ValueType::Int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
}

impl IntWidth {
    /// Inclusive bounds of the width as an `i128` pair.
    pub fn bounds(self) -> (i128, i128) {
        match self {
            IntWidth::I8 => (i8::MIN as i128, i8::MAX as i128),
            IntWidth::I16 => (i16::MIN as i128, i16::MAX as i128),
            IntWidth::I32 => (i32::MIN as i128, i32::MAX as i128),
            IntWidth::I64 => (i64::MIN as i128, i64::MAX as i128),
        }
    }

    fn bits(self) -> u8 {
        match self {
            IntWidth::I8 => 8,
            IntWidth::I16 => 16,
            IntWidth::I32 => 32,
            IntWidth::I64 => 64,
        }
    }
}

/// Unsigned integer widths supported by [`ValueType::Uint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UintWidth {
    U8,
    U16,
    U32,
    U64,
}

impl UintWidth {
    /// Inclusive upper bound of the width as a `u128`.
    pub fn max(self) -> u128 {
        match self {
            UintWidth::U8 => u8::MAX as u128,
            UintWidth::U16 => u16::MAX as u128,
            UintWidth::U32 => u32::MAX as u128,
            UintWidth::U64 => u64::MAX as u128,
        }
    }

    fn bits(self) -> u8 {
        match self {
            UintWidth::U8 => 8,
            UintWidth::U16 => 16,
            UintWidth::U32 => 32,
            UintWidth::U64 => 64,
        }
    }
}

/// Floating-point widths supported by [`ValueType::Float`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Declared type of the values an option or argument accepts.
///
/// # Examples
///
/// ```
/// use argot_core::{IntWidth, ValueType};
///
/// // A 32-bit integer narrows a 64-bit one, never the reverse.
/// assert!(ValueType::Int(IntWidth::I32).narrows(&ValueType::Int(IntWidth::I64)));
/// assert!(!ValueType::Int(IntWidth::I64).narrows(&ValueType::Int(IntWidth::I32)));
///
/// // An enumeration narrows to a subset of its variants.
/// let base = ValueType::Enum(vec!["a".into(), "b".into(), "c".into()]);
/// let sub = ValueType::Enum(vec!["a".into(), "c".into()]);
/// assert!(sub.narrows(&base));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// Raw string, passed through unchanged (the default).
    #[default]
    Str,
    /// Case-insensitive `true` / `false`.
    Bool,
    /// Signed integer of the given width, overflow-checked.
    Int(IntWidth),
    /// Unsigned integer of the given width, overflow-checked.
    Uint(UintWidth),
    /// Floating-point number of the given width.
    Float(FloatWidth),
    /// One of a fixed set of case-sensitive names.
    Enum(Vec<String>),
    /// A host-registered type converted through the converter registry.
    Custom(String),
}

impl ValueType {
    /// Whether `self` is the same type as `base` or a subtype of it.
    ///
    /// Narrowing holds for: equal types; a narrower-or-equal integer width of
    /// the same signedness; an unsigned width into a strictly wider signed
    /// width; `F32` into `F64`; an enum whose variants are a subset of the
    /// base's.
    pub fn narrows(&self, base: &ValueType) -> bool {
        match (self, base) {
            (a, b) if a == b => true,
            (ValueType::Int(a), ValueType::Int(b)) => a.bits() <= b.bits(),
            (ValueType::Uint(a), ValueType::Uint(b)) => a.bits() <= b.bits(),
            (ValueType::Uint(a), ValueType::Int(b)) => a.bits() < b.bits(),
            (ValueType::Float(FloatWidth::F32), ValueType::Float(FloatWidth::F64)) => true,
            (ValueType::Enum(sub), ValueType::Enum(sup)) => {
                sub.iter().all(|variant| sup.contains(variant))
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Str => f.write_str("string"),
            ValueType::Bool => f.write_str("boolean"),
            ValueType::Int(width) => write!(f, "i{}", width.bits()),
            ValueType::Uint(width) => write!(f, "u{}", width.bits()),
            ValueType::Float(FloatWidth::F32) => f.write_str("f32"),
            ValueType::Float(FloatWidth::F64) => f.write_str("f64"),
            ValueType::Enum(variants) => write!(f, "one of {variants:?}"),
            ValueType::Custom(name) => write!(f, "custom type '{name}'"),
        }
    }
}

/// A converted option or argument value.
///
/// # Examples
///
/// ```
/// use argot_core::Value;
///
/// let v = Value::Int(42);
/// assert_eq!(v.as_i64(), Some(42));
/// assert_eq!(v.as_str(), None);
/// assert_eq!(v.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    /// A matched enumeration variant name.
    Enum(String),
    /// A value produced by a registered custom converter. `repr` keeps the
    /// converter's canonical rendering for display and equality.
    Custom { type_name: String, repr: String },
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Uint(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Numeric-or-lexicographic comparison used by range restrictions.
    ///
    /// Values of different kinds compare through `f64` when both are numeric;
    /// strings compare lexicographically; anything else is unordered.
    pub fn compare(&self, other: &Value) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(s) | Value::Enum(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Uint(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Custom { repr, .. } => f.write_str(repr),
        }
    }
}
