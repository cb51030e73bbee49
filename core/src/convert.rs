//! String-to-typed-value conversion.
//!
//! [`convert`] turns a raw token into a [`Value`] according to the declared
//! [`ValueType`], failing with a [`ParseError::ConversionFailure`] that names
//! the option title, the raw token, and the target type. Integer syntax is
//! pluggable through [`NumericSyntax`]: plain decimal, fixed-radix, or
//! magnitude-suffixed (`4k`, `2m`, `1g`).

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, ParseError};
use crate::registry::ConverterRegistry;
use crate::value::{FloatWidth, Value, ValueType};

/// Integer parsing syntax selected by the parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumericSyntax {
    /// Plain base-10 parsing (the default).
    #[default]
    Decimal,
    /// Fixed-radix parsing (binary, octal, hex, or any radix 2–36).
    Radix(u32),
    /// Decimal digits with an optional magnitude suffix `k`/`m`/`g`/`t`
    /// (case-insensitive); each step multiplies by `base` (1000 or 1024).
    Scaled { base: u32 },
}

impl NumericSyntax {
    /// Checks the syntax parameters at descriptor-build time.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        match self {
            NumericSyntax::Decimal => Ok(()),
            NumericSyntax::Radix(radix) if (2..=36).contains(radix) => Ok(()),
            NumericSyntax::Radix(radix) => Err(DefinitionError::InvalidConfiguration {
                detail: format!("numeric radix {radix} is outside 2..=36"),
            }),
            NumericSyntax::Scaled { base } if *base == 1000 || *base == 1024 => Ok(()),
            NumericSyntax::Scaled { base } => Err(DefinitionError::InvalidConfiguration {
                detail: format!("magnitude base {base} must be 1000 or 1024"),
            }),
        }
    }
}

/// Everything conversion needs beyond the raw string: the configured integer
/// syntax and an optional registry for custom types.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertContext<'a> {
    pub numeric: NumericSyntax,
    pub registry: Option<&'a ConverterRegistry>,
}

/// Converts `raw` to the declared `target` type.
///
/// # Examples
///
/// ```
/// use argot_core::{convert, ConvertContext, IntWidth, Value, ValueType};
///
/// let ctx = ConvertContext::default();
/// let v = convert("count", &ValueType::Int(IntWidth::I32), "42", &ctx).unwrap();
/// assert_eq!(v, Value::Int(42));
///
/// // Out-of-width values fail instead of truncating.
/// assert!(convert("count", &ValueType::Int(IntWidth::I8), "300", &ctx).is_err());
/// ```
pub fn convert(
    title: &str,
    target: &ValueType,
    raw: &str,
    ctx: &ConvertContext<'_>,
) -> Result<Value, ParseError> {
    let failure = || ParseError::ConversionFailure {
        title: title.to_string(),
        target: target.clone(),
        raw: raw.to_string(),
    };

    match target {
        ValueType::Str => Ok(Value::Str(raw.to_string())),
        ValueType::Bool => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(failure())
            }
        }
        ValueType::Int(width) => {
            let parsed = parse_integer(raw, ctx.numeric).ok_or_else(failure)?;
            let (min, max) = width.bounds();
            if parsed < min || parsed > max {
                return Err(failure());
            }
            Ok(Value::Int(parsed as i64))
        }
        ValueType::Uint(width) => {
            let parsed = parse_unsigned(raw, ctx.numeric).ok_or_else(failure)?;
            if parsed > width.max() {
                return Err(failure());
            }
            Ok(Value::Uint(parsed as u64))
        }
        ValueType::Float(width) => {
            let parsed: f64 = raw.parse().map_err(|_| failure())?;
            if *width == FloatWidth::F32 && parsed.is_finite() && !(parsed as f32).is_finite() {
                return Err(failure());
            }
            Ok(Value::Float(parsed))
        }
        ValueType::Enum(variants) => {
            if variants.iter().any(|v| v == raw) {
                Ok(Value::Enum(raw.to_string()))
            } else {
                Err(failure())
            }
        }
        ValueType::Custom(name) => match ctx.registry.and_then(|r| r.convert(name, raw)) {
            Some(Ok(value)) => Ok(value),
            _ => Err(failure()),
        },
    }
}

fn parse_integer(raw: &str, syntax: NumericSyntax) -> Option<i128> {
    match syntax {
        NumericSyntax::Decimal => raw.parse::<i128>().ok(),
        NumericSyntax::Radix(radix) => i128::from_str_radix(raw, radix).ok(),
        NumericSyntax::Scaled { base } => {
            let (digits, exponent) = split_magnitude(raw)?;
            let value = digits.parse::<i128>().ok()?;
            apply_magnitude(value, base, exponent)
        }
    }
}

fn parse_unsigned(raw: &str, syntax: NumericSyntax) -> Option<u128> {
    match syntax {
        NumericSyntax::Decimal => raw.parse::<u128>().ok(),
        NumericSyntax::Radix(radix) => u128::from_str_radix(raw, radix).ok(),
        NumericSyntax::Scaled { base } => {
            let (digits, exponent) = split_magnitude(raw)?;
            let value = digits.parse::<u128>().ok()?;
            let multiplier = (base as u128).checked_pow(exponent)?;
            value.checked_mul(multiplier)
        }
    }
}

/// Splits `4k` into (`4`, 1), `2m` into (`2`, 2), etc. A bare number has
/// exponent 0. Returns `None` for an unknown suffix or empty digit part.
fn split_magnitude(raw: &str) -> Option<(&str, u32)> {
    let last = raw.chars().last()?;
    let exponent = match last.to_ascii_lowercase() {
        'k' => 1,
        'm' => 2,
        'g' => 3,
        't' => 4,
        _ if last.is_ascii_digit() => return Some((raw, 0)),
        _ => return None,
    };
    let digits = &raw[..raw.len() - last.len_utf8()];
    if digits.is_empty() || digits == "-" {
        return None;
    }
    Some((digits, exponent))
}

fn apply_magnitude(value: i128, base: u32, exponent: u32) -> Option<i128> {
    let multiplier = (base as i128).checked_pow(exponent)?;
    value.checked_mul(multiplier)
}
