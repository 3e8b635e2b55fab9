//! Error arguments and their rendering.
//!
//! An error definition carries named args; a placeholder whose name
//! matches an arg is replaced by the arg's rendering, steered by the
//! placeholder's parameters (`format` for numbers, `case` for text).
//! Unknown parameters are ignored and an unmatched placeholder stays
//! literal.

use std::borrow::Cow;

use convert_case::{Case, Casing};
use indexmap::IndexMap;

/// Numeric argument value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl From<i64> for NumberValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for NumberValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u64> for NumberValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for NumberValue {
    fn from(value: u32) -> Self {
        Self::UInt(value.into())
    }
}

impl From<usize> for NumberValue {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f64> for NumberValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One named argument of an error definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Number; placeholder may request a fixed-point `format` pattern
    /// (`0.00` renders two fraction digits).
    Number {
        name: Cow<'static, str>,
        value: NumberValue,
    },
    /// Text; placeholder may request `case=upper`, `case=lower` or
    /// `case=title`.
    Text {
        name: Cow<'static, str>,
        value: String,
    },
    /// A type name, rendered verbatim.
    Type {
        name: Cow<'static, str>,
        value: &'static str,
    },
}

impl Arg {
    pub fn number(name: impl Into<Cow<'static, str>>, value: impl Into<NumberValue>) -> Self {
        Self::Number {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn text(name: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn type_name(name: impl Into<Cow<'static, str>>, value: &'static str) -> Self {
        Self::Type {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Number { name, .. } | Self::Text { name, .. } | Self::Type { name, .. } => name,
        }
    }

    /// Render this arg under the placeholder's parameters.
    pub fn render(&self, params: &IndexMap<String, String>) -> String {
        match self {
            Self::Number { value, .. } => match params.get("format") {
                Some(pattern) => format_number(*value, pattern),
                None => match value {
                    NumberValue::Int(v) => v.to_string(),
                    NumberValue::UInt(v) => v.to_string(),
                    NumberValue::Float(v) => v.to_string(),
                },
            },
            Self::Text { value, .. } => match params.get("case").map(String::as_str) {
                Some("upper") => value.to_uppercase(),
                Some("lower") => value.to_lowercase(),
                Some("title") => value.to_case(Case::Title),
                _ => value.clone(),
            },
            Self::Type { value, .. } => (*value).to_string(),
        }
    }
}

/// Fixed-point rendering: the fraction-digit count comes from the pattern's
/// decimal part (`0.00` → 2, `0` → 0). Patterns outside that family fall
/// back to the plain rendering.
fn format_number(value: NumberValue, pattern: &str) -> String {
    let precision = match pattern.split_once('.') {
        Some((whole, frac))
            if whole.chars().all(|c| c == '0')
                && !whole.is_empty()
                && frac.chars().all(|c| c == '0')
                && !frac.is_empty() =>
        {
            Some(frac.len())
        }
        None if !pattern.is_empty() && pattern.chars().all(|c| c == '0') => Some(0),
        _ => None,
    };
    match (precision, value) {
        (Some(precision), NumberValue::Int(v)) => format!("{:.*}", precision, v as f64),
        (Some(precision), NumberValue::UInt(v)) => format!("{:.*}", precision, v as f64),
        (Some(precision), NumberValue::Float(v)) => format!("{:.*}", precision, v),
        (None, NumberValue::Int(v)) => v.to_string(),
        (None, NumberValue::UInt(v)) => v.to_string(),
        (None, NumberValue::Float(v)) => v.to_string(),
    }
}
