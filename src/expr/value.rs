//! Runtime values of the expression language

use crate::error::{ExpressionError, ExpressionResult};
use std::fmt;

/// A value produced by evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Double(f64),
    String(String),
    Boolean(bool),
}

impl Value {
    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Boolean(_) => "bool",
        }
    }

    /// Borrow the text of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is an int or a double
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Double(_))
    }

    /// Convert to a boolean. Strings convert when they read `true` or
    /// `false`, ignoring case.
    pub fn to_bool(&self) -> ExpressionResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::String(s) => parse_bool(s).ok_or_else(|| {
                ExpressionError::Type(format!("'{}' is not a valid boolean", s))
            }),
            other => Err(ExpressionError::Type(format!(
                "cannot convert {} '{}' to bool",
                other.type_name(),
                other
            ))),
        }
    }

    /// Convert to an integer. Doubles are truncated toward zero.
    pub fn to_int(&self) -> ExpressionResult<i64> {
        match self {
            Value::Integer(i) => Ok(*i),
            Value::Double(d) if d.is_finite() => Ok(d.trunc() as i64),
            Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
                ExpressionError::Type(format!("'{}' is not a valid int", s))
            }),
            other => Err(ExpressionError::Type(format!(
                "cannot convert {} '{}' to int",
                other.type_name(),
                other
            ))),
        }
    }

    /// Convert to a double
    pub fn to_double(&self) -> ExpressionResult<f64> {
        match self {
            Value::Integer(i) => Ok(*i as f64),
            Value::Double(d) => Ok(*d),
            Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                ExpressionError::Type(format!("'{}' is not a valid double", s))
            }),
            Value::Boolean(_) => Err(ExpressionError::Type(format!(
                "cannot convert bool '{}' to double",
                self
            ))),
        }
    }
}

/// Parse `true`/`false`, ignoring case and surrounding whitespace
pub fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        let text = if d > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        // shortest round-trip form, never locale dependent
        format!("{}", d)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Double(d) => f.write_str(&format_double(*d)),
            Value::String(s) => f.write_str(s),
            Value::Boolean(true) => f.write_str("True"),
            Value::Boolean(false) => f.write_str("False"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
