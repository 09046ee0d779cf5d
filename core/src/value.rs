//! Runtime value model and the type coercion matrix.
//!
//! Tokenized input arrives as strings, numbers, or booleans; each target
//! field declares one of the same three kinds. [`coerce`] converts between
//! them with a fixed matrix and reports impossible conversions as a
//! [`Mismatch`] value rather than a panic, so the dispatcher can collect
//! every failing field before replying.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three value kinds a field can declare.
///
/// # Examples
///
/// ```
/// use parley_core::ValueKind;
///
/// assert_eq!(ValueKind::Number.to_string(), "number");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Free-form text.
    String,
    /// A number (stored as `f64`, matching the tokenizer's inference).
    Number,
    /// A boolean.
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
        };
        f.write_str(label)
    }
}

/// A runtime value produced by the tokenizer or bound to a field.
///
/// # Examples
///
/// ```
/// use parley_core::{Value, ValueKind};
///
/// let v = Value::from(10.0);
/// assert_eq!(v.kind(), ValueKind::Number);
/// assert_eq!(v.to_string(), "10");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A string value.
    Str(String),
    /// A numeric value.
    Num(f64),
    /// A boolean value.
    Bool(bool),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::String,
            Value::Num(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
        }
    }

    /// Truthiness under the conventions of the original host environment:
    /// `false`, `0`, and the empty string are falsy, everything else truthy.
    ///
    /// Used for the bare `help`/`version` markers, which are set by any
    /// supplied value except an explicitly falsy one.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Num(n) => *n != 0.0,
            Value::Bool(b) => *b,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            // Integral numbers render without a fractional part ("10", not
            // "10.0"), matching how they were typed in the sentence.
            Value::Num(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Num(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A failed coercion: the provided and expected kinds.
///
/// Returned as a plain value, never panicked, so the dispatcher can gather
/// every mismatch across all fields before emitting a single reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Kind of the value the user supplied.
    pub provided: ValueKind,
    /// Kind the field was declared with.
    pub expected: ValueKind,
}

/// Converts a value to the requested kind.
///
/// The matrix:
///
/// - string → string, number → number, boolean → boolean: identity.
/// - string → number: always a mismatch. Numeric-looking tokens are already
///   inferred as numbers by the tokenizer, so a string here means the user
///   typed something non-numeric.
/// - string → boolean: `"true"`/`"false"` (any casing) convert; anything
///   else is a mismatch. This makes `--opt=true` behave like `--opt`.
/// - number → string: formatted via [`Value`]'s `Display`.
/// - number → boolean: only `0` and `1` convert.
/// - boolean → string or number: always a mismatch; silently turning `true`
///   into `"true"` or `1` would hide user mistakes.
///
/// # Examples
///
/// ```
/// use parley_core::{Value, ValueKind, coerce};
///
/// assert_eq!(
///     coerce(Value::from("TRUE"), ValueKind::Boolean),
///     Ok(Value::Bool(true)),
/// );
/// assert!(coerce(Value::from("five"), ValueKind::Number).is_err());
/// ```
pub fn coerce(value: Value, target: ValueKind) -> Result<Value, Mismatch> {
    let provided = value.kind();
    let mismatch = Mismatch {
        provided,
        expected: target,
    };

    match (value, target) {
        (v @ Value::Str(_), ValueKind::String) => Ok(v),
        (Value::Str(_), ValueKind::Number) => Err(mismatch),
        (Value::Str(s), ValueKind::Boolean) => match s.to_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(mismatch),
        },
        (v @ Value::Num(_), ValueKind::String) => Ok(Value::Str(v.to_string())),
        (v @ Value::Num(_), ValueKind::Number) => Ok(v),
        (Value::Num(n), ValueKind::Boolean) => {
            if n == 0.0 {
                Ok(Value::Bool(false))
            } else if n == 1.0 {
                Ok(Value::Bool(true))
            } else {
                Err(mismatch)
            }
        }
        (v @ Value::Bool(_), ValueKind::Boolean) => Ok(v),
        (Value::Bool(_), _) => Err(mismatch),
    }
}
