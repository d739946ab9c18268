//! Shared value and signature types.

use crate::error::ArgumentError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dynamic value passed to and returned from method layers
pub type Value = serde_json::Value;

/// Coarse kind of a [`Value`], used in method signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
    /// Matches every value
    Any,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        *self == ValueKind::Any || *self == ValueKind::of(value)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Any => "any",
        };
        f.write_str(name)
    }
}

/// Declared shape of a method: parameter and result kinds
///
/// The record context is implicit and not part of the parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    #[serde(default)]
    pub params: Vec<ValueKind>,
    #[serde(default)]
    pub results: Vec<ValueKind>,
}

impl MethodSignature {
    pub fn new(params: &[ValueKind], results: &[ValueKind]) -> Self {
        Self {
            params: params.to_vec(),
            results: results.to_vec(),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Validate arguments against the declared parameters before invoking
    pub fn check_args(&self, args: &[Value]) -> Result<(), ArgumentError> {
        if args.len() != self.params.len() {
            return Err(ArgumentError::Arity {
                expected: self.params.len(),
                actual: args.len(),
            });
        }
        for (index, (kind, arg)) in self.params.iter().zip(args).enumerate() {
            if !kind.accepts(arg) {
                return Err(ArgumentError::Kind {
                    index,
                    expected: *kind,
                    actual: ValueKind::of(arg),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(kinds: &[ValueKind]) -> String {
            kinds
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
        write!(f, "({}) -> ({})", join(&self.params), join(&self.results))
    }
}
