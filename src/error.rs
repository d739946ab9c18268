//! Error types for the layered dispatch engine.

use crate::types::ValueKind;
use thiserror::Error;

/// Dispatch-time errors
///
/// The first three variants are usage errors: they point at a defect in the
/// registered layers or their callers and are not worth retrying.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown method '{method}' in model '{model}'")]
    UnknownMethod { model: String, method: String },

    #[error("Empty call stack: parent() called outside of a method in model '{model}'")]
    EmptyCallStack { model: String },

    #[error("No parent layer: parent() called on the base layer of '{model}.{method}'")]
    NoParentLayer { model: String, method: String },

    /// Failure raised by a layer implementation itself
    #[error(transparent)]
    Layer(#[from] anyhow::Error),
}

impl DispatchError {
    /// True for misuse of the dispatch API (as opposed to layer failures)
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, DispatchError::Layer(_))
    }
}

/// Registration-time errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Signature mismatch for '{model}.{method}': chain declares {expected}, layer declares {actual}")]
    SignatureMismatch {
        model: String,
        method: String,
        expected: String,
        actual: String,
    },

    #[error("Registry is sealed: cannot register '{model}.{method}'")]
    Sealed { model: String, method: String },
}

/// Argument validation errors reported by `MethodSignature::check_args`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("Expected {expected} argument(s), got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("Argument {index}: expected {expected}, got {actual}")]
    Kind {
        index: usize,
        expected: ValueKind,
        actual: ValueKind,
    },
}

/// Configuration and logging setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
