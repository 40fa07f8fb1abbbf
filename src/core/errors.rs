use thiserror::Error;

use crate::core::values::{ValidType, ValueType};

/// Outcome of a failed `validate` call
///
/// These are reported back to the caller, never raised. The display text is
/// the message surfaced to the workflow author.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required port received no value
    #[error("required value was not provided for '{port}'")]
    RequiredMissing { port: String },
    /// The value is not an instance of the port's valid type
    #[error("value '{port}' is not of the right type. Got '{actual}', expected '{expected}'")]
    TypeMismatch {
        port: String,
        actual: ValueType,
        expected: ValidType,
    },
    /// A custom validator returned plain `false`
    #[error("Value failed validation")]
    ValidatorRejected { port: String },
    /// A custom validator returned its own verdict and message
    ///
    /// Without a message it displays like [`ValidatorRejected`](Self::ValidatorRejected).
    #[error("{}", message.as_deref().unwrap_or("Value failed validation"))]
    Custom { message: Option<String> },
    /// Keys left over in a namespace that does not accept dynamic ports
    #[error("Unexpected ports {keys:?}, for a non dynamic namespace '{namespace}'")]
    UnexpectedPorts { namespace: String, keys: Vec<String> },
    /// A dynamic value is not of the namespace's valid type
    #[error("Invalid type {actual} for dynamic port value '{key}': expected {expected}")]
    DynamicTypeMismatch {
        namespace: String,
        key: String,
        actual: ValueType,
        expected: ValidType,
    },
    /// A namespace received a value that is not a mapping
    #[error("value for port namespace '{namespace}' must be a mapping, got '{actual}'")]
    NotAMapping { namespace: String, actual: ValueType },
}

impl ValidationError {
    /// The `(valid, message)` pair form of this failure
    ///
    /// A validator's own pair is passed through unchanged, message included.
    pub fn as_pair(&self) -> (bool, Option<String>) {
        match self {
            ValidationError::Custom { message } => (false, message.clone()),
            other => (false, Some(other.to_string())),
        }
    }
}

/// Schema authoring errors
///
/// Raised immediately while a schema is being built; they indicate a broken
/// definition and are not retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortError {
    #[error("Invalid default value for '{port}': {reason}")]
    InvalidDefault {
        port: String,
        reason: ValidationError,
    },
    #[error("input port '{port}' has no default")]
    NoDefault { port: String },
    #[error("name cannot be an empty string")]
    EmptyPath,
    #[error("invalid port path '{path}': empty segment")]
    InvalidPath { path: String },
    #[error("invalid port name '{name}': names must be non-empty and must not contain '.'")]
    InvalidName { name: String },
    #[error("port '{port}' does not exist in port namespace '{namespace}'")]
    PortNotFound { namespace: String, port: String },
    #[error("the name '{port}' in '{namespace}' already contains a Port")]
    NotANamespace { namespace: String, port: String },
    #[error("a valid type must name at least one type")]
    EmptyValidType,
    #[error("exclude and include are mutually exclusive")]
    ExcludeIncludeConflict,
    #[error("the namespace_options {}, is not a supported PortNamespace property", keys.join(", "))]
    UnsupportedNamespaceOptions { keys: Vec<String> },
    #[error("invalid value for namespace option '{key}': {reason}")]
    InvalidNamespaceOption { key: String, reason: String },
    #[error("path '{path}' is used both as a value and as a namespace")]
    PathCollision { path: String },
    #[error("the process spec is sealed and can no longer be modified")]
    Sealed,
    #[error("failed to build validation thread pool: {0}")]
    ThreadPool(String),
}

/// Error for operations that resolve a schema path and then validate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error(transparent)]
    Schema(#[from] PortError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let missing = ValidationError::RequiredMissing {
            port: "n".to_string(),
        };
        assert_eq!(missing.to_string(), "required value was not provided for 'n'");
        assert_eq!(missing.as_pair().0, false);

        let mismatch = ValidationError::TypeMismatch {
            port: "n".to_string(),
            actual: ValueType::Str,
            expected: ValidType::of(ValueType::Int),
        };
        assert_eq!(
            mismatch.to_string(),
            "value 'n' is not of the right type. Got 'str', expected 'int'"
        );

        let unsupported = PortError::UnsupportedNamespaceOptions {
            keys: vec!["name".to_string(), "colour".to_string()],
        };
        assert!(unsupported.to_string().contains("name, colour"));
    }

    #[test]
    fn test_custom_message_is_verbatim() {
        let custom = ValidationError::Custom {
            message: Some("n must be positive".to_string()),
        };
        assert_eq!(custom.to_string(), "n must be positive");
        assert_eq!(custom.as_pair(), (false, Some("n must be positive".to_string())));

        let bare = ValidationError::Custom { message: None };
        assert_eq!(bare.as_pair(), (false, None));
        assert_eq!(bare.to_string(), "Value failed validation");
    }
}
