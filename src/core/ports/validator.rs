use std::fmt;
use std::sync::Arc;

use crate::core::values::{Value, ValueMap};

use super::namespace::PortNamespace;

/// Result of a custom validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The value is acceptable
    Pass,
    /// The value is rejected with the generic failure message
    Fail,
    /// The validator's own `(valid, message)` pair, propagated verbatim
    Report(bool, Option<String>),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass | Verdict::Report(true, _))
    }
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// A validator returning nothing accepts the value
impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Verdict::Pass
    }
}

impl From<(bool, Option<String>)> for Verdict {
    fn from((valid, message): (bool, Option<String>)) -> Self {
        Verdict::Report(valid, message)
    }
}

impl From<(bool, String)> for Verdict {
    fn from((valid, message): (bool, String)) -> Self {
        Verdict::Report(valid, Some(message))
    }
}

impl From<(bool, &str)> for Verdict {
    fn from((valid, message): (bool, &str)) -> Self {
        Verdict::Report(valid, Some(message.to_string()))
    }
}

impl From<Result<(), String>> for Verdict {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Verdict::Pass,
            Err(message) => Verdict::Report(false, Some(message)),
        }
    }
}

type ValueCheck = dyn Fn(&Value) -> Verdict + Send + Sync;
type NamespaceCheck = dyn Fn(&PortNamespace, &ValueMap) -> Verdict + Send + Sync;

/// Custom check attached to a leaf port
///
/// The closure is shared between clones; it holds no mutable state.
#[derive(Clone)]
pub struct Validator(Arc<ValueCheck>);

impl Validator {
    pub fn new<F, R>(check: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Validator(Arc::new(move |value: &Value| -> Verdict { check(value).into() }))
    }

    pub fn check(&self, value: &Value) -> Verdict {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Custom check attached to a port namespace
///
/// Unlike a leaf validator it sees the namespace itself along with the
/// complete value map handed to `validate`.
#[derive(Clone)]
pub struct NamespaceValidator(Arc<NamespaceCheck>);

impl NamespaceValidator {
    pub fn new<F, R>(check: F) -> Self
    where
        F: Fn(&PortNamespace, &ValueMap) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        NamespaceValidator(Arc::new(
            move |namespace: &PortNamespace, values: &ValueMap| -> Verdict { check(namespace, values).into() },
        ))
    }

    pub fn check(&self, namespace: &PortNamespace, values: &ValueMap) -> Verdict {
        (self.0)(namespace, values)
    }
}

impl fmt::Debug for NamespaceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NamespaceValidator(..)")
    }
}
