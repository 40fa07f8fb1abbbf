use std::fmt;

use indexmap::IndexMap;
use log::debug;

use crate::core::errors::{PortError, ValidationError};
use crate::core::path;
use crate::core::values::{Slot, ValidType, Value, ValueMap};

use super::description::{NamespaceAttrs, NamespaceDescription};
use super::node::{Port, PortNode};
use super::options::NamespaceOptions;
use super::validator::{NamespaceValidator, Verdict};

/// A container of ports that is itself a port
///
/// Children are either leaf ports or further namespaces, which allows
/// arbitrary nesting addressed by dotted paths. A namespace owns its
/// children exclusively.
#[derive(Debug, Clone)]
pub struct PortNamespace {
    name: String,
    help: Option<String>,
    required: bool,
    validator: Option<NamespaceValidator>,
    valid_type: Option<ValidType>,
    default: Slot<Value>,
    dynamic: bool,
    ports: IndexMap<String, PortNode>,
}

impl PortNamespace {
    /// Create an empty, required, non-dynamic namespace
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            required: true,
            validator: None,
            valid_type: None,
            default: Slot::Unspecified,
            dynamic: false,
            ports: IndexMap::new(),
        }
    }

    /// Set the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set whether values for this namespace must be supplied
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Attach a validator that sees the whole value map
    pub fn with_validator(mut self, validator: NamespaceValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Constrain dynamic values to a type; this also makes the namespace dynamic
    pub fn with_valid_type(mut self, valid_type: impl Into<ValidType>) -> Self {
        self.set_valid_type(Some(valid_type.into()));
        self
    }

    /// Set the default value of the namespace
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Slot::Specified(default.into());
        self
    }

    /// Set whether undeclared keys are accepted
    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Add a child, for chained construction
    pub fn with_port(mut self, key: impl Into<String>, port: impl Into<PortNode>) -> Result<Self, PortError> {
        self.insert(key, port)?;
        Ok(self)
    }

    /// Get the namespace name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the help text, if any
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Replace the help text
    pub fn set_help(&mut self, help: Option<String>) {
        self.help = help;
    }

    /// Check if the namespace is required
    pub fn required(&self) -> bool {
        self.required
    }

    /// Change the required flag
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Get the namespace validator, if any
    pub fn validator(&self) -> Option<&NamespaceValidator> {
        self.validator.as_ref()
    }

    /// Replace the namespace validator
    pub fn set_validator(&mut self, validator: Option<NamespaceValidator>) {
        self.validator = validator;
    }

    /// Get the type constraint for dynamic values
    pub fn valid_type(&self) -> Option<&ValidType> {
        self.valid_type.as_ref()
    }

    /// Set the type accepted for dynamic values
    ///
    /// `Some` makes the namespace dynamic, `None` makes it static.
    pub fn set_valid_type(&mut self, valid_type: Option<ValidType>) {
        self.dynamic = valid_type.is_some();
        self.valid_type = valid_type;
    }

    /// Get the default, possibly unspecified
    pub fn default_value(&self) -> &Slot<Value> {
        &self.default
    }

    /// Replace the default
    pub fn set_default(&mut self, default: Slot<Value>) {
        self.default = default;
    }

    /// Check if a default was specified
    pub fn has_default(&self) -> bool {
        self.default.is_specified()
    }

    /// Check if undeclared keys are accepted
    pub fn dynamic(&self) -> bool {
        self.dynamic
    }

    /// Override the dynamic flag directly
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    /// Get all direct children in insertion order
    pub fn ports(&self) -> &IndexMap<String, PortNode> {
        &self.ports
    }

    /// Get a direct child by key
    pub fn get(&self, key: &str) -> Option<&PortNode> {
        self.ports.get(key)
    }

    /// Get a direct child by key, mutably
    pub fn get_mut(&mut self, key: &str) -> Option<&mut PortNode> {
        self.ports.get_mut(key)
    }

    /// Check if a direct child exists
    pub fn contains(&self, key: &str) -> bool {
        self.ports.contains_key(key)
    }

    /// Set a direct child, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, port: impl Into<PortNode>) -> Result<Option<PortNode>, PortError> {
        let key = key.into();
        path::check_name(&key)?;
        Ok(self.ports.insert(key, port.into()))
    }

    /// Remove a direct child
    pub fn remove(&mut self, key: &str) -> Option<PortNode> {
        self.ports.shift_remove(key)
    }

    /// Iterate over direct children in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, PortNode> {
        self.ports.iter()
    }

    /// Iterate over the keys of direct children
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ports.keys().map(|k| k.as_str())
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Check if the namespace has no children
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Resolve a (possibly dotted) path to a port
    ///
    /// Every segment but the last must resolve to a namespace.
    pub fn get_port(&self, path: &str) -> Result<&PortNode, PortError> {
        let (head, rest) = path::split_first(path)?;
        let port = self.ports.get(head).ok_or_else(|| PortError::PortNotFound {
            namespace: self.name.clone(),
            port: head.to_string(),
        })?;

        match (rest, port) {
            (None, port) => Ok(port),
            (Some(rest), PortNode::Namespace(namespace)) => namespace.get_port(rest),
            (Some(_), _) => Err(PortError::NotANamespace {
                namespace: self.name.clone(),
                port: head.to_string(),
            }),
        }
    }

    /// Mutable variant of [`get_port`](Self::get_port)
    pub fn get_port_mut(&mut self, path: &str) -> Result<&mut PortNode, PortError> {
        let (head, rest) = path::split_first(path)?;
        let name = self.name.clone();
        let port = self.ports.get_mut(head).ok_or_else(|| PortError::PortNotFound {
            namespace: name.clone(),
            port: head.to_string(),
        })?;

        match (rest, port) {
            (None, port) => Ok(port),
            (Some(rest), PortNode::Namespace(namespace)) => namespace.get_port_mut(rest),
            (Some(_), _) => Err(PortError::NotANamespace {
                namespace: name,
                port: head.to_string(),
            }),
        }
    }

    /// Get or create the namespace at `path`
    ///
    /// Missing intermediate namespaces are created bare. The terminal
    /// namespace is configured with `options` only when it is created; an
    /// existing one is returned unchanged. Fails without modifying the tree
    /// if any segment is occupied by a leaf port.
    pub fn create_port_namespace(
        &mut self,
        path: &str,
        options: NamespaceOptions,
    ) -> Result<&mut PortNamespace, PortError> {
        let segments = path::split(path)?;
        options.ensure_supported()?;
        self.check_namespace_path(&segments)?;

        let Some((terminal, parents)) = segments.split_last() else {
            return Err(PortError::EmptyPath);
        };

        let mut current = self;
        for segment in parents {
            current = current.child_namespace(segment, None)?;
        }
        current.child_namespace(terminal, Some(options))
    }

    fn check_namespace_path(&self, segments: &[&str]) -> Result<(), PortError> {
        let Some((head, rest)) = segments.split_first() else {
            return Ok(());
        };
        match self.ports.get(*head) {
            None => Ok(()),
            Some(PortNode::Namespace(namespace)) => namespace.check_namespace_path(rest),
            Some(_) => Err(PortError::NotANamespace {
                namespace: self.name.clone(),
                port: head.to_string(),
            }),
        }
    }

    fn child_namespace(
        &mut self,
        key: &str,
        options: Option<NamespaceOptions>,
    ) -> Result<&mut PortNamespace, PortError> {
        if !self.ports.contains_key(key) {
            let mut namespace = PortNamespace::new(key);
            if let Some(options) = options {
                let base = PortNamespace::new(key);
                options.apply(&mut namespace, &base)?;
            }
            debug!("creating port namespace '{}' in '{}'", key, self.name);
            self.insert(key, namespace)?;
        }

        let name = self.name.clone();
        match self.ports.get_mut(key) {
            Some(PortNode::Namespace(namespace)) => Ok(namespace),
            _ => Err(PortError::NotANamespace {
                namespace: name,
                port: key.to_string(),
            }),
        }
    }

    /// Validate a value map against this namespace
    ///
    /// Runs the namespace validator, then the declared ports, then the
    /// dynamic rules for any leftover keys, stopping at the first failure.
    /// A namespace that is not required accepts an empty map without looking
    /// at its children.
    pub fn validate(&self, values: Option<&ValueMap>) -> Result<(), ValidationError> {
        let empty = ValueMap::new();
        let values = values.unwrap_or(&empty);
        let mut remaining: IndexMap<&str, &Value> =
            values.iter().map(|(key, value)| (key.as_str(), value)).collect();

        if let Some(validator) = &self.validator {
            match validator.check(self, values) {
                Verdict::Pass | Verdict::Report(true, _) => {}
                Verdict::Fail => {
                    return Err(ValidationError::ValidatorRejected {
                        port: self.name.clone(),
                    })
                }
                Verdict::Report(false, message) => {
                    return Err(ValidationError::Custom { message })
                }
            }
        }

        if remaining.is_empty() && !self.required {
            return Ok(());
        }

        self.check_declared(&mut remaining)?;
        self.check_dynamic(&remaining)
    }

    /// Validate the declared ports only
    ///
    /// Returns the keys of `values` that no declared port claimed.
    pub fn validate_ports<'a>(&self, values: &'a ValueMap) -> Result<Vec<&'a str>, ValidationError> {
        let mut remaining: IndexMap<&str, &Value> =
            values.iter().map(|(key, value)| (key.as_str(), value)).collect();
        self.check_declared(&mut remaining)?;
        Ok(remaining.into_keys().collect())
    }

    /// Validate values against the dynamic rules of this namespace
    ///
    /// Every entry is treated as undeclared.
    pub fn validate_dynamic_ports(&self, values: &ValueMap) -> Result<(), ValidationError> {
        let remaining: IndexMap<&str, &Value> =
            values.iter().map(|(key, value)| (key.as_str(), value)).collect();
        self.check_dynamic(&remaining)
    }

    fn check_declared(&self, remaining: &mut IndexMap<&str, &Value>) -> Result<(), ValidationError> {
        for (name, port) in &self.ports {
            let value = remaining
                .shift_remove(name.as_str())
                .map_or(Slot::Unspecified, Slot::Specified);
            port.validate(value)?;
        }
        Ok(())
    }

    fn check_dynamic(&self, remaining: &IndexMap<&str, &Value>) -> Result<(), ValidationError> {
        if !remaining.is_empty() && !self.dynamic {
            return Err(ValidationError::UnexpectedPorts {
                namespace: self.name.clone(),
                keys: remaining.keys().map(|k| k.to_string()).collect(),
            });
        }

        if let Some(valid_type) = &self.valid_type {
            for (key, value) in remaining {
                if !valid_type.accepts(value) {
                    return Err(ValidationError::DynamicTypeMismatch {
                        namespace: self.name.clone(),
                        key: key.to_string(),
                        actual: value.value_type(),
                        expected: valid_type.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Describe this namespace and all of its children
    pub fn describe(&self) -> NamespaceDescription {
        NamespaceDescription {
            attrs: NamespaceAttrs {
                default: self.default.as_option().cloned(),
                dynamic: self.dynamic,
                valid_type: self.valid_type.as_ref().map(|t| t.to_string()),
                required: self.required.to_string(),
                help: self.help.clone(),
            },
            ports: self
                .ports
                .iter()
                .map(|(name, port)| (name.clone(), port.describe()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PortNamespace {
    type Item = (&'a String, &'a PortNode);
    type IntoIter = indexmap::map::Iter<'a, String, PortNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.iter()
    }
}

impl fmt::Display for PortNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(&self.describe()).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
