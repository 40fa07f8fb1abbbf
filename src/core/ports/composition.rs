//! Combining namespaces and shaping value trees with them

use log::debug;

use crate::core::errors::{PortError, ValidationError};
use crate::core::values::{Value, ValueMap};

use super::namespace::PortNamespace;
use super::node::{Port, PortNode};
use super::options::{NamespaceOptions, PortFilter};

impl PortNamespace {
    /// Absorb another namespace's properties and children into this one
    ///
    /// Each mutable property is taken from `options` when overridden there
    /// and from `other` otherwise. Children allowed by `filter` are copied
    /// in, replacing same-named children. Returns the absorbed names.
    ///
    /// The filter and the options are checked before anything is modified.
    pub fn absorb(
        &mut self,
        other: &PortNamespace,
        filter: &PortFilter,
        options: NamespaceOptions,
    ) -> Result<Vec<String>, PortError> {
        filter.check()?;
        options.ensure_supported()?;

        options.apply(self, other)?;

        let mut absorbed = Vec::new();
        for (name, port) in other.iter() {
            if !filter.allows(name) {
                continue;
            }
            self.insert(name.clone(), port.clone())?;
            absorbed.push(name.clone());
        }

        debug!(
            "absorbed {} of {} ports from '{}' into '{}'",
            absorbed.len(),
            other.len(),
            other.name(),
            self.name()
        );
        Ok(absorbed)
    }

    /// Keep only the entries of `values` that this namespace declares
    ///
    /// Entries for child namespaces are projected recursively when the value
    /// is itself a mapping. Unknown keys are dropped.
    pub fn project(&self, values: &ValueMap) -> ValueMap {
        values
            .iter()
            .filter_map(|(key, value)| {
                let projected = match (self.get(key)?, value) {
                    (PortNode::Namespace(namespace), Value::Map(inner)) => {
                        Value::Map(namespace.project(inner))
                    }
                    _ => value.clone(),
                };
                Some((key.clone(), projected))
            })
            .collect()
    }

    /// Complete `values` with the defaults of any absent ports
    ///
    /// Child namespaces are filled recursively. An absent namespace without
    /// a default is added when filling it produced something. Otherwise an
    /// absent required namespace fails like a required port, and an absent
    /// optional one is skipped. Keys unknown to the schema are kept as they
    /// are.
    pub fn fill_defaults(&self, values: &ValueMap) -> Result<ValueMap, ValidationError> {
        let mut result = values.clone();

        for (name, port) in self.iter() {
            let supplied = values.get(name).cloned().or_else(|| port.default_value().cloned());

            let filled = match (port, supplied) {
                (PortNode::Namespace(namespace), Some(Value::Map(inner))) => {
                    Value::Map(namespace.fill_defaults(&inner)?)
                }
                (PortNode::Namespace(namespace), None) => {
                    match namespace.fill_defaults(&ValueMap::new()) {
                        Ok(inner) if !inner.is_empty() => Value::Map(inner),
                        Ok(_) | Err(_) if !namespace.required() => continue,
                        Ok(_) => return Err(ValidationError::RequiredMissing { port: name.clone() }),
                        Err(err) => return Err(err),
                    }
                }
                (_, Some(value)) => value,
                (port, None) if port.required() => {
                    return Err(ValidationError::RequiredMissing { port: name.clone() })
                }
                (_, None) => continue,
            };
            result.insert(name.clone(), filled);
        }

        Ok(result)
    }
}
