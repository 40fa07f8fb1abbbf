use crate::core::errors::PortError;
use crate::core::values::{Slot, ValidType, Value};

use super::namespace::PortNamespace;
use super::validator::NamespaceValidator;

/// Mutable namespace properties that may be overridden
pub const NAMESPACE_PROPERTIES: [&str; 6] =
    ["default", "dynamic", "help", "required", "valid_type", "validator"];

/// Overrides for the mutable properties of a port namespace
///
/// Used by `absorb`, where unset properties are copied from the absorbed
/// namespace, and by `create_port_namespace`, where they configure the
/// newly created terminal namespace.
#[derive(Debug, Clone, Default)]
pub struct NamespaceOptions {
    default: Option<Slot<Value>>,
    dynamic: Option<bool>,
    help: Option<Option<String>>,
    required: Option<bool>,
    valid_type: Option<Option<ValidType>>,
    validator: Option<Option<NamespaceValidator>>,
    unsupported: Vec<String>,
}

impl NamespaceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, default: Slot<Value>) -> Self {
        self.default = Some(default);
        self
    }

    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = Some(dynamic);
        self
    }

    pub fn help(mut self, help: Option<String>) -> Self {
        self.help = Some(help);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn valid_type(mut self, valid_type: Option<ValidType>) -> Self {
        self.valid_type = Some(valid_type);
        self
    }

    pub fn validator(mut self, validator: Option<NamespaceValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Parse overrides from a JSON object
    ///
    /// Known keys are type checked right away. Unknown keys are kept and
    /// rejected once the options are applied. `validator` cannot be
    /// expressed as data.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, PortError> {
        let entries = json
            .as_object()
            .ok_or_else(|| PortError::InvalidNamespaceOption {
                key: "<root>".to_string(),
                reason: "namespace options must be a JSON object".to_string(),
            })?;

        let mut options = NamespaceOptions::new();
        for (key, value) in entries {
            let invalid = |reason: &str| PortError::InvalidNamespaceOption {
                key: key.clone(),
                reason: reason.to_string(),
            };
            match key.as_str() {
                "default" => {
                    options.default = Some(Slot::Specified(Value::from(value.clone())));
                }
                "dynamic" => {
                    options.dynamic = Some(value.as_bool().ok_or_else(|| invalid("expected a boolean"))?);
                }
                "required" => {
                    options.required = Some(value.as_bool().ok_or_else(|| invalid("expected a boolean"))?);
                }
                "help" => {
                    let help = match value {
                        serde_json::Value::Null => None,
                        serde_json::Value::String(help) => Some(help.clone()),
                        _ => return Err(invalid("expected a string or null")),
                    };
                    options.help = Some(help);
                }
                "valid_type" => {
                    let valid_type: Option<ValidType> = serde_json::from_value(value.clone())
                        .map_err(|e| invalid(&e.to_string()))?;
                    options.valid_type = Some(valid_type);
                }
                "validator" => return Err(invalid("validators cannot be loaded from data")),
                _ => options.unsupported.push(key.clone()),
            }
        }
        Ok(options)
    }

    /// Fail if any key does not name a mutable namespace property
    pub fn ensure_supported(&self) -> Result<(), PortError> {
        if self.unsupported.is_empty() {
            Ok(())
        } else {
            Err(PortError::UnsupportedNamespaceOptions {
                keys: self.unsupported.clone(),
            })
        }
    }

    /// Apply the overrides to `target`, taking every other property from `base`
    ///
    /// `valid_type` is applied before `dynamic`, so an explicit `dynamic`
    /// override wins over the value derived from the valid type.
    pub(crate) fn apply(self, target: &mut PortNamespace, base: &PortNamespace) -> Result<(), PortError> {
        self.ensure_supported()?;

        target.set_default(self.default.unwrap_or_else(|| base.default_value().clone()));
        target.set_help(self.help.unwrap_or_else(|| base.help().map(str::to_string)));
        target.set_required(self.required.unwrap_or(base.required()));
        target.set_validator(self.validator.unwrap_or_else(|| base.validator().cloned()));

        let valid_type_overridden = self.valid_type.is_some();
        target.set_valid_type(self.valid_type.unwrap_or_else(|| base.valid_type().cloned()));
        match self.dynamic {
            Some(dynamic) => target.set_dynamic(dynamic),
            None if valid_type_overridden => {}
            None => target.set_dynamic(base.dynamic()),
        }
        Ok(())
    }
}

/// Selection of child ports to absorb
///
/// `include`, when given, is the exclusive allow-list. Otherwise `exclude`
/// is a deny-list. Supplying both is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortFilter {
    exclude: Vec<String>,
    include: Option<Vec<String>>,
}

impl PortFilter {
    /// Filter that lets every port through
    pub fn all() -> Self {
        Self::default()
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn check(&self) -> Result<(), PortError> {
        if !self.exclude.is_empty() && self.include.is_some() {
            return Err(PortError::ExcludeIncludeConflict);
        }
        Ok(())
    }

    pub fn allows(&self, name: &str) -> bool {
        match &self.include {
            Some(include) => include.iter().any(|n| n == name),
            None => !self.exclude.iter().any(|n| n == name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::ValueType;
    use serde_json::json;

    #[test]
    fn test_filter() {
        assert!(PortFilter::all().allows("a"));

        let deny = PortFilter::all().exclude(["a"]);
        assert!(!deny.allows("a"));
        assert!(deny.allows("b"));

        let allow = PortFilter::all().include(["a"]);
        assert!(allow.allows("a"));
        assert!(!allow.allows("b"));

        let empty_allow = PortFilter::all().include(Vec::<String>::new());
        assert!(!empty_allow.allows("a"));

        let both = PortFilter::all().exclude(["a"]).include(["b"]);
        assert_eq!(both.check(), Err(PortError::ExcludeIncludeConflict));
    }

    #[test]
    fn test_from_json() {
        let options = NamespaceOptions::from_json(&json!({
            "dynamic": true,
            "valid_type": ["int", "float"],
            "help": "numbers",
            "default": {"x": 1}
        }))
        .unwrap();
        assert!(options.ensure_supported().is_ok());
        assert_eq!(options.dynamic, Some(true));
        assert_eq!(
            options.valid_type,
            Some(Some(ValidType::from([ValueType::Int, ValueType::Float])))
        );
        assert_eq!(options.help, Some(Some("numbers".to_string())));
    }

    #[test]
    fn test_from_json_collects_unsupported_keys() {
        let options = NamespaceOptions::from_json(&json!({"name": "x", "colour": "red"})).unwrap();
        match options.ensure_supported() {
            Err(PortError::UnsupportedNamespaceOptions { keys }) => {
                assert_eq!(keys.len(), 2);
                assert!(keys.contains(&"name".to_string()));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(NamespaceOptions::from_json(&json!({"dynamic": "yes"})).is_err());
        assert!(NamespaceOptions::from_json(&json!({"valid_type": "integer"})).is_err());
        assert!(NamespaceOptions::from_json(&json!({"validator": null})).is_err());
        assert!(matches!(
            NamespaceOptions::from_json(&json!({"valid_type": []})),
            Err(PortError::InvalidNamespaceOption { ref key, .. }) if key == "valid_type"
        ));
        assert!(NamespaceOptions::from_json(&json!([1, 2])).is_err());
    }
}
