use std::fmt;

use crate::core::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::core::errors::{PortError, ValidationError};
use crate::core::values::{Slot, ValidType, Value};

use super::description::PortDescription;
use super::validator::Validator;
use super::value_spec::ValueSpec;

/// A value received by a process
///
/// An input port may carry a default. Having a default always makes the port
/// optional, and the default itself must pass the port's own validation.
#[derive(Debug, Clone)]
pub struct InputPort {
    spec: ValueSpec,
    default: Slot<Value>,
}

impl InputPort {
    /// Start building an input port
    pub fn builder(name: impl Into<String>) -> InputPortBuilder {
        InputPortBuilder {
            name: name.into(),
            valid_type: None,
            help: None,
            required: true,
            default: Slot::Unspecified,
            validator: None,
        }
    }

    /// Create a required input port with no constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            spec: ValueSpec::new(name),
            default: Slot::Unspecified,
        }
    }

    /// Effective `required` flag given the caller's request and the default
    pub fn required_override(required: bool, default: Slot<&Value>) -> bool {
        match default {
            Slot::Unspecified => required,
            Slot::Specified(_) => false,
        }
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn spec(&self) -> &ValueSpec {
        &self.spec
    }


    pub fn required(&self) -> bool {
        self.spec.required()
    }

    pub fn valid_type(&self) -> Option<&ValidType> {
        self.spec.valid_type()
    }

    pub fn help(&self) -> Option<&str> {
        self.spec.help()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_specified()
    }

    /// Get the default, failing if none was set
    pub fn default_value(&self) -> Result<&Value, PortError> {
        self.default.as_option().ok_or_else(|| PortError::NoDefault {
            port: self.name().to_string(),
        })
    }

    /// Replace the default
    ///
    /// The new default is validated like the one given at construction.
    pub fn set_default(&mut self, default: Slot<Value>) -> Result<(), PortError> {
        if let Slot::Specified(value) = &default {
            self.check_default(value)?;
            self.spec.set_required(false);
        }
        self.default = default;
        Ok(())
    }

    /// Change the `required` flag; a port with a default stays optional
    pub fn set_required(&mut self, required: bool) {
        let required = InputPort::required_override(required, self.default.as_ref());
        self.spec.set_required(required);
    }

    pub fn set_help(&mut self, help: Option<String>) {
        self.spec.set_help(help);
    }

    /// Change the valid type, failing if the current default would no longer pass
    pub fn set_valid_type(&mut self, valid_type: Option<ValidType>) -> Result<(), PortError> {
        let mut spec = self.spec.clone();
        spec.set_valid_type(valid_type);
        self.replace_spec(spec)
    }

    /// Change the validator, failing if the current default would no longer pass
    pub fn set_validator(&mut self, validator: Option<Validator>) -> Result<(), PortError> {
        let mut spec = self.spec.clone();
        spec.set_validator(validator);
        self.replace_spec(spec)
    }

    /// Validate a supplied value against the port
    pub fn validate(&self, value: Slot<&Value>) -> Result<(), ValidationError> {
        self.spec.validate(value)
    }

    pub fn describe(&self) -> PortDescription {
        let mut description = self.spec.describe();
        description.default = self.default.as_option().map(|value| value.to_string());
        description
    }

    fn replace_spec(&mut self, spec: ValueSpec) -> Result<(), PortError> {
        if let Slot::Specified(default) = &self.default {
            Self::check_default_against(&spec, default)?;
        }
        self.spec = spec;
        Ok(())
    }

    fn check_default(&self, default: &Value) -> Result<(), PortError> {
        Self::check_default_against(&self.spec, default)
    }

    fn check_default_against(spec: &ValueSpec, default: &Value) -> Result<(), PortError> {
        spec.validate(Slot::Specified(default))
            .map_err(|reason| PortError::InvalidDefault {
                port: spec.name().to_string(),
                reason,
            })
    }
}

impl fmt::Display for InputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.describe()).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// Builder for [`InputPort`]
#[derive(Debug, Clone)]
pub struct InputPortBuilder {
    name: String,
    valid_type: Option<ValidType>,
    help: Option<String>,
    required: bool,
    default: Slot<Value>,
    validator: Option<Validator>,
}

impl InputPortBuilder {
    pub fn valid_type(mut self, valid_type: impl Into<ValidType>) -> Self {
        self.valid_type = Some(valid_type.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Slot::Specified(default.into());
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Build the port, logging any diagnostics
    pub fn build(self) -> Result<InputPort, PortError> {
        self.build_with(&mut LogSink)
    }

    /// Build the port, sending diagnostics to `sink`
    ///
    /// Fails if a default was given that does not pass the port's own
    /// validation.
    pub fn build_with(self, sink: &mut dyn DiagnosticSink) -> Result<InputPort, PortError> {
        let required = InputPort::required_override(self.required, self.default.as_ref());
        if required != self.required {
            sink.note(Diagnostic::RequiredOverridden {
                port: self.name.clone(),
            });
        }

        let mut spec = ValueSpec::new(self.name).with_required(required);
        spec.set_valid_type(self.valid_type);
        spec.set_help(self.help);
        spec.set_validator(self.validator);

        let port = InputPort {
            spec,
            default: Slot::Unspecified,
        };
        if let Slot::Specified(default) = &self.default {
            port.check_default(default)?;
        }

        Ok(InputPort {
            default: self.default,
            ..port
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::ValueType;

    #[test]
    fn test_required_override() {
        let five = Value::Int(5);
        assert!(InputPort::required_override(true, Slot::Unspecified));
        assert!(!InputPort::required_override(false, Slot::Unspecified));
        assert!(!InputPort::required_override(true, Slot::Specified(&five)));
        assert!(!InputPort::required_override(false, Slot::Specified(&five)));
    }

    #[test]
    fn test_default_forces_optional_and_notes_conflict() {
        let mut notes: Vec<Diagnostic> = Vec::new();
        let port = InputPort::builder("n")
            .valid_type(ValueType::Int)
            .required(true)
            .default(3)
            .build_with(&mut notes)
            .unwrap();

        assert!(!port.required());
        assert_eq!(port.default_value(), Ok(&Value::Int(3)));
        assert_eq!(
            notes,
            vec![Diagnostic::RequiredOverridden {
                port: "n".to_string()
            }]
        );
    }

    #[test]
    fn test_no_note_without_conflict() {
        let mut notes: Vec<Diagnostic> = Vec::new();
        InputPort::builder("n")
            .required(false)
            .default(3)
            .build_with(&mut notes)
            .unwrap();
        InputPort::builder("m").build_with(&mut notes).unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn test_invalid_default_fails_construction() {
        let result = InputPort::builder("n")
            .valid_type(ValueType::Int)
            .default("five")
            .build();
        assert!(matches!(result, Err(PortError::InvalidDefault { .. })));

        let rejected = InputPort::builder("n")
            .default(-1)
            .validator(Validator::new(|v: &Value| v.as_int().is_some_and(|i| i >= 0)))
            .build();
        assert!(matches!(rejected, Err(PortError::InvalidDefault { .. })));
    }

    #[test]
    fn test_missing_default_is_an_error() {
        let port = InputPort::new("n");
        assert!(!port.has_default());
        assert_eq!(
            port.default_value(),
            Err(PortError::NoDefault {
                port: "n".to_string()
            })
        );
    }

    #[test]
    fn test_set_default_is_validated() {
        let mut port = InputPort::builder("n").valid_type(ValueType::Int).build().unwrap();
        assert!(port.set_default(Slot::Specified(Value::from("x"))).is_err());
        assert!(!port.has_default());

        port.set_default(Slot::Specified(Value::Int(1))).unwrap();
        assert!(port.has_default());
        assert!(!port.required());
    }

    #[test]
    fn test_setters_keep_default_consistent() {
        let mut port = InputPort::builder("n").valid_type(ValueType::Int).default(3).build().unwrap();

        port.set_required(true);
        assert!(!port.required());

        let result = port.set_valid_type(Some(ValueType::Str.into()));
        assert!(matches!(result, Err(PortError::InvalidDefault { .. })));
        assert_eq!(port.valid_type(), Some(&ValidType::of(ValueType::Int)));

        let result = port.set_validator(Some(Validator::new(|v: &Value| v.as_int() == Some(0))));
        assert!(matches!(result, Err(PortError::InvalidDefault { .. })));
        assert!(port.validate(Slot::Specified(&Value::Int(5))).is_ok());

        port.set_valid_type(Some(ValidType::from([ValueType::Int, ValueType::Float])))
            .unwrap();
        assert!(port.validate(Slot::Specified(&Value::Float(0.5))).is_ok());
    }

    #[test]
    fn test_set_required_without_default() {
        let mut port = InputPort::new("n");
        port.set_required(false);
        assert!(!port.required());
        port.set_required(true);
        assert!(port.required());
    }

    #[test]
    fn test_describe_includes_default() {
        let port = InputPort::builder("n").default(4).help("count").build().unwrap();
        let description = port.describe();
        assert_eq!(description.default.as_deref(), Some("4"));
        assert_eq!(description.required, "false");
        assert!(port.to_string().contains("\"default\":\"4\""));
    }
}
