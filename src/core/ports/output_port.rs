use std::fmt;

use crate::core::errors::ValidationError;
use crate::core::values::{Slot, ValidType, Value};

use super::description::PortDescription;
use super::validator::Validator;
use super::value_spec::ValueSpec;

/// A value produced by a process
///
/// Outputs describe guarantees, so they never carry a default.
#[derive(Debug, Clone)]
pub struct OutputPort {
    spec: ValueSpec,
}

impl OutputPort {
    /// Create a required output port with no constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            spec: ValueSpec::new(name),
        }
    }

    pub fn with_valid_type(mut self, valid_type: impl Into<ValidType>) -> Self {
        self.spec = self.spec.with_valid_type(valid_type);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.spec = self.spec.with_help(help);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.spec = self.spec.with_required(required);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.spec = self.spec.with_validator(validator);
        self
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn required(&self) -> bool {
        self.spec.required()
    }

    pub fn spec(&self) -> &ValueSpec {
        &self.spec
    }

    pub fn spec_mut(&mut self) -> &mut ValueSpec {
        &mut self.spec
    }

    pub fn validate(&self, value: Slot<&Value>) -> Result<(), ValidationError> {
        self.spec.validate(value)
    }

    pub fn describe(&self) -> PortDescription {
        self.spec.describe()
    }
}

impl fmt::Display for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.describe()).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::ValueType;

    #[test]
    fn test_output_port() {
        let port = OutputPort::new("result").with_valid_type(ValueType::Float);
        assert!(port.required());
        assert!(port.validate(Slot::Specified(&Value::Float(1.5))).is_ok());
        assert!(port.validate(Slot::Unspecified).is_err());

        let optional = OutputPort::new("log").with_required(false);
        assert!(optional.validate(Slot::Unspecified).is_ok());
        assert_eq!(optional.describe().default, None);
    }
}
